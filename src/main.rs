use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use env_logger::Env;

use meal_rebalancer_rs::catalog::{NutritionCatalog, load_catalog};
use meal_rebalancer_rs::cli::{Cli, Command, TargetArgs};
use meal_rebalancer_rs::error::Result;
use meal_rebalancer_rs::interface::{
    collect_targets, display_annotations, display_report, display_suggested, display_taste,
    prompt_yes_no, write_report_json, write_selection_csv,
};
use meal_rebalancer_rs::models::Targets;
use meal_rebalancer_rs::planner::{similar_by_sodium, similar_by_sugar};
use meal_rebalancer_rs::session::PlanSession;
use meal_rebalancer_rs::suggestion::{
    FileSource, StdinSource, SuggestionSource, build_prompt, parse_meal_annotations,
    parse_meal_items,
};

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_level())).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Plan {
            suggestions,
            targets,
            report,
            csv,
        } => cmd_plan(&cli.catalog, suggestions, &targets, report, csv),
        Command::Parse { file } => cmd_parse(file),
        Command::Prompt { targets } => cmd_prompt(&targets),
        Command::Taste {
            sodium,
            sugar,
            count,
        } => cmd_taste(&cli.catalog, sodium, sugar, count),
    }
}

/// Load the catalog, or report a missing file and return None.
fn open_catalog(path: &Path) -> Result<Option<NutritionCatalog>> {
    if !path.exists() {
        eprintln!("Nutrition catalog not found: {}", path.display());
        eprintln!("Pass --catalog <file> with a CSV or JSON nutrition table.");
        return Ok(None);
    }
    load_catalog(path).map(Some)
}

/// Targets from the flags, prompting for whatever the flags leave open.
fn resolve_targets(args: &TargetArgs) -> Result<Targets> {
    match args.to_targets() {
        Some(targets) => {
            targets.validate()?;
            Ok(targets)
        }
        None => collect_targets(args.base_targets()),
    }
}

fn source_for(path: Option<PathBuf>) -> Box<dyn SuggestionSource> {
    match path {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(StdinSource),
    }
}

/// Match a suggestion to the catalog and rebalance it toward the targets.
fn cmd_plan(
    catalog_path: &Path,
    suggestions: Option<PathBuf>,
    target_args: &TargetArgs,
    report_path: Option<PathBuf>,
    csv_path: Option<PathBuf>,
) -> Result<()> {
    let Some(catalog) = open_catalog(catalog_path)? else {
        return Ok(());
    };
    println!("Loaded {} foods", catalog.len());

    let targets = resolve_targets(target_args)?;
    let interactive = target_args.goal.is_none();
    let mut session = PlanSession::new(targets);
    let source = source_for(suggestions);

    let report = session.run(&catalog, source.as_ref())?;
    display_report(report, &catalog);

    if let Some(path) = report_path {
        write_report_json(report, &path)?;
        println!("Report written to {}", path.display());
    }

    if let Some(path) = csv_path {
        write_selection_csv(&report.selection, &path)?;
        println!("Plan written to {}", path.display());
    } else if interactive && report.is_planned() {
        let save = prompt_yes_no("Save the final plan as CSV?", false)?;
        if save {
            let path = PathBuf::from("meal_plan.csv");
            write_selection_csv(&report.selection, &path)?;
            println!("Plan written to {}", path.display());
        }
    }

    Ok(())
}

/// Show the parsed mapping and annotation table for a suggestion.
fn cmd_parse(file: Option<PathBuf>) -> Result<()> {
    let text = match file {
        Some(path) => fs::read_to_string(path)?,
        None => StdinSource.suggest("")?,
    };

    display_suggested(&parse_meal_items(&text));
    display_annotations(&parse_meal_annotations(&text));
    println!();
    Ok(())
}

/// Print the generator prompt for the given targets.
fn cmd_prompt(target_args: &TargetArgs) -> Result<()> {
    let targets = resolve_targets(target_args)?;
    println!("{}", build_prompt(&targets));
    Ok(())
}

/// Show taste levels and the closest catalog foods.
fn cmd_taste(
    catalog_path: &Path,
    sodium: Option<f64>,
    sugar: Option<f64>,
    count: usize,
) -> Result<()> {
    if sodium.is_none() && sugar.is_none() {
        println!("Please give at least one value:");
        println!("  --sodium <mg>  Salty level and foods with similar sodium");
        println!("  --sugar <g>    Sweet level and foods with similar sugar");
        return Ok(());
    }

    let Some(catalog) = open_catalog(catalog_path)? else {
        return Ok(());
    };

    let salty = sodium.map(|v| (v, similar_by_sodium(&catalog, v, count)));
    let sweet = sugar.map(|v| (v, similar_by_sugar(&catalog, v, count)));
    display_taste(
        salty.as_ref().map(|(v, foods)| (*v, foods.as_slice())),
        sweet.as_ref().map(|(v, foods)| (*v, foods.as_slice())),
    );
    Ok(())
}
