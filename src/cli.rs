use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::targets::{DEFAULT_KCAL_TOLERANCE, DEFAULT_MAX_ITERATIONS};
use crate::models::{MacroRatio, Targets, parse_exclusions};
use crate::planner::constants::DEFAULT_SIMILAR_COUNT;

/// Meal rebalancer: turns a free-text meal suggestion into a plan that hits
/// calorie and macro targets.
#[derive(Parser, Debug)]
#[command(name = "meal_rebalancer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the nutrition catalog (CSV or JSON).
    #[arg(short, long, global = true, default_value = "food_db.csv")]
    pub catalog: PathBuf,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log filter for the verbosity flag; RUST_LOG still takes precedence.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Calorie and macro targets given on the command line.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Daily calorie goal (kcal). Prompted for when omitted.
    #[arg(short, long)]
    pub goal: Option<f64>,

    /// Carbohydrate share of calories (%).
    #[arg(long, default_value_t = 50.0)]
    pub carbs: f64,

    /// Protein share of calories (%).
    #[arg(long, default_value_t = 30.0)]
    pub protein: f64,

    /// Fat share of calories (%).
    #[arg(long, default_value_t = 20.0)]
    pub fat: f64,

    /// Comma-separated substrings of foods never to include.
    #[arg(short, long, default_value = "")]
    pub exclude: String,

    /// Relative calorie tolerance (0.05 = ±5%).
    #[arg(long, default_value_t = DEFAULT_KCAL_TOLERANCE)]
    pub tolerance: f64,

    /// Maximum rebalancing iterations.
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,
}

impl TargetArgs {
    /// Targets from the flags, or None when the goal must be prompted for.
    pub fn to_targets(&self) -> Option<Targets> {
        self.goal.map(|goal| {
            Targets::new(
                goal,
                MacroRatio::new(self.carbs, self.protein, self.fat),
                parse_exclusions(&self.exclude),
            )
            .with_tolerance(self.tolerance)
            .with_max_iterations(self.max_iterations)
        })
    }

    /// Only the rebalance settings; the rest is filled in interactively.
    pub fn base_targets(&self) -> Targets {
        Targets::default()
            .with_tolerance(self.tolerance)
            .with_max_iterations(self.max_iterations)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Match a suggestion against the catalog and rebalance it.
    Plan {
        /// File holding the generator's answer. Reads stdin when omitted.
        #[arg(short, long)]
        suggestions: Option<PathBuf>,

        #[command(flatten)]
        targets: TargetArgs,

        /// Write the full report as JSON.
        #[arg(long)]
        report: Option<PathBuf>,

        /// Write the final selection as CSV.
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Show what the parser extracts from a suggestion.
    Parse {
        /// File holding the generator's answer. Reads stdin when omitted.
        file: Option<PathBuf>,
    },

    /// Print the instruction to give the text generator.
    Prompt {
        #[command(flatten)]
        targets: TargetArgs,
    },

    /// Salty/sweet levels and the catalog foods closest in sodium or sugar.
    Taste {
        /// Sodium (mg).
        #[arg(long)]
        sodium: Option<f64>,

        /// Sugar (g).
        #[arg(long)]
        sugar: Option<f64>,

        /// How many similar foods to list.
        #[arg(short = 'n', long, default_value_t = DEFAULT_SIMILAR_COUNT)]
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_flags() {
        let cli = Cli::parse_from([
            "meal_rebalancer",
            "-vv",
            "plan",
            "--goal",
            "2000",
            "--exclude",
            "milk, peanut",
            "--tolerance",
            "0.1",
        ]);
        assert_eq!(cli.log_level(), "debug");
        assert_eq!(cli.catalog, PathBuf::from("food_db.csv"));

        let Command::Plan { targets, .. } = cli.command else {
            panic!("expected plan");
        };
        let targets = targets.to_targets().unwrap();
        assert_eq!(targets.goal_kcal, 2000.0);
        assert_eq!(targets.exclusions, vec!["milk".to_string(), "peanut".to_string()]);
        assert_eq!(targets.tolerance, 0.1);
        assert_eq!(targets.max_iterations, 60);
    }

    #[test]
    fn test_missing_goal_means_prompt() {
        let cli = Cli::parse_from(["meal_rebalancer", "prompt", "--catalog", "foods.json"]);
        assert_eq!(cli.catalog, PathBuf::from("foods.json"));
        let Command::Prompt { targets } = cli.command else {
            panic!("expected prompt");
        };
        assert!(targets.to_targets().is_none());
        assert_eq!(targets.base_targets().tolerance, 0.05);
    }
}
