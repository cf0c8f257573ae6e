use crate::catalog::NutritionCatalog;
use crate::models::{FoodRecord, Targets};
use crate::planner::{
    DropReason, DroppedSuggestion, IterationLog, RebalanceAction, SaltyLevel, SweetLevel, Totals,
    nearest_names,
};
use crate::session::{PlanReport, SelectionRow};
use crate::suggestion::{AnnotatedMeal, RowLabel, SuggestedMeals};

/// Display a selection in a formatted table.
pub fn display_selection(rows: &[SelectionRow], title: &str) {
    if rows.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} items) ===", title, rows.len());
    println!();

    let max_name_len = rows
        .iter()
        .map(|r| r.catalog_name.chars().count())
        .max()
        .unwrap_or(10);

    for (i, row) in rows.iter().enumerate() {
        let slot = row.slot.map(|s| s.label()).unwrap_or("(added)");
        let origin = match &row.suggested_name {
            Some(name) if *name != row.catalog_name => format!("  <- {}", name),
            _ => String::new(),
        };

        println!(
            "{:>3}. {:<9} {:<width$} [{}] {:>4.0} kcal | C:{:.1} P:{:.1} F:{:.1}{}",
            i + 1,
            slot,
            row.catalog_name,
            row.category,
            row.energy_kcal,
            row.carbs,
            row.protein,
            row.fat,
            origin,
            width = max_name_len
        );
    }
    println!();
}

/// Display suggestions that were dropped, with "did you mean" hints for misses.
pub fn display_dropped(dropped: &[DroppedSuggestion], catalog: &NutritionCatalog) {
    if dropped.is_empty() {
        return;
    }

    println!();
    println!("--- Dropped suggestions ---");
    for item in dropped {
        match &item.reason {
            DropReason::Excluded { substring } => {
                println!("  {} '{}': excluded ({})", item.slot, item.name, substring);
            }
            DropReason::ExcludedMatch {
                catalog_name,
                substring,
            } => {
                println!(
                    "  {} '{}': matched '{}', which is excluded ({})",
                    item.slot, item.name, catalog_name, substring
                );
            }
            DropReason::NoCatalogMatch { key } => {
                let hints: Vec<&str> = nearest_names(catalog, &item.name)
                    .into_iter()
                    .map(|(name, _)| name)
                    .collect();
                if hints.is_empty() {
                    println!("  {} '{}': no catalog name contains '{}'", item.slot, item.name, key);
                } else {
                    println!(
                        "  {} '{}': no catalog name contains '{}' (did you mean {}?)",
                        item.slot,
                        item.name,
                        key,
                        hints.join(", ")
                    );
                }
            }
        }
    }
}

/// Display the rebalancing log, one line per iteration.
pub fn display_log(log: &[IterationLog]) {
    if log.is_empty() {
        return;
    }

    println!();
    println!("--- Rebalancing ---");
    for entry in log {
        let action = match &entry.action {
            RebalanceAction::Converged => "within tolerance".to_string(),
            RebalanceAction::Added { name, energy_kcal } => {
                format!("+ {} ({:.0} kcal)", name, energy_kcal)
            }
            RebalanceAction::Removed { name, energy_kcal } => {
                format!("- {} ({:.0} kcal)", name, energy_kcal)
            }
            RebalanceAction::PoolExhausted => "no candidate left to add".to_string(),
            RebalanceAction::SelectionEmpty => "nothing left to remove".to_string(),
        };

        let sign = if entry.kcal_error >= 0.0 { "+" } else { "" };
        println!(
            "  #{:<3} {:>5.0} kcal ({}{:.1}%) ratio dist {:>5.1} | {}",
            entry.iteration,
            entry.kcal,
            sign,
            entry.kcal_error * 100.0,
            entry.ratio_deviation,
            action
        );
    }
}

fn totals_line(label: &str, totals: &Totals, targets: &Targets) {
    let error = totals.kcal_error(targets.goal_kcal);
    let sign = if error >= 0.0 { "+" } else { "" };
    println!(
        "{:<8} {:>5.0} kcal ({}{:.1}%) | C/P/F {:.0}/{:.0}/{:.0}% | dist {:.1}",
        label,
        totals.kcal,
        sign,
        error * 100.0,
        totals.ratio.carbs,
        totals.ratio.protein,
        totals.ratio.fat,
        totals.ratio_deviation(&targets.ratio)
    );
}

/// Display totals before and after rebalancing against the targets.
pub fn display_comparison(before: &Totals, after: &Totals, targets: &Targets) {
    println!();
    println!("--- Before / After ---");
    println!(
        "{:<8} {:>5.0} kcal           | C/P/F {:.0}/{:.0}/{:.0}%",
        "Target",
        targets.goal_kcal,
        targets.ratio.carbs,
        targets.ratio.protein,
        targets.ratio.fat
    );
    totals_line("Before", before, targets);
    totals_line("After", after, targets);
    println!();
}

/// Display the slot -> names mapping parsed from the suggestion.
pub fn display_suggested(meals: &SuggestedMeals) {
    if meals.is_empty() {
        println!("No meal slots found in the suggestion.");
        return;
    }

    println!();
    println!("=== Suggested meals ===");
    for meal in meals.iter() {
        println!("  {:<9}: {}", meal.slot.label(), meal.items.join(", "));
    }
}

/// Display the nutrients the generator claimed per meal.
pub fn display_annotations(rows: &[AnnotatedMeal]) {
    if rows.is_empty() {
        return;
    }

    println!();
    println!("--- Claimed nutrients ---");
    for row in rows {
        let label = match row.label {
            RowLabel::Meal(slot) => slot.label(),
            RowLabel::Total => "Total",
        };
        println!(
            "  {:<9} {:>5.0} kcal | C:{:.1} P:{:.1} F:{:.1}  {}",
            label, row.kcal, row.carbs, row.protein, row.fat, row.menu
        );
    }
}

/// Display a full plan report.
pub fn display_report(report: &PlanReport, catalog: &NutritionCatalog) {
    display_dropped(&report.dropped, catalog);

    if !report.is_planned() {
        println!();
        println!("No plan: {}.", report.status.describe());
        return;
    }

    display_selection(&report.matched, "Matched selection");
    display_log(&report.log);
    display_comparison(&report.before, &report.after, &report.targets);
    display_selection(&report.selection, "Final plan");

    println!("--- Summary ---");
    println!("Status: {}", report.status.describe());
    println!("Items: {} -> {}", report.matched.len(), report.selection.len());
    println!();
}

/// Display taste levels for a value and the closest catalog foods.
pub fn display_taste(
    sodium: Option<(f64, &[&FoodRecord])>,
    sugar: Option<(f64, &[&FoodRecord])>,
) {
    if let Some((value, foods)) = sodium {
        println!();
        println!("Sodium {:.0} mg: {}", value, SaltyLevel::from_sodium(value));
        for food in foods {
            println!(
                "  {} - {:.0} mg ({})",
                food.name,
                food.sodium,
                SaltyLevel::from_sodium(food.sodium)
            );
        }
    }

    if let Some((value, foods)) = sugar {
        println!();
        println!("Sugar {:.1} g: {}", value, SweetLevel::from_sugar(value));
        for food in foods {
            println!(
                "  {} - {:.1} g ({})",
                food.name,
                food.sugar,
                SweetLevel::from_sugar(food.sugar)
            );
        }
    }
    println!();
}
