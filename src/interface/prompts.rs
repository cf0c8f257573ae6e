use dialoguer::{Confirm, Input};

use crate::error::{PlanError, Result};
use crate::models::{MacroRatio, Targets, parse_exclusions};

const DEFAULT_EXCLUSIONS: &str = "우유, 땅콩, 새우";

fn prompt_number(prompt: &str, default: &str) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;

    input
        .trim()
        .parse()
        .map_err(|_| PlanError::InvalidInput(format!("Invalid number: {}", input)))
}

/// Prompt for the daily calorie goal.
pub fn prompt_goal_kcal() -> Result<f64> {
    prompt_number("Daily calorie goal (kcal)", "2500")
}

/// Prompt for the carbohydrate / protein / fat calorie ratio.
pub fn prompt_ratio() -> Result<MacroRatio> {
    let carbs = prompt_number("Carbohydrate share (%)", "50")?;
    let protein = prompt_number("Protein share (%)", "30")?;
    let fat = prompt_number("Fat share (%)", "20")?;
    Ok(MacroRatio::new(carbs, protein, fat))
}

/// Prompt for comma-separated foods to avoid.
pub fn prompt_exclusions() -> Result<Vec<String>> {
    let input: String = Input::new()
        .with_prompt("Foods to avoid (comma-separated)")
        .default(DEFAULT_EXCLUSIONS.to_string())
        .allow_empty(true)
        .interact_text()?;

    Ok(parse_exclusions(&input))
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Collect plan targets interactively, keeping `base`'s rebalance settings.
pub fn collect_targets(base: Targets) -> Result<Targets> {
    let goal_kcal = prompt_goal_kcal()?;
    let ratio = prompt_ratio()?;
    let exclusions = prompt_exclusions()?;

    let targets = Targets {
        goal_kcal,
        ratio,
        exclusions,
        ..base
    };
    targets.validate()?;
    Ok(targets)
}
