use crate::models::Targets;
use crate::planner::constants::MAX_ITEMS_PER_SLOT;

/// Instruction handed to the text generator.
///
/// The output format section mirrors exactly what the parser understands.
pub fn build_prompt(targets: &Targets) -> String {
    let exclusions = if targets.exclusions.is_empty() {
        "none".to_string()
    } else {
        targets.exclusions.join(", ")
    };

    format!(
        "You are a professional dietitian.\n\
         Plan three meals for one day.\n\
         \n\
         Constraints:\n\
         - Each meal has {items} items: 1 rice/staple, 1 soup or stew, 1 main dish, 2 side dishes\n\
         - Total energy around {kcal:.0} kcal\n\
         - Carbohydrate / protein / fat ratio: {c:.0}% / {p:.0}% / {f:.0}%\n\
         - Never include: {exclusions}\n\
         - Output format, exactly:\n\
         \x20 Breakfast: item1, item2, item3, item4, item5\n\
         \x20 • (approx. 630 kcal / carbohydrate approx. 58g, protein approx. 51g, fat approx. 21g)\n\
         \x20 Lunch: ...\n\
         \x20 Dinner: ...\n",
        items = MAX_ITEMS_PER_SLOT,
        kcal = targets.goal_kcal,
        c = targets.ratio.carbs,
        p = targets.ratio.protein,
        f = targets.ratio.fat,
        exclusions = exclusions,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MacroRatio;
    use crate::suggestion::{parse_meal_annotations, parse_meal_items};

    #[test]
    fn test_prompt_mentions_targets() {
        let targets = Targets::new(
            2200.0,
            MacroRatio::new(45.0, 35.0, 20.0),
            vec!["milk".to_string(), "peanut".to_string()],
        );
        let prompt = build_prompt(&targets);
        assert!(prompt.contains("2200 kcal"));
        assert!(prompt.contains("45% / 35% / 20%"));
        assert!(prompt.contains("Never include: milk, peanut"));
    }

    #[test]
    fn test_prompt_without_exclusions() {
        let prompt = build_prompt(&Targets::default());
        assert!(prompt.contains("Never include: none"));
    }

    #[test]
    fn test_format_example_is_parseable() {
        let prompt = build_prompt(&Targets::default());
        let meals = parse_meal_items(&prompt);
        assert_eq!(meals.iter().count(), 3);
        let rows = parse_meal_annotations(&prompt);
        assert_eq!(rows[0].kcal, 630.0);
    }
}
