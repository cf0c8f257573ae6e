//! Parsing of the generator's free-text meal plan.
//!
//! The text is expected to look like
//!
//! ```text
//! Breakfast: multigrain rice, soybean paste stew, grilled mackerel, kimchi, spinach
//! • (approx. 630 kcal / carbohydrate approx. 58g, protein approx. 51g, fat approx. 21g)
//! Lunch: ...
//! ```
//!
//! with Korean labels (아침/점심/저녁, 약, 탄수화물/단백질/지방) accepted too.
//! Nothing here fails: text that does not follow the grammar gives empty results.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::models::MealSlot;
use crate::planner::constants::{MAX_ITEMS_PER_SLOT, MIN_TOKEN_CHARS};

const SLOT_LABELS: &str = "아침|점심|저녁|breakfast|lunch|dinner";
const APPROX: &str = r"(?:약|approx\.?)?";

static SLOT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)({SLOT_LABELS})\**[^\S\n]*[:：][^\S\n]*(\S.*)"))
        .expect("slot line pattern")
});

static ITEM_DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,、/·]+|\s{2,}").expect("item delimiter pattern"));

static ANNOTATED_MEAL: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        concat!(
            r"(?i)({labels})\**[^\S\n]*[:：][^\S\n]*([^\n]+?)\s*\r?\n\s*[*•\-]?\s*",
            r"\(\s*{a}\s*([\d,]+(?:\.\d+)?)\s*kcal\s*/\s*",
            r"(?:탄수화물|carbohydrates?|carbs?)\s*{a}\s*([\d.]+)\s*g\s*,\s*",
            r"(?:단백질|protein)\s*{a}\s*([\d.]+)\s*g\s*,\s*",
            r"(?:지방|fat)\s*{a}\s*([\d.]+)\s*g\s*\)"
        ),
        labels = SLOT_LABELS,
        a = APPROX,
    );
    Regex::new(&pattern).expect("annotated meal pattern")
});

/// Food names suggested for one meal slot, in suggestion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestedMeal {
    pub slot: MealSlot,
    pub items: Vec<String>,
}

/// Meal slot -> suggested names, ordered by first appearance of the slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SuggestedMeals {
    meals: Vec<SuggestedMeal>,
}

impl SuggestedMeals {
    /// Set a slot's items; a repeated slot is overwritten in place.
    pub fn insert(&mut self, slot: MealSlot, items: Vec<String>) {
        match self.meals.iter_mut().find(|m| m.slot == slot) {
            Some(existing) => existing.items = items,
            None => self.meals.push(SuggestedMeal { slot, items }),
        }
    }

    pub fn get(&self, slot: MealSlot) -> Option<&[String]> {
        self.meals
            .iter()
            .find(|m| m.slot == slot)
            .map(|m| m.items.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SuggestedMeal> {
        self.meals.iter()
    }

    /// Total number of suggested names across all slots.
    pub fn item_count(&self) -> usize {
        self.meals.iter().map(|m| m.items.len()).sum()
    }

    /// No slot was recognised at all.
    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }
}

impl FromIterator<SuggestedMeal> for SuggestedMeals {
    fn from_iter<I: IntoIterator<Item = SuggestedMeal>>(iter: I) -> Self {
        let mut meals = SuggestedMeals::default();
        for meal in iter {
            meals.insert(meal.slot, meal.items);
        }
        meals
    }
}

/// Split a slot's item text into at most five names of two or more characters.
pub fn split_items(items: &str) -> Vec<String> {
    ITEM_DELIMITER
        .split(items)
        .map(str::trim)
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .take(MAX_ITEMS_PER_SLOT)
        .map(str::to_string)
        .collect()
}

/// Extract the meal slot -> food names mapping from generator text.
///
/// Items must follow the label on the same line. A label with nothing after
/// its colon is skipped and never takes the next line as its items.
pub fn parse_meal_items(text: &str) -> SuggestedMeals {
    let mut meals = SuggestedMeals::default();
    for caps in SLOT_LINE.captures_iter(text) {
        let Some(slot) = MealSlot::from_label(&caps[1]) else {
            continue;
        };
        meals.insert(slot, split_items(&caps[2]));
    }
    meals
}

/// Row label of the annotation table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowLabel {
    Meal(MealSlot),
    Total,
}

/// Nutrients the generator claims for one meal (or the day, for the total row).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedMeal {
    pub label: RowLabel,
    pub menu: String,
    pub kcal: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
}

fn number(text: &str) -> Option<f64> {
    text.replace(',', "").parse().ok()
}

/// Extract per-meal nutrient annotations, followed by a total row.
///
/// Returns an empty table when no slot carries an annotation line.
pub fn parse_meal_annotations(text: &str) -> Vec<AnnotatedMeal> {
    let mut rows: Vec<AnnotatedMeal> = ANNOTATED_MEAL
        .captures_iter(text)
        .filter_map(|caps| {
            let slot = MealSlot::from_label(&caps[1])?;
            Some(AnnotatedMeal {
                label: RowLabel::Meal(slot),
                menu: caps[2].trim().to_string(),
                kcal: number(&caps[3])?,
                carbs: number(&caps[4])?,
                protein: number(&caps[5])?,
                fat: number(&caps[6])?,
            })
        })
        .collect();

    if rows.is_empty() {
        return rows;
    }

    let total = rows.iter().fold(
        AnnotatedMeal {
            label: RowLabel::Total,
            menu: String::new(),
            kcal: 0.0,
            carbs: 0.0,
            protein: 0.0,
            fat: 0.0,
        },
        |mut acc, row| {
            acc.kcal += row.kcal;
            acc.carbs += row.carbs;
            acc.protein += row.protein;
            acc.fat += row.fat;
            acc
        },
    );
    rows.push(total);
    rows
}
