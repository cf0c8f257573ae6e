use log::debug;
use serde::Serialize;
use strsim::jaro_winkler;

use crate::catalog::NutritionCatalog;
use crate::models::{MealSlot, Selection, SelectionEntry, excluded_by};
use crate::planner::constants::{HINT_SIMILARITY_THRESHOLD, LOOKUP_KEY_CHARS, MAX_HINTS};
use crate::suggestion::SuggestedMeals;

/// Why a suggested name did not make it into the selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DropReason {
    /// The suggested name contains an exclusion substring.
    Excluded { substring: String },
    /// The first catalog hit for the key contains an exclusion substring.
    ExcludedMatch { catalog_name: String, substring: String },
    /// No catalog name contains the lookup key.
    NoCatalogMatch { key: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedSuggestion {
    pub slot: MealSlot,
    pub name: String,
    #[serde(flatten)]
    pub reason: DropReason,
}

/// Selection built from the suggestions plus everything that was dropped.
#[derive(Debug, Clone)]
pub struct MatchOutcome<'c> {
    pub selection: Selection<'c>,
    pub dropped: Vec<DroppedSuggestion>,
}

impl MatchOutcome<'_> {
    /// Nothing matched; rebalancing has nothing to start from.
    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }
}

/// Catalog lookup key: the first three characters of the name (or all of it).
pub fn lookup_key(name: &str) -> String {
    name.chars().take(LOOKUP_KEY_CHARS).collect()
}

/// Resolve suggested names to catalog records.
///
/// Each name is matched to the first record, in catalog order, whose name
/// contains the name's lookup key (ignoring case). There is no similarity
/// ranking. Names that are excluded or have no hit are dropped.
pub fn match_suggestions<'c>(
    meals: &SuggestedMeals,
    catalog: &'c NutritionCatalog,
    exclusions: &[String],
) -> MatchOutcome<'c> {
    let mut selection = Selection::new();
    let mut dropped = Vec::new();

    for meal in meals.iter() {
        for name in &meal.items {
            let reason = if let Some(substring) = excluded_by(name, exclusions) {
                DropReason::Excluded {
                    substring: substring.to_string(),
                }
            } else {
                let key = lookup_key(name);
                match catalog.first_containing(&key) {
                    Some(record) => match excluded_by(&record.name, exclusions) {
                        Some(substring) => DropReason::ExcludedMatch {
                            catalog_name: record.name.clone(),
                            substring: substring.to_string(),
                        },
                        None => {
                            debug!("{}: '{}' -> '{}'", meal.slot, name, record.name);
                            selection.push(SelectionEntry::matched(
                                record,
                                meal.slot,
                                name.clone(),
                            ));
                            continue;
                        }
                    },
                    None => DropReason::NoCatalogMatch { key },
                }
            };

            debug!("{}: dropped '{}' ({:?})", meal.slot, name, reason);
            dropped.push(DroppedSuggestion {
                slot: meal.slot,
                name: name.clone(),
                reason,
            });
        }
    }

    MatchOutcome { selection, dropped }
}

/// Closest catalog names to `name` by Jaro-Winkler similarity, best first.
///
/// Only used for hints on unmatched suggestions; matching never uses it.
pub fn nearest_names<'c>(catalog: &'c NutritionCatalog, name: &str) -> Vec<(&'c str, f64)> {
    let needle = name.to_lowercase();
    let mut candidates: Vec<(&str, f64)> = catalog
        .iter()
        .map(|r| (r.name.as_str(), jaro_winkler(&r.name.to_lowercase(), &needle)))
        .filter(|(_, score)| *score > HINT_SIMILARITY_THRESHOLD)
        .collect();

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates.truncate(MAX_HINTS);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FoodRecord;
    use crate::suggestion::SuggestedMeal;

    fn catalog() -> NutritionCatalog {
        NutritionCatalog::new(vec![
            FoodRecord::new("잡곡밥", 320.0, 68.0, 7.0, 1.5, 0.0, 5.0),
            FoodRecord::new("된장찌개", 150.0, 9.0, 10.0, 7.0, 2.0, 1200.0),
            FoodRecord::new("된장국", 60.0, 5.0, 4.0, 2.0, 1.0, 800.0),
            FoodRecord::new("우유푸딩", 180.0, 25.0, 5.0, 6.0, 20.0, 90.0),
            FoodRecord::new("제육볶음", 420.0, 15.0, 28.0, 27.0, 8.0, 900.0),
        ])
    }

    fn meals(items: &[(MealSlot, &[&str])]) -> SuggestedMeals {
        items
            .iter()
            .map(|(slot, names)| SuggestedMeal {
                slot: *slot,
                items: names.iter().map(|n| n.to_string()).collect(),
            })
            .collect()
    }

    #[test]
    fn test_lookup_key_counts_chars() {
        assert_eq!(lookup_key("된장찌개"), "된장찌");
        assert_eq!(lookup_key("밥"), "밥");
        assert_eq!(lookup_key("Kimchi"), "Kim");
    }

    #[test]
    fn test_first_match_wins() {
        let catalog = catalog();
        // Key "된장" hits 된장찌개 before 된장국.
        let outcome = match_suggestions(
            &meals(&[(MealSlot::Lunch, &["된장"])]),
            &catalog,
            &[],
        );
        assert_eq!(outcome.selection.len(), 1);
        let entry = &outcome.selection.entries()[0];
        assert_eq!(entry.record.name, "된장찌개");
        assert_eq!(entry.slot, Some(MealSlot::Lunch));
        assert_eq!(entry.suggested_name.as_deref(), Some("된장"));
    }

    #[test]
    fn test_excluded_suggestion_is_dropped_without_lookup() {
        let catalog = catalog();
        let outcome = match_suggestions(
            &meals(&[(MealSlot::Breakfast, &["우유푸딩", "잡곡밥"])]),
            &catalog,
            &["우유".to_string()],
        );
        assert_eq!(outcome.selection.len(), 1);
        assert_eq!(
            outcome.dropped[0].reason,
            DropReason::Excluded {
                substring: "우유".to_string()
            }
        );
    }

    #[test]
    fn test_excluded_catalog_hit_is_dropped() {
        let catalog = catalog();
        // "우유푸" itself is not excluded by "푸딩", but its hit is.
        let outcome = match_suggestions(
            &meals(&[(MealSlot::Breakfast, &["우유푸"])]),
            &catalog,
            &["푸딩".to_string()],
        );
        assert!(outcome.is_empty());
        assert!(matches!(
            outcome.dropped[0].reason,
            DropReason::ExcludedMatch { .. }
        ));
    }

    #[test]
    fn test_unmatched_is_dropped() {
        let catalog = catalog();
        let outcome = match_suggestions(
            &meals(&[(MealSlot::Dinner, &["스테이크", "제육볶음"])]),
            &catalog,
            &[],
        );
        assert_eq!(outcome.selection.len(), 1);
        assert_eq!(outcome.dropped.len(), 1);
        assert_eq!(outcome.dropped[0].name, "스테이크");
        assert_eq!(
            outcome.dropped[0].reason,
            DropReason::NoCatalogMatch {
                key: "스테이".to_string()
            }
        );
    }

    #[test]
    fn test_same_record_in_two_slots() {
        let catalog = catalog();
        let outcome = match_suggestions(
            &meals(&[
                (MealSlot::Breakfast, &["잡곡밥"]),
                (MealSlot::Dinner, &["잡곡밥"]),
            ]),
            &catalog,
            &[],
        );
        assert_eq!(outcome.selection.len(), 2);
    }

    #[test]
    fn test_nearest_names() {
        let catalog = NutritionCatalog::new(vec![
            FoodRecord::new("Grilled Salmon", 0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
            FoodRecord::new("Green Salad", 0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
        ]);
        let hints = nearest_names(&catalog, "grilled salmon fillet");
        assert_eq!(hints.first().map(|h| h.0), Some("Grilled Salmon"));
    }
}
