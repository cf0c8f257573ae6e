use std::iter;

use log::{debug, info};
use serde::Serialize;

use crate::catalog::NutritionCatalog;
use crate::models::{FoodRecord, Selection, SelectionEntry, Targets};
use crate::planner::calculations::{Totals, plan_score, totals};
use crate::planner::constants::LARGE_DEFICIT_KCAL;

/// What one rebalancing iteration did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RebalanceAction {
    /// Calories were within tolerance; nothing changed.
    Converged,
    Added { name: String, energy_kcal: f64 },
    Removed { name: String, energy_kcal: f64 },
    /// Under target but every catalog record is selected or excluded.
    PoolExhausted,
    /// Over target with nothing left to remove.
    SelectionEmpty,
}

/// State of the plan at the start of an iteration and the action taken.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationLog {
    /// 1-based.
    pub iteration: usize,
    pub kcal: f64,
    /// Signed relative calorie error.
    pub kcal_error: f64,
    pub ratio_deviation: f64,
    pub action: RebalanceAction,
}

/// Why rebalancing stopped. None of these is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RebalanceStatus {
    Converged,
    IterationCapReached,
    PoolExhausted,
    SelectionEmpty,
}

impl RebalanceStatus {
    pub fn describe(self) -> &'static str {
        match self {
            RebalanceStatus::Converged => "converged within tolerance",
            RebalanceStatus::IterationCapReached => "iteration cap reached (best effort)",
            RebalanceStatus::PoolExhausted => "no candidate left to add (best effort)",
            RebalanceStatus::SelectionEmpty => "nothing left to remove (best effort)",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RebalanceOutcome<'c> {
    pub selection: Selection<'c>,
    pub before: Totals,
    pub after: Totals,
    pub log: Vec<IterationLog>,
    pub status: RebalanceStatus,
}

impl RebalanceOutcome<'_> {
    pub fn is_converged(&self) -> bool {
        self.status == RebalanceStatus::Converged
    }

    /// Number of add/remove actions applied.
    pub fn changes(&self) -> usize {
        self.log
            .iter()
            .filter(|l| {
                matches!(
                    l.action,
                    RebalanceAction::Added { .. } | RebalanceAction::Removed { .. }
                )
            })
            .count()
    }
}

/// Candidate move with the score of the plan after applying it.
#[derive(Debug)]
struct Candidate<T> {
    target: T,
    score: f64,
}

/// Keep the first candidate with the strictly highest score.
fn pick_best<T>(candidates: impl Iterator<Item = Candidate<T>>) -> Option<Candidate<T>> {
    candidates.fold(None, |best: Option<Candidate<T>>, c| match best {
        Some(b) if c.score <= b.score => Some(b),
        _ => Some(c),
    })
}

/// Catalog records that may be added: not selected yet (by name) and not excluded.
///
/// Rebuilt every iteration since the selection changes.
pub fn candidate_pool<'c>(
    catalog: &'c NutritionCatalog,
    selection: &Selection<'c>,
    exclusions: &[String],
) -> Vec<&'c FoodRecord> {
    catalog
        .iter()
        .filter(|r| !selection.contains_name(&r.name))
        .filter(|r| !r.is_excluded(exclusions))
        .collect()
}

/// Put main dishes and rice first when the deficit is large, otherwise keep order.
///
/// The reorder only changes which candidate wins a tie.
fn order_for_deficit(pool: Vec<&FoodRecord>, deficit: f64) -> Vec<&FoodRecord> {
    if deficit <= LARGE_DEFICIT_KCAL {
        return pool;
    }
    let (mut substantial, rest): (Vec<_>, Vec<_>) =
        pool.into_iter().partition(|r| r.category.is_substantial());
    substantial.extend(rest);
    substantial
}

fn best_addition<'c>(
    selection: &Selection<'c>,
    pool: &[&'c FoodRecord],
    targets: &Targets,
) -> Option<Candidate<&'c FoodRecord>> {
    pick_best(pool.iter().map(|&record| {
        let after = totals(selection.records().chain(iter::once(record)));
        Candidate {
            target: record,
            score: plan_score(&after, targets),
        }
    }))
}

fn best_removal(selection: &Selection<'_>, targets: &Targets) -> Option<Candidate<usize>> {
    pick_best((0..selection.len()).map(|idx| {
        let after = totals(
            selection
                .records()
                .enumerate()
                .filter(|(i, _)| *i != idx)
                .map(|(_, r)| r),
        );
        Candidate {
            target: idx,
            score: plan_score(&after, targets),
        }
    }))
}

/// Greedily add or remove one record per iteration until calories are within
/// tolerance of the goal.
///
/// Under the goal, the catalog record whose addition scores best is added;
/// at or over the goal, the entry whose removal scores best is removed.
/// Stops early when no move is possible. Runs at most `max_iterations`
/// iterations.
pub fn rebalance<'c>(
    catalog: &'c NutritionCatalog,
    mut selection: Selection<'c>,
    targets: &Targets,
) -> RebalanceOutcome<'c> {
    let goal = targets.goal_kcal;
    let before = totals(selection.records());
    let mut log = Vec::new();
    let mut stopped = None;

    for iteration in 1..=targets.max_iterations {
        let current = totals(selection.records());
        let kcal_error = current.kcal_error(goal);
        let ratio_deviation = current.ratio_deviation(&targets.ratio);
        debug!(
            "#{} kcal={:.0} ({:+.1}%), ratio_dist={:.1}",
            iteration,
            current.kcal,
            kcal_error * 100.0,
            ratio_deviation
        );

        let action = if kcal_error.abs() <= targets.tolerance {
            stopped = Some(RebalanceStatus::Converged);
            RebalanceAction::Converged
        } else if current.kcal < goal {
            let pool = candidate_pool(catalog, &selection, &targets.exclusions);
            let pool = order_for_deficit(pool, goal - current.kcal);
            match best_addition(&selection, &pool, targets) {
                Some(best) => {
                    debug!("  + {} ({:.0} kcal)", best.target.name, best.target.energy_kcal);
                    selection.push(SelectionEntry::added(best.target));
                    RebalanceAction::Added {
                        name: best.target.name.clone(),
                        energy_kcal: best.target.energy_kcal,
                    }
                }
                None => {
                    stopped = Some(RebalanceStatus::PoolExhausted);
                    RebalanceAction::PoolExhausted
                }
            }
        } else {
            match best_removal(&selection, targets).and_then(|best| selection.remove(best.target)) {
                Some(removed) => {
                    debug!("  - {} ({:.0} kcal)", removed.record.name, removed.record.energy_kcal);
                    RebalanceAction::Removed {
                        name: removed.record.name.clone(),
                        energy_kcal: removed.record.energy_kcal,
                    }
                }
                None => {
                    stopped = Some(RebalanceStatus::SelectionEmpty);
                    RebalanceAction::SelectionEmpty
                }
            }
        };

        log.push(IterationLog {
            iteration,
            kcal: current.kcal,
            kcal_error,
            ratio_deviation,
            action,
        });

        if stopped.is_some() {
            break;
        }
    }

    let after = totals(selection.records());
    // The last applied move may itself have landed within tolerance.
    let status = stopped.unwrap_or(if after.kcal_error(goal).abs() <= targets.tolerance {
        RebalanceStatus::Converged
    } else {
        RebalanceStatus::IterationCapReached
    });

    info!(
        "Rebalancing stopped after {} iteration(s): {} ({:.0} -> {:.0} kcal, goal {:.0})",
        log.len(),
        status.describe(),
        before.kcal,
        after.kcal,
        goal
    );

    RebalanceOutcome {
        selection,
        before,
        after,
        log,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MacroRatio, MealSlot};

    fn record(name: &str, c: f64, p: f64, f: f64) -> FoodRecord {
        let kcal = c * 4.0 + p * 4.0 + f * 9.0;
        FoodRecord::new(name, kcal, c, p, f, 0.0, 0.0)
    }

    fn targets(goal: f64) -> Targets {
        Targets::new(goal, MacroRatio::new(50.0, 30.0, 20.0), vec![])
    }

    #[test]
    fn test_pick_best_keeps_first_on_tie() {
        let best = pick_best(
            vec![
                Candidate { target: "a", score: -1.0 },
                Candidate { target: "b", score: -0.5 },
                Candidate { target: "c", score: -0.5 },
            ]
            .into_iter(),
        );
        assert_eq!(best.unwrap().target, "b");
    }

    #[test]
    fn test_candidate_pool_skips_selected_and_excluded() {
        let catalog = NutritionCatalog::new(vec![
            record("Rice", 60.0, 5.0, 1.0),
            record("Peanut Butter Toast", 30.0, 10.0, 15.0),
            record("Egg Roll", 5.0, 12.0, 10.0),
        ]);
        let mut selection = Selection::new();
        selection.push(SelectionEntry::added(catalog.get("Rice").unwrap()));

        let pool = candidate_pool(&catalog, &selection, &["Peanut".to_string()]);
        let names: Vec<&str> = pool.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Egg Roll"]);
    }

    #[test]
    fn test_order_for_deficit_is_stable_partition() {
        let side = record("Kimchi", 3.0, 1.0, 0.5);
        let main = record("Grilled Pork", 2.0, 25.0, 20.0);
        let rice = record("White Rice", 65.0, 6.0, 1.0);
        let soup = record("Seaweed Soup", 4.0, 3.0, 2.0);
        let pool = vec![&side, &main, &soup, &rice];

        let small = order_for_deficit(pool.clone(), 100.0);
        assert_eq!(small[0].name, "Kimchi");

        let large = order_for_deficit(pool, 800.0);
        let names: Vec<&str> = large.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Grilled Pork", "White Rice", "Kimchi", "Seaweed Soup"]);
    }

    /// Same macros, side dish listed first: only the deficit decides the winner.
    fn tied_catalog() -> NutritionCatalog {
        NutritionCatalog::new(vec![
            record("Kimchi Pancake", 25.0, 0.0, 0.0),
            record("Grilled Pork", 25.0, 0.0, 0.0),
        ])
    }

    #[test]
    fn test_large_deficit_tie_goes_to_main_dish() {
        let catalog = tied_catalog();
        let outcome = rebalance(&catalog, Selection::new(), &targets(2000.0));
        assert!(matches!(
            outcome.log[0].action,
            RebalanceAction::Added { ref name, .. } if name == "Grilled Pork"
        ));
    }

    #[test]
    fn test_small_deficit_tie_goes_to_first_listed() {
        let catalog = tied_catalog();
        let outcome = rebalance(&catalog, Selection::new(), &targets(200.0));
        assert!(matches!(
            outcome.log[0].action,
            RebalanceAction::Added { ref name, .. } if name == "Kimchi Pancake"
        ));
    }

    #[test]
    fn test_adds_until_within_tolerance() {
        // Each block is exactly 500 kcal at a 50/30/20 split.
        let block = |name: &str| record(name, 62.5, 37.5, 100.0 / 9.0);
        let catalog = NutritionCatalog::new(vec![
            block("Block A"),
            block("Block B"),
            block("Block C"),
            block("Block D"),
        ]);
        let outcome = rebalance(&catalog, Selection::new(), &targets(2000.0));

        assert!(outcome.is_converged());
        assert_eq!(outcome.selection.len(), 4);
        assert_eq!(outcome.changes(), 4);
        assert!((outcome.after.kcal - 2000.0).abs() < 1e-6);
        assert_eq!(outcome.log.last().unwrap().action, RebalanceAction::Converged);
        // Added entries carry no meal slot.
        assert!(outcome.selection.entries().iter().all(|e| e.slot.is_none()));
    }

    #[test]
    fn test_removes_when_over_target() {
        let catalog = NutritionCatalog::new(vec![
            record("Fried Chicken", 80.0, 60.0, 60.0), // 1100 kcal
            record("Rice", 100.0, 10.0, 2.0),          // 458 kcal
        ]);

        let mut selection = Selection::new();
        for (name, suggested) in [("Fried Chicken", "chicken"), ("Rice", "rice")] {
            selection.push(SelectionEntry::matched(
                catalog.get(name).unwrap(),
                MealSlot::Lunch,
                suggested.to_string(),
            ));
        }

        let outcome = rebalance(&catalog, selection, &targets(470.0));
        assert!(outcome.is_converged());
        assert_eq!(outcome.selection.len(), 1);
        assert_eq!(outcome.selection.entries()[0].record.name, "Rice");
        assert!(matches!(
            outcome.log[0].action,
            RebalanceAction::Removed { ref name, .. } if name == "Fried Chicken"
        ));
        assert_eq!(outcome.changes(), 1);
    }

    #[test]
    fn test_pool_exhausted() {
        let catalog = NutritionCatalog::new(vec![record("Snack", 10.0, 2.0, 1.0)]);
        let outcome = rebalance(&catalog, Selection::new(), &targets(2000.0));
        assert_eq!(outcome.status, RebalanceStatus::PoolExhausted);
        assert_eq!(outcome.selection.len(), 1);
        assert_eq!(outcome.log.last().unwrap().action, RebalanceAction::PoolExhausted);
    }

    #[test]
    fn test_iteration_cap() {
        let catalog = NutritionCatalog::new(
            (0..20).map(|i| record(&format!("Snack {i}"), 10.0, 2.0, 1.0)).collect(),
        );
        let outcome = rebalance(
            &catalog,
            Selection::new(),
            &targets(2000.0).with_max_iterations(3),
        );
        assert_eq!(outcome.status, RebalanceStatus::IterationCapReached);
        assert_eq!(outcome.log.len(), 3);
        assert_eq!(outcome.selection.len(), 3);
    }

    #[test]
    fn test_empty_selection_at_zero_goal() {
        let catalog = NutritionCatalog::new(vec![record("Rice", 60.0, 5.0, 1.0)]);
        let outcome = rebalance(&catalog, Selection::new(), &targets(0.0).with_tolerance(-1.0));
        assert_eq!(outcome.status, RebalanceStatus::SelectionEmpty);
        assert!(outcome.selection.is_empty());
    }
}
