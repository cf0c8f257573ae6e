use serde::Serialize;

use crate::models::food::{KCAL_PER_G_CARB, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN};
use crate::models::{FoodRecord, MacroRatio, Targets};
use crate::planner::constants::{KCAL_ERROR_WEIGHT, RATIO_DEVIATION_SCALE, RATIO_ERROR_WEIGHT};

/// Macro totals over a set of records.
///
/// `kcal` is always derived from the gram totals (4/4/9), never from the
/// records' own energy field, so calorie and ratio errors share one basis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub kcal: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
    pub ratio: MacroRatio,
}

impl Totals {
    /// Signed calorie error relative to the goal, e.g. -0.1 for 10% under.
    pub fn kcal_error(&self, goal_kcal: f64) -> f64 {
        relative_kcal_error(self.kcal, goal_kcal)
    }

    /// L1 distance of this ratio from the target ratio, in percentage points.
    pub fn ratio_deviation(&self, target: &MacroRatio) -> f64 {
        self.ratio.l1_distance(target)
    }
}

/// Sum macros over `records` and derive calories and the calorie ratio.
///
/// An empty input gives all-zero totals.
pub fn totals<'a, I>(records: I) -> Totals
where
    I: IntoIterator<Item = &'a FoodRecord>,
{
    let (carbs, protein, fat) = records
        .into_iter()
        .fold((0.0, 0.0, 0.0), |(c, p, f), r| {
            (c + r.carbs, p + r.protein, f + r.fat)
        });

    let carb_kcal = carbs * KCAL_PER_G_CARB;
    let protein_kcal = protein * KCAL_PER_G_PROTEIN;
    let fat_kcal = fat * KCAL_PER_G_FAT;
    let kcal = carb_kcal + protein_kcal + fat_kcal;

    let ratio = if kcal != 0.0 {
        MacroRatio::new(
            carb_kcal / kcal * 100.0,
            protein_kcal / kcal * 100.0,
            fat_kcal / kcal * 100.0,
        )
    } else {
        MacroRatio::default()
    };

    Totals {
        kcal,
        carbs,
        protein,
        fat,
        ratio,
    }
}

/// `(kcal - goal) / goal`, with the goal floored at 1 kcal.
#[inline]
pub fn relative_kcal_error(kcal: f64, goal_kcal: f64) -> f64 {
    (kcal - goal_kcal) / goal_kcal.max(1.0)
}

/// Score of a hypothetical plan; higher is better, 0 is a perfect hit.
///
/// -(0.7 * |kcal error| + 0.3 * ratio deviation / 300)
pub fn plan_score(totals: &Totals, targets: &Targets) -> f64 {
    let kcal_err = totals.kcal_error(targets.goal_kcal).abs();
    let ratio_err = totals.ratio_deviation(&targets.ratio) / RATIO_DEVIATION_SCALE;
    -(kcal_err * KCAL_ERROR_WEIGHT + ratio_err * RATIO_ERROR_WEIGHT)
}
