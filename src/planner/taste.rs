use std::fmt;

use serde::Serialize;

use crate::catalog::NutritionCatalog;
use crate::models::FoodRecord;
use crate::planner::constants::{SALTY_LEVEL_BOUNDS, SWEET_LEVEL_BOUNDS};

/// How salty a food tastes, from its sodium content (mg).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaltyLevel {
    Bland,
    SlightlySalty,
    ModeratelySalty,
    Salty,
    VerySalty,
}

impl SaltyLevel {
    const LEVELS: [SaltyLevel; 5] = [
        SaltyLevel::Bland,
        SaltyLevel::SlightlySalty,
        SaltyLevel::ModeratelySalty,
        SaltyLevel::Salty,
        SaltyLevel::VerySalty,
    ];

    pub fn from_sodium(sodium_mg: f64) -> Self {
        Self::LEVELS[level_index(sodium_mg, &SALTY_LEVEL_BOUNDS)]
    }

    pub fn label(self) -> &'static str {
        match self {
            SaltyLevel::Bland => "bland",
            SaltyLevel::SlightlySalty => "slightly salty",
            SaltyLevel::ModeratelySalty => "moderately salty",
            SaltyLevel::Salty => "salty",
            SaltyLevel::VerySalty => "very salty",
        }
    }
}

impl fmt::Display for SaltyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How sweet a food tastes, from its sugar content (g).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweetLevel {
    BarelySweet,
    SlightlySweet,
    ModeratelySweet,
    QuiteSweet,
    VerySweet,
}

impl SweetLevel {
    const LEVELS: [SweetLevel; 5] = [
        SweetLevel::BarelySweet,
        SweetLevel::SlightlySweet,
        SweetLevel::ModeratelySweet,
        SweetLevel::QuiteSweet,
        SweetLevel::VerySweet,
    ];

    pub fn from_sugar(sugar_g: f64) -> Self {
        Self::LEVELS[level_index(sugar_g, &SWEET_LEVEL_BOUNDS)]
    }

    pub fn label(self) -> &'static str {
        match self {
            SweetLevel::BarelySweet => "barely sweet",
            SweetLevel::SlightlySweet => "slightly sweet",
            SweetLevel::ModeratelySweet => "moderately sweet",
            SweetLevel::QuiteSweet => "quite sweet",
            SweetLevel::VerySweet => "very sweet",
        }
    }
}

impl fmt::Display for SweetLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Index of the first bound strictly above `value`, or the last level.
fn level_index(value: f64, bounds: &[f64; 4]) -> usize {
    bounds
        .iter()
        .position(|&bound| value < bound)
        .unwrap_or(bounds.len())
}

/// `n` records whose `nutrient` is closest to `value`, closest first.
///
/// The sort is stable, so equal distances keep catalog order.
fn closest_by<'c>(
    catalog: &'c NutritionCatalog,
    value: f64,
    n: usize,
    nutrient: impl Fn(&FoodRecord) -> f64,
) -> Vec<&'c FoodRecord> {
    let mut ranked: Vec<(&FoodRecord, f64)> = catalog
        .iter()
        .map(|r| (r, (nutrient(r) - value).abs()))
        .collect();
    ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.into_iter().take(n).map(|(r, _)| r).collect()
}

/// Catalog records with sodium closest to `sodium_mg`.
pub fn similar_by_sodium(catalog: &NutritionCatalog, sodium_mg: f64, n: usize) -> Vec<&FoodRecord> {
    closest_by(catalog, sodium_mg, n, |r| r.sodium)
}

/// Catalog records with sugar closest to `sugar_g`.
pub fn similar_by_sugar(catalog: &NutritionCatalog, sugar_g: f64, n: usize) -> Vec<&FoodRecord> {
    closest_by(catalog, sugar_g, n, |r| r.sugar)
}
