use std::ops::RangeInclusive;

use log::warn;
use serde::Serialize;

use crate::error::{PlanError, Result};

/// Default relative calorie tolerance (±5%).
pub const DEFAULT_KCAL_TOLERANCE: f64 = 0.05;

/// Default cap on rebalancing iterations.
pub const DEFAULT_MAX_ITERATIONS: usize = 60;

// Outside these only a warning is logged.
const EXPECTED_GOAL_KCAL: RangeInclusive<f64> = 1000.0..=6000.0;
const EXPECTED_RATIO_PERCENT: RangeInclusive<f64> = 10.0..=80.0;

/// Percent of calories coming from each macro.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacroRatio {
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
}

impl MacroRatio {
    pub fn new(carbs: f64, protein: f64, fat: f64) -> Self {
        Self {
            carbs,
            protein,
            fat,
        }
    }

    /// L1 distance between two ratio triples, in percentage points.
    pub fn l1_distance(&self, other: &MacroRatio) -> f64 {
        (self.carbs - other.carbs).abs()
            + (self.protein - other.protein).abs()
            + (self.fat - other.fat).abs()
    }
}

/// What the plan is rebalanced toward.
///
/// The ratio components are independent targets and need not sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Targets {
    pub goal_kcal: f64,
    pub ratio: MacroRatio,
    /// Substrings; any food whose name contains one is never selected.
    pub exclusions: Vec<String>,
    /// Relative calorie tolerance, e.g. 0.05 for ±5%.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            goal_kcal: 2500.0,
            ratio: MacroRatio::new(50.0, 30.0, 20.0),
            exclusions: Vec::new(),
            tolerance: DEFAULT_KCAL_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl Targets {
    pub fn new(goal_kcal: f64, ratio: MacroRatio, exclusions: Vec<String>) -> Self {
        Self {
            goal_kcal,
            ratio,
            exclusions,
            ..Default::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Reject targets the engine cannot work with; warn on unusual but usable ones.
    pub fn validate(&self) -> Result<()> {
        if !self.goal_kcal.is_finite() || self.goal_kcal <= 0.0 {
            return Err(PlanError::InvalidInput(format!(
                "goal kcal must be a positive number, got {}",
                self.goal_kcal
            )));
        }

        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(PlanError::InvalidInput(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }

        let components = [
            ("carbohydrate", self.ratio.carbs),
            ("protein", self.ratio.protein),
            ("fat", self.ratio.fat),
        ];
        for (label, value) in components {
            if !(0.0..=100.0).contains(&value) {
                return Err(PlanError::InvalidInput(format!(
                    "{} ratio must be within 0-100%, got {}",
                    label, value
                )));
            }
            if !EXPECTED_RATIO_PERCENT.contains(&value) {
                warn!("{} ratio {}% is outside the usual range", label, value);
            }
        }

        if !EXPECTED_GOAL_KCAL.contains(&self.goal_kcal) {
            warn!("goal of {} kcal is outside the usual range", self.goal_kcal);
        }

        Ok(())
    }
}

/// Split a comma-delimited exclusion string into trimmed, non-empty substrings.
pub fn parse_exclusions(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exclusions() {
        assert_eq!(
            parse_exclusions("우유, 땅콩,, 새우 ,"),
            vec!["우유".to_string(), "땅콩".to_string(), "새우".to_string()]
        );
        assert!(parse_exclusions("  ").is_empty());
    }

    #[test]
    fn test_l1_distance() {
        let a = MacroRatio::new(50.0, 30.0, 20.0);
        let b = MacroRatio::new(40.0, 35.0, 25.0);
        assert!((a.l1_distance(&b) - 20.0).abs() < 1e-9);
        assert_eq!(a.l1_distance(&a), 0.0);
    }

    #[test]
    fn test_validate() {
        assert!(Targets::default().validate().is_ok());
        assert!(Targets { goal_kcal: 0.0, ..Default::default() }.validate().is_err());
        assert!(Targets { goal_kcal: f64::NAN, ..Default::default() }.validate().is_err());

        let bad_ratio = Targets::new(2000.0, MacroRatio::new(120.0, 30.0, 20.0), vec![]);
        assert!(bad_ratio.validate().is_err());

        // Unusual but usable values only warn.
        let unusual = Targets::new(800.0, MacroRatio::new(5.0, 30.0, 20.0), vec![]);
        assert!(unusual.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let targets = Targets::default();
        assert_eq!(targets.tolerance, 0.05);
        assert_eq!(targets.max_iterations, 60);
    }
}
