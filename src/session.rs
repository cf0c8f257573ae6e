use log::{info, warn};
use serde::Serialize;

use crate::catalog::NutritionCatalog;
use crate::error::Result;
use crate::models::{Category, MealSlot, SelectionEntry, Targets};
use crate::planner::{
    DroppedSuggestion, IterationLog, RebalanceStatus, Totals, match_suggestions, rebalance,
    relative_kcal_error, totals,
};
use crate::suggestion::{
    AnnotatedMeal, SuggestedMeals, SuggestionSource, build_prompt, parse_meal_annotations,
    parse_meal_items,
};

/// How far the pipeline got.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// The text named no meal slot with usable items.
    NoItemsParsed,
    /// Items were parsed but none resolved to an allowed catalog record.
    NoMatches,
    Planned(RebalanceStatus),
}

impl PlanStatus {
    pub fn describe(self) -> &'static str {
        match self {
            PlanStatus::NoItemsParsed => "no meal items could be parsed from the suggestion",
            PlanStatus::NoMatches => "no suggested item matched the catalog",
            PlanStatus::Planned(status) => status.describe(),
        }
    }
}

/// Owned copy of a selection entry for reports and exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionRow {
    /// None for records added while rebalancing.
    pub slot: Option<MealSlot>,
    pub suggested_name: Option<String>,
    pub catalog_name: String,
    pub category: Category,
    pub energy_kcal: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
}

impl From<&SelectionEntry<'_>> for SelectionRow {
    fn from(entry: &SelectionEntry<'_>) -> Self {
        Self {
            slot: entry.slot,
            suggested_name: entry.suggested_name.clone(),
            catalog_name: entry.record.name.clone(),
            category: entry.record.category,
            energy_kcal: entry.record.energy_kcal,
            carbs: entry.record.carbs,
            protein: entry.record.protein,
            fat: entry.record.fat,
        }
    }
}

/// Everything one plan run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    pub status: PlanStatus,
    pub targets: Targets,
    pub suggested: SuggestedMeals,
    /// Nutrients the generator claimed, with a total row.
    pub annotations: Vec<AnnotatedMeal>,
    pub dropped: Vec<DroppedSuggestion>,
    /// Selection straight from matching, before rebalancing.
    pub matched: Vec<SelectionRow>,
    /// Selection after rebalancing.
    pub selection: Vec<SelectionRow>,
    pub before: Totals,
    pub before_kcal_error: f64,
    pub after: Totals,
    pub after_kcal_error: f64,
    pub log: Vec<IterationLog>,
}

impl PlanReport {
    fn unplanned(
        status: PlanStatus,
        targets: &Targets,
        suggested: SuggestedMeals,
        annotations: Vec<AnnotatedMeal>,
        dropped: Vec<DroppedSuggestion>,
    ) -> Self {
        let error = relative_kcal_error(0.0, targets.goal_kcal);
        Self {
            status,
            targets: targets.clone(),
            suggested,
            annotations,
            dropped,
            matched: Vec::new(),
            selection: Vec::new(),
            before: Totals::default(),
            before_kcal_error: error,
            after: Totals::default(),
            after_kcal_error: error,
            log: Vec::new(),
        }
    }

    pub fn is_planned(&self) -> bool {
        matches!(self.status, PlanStatus::Planned(_))
    }
}

/// Parse, match and rebalance one block of generator text.
///
/// Never fails: unusable text yields a report with a non-planned status.
pub fn plan_text(catalog: &NutritionCatalog, text: &str, targets: &Targets) -> PlanReport {
    let suggested = parse_meal_items(text);
    let annotations = parse_meal_annotations(text);

    if suggested.item_count() == 0 {
        info!("No meal items parsed from {} chars of text", text.len());
        return PlanReport::unplanned(
            PlanStatus::NoItemsParsed,
            targets,
            suggested,
            annotations,
            Vec::new(),
        );
    }

    let matched = match_suggestions(&suggested, catalog, &targets.exclusions);
    info!(
        "Matched {} of {} suggested items",
        matched.selection.len(),
        suggested.item_count()
    );

    if matched.is_empty() {
        return PlanReport::unplanned(
            PlanStatus::NoMatches,
            targets,
            suggested,
            annotations,
            matched.dropped,
        );
    }

    let matched_rows: Vec<SelectionRow> =
        matched.selection.entries().iter().map(SelectionRow::from).collect();
    let outcome = rebalance(catalog, matched.selection, targets);
    let after = totals(outcome.selection.records());

    PlanReport {
        status: PlanStatus::Planned(outcome.status),
        targets: targets.clone(),
        suggested,
        annotations,
        dropped: matched.dropped,
        matched: matched_rows,
        selection: outcome.selection.entries().iter().map(SelectionRow::from).collect(),
        before_kcal_error: outcome.before.kcal_error(targets.goal_kcal),
        before: outcome.before,
        after_kcal_error: after.kcal_error(targets.goal_kcal),
        after,
        log: outcome.log,
    }
}

/// Caller inputs plus the most recent result.
#[derive(Debug, Clone, Default)]
pub struct PlanSession {
    targets: Targets,
    last_text: Option<String>,
    last_report: Option<PlanReport>,
}

impl PlanSession {
    pub fn new(targets: Targets) -> Self {
        Self {
            targets,
            ..Default::default()
        }
    }

    pub fn targets(&self) -> &Targets {
        &self.targets
    }

    /// Raw text of the most recent run.
    pub fn last_text(&self) -> Option<&str> {
        self.last_text.as_deref()
    }

    pub fn last_report(&self) -> Option<&PlanReport> {
        self.last_report.as_ref()
    }

    /// Ask `source` for a plan and run the pipeline on its answer.
    ///
    /// A failing source counts as empty text, so the report says nothing was parsed.
    pub fn run(
        &mut self,
        catalog: &NutritionCatalog,
        source: &dyn SuggestionSource,
    ) -> Result<&PlanReport> {
        self.targets.validate()?;
        let prompt = build_prompt(&self.targets);
        let text = source.suggest(&prompt).unwrap_or_else(|e| {
            warn!("{} source failed: {}", source.source_name(), e);
            String::new()
        });
        self.run_text(catalog, &text)
    }

    /// Run the pipeline on text the caller already has.
    pub fn run_text(&mut self, catalog: &NutritionCatalog, text: &str) -> Result<&PlanReport> {
        self.targets.validate()?;
        let report = plan_text(catalog, text, &self.targets);
        info!("Plan run finished: {}", report.status.describe());
        self.last_text = Some(text.to_string());
        Ok(self.last_report.insert(report))
    }

    /// Forget the last text and report; targets stay.
    pub fn clear_results(&mut self) {
        self.last_text = None;
        self.last_report = None;
    }
}
