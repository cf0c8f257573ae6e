use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::session::{PlanReport, SelectionRow};

/// Round a float to n decimal places.
fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Write selection rows to a CSV file.
pub fn write_selection_csv(rows: &[SelectionRow], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "slot",
        "suggested_name",
        "name",
        "category",
        "energy_kcal",
        "carbohydrate_g",
        "protein_g",
        "fat_g",
    ])?;

    for row in rows {
        wtr.write_record([
            row.slot.map(|s| s.label()).unwrap_or("").to_string(),
            row.suggested_name.clone().unwrap_or_default(),
            row.catalog_name.clone(),
            row.category.label().to_string(),
            format!("{:.1}", row.energy_kcal),
            format!("{:.1}", row.carbs),
            format!("{:.1}", row.protein),
            format!("{:.1}", row.fat),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the full report as pretty JSON, with a rounded summary block on top.
pub fn write_report_json(report: &PlanReport, path: &Path) -> Result<()> {
    let json = serde_json::json!({
        "summary": {
            "status": report.status.describe(),
            "goal_kcal": report.targets.goal_kcal,
            "before_kcal": round_to(report.before.kcal, 1),
            "after_kcal": round_to(report.after.kcal, 1),
            "before_kcal_error": round_to(report.before_kcal_error, 4),
            "after_kcal_error": round_to(report.after_kcal_error, 4),
            "items": report.selection.len(),
            "iterations": report.log.len(),
        },
        "report": report,
    });

    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(&json)?.as_bytes())?;
    Ok(())
}
