use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use log::{debug, info};
use serde::Deserialize;

use crate::catalog::NutritionCatalog;
use crate::error::{PlanError, Result};
use crate::models::FoodRecord;

// Accepted header names per column (Korean food DB headers first).
const NAME_COLS: &[&str] = &["식품명", "name"];
const ENERGY_COLS: &[&str] = &["에너지(kcal)", "energy_kcal", "kcal"];
const CARB_COLS: &[&str] = &["탄수화물(g)", "carbohydrate_g", "carbs"];
const PROTEIN_COLS: &[&str] = &["단백질(g)", "protein_g", "protein"];
const FAT_COLS: &[&str] = &["지방(g)", "fat_g", "fat"];
const SUGAR_COLS: &[&str] = &["당류(g)", "sugar_g", "sugar"];
const SODIUM_COLS: &[&str] = &["나트륨(mg)", "sodium_mg", "sodium"];

/// Coerce a table cell to a number; blanks, "-" and junk become 0.
pub fn parse_numeric(cell: &str) -> f64 {
    let cell = cell.trim().replace(',', "");
    cell.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Load a catalog, picking the reader from the file extension (`csv` or `json`).
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<NutritionCatalog> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => load_catalog_csv(path),
        "json" => load_catalog_json(path),
        other => Err(PlanError::UnsupportedFormat(if other.is_empty() {
            format!("{:?} has no extension", path)
        } else {
            other.to_string()
        })),
    }
}

fn column_index(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim().trim_start_matches('\u{feff}');
        names.iter().any(|n| h.eq_ignore_ascii_case(n))
    })
}

fn required_column(headers: &StringRecord, names: &[&str]) -> Result<usize> {
    column_index(headers, names).ok_or_else(|| PlanError::MissingColumn(names[0].to_string()))
}

/// Load a catalog from a CSV file with a header row.
///
/// Rows without a name are skipped; repeated names keep the first row.
pub fn load_catalog_csv<P: AsRef<Path>>(path: P) -> Result<NutritionCatalog> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let headers = rdr.headers()?.clone();

    let name_idx = required_column(&headers, NAME_COLS)?;
    let energy_idx = required_column(&headers, ENERGY_COLS)?;
    let carb_idx = required_column(&headers, CARB_COLS)?;
    let protein_idx = required_column(&headers, PROTEIN_COLS)?;
    let fat_idx = required_column(&headers, FAT_COLS)?;
    let sugar_idx = column_index(&headers, SUGAR_COLS);
    let sodium_idx = column_index(&headers, SODIUM_COLS);

    let cell = |row: &StringRecord, idx: Option<usize>| -> f64 {
        idx.and_then(|i| row.get(i)).map(parse_numeric).unwrap_or(0.0)
    };

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for result in rdr.records() {
        let row = result?;
        let name = row.get(name_idx).map(str::trim).unwrap_or_default();
        if name.is_empty() {
            skipped += 1;
            continue;
        }

        records.push(FoodRecord::new(
            name,
            cell(&row, Some(energy_idx)),
            cell(&row, Some(carb_idx)),
            cell(&row, Some(protein_idx)),
            cell(&row, Some(fat_idx)),
            cell(&row, sugar_idx),
            cell(&row, sodium_idx),
        ));
    }

    finish(path, records, skipped)
}

/// A JSON cell that may hold a number or a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Lenient {
    Number(f64),
    Text(String),
}

impl Lenient {
    fn value(&self) -> f64 {
        match self {
            Lenient::Number(n) if n.is_finite() => *n,
            Lenient::Number(_) => 0.0,
            Lenient::Text(s) => parse_numeric(s),
        }
    }
}

fn lenient(v: Option<&Lenient>) -> f64 {
    v.map_or(0.0, Lenient::value)
}

/// Each column may appear under its long or short key; the long key wins.
#[derive(Debug, Deserialize)]
struct JsonRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    energy_kcal: Option<Lenient>,
    #[serde(default)]
    kcal: Option<Lenient>,
    #[serde(default)]
    carbohydrate_g: Option<Lenient>,
    #[serde(default)]
    carbs: Option<Lenient>,
    #[serde(default)]
    protein_g: Option<Lenient>,
    #[serde(default)]
    protein: Option<Lenient>,
    #[serde(default)]
    fat_g: Option<Lenient>,
    #[serde(default)]
    fat: Option<Lenient>,
    #[serde(default)]
    sugar_g: Option<Lenient>,
    #[serde(default)]
    sugar: Option<Lenient>,
    #[serde(default)]
    sodium_mg: Option<Lenient>,
    #[serde(default)]
    sodium: Option<Lenient>,
}

/// Load a catalog from a JSON array of food objects.
pub fn load_catalog_json<P: AsRef<Path>>(path: P) -> Result<NutritionCatalog> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let raw: Vec<JsonRecord> = serde_json::from_str(&content)?;

    let mut records = Vec::with_capacity(raw.len());
    let mut skipped = 0usize;
    for item in raw {
        let name = item.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            skipped += 1;
            continue;
        }
        records.push(FoodRecord::new(
            name,
            lenient(item.energy_kcal.as_ref().or(item.kcal.as_ref())),
            lenient(item.carbohydrate_g.as_ref().or(item.carbs.as_ref())),
            lenient(item.protein_g.as_ref().or(item.protein.as_ref())),
            lenient(item.fat_g.as_ref().or(item.fat.as_ref())),
            lenient(item.sugar_g.as_ref().or(item.sugar.as_ref())),
            lenient(item.sodium_mg.as_ref().or(item.sodium.as_ref())),
        ));
    }

    finish(path, records, skipped)
}

fn finish(path: &Path, records: Vec<FoodRecord>, skipped: usize) -> Result<NutritionCatalog> {
    let row_count = records.len();
    let catalog = NutritionCatalog::new(records);
    if catalog.is_empty() {
        return Err(PlanError::EmptyCatalog(path.to_path_buf()));
    }

    let duplicates = row_count - catalog.len();
    info!(
        "Loaded {} food records from {:?} ({} unnamed, {} duplicate rows skipped)",
        catalog.len(),
        path,
        skipped,
        duplicates
    );
    for (category, count) in catalog.category_counts() {
        debug!("  {}: {}", category, count);
    }

    Ok(catalog)
}
