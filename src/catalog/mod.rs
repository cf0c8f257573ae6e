mod manager;
mod persistence;

pub use manager::NutritionCatalog;
pub use persistence::{load_catalog, load_catalog_csv, load_catalog_json, parse_numeric};
