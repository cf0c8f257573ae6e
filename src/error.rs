use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Column '{0}' not found in catalog")]
    MissingColumn(String),

    #[error("No usable food records in {0:?}")]
    EmptyCatalog(PathBuf),

    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(String),

    #[error("Suggestion source failed: {0}")]
    Suggestion(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
