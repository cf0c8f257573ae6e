use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use crate::error::{PlanError, Result};

/// Seam for the external text generator.
///
/// The generator is opaque: it receives the prompt and returns free text.
pub trait SuggestionSource {
    /// Short name for logs.
    fn source_name(&self) -> &str;

    fn suggest(&self, prompt: &str) -> Result<String>;
}

/// Generator output saved to a file beforehand.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SuggestionSource for FileSource {
    fn source_name(&self) -> &str {
        "file"
    }

    fn suggest(&self, _prompt: &str) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| {
            PlanError::Suggestion(format!("cannot read {:?}: {}", self.path, e))
        })
    }
}

/// Generator output piped in on standard input.
#[derive(Debug, Clone, Default)]
pub struct StdinSource;

impl SuggestionSource for StdinSource {
    fn source_name(&self) -> &str {
        "stdin"
    }

    fn suggest(&self, _prompt: &str) -> Result<String> {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    }
}

/// Fixed text, for callers that already hold the generator output.
#[derive(Debug, Clone)]
pub struct StaticSource(pub String);

impl SuggestionSource for StaticSource {
    fn source_name(&self) -> &str {
        "static"
    }

    fn suggest(&self, _prompt: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}
