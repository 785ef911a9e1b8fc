//! Verse-record artifact loading.
//!
//! Two formats are accepted, chosen by extension:
//! - `.toml`: a top-level `verses` array of tables
//! - `.json`: a top-level array of records

use crate::types::VerseRecord;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use verse_core::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct TomlRecords {
    #[serde(default)]
    verses: Vec<VerseRecord>,
}

/// Load the ordered verse records for a corpus.
///
/// Position `i` in the returned vector corresponds to row `i` of the
/// corpus vector index.
pub fn load_records(path: &Path) -> AppResult<Vec<VerseRecord>> {
    let contents = fs::read_to_string(path).map_err(|e| {
        AppError::Knowledge(format!("Failed to read verse records {:?}: {}", path, e))
    })?;

    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());

    let records = match extension.as_deref() {
        Some("toml") => parse_toml_records(&contents),
        Some("json") => parse_json_records(&contents),
        _ => {
            return Err(AppError::Config(format!(
                "Unsupported verse-record format {:?}: expected .toml or .json",
                path
            )))
        }
    }
    .map_err(|e| AppError::Knowledge(format!("Invalid verse records {:?}: {}", path, e)))?;

    tracing::debug!("Loaded {} verse records from {:?}", records.len(), path);
    Ok(records)
}

fn parse_toml_records(contents: &str) -> AppResult<Vec<VerseRecord>> {
    let parsed: TomlRecords = toml::from_str(contents)?;
    Ok(parsed.verses)
}

fn parse_json_records(contents: &str) -> AppResult<Vec<VerseRecord>> {
    Ok(serde_json::from_str(contents)?)
}
