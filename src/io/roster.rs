use std::path::Path;

use tracing::{debug, info};

use crate::error::{ReconcileError, Result};
use crate::models::RosterRow;

/// Configuration for reading the roster CSV
#[derive(Debug, Clone)]
pub struct RosterConfig {
    /// Field delimiter
    pub delimiter: u8,
    /// Column holding the raw name as it appears in documents
    pub name_column: String,
    /// Column holding the canonical display name
    pub canonical_column: String,
    /// Optional column holding the accent tag
    pub accent_column: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            delimiter: b';',
            name_column: "name".to_string(),
            canonical_column: "correct name".to_string(),
            accent_column: "accent".to_string(),
        }
    }
}

/// Read roster rows from a CSV file
pub fn read_roster_file(path: &Path, config: &RosterConfig) -> Result<Vec<RosterRow>> {
    let content = std::fs::read_to_string(path).map_err(|e| ReconcileError::io(path, e))?;
    let rows = parse_roster(&content, config)?;
    info!("Loaded {} roster rows from {:?}", rows.len(), path);
    Ok(rows)
}

/// Parse roster rows from CSV text
///
/// Fields are trimmed and a blank accent becomes the empty string. Rows with a
/// blank raw or canonical name are skipped.
pub fn parse_roster(content: &str, config: &RosterConfig) -> Result<Vec<RosterRow>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let position = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let required = |name: &str| {
        position(name).ok_or_else(|| ReconcileError::RosterFormat {
            column: name.to_string(),
        })
    };

    let name_idx = required(&config.name_column)?;
    let canonical_idx = required(&config.canonical_column)?;
    let accent_idx = position(&config.accent_column);

    let mut rows = Vec::new();

    for (line, record) in reader.records().enumerate() {
        let record = record?;

        let raw_name = record.get(name_idx).unwrap_or("").trim();
        let canonical = record.get(canonical_idx).unwrap_or("").trim();
        let accent = accent_idx
            .and_then(|i| record.get(i))
            .unwrap_or("")
            .trim();

        if raw_name.is_empty() || canonical.is_empty() {
            debug!("Skipping roster row {} with blank name", line + 2);
            continue;
        }

        rows.push(RosterRow::new(raw_name, canonical, accent));
    }

    Ok(rows)
}
