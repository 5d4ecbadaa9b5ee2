use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{ReconcileError, Result};
use crate::models::{AccentChange, ChangeCounts, ChangeLog, NameChange, UppercaseOnly};

/// Machine-readable summary of one reconciliation run
#[derive(Debug, Clone, Serialize)]
pub struct ChangeReport {
    /// Document that was reconciled
    pub source: PathBuf,
    /// Corrected document, if one was written
    pub output: Option<PathBuf>,
    /// RFC 3339 timestamp of the run
    pub generated_at: String,
    pub speakers: usize,
    pub counts: ChangeCounts,
    pub name_changes: Vec<NameChange>,
    pub accent_changes: Vec<AccentChange>,
    pub uppercased_only: Vec<UppercaseOnly>,
}

impl ChangeReport {
    pub fn new(
        source: &Path,
        output: Option<&Path>,
        speakers: usize,
        counts: ChangeCounts,
        log: &ChangeLog,
    ) -> Self {
        Self {
            source: source.to_path_buf(),
            output: output.map(Path::to_path_buf),
            generated_at: chrono::Utc::now().to_rfc3339(),
            speakers,
            counts,
            name_changes: log.names.clone(),
            accent_changes: log.accents.clone(),
            uppercased_only: log.uppercased_only.clone(),
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path).map_err(|e| ReconcileError::io(path, e))?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| ReconcileError::io(path, std::io::Error::other(e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let log = ChangeLog {
            names: vec![NameChange {
                position: 0,
                old: "JON".to_string(),
                new: "Jon Smith".to_string(),
            }],
            ..Default::default()
        };
        let counts = ChangeCounts {
            names_changed: 1,
            ..Default::default()
        };
        let report = ChangeReport::new(
            Path::new("interview.trs"),
            Some(Path::new("interview_zuzenduta.trs")),
            3,
            counts,
            &log,
        );
        report.write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["speakers"], 3);
        assert_eq!(value["counts"]["names_changed"], 1);
        assert_eq!(value["name_changes"][0]["new"], "Jon Smith");
        assert_eq!(value["output"], "interview_zuzenduta.trs");
        assert!(value["accent_changes"].as_array().unwrap().is_empty());
        assert!(chrono::DateTime::parse_from_rfc3339(value["generated_at"].as_str().unwrap()).is_ok());
    }
}
