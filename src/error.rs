use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the roster or the transcription document
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The roster is missing a required column
    #[error("roster is missing required column '{column}'")]
    RosterFormat { column: String },

    /// The document has no speaker collection to reconcile
    #[error("document structure error: {0}")]
    DocumentStructure(String),

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("failed to serialize XML: {0}")]
    Write(#[from] std::io::Error),

    #[error("unsupported document encoding: {0}")]
    Encoding(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReconcileError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReconcileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_format_message() {
        let err = ReconcileError::RosterFormat {
            column: "correct name".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "roster is missing required column 'correct name'"
        );
    }
}
