use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::info;

use super::ReconcileResult;
use crate::error::Result;
use crate::io::{ChangeReport, TrsDocument};

/// Configuration for writing the corrected document
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Inserted between the file stem and the extension of the source path
    pub suffix: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            suffix: "_zuzenduta".to_string(),
        }
    }
}

/// Result of the rendering stage
#[derive(Debug)]
pub struct RenderResult {
    pub document_path: PathBuf,
    pub report_path: Option<PathBuf>,
}

/// Derive the output path: `dir/name.ext` becomes `dir/name{suffix}.ext`
pub fn output_path(source: &Path, suffix: &str) -> PathBuf {
    let mut file_name: OsString = source.file_stem().unwrap_or_default().to_os_string();
    file_name.push(suffix);
    if let Some(ext) = source.extension() {
        file_name.push(".");
        file_name.push(ext);
    }
    source.with_file_name(file_name)
}

/// Write the corrected document and, optionally, the JSON change report
///
/// The document is written to `output` when given, otherwise next to the
/// source with the configured suffix.
pub fn execute_render(
    document: &TrsDocument,
    source: &Path,
    output: Option<&Path>,
    report: Option<&Path>,
    result: &ReconcileResult,
    config: &RenderConfig,
) -> Result<RenderResult> {
    let document_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| output_path(source, &config.suffix));

    info!("Writing corrected document to {:?}", document_path);
    document.write_file(&document_path)?;

    let report_path = match report {
        Some(path) => {
            info!("Writing change report to {:?}", path);
            ChangeReport::new(
                source,
                Some(&document_path),
                document.speakers().len(),
                result.counts,
                &result.log,
            )
            .write_json(path)?;
            Some(path.to_path_buf())
        }
        None => None,
    };

    Ok(RenderResult {
        document_path,
        report_path,
    })
}
