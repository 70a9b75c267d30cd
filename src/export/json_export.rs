//! JSON snapshot export of a treatment result.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use crate::treatment::{TreatmentRequest, TreatmentResult};

/// Full snapshot structure
#[derive(Debug, Clone, Serialize)]
pub struct ResultExport<'a> {
    /// Export timestamp
    pub exported_at: String,
    /// Export version for compatibility
    pub version: &'static str,
    pub request: &'a TreatmentRequest,
    pub result: &'a TreatmentResult,
}

impl<'a> ResultExport<'a> {
    fn now(request: &'a TreatmentRequest, result: &'a TreatmentResult) -> Self {
        Self {
            exported_at: Local::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
            request,
            result,
        }
    }
}

/// Export a result into `dir`
///
/// Creates the directory if it doesn't exist.
/// Filename is auto-generated with timestamp: `plan_YYYYMMDD_HHMMSS.json`
///
/// Returns the path to the saved JSON file.
pub fn export_result_json(
    dir: &Path,
    request: &TreatmentRequest,
    result: &TreatmentResult,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let filename = format!("plan_{}.json", Local::now().format("%Y%m%d_%H%M%S"));
    let path = dir.join(filename);
    export_result_json_to(&path, request, result)?;
    Ok(path)
}

/// Export a result to a specific file
pub fn export_result_json_to(
    path: &Path,
    request: &TreatmentRequest,
    result: &TreatmentResult,
) -> Result<()> {
    let export = ResultExport::now(request, result);

    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &export)?;

    log::info!("JSON result exported: {}", path.display());
    Ok(())
}
