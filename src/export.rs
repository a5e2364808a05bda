//! Tabular export of analysis results
//!
//! Each export writes one timestamped CSV file holding a single record.
//! Texture columns stay empty when the analysis ran without texture.

use crate::{constants::export, diagnosis::PhStatus, AnalysisError, AnalysisResult, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// One exported row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub timestamp: String,
    pub disease_probability: f64,
    pub ph_status: String,
    pub diagnoses: String,
    pub contrast: Option<f64>,
    pub homogeneity: Option<f64>,
    pub energy: Option<f64>,
    pub correlation: Option<f64>,
}

impl ExportRecord {
    pub fn from_result(result: &AnalysisResult, timestamp: &str) -> Self {
        let texture = result.texture;
        Self {
            timestamp: timestamp.to_string(),
            disease_probability: result.disease_probability,
            ph_status: result.ph_status.label().to_string(),
            diagnoses: result.diagnoses.summary(),
            contrast: texture.map(|t| t.contrast),
            homogeneity: texture.map(|t| t.homogeneity),
            energy: texture.map(|t| t.energy),
            correlation: texture.map(|t| t.correlation),
        }
    }

    /// Parse the exported pH label back into a status
    pub fn ph(&self) -> Result<PhStatus> {
        self.ph_status.parse()
    }
}

/// Current local time in export format, e.g. `20240315_142501`
pub fn timestamp_now() -> String {
    Local::now().format(export::TIMESTAMP_FORMAT).to_string()
}

/// `leaf_analysis_<timestamp>.csv`
pub fn export_file_name(timestamp: &str) -> String {
    format!("{}_{}.csv", export::FILE_PREFIX, timestamp)
}

/// Write `result` to `dir/leaf_analysis_<timestamp>.csv`, creating `dir` if needed
///
/// # Errors
///
/// Returns `AnalysisError::ExportError` if the directory or file cannot be written.
/// The analysis itself stays valid.
pub fn export_csv(result: &AnalysisResult, dir: &Path, timestamp: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .map_err(|e| AnalysisError::export(dir, "Failed to create output directory", e))?;

    let path = dir.join(export_file_name(timestamp));
    let mut writer = csv::Writer::from_path(&path)
        .map_err(|e| AnalysisError::export(&path, "Failed to create file", e))?;

    writer
        .serialize(ExportRecord::from_result(result, timestamp))
        .map_err(|e| AnalysisError::export(&path, "Failed to write record", e))?;
    writer
        .flush()
        .map_err(|e| AnalysisError::export(&path, "Failed to flush file", e))?;

    info!(path = %path.display(), "Analysis exported");
    Ok(path)
}

/// Read the record of a file written by [`export_csv`]
pub fn read_csv(path: &Path) -> Result<ExportRecord> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| AnalysisError::export(path, "Failed to open file", e))?;

    match reader.deserialize().next() {
        Some(record) => record.map_err(|e| AnalysisError::export(path, "Malformed record", e)),
        None => Err(AnalysisError::ExportError {
            path: path.to_path_buf(),
            message: "File holds no record".to_string(),
            source: None,
        }),
    }
}
