//! Configuration structures for the leaf analysis pipeline.
//!
//! This module defines all tunable parameters for leaf analysis, organized
//! into groups for segmentation, texture, diagnosis and export.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use leaf_scan::AnalysisConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = AnalysisConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use the texture-gated defaults
//! let config = AnalysisConfig::refined();
//! # Ok::<(), leaf_scan::AnalysisError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`SegmentationConfig`]: HSV band table and morphological cleanup
//! - [`TextureConfig`]: Co-occurrence distance and angles
//! - [`DiagnosisConfig`]: Rule table mode and texture gates
//! - [`ExportConfig`]: CSV output location

use crate::{
    constants::{morphology, texture},
    diagnosis::{DiagnosisMode, TextureGates},
    segmentation::{Band, BandThresholds},
    texture::glcm::is_supported_angle,
    AnalysisError, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete pipeline configuration for leaf analysis.
///
/// Can be serialized to/from JSON for reproducible runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub segmentation: SegmentationConfig,

    /// Texture statistics are only computed when the diagnosis needs them
    pub texture: TextureConfig,

    pub diagnosis: DiagnosisConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Band segmentation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Open then close each band mask to suppress speckle
    pub morphology: bool,

    /// Structuring element side length (odd, positive)
    pub kernel_size: i32,

    /// Inclusive HSV bounds per band
    #[serde(default)]
    pub bands: BandThresholds,
}

/// Gray-level co-occurrence parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureConfig {
    /// Pixel distance between co-occurring pairs
    pub distance: u32,

    /// Angles in degrees: any of 0, 45, 90, 135
    pub angles: Vec<u32>,
}

/// Diagnosis rule parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisConfig {
    pub mode: DiagnosisMode,

    /// Rough/smooth gates for the brown, gray and dark-brown triggers
    #[serde(default)]
    pub texture_gates: TextureGates,
}

/// CSV export parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving `leaf_analysis_<timestamp>.csv` files
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("results"),
        }
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            distance: texture::DISTANCE,
            angles: texture::ANGLES.to_vec(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::baseline()
    }
}

impl AnalysisConfig {
    /// Percentage-only rules on raw masks
    pub fn baseline() -> Self {
        Self {
            segmentation: SegmentationConfig {
                morphology: false,
                kernel_size: morphology::KERNEL_SIZE,
                bands: BandThresholds::default(),
            },
            texture: TextureConfig::default(),
            diagnosis: DiagnosisConfig {
                mode: DiagnosisMode::Baseline,
                texture_gates: TextureGates::default(),
            },
            export: ExportConfig::default(),
        }
    }

    /// Morphological cleanup and texture-gated disease rules
    pub fn refined() -> Self {
        let mut config = Self::baseline();
        config.segmentation.morphology = true;
        config.diagnosis.mode = DiagnosisMode::Refined;
        config
    }

    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidParameter` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let k = self.segmentation.kernel_size;
        if k <= 0 || k % 2 == 0 {
            return Err(AnalysisError::invalid_parameter("segmentation.kernel_size", k));
        }

        for band in Band::ALL {
            let range = self.segmentation.bands.get(band);
            if !range.is_ordered() {
                return Err(AnalysisError::invalid_parameter(
                    format!("segmentation.bands.{}", band),
                    format!("{:?}..{:?}", range.lower, range.upper),
                ));
            }
        }

        if self.texture.distance == 0 {
            return Err(AnalysisError::invalid_parameter("texture.distance", 0));
        }
        if self.texture.angles.is_empty() {
            return Err(AnalysisError::invalid_parameter("texture.angles", "[]"));
        }
        if let Some(angle) = self.texture.angles.iter().find(|a| !is_supported_angle(**a)) {
            return Err(AnalysisError::invalid_parameter("texture.angles", angle));
        }

        Ok(())
    }

    /// Load and validate configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::config(format!("Failed to read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            AnalysisError::config(format!("Failed to parse {}", path.display()), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            AnalysisError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }
}
