//! # Leaf Scan
//!
//! A Rust crate for heuristic screening of plant leaf photos for disease and
//! nutrient deficiency symptoms.
//!
//! This library derives its findings by:
//! - Segmenting the leaf into seven HSV color bands (brown, yellow, purple, ...)
//! - Measuring each band's share of the image
//! - Optionally qualifying the surface texture with co-occurrence statistics
//! - Evaluating a fixed rule table into grouped diagnoses and a soil pH estimate
//!
//! ## Example
//!
//! ```rust,no_run
//! use leaf_scan::{analyze_file, AnalysisResult};
//! use std::path::Path;
//!
//! let result = analyze_file(Path::new("leaf.jpg"))?;
//! println!("Disease probability: {:.2}%", result.disease_probability);
//! println!("{}", result.diagnoses.summary());
//! # Ok::<(), leaf_scan::AnalysisError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

pub mod capture;
pub mod color;
pub mod config;
pub mod constants;
pub mod diagnosis;
pub mod error;
pub mod export;
pub mod image_loader;
pub mod segmentation;
pub mod texture;

pub use config::AnalysisConfig;
pub use diagnosis::{Category, Condition, Diagnoses, DiagnosisEngine, DiagnosisMode, PhStatus};
pub use error::{AnalysisError, Result};
pub use image_loader::{load_image, LeafImage};
pub use segmentation::{Band, BandPercentages, ColorBandSegmenter, Segmentation};
pub use texture::{TextureAnalyzer, TextureDescriptor};

/// Complete leaf analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Share of the image in each color band, 0..=100
    pub percentages: BandPercentages,
    /// Mean of the seven band percentages
    pub disease_probability: f64,
    pub ph_status: PhStatus,
    /// Present only when the diagnosis used texture gates
    pub texture: Option<TextureDescriptor>,
    pub diagnoses: Diagnoses,
}

/// Configured analysis pipeline
///
/// Holds the segmenter, texture analyzer and rule engine built from one
/// [`AnalysisConfig`], so repeated analyses reuse the same parameters.
#[derive(Debug, Clone)]
pub struct LeafAnalyzer {
    segmenter: ColorBandSegmenter,
    texture: TextureAnalyzer,
    engine: DiagnosisEngine,
}

impl Default for LeafAnalyzer {
    fn default() -> Self {
        Self {
            segmenter: ColorBandSegmenter::new(),
            texture: TextureAnalyzer::new(),
            engine: DiagnosisEngine::new(),
        }
    }
}

impl LeafAnalyzer {
    /// Baseline pipeline: raw masks, percentage-only rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the pipeline from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidParameter` if the configuration is out of range.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            segmenter: ColorBandSegmenter::from_config(&config.segmentation),
            texture: TextureAnalyzer::from_config(&config.texture)?,
            engine: DiagnosisEngine::from_config(&config.diagnosis),
        })
    }

    pub fn segmenter(&self) -> &ColorBandSegmenter {
        &self.segmenter
    }

    pub fn engine(&self) -> &DiagnosisEngine {
        &self.engine
    }

    /// Analyze a leaf image
    pub fn analyze(&self, image: &LeafImage) -> Result<AnalysisResult> {
        self.analyze_with_segmentation(image).map(|(result, _)| result)
    }

    /// Analyze a leaf image, also returning the band masks for highlighting
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::OpenCvError` if segmentation or texture conversion fails.
    pub fn analyze_with_segmentation(
        &self,
        image: &LeafImage,
    ) -> Result<(AnalysisResult, Segmentation)> {
        debug!(
            width = image.width(),
            height = image.height(),
            mode = ?self.engine.mode(),
            "Starting leaf analysis"
        );

        let segmentation = self.segmenter.segment(image)?;
        let percentages = segmentation.percentages();

        let texture = if self.engine.requires_texture() {
            Some(self.texture.analyze(image)?)
        } else {
            None
        };

        let diagnoses = self.engine.diagnose(&percentages, texture.as_ref())?;
        let result = AnalysisResult {
            percentages,
            disease_probability: percentages.mean(),
            ph_status: PhStatus::estimate(&percentages),
            texture,
            diagnoses,
        };

        info!(
            disease_probability = result.disease_probability,
            ph = ?result.ph_status,
            findings = result.diagnoses.len(),
            "Leaf analysis complete"
        );
        Ok((result, segmentation))
    }
}

/// Analyze a leaf image with the baseline pipeline
pub fn analyze_leaf(image: &LeafImage) -> Result<AnalysisResult> {
    LeafAnalyzer::new().analyze(image)
}

/// Load and analyze a leaf image file with the baseline pipeline
///
/// This is the main entry point for one-shot analysis.
///
/// # Errors
///
/// Returns `AnalysisError` if:
/// - The file cannot be read or decoded
/// - The image has zero width or height
/// - An OpenCV operation fails
pub fn analyze_file(image_path: &Path) -> Result<AnalysisResult> {
    let image = load_image(image_path)?;
    analyze_leaf(&image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_analysis_result_serialization() {
        let mut diagnoses = Diagnoses::default();
        diagnoses.add(Category::Disease, Condition::PowderyMildew);
        let percentages = BandPercentages::default().with(Band::Gray, 14.0);
        let result = AnalysisResult {
            percentages,
            disease_probability: percentages.mean(),
            ph_status: PhStatus::Normal,
            texture: Some(TextureDescriptor::flat()),
            diagnoses,
        };

        let json = serde_json::to_string(&result).unwrap();
        let deserialized: AnalysisResult = serde_json::from_str(&json).unwrap();

        assert_eq!(result, deserialized);
    }

    #[test]
    fn test_baseline_pipeline_skips_texture() {
        let image = LeafImage::from_rgb(RgbImage::from_pixel(6, 6, Rgb([40, 160, 40]))).unwrap();
        let result = analyze_leaf(&image).unwrap();
        assert!(result.texture.is_none());
        assert_eq!(result.disease_probability, 0.0);
        assert_eq!(result.ph_status, PhStatus::Normal);
        assert!(result.diagnoses.is_empty());
    }

    #[test]
    fn test_refined_pipeline_computes_texture() {
        let analyzer = LeafAnalyzer::from_config(&AnalysisConfig::refined()).unwrap();
        let image = LeafImage::from_rgb(RgbImage::from_pixel(6, 6, Rgb([40, 160, 40]))).unwrap();
        let (result, segmentation) = analyzer.analyze_with_segmentation(&image).unwrap();
        assert_eq!(result.texture, Some(TextureDescriptor::flat()));
        assert_eq!(segmentation.masks().len(), 7);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = AnalysisConfig::refined();
        config.texture.distance = 0;
        assert!(LeafAnalyzer::from_config(&config).is_err());
    }
}
