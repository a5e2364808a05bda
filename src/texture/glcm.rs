//! Gray-level co-occurrence texture statistics
//!
//! Builds a normalized, symmetric co-occurrence matrix of the grayscale image
//! for each configured angle at a fixed pixel distance, derives contrast,
//! homogeneity, energy and correlation per angle, and averages them.

use crate::{
    color::ColorConverter, config::TextureConfig, constants::texture, image_loader::LeafImage,
    AnalysisError, Result,
};
use opencv::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

const LEVELS: usize = texture::GRAY_LEVELS;

/// Variance below which a matrix is treated as a single gray level
const VARIANCE_EPSILON: f64 = 1e-12;

/// Texture statistics of one image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureDescriptor {
    /// Σ p(i,j)·(i−j)²; 0 for a flat image
    pub contrast: f64,
    /// Σ p(i,j) / (1 + (i−j)²); 1 for a flat image
    pub homogeneity: f64,
    /// √(Σ p(i,j)²); 1 for a flat image
    pub energy: f64,
    /// Linear dependency of neighbouring gray levels in [-1, 1]
    pub correlation: f64,
}

impl TextureDescriptor {
    /// Statistics of a perfectly uniform image
    pub const fn flat() -> Self {
        Self {
            contrast: 0.0,
            homogeneity: 1.0,
            energy: 1.0,
            correlation: 1.0,
        }
    }
}

/// Supported co-occurrence angles in degrees
fn offset(angle: u32, distance: u32) -> Option<(i64, i64)> {
    let d = distance as i64;
    match angle {
        0 => Some((0, d)),
        45 => Some((-d, d)),
        90 => Some((-d, 0)),
        135 => Some((-d, -d)),
        _ => None,
    }
}

/// Whether an angle is one of 0, 45, 90 or 135 degrees
pub fn is_supported_angle(angle: u32) -> bool {
    offset(angle, 1).is_some()
}

/// Computes co-occurrence texture statistics
#[derive(Debug, Clone)]
pub struct TextureAnalyzer {
    converter: ColorConverter,
    distance: u32,
    angles: Vec<u32>,
}

impl Default for TextureAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureAnalyzer {
    /// Distance 1 at 0° and 45°
    pub fn new() -> Self {
        Self {
            converter: ColorConverter::new(),
            distance: texture::DISTANCE,
            angles: texture::ANGLES.to_vec(),
        }
    }

    /// Create an analyzer with a custom distance and angle set
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidParameter` for a zero distance, an empty
    /// angle list or an angle other than 0, 45, 90 or 135.
    pub fn with_params(distance: u32, angles: Vec<u32>) -> Result<Self> {
        if distance == 0 {
            return Err(AnalysisError::invalid_parameter("texture.distance", distance));
        }
        if angles.is_empty() {
            return Err(AnalysisError::invalid_parameter("texture.angles", "[]"));
        }
        if let Some(bad) = angles.iter().find(|a| !is_supported_angle(**a)) {
            return Err(AnalysisError::invalid_parameter("texture.angles", bad));
        }
        Ok(Self {
            converter: ColorConverter::new(),
            distance,
            angles,
        })
    }

    pub fn from_config(config: &TextureConfig) -> Result<Self> {
        Self::with_params(config.distance, config.angles.clone())
    }

    /// Texture statistics of the image's grayscale rendition
    pub fn analyze(&self, image: &LeafImage) -> Result<TextureDescriptor> {
        let gray = self.converter.gray(image)?;
        let bytes = self.converter.gray_bytes(&gray)?;
        let descriptor = self.analyze_gray(bytes, gray.cols() as usize, gray.rows() as usize);

        debug!(
            contrast = descriptor.contrast,
            homogeneity = descriptor.homogeneity,
            energy = descriptor.energy,
            correlation = descriptor.correlation,
            "Texture analyzed"
        );
        Ok(descriptor)
    }

    /// Texture statistics of a row-major 8-bit grayscale buffer
    ///
    /// Angles with no in-bounds pixel pairs are skipped; if none remain the
    /// image is too small to carry texture and the flat descriptor is returned.
    pub fn analyze_gray(&self, gray: &[u8], width: usize, height: usize) -> TextureDescriptor {
        let per_angle: Vec<TextureDescriptor> = self
            .angles
            .iter()
            .filter_map(|&angle| offset(angle, self.distance))
            .filter_map(|(dr, dc)| cooccurrence(gray, width, height, dr, dc))
            .map(|matrix| statistics(&matrix))
            .collect();

        if per_angle.is_empty() {
            return TextureDescriptor::flat();
        }

        let n = per_angle.len() as f64;
        let sum = |f: fn(&TextureDescriptor) -> f64| per_angle.iter().map(f).sum::<f64>() / n;
        TextureDescriptor {
            contrast: sum(|d| d.contrast),
            homogeneity: sum(|d| d.homogeneity),
            energy: sum(|d| d.energy),
            correlation: sum(|d| d.correlation),
        }
    }
}

/// Normalized symmetric co-occurrence matrix, `None` when no pairs fit
fn cooccurrence(gray: &[u8], width: usize, height: usize, dr: i64, dc: i64) -> Option<Vec<f64>> {
    let mut matrix = vec![0.0f64; LEVELS * LEVELS];
    let mut pairs = 0u64;

    for row in 0..height as i64 {
        let row2 = row + dr;
        if row2 < 0 || row2 >= height as i64 {
            continue;
        }
        for col in 0..width as i64 {
            let col2 = col + dc;
            if col2 < 0 || col2 >= width as i64 {
                continue;
            }
            let i = gray[row as usize * width + col as usize] as usize;
            let j = gray[row2 as usize * width + col2 as usize] as usize;
            matrix[i * LEVELS + j] += 1.0;
            matrix[j * LEVELS + i] += 1.0;
            pairs += 1;
        }
    }

    if pairs == 0 {
        return None;
    }

    let total = (pairs * 2) as f64;
    matrix.iter_mut().for_each(|p| *p /= total);
    Some(matrix)
}

fn statistics(matrix: &[f64]) -> TextureDescriptor {
    let mut contrast = 0.0;
    let mut homogeneity = 0.0;
    let mut asm = 0.0;
    let mut mean = 0.0;

    for i in 0..LEVELS {
        for j in 0..LEVELS {
            let p = matrix[i * LEVELS + j];
            if p == 0.0 {
                continue;
            }
            let diff = i as f64 - j as f64;
            contrast += p * diff * diff;
            homogeneity += p / (1.0 + diff * diff);
            asm += p * p;
            mean += i as f64 * p;
        }
    }

    // Symmetric matrix: row and column marginals are identical
    let mut variance = 0.0;
    let mut covariance = 0.0;
    for i in 0..LEVELS {
        for j in 0..LEVELS {
            let p = matrix[i * LEVELS + j];
            if p == 0.0 {
                continue;
            }
            let di = i as f64 - mean;
            let dj = j as f64 - mean;
            variance += p * di * di;
            covariance += p * di * dj;
        }
    }

    let correlation = if variance < VARIANCE_EPSILON {
        1.0
    } else {
        covariance / variance
    };

    TextureDescriptor {
        contrast,
        homogeneity,
        energy: asm.sqrt(),
        correlation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_flat_image() {
        let leaf = LeafImage::from_rgb(RgbImage::from_pixel(12, 9, Rgb([70, 140, 60]))).unwrap();
        let d = TextureAnalyzer::new().analyze(&leaf).unwrap();
        assert_close(d.contrast, 0.0);
        assert_close(d.homogeneity, 1.0);
        assert_close(d.energy, 1.0);
        assert_close(d.correlation, 1.0);
    }

    #[test]
    fn test_vertical_stripes_horizontal_offset() {
        // Columns alternate 0 / 255
        let (w, h) = (8, 4);
        let gray: Vec<u8> = (0..w * h).map(|k| if (k % w) % 2 == 0 { 0 } else { 255 }).collect();

        let analyzer = TextureAnalyzer::with_params(1, vec![0]).unwrap();
        let d = analyzer.analyze_gray(&gray, w, h);
        assert_close(d.contrast, 255.0 * 255.0);
        assert_close(d.homogeneity, 1.0 / (1.0 + 255.0 * 255.0));
        assert_close(d.energy, 0.5_f64.sqrt());
        assert_close(d.correlation, -1.0);

        // Vertical neighbours share a column, so no variation
        let vertical = TextureAnalyzer::with_params(1, vec![90]).unwrap();
        let d = vertical.analyze_gray(&gray, w, h);
        assert_close(d.contrast, 0.0);
        assert_close(d.homogeneity, 1.0);
    }

    #[test]
    fn test_angles_are_averaged() {
        let (w, h) = (6, 6);
        let gray: Vec<u8> = (0..w * h).map(|k| if (k % w) % 2 == 0 { 0 } else { 10 }).collect();

        let both = TextureAnalyzer::with_params(1, vec![0, 90]).unwrap();
        let d = both.analyze_gray(&gray, w, h);
        assert_close(d.contrast, 50.0);
    }

    #[test]
    fn test_rough_beats_smooth() {
        let (w, h) = (16, 16);
        let smooth: Vec<u8> = (0..w * h).map(|k| (k / w) as u8).collect();
        let rough: Vec<u8> = (0..w * h)
            .map(|k| ((k as u32).wrapping_mul(2_654_435_761) >> 24) as u8)
            .collect();

        let analyzer = TextureAnalyzer::new();
        let s = analyzer.analyze_gray(&smooth, w, h);
        let r = analyzer.analyze_gray(&rough, w, h);
        assert!(r.contrast > s.contrast);
        assert!(r.homogeneity < s.homogeneity);
    }

    #[test]
    fn test_single_pixel_is_flat() {
        let d = TextureAnalyzer::new().analyze_gray(&[42], 1, 1);
        assert_eq!(d, TextureDescriptor::flat());
    }

    #[test]
    fn test_invalid_params() {
        assert!(TextureAnalyzer::with_params(0, vec![0]).is_err());
        assert!(TextureAnalyzer::with_params(1, vec![]).is_err());
        assert!(TextureAnalyzer::with_params(1, vec![30]).is_err());
        assert!(TextureAnalyzer::with_params(2, vec![0, 45, 90, 135]).is_ok());
    }
}
