//! Rough/smooth qualification of texture statistics

use super::glcm::TextureDescriptor;
use serde::{Deserialize, Serialize};

/// Coarse surface character derived from texture statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Texture {
    /// High contrast, low uniformity: lesion or fungal growth
    Rough,
    /// Low contrast, high uniformity: discoloration without tissue damage
    Smooth,
}

/// Thresholds that must all hold for a texture to count as rough
///
/// Unset thresholds are ignored. A gate with no thresholds classifies
/// everything as rough.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextureGate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_contrast: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_homogeneity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_energy: Option<f64>,
}

impl TextureGate {
    /// Rough when contrast exceeds `contrast` and homogeneity is below `homogeneity`
    pub const fn contrast_homogeneity(contrast: f64, homogeneity: f64) -> Self {
        Self {
            min_contrast: Some(contrast),
            max_homogeneity: Some(homogeneity),
            max_energy: None,
        }
    }

    /// Rough when contrast exceeds `contrast` and energy is below `energy`
    pub const fn contrast_energy(contrast: f64, energy: f64) -> Self {
        Self {
            min_contrast: Some(contrast),
            max_homogeneity: None,
            max_energy: Some(energy),
        }
    }

    pub fn classify(&self, texture: &TextureDescriptor) -> Texture {
        let rough = self.min_contrast.map_or(true, |t| texture.contrast > t)
            && self.max_homogeneity.map_or(true, |t| texture.homogeneity < t)
            && self.max_energy.map_or(true, |t| texture.energy < t);

        if rough {
            Texture::Rough
        } else {
            Texture::Smooth
        }
    }
}
