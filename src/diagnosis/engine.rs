//! Rule evaluation over band percentages and texture statistics

use super::{
    findings::Diagnoses,
    rules::{TextureGates, DEFICIENCY_RULES, DISEASE_RULES, GATED_RULES},
};
use crate::{
    config::DiagnosisConfig, segmentation::BandPercentages, texture::TextureDescriptor,
    AnalysisError, Result,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which rule table to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisMode {
    /// Percentage-only rules
    #[default]
    Baseline,
    /// Disease rules gated by texture, everything else percentage-only
    Refined,
}

/// Evaluates the fixed rule table
#[derive(Debug, Clone, Default)]
pub struct DiagnosisEngine {
    mode: DiagnosisMode,
    gates: TextureGates,
}

impl DiagnosisEngine {
    /// Baseline engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Refined engine with the given texture gates
    pub fn refined(gates: TextureGates) -> Self {
        Self {
            mode: DiagnosisMode::Refined,
            gates,
        }
    }

    pub fn from_config(config: &DiagnosisConfig) -> Self {
        Self {
            mode: config.mode,
            gates: config.texture_gates,
        }
    }

    pub fn mode(&self) -> DiagnosisMode {
        self.mode
    }

    /// Whether `diagnose` needs texture statistics
    pub fn requires_texture(&self) -> bool {
        self.mode == DiagnosisMode::Refined
    }

    /// Evaluate every rule for the current mode
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` when the engine is in refined
    /// mode and no texture statistics are supplied.
    pub fn diagnose(
        &self,
        pct: &BandPercentages,
        texture: Option<&TextureDescriptor>,
    ) -> Result<Diagnoses> {
        match (self.mode, texture) {
            (DiagnosisMode::Baseline, _) => Ok(self.diagnose_baseline(pct)),
            (DiagnosisMode::Refined, Some(texture)) => Ok(self.diagnose_refined(pct, texture)),
            (DiagnosisMode::Refined, None) => Err(AnalysisError::invalid_input(
                "refined diagnosis requires texture statistics",
            )),
        }
    }

    /// Percentage-only rules; every rule is checked independently
    pub fn diagnose_baseline(&self, pct: &BandPercentages) -> Diagnoses {
        let mut diagnoses = Diagnoses::default();
        for rule in DISEASE_RULES.iter().chain(DEFICIENCY_RULES.iter()) {
            if rule.fires(pct) {
                diagnoses.add(rule.category, rule.condition);
            }
        }
        debug!(findings = diagnoses.len(), "Baseline rules evaluated");
        diagnoses
    }

    /// Texture-gated disease rules followed by the percentage-only deficiency rules
    ///
    /// Each gated trigger yields exactly one finding, disease or deficiency.
    /// Deficiency rules driven by a gated band are left to that trigger.
    pub fn diagnose_refined(
        &self,
        pct: &BandPercentages,
        texture: &TextureDescriptor,
    ) -> Diagnoses {
        let mut diagnoses = Diagnoses::default();

        for gated in &GATED_RULES {
            let gate = self.gates.for_band(gated.band);
            if let Some(routing) = gated.route(pct, texture, &gate) {
                debug!(band = gated.band.as_str(), ?routing, "Gated rule routed");
                diagnoses.add(routing.category(), routing.condition());
            }
        }

        let independent = DEFICIENCY_RULES
            .iter()
            .filter(|rule| !GATED_RULES.iter().any(|gated| gated.subsumes(rule)));
        for rule in independent {
            if rule.fires(pct) {
                diagnoses.add(rule.category, rule.condition);
            }
        }

        debug!(findings = diagnoses.len(), "Refined rules evaluated");
        diagnoses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnosis::findings::{Category, Condition};
    use crate::segmentation::Band;

    fn rough() -> TextureDescriptor {
        TextureDescriptor {
            contrast: 600.0,
            homogeneity: 0.2,
            energy: 0.05,
            correlation: 0.4,
        }
    }

    #[test]
    fn test_all_zero_is_empty() {
        let d = DiagnosisEngine::new().diagnose(&BandPercentages::default(), None).unwrap();
        assert!(d.is_empty());
        for category in Category::ALL {
            assert!(d.get(category).is_empty());
        }
    }

    #[test]
    fn test_brown_and_purple_fire_together() {
        let pct = BandPercentages::default()
            .with(Band::Brown, 6.0)
            .with(Band::Purple, 6.0);
        let d = DiagnosisEngine::new().diagnose_baseline(&pct);

        assert!(d.contains(Category::Disease, Condition::LeafBlight));
        assert!(d.contains(Category::MacroNutrient, Condition::PhosphorusDeficiency));
        assert!(d.contains(Category::MicroNutrient, Condition::CopperDeficiency));
        assert!(!d.contains_anywhere(Condition::CalciumDeficiency));
        assert_eq!(d.len(), 3);
    }

    #[test]
    fn test_gray_without_brown_gives_mildew_and_calcium() {
        let pct = BandPercentages::default().with(Band::Gray, 4.0);
        let d = DiagnosisEngine::new().diagnose_baseline(&pct);
        assert!(d.contains(Category::Disease, Condition::PowderyMildew));
        assert!(d.contains(Category::SecondaryNutrient, Condition::CalciumDeficiency));
    }

    #[test]
    fn test_dark_brown_rules() {
        // Default bands make edge-brown and dark-brown identical, so zinc never
        // fires from a real image; it does from synthetic percentages.
        let pct = BandPercentages::default().with(Band::DarkBrown, 5.0);
        let d = DiagnosisEngine::new().diagnose_baseline(&pct);
        assert!(d.contains(Category::Disease, Condition::LeafSpot));
        assert!(d.contains(Category::SecondaryNutrient, Condition::SulfurDeficiency));
        assert!(d.contains(Category::MicroNutrient, Condition::ZincDeficiency));

        let both = pct.with(Band::EdgeBrown, 5.0);
        let d = DiagnosisEngine::new().diagnose_baseline(&both);
        assert!(d.contains(Category::MacroNutrient, Condition::PotassiumDeficiency));
        assert!(!d.contains_anywhere(Condition::ZincDeficiency));
    }

    #[test]
    fn test_pale_yellow_iron_depends_on_yellow() {
        let pct = BandPercentages::default().with(Band::PaleYellow, 6.0);
        let d = DiagnosisEngine::new().diagnose_baseline(&pct);
        assert!(d.contains(Category::SecondaryNutrient, Condition::MagnesiumDeficiency));
        assert!(d.contains(Category::MicroNutrient, Condition::IronDeficiency));

        let yellow = pct.with(Band::Yellow, 11.0);
        let d = DiagnosisEngine::new().diagnose_baseline(&yellow);
        assert!(d.contains(Category::MacroNutrient, Condition::NitrogenDeficiency));
        assert!(!d.contains_anywhere(Condition::IronDeficiency));
    }

    #[test]
    fn test_refined_requires_texture() {
        let engine = DiagnosisEngine::refined(TextureGates::default());
        assert!(engine.requires_texture());
        let err = engine.diagnose(&BandPercentages::default(), None).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput { .. }));
    }

    #[test]
    fn test_refined_rough_texture_reports_disease_only() {
        let pct = BandPercentages::default().with(Band::Brown, 6.0);
        let d = DiagnosisEngine::refined(TextureGates::default()).diagnose_refined(&pct, &rough());

        assert!(d.contains(Category::Disease, Condition::LeafBlight));
        assert!(!d.contains(Category::MacroNutrient, Condition::PotassiumDeficiency));
    }

    #[test]
    fn test_refined_smooth_texture_reports_deficiency_only() {
        let pct = BandPercentages::default().with(Band::Brown, 6.0);
        let d = DiagnosisEngine::refined(TextureGates::default())
            .diagnose_refined(&pct, &TextureDescriptor::flat());

        assert!(d.disease.is_empty());
        assert!(d.contains(Category::MacroNutrient, Condition::PotassiumDeficiency));
    }

    fn refined() -> DiagnosisEngine {
        DiagnosisEngine::refined(TextureGates::default())
    }

    #[test]
    fn test_refined_rough_gray_is_mildew_not_calcium() {
        let pct = BandPercentages::default().with(Band::Gray, 4.0);
        let d = refined().diagnose_refined(&pct, &rough());

        assert!(d.contains(Category::Disease, Condition::PowderyMildew));
        assert!(!d.contains_anywhere(Condition::CalciumDeficiency));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_refined_smooth_gray_is_calcium_not_mildew() {
        let pct = BandPercentages::default().with(Band::Gray, 4.0);
        let d = refined().diagnose_refined(&pct, &TextureDescriptor::flat());

        assert!(d.contains(Category::SecondaryNutrient, Condition::CalciumDeficiency));
        assert!(!d.contains_anywhere(Condition::PowderyMildew));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_refined_gray_gate_uses_energy() {
        // Rough by contrast but with concentrated energy: smooth for the gray gate
        let coated = TextureDescriptor {
            energy: 0.5,
            ..rough()
        };
        let pct = BandPercentages::default().with(Band::Gray, 4.0);
        let d = refined().diagnose_refined(&pct, &coated);
        assert!(d.contains(Category::SecondaryNutrient, Condition::CalciumDeficiency));
        assert!(d.disease.is_empty());
    }

    #[test]
    fn test_refined_rough_dark_brown_is_leaf_spot_not_zinc() {
        let pct = BandPercentages::default().with(Band::DarkBrown, 5.0);
        let d = refined().diagnose_refined(&pct, &rough());

        assert!(d.contains(Category::Disease, Condition::LeafSpot));
        assert!(!d.contains_anywhere(Condition::ZincDeficiency));
        // Sulfur is not gated and still fires
        assert!(d.contains(Category::SecondaryNutrient, Condition::SulfurDeficiency));
    }

    #[test]
    fn test_refined_smooth_dark_brown_is_zinc_not_leaf_spot() {
        let pct = BandPercentages::default().with(Band::DarkBrown, 5.0);
        let d = refined().diagnose_refined(&pct, &TextureDescriptor::flat());

        assert!(d.contains(Category::MicroNutrient, Condition::ZincDeficiency));
        assert!(!d.contains_anywhere(Condition::LeafSpot));
        assert!(d.disease.is_empty());
    }

    #[test]
    fn test_refined_keeps_independent_rules() {
        let pct = BandPercentages::default()
            .with(Band::Brown, 6.0)
            .with(Band::Purple, 6.0)
            .with(Band::Gray, 4.0);
        let d = DiagnosisEngine::refined(TextureGates::default())
            .diagnose_refined(&pct, &TextureDescriptor::flat());

        // Gray routed to calcium by smooth texture
        assert!(d.contains(Category::SecondaryNutrient, Condition::CalciumDeficiency));
        assert_eq!(d.secondary_nutrient.len(), 1);
        assert!(d.contains(Category::MacroNutrient, Condition::PhosphorusDeficiency));
        assert!(d.contains(Category::MicroNutrient, Condition::CopperDeficiency));
        assert!(d.disease.is_empty());
    }
}
