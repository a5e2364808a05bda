//! Declarative rule tables
//!
//! Percentage rules are independent: every rule is checked and any number may
//! fire together. Texture-gated rules produce exactly one routed finding per
//! trigger, either a disease or a deficiency in another category.

use super::findings::{Category, Condition};
use crate::{
    constants::{rules, texture},
    segmentation::{Band, BandPercentages},
    texture::{Texture, TextureDescriptor, TextureGate},
};
use serde::{Deserialize, Serialize};

/// Strict comparison of one band percentage against a threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clause {
    Above(Band, f64),
    Below(Band, f64),
}

impl Clause {
    pub fn holds(&self, pct: &BandPercentages) -> bool {
        match *self {
            Clause::Above(band, threshold) => pct.get(band) > threshold,
            Clause::Below(band, threshold) => pct.get(band) < threshold,
        }
    }
}

/// A percentage-only rule: all clauses must hold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub category: Category,
    pub condition: Condition,
    pub clauses: &'static [Clause],
}

impl Rule {
    pub fn fires(&self, pct: &BandPercentages) -> bool {
        self.clauses.iter().all(|c| c.holds(pct))
    }
}

use Band::*;
use Category::*;
use Condition::*;

const fn rule(category: Category, condition: Condition, clauses: &'static [Clause]) -> Rule {
    Rule {
        category,
        condition,
        clauses,
    }
}

/// Percentage-only disease rules, replaced by gated rules in refined mode
pub const DISEASE_RULES: [Rule; 3] = [
    rule(
        Disease,
        LeafBlight,
        &[Clause::Above(Brown, rules::BROWN_PCT)],
    ),
    rule(
        Disease,
        PowderyMildew,
        &[Clause::Above(Gray, rules::GRAY_PCT)],
    ),
    rule(
        Disease,
        LeafSpot,
        &[Clause::Above(DarkBrown, rules::DARK_BROWN_PCT)],
    ),
];

/// Deficiency rules shared by both modes
pub const DEFICIENCY_RULES: [Rule; 9] = [
    rule(
        MacroNutrient,
        NitrogenDeficiency,
        &[Clause::Above(Yellow, rules::YELLOW_PCT)],
    ),
    rule(
        MacroNutrient,
        PhosphorusDeficiency,
        &[Clause::Above(Purple, rules::PURPLE_PCT)],
    ),
    rule(
        MacroNutrient,
        PotassiumDeficiency,
        &[Clause::Above(EdgeBrown, rules::EDGE_BROWN_PCT)],
    ),
    rule(
        SecondaryNutrient,
        CalciumDeficiency,
        &[
            Clause::Above(Gray, rules::GRAY_PCT),
            Clause::Below(Brown, rules::BROWN_PCT),
        ],
    ),
    rule(
        SecondaryNutrient,
        MagnesiumDeficiency,
        &[Clause::Above(PaleYellow, rules::PALE_YELLOW_PCT)],
    ),
    rule(
        SecondaryNutrient,
        SulfurDeficiency,
        &[
            Clause::Above(DarkBrown, rules::DARK_BROWN_PCT),
            Clause::Below(Yellow, rules::YELLOW_PCT),
        ],
    ),
    rule(
        MicroNutrient,
        IronDeficiency,
        &[
            Clause::Above(PaleYellow, rules::PALE_YELLOW_PCT),
            Clause::Below(Yellow, rules::YELLOW_PCT),
        ],
    ),
    rule(
        MicroNutrient,
        ZincDeficiency,
        &[
            Clause::Above(DarkBrown, rules::DARK_BROWN_PCT),
            Clause::Below(EdgeBrown, rules::EDGE_BROWN_PCT),
        ],
    ),
    rule(
        MicroNutrient,
        CopperDeficiency,
        &[
            Clause::Above(Brown, rules::BROWN_PCT),
            Clause::Above(Purple, rules::PURPLE_PCT),
        ],
    ),
];

/// Outcome of a texture-gated trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    /// Rough texture: reported as a disease
    Disease(Condition),
    /// Smooth texture: reported as a deficiency in `Category`
    Deficiency(Category, Condition),
}

impl Routing {
    pub fn category(&self) -> Category {
        match self {
            Routing::Disease(_) => Category::Disease,
            Routing::Deficiency(category, _) => *category,
        }
    }

    pub fn condition(&self) -> Condition {
        match self {
            Routing::Disease(condition) | Routing::Deficiency(_, condition) => *condition,
        }
    }
}

/// A band trigger whose finding depends on texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GatedRule {
    pub band: Band,
    pub threshold: f64,
    pub disease: Condition,
    pub deficiency: (Category, Condition),
}

impl GatedRule {
    /// Route the trigger, or `None` when the band percentage is at or below threshold
    pub fn route(
        &self,
        pct: &BandPercentages,
        texture: &TextureDescriptor,
        gate: &TextureGate,
    ) -> Option<Routing> {
        if pct.get(self.band) <= self.threshold {
            return None;
        }
        Some(match gate.classify(texture) {
            Texture::Rough => Routing::Disease(self.disease),
            Texture::Smooth => Routing::Deficiency(self.deficiency.0, self.deficiency.1),
        })
    }

    /// Whether this trigger replaces a percentage rule in refined mode
    ///
    /// A percentage rule is subsumed when it reports this trigger's smooth-route
    /// condition and is driven by this trigger's band.
    pub fn subsumes(&self, rule: &Rule) -> bool {
        rule.condition == self.deficiency.1
            && rule
                .clauses
                .iter()
                .any(|clause| matches!(clause, Clause::Above(band, _) if *band == self.band))
    }
}

pub const GATED_RULES: [GatedRule; 3] = [
    GatedRule {
        band: Brown,
        threshold: rules::BROWN_PCT,
        disease: LeafBlight,
        deficiency: (MacroNutrient, PotassiumDeficiency),
    },
    GatedRule {
        band: Gray,
        threshold: rules::GRAY_PCT,
        disease: PowderyMildew,
        deficiency: (SecondaryNutrient, CalciumDeficiency),
    },
    GatedRule {
        band: DarkBrown,
        threshold: rules::DARK_BROWN_PCT,
        disease: LeafSpot,
        deficiency: (MicroNutrient, ZincDeficiency),
    },
];

/// Texture gates for the three gated bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureGates {
    pub brown: TextureGate,
    pub gray: TextureGate,
    pub dark_brown: TextureGate,
}

impl Default for TextureGates {
    fn default() -> Self {
        let lesion = TextureGate::contrast_homogeneity(
            texture::LESION_MIN_CONTRAST,
            texture::LESION_MAX_HOMOGENEITY,
        );
        Self {
            brown: lesion,
            gray: TextureGate::contrast_energy(
                texture::COATING_MIN_CONTRAST,
                texture::COATING_MAX_ENERGY,
            ),
            dark_brown: lesion,
        }
    }
}

impl TextureGates {
    /// Gate for a gated band; other bands get an always-rough gate
    pub fn for_band(&self, band: Band) -> TextureGate {
        match band {
            Band::Brown => self.brown,
            Band::Gray => self.gray,
            Band::DarkBrown => self.dark_brown,
            _ => TextureGate::default(),
        }
    }
}
