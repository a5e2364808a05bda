//! Color band definitions and per-band percentages

use crate::constants::bands;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the seven symptom color bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Brown,
    Yellow,
    Purple,
    EdgeBrown,
    Gray,
    PaleYellow,
    DarkBrown,
}

impl Band {
    /// All bands in canonical order
    pub const ALL: [Band; 7] = [
        Band::Brown,
        Band::Yellow,
        Band::Purple,
        Band::EdgeBrown,
        Band::Gray,
        Band::PaleYellow,
        Band::DarkBrown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Brown => "brown",
            Band::Yellow => "yellow",
            Band::Purple => "purple",
            Band::EdgeBrown => "edge_brown",
            Band::Gray => "gray",
            Band::PaleYellow => "pale_yellow",
            Band::DarkBrown => "dark_brown",
        }
    }

    /// Caption describing what the band is evidence for
    pub fn caption(&self) -> &'static str {
        match self {
            Band::Brown => "Brown (leaf blight)",
            Band::Yellow => "Yellow (nitrogen deficiency)",
            Band::Purple => "Purple (phosphorus deficiency)",
            Band::EdgeBrown => "Brown edges (potassium deficiency)",
            Band::Gray => "Gray/white (powdery mildew, calcium deficiency)",
            Band::PaleYellow => "Pale yellow (magnesium, iron deficiency)",
            Band::DarkBrown => "Dark brown (leaf spot, zinc deficiency)",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive HSV bounds, hue in [0, 179] and saturation/value in [0, 255]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    const fn from_bounds(bounds: ([u8; 3], [u8; 3])) -> Self {
        Self::new(bounds.0, bounds.1)
    }

    /// Whether an HSV triple lies inside the range on all three channels
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| self.lower[c] <= hsv[c] && hsv[c] <= self.upper[c])
    }

    /// Whether every lower bound is at or below its upper bound
    pub fn is_ordered(&self) -> bool {
        (0..3).all(|c| self.lower[c] <= self.upper[c])
    }

    /// Whether this range covers `other` entirely
    pub fn covers(&self, other: &HsvRange) -> bool {
        (0..3).all(|c| self.lower[c] <= other.lower[c] && other.upper[c] <= self.upper[c])
    }

    /// Range grown by `amount` on every channel, saturating at the channel limits
    pub fn widened(&self, amount: u8) -> Self {
        let mut lower = self.lower;
        let mut upper = self.upper;
        for c in 0..3 {
            lower[c] = lower[c].saturating_sub(amount);
            upper[c] = upper[c].saturating_add(amount);
        }
        upper[0] = upper[0].min(bands::HUE_MAX.max(self.upper[0]));
        Self { lower, upper }
    }
}

/// HSV ranges for all seven bands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandThresholds {
    pub brown: HsvRange,
    pub yellow: HsvRange,
    pub purple: HsvRange,
    pub edge_brown: HsvRange,
    pub gray: HsvRange,
    pub pale_yellow: HsvRange,
    pub dark_brown: HsvRange,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            brown: HsvRange::from_bounds(bands::BROWN),
            yellow: HsvRange::from_bounds(bands::YELLOW),
            purple: HsvRange::from_bounds(bands::PURPLE),
            edge_brown: HsvRange::from_bounds(bands::EDGE_BROWN),
            gray: HsvRange::from_bounds(bands::GRAY),
            pale_yellow: HsvRange::from_bounds(bands::PALE_YELLOW),
            dark_brown: HsvRange::from_bounds(bands::DARK_BROWN),
        }
    }
}

impl BandThresholds {
    pub fn get(&self, band: Band) -> &HsvRange {
        match band {
            Band::Brown => &self.brown,
            Band::Yellow => &self.yellow,
            Band::Purple => &self.purple,
            Band::EdgeBrown => &self.edge_brown,
            Band::Gray => &self.gray,
            Band::PaleYellow => &self.pale_yellow,
            Band::DarkBrown => &self.dark_brown,
        }
    }

    pub fn get_mut(&mut self, band: Band) -> &mut HsvRange {
        match band {
            Band::Brown => &mut self.brown,
            Band::Yellow => &mut self.yellow,
            Band::Purple => &mut self.purple,
            Band::EdgeBrown => &mut self.edge_brown,
            Band::Gray => &mut self.gray,
            Band::PaleYellow => &mut self.pale_yellow,
            Band::DarkBrown => &mut self.dark_brown,
        }
    }

    /// Bands whose ranges are exactly equal to another band's
    pub fn duplicated_pairs(&self) -> Vec<(Band, Band)> {
        let mut pairs = Vec::new();
        for (i, a) in Band::ALL.iter().enumerate() {
            for b in &Band::ALL[i + 1..] {
                if self.get(*a) == self.get(*b) {
                    pairs.push((*a, *b));
                }
            }
        }
        pairs
    }
}

/// Area fraction of the image covered by each band, in percent
///
/// Bands overlap, so the values are not normalized to sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BandPercentages {
    pub brown: f64,
    pub yellow: f64,
    pub purple: f64,
    pub edge_brown: f64,
    pub gray: f64,
    pub pale_yellow: f64,
    pub dark_brown: f64,
}

impl BandPercentages {
    pub fn get(&self, band: Band) -> f64 {
        match band {
            Band::Brown => self.brown,
            Band::Yellow => self.yellow,
            Band::Purple => self.purple,
            Band::EdgeBrown => self.edge_brown,
            Band::Gray => self.gray,
            Band::PaleYellow => self.pale_yellow,
            Band::DarkBrown => self.dark_brown,
        }
    }

    pub fn set(&mut self, band: Band, value: f64) {
        match band {
            Band::Brown => self.brown = value,
            Band::Yellow => self.yellow = value,
            Band::Purple => self.purple = value,
            Band::EdgeBrown => self.edge_brown = value,
            Band::Gray => self.gray = value,
            Band::PaleYellow => self.pale_yellow = value,
            Band::DarkBrown => self.dark_brown = value,
        }
    }

    /// Builder-style setter
    pub fn with(mut self, band: Band, value: f64) -> Self {
        self.set(band, value);
        self
    }

    /// `(band, percentage)` pairs in canonical band order
    pub fn iter(&self) -> impl Iterator<Item = (Band, f64)> + '_ {
        Band::ALL.iter().map(move |&band| (band, self.get(band)))
    }

    /// Unweighted mean of the seven percentages
    pub fn mean(&self) -> f64 {
        self.iter().map(|(_, pct)| pct).sum::<f64>() / Band::ALL.len() as f64
    }
}
