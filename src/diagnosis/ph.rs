//! Soil pH estimate from leaf discoloration

use crate::{constants::ph, segmentation::BandPercentages, AnalysisError};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Soil pH tendency suggested by the band percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhStatus {
    Acidic,
    Alkaline,
    Normal,
}

impl PhStatus {
    pub const ALL: [PhStatus; 3] = [PhStatus::Acidic, PhStatus::Alkaline, PhStatus::Normal];

    /// First matching branch wins: yellowing, then purpling, then normal
    pub fn estimate(pct: &BandPercentages) -> Self {
        if pct.yellow > ph::ACIDIC_YELLOW_PCT || pct.pale_yellow > ph::ACIDIC_YELLOW_PCT {
            PhStatus::Acidic
        } else if pct.purple > ph::ALKALINE_PURPLE_PCT {
            PhStatus::Alkaline
        } else {
            PhStatus::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PhStatus::Acidic => "Soil may be strongly acidic (pH < 6)",
            PhStatus::Alkaline => "Soil may be strongly alkaline (pH > 7.5)",
            PhStatus::Normal => "Soil pH within normal range (6-7.5)",
        }
    }
}

impl fmt::Display for PhStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PhStatus {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PhStatus::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| AnalysisError::invalid_parameter("ph_status", s))
    }
}
