//! Suitability score tiers and their display colours

use serde::Serialize;

/// Lower bounds (inclusive) for each tier above Poor
pub const EXCELLENT_THRESHOLD: f64 = 85.0;
pub const HIGH_THRESHOLD: f64 = 70.0;
pub const MODERATE_THRESHOLD: f64 = 50.0;
pub const LOW_THRESHOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuitabilityTier {
    Excellent,
    High,
    Moderate,
    Low,
    Poor,
}

impl SuitabilityTier {
    pub fn from_score(score: f64) -> Self {
        if score >= EXCELLENT_THRESHOLD {
            SuitabilityTier::Excellent
        } else if score >= HIGH_THRESHOLD {
            SuitabilityTier::High
        } else if score >= MODERATE_THRESHOLD {
            SuitabilityTier::Moderate
        } else if score >= LOW_THRESHOLD {
            SuitabilityTier::Low
        } else {
            SuitabilityTier::Poor
        }
    }

    /// Hex colour used on the map and dashboard
    pub fn color(&self) -> &'static str {
        match self {
            SuitabilityTier::Excellent => "#15803d",
            SuitabilityTier::High => "#4ade80",
            SuitabilityTier::Moderate => "#facc15",
            SuitabilityTier::Low => "#fb923c",
            SuitabilityTier::Poor => "#ef4444",
        }
    }

    /// Colour as RGB components, for truecolor terminals
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            SuitabilityTier::Excellent => (0x15, 0x80, 0x3d),
            SuitabilityTier::High => (0x4a, 0xde, 0x80),
            SuitabilityTier::Moderate => (0xfa, 0xcc, 0x15),
            SuitabilityTier::Low => (0xfb, 0x92, 0x3c),
            SuitabilityTier::Poor => (0xef, 0x44, 0x44),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SuitabilityTier::Excellent => "Excellent",
            SuitabilityTier::High => "High",
            SuitabilityTier::Moderate => "Moderate",
            SuitabilityTier::Low => "Low",
            SuitabilityTier::Poor => "Poor",
        }
    }
}

/// Hex colour for a total suitability score
pub fn score_color(score: f64) -> &'static str {
    SuitabilityTier::from_score(score).color()
}
