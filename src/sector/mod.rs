mod features;
mod score;

use serde::{Deserialize, Serialize};

pub(crate) use score::classify;

/// Dominant view classification of a sector (or of the whole site).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewLabel {
    Green,
    Water,
    City,
    Open,
}

impl ViewLabel {
    /// Tie-break priority, highest first: scarce natural features win over
    /// built-environment scores at equal magnitude.
    pub(crate) const PRIORITY: [ViewLabel; 4] =
        [ViewLabel::Water, ViewLabel::Green, ViewLabel::City, ViewLabel::Open];
}

impl std::fmt::Display for ViewLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewLabel::Green => write!(f, "GREEN VIEW"),
            ViewLabel::Water => write!(f, "WATER VIEW"),
            ViewLabel::City => write!(f, "CITY VIEW"),
            ViewLabel::Open => write!(f, "OPEN VIEW"),
        }
    }
}

/// Raw per-sector aggregates over the features intersecting the wedge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SectorFeatures {
    /// Green polygon area / sector area, in [0, 1].
    pub green_ratio: f64,
    /// Water polygon area / sector area, in [0, 1].
    pub water_ratio: f64,
    /// Building footprint area / sector area, in [0, 1].
    pub building_density: f64,
    /// Footprint-area-weighted mean building height in meters; 0 when the
    /// sector contains no building area.
    pub avg_building_height: f64,
}

/// Normalized scores and dominant label for one sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorScore {
    /// Sector index in [0, N); sector i spans [i·360/N, (i+1)·360/N)
    /// degrees clockwise from true north.
    pub index: u32,
    pub start_deg: f64,
    pub end_deg: f64,

    pub features: SectorFeatures,

    /// Green score: the raw green area ratio.
    pub green: f64,
    /// Water score: the raw water area ratio.
    pub water: f64,
    /// City score: height_norm × density_norm, in [0, 1].
    pub city: f64,
    /// Open score: (1 − density_norm) × (1 − height_norm), in [0, 1].
    pub open: f64,

    pub label: ViewLabel,
}

impl SectorScore {
    /// Score value for a given label.
    #[inline]
    pub fn score(&self, label: ViewLabel) -> f64 {
        match label {
            ViewLabel::Green => self.green,
            ViewLabel::Water => self.water,
            ViewLabel::City => self.city,
            ViewLabel::Open => self.open,
        }
    }
}
