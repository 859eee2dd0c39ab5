mod model;

use serde::{Deserialize, Serialize};

use crate::context::RoadClass;

pub(crate) use model::assess;

/// Discrete exposure classification of the aggregate noise level, ordered
/// from quietest to loudest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExposureZone {
    Low,
    Moderate,
    High,
    Severe,
}

impl ExposureZone {
    /// Map an aggregate level through the three ordered zone boundaries.
    pub(crate) fn from_level(level_db: f64, thresholds: &[f64]) -> Self {
        debug_assert!(thresholds.len() == 3, "expected 3 zone boundaries");
        if level_db < thresholds[0] {
            ExposureZone::Low
        } else if level_db < thresholds[1] {
            ExposureZone::Moderate
        } else if level_db < thresholds[2] {
            ExposureZone::High
        } else {
            ExposureZone::Severe
        }
    }
}

impl std::fmt::Display for ExposureZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExposureZone::Low => write!(f, "Low"),
            ExposureZone::Moderate => write!(f, "Moderate"),
            ExposureZone::High => write!(f, "High"),
            ExposureZone::Severe => write!(f, "Severe"),
        }
    }
}

/// Attenuated contribution of a single noise source at the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLevel {
    /// Arena index of the source feature.
    pub feature: usize,
    pub class: RoadClass,
    /// Nearest distance from the site polygon boundary to the source, in
    /// meters (before the r_min floor is applied).
    pub distance_m: f64,
    /// Attenuated level at the site, in dB.
    pub level_db: f64,
}

/// Output of the Noise Exposure branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseExposure {
    /// Per-source attenuated levels, in arena index order.
    pub sources: Vec<SourceLevel>,
    /// Energy-summed aggregate level at the site, in dB. 0 when no usable
    /// source exists.
    pub aggregate_db: f64,
    pub zone: ExposureZone,
}
