use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::context::RoadClass;
use crate::error::EngineError;

/// Engine configuration. Every analysis call takes one of these explicitly;
/// there is no process-wide state.
///
/// Defaults that the source material leaves open are fixed here: exposure
/// thresholds at 55/65/75 dB and a hard rejection of degenerate radii and
/// zero sector counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of angular sectors. Any positive count is valid; the wedges
    /// are equal-width, so non-integer widths still partition 360° exactly.
    pub sector_count: u32,

    /// Radius of the analysis disk around the site centroid, in meters.
    pub analysis_radius: f64,

    /// Isochrone travel-time thresholds in minutes, strictly increasing.
    pub isochrone_thresholds: Vec<f64>,

    /// Walking speed used to convert travel time to distance, in km/h.
    /// The 4.5 km/h default puts the 5/10/15 min rings at 375/750/1125 m.
    pub walk_speed_kmph: f64,

    /// Distance floor r_min for the noise attenuation term, in meters.
    ///
    /// `20·log10(r)` diverges as r → 0, so attenuation is evaluated at
    /// `max(r, noise_floor_distance)`. This floor is part of the model
    /// contract, not an incidental clamp.
    pub noise_floor_distance: f64,

    /// Exposure-zone boundaries in dB: [Low/Moderate, Moderate/High,
    /// High/Severe]. Exactly 3 values, strictly increasing.
    pub exposure_thresholds: Vec<f64>,

    /// Base noise level per road hierarchy class, in dB.
    pub road_weight_table: BTreeMap<RoadClass, f64>,

    /// Maximum network search cost in meters. Amenities whose route cost
    /// exceeds this are reported as unavailable.
    pub max_search_radius: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sector_count: 12,
            analysis_radius: 360.0,
            isochrone_thresholds: vec![5.0, 10.0, 15.0],
            walk_speed_kmph: 4.5,
            noise_floor_distance: 1.0,
            exposure_thresholds: vec![55.0, 65.0, 75.0],
            road_weight_table: RoadClass::default_weights(),
            max_search_radius: 3000.0,
        }
    }
}

impl EngineConfig {
    /// Check every configuration invariant, returning the first violation.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.sector_count == 0 {
            return Err(EngineError::Config("sector_count must be positive, got 0".into()));
        }
        if !(self.analysis_radius > 0.0) || !self.analysis_radius.is_finite() {
            return Err(EngineError::Config(format!(
                "analysis_radius must be positive and finite, got {}",
                self.analysis_radius
            )));
        }
        if self.isochrone_thresholds.is_empty() {
            return Err(EngineError::Config(
                "isochrone_thresholds must not be empty".into(),
            ));
        }
        let mut prev = 0.0;
        for &t in &self.isochrone_thresholds {
            if !(t > prev) || !t.is_finite() {
                return Err(EngineError::Config(format!(
                    "isochrone_thresholds must be strictly increasing and positive, got {:?}",
                    self.isochrone_thresholds
                )));
            }
            prev = t;
        }
        if !(self.walk_speed_kmph > 0.0) || !self.walk_speed_kmph.is_finite() {
            return Err(EngineError::Config(format!(
                "walk_speed_kmph must be positive, got {}",
                self.walk_speed_kmph
            )));
        }
        if !(self.noise_floor_distance > 0.0) || !self.noise_floor_distance.is_finite() {
            return Err(EngineError::Config(format!(
                "noise_floor_distance must be positive, got {}",
                self.noise_floor_distance
            )));
        }
        if self.exposure_thresholds.len() != 3
            || !self
                .exposure_thresholds
                .windows(2)
                .all(|w| w[0] < w[1] && w[1].is_finite())
        {
            return Err(EngineError::Config(format!(
                "exposure_thresholds must be 3 strictly increasing levels, got {:?}",
                self.exposure_thresholds
            )));
        }
        if self.road_weight_table.is_empty() {
            return Err(EngineError::Config("road_weight_table must not be empty".into()));
        }
        if let Some((class, &w)) = self
            .road_weight_table
            .iter()
            .find(|(_, w)| !w.is_finite() || **w <= 0.0)
        {
            return Err(EngineError::Config(format!(
                "road_weight_table[{class:?}] must be positive and finite, got {w}"
            )));
        }
        if !(self.max_search_radius > 0.0) || !self.max_search_radius.is_finite() {
            return Err(EngineError::Config(format!(
                "max_search_radius must be positive, got {}",
                self.max_search_radius
            )));
        }
        Ok(())
    }

    /// Angular width of one sector, in degrees.
    #[inline]
    pub(crate) fn sector_width(&self) -> f64 {
        360.0 / self.sector_count as f64
    }

    /// Base noise level for a road class, in dB.
    #[inline]
    pub(crate) fn base_level(&self, class: RoadClass) -> f64 {
        // validate() guarantees the table is non-empty; classes missing from
        // a caller-supplied table fall back to the built-in default.
        self.road_weight_table
            .get(&class)
            .copied()
            .unwrap_or_else(|| class.default_weight())
    }

    /// Convert a travel time in minutes to a distance in meters at the
    /// configured walking speed.
    #[inline]
    pub(crate) fn minutes_to_meters(&self, minutes: f64) -> f64 {
        minutes * self.walk_speed_kmph * 1000.0 / 60.0
    }
}
