use geo::{EuclideanDistance, MultiPolygon};
use log::{debug, warn};

use crate::config::EngineConfig;
use crate::context::{ContextStore, FeatureGeometry, FeatureKind};
use crate::error::Warning;
use crate::noise::{ExposureZone, NoiseExposure, SourceLevel};

/// Noise Exposure branch: attenuate each source's base level by distance,
/// combine by energy summation, classify the aggregate into a zone.
///
/// Distances are taken from the nearest point of the site polygon boundary,
/// not the centroid, so a road hugging one parcel edge is not discounted by
/// the parcel's depth.
pub(crate) fn assess(store: &ContextStore, config: &EngineConfig) -> (NoiseExposure, Vec<Warning>) {
    let mut warnings = Vec::new();
    let mut sources = Vec::new();
    let boundary = store.site().boundary();

    for (idx, feature) in store.features().iter().enumerate() {
        let FeatureKind::NoiseSource { class } = feature.kind else { continue };

        let distance = boundary_distance(boundary, &feature.geometry);
        if !distance.is_finite() || distance <= 0.0 {
            warn!("noise source {idx} has unusable distance {distance}; skipping");
            warnings.push(Warning::DataQuality {
                feature: store.source_index(idx),
                detail: format!("noise source at unusable distance {distance}"),
            });
            continue;
        }

        let level_db = attenuate(config.base_level(class), distance, config.noise_floor_distance);
        sources.push(SourceLevel { feature: idx, class, distance_m: distance, level_db });
    }

    let aggregate_db = energy_sum(sources.iter().map(|s| s.level_db));
    let zone = ExposureZone::from_level(aggregate_db, &config.exposure_thresholds);
    debug!("noise branch complete: {} sources, {aggregate_db:.1} dB ({zone})", sources.len());

    (NoiseExposure { sources, aggregate_db, zone }, warnings)
}

/// Logarithmic distance attenuation: `L = L0 − 20·log10(max(r, r_min))`.
///
/// The floor `r_min` is part of the model: the log term diverges as r → 0,
/// and a source at the parcel edge should read as "at r_min", not as an
/// unphysical spike.
#[inline]
pub(crate) fn attenuate(base_db: f64, distance_m: f64, r_min: f64) -> f64 {
    base_db - 20.0 * distance_m.max(r_min).log10()
}

/// Combine levels by energy: dB → linear power, sum, back to dB.
///
/// An arithmetic mean of dB values is physically wrong (it under-counts the
/// loudest source and shrinks as quiet sources are added); the energy sum is
/// monotone in the source set. Empty input reads as 0 dB.
pub(crate) fn energy_sum(levels_db: impl Iterator<Item = f64>) -> f64 {
    let energy: f64 = levels_db.map(|level| 10f64.powf(level / 10.0)).sum();
    if energy > 0.0 { 10.0 * energy.log10() } else { 0.0 }
}

/// Nearest distance from the site polygon boundary to a source geometry.
/// Interior rings count as boundary too: a source in a courtyard hole is
/// measured from the courtyard edge, not the outer parcel edge.
fn boundary_distance(site: &MultiPolygon<f64>, geometry: &FeatureGeometry) -> f64 {
    site.0
        .iter()
        .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
        .map(|ring| match geometry {
            FeatureGeometry::Line(ls) => ring.euclidean_distance(ls),
            FeatureGeometry::Point(p) => p.euclidean_distance(ring),
            FeatureGeometry::Area(mp) => mp
                .0
                .iter()
                .map(|p| ring.euclidean_distance(p.exterior()))
                .fold(f64::INFINITY, f64::min),
        })
        .fold(f64::INFINITY, f64::min)
}
