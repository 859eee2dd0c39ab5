use log::debug;

use crate::config::EngineConfig;
use crate::context::ContextStore;
use crate::geom;
use crate::sector::{features, SectorScore, ViewLabel};

/// Sector View Classifier branch: partition the analysis disk into N wedges
/// clockwise from true north, aggregate feature areas per wedge, normalize
/// across the run, score, and label.
///
/// State-free and deterministic: identical store + config always produce an
/// identical score sequence and aggregate label.
pub(crate) fn classify(store: &ContextStore, config: &EngineConfig) -> (Vec<SectorScore>, ViewLabel) {
    let centroid = store.site().centroid();
    let width = config.sector_width();

    let aggregates: Vec<_> = (0..config.sector_count)
        .map(|i| {
            let start = i as f64 * width;
            let wedge = geom::wedge(centroid, config.analysis_radius, start, start + width);
            features::aggregate(store, &wedge)
        })
        .collect();

    let height_norm = min_max_normalize(aggregates.iter().map(|a| a.avg_building_height));
    let density_norm = min_max_normalize(aggregates.iter().map(|a| a.building_density));

    let sectors: Vec<SectorScore> = aggregates
        .into_iter()
        .enumerate()
        .map(|(i, agg)| {
            let (h, d) = (height_norm[i], density_norm[i]);
            let mut sector = SectorScore {
                index: i as u32,
                start_deg: i as f64 * width,
                end_deg: (i + 1) as f64 * width,
                features: agg,
                green: agg.green_ratio,
                water: agg.water_ratio,
                city: h * d,
                open: (1.0 - d) * (1.0 - h),
                label: ViewLabel::Open,
            };
            sector.label = dominant_label(&sector);
            sector
        })
        .collect();

    let aggregate = aggregate_label(&sectors);
    debug!("sector branch complete: {} sectors, aggregate {aggregate}", sectors.len());

    (sectors, aggregate)
}

/// Min-max normalization across the run's sectors. Zero variance maps every
/// value to 0 rather than dividing by zero.
///
/// Spans within rounding error of the value magnitude count as zero
/// variance too: wedge sampling perturbs analytically equal aggregates by
/// a few ULPs, and stretching that noise across [0, 1] would invent a
/// ranking where none exists.
fn min_max_normalize(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let values: Vec<f64> = values.collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    if !(span > max.abs().max(min.abs()) * SPAN_EPSILON) {
        return vec![0.0; values.len()];
    }
    values.into_iter().map(|v| (v - min) / span).collect()
}

/// Relative span below which sector aggregates are considered uniform.
const SPAN_EPSILON: f64 = 1e-9;

/// Argmax over the four scores; exact ties resolve by the fixed priority
/// Water > Green > City > Open.
fn dominant_label(sector: &SectorScore) -> ViewLabel {
    let mut best = ViewLabel::PRIORITY[0];
    for &label in &ViewLabel::PRIORITY[1..] {
        if sector.score(label) > sector.score(best) {
            best = label;
        }
    }
    best
}

/// Site-level label: the most common sector label; count ties resolve by the
/// larger sum of winning scores, then by the fixed priority order.
fn aggregate_label(sectors: &[SectorScore]) -> ViewLabel {
    let mut best = ViewLabel::PRIORITY[0];
    let mut best_count = 0usize;
    let mut best_sum = 0.0f64;

    for &label in &ViewLabel::PRIORITY {
        let count = sectors.iter().filter(|s| s.label == label).count();
        let sum: f64 = sectors
            .iter()
            .filter(|s| s.label == label)
            .map(|s| s.score(label))
            .sum();
        if count > best_count || (count == best_count && sum > best_sum) {
            best = label;
            best_count = count;
            best_sum = sum;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Feature, FeatureKind, RunId, Site};
    use geo::{polygon, MultiPolygon};

    fn store_with(features: Vec<Feature>) -> ContextStore {
        let site = Site::new(
            "LOT-1",
            MultiPolygon::new(vec![
                polygon![(x: -5.0, y: -5.0), (x: 5.0, y: -5.0), (x: 5.0, y: 5.0), (x: -5.0, y: 5.0)],
            ]),
        )
        .unwrap();
        ContextStore::new(site, RunId::new("r"), features, None)
    }

    fn quad_config() -> EngineConfig {
        EngineConfig {
            sector_count: 4,
            analysis_radius: 100.0,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn wedges_partition_the_disk() {
        let (sectors, _) = classify(&store_with(vec![]), &EngineConfig::default());
        assert_eq!(sectors.len(), 12);
        for (i, sector) in sectors.iter().enumerate() {
            assert_eq!(sector.index as usize, i);
            assert_eq!(sector.start_deg, i as f64 * 30.0);
            assert_eq!(sector.end_deg, (i + 1) as f64 * 30.0);
        }
        // Contiguous and covering 360°.
        for pair in sectors.windows(2) {
            assert_eq!(pair[0].end_deg, pair[1].start_deg);
        }
        assert_eq!(sectors.last().unwrap().end_deg, 360.0);
    }

    #[test]
    fn empty_context_is_all_open() {
        let (sectors, aggregate) = classify(&store_with(vec![]), &quad_config());
        for sector in &sectors {
            assert_eq!(sector.features.green_ratio, 0.0);
            assert_eq!(sector.features.avg_building_height, 0.0);
            // Zero variance: both norms are 0, so Open = 1.
            assert_eq!(sector.open, 1.0);
            assert_eq!(sector.label, ViewLabel::Open);
        }
        assert_eq!(aggregate, ViewLabel::Open);
    }

    #[test]
    fn green_sector_scenario() {
        // One green polygon covering sector 0 (bearings 0–90°) fully and
        // nothing elsewhere.
        let (sectors, aggregate) = classify(
            &store_with(vec![Feature::area(
                FeatureKind::Green,
                polygon![(x: 0.0, y: 0.0), (x: 150.0, y: 0.0), (x: 150.0, y: 150.0), (x: 0.0, y: 150.0)],
            )]),
            &quad_config(),
        );

        assert!(sectors[0].features.green_ratio > 0.999);
        assert_eq!(sectors[0].label, ViewLabel::Green);
        for sector in &sectors[1..] {
            assert_eq!(sector.label, ViewLabel::Open);
        }
        // 3 of 4 sectors are open, so the aggregate follows the count.
        assert_eq!(aggregate, ViewLabel::Open);
    }

    #[test]
    fn zero_variance_heights_normalize_to_zero() {
        // Same-height buildings in two sectors; different footprints drive
        // density variance, heights contribute nothing.
        let (sectors, _) = classify(
            &store_with(vec![
                Feature::area(
                    FeatureKind::Building { height_m: 30.0 },
                    polygon![(x: 10.0, y: 10.0), (x: 80.0, y: 10.0), (x: 80.0, y: 80.0), (x: 10.0, y: 80.0)],
                ),
                Feature::area(
                    FeatureKind::Building { height_m: 30.0 },
                    polygon![(x: 10.0, y: -20.0), (x: 25.0, y: -20.0), (x: 25.0, y: -10.0), (x: 10.0, y: -10.0)],
                ),
            ]),
            &quad_config(),
        );

        // Heights differ from zero only where buildings exist, so height
        // variance exists across sectors; instead check the documented rule
        // directly on uniform input.
        let norms = min_max_normalize([5.0, 5.0, 5.0, 5.0].into_iter());
        assert_eq!(norms, vec![0.0; 4]);

        // City score is height_norm × density_norm, so it stays within [0, 1].
        for sector in &sectors {
            assert!((0.0..=1.0).contains(&sector.city));
            assert!((0.0..=1.0).contains(&sector.open));
        }
    }

    #[test]
    fn sub_ulp_spans_count_as_zero_variance() {
        // Analytically equal aggregates perturbed by wedge-sampling noise
        // must not be stretched across [0, 1].
        let norms = min_max_normalize([0.25, 0.25 + 1e-13, 0.25 - 1e-13, 0.25].into_iter());
        assert_eq!(norms, vec![0.0; 4]);

        // A genuine spread still normalizes.
        let norms = min_max_normalize([0.0, 0.5, 1.0].into_iter());
        assert_eq!(norms, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn uniformly_built_disk_stays_open() {
        // One building footprint covering the whole analysis disk: every
        // sector's density is identical, so no sector may rank above the
        // others on sampling noise alone.
        let (sectors, aggregate) = classify(
            &store_with(vec![Feature::area(
                FeatureKind::Building { height_m: 20.0 },
                polygon![(x: -200.0, y: -200.0), (x: 200.0, y: -200.0), (x: 200.0, y: 200.0), (x: -200.0, y: 200.0)],
            )]),
            &quad_config(),
        );

        for sector in &sectors {
            assert!(sector.features.building_density > 0.999);
            assert_eq!(sector.city, 0.0);
            assert_eq!(sector.open, 1.0);
            assert_eq!(sector.label, ViewLabel::Open);
        }
        assert_eq!(aggregate, ViewLabel::Open);
    }

    #[test]
    fn water_beats_green_on_exact_ties() {
        let tied = SectorScore {
            index: 0,
            start_deg: 0.0,
            end_deg: 90.0,
            features: Default::default(),
            green: 0.5,
            water: 0.5,
            city: 0.1,
            open: 0.2,
            label: ViewLabel::Open,
        };
        assert_eq!(dominant_label(&tied), ViewLabel::Water);
    }

    #[test]
    fn aggregate_count_ties_break_on_winning_score_sums() {
        let sector = |label: ViewLabel, value: f64| {
            let mut s = SectorScore {
                index: 0,
                start_deg: 0.0,
                end_deg: 90.0,
                features: Default::default(),
                green: 0.0,
                water: 0.0,
                city: 0.0,
                open: 0.0,
                label,
            };
            match label {
                ViewLabel::Green => s.green = value,
                ViewLabel::Water => s.water = value,
                ViewLabel::City => s.city = value,
                ViewLabel::Open => s.open = value,
            }
            s
        };

        // Two green sectors and two city sectors, but city wins on score mass.
        let sectors = vec![
            sector(ViewLabel::Green, 0.3),
            sector(ViewLabel::Green, 0.3),
            sector(ViewLabel::City, 0.9),
            sector(ViewLabel::City, 0.8),
        ];
        assert_eq!(aggregate_label(&sectors), ViewLabel::City);
    }
}
