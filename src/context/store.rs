use ahash::AHashMap;
use log::warn;
use rstar::{RTree, AABB};

use crate::context::{AmenityCategory, Feature, FeatureKind, RunId, Site};
use crate::error::Warning;
use crate::geom::BoundingBox;
use crate::graph::NetworkGraph;

/// Immutable per-run snapshot of the site and its geographic context.
///
/// Produced by the external context-extraction stage and consumed read-only
/// by the three analysis branches, so the branches can run concurrently
/// without synchronization. Malformed features are dropped at load time and
/// recorded as data-quality warnings; they never abort the run.
#[derive(Debug)]
pub struct ContextStore {
    site: Site,
    run_id: RunId,
    features: Vec<Feature>,
    // Position of each kept feature in the input slice passed to `new`.
    source_indexes: Vec<usize>,
    rtree: RTree<BoundingBox>,
    // Arena indexes per amenity category, ascending.
    amenities: AHashMap<AmenityCategory, Vec<usize>>,
    network: Option<NetworkGraph>,
    warnings: Vec<Warning>,
}

impl ContextStore {
    /// Build a snapshot from loaded features. `features` are screened for
    /// non-finite or empty geometry and negative building heights; offenders
    /// are skipped (indexes in the resulting warnings refer to positions in
    /// the input slice).
    pub fn new(
        site: Site,
        run_id: RunId,
        features: Vec<Feature>,
        network: Option<NetworkGraph>,
    ) -> Self {
        let mut kept = Vec::with_capacity(features.len());
        let mut source_indexes = Vec::with_capacity(features.len());
        let mut warnings = Vec::new();

        for (input_idx, feature) in features.into_iter().enumerate() {
            if !feature.geometry.is_well_formed() {
                warn!("dropping feature {input_idx}: empty or non-finite geometry");
                warnings.push(Warning::DataQuality {
                    feature: input_idx,
                    detail: "empty or non-finite geometry".into(),
                });
                continue;
            }
            if let FeatureKind::Building { height_m } = feature.kind {
                if !height_m.is_finite() || height_m < 0.0 {
                    warn!("dropping feature {input_idx}: invalid building height {height_m}");
                    warnings.push(Warning::DataQuality {
                        feature: input_idx,
                        detail: format!("invalid building height {height_m}"),
                    });
                    continue;
                }
            }
            kept.push(feature);
            source_indexes.push(input_idx);
        }

        let rtree = RTree::bulk_load(
            kept.iter()
                .enumerate()
                .filter_map(|(i, f)| f.geometry.bounding_rect().map(|rect| BoundingBox::new(i, rect)))
                .collect(),
        );

        let mut amenities: AHashMap<AmenityCategory, Vec<usize>> = AHashMap::new();
        for (i, feature) in kept.iter().enumerate() {
            if let FeatureKind::Amenity { category } = feature.kind {
                amenities.entry(category).or_default().push(i);
            }
        }

        Self { site, run_id, features: kept, source_indexes, rtree, amenities, network, warnings }
    }

    #[inline]
    pub fn site(&self) -> &Site {
        &self.site
    }

    #[inline]
    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// All retained features, indexed by arena position.
    #[inline]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    #[inline]
    pub fn feature(&self, idx: usize) -> &Feature {
        &self.features[idx]
    }

    /// Position of an arena feature in the input slice passed to [`Self::new`].
    /// Every [`Warning::DataQuality`] stamps this index space, whether the
    /// feature was dropped at load time or skipped by a branch later.
    #[inline]
    pub fn source_index(&self, idx: usize) -> usize {
        self.source_indexes[idx]
    }

    /// Arena indexes of the amenities in a category, ascending. Empty when
    /// the context holds none of that category.
    pub fn amenities(&self, category: AmenityCategory) -> &[usize] {
        self.amenities.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Routable network restricted to the analysis radius, if one was built.
    #[inline]
    pub fn network(&self) -> Option<&NetworkGraph> {
        self.network.as_ref()
    }

    /// Load-time data-quality warnings, surfaced into the final report.
    #[inline]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Arena indexes of features whose bounding box intersects the envelope,
    /// in ascending order (the R-tree iteration order is not stable, so the
    /// result is sorted to keep downstream aggregation deterministic).
    pub(crate) fn candidates(&self, envelope: &AABB<[f64; 2]>) -> Vec<usize> {
        let mut indexes: Vec<usize> = self
            .rtree
            .locate_in_envelope_intersecting(envelope)
            .map(|bb| bb.idx())
            .collect();
        indexes.sort_unstable();
        indexes
    }
}
