mod access;
mod isochrone;

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

use crate::context::AmenityCategory;

pub(crate) use access::analyze;

/// Network-routed distance to the nearest amenity of a category.
///
/// `Unavailable` is a real value, not an omission: it distinguishes "no
/// route within the search radius" from zero or infinite distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NetworkDistance {
    Available { meters: f64, minutes: f64 },
    Unavailable,
}

impl NetworkDistance {
    #[inline]
    pub fn is_available(&self) -> bool {
        matches!(self, NetworkDistance::Available { .. })
    }
}

/// Accessibility of one amenity category from the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAccess {
    pub category: AmenityCategory,

    /// Straight-line distance from the site centroid to the nearest matching
    /// feature, in meters. `None` when no feature of this category exists in
    /// the context.
    pub straight_line_m: Option<f64>,

    /// Arena index of the nearest feature (for the route drawn by the
    /// visualization stage).
    pub nearest_feature: Option<usize>,

    pub network: NetworkDistance,
}

/// Region reachable within one travel-time threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Isochrone {
    pub threshold_min: f64,
    pub region: MultiPolygon<f64>,
}

/// Output of the Distance & Accessibility branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityResult {
    /// One entry per amenity category, in fixed category order.
    pub categories: Vec<CategoryAccess>,

    /// One region per configured threshold, ordered ascending.
    pub isochrones: Vec<Isochrone>,

    /// True when no usable network graph was available and every network
    /// distance degraded to straight-line-only.
    pub degraded: bool,
}

impl AccessibilityResult {
    /// Access record for a category, if the category was analyzed.
    pub fn category(&self, category: AmenityCategory) -> Option<&CategoryAccess> {
        self.categories.iter().find(|c| c.category == category)
    }
}
