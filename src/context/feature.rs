use std::collections::BTreeMap;

use geo::{BoundingRect, CoordsIter, LineString, MultiPolygon, Point, Rect};
use serde::{Deserialize, Serialize};

/// Road hierarchy class, ordered from heaviest to lightest traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoadClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Service,
}

impl RoadClass {
    /// Built-in base noise level for this class, in dB.
    pub fn default_weight(self) -> f64 {
        match self {
            RoadClass::Motorway => 80.0,
            RoadClass::Trunk => 77.0,
            RoadClass::Primary => 75.0,
            RoadClass::Secondary => 72.0,
            RoadClass::Tertiary => 68.0,
            RoadClass::Residential => 62.0,
            RoadClass::Service => 55.0,
        }
    }

    /// The full default class → base level table.
    pub fn default_weights() -> BTreeMap<RoadClass, f64> {
        [
            RoadClass::Motorway,
            RoadClass::Trunk,
            RoadClass::Primary,
            RoadClass::Secondary,
            RoadClass::Tertiary,
            RoadClass::Residential,
            RoadClass::Service,
        ]
        .into_iter()
        .map(|class| (class, class.default_weight()))
        .collect()
    }
}

/// Closed land-use classification for context polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandUseCategory {
    Residential,
    Commercial,
    Industrial,
    Institutional,
    Recreational,
    Other,
}

/// Amenity categories the accessibility branch reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AmenityCategory {
    RailStation,
    BusStop,
    School,
    Park,
    Hospital,
    Market,
}

impl AmenityCategory {
    /// Every category, in reporting order.
    pub const ALL: [AmenityCategory; 6] = [
        AmenityCategory::RailStation,
        AmenityCategory::BusStop,
        AmenityCategory::School,
        AmenityCategory::Park,
        AmenityCategory::Hospital,
        AmenityCategory::Market,
    ];
}

/// Typed payload of a context feature. One tagged variant covers every
/// feature class; the area-intersection and distance logic consumes them
/// uniformly through [`FeatureGeometry`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FeatureKind {
    Road { class: RoadClass },
    Building { height_m: f64 },
    LandUse { category: LandUseCategory },
    Green,
    Water,
    Amenity { category: AmenityCategory },
    NoiseSource { class: RoadClass },
}

/// Geometry of a context feature in the shared planar reference system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureGeometry {
    Area(MultiPolygon<f64>),
    Line(LineString<f64>),
    Point(Point<f64>),
}

impl FeatureGeometry {
    /// Bounding rectangle, or `None` for empty geometry.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            FeatureGeometry::Area(mp) => mp.bounding_rect(),
            FeatureGeometry::Line(ls) => ls.bounding_rect(),
            FeatureGeometry::Point(p) => Some(Rect::new(p.0, p.0)),
        }
    }

    /// Straight-line distance from `point` to the nearest point of this
    /// geometry, in the shared planar units. Zero for a point inside an
    /// area feature.
    pub fn distance_to(&self, point: Point<f64>) -> f64 {
        use geo::EuclideanDistance;
        match self {
            FeatureGeometry::Area(mp) => point.euclidean_distance(mp),
            FeatureGeometry::Line(ls) => point.euclidean_distance(ls),
            FeatureGeometry::Point(p) => point.euclidean_distance(p),
        }
    }

    /// A deterministic representative point: the centroid where defined,
    /// otherwise the first coordinate.
    pub fn representative_point(&self) -> Point<f64> {
        use geo::Centroid;
        match self {
            FeatureGeometry::Area(mp) => mp
                .centroid()
                .or_else(|| mp.coords_iter().next().map(Point::from))
                .unwrap_or_else(|| Point::new(0.0, 0.0)),
            FeatureGeometry::Line(ls) => ls
                .centroid()
                .or_else(|| ls.coords_iter().next().map(Point::from))
                .unwrap_or_else(|| Point::new(0.0, 0.0)),
            FeatureGeometry::Point(p) => *p,
        }
    }

    /// True iff every coordinate is finite and the geometry is non-empty.
    pub fn is_well_formed(&self) -> bool {
        let mut count = 0usize;
        let finite = match self {
            FeatureGeometry::Area(mp) => mp.coords_iter().inspect(|_| count += 1).all(|c| c.x.is_finite() && c.y.is_finite()),
            FeatureGeometry::Line(ls) => ls.coords_iter().inspect(|_| count += 1).all(|c| c.x.is_finite() && c.y.is_finite()),
            FeatureGeometry::Point(p) => {
                count = 1;
                p.x().is_finite() && p.y().is_finite()
            }
        };
        finite && count > 0
    }
}

/// A read-only context feature: geometry plus typed attributes. Never
/// mutated once loaded into the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub kind: FeatureKind,
    pub geometry: FeatureGeometry,
}

impl Feature {
    pub fn new(kind: FeatureKind, geometry: FeatureGeometry) -> Self {
        Self { kind, geometry }
    }

    /// An area feature from a single polygon ring, convenience for loaders.
    pub fn area(kind: FeatureKind, polygon: geo::Polygon<f64>) -> Self {
        Self::new(kind, FeatureGeometry::Area(MultiPolygon::new(vec![polygon])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn default_weights_cover_every_class() {
        let table = RoadClass::default_weights();
        assert_eq!(table.len(), 7);
        // Heavier classes are at least as loud as lighter ones.
        let levels: Vec<f64> = table.values().copied().collect();
        for w in levels.windows(2) {
            assert!(w[0] >= w[1]);
        }
    }

    #[test]
    fn well_formed_rejects_non_finite_coords() {
        let good = FeatureGeometry::Point(Point::new(1.0, 2.0));
        assert!(good.is_well_formed());

        let bad = FeatureGeometry::Point(Point::new(f64::NAN, 2.0));
        assert!(!bad.is_well_formed());

        let line = FeatureGeometry::Line(LineString::from(vec![(0.0, 0.0), (f64::INFINITY, 1.0)]));
        assert!(!line.is_well_formed());
    }

    #[test]
    fn well_formed_rejects_empty_geometry() {
        let empty = FeatureGeometry::Area(MultiPolygon::new(vec![]));
        assert!(!empty.is_well_formed());

        let filled = Feature::area(
            FeatureKind::Green,
            polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)],
        );
        assert!(filled.geometry.is_well_formed());
    }
}
