use geo::{Coord, LineString, Point, Polygon, Rect};
use rstar::{RTreeObject, AABB};

/// Points per wedge arc (and per quarter of a circle approximation).
const ARC_STEPS: usize = 40;

/// A bounding box in an R-tree, associated with a feature by arena index.
#[derive(Debug, Clone)]
pub(crate) struct BoundingBox {
    idx: usize, // Index of corresponding feature in the arena
    bbox: Rect<f64>,
}

impl BoundingBox {
    pub(crate) fn new(idx: usize, bbox: Rect<f64>) -> Self {
        Self { idx, bbox }
    }

    /// Get the index of the corresponding feature.
    #[inline]
    pub(crate) fn idx(&self) -> usize {
        self.idx
    }
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Point at `radius` from `center`, at `bearing_deg` clockwise from north.
#[inline]
fn at_bearing(center: Point<f64>, radius: f64, bearing_deg: f64) -> Coord<f64> {
    let rad = bearing_deg.to_radians();
    Coord {
        x: center.x() + radius * rad.sin(),
        y: center.y() + radius * rad.cos(),
    }
}

/// Build the polygon wedge spanning bearings [start, end] (degrees clockwise
/// from north) at the given radius. The arc is sampled at a fixed resolution
/// so equal inputs always produce identical vertices.
pub(crate) fn wedge(center: Point<f64>, radius: f64, start_deg: f64, end_deg: f64) -> Polygon<f64> {
    if end_deg - start_deg >= 360.0 {
        // A single-sector configuration spans the whole disk.
        return circle(center, radius);
    }
    let mut coords = Vec::with_capacity(ARC_STEPS + 2);
    coords.push(center.into());
    for step in 0..=ARC_STEPS {
        let t = step as f64 / ARC_STEPS as f64;
        coords.push(at_bearing(center, radius, start_deg + t * (end_deg - start_deg)));
    }
    coords.push(center.into());
    Polygon::new(LineString::new(coords), vec![])
}

/// Circle approximation around `center`, sampled clockwise from north.
pub(crate) fn circle(center: Point<f64>, radius: f64) -> Polygon<f64> {
    let steps = ARC_STEPS * 4;
    let mut coords = Vec::with_capacity(steps + 1);
    for step in 0..steps {
        coords.push(at_bearing(center, radius, step as f64 * 360.0 / steps as f64));
    }
    coords.push(coords[0]);
    Polygon::new(LineString::new(coords), vec![])
}
