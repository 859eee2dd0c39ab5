use std::sync::Arc;

use geo::{Area, Centroid, CoordsIter, MultiPolygon, Point};

use crate::error::EngineError;

/// Identity of one analysis run. Caller-assigned, so that byte-identical
/// inputs yield byte-identical reports (a timestamp here would break the
/// idempotence contract).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunId(Arc<str>);

impl RunId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The resolved site: parcel boundary plus derived centroid, already in a
/// planar, distance-preserving reference system.
///
/// Construction is the engine's fatal-validation gate for site geometry:
/// empty, zero-area, or non-finite boundaries never reach a branch.
#[derive(Debug, Clone)]
pub struct Site {
    id: Arc<str>,
    boundary: MultiPolygon<f64>,
    centroid: Point<f64>,
}

impl Site {
    pub fn new(id: impl Into<Arc<str>>, boundary: MultiPolygon<f64>) -> Result<Self, EngineError> {
        let id = id.into();
        if boundary.0.is_empty() || boundary.coords_count() == 0 {
            return Err(EngineError::InputGeometry(format!(
                "site {id:?} has an empty boundary"
            )));
        }
        if boundary
            .coords_iter()
            .any(|c| !c.x.is_finite() || !c.y.is_finite())
        {
            return Err(EngineError::InputGeometry(format!(
                "site {id:?} has non-finite coordinates"
            )));
        }
        if boundary.unsigned_area() <= 0.0 {
            return Err(EngineError::InputGeometry(format!(
                "site {id:?} has zero area"
            )));
        }
        // A simple polygon with finite coords and positive area always has
        // a centroid.
        let centroid = boundary
            .centroid()
            .ok_or_else(|| EngineError::InputGeometry(format!("site {id:?} has no centroid")))?;

        Ok(Self { id, boundary, centroid })
    }

    /// Identifying token of the resolved parcel (lot number or equivalent).
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Parcel boundary in the planar reference system.
    #[inline]
    pub fn boundary(&self) -> &MultiPolygon<f64> {
        &self.boundary
    }

    /// Derived boundary centroid, the origin of all sector and distance math.
    #[inline]
    pub fn centroid(&self) -> Point<f64> {
        self.centroid
    }
}
