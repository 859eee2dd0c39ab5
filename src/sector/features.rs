use geo::{Area, BooleanOps, BoundingRect, MultiPolygon, Polygon};
use rstar::AABB;

use crate::context::{ContextStore, FeatureGeometry, FeatureKind};
use crate::sector::SectorFeatures;

/// Aggregate green/water/building areas of every feature intersecting one
/// sector wedge. Candidates come from the store's R-tree in ascending arena
/// order, then exact intersection areas are taken with boolean ops, so the
/// result is independent of tree shape.
pub(super) fn aggregate(store: &ContextStore, wedge: &Polygon<f64>) -> SectorFeatures {
    let sector_area = wedge.unsigned_area();
    if sector_area <= 0.0 {
        return SectorFeatures::default();
    }

    let Some(rect) = wedge.bounding_rect() else {
        return SectorFeatures::default();
    };
    let envelope = AABB::from_corners(rect.min().into(), rect.max().into());
    let wedge_mp = MultiPolygon::new(vec![wedge.clone()]);

    let mut green_area = 0.0;
    let mut water_area = 0.0;
    let mut building_area = 0.0;
    let mut weighted_height = 0.0;

    for idx in store.candidates(&envelope) {
        let feature = store.feature(idx);
        let FeatureGeometry::Area(mp) = &feature.geometry else { continue };

        match feature.kind {
            FeatureKind::Green => green_area += wedge_mp.intersection(mp).unsigned_area(),
            FeatureKind::Water => water_area += wedge_mp.intersection(mp).unsigned_area(),
            FeatureKind::Building { height_m } => {
                let overlap = wedge_mp.intersection(mp).unsigned_area();
                building_area += overlap;
                weighted_height += height_m * overlap;
            }
            _ => {}
        }
    }

    SectorFeatures {
        // Overlapping source polygons can push a summed intersection past
        // the sector area; the ratio contract is [0, 1].
        green_ratio: (green_area / sector_area).min(1.0),
        water_ratio: (water_area / sector_area).min(1.0),
        building_density: (building_area / sector_area).min(1.0),
        avg_building_height: if building_area > 0.0 { weighted_height / building_area } else { 0.0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Feature, RunId, Site};
    use crate::geom;
    use approx::assert_relative_eq;
    use geo::{polygon, Point};

    fn store_with(features: Vec<Feature>) -> ContextStore {
        let site = Site::new(
            "LOT-1",
            geo::MultiPolygon::new(vec![
                polygon![(x: -5.0, y: -5.0), (x: 5.0, y: -5.0), (x: 5.0, y: 5.0), (x: -5.0, y: 5.0)],
            ]),
        )
        .unwrap();
        ContextStore::new(site, RunId::new("r"), features, None)
    }

    #[test]
    fn empty_sector_aggregates_to_zero() {
        let store = store_with(vec![]);
        let wedge = geom::wedge(Point::new(0.0, 0.0), 100.0, 0.0, 90.0);
        let agg = aggregate(&store, &wedge);
        assert_eq!(agg, SectorFeatures::default());
    }

    #[test]
    fn covering_green_polygon_gives_ratio_one() {
        // A square well beyond the wedge in the north-east quadrant.
        let store = store_with(vec![Feature::area(
            FeatureKind::Green,
            polygon![(x: -200.0, y: -200.0), (x: 200.0, y: -200.0), (x: 200.0, y: 200.0), (x: -200.0, y: 200.0)],
        )]);
        let wedge = geom::wedge(Point::new(0.0, 0.0), 100.0, 0.0, 90.0);
        let agg = aggregate(&store, &wedge);
        assert_relative_eq!(agg.green_ratio, 1.0, epsilon = 1e-9);
        assert_eq!(agg.water_ratio, 0.0);
    }

    #[test]
    fn building_height_is_area_weighted() {
        // Two buildings fully inside the wedge: 100 m² at 10 m, 300 m² at 50 m.
        let store = store_with(vec![
            Feature::new(
                FeatureKind::Building { height_m: 10.0 },
                crate::context::FeatureGeometry::Area(geo::MultiPolygon::new(vec![
                    polygon![(x: 10.0, y: 10.0), (x: 20.0, y: 10.0), (x: 20.0, y: 20.0), (x: 10.0, y: 20.0)],
                ])),
            ),
            Feature::new(
                FeatureKind::Building { height_m: 50.0 },
                crate::context::FeatureGeometry::Area(geo::MultiPolygon::new(vec![
                    polygon![(x: 30.0, y: 10.0), (x: 60.0, y: 10.0), (x: 60.0, y: 20.0), (x: 30.0, y: 20.0)],
                ])),
            ),
        ]);
        let wedge = geom::wedge(Point::new(0.0, 0.0), 100.0, 0.0, 90.0);
        let agg = aggregate(&store, &wedge);

        // (10·100 + 50·300) / 400 = 40.
        assert_relative_eq!(agg.avg_building_height, 40.0, epsilon = 1e-6);
        assert!(agg.building_density > 0.0 && agg.building_density <= 1.0);
    }

    #[test]
    fn feature_outside_the_wedge_contributes_nothing() {
        // Green square due west; wedge spans the north-east quadrant.
        let store = store_with(vec![Feature::area(
            FeatureKind::Green,
            polygon![(x: -80.0, y: -10.0), (x: -40.0, y: -10.0), (x: -40.0, y: 10.0), (x: -80.0, y: 10.0)],
        )]);
        let wedge = geom::wedge(Point::new(0.0, 0.0), 100.0, 0.0, 90.0);
        let agg = aggregate(&store, &wedge);
        assert_eq!(agg.green_ratio, 0.0);
    }
}
