use geo::{ConvexHull, MultiPoint, MultiPolygon, Point};

use crate::access::Isochrone;
use crate::config::EngineConfig;
use crate::geom;
use crate::graph::NetworkGraph;

/// Materialize one region per configured travel-time threshold, ordered
/// ascending (the config validator guarantees the threshold order).
///
/// With a usable network the region is the convex hull of every node
/// reachable within the threshold's travel distance. Fewer than three
/// reachable nodes cannot span a hull, so the region falls back to the
/// direct-travel circle, the same shape every threshold gets when no
/// network exists at all.
pub(crate) fn build(
    centroid: Point<f64>,
    config: &EngineConfig,
    network: Option<&NetworkGraph>,
    site_costs: Option<&[f64]>,
) -> Vec<Isochrone> {
    config
        .isochrone_thresholds
        .iter()
        .map(|&threshold_min| {
            let radius = config.minutes_to_meters(threshold_min);
            let region = match (network, site_costs) {
                (Some(graph), Some(costs)) => reachable_region(centroid, graph, costs, radius),
                _ => MultiPolygon::new(vec![geom::circle(centroid, radius)]),
            };
            Isochrone { threshold_min, region }
        })
        .collect()
}

fn reachable_region(
    centroid: Point<f64>,
    graph: &NetworkGraph,
    costs: &[f64],
    radius: f64,
) -> MultiPolygon<f64> {
    let reached: Vec<Point<f64>> = costs
        .iter()
        .enumerate()
        .filter(|&(_, &cost)| cost <= radius)
        .map(|(node, _)| graph.node(node))
        .collect();

    if reached.len() >= 3 {
        MultiPolygon::new(vec![MultiPoint::new(reached).convex_hull()])
    } else {
        MultiPolygon::new(vec![geom::circle(centroid, radius)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, Contains};

    #[test]
    fn no_network_yields_circles_per_threshold() {
        let config = EngineConfig::default();
        let isochrones = build(Point::new(0.0, 0.0), &config, None, None);

        assert_eq!(isochrones.len(), 3);
        // 5/10/15 min at 4.5 km/h: 375/750/1125 m radii, strictly nested.
        for (iso, radius) in isochrones.iter().zip([375.0, 750.0, 1125.0]) {
            let expect = std::f64::consts::PI * radius * radius;
            assert!((iso.region.unsigned_area() - expect).abs() / expect < 1e-3);
        }
        assert!(isochrones[0].region.unsigned_area() < isochrones[2].region.unsigned_area());
    }

    #[test]
    fn hull_covers_reachable_nodes_only() {
        // A 2x2 grid of nodes 300 m apart; all within 5 min (375 m) of node 0.
        let graph = NetworkGraph::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(300.0, 0.0),
                Point::new(0.0, 300.0),
                Point::new(300.0, 300.0),
            ],
            &[vec![1, 2], vec![0, 3], vec![0, 3], vec![1, 2]],
            &[vec![300.0, 300.0], vec![300.0, 300.0], vec![300.0, 300.0], vec![300.0, 300.0]],
        );
        let config = EngineConfig::default();
        let costs = graph.shortest_costs(0, 1500.0);
        let isochrones = build(Point::new(0.0, 0.0), &config, Some(&graph), Some(&costs));

        // 5 min / 375 m covers nodes 0, 1, 2 but not 3 (600 m by road).
        let five_min = &isochrones[0].region;
        assert!(five_min.contains(&Point::new(100.0, 100.0)));
        assert!(!five_min.contains(&Point::new(290.0, 290.0)));
    }

    #[test]
    fn sparse_reachability_falls_back_to_a_circle() {
        // One isolated node: hull degenerates, circle takes over.
        let graph = NetworkGraph::new(vec![Point::new(0.0, 0.0)], &[vec![]], &[vec![]]);
        let config = EngineConfig::default();
        let costs = graph.shortest_costs(0, 1500.0);
        let isochrones = build(Point::new(0.0, 0.0), &config, Some(&graph), Some(&costs));

        let expect = std::f64::consts::PI * 375.0 * 375.0;
        assert!((isochrones[0].region.unsigned_area() - expect).abs() / expect < 1e-3);
    }
}
