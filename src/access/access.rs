use log::{debug, warn};

use crate::access::{isochrone, AccessibilityResult, CategoryAccess, NetworkDistance};
use crate::config::EngineConfig;
use crate::context::{AmenityCategory, ContextStore};
use crate::error::Warning;
use crate::graph::NetworkGraph;

/// Distance & Accessibility branch: nearest straight-line and network-routed
/// distance per amenity category, plus isochrone regions per configured
/// travel-time threshold.
///
/// Pure function of the store and config. Missing or edgeless networks fall
/// back to straight-line-only output with a degraded flag; they never fail
/// the run.
pub(crate) fn analyze(
    store: &ContextStore,
    config: &EngineConfig,
) -> (AccessibilityResult, Vec<Warning>) {
    let mut warnings = Vec::new();
    let centroid = store.site().centroid();

    let network = match store.network() {
        Some(graph) if graph.edge_count() > 0 => Some(graph),
        Some(_) => {
            warn!("network graph has zero edges; accessibility degrades to straight-line");
            warnings.push(Warning::NetworkUnavailable(
                "network graph has zero edges within the analysis radius".into(),
            ));
            None
        }
        None => {
            warn!("no network graph supplied; accessibility degrades to straight-line");
            warnings.push(Warning::NetworkUnavailable(
                "no routable network graph was supplied".into(),
            ));
            None
        }
    };

    // Route costs from the site's snap node, shared by category routing and
    // isochrone generation. The cutoff covers both the category search
    // radius and the widest isochrone.
    let site_costs = network.map(|graph| {
        let cutoff = config
            .isochrone_thresholds
            .iter()
            .map(|&t| config.minutes_to_meters(t))
            .fold(config.max_search_radius, f64::max);
        // nearest_node is Some: the graph has edges, hence nodes.
        let site_node = graph.nearest_node(centroid).unwrap_or(0);
        graph.shortest_costs(site_node, cutoff)
    });

    let categories = AmenityCategory::ALL
        .iter()
        .map(|&category| {
            let nearest = nearest_straight_line(store, category);
            let network_distance = match (&nearest, network, &site_costs) {
                (Some((idx, _)), Some(graph), Some(costs)) => {
                    route_distance(store, config, *idx, graph, costs)
                }
                _ => NetworkDistance::Unavailable,
            };
            CategoryAccess {
                category,
                straight_line_m: nearest.map(|(_, dist)| dist),
                nearest_feature: nearest.map(|(idx, _)| idx),
                network: network_distance,
            }
        })
        .collect();

    let isochrones = isochrone::build(centroid, config, network, site_costs.as_deref());

    debug!("accessibility branch complete (degraded: {})", network.is_none());

    (
        AccessibilityResult { categories, isochrones, degraded: network.is_none() },
        warnings,
    )
}

/// Nearest amenity of `category` by straight-line distance from the site
/// centroid. Ties on distance keep the lowest arena index, so repeated runs
/// on identical input are bit-stable.
fn nearest_straight_line(
    store: &ContextStore,
    category: AmenityCategory,
) -> Option<(usize, f64)> {
    let centroid = store.site().centroid();
    let mut best: Option<(usize, f64)> = None;
    for &idx in store.amenities(category) {
        let dist = store.feature(idx).geometry.distance_to(centroid);
        if best.is_none_or(|(_, best_dist)| dist < best_dist) {
            best = Some((idx, dist));
        }
    }
    best
}

/// Route cost from the site's snap node to the amenity's snap node, read
/// from the precomputed cost vector. Beyond the cutoff means unavailable.
fn route_distance(
    store: &ContextStore,
    config: &EngineConfig,
    feature_idx: usize,
    graph: &NetworkGraph,
    site_costs: &[f64],
) -> NetworkDistance {
    let target = store.feature(feature_idx).geometry.representative_point();
    let Some(node) = graph.nearest_node(target) else {
        return NetworkDistance::Unavailable;
    };
    let meters = site_costs[node];
    if !meters.is_finite() || meters > config.max_search_radius {
        return NetworkDistance::Unavailable;
    }
    let minutes = meters / (config.walk_speed_kmph * 1000.0 / 60.0);
    NetworkDistance::Available { meters, minutes }
}
