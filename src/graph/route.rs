use std::cmp::Ordering;
use std::collections::BinaryHeap;

use geo::{EuclideanDistance, Point};

use crate::graph::NetworkGraph;

/// Heap entry for Dijkstra. Costs are non-negative, so `f64::to_bits()` is
/// monotone and gives a total order; ties break on node index so traversal
/// order is identical across runs.
#[derive(Copy, Clone, Eq, PartialEq)]
struct Entry {
    cost_bits: u64,
    node: usize,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so the cheapest entry pops first.
        other.cost_bits.cmp(&self.cost_bits)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl NetworkGraph {
    /// Single-source shortest path costs up to `cutoff`, Dijkstra over the
    /// CSR adjacency. Unreached nodes (including everything beyond the
    /// cutoff) hold `f64::INFINITY`.
    pub fn shortest_costs(&self, source: usize, cutoff: f64) -> Vec<f64> {
        let mut costs = vec![f64::INFINITY; self.node_count()];
        if source >= self.node_count() {
            return costs;
        }

        let mut heap = BinaryHeap::with_capacity(self.node_count());
        costs[source] = 0.0;
        heap.push(Entry { cost_bits: 0, node: source });

        while let Some(Entry { cost_bits, node }) = heap.pop() {
            let cost = f64::from_bits(cost_bits);
            if cost > costs[node] {
                continue; // Stale entry.
            }
            for (next, weight) in self.edges_with_weights(node) {
                let next_cost = cost + weight;
                if next_cost <= cutoff && next_cost < costs[next] {
                    costs[next] = next_cost;
                    heap.push(Entry { cost_bits: next_cost.to_bits(), node: next });
                }
            }
        }

        costs
    }

    /// Index of the node nearest to `point`, ties broken by lowest index.
    /// `None` for an empty network.
    pub fn nearest_node(&self, point: Point<f64>) -> Option<usize> {
        let mut best: Option<(f64, usize)> = None;
        for (idx, node) in self.nodes().iter().enumerate() {
            let dist = node.euclidean_distance(&point);
            match best {
                Some((best_dist, _)) if best_dist <= dist => {}
                _ => best = Some((dist, idx)),
            }
        }
        best.map(|(_, idx)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 0 -100- 1 -100- 2 -100- 3, with node 4 disconnected.
    fn path_graph() -> NetworkGraph {
        NetworkGraph::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(200.0, 0.0),
                Point::new(300.0, 0.0),
                Point::new(1000.0, 1000.0),
            ],
            &[vec![1], vec![0, 2], vec![1, 3], vec![2], vec![]],
            &[vec![100.0], vec![100.0, 100.0], vec![100.0, 100.0], vec![100.0], vec![]],
        )
    }

    #[test]
    fn dijkstra_costs_along_a_path() {
        let graph = path_graph();
        let costs = graph.shortest_costs(0, f64::INFINITY);
        assert_eq!(costs[0], 0.0);
        assert_eq!(costs[1], 100.0);
        assert_eq!(costs[2], 200.0);
        assert_eq!(costs[3], 300.0);
        assert_eq!(costs[4], f64::INFINITY);
    }

    #[test]
    fn cutoff_limits_the_search() {
        let graph = path_graph();
        let costs = graph.shortest_costs(0, 200.0);
        assert_eq!(costs[2], 200.0); // Exactly at the cutoff is reachable.
        assert_eq!(costs[3], f64::INFINITY);
    }

    #[test]
    fn nearest_node_breaks_ties_by_index() {
        // Nodes 1 and 2 are equidistant from the probe point.
        let graph = NetworkGraph::new(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(-10.0, 0.0)],
            &[vec![], vec![], vec![]],
            &[vec![], vec![], vec![]],
        );
        assert_eq!(graph.nearest_node(Point::new(0.0, 50.0)), Some(0));
        assert_eq!(graph.nearest_node(Point::new(0.0, 10.0)), Some(0));
        let graph = NetworkGraph::new(
            vec![Point::new(10.0, 0.0), Point::new(-10.0, 0.0)],
            &[vec![], vec![]],
            &[vec![], vec![]],
        );
        assert_eq!(graph.nearest_node(Point::new(0.0, 0.0)), Some(0));
    }

    #[test]
    fn nearest_node_on_empty_network_is_none() {
        let graph = NetworkGraph::default();
        assert_eq!(graph.nearest_node(Point::new(0.0, 0.0)), None);
    }
}
