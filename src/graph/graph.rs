use geo::Point;

/// A weighted, undirected routable network in compressed sparse row format.
///
/// Nodes carry planar coordinates; edge weights are non-negative costs
/// (meters of travel along the segment). Built by the external context
/// extraction stage from the street network inside the analysis radius.
#[derive(Debug, Clone, Default)]
pub struct NetworkGraph {
    nodes: Vec<Point<f64>>,
    offsets: Vec<u32>,
    edges: Vec<u32>,
    edge_weights: Vec<f64>,
}

impl NetworkGraph {
    /// Construct a network from per-node adjacency lists and edge costs.
    pub fn new(nodes: Vec<Point<f64>>, edges: &[Vec<u32>], edge_weights: &[Vec<f64>]) -> Self {
        let num_nodes = nodes.len();
        assert!(edges.len() == num_nodes, "edges.len() must equal node count");
        assert!(edge_weights.len() == num_nodes, "edge_weights.len() must equal node count");
        edges.iter().zip(edge_weights.iter()).enumerate().for_each(|(i, (edges, weights))| {
            assert!(edges.len() == weights.len(), "edges[{i}].len() must equal edge_weights[{i}].len()");
            assert!(edges.iter().all(|&v| (v as usize) < num_nodes), "edges[{i}] contains an out-of-range node");
            assert!(weights.iter().all(|w| w.is_finite() && *w >= 0.0), "edge_weights[{i}] must be non-negative and finite");
        });
        assert!(
            nodes.iter().all(|p| p.x().is_finite() && p.y().is_finite()),
            "node coordinates must be finite"
        );

        Self {
            nodes,
            offsets: std::iter::once(0u32).chain(
                edges.iter()
                    .map(|v| v.len() as u32)
                    .scan(0u32, |acc, len| {*acc += len; Some(*acc)})
            ).collect::<Vec<u32>>(),
            edges: edges.iter().flatten().copied().collect(),
            edge_weights: edge_weights.iter().flatten().copied().collect(),
        }
    }

    /// Get the number of nodes in the network.
    #[inline] pub fn node_count(&self) -> usize { self.nodes.len() }

    /// Get the number of directed edge entries.
    #[inline] pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Get the planar coordinates of a node.
    #[inline] pub fn node(&self, node: usize) -> Point<f64> { self.nodes[node] }

    /// Get all node coordinates.
    #[inline] pub fn nodes(&self) -> &[Point<f64>] { &self.nodes }

    /// Get the range of edges for a given node.
    #[inline]
    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize .. self.offsets[node + 1] as usize
    }

    /// Get the degree (number of neighbors) of a given node.
    #[inline] pub fn degree(&self, node: usize) -> usize { self.range(node).len() }

    /// Get an iterator over the neighbors and edge costs of a given node.
    #[inline]
    pub fn edges_with_weights(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.range(node).map(move |v| (self.edges[v] as usize, self.edge_weights[v]))
    }
}
