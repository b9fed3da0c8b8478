//! Weighted agreement-graph representation

use indexmap::IndexMap;

/// A person node inside the weighted graph
#[derive(Debug, Clone)]
pub struct CommunityNode {
    pub id: String,

    /// Community the node is currently assigned to
    pub community: usize,

    /// Neighbor id -> agreement weight
    pub neighbors: IndexMap<String, f64>,
}

/// Undirected weighted graph over person nodes
///
/// Each undirected edge is stored twice, once per endpoint's neighbor map,
/// while `total_weight` counts it once. Node iteration follows insertion
/// order, which the optimizer's tie-breaking relies on.
#[derive(Debug, Clone, Default)]
pub struct WeightedGraph {
    pub nodes: IndexMap<String, CommunityNode>,
    pub total_weight: f64,
}

impl WeightedGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Weighted degree of every node (sum of its neighbor weights)
    pub fn node_degrees(&self) -> IndexMap<String, f64> {
        self.nodes
            .iter()
            .map(|(id, node)| (id.clone(), node.neighbors.values().sum()))
            .collect()
    }

    /// Total weighted degree per community
    pub fn community_weights(&self, degrees: &IndexMap<String, f64>) -> IndexMap<usize, f64> {
        let mut weights: IndexMap<usize, f64> = IndexMap::new();
        for (id, node) in &self.nodes {
            let degree = degrees.get(id).copied().unwrap_or(0.0);
            *weights.entry(node.community).or_insert(0.0) += degree;
        }
        weights
    }
}
