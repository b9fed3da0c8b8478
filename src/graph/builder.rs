//! Weighted graph construction from agreement relationships

use indexmap::IndexMap;

use crate::data::{EdgeKind, GraphData, NodeKind};
use crate::graph::{CommunityNode, WeightedGraph};

/// Fallback weight for agreement edges with no recorded strength
pub const DEFAULT_AGREEMENT: f64 = 0.5;

/// Build the weighted agreement graph over person nodes
///
/// Every person node starts in its own community, numbered by insertion
/// order. Agreement-link edges become bidirectional neighbor entries;
/// a repeated edge between the same pair overwrites the stored weight
/// while `total_weight` still accumulates each occurrence. Edges touching
/// a non-person endpoint are skipped.
pub fn build_weighted_graph(graph_data: &GraphData) -> WeightedGraph {
    let mut nodes: IndexMap<String, CommunityNode> = IndexMap::new();
    let mut total_weight = 0.0;

    for node in graph_data
        .nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Person)
    {
        let community = nodes.len();
        nodes.insert(
            node.id.clone(),
            CommunityNode {
                id: node.id.clone(),
                community,
                neighbors: IndexMap::new(),
            },
        );
    }

    for edge in graph_data
        .edges
        .iter()
        .filter(|e| e.kind == EdgeKind::AgreementLink)
    {
        if !nodes.contains_key(&edge.source) || !nodes.contains_key(&edge.target) {
            continue;
        }

        let weight = edge.agreement.unwrap_or(DEFAULT_AGREEMENT);

        if let Some(source) = nodes.get_mut(&edge.source) {
            source.neighbors.insert(edge.target.clone(), weight);
        }
        if let Some(target) = nodes.get_mut(&edge.target) {
            target.neighbors.insert(edge.source.clone(), weight);
        }
        total_weight += weight;
    }

    WeightedGraph {
        nodes,
        total_weight,
    }
}
