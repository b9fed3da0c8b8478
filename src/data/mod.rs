//! Graph data model shared with the upstream data layer

pub mod json;

use serde::{Deserialize, Serialize};

/// Category of a node in the legislative graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Person,
    LegalAct,
    Organization,
    Committee,
    ExternalActor,
}

/// Relationship carried by an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    /// Weighted "voted together" relationship between two persons
    AgreementLink,
    Authorship,
    Affiliation,
    Membership,
    Influence,
}

/// A node as delivered by the data layer
///
/// Person nodes gain `cluster_id`/`cluster_color` after bloc detection;
/// all other fields pass through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,

    /// Party affiliation (person nodes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_color: Option<String>,
}

/// An edge as delivered by the data layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Agreement strength in [0, 1] (agreement-link edges)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement: Option<f64>,
}

/// The full graph handed over by the data layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphData {
    /// Number of person nodes in the graph
    pub fn person_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Person)
            .count()
    }
}
