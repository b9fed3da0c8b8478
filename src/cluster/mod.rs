//! Voting-bloc analysis module

pub mod detection;
pub mod stats;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::data::GraphNode;

/// Fixed palette cycled through by cluster id
pub const CLUSTER_COLORS: [&str; 10] = [
    "#ef4444", "#3b82f6", "#10b981", "#f59e0b", "#8b5cf6", "#ec4899", "#06b6d4", "#84cc16",
    "#f97316", "#6366f1",
];

/// Display color for a cluster id
pub fn cluster_color(cluster_id: usize) -> &'static str {
    CLUSTER_COLORS[cluster_id % CLUSTER_COLORS.len()]
}

/// Summary of one detected voting bloc
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInfo {
    /// Community id assigned by the optimizer
    pub id: usize,

    pub name: String,

    pub color: String,

    /// Number of person nodes in the cluster
    pub size: usize,

    /// Normalized internal agreement strength
    pub cohesion: f64,

    /// Party affiliation -> member count
    pub party_breakdown: IndexMap<String, usize>,

    pub avg_agreement: f64,
}

/// Output of cluster detection: annotated nodes plus bloc summaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterResult {
    pub nodes: Vec<GraphNode>,
    pub clusters: Vec<ClusterInfo>,
}
