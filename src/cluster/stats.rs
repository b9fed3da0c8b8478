//! Cluster statistics and similarity measures

use indexmap::IndexMap;

use crate::cluster::detection::CommunityAssignment;
use crate::cluster::{cluster_color, ClusterInfo};
use crate::data::{EdgeKind, GraphData, NodeKind};

/// Compute per-cluster statistics from final community assignments
///
/// Returns one summary per distinct community, sorted by descending size.
/// Cohesion normalizes the summed internal agreement by the number of
/// same-party member pairs, which stands in for the internal edge count.
pub fn calculate_cluster_stats(
    graph_data: &GraphData,
    assignment: &CommunityAssignment,
) -> Vec<ClusterInfo> {
    let mut clusters: IndexMap<usize, ClusterInfo> = IndexMap::new();

    for &community in assignment.values() {
        clusters.entry(community).or_insert_with(|| ClusterInfo {
            id: community,
            name: format!("Cluster {}", community + 1),
            color: cluster_color(community).to_string(),
            size: 0,
            cohesion: 0.0,
            party_breakdown: IndexMap::new(),
            avg_agreement: 0.0,
        });
    }

    for node in graph_data
        .nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Person)
    {
        let Some(&community) = assignment.get(&node.id) else {
            continue;
        };
        let Some(cluster) = clusters.get_mut(&community) else {
            continue;
        };

        cluster.size += 1;

        let party = node
            .affiliation
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());
        *cluster.party_breakdown.entry(party).or_insert(0) += 1;
    }

    for edge in graph_data
        .edges
        .iter()
        .filter(|e| e.kind == EdgeKind::AgreementLink)
    {
        let source = assignment.get(&edge.source);
        let target = assignment.get(&edge.target);

        if let (Some(&source_community), Some(&target_community)) = (source, target) {
            if source_community == target_community {
                if let Some(cluster) = clusters.get_mut(&source_community) {
                    cluster.avg_agreement += edge.agreement.unwrap_or(0.0);
                }
            }
        }
    }

    for cluster in clusters.values_mut() {
        let internal_pairs: usize = cluster
            .party_breakdown
            .values()
            .map(|&count| count * (count - 1) / 2)
            .sum();

        if internal_pairs > 0 {
            cluster.avg_agreement /= internal_pairs as f64;
        }
        cluster.cohesion = cluster.avg_agreement;
    }

    let mut clusters: Vec<ClusterInfo> = clusters.into_values().collect();
    clusters.sort_by(|a, b| b.size.cmp(&a.size));
    clusters
}

/// Agreement strength recorded between two members
///
/// Looks up the first agreement-link edge between the unordered pair and
/// returns its agreement value, or 0.0 when no such edge exists.
pub fn calculate_voting_similarity(
    graph_data: &GraphData,
    first_id: &str,
    second_id: &str,
) -> f64 {
    graph_data
        .edges
        .iter()
        .find(|e| {
            e.kind == EdgeKind::AgreementLink
                && ((e.source == first_id && e.target == second_id)
                    || (e.source == second_id && e.target == first_id))
        })
        .and_then(|e| e.agreement)
        .unwrap_or(0.0)
}
