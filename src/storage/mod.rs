//! Results persistence module

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde_json::{json, to_string_pretty};

use crate::cluster::ClusterResult;
use crate::data::{EdgeKind, GraphData, NodeKind};

/// Save analysis results to the specified directory
pub fn save_results(graph_data: &GraphData, result: &ClusterResult, output_dir: &str) -> Result<()> {
    log::info!(
        "Saving {} clusters to {}",
        result.clusters.len(),
        output_dir
    );

    fs::create_dir_all(output_dir)?;

    save_summary(graph_data, result, output_dir)?;
    save_clusters(result, output_dir)?;
    save_nodes(result, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Save summary information
fn save_summary(graph_data: &GraphData, result: &ClusterResult, output_dir: &str) -> Result<()> {
    log::info!("Saving summary information");

    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let clusters = &result.clusters;
    let agreement_edges = graph_data
        .edges
        .iter()
        .filter(|e| e.kind == EdgeKind::AgreementLink)
        .count();

    let summary = json!({
        "graph_stats": {
            "node_count": graph_data.nodes.len(),
            "member_count": graph_data.person_count(),
            "edge_count": graph_data.edges.len(),
            "agreement_edge_count": agreement_edges,
        },
        "cluster_stats": {
            "cluster_count": clusters.len(),
            "total_clustered_members": clusters.iter().map(|c| c.size).sum::<usize>(),
            "largest_cluster_size": clusters.first().map_or(0, |c| c.size),
            "smallest_cluster_size": clusters.last().map_or(0, |c| c.size),
            "avg_cluster_size": clusters.iter().map(|c| c.size).sum::<usize>() as f64 /
                                if clusters.is_empty() { 1.0 } else { clusters.len() as f64 },
            "avg_cohesion": clusters.iter().map(|c| c.cohesion).sum::<f64>() /
                            if clusters.is_empty() { 1.0 } else { clusters.len() as f64 },
        }
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Save individual cluster information
fn save_clusters(result: &ClusterResult, output_dir: &str) -> Result<()> {
    log::info!("Saving individual cluster information");

    let clusters_dir = Path::new(output_dir).join("clusters");
    fs::create_dir_all(&clusters_dir)?;

    for cluster in &result.clusters {
        let path = clusters_dir.join(format!("cluster_{}.json", cluster.id));
        let mut file = File::create(path)?;

        let members: Vec<&str> = result
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Person && n.cluster_id == Some(cluster.id))
            .map(|n| n.id.as_str())
            .collect();

        let cluster_json = json!({
            "id": cluster.id,
            "name": cluster.name,
            "color": cluster.color,
            "size": cluster.size,
            "cohesion": cluster.cohesion,
            "partyBreakdown": cluster.party_breakdown,
            "members": members,
        });

        file.write_all(to_string_pretty(&cluster_json)?.as_bytes())?;
    }

    let all_clusters_path = Path::new(output_dir).join("clusters.json");
    let mut all_clusters_file = File::create(all_clusters_path)?;
    all_clusters_file.write_all(to_string_pretty(&result.clusters)?.as_bytes())?;

    Ok(())
}

/// Save the annotated node list
fn save_nodes(result: &ClusterResult, output_dir: &str) -> Result<()> {
    log::info!("Saving annotated nodes");

    let path = Path::new(output_dir).join("nodes.json");
    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(&result.nodes)?.as_bytes())?;

    Ok(())
}
