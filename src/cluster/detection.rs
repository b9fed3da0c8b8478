//! Voting-bloc detection via Louvain modularity optimization

use indexmap::IndexMap;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::cluster::stats::calculate_cluster_stats;
use crate::cluster::{cluster_color, ClusterResult};
use crate::config::Config;
use crate::data::{GraphData, NodeKind};
use crate::graph::builder::build_weighted_graph;
use crate::graph::{CommunityNode, WeightedGraph};

/// Mapping from original person-node id to its community
pub type CommunityAssignment = IndexMap<String, usize>;

/// Modularity gain of moving `node` into `target_community`
fn modularity_gain(
    node: &CommunityNode,
    target_community: usize,
    graph: &WeightedGraph,
    degrees: &IndexMap<String, f64>,
    community_weights: &IndexMap<usize, f64>,
) -> f64 {
    let ki = degrees.get(&node.id).copied().unwrap_or(0.0);

    let ki_in: f64 = node
        .neighbors
        .iter()
        .filter(|(neighbor_id, _)| {
            graph
                .nodes
                .get(neighbor_id.as_str())
                .is_some_and(|n| n.community == target_community)
        })
        .map(|(_, weight)| weight)
        .sum::<f64>()
        * 2.0;

    let sigma_tot = community_weights
        .get(&target_community)
        .copied()
        .unwrap_or(0.0);
    let m = graph.total_weight;

    ki_in / (2.0 * m) - (sigma_tot * ki) / (2.0 * m * m)
}

/// One local-moving phase of the Louvain algorithm
///
/// Visits nodes in a freshly shuffled order each iteration and moves each
/// to the neighboring community with the largest strictly positive
/// modularity gain, until an iteration makes no moves or the iteration cap
/// is reached. Returns whether any node moved during the phase.
fn local_moving_phase(graph: &mut WeightedGraph, config: &Config, rng: &mut StdRng) -> bool {
    let mut improved = false;
    let degrees = graph.node_degrees();
    let mut community_weights = graph.community_weights(&degrees);

    let node_ids: Vec<String> = graph.nodes.keys().cloned().collect();
    let mut changed = true;
    let mut iterations = 0;

    while changed && iterations < config.max_iterations {
        changed = false;
        iterations += 1;

        let mut order = node_ids.clone();
        order.shuffle(rng);

        for node_id in &order {
            let Some(node) = graph.nodes.get(node_id) else {
                continue;
            };
            let current_community = node.community;

            // Candidate communities, in first-encountered neighbor order
            let candidates: Vec<usize> = node
                .neighbors
                .keys()
                .filter_map(|nid| graph.nodes.get(nid).map(|n| n.community))
                .unique()
                .collect();

            let mut best_community = current_community;
            let mut best_gain = 0.0;

            for community in candidates {
                if community == current_community {
                    continue;
                }

                let gain =
                    modularity_gain(node, community, graph, &degrees, &community_weights);
                if gain > best_gain {
                    best_gain = gain;
                    best_community = community;
                }
            }

            if best_community != current_community {
                let node_degree = degrees.get(node_id).copied().unwrap_or(0.0);
                *community_weights.entry(current_community).or_insert(0.0) -= node_degree;
                *community_weights.entry(best_community).or_insert(0.0) += node_degree;

                if let Some(node) = graph.nodes.get_mut(node_id) {
                    node.community = best_community;
                }
                changed = true;
                improved = true;
            }
        }
    }

    log::debug!(
        "Local moving settled after {} iterations (improved: {})",
        iterations,
        improved
    );

    improved
}

/// Contract communities into super-nodes for the next phase
///
/// Super-node ids are stringified community numbers; each starts in the
/// community equal to the old community id, so ids keep any gaps. Weights
/// are re-accumulated per directed neighbor entry, so the aggregate
/// `total_weight` counts each surviving edge from both endpoints and does
/// not match the parent graph's total.
fn aggregate_graph(graph: &WeightedGraph) -> WeightedGraph {
    let mut nodes: IndexMap<String, CommunityNode> = IndexMap::new();

    for node in graph.nodes.values() {
        let id = node.community.to_string();
        nodes.entry(id.clone()).or_insert_with(|| CommunityNode {
            id,
            community: node.community,
            neighbors: IndexMap::new(),
        });
    }

    let mut total_weight = 0.0;
    for node in graph.nodes.values() {
        let community_id = node.community.to_string();

        for (neighbor_id, weight) in &node.neighbors {
            let Some(neighbor) = graph.nodes.get(neighbor_id.as_str()) else {
                continue;
            };
            let neighbor_community = neighbor.community.to_string();

            if let Some(community_node) = nodes.get_mut(&community_id) {
                *community_node
                    .neighbors
                    .entry(neighbor_community)
                    .or_insert(0.0) += weight;
            }
            total_weight += weight;
        }
    }

    WeightedGraph {
        nodes,
        total_weight,
    }
}

/// Run phases of local moving and aggregation over the agreement graph
///
/// The community assignment for the original nodes is threaded explicitly
/// through the phase loop: the first phase writes each node's community,
/// and every later phase re-projects the assignment through the super-node
/// that carries it.
fn run_louvain(graph_data: &GraphData, config: &Config) -> CommunityAssignment {
    let mut graph = build_weighted_graph(graph_data);
    let mut assignment = CommunityAssignment::new();

    if graph.is_empty() {
        return assignment;
    }

    log::debug!(
        "Optimizing {} members, total agreement weight {:.3}",
        graph.node_count(),
        graph.total_weight
    );

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    // Every member starts in its own singleton community
    for (id, node) in &graph.nodes {
        assignment.insert(id.clone(), node.community);
    }

    for phase in 0..config.max_phases {
        let improved = local_moving_phase(&mut graph, config, &mut rng);
        if !improved {
            break;
        }

        if phase == 0 {
            for (id, node) in &graph.nodes {
                assignment.insert(id.clone(), node.community);
            }
        } else {
            for community in assignment.values_mut() {
                if let Some(node) = graph.nodes.get(&community.to_string()) {
                    *community = node.community;
                }
            }
        }

        graph = aggregate_graph(&graph);
        log::debug!(
            "Phase {} aggregated to {} communities",
            phase + 1,
            graph.node_count()
        );
    }

    assignment
}

/// Detect voting-pattern clusters with the default configuration
pub fn detect_voting_clusters(graph_data: &GraphData) -> ClusterResult {
    detect_voting_clusters_with(graph_data, &Config::default())
}

/// Detect voting-pattern clusters among person nodes
///
/// Returns the input nodes in order, person nodes annotated with their
/// cluster id and color, together with size-sorted cluster summaries.
pub fn detect_voting_clusters_with(graph_data: &GraphData, config: &Config) -> ClusterResult {
    let assignment = run_louvain(graph_data, config);

    let nodes = graph_data
        .nodes
        .iter()
        .map(|node| {
            let mut node = node.clone();
            if node.kind == NodeKind::Person {
                if let Some(&community) = assignment.get(&node.id) {
                    node.cluster_id = Some(community);
                    node.cluster_color = Some(cluster_color(community).to_string());
                }
            }
            node
        })
        .collect();

    let clusters = calculate_cluster_stats(graph_data, &assignment);

    log::info!(
        "Detected {} voting blocs across {} members",
        clusters.len(),
        assignment.len()
    );

    ClusterResult { nodes, clusters }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{EdgeKind, GraphEdge, GraphNode};

    fn person(id: &str, affiliation: Option<&str>) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            label: id.to_uppercase(),
            kind: NodeKind::Person,
            affiliation: affiliation.map(str::to_string),
            region: None,
            color: None,
            cluster_id: None,
            cluster_color: None,
        }
    }

    fn agreement(id: &str, source: &str, target: &str, weight: f64) -> GraphEdge {
        GraphEdge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            kind: EdgeKind::AgreementLink,
            label: None,
            agreement: Some(weight),
        }
    }

    fn two_pair_data() -> GraphData {
        GraphData {
            nodes: vec![
                person("a", Some("Azul")),
                person("b", Some("Azul")),
                person("c", Some("Rojo")),
                person("d", Some("Verde")),
            ],
            edges: vec![
                agreement("e1", "a", "b", 0.9),
                agreement("e2", "c", "d", 0.8),
            ],
        }
    }

    fn cluster_of<'r>(result: &'r ClusterResult, node_id: &str) -> &'r crate::cluster::ClusterInfo {
        let id = result
            .nodes
            .iter()
            .find(|n| n.id == node_id)
            .and_then(|n| n.cluster_id)
            .unwrap();
        result.clusters.iter().find(|c| c.id == id).unwrap()
    }

    #[test]
    fn empty_graph_yields_empty_result() {
        let result = detect_voting_clusters(&GraphData::default());
        assert!(result.nodes.is_empty());
        assert!(result.clusters.is_empty());
    }

    #[test]
    fn members_without_edges_stay_singletons() {
        let data = GraphData {
            nodes: vec![person("a", None), person("b", None), person("c", None)],
            edges: vec![],
        };

        let result = detect_voting_clusters(&data);
        assert_eq!(result.clusters.len(), 3);
        for cluster in &result.clusters {
            assert_eq!(cluster.size, 1);
            assert_eq!(cluster.cohesion, 0.0);
        }

        let ids: Vec<usize> = result.nodes.iter().filter_map(|n| n.cluster_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn disconnected_pairs_form_separate_blocs() {
        let result = detect_voting_clusters(&two_pair_data());

        assert_eq!(result.clusters.len(), 2);
        assert_eq!(cluster_of(&result, "a").id, cluster_of(&result, "b").id);
        assert_eq!(cluster_of(&result, "c").id, cluster_of(&result, "d").id);
        assert_ne!(cluster_of(&result, "a").id, cluster_of(&result, "c").id);

        // Same-affiliation pair normalizes by one internal pair
        let ab = cluster_of(&result, "a");
        assert!((ab.cohesion - 0.9).abs() < 1e-9);
        assert_eq!(ab.party_breakdown["Azul"], 2);
    }

    #[test]
    fn cluster_sizes_partition_the_members() {
        let mut data = two_pair_data();
        data.nodes.push(person("e", None));

        let result = detect_voting_clusters(&data);
        let total: usize = result.clusters.iter().map(|c| c.size).sum();
        assert_eq!(total, data.person_count());
    }

    #[test]
    fn strongly_agreeing_members_share_a_bloc() {
        let data = GraphData {
            nodes: vec![person("a", None), person("b", None), person("c", None)],
            edges: vec![
                agreement("e1", "a", "b", 0.9),
                agreement("e2", "a", "c", 0.2),
                agreement("e3", "b", "c", 0.15),
            ],
        };

        let result = detect_voting_clusters_with(&data, &Config::with_seed(42));
        assert_eq!(
            cluster_of(&result, "a").id,
            cluster_of(&result, "b").id
        );

        let total: usize = result.clusters.iter().map(|c| c.size).sum();
        assert_eq!(total, 3);
        for cluster in &result.clusters {
            assert!(cluster.cohesion >= 0.0);
        }
    }

    #[test]
    fn fixed_seed_is_deterministic() {
        let data = GraphData {
            nodes: vec![
                person("a", Some("Azul")),
                person("b", Some("Azul")),
                person("c", Some("Rojo")),
                person("d", Some("Rojo")),
                person("e", Some("Verde")),
            ],
            edges: vec![
                agreement("e1", "a", "b", 0.9),
                agreement("e2", "b", "c", 0.3),
                agreement("e3", "c", "d", 0.85),
                agreement("e4", "d", "e", 0.4),
                agreement("e5", "a", "e", 0.1),
            ],
        };

        let first = detect_voting_clusters_with(&data, &Config::with_seed(7));
        let second = detect_voting_clusters_with(&data, &Config::with_seed(7));

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn non_person_nodes_pass_through_unannotated() {
        let mut data = two_pair_data();
        data.nodes.push(GraphNode {
            kind: NodeKind::Committee,
            ..person("k1", None)
        });

        let result = detect_voting_clusters(&data);
        let committee = result.nodes.iter().find(|n| n.id == "k1").unwrap();
        assert!(committee.cluster_id.is_none());
        assert!(committee.cluster_color.is_none());

        // Input order is preserved
        let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d", "k1"]);
    }

    #[test]
    fn annotated_colors_follow_the_palette() {
        let result = detect_voting_clusters(&two_pair_data());
        for node in result.nodes.iter().filter(|n| n.cluster_id.is_some()) {
            let id = node.cluster_id.unwrap();
            assert_eq!(node.cluster_color.as_deref(), Some(cluster_color(id)));
        }
    }

    #[test]
    fn aggregation_contracts_communities() {
        let data = GraphData {
            nodes: vec![person("a", None), person("b", None), person("c", None)],
            edges: vec![
                agreement("e1", "a", "b", 0.5),
                agreement("e2", "b", "c", 0.4),
            ],
        };

        let mut graph = build_weighted_graph(&data);
        graph.nodes.get_mut("a").unwrap().community = 0;
        graph.nodes.get_mut("b").unwrap().community = 0;
        graph.nodes.get_mut("c").unwrap().community = 5;

        let aggregated = aggregate_graph(&graph);
        assert_eq!(aggregated.node_count(), 2);

        let zero = &aggregated.nodes["0"];
        assert_eq!(zero.community, 0);
        // a-b survives as a self-loop counted from both endpoints
        assert_eq!(zero.neighbors["0"], 1.0);
        assert_eq!(zero.neighbors["5"], 0.4);

        let five = &aggregated.nodes["5"];
        assert_eq!(five.community, 5);
        assert_eq!(five.neighbors["0"], 0.4);

        // Directed re-accumulation: every neighbor entry contributes
        assert!((aggregated.total_weight - 1.8).abs() < 1e-9);
    }

    #[test]
    fn local_moving_merges_an_agreeing_pair() {
        let data = GraphData {
            nodes: vec![person("a", None), person("b", None)],
            edges: vec![agreement("e1", "a", "b", 0.9)],
        };

        let mut graph = build_weighted_graph(&data);
        let mut rng = StdRng::seed_from_u64(1);
        let improved = local_moving_phase(&mut graph, &Config::default(), &mut rng);

        assert!(improved);
        assert_eq!(
            graph.nodes["a"].community,
            graph.nodes["b"].community
        );
    }
}
