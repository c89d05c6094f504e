//! Community detection by greedy modularity optimization (Louvain).
//!
//! Works on the undirected logical adjacency with unit edge weights. Each
//! level runs local-move passes (bounded by the configured iteration cap)
//! until no node moves, then contracts communities into super-nodes and
//! repeats, up to the configured level cap.

use std::collections::HashMap;

use crate::config::GraphConfig;
use crate::core::DependencyGraph;

/// Assign every node to a community, numbered consecutively from 0 in
/// sorted-node-id order. Any non-empty graph yields at least one community.
pub fn detect_communities(
    graph: &DependencyGraph,
    config: &GraphConfig,
) -> HashMap<String, usize> {
    let ids = graph.sorted_node_ids();
    let n = ids.len();
    if n == 0 {
        return HashMap::new();
    }

    let index_of: HashMap<&str, usize> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    // Undirected unit-weight adjacency; self-loops carry no weight here.
    let mut weights: Vec<HashMap<usize, f64>> = vec![HashMap::new(); n];
    for (from, to) in graph.logical_edges() {
        if from == to {
            continue;
        }
        let (i, j) = (index_of[from.as_str()], index_of[to.as_str()]);
        weights[i].insert(j, 1.0);
        weights[j].insert(i, 1.0);
    }

    // membership[v] = community of original node v, refined level by level.
    let mut membership: Vec<usize> = (0..n).collect();
    let mut level_weights = weights;
    let mut self_weights: Vec<f64> = vec![0.0; n];

    for _ in 0..config.max_community_levels {
        let (assignment, improved) =
            local_move(&level_weights, &self_weights, config.max_iterations);

        // Renumber this level's communities consecutively.
        let mut renumber: HashMap<usize, usize> = HashMap::new();
        for community in &assignment {
            let next = renumber.len();
            renumber.entry(*community).or_insert(next);
        }
        let assignment: Vec<usize> = assignment.iter().map(|c| renumber[c]).collect();
        let community_count = renumber.len();

        for community in membership.iter_mut() {
            *community = assignment[*community];
        }

        if !improved || community_count == assignment.len() {
            break;
        }

        // Contract: one super-node per community, aggregating edge weights.
        let mut next_weights: Vec<HashMap<usize, f64>> = vec![HashMap::new(); community_count];
        let mut next_self: Vec<f64> = vec![0.0; community_count];
        for (node, adjacent) in level_weights.iter().enumerate() {
            let home = assignment[node];
            next_self[home] += self_weights[node];
            for (&other, &weight) in adjacent {
                let target = assignment[other];
                if target == home {
                    // Each intra-community edge is seen from both ends.
                    next_self[home] += weight / 2.0;
                } else {
                    *next_weights[home].entry(target).or_insert(0.0) += weight;
                }
            }
        }
        level_weights = next_weights;
        self_weights = next_self;
    }

    ids.into_iter()
        .zip(membership)
        .map(|(id, community)| (id, community))
        .collect()
}

/// Number of communities in the final partition.
pub fn community_count(graph: &DependencyGraph, config: &GraphConfig) -> usize {
    let partition = detect_communities(graph, config);
    let mut communities: Vec<usize> = partition.into_values().collect();
    communities.sort_unstable();
    communities.dedup();
    communities.len()
}

/// One Louvain level: greedily move nodes to the neighboring community with
/// the best modularity gain until a full pass moves nothing or the pass cap
/// is reached. Returns the assignment and whether any node moved.
fn local_move(
    weights: &[HashMap<usize, f64>],
    self_weights: &[f64],
    max_passes: usize,
) -> (Vec<usize>, bool) {
    let n = weights.len();
    let mut community: Vec<usize> = (0..n).collect();

    let degree: Vec<f64> = (0..n)
        .map(|v| weights[v].values().sum::<f64>() + 2.0 * self_weights[v])
        .collect();
    let two_m: f64 = degree.iter().sum();
    if two_m <= 0.0 {
        return (community, false);
    }

    let mut community_total: Vec<f64> = degree.clone();
    let mut improved_any = false;

    for _ in 0..max_passes {
        let mut moved = false;
        for v in 0..n {
            let current = community[v];
            community_total[current] -= degree[v];

            // Weight from v into each adjacent community.
            let mut links: HashMap<usize, f64> = HashMap::new();
            for (&u, &weight) in &weights[v] {
                *links.entry(community[u]).or_insert(0.0) += weight;
            }

            let gain_of = |target: usize, link_weight: f64| {
                link_weight - community_total[target] * degree[v] / two_m
            };

            let stay_gain = gain_of(current, links.get(&current).copied().unwrap_or(0.0));
            let mut best = current;
            let mut best_gain = stay_gain;
            let mut candidates: Vec<usize> = links.keys().copied().collect();
            candidates.sort_unstable();
            for target in candidates {
                let gain = gain_of(target, links[&target]);
                if gain > best_gain + 1e-12 {
                    best = target;
                    best_gain = gain;
                }
            }

            community_total[best] += degree[v];
            if best != current {
                community[v] = best;
                moved = true;
                improved_any = true;
            }
        }
        if !moved {
            break;
        }
    }

    (community, improved_any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EdgeKind, GraphNode, NodeKind};

    fn graph_from(nodes: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for id in nodes {
            graph.add_node(GraphNode::new(*id, *id, NodeKind::Module));
        }
        for (from, to) in edges {
            graph.add_edge_parts(*from, *to, EdgeKind::Uses);
        }
        graph
    }

    #[test]
    fn test_empty_graph_has_no_communities() {
        let partition = detect_communities(&DependencyGraph::new(), &GraphConfig::default());
        assert!(partition.is_empty());
    }

    #[test]
    fn test_nonempty_graph_has_at_least_one_community() {
        let graph = graph_from(&["a"], &[]);
        assert_eq!(community_count(&graph, &GraphConfig::default()), 1);
    }

    #[test]
    fn test_edgeless_nodes_stay_separate() {
        let graph = graph_from(&["a", "b", "c"], &[]);
        assert_eq!(community_count(&graph, &GraphConfig::default()), 3);
    }

    #[test]
    fn test_two_dense_clusters() {
        // Two triangles joined by a single bridge edge.
        let graph = graph_from(
            &["a", "b", "c", "x", "y", "z"],
            &[
                ("a", "b"),
                ("b", "c"),
                ("c", "a"),
                ("x", "y"),
                ("y", "z"),
                ("z", "x"),
                ("c", "x"),
            ],
        );
        let config = GraphConfig::default();
        let partition = detect_communities(&graph, &config);
        assert_eq!(community_count(&graph, &config), 2);
        assert_eq!(partition["a"], partition["b"]);
        assert_eq!(partition["b"], partition["c"]);
        assert_eq!(partition["x"], partition["y"]);
        assert_ne!(partition["a"], partition["x"]);
    }

    #[test]
    fn test_partition_covers_every_node() {
        let graph = graph_from(&["a", "b", "c", "d"], &[("a", "b"), ("c", "d")]);
        let partition = detect_communities(&graph, &GraphConfig::default());
        assert_eq!(partition.len(), 4);
    }

    #[test]
    fn test_self_loop_only_graph() {
        let graph = graph_from(&["a", "b"], &[("a", "a")]);
        assert_eq!(community_count(&graph, &GraphConfig::default()), 2);
    }
}
