//! Bounded display copies of a dependency graph.
//!
//! Pruning never mutates its input: the result is an independent value copy.
//! Nodes are ranked by total degree descending with ascending-id tie-break;
//! surviving edges keep their original encounter order and are truncated to
//! the edge cap. A zero cap is a defined policy (empty graph), not an error.

use std::collections::HashSet;

use crate::core::DependencyGraph;

/// Produce a copy of `graph` with at most `max_nodes` nodes and `max_edges`
/// edges. A graph already within both caps is copied unchanged.
pub fn prune(graph: &DependencyGraph, max_nodes: usize, max_edges: usize) -> DependencyGraph {
    if max_nodes == 0 || max_edges == 0 {
        return DependencyGraph::new();
    }
    if graph.node_count() <= max_nodes && graph.edge_count() <= max_edges {
        return graph.clone();
    }

    let degrees = graph.degrees();
    let mut ranked: Vec<&str> = graph.nodes().map(|n| n.id.as_str()).collect();
    ranked.sort_by(|a, b| {
        let degree_a = degrees.get(*a).copied().unwrap_or(0);
        let degree_b = degrees.get(*b).copied().unwrap_or(0);
        degree_b.cmp(&degree_a).then_with(|| a.cmp(b))
    });

    let kept: HashSet<&str> = ranked.into_iter().take(max_nodes).collect();

    let mut pruned = DependencyGraph::new();
    for node in graph.nodes() {
        if kept.contains(node.id.as_str()) {
            pruned.add_node(node.clone());
        }
    }

    let mut retained = 0usize;
    for edge in graph.edges() {
        if retained >= max_edges {
            break;
        }
        if kept.contains(edge.from.as_str()) && kept.contains(edge.to.as_str()) {
            pruned.add_edge(edge.clone());
            retained += 1;
        }
    }

    pruned
}
