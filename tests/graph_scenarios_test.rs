//! End-to-end metric scenarios over hand-built graphs.

use pretty_assertions::assert_eq;

use depmap::{DependencyGraph, EdgeKind, GraphNode, MetricsEngine, NodeKind};

fn graph_from(nodes: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for id in nodes {
        graph.add_node(GraphNode::new(*id, *id, NodeKind::File));
    }
    for (from, to) in edges {
        graph.add_edge_parts(*from, *to, EdgeKind::Import);
    }
    graph
}

#[test]
fn test_empty_graph_scenario() {
    let graph = DependencyGraph::new();
    let metrics = MetricsEngine::new().calculate(&graph);

    assert_eq!(metrics.summary.total_nodes, 0);
    assert_eq!(metrics.summary.total_edges, 0);
    assert_eq!(metrics.summary.density, 0.0);
    assert_eq!(metrics.summary.diameter, 0);
    assert_eq!(metrics.summary.radius, 0);

    // Export still emits a valid header line.
    let diagram = depmap::to_diagram(&graph, &depmap::DiagramOptions::default());
    assert!(diagram.starts_with("graph TD"));
}

#[test]
fn test_five_node_ring_scenario() {
    let graph = graph_from(
        &["a", "b", "c", "d", "e"],
        &[("a", "b"), ("b", "c"), ("c", "d"), ("d", "e"), ("e", "a")],
    );
    let metrics = MetricsEngine::new().calculate(&graph);

    assert!(metrics.summary.is_cyclic);
    assert_eq!(metrics.summary.cycle_count, 1);
    assert_eq!(metrics.summary.component_count, 1);
    assert_eq!(metrics.summary.largest_component, 5);

    let ranks: Vec<f64> = metrics
        .node_metrics
        .values()
        .map(|m| m.pagerank)
        .collect();
    for rank in &ranks {
        assert!(*rank > 0.0);
        assert!((rank - ranks[0]).abs() < 1e-6);
    }
}

#[test]
fn test_star_topology_scenario() {
    let graph = graph_from(
        &["x", "a", "b", "c", "d", "e"],
        &[("a", "x"), ("b", "x"), ("c", "x"), ("d", "x"), ("e", "x")],
    );
    let metrics = MetricsEngine::new().calculate(&graph);

    for leaf in ["a", "b", "c", "d", "e"] {
        assert_eq!(metrics.node(leaf).unwrap().clustering, 0.0);
    }

    let center = metrics.node("x").unwrap();
    for leaf in ["a", "b", "c", "d", "e"] {
        let leaf_metrics = metrics.node(leaf).unwrap();
        assert!(center.degree > leaf_metrics.degree);
        assert!(center.pagerank > leaf_metrics.pagerank);
    }
}

#[test]
fn test_reciprocity_scenario() {
    let graph = graph_from(&["a", "b", "c"], &[("a", "b"), ("b", "a"), ("b", "c")]);
    let metrics = MetricsEngine::new().calculate(&graph);
    assert!((metrics.summary.reciprocity - 2.0 / 3.0).abs() < 1e-3);
}

#[test]
fn test_cycle_reporting_scenarios() {
    // Directed 2-cycle: one group of two.
    let two = graph_from(&["a", "b"], &[("a", "b"), ("b", "a")]);
    let groups = depmap::detect_cycles(&two);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);

    // 3-cycle: one group.
    let three = graph_from(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
    assert_eq!(depmap::detect_cycles(&three).len(), 1);

    // Two disjoint 2-cycles: two groups.
    let disjoint = graph_from(
        &["a", "b", "c", "d"],
        &[("a", "b"), ("b", "a"), ("c", "d"), ("d", "c")],
    );
    assert_eq!(depmap::detect_cycles(&disjoint).len(), 2);

    // Linear chain: none.
    let chain = graph_from(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
    assert!(depmap::detect_cycles(&chain).is_empty());

    // Lone self-loop: none.
    let self_loop = graph_from(&["a"], &[("a", "a")]);
    assert!(depmap::detect_cycles(&self_loop).is_empty());
}

#[test]
fn test_self_loop_only_graph_is_fully_defined() {
    let graph = graph_from(&["a", "b"], &[("a", "a"), ("b", "b")]);
    let metrics = MetricsEngine::new().calculate(&graph);

    assert!(!metrics.summary.is_cyclic);
    assert_eq!(metrics.summary.cycle_count, 0);
    assert_eq!(metrics.summary.global_clustering, 0.0);
    assert_eq!(metrics.summary.component_count, 2);
    for node in metrics.node_metrics.values() {
        assert_eq!(node.clustering, 0.0);
        assert!(node.pagerank >= 0.0);
        assert!(node.eigenvector >= 0.0);
    }
}

#[test]
fn test_community_count_is_positive_for_nonempty_graphs() {
    let single = graph_from(&["a"], &[]);
    let metrics = MetricsEngine::new().calculate(&single);
    assert!(metrics.summary.community_count >= 1);

    let clusters = graph_from(
        &["a", "b", "c", "x", "y", "z"],
        &[
            ("a", "b"),
            ("b", "c"),
            ("c", "a"),
            ("x", "y"),
            ("y", "z"),
            ("z", "x"),
        ],
    );
    let metrics = MetricsEngine::new().calculate(&clusters);
    assert_eq!(metrics.summary.community_count, 2);
}

#[test]
fn test_metrics_do_not_mutate_the_graph() {
    let graph = graph_from(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
    let before_nodes = graph.node_count();
    let before_edges = graph.edge_count();

    let _ = MetricsEngine::new().calculate(&graph);
    let _ = depmap::detect_cycles(&graph);
    let _ = depmap::prune(&graph, 1, 1);

    assert_eq!(graph.node_count(), before_nodes);
    assert_eq!(graph.edge_count(), before_edges);
}
