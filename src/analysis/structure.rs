//! Structural graph metrics: density, connectivity, clustering,
//! assortativity, reciprocity, and eccentricity-derived measures.
//!
//! All computations work over the logical adjacency (duplicate edges
//! collapsed, unknown endpoints ignored); connectivity and clustering treat
//! the graph as undirected.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::core::DependencyGraph;

/// Edge density over ordered node pairs: `E / (N * (N - 1))`, with E the
/// logical non-loop edge count. 0 for graphs with fewer than two nodes.
pub fn density(graph: &DependencyGraph) -> f64 {
    let n = graph.node_count();
    if n <= 1 {
        return 0.0;
    }
    let logical = graph
        .logical_edges()
        .into_iter()
        .filter(|(from, to)| from != to)
        .count();
    logical as f64 / (n * (n - 1)) as f64
}

/// Connected components of the undirected view: (count, size of largest).
pub fn components(graph: &DependencyGraph) -> (usize, usize) {
    let neighbors = graph.undirected_neighbors();
    let mut visited: HashSet<&String> = HashSet::new();
    let mut count = 0;
    let mut largest = 0;

    for id in neighbors.keys() {
        if visited.contains(id) {
            continue;
        }
        count += 1;
        let mut size = 0;
        let mut queue: VecDeque<&String> = VecDeque::new();
        visited.insert(id);
        queue.push_back(id);
        while let Some(v) = queue.pop_front() {
            size += 1;
            if let Some(adjacent) = neighbors.get(v.as_str()) {
                for w in adjacent {
                    if visited.insert(w) {
                        queue.push_back(w);
                    }
                }
            }
        }
        largest = largest.max(size);
    }

    (count, largest)
}

/// Local clustering coefficient per node: connected neighbor pairs over
/// possible neighbor pairs in the undirected view. Self-loops never count.
pub fn local_clustering(graph: &DependencyGraph) -> HashMap<String, f64> {
    let neighbors = graph.undirected_neighbors();
    let mut result = HashMap::with_capacity(neighbors.len());

    for (id, adjacent) in &neighbors {
        let k = adjacent.len();
        if k < 2 {
            result.insert(id.clone(), 0.0);
            continue;
        }
        let nodes: Vec<&String> = adjacent.iter().collect();
        let mut linked = 0usize;
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                if neighbors
                    .get(nodes[i].as_str())
                    .is_some_and(|set| set.contains(nodes[j].as_str()))
                {
                    linked += 1;
                }
            }
        }
        let possible = k * (k - 1) / 2;
        result.insert(id.clone(), linked as f64 / possible as f64);
    }

    result
}

/// Global clustering coefficient: closed triples over connected triples,
/// equivalently `3 * triangles / triples`. 0 when no triples exist.
pub fn global_clustering(graph: &DependencyGraph) -> f64 {
    let neighbors = graph.undirected_neighbors();
    let mut closed = 0usize;
    let mut triples = 0usize;

    for adjacent in neighbors.values() {
        let k = adjacent.len();
        if k < 2 {
            continue;
        }
        triples += k * (k - 1) / 2;
        let nodes: Vec<&String> = adjacent.iter().collect();
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                if neighbors
                    .get(nodes[i].as_str())
                    .is_some_and(|set| set.contains(nodes[j].as_str()))
                {
                    closed += 1;
                }
            }
        }
    }

    if triples == 0 {
        0.0
    } else {
        closed as f64 / triples as f64
    }
}

/// Degree assortativity: Pearson correlation between the total degrees of
/// edge endpoints. 0 for graphs without edges or with zero degree variance.
pub fn assortativity(graph: &DependencyGraph) -> f64 {
    let degrees = graph.degrees();
    let pairs: Vec<(f64, f64)> = graph
        .logical_edges()
        .into_iter()
        .filter(|(from, to)| from != to)
        .map(|(from, to)| (degrees[&from] as f64, degrees[&to] as f64))
        .collect();

    let m = pairs.len() as f64;
    if pairs.is_empty() {
        return 0.0;
    }

    let mean_x: f64 = pairs.iter().map(|(x, _)| x).sum::<f64>() / m;
    let mean_y: f64 = pairs.iter().map(|(_, y)| y).sum::<f64>() / m;
    let covariance: f64 = pairs
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum::<f64>()
        / m;
    let var_x: f64 = pairs.iter().map(|(x, _)| (x - mean_x).powi(2)).sum::<f64>() / m;
    let var_y: f64 = pairs.iter().map(|(_, y)| (y - mean_y).powi(2)).sum::<f64>() / m;

    let denominator = (var_x * var_y).sqrt();
    if denominator < f64::EPSILON {
        return 0.0;
    }
    (covariance / denominator).clamp(-1.0, 1.0)
}

/// Fraction of directed logical edges whose reverse edge also exists.
pub fn reciprocity(graph: &DependencyGraph) -> f64 {
    let edges = graph.logical_edges();
    if edges.is_empty() {
        return 0.0;
    }
    let reciprocated = edges
        .iter()
        .filter(|(from, to)| edges.contains(&(to.clone(), from.clone())))
        .count();
    reciprocated as f64 / edges.len() as f64
}

/// Diameter and radius from all-pairs eccentricities over the undirected
/// view. Both 0 for graphs with fewer than two nodes.
pub fn diameter_radius(graph: &DependencyGraph) -> (usize, usize) {
    let n = graph.node_count();
    if n <= 1 {
        return (0, 0);
    }

    let neighbors = graph.undirected_neighbors();
    let mut diameter = 0usize;
    let mut radius = usize::MAX;

    for source in neighbors.keys() {
        let mut dist: HashMap<&String, usize> = HashMap::new();
        let mut queue: VecDeque<&String> = VecDeque::new();
        dist.insert(source, 0);
        queue.push_back(source);
        let mut eccentricity = 0usize;
        while let Some(v) = queue.pop_front() {
            let d_v = dist[v];
            eccentricity = eccentricity.max(d_v);
            if let Some(adjacent) = neighbors.get(v.as_str()) {
                for w in adjacent {
                    if !dist.contains_key(w) {
                        dist.insert(w, d_v + 1);
                        queue.push_back(w);
                    }
                }
            }
        }
        diameter = diameter.max(eccentricity);
        radius = radius.min(eccentricity);
    }

    if radius == usize::MAX {
        radius = 0;
    }
    (diameter, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EdgeKind, GraphNode, NodeKind};

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
    fn test_density_bounds() {
        assert_eq!(density(&DependencyGraph::new()), 0.0);
        let single = graph_from(&["a"], &[]);
        assert_eq!(density(&single), 0.0);

        let complete = graph_from(&["a", "b"], &[("a", "b"), ("b", "a")]);
        assert_eq!(density(&complete), 1.0);
    }

    #[test]
    fn test_density_ignores_duplicates_and_loops() {
        let graph = graph_from(&["a", "b"], &[("a", "b"), ("a", "b"), ("a", "a")]);
        assert_eq!(density(&graph), 0.5);
    }

    #[test]
    fn test_components_disconnected() {
        let graph = graph_from(&["a", "b", "c", "d"], &[("a", "b"), ("c", "d")]);
        assert_eq!(components(&graph), (2, 2));
    }

    #[test]
    fn test_components_counts_isolated_nodes() {
        let graph = graph_from(&["a", "b", "c"], &[("a", "b")]);
        assert_eq!(components(&graph), (2, 2));
    }

    #[test]
    fn test_local_clustering_triangle() {
        let graph = graph_from(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let clustering = local_clustering(&graph);
        assert_eq!(clustering["a"], 1.0);
        assert_eq!(clustering["b"], 1.0);
        assert_eq!(clustering["c"], 1.0);
        assert_eq!(global_clustering(&graph), 1.0);
    }

    #[test]
    fn test_clustering_star_is_zero() {
        let graph = graph_from(
            &["x", "a", "b", "c"],
            &[("a", "x"), ("b", "x"), ("c", "x")],
        );
        let clustering = local_clustering(&graph);
        assert_eq!(clustering["a"], 0.0);
        assert_eq!(clustering["x"], 0.0);
        assert_eq!(global_clustering(&graph), 0.0);
    }

    #[test]
    fn test_reciprocity_two_thirds() {
        let graph = graph_from(&["a", "b", "c"], &[("a", "b"), ("b", "a"), ("b", "c")]);
        assert!((reciprocity(&graph) - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_reciprocity_empty() {
        assert_eq!(reciprocity(&DependencyGraph::new()), 0.0);
    }

    #[test]
    fn test_assortativity_in_range() {
        let graph = graph_from(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("c", "d"), ("d", "a")],
        );
        let r = assortativity(&graph);
        assert!((-1.0..=1.0).contains(&r));
    }

    #[test]
    fn test_assortativity_degenerate_is_zero() {
        assert_eq!(assortativity(&DependencyGraph::new()), 0.0);
        let single_edge = graph_from(&["a", "b"], &[("a", "b")]);
        assert_eq!(assortativity(&single_edge), 0.0);
    }

    #[test]
    fn test_diameter_radius_chain() {
        let graph = graph_from(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let (diameter, radius) = diameter_radius(&graph);
        assert_eq!(diameter, 2);
        assert_eq!(radius, 1);
    }

    #[test]
    fn test_diameter_radius_trivial() {
        assert_eq!(diameter_radius(&DependencyGraph::new()), (0, 0));
        let single = graph_from(&["a"], &[]);
        assert_eq!(diameter_radius(&single), (0, 0));
    }
}
