//! Iterative and path-based centrality measures.
//!
//! PageRank and eigenvector centrality are bounded fixed-point loops with an
//! explicit convergence tolerance and iteration cap, so they terminate on
//! pathological inputs. Betweenness, closeness, and harmonic centrality come
//! from repeated single-source BFS expansion over the directed adjacency.

use std::collections::{HashMap, VecDeque};

use crate::config::GraphConfig;
use crate::core::DependencyGraph;

/// PageRank with rank mass from dangling nodes redistributed uniformly.
///
/// Scores are non-negative and sum to approximately 1 for any non-empty
/// graph.
pub fn pagerank(graph: &DependencyGraph, config: &GraphConfig) -> HashMap<String, f64> {
    let ids = graph.sorted_node_ids();
    let n = ids.len();
    if n == 0 {
        return HashMap::new();
    }

    let adj = graph.adjacency();
    let radj = graph.reverse_adjacency();
    let damping = config.damping_factor;

    let mut ranks: HashMap<String, f64> = ids.iter().map(|id| (id.clone(), 1.0 / n as f64)).collect();

    for iteration in 0..config.max_iterations {
        let dangling_mass: f64 = ids
            .iter()
            .filter(|id| adj.get(id.as_str()).is_none_or(|out| out.is_empty()))
            .map(|id| ranks[id])
            .sum();
        let base = (1.0 - damping) / n as f64 + damping * dangling_mass / n as f64;

        let mut next: HashMap<String, f64> = HashMap::with_capacity(n);
        for id in &ids {
            let incoming: f64 = radj
                .get(id)
                .map(|sources| {
                    sources
                        .iter()
                        .map(|source| {
                            let out_degree = adj.get(source).map_or(0, |s| s.len());
                            if out_degree > 0 {
                                ranks[source] / out_degree as f64
                            } else {
                                0.0
                            }
                        })
                        .sum()
                })
                .unwrap_or(0.0);
            next.insert(id.clone(), base + damping * incoming);
        }

        let delta: f64 = ids.iter().map(|id| (next[id] - ranks[id]).abs()).sum();
        ranks = next;

        if delta < config.convergence_threshold {
            log::debug!("PageRank converged after {} iterations", iteration + 1);
            break;
        }
    }

    ranks
}

/// Betweenness centrality: the fraction of all-pairs shortest paths passing
/// through each node, via Brandes-style accumulation over one BFS per source.
pub fn betweenness(graph: &DependencyGraph) -> HashMap<String, f64> {
    let ids = graph.sorted_node_ids();
    let n = ids.len();
    let mut scores: HashMap<String, f64> = ids.iter().map(|id| (id.clone(), 0.0)).collect();
    if n <= 2 {
        return scores;
    }

    let adj = graph.adjacency();

    for source in &ids {
        let mut visit_order: Vec<&String> = Vec::new();
        let mut predecessors: HashMap<&String, Vec<&String>> = HashMap::new();
        let mut sigma: HashMap<&String, f64> = HashMap::new();
        let mut dist: HashMap<&String, usize> = HashMap::new();
        let mut queue: VecDeque<&String> = VecDeque::new();

        sigma.insert(source, 1.0);
        dist.insert(source, 0);
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            visit_order.push(v);
            let d_v = dist[v];
            if let Some(successors) = adj.get(v.as_str()) {
                for w in successors {
                    if !dist.contains_key(w) {
                        dist.insert(w, d_v + 1);
                        queue.push_back(w);
                    }
                    if dist[w] == d_v + 1 {
                        let sigma_v = sigma[v];
                        *sigma.entry(w).or_insert(0.0) += sigma_v;
                        predecessors.entry(w).or_default().push(v);
                    }
                }
            }
        }

        let mut delta: HashMap<&String, f64> = HashMap::new();
        for w in visit_order.iter().rev() {
            let d_w = delta.get(w).copied().unwrap_or(0.0);
            if let Some(preds) = predecessors.get(w) {
                for v in preds {
                    let share = sigma[*v] / sigma[*w] * (1.0 + d_w);
                    *delta.entry(*v).or_insert(0.0) += share;
                }
            }
            if *w != source {
                *scores.get_mut(w.as_str()).expect("known node") += d_w;
            }
        }
    }

    // Normalize by the number of ordered pairs not involving the node.
    let pairs = ((n - 1) * (n - 2)) as f64;
    for score in scores.values_mut() {
        *score /= pairs;
    }
    scores
}

/// Closeness (reachable count over total distance) and harmonic (sum of
/// inverse distances) centrality; both 0 for nodes with no reachable targets.
pub fn closeness_harmonic(graph: &DependencyGraph) -> HashMap<String, (f64, f64)> {
    let ids = graph.sorted_node_ids();
    let adj = graph.adjacency();
    let mut result = HashMap::with_capacity(ids.len());

    for source in &ids {
        let distances = bfs_distances(source, &adj);
        let mut total_distance = 0.0;
        let mut harmonic = 0.0;
        let mut reachable = 0usize;
        for (target, d) in &distances {
            if *target == source || *d == 0 {
                continue;
            }
            total_distance += *d as f64;
            harmonic += 1.0 / *d as f64;
            reachable += 1;
        }
        let closeness = if reachable > 0 {
            reachable as f64 / total_distance
        } else {
            0.0
        };
        result.insert(source.clone(), (closeness, harmonic));
    }
    result
}

fn bfs_distances<'a>(
    source: &'a String,
    adj: &'a std::collections::HashMap<String, std::collections::HashSet<String>>,
) -> HashMap<&'a String, usize> {
    let mut dist: HashMap<&String, usize> = HashMap::new();
    let mut queue: VecDeque<&String> = VecDeque::new();
    dist.insert(source, 0);
    queue.push_back(source);
    while let Some(v) = queue.pop_front() {
        let d_v = dist[v];
        if let Some(successors) = adj.get(v.as_str()) {
            for w in successors {
                if !dist.contains_key(w) {
                    dist.insert(w, d_v + 1);
                    queue.push_back(w);
                }
            }
        }
    }
    dist
}

/// Eigenvector centrality by power iteration over the undirected neighbor
/// relation, L2-renormalized every step to prevent overflow.
///
/// Returns an all-zero vector for an edgeless (or empty) graph rather than an
/// error.
pub fn eigenvector(graph: &DependencyGraph, config: &GraphConfig) -> HashMap<String, f64> {
    let ids = graph.sorted_node_ids();
    let n = ids.len();
    if n == 0 {
        return HashMap::new();
    }

    let neighbors = graph.undirected_neighbors();
    if neighbors.values().all(|set| set.is_empty()) {
        return ids.iter().map(|id| (id.clone(), 0.0)).collect();
    }

    let initial = 1.0 / (n as f64).sqrt();
    let mut values: HashMap<String, f64> = ids.iter().map(|id| (id.clone(), initial)).collect();

    for iteration in 0..config.max_iterations {
        let mut next: HashMap<String, f64> = HashMap::with_capacity(n);
        for id in &ids {
            let sum: f64 = neighbors
                .get(id)
                .map(|set| set.iter().map(|u| values[u]).sum())
                .unwrap_or(0.0);
            next.insert(id.clone(), sum);
        }

        let norm: f64 = next.values().map(|v| v * v).sum::<f64>().sqrt();
        if norm < f64::EPSILON {
            // The walk died out (e.g. isolated nodes only feeding nothing).
            return ids.iter().map(|id| (id.clone(), 0.0)).collect();
        }
        for value in next.values_mut() {
            *value /= norm;
        }

        let delta: f64 = ids.iter().map(|id| (next[id] - values[id]).abs()).sum();
        values = next;

        if delta < config.convergence_threshold {
            log::debug!(
                "Eigenvector centrality converged after {} iterations",
                iteration + 1
            );
            break;
        }
    }

    values
}
