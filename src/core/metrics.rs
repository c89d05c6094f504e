use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-node structural and centrality scores.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMetrics {
    /// Total (in + out) logical degree.
    pub degree: usize,
    pub pagerank: f64,
    pub betweenness: f64,
    pub closeness: f64,
    pub harmonic: f64,
    pub eigenvector: f64,
    pub clustering: f64,
}

/// Graph-level summary derived from a single analysis pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub density: f64,
    pub component_count: usize,
    pub largest_component: usize,
    pub is_cyclic: bool,
    pub cycle_count: usize,
    pub community_count: usize,
    pub global_clustering: f64,
    pub assortativity: f64,
    pub reciprocity: f64,
    pub diameter: usize,
    pub radius: usize,
}

/// Immutable metrics snapshot: computed once per graph, consumed by the
/// reporting layer, then discarded.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GraphMetrics {
    pub node_metrics: HashMap<String, NodeMetrics>,
    pub summary: GraphSummary,
}

impl GraphMetrics {
    pub fn node(&self, id: &str) -> Option<&NodeMetrics> {
        self.node_metrics.get(id)
    }

    /// Node ids ranked by pagerank descending, id ascending on ties.
    pub fn rank_by_pagerank(&self) -> Vec<&str> {
        let mut ranked: Vec<(&str, f64)> = self
            .node_metrics
            .iter()
            .map(|(id, m)| (id.as_str(), m.pagerank))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        ranked.into_iter().map(|(id, _)| id).collect()
    }

    /// Node ids ranked by total degree descending, id ascending on ties.
    pub fn rank_by_degree(&self) -> Vec<&str> {
        let mut ranked: Vec<(&str, usize)> = self
            .node_metrics
            .iter()
            .map(|(id, m)| (id.as_str(), m.degree))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.into_iter().map(|(id, _)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics_with(values: &[(&str, f64, usize)]) -> GraphMetrics {
        let node_metrics = values
            .iter()
            .map(|(id, pagerank, degree)| {
                (
                    id.to_string(),
                    NodeMetrics {
                        degree: *degree,
                        pagerank: *pagerank,
                        ..Default::default()
                    },
                )
            })
            .collect();
        GraphMetrics {
            node_metrics,
            summary: GraphSummary::default(),
        }
    }

    #[test]
    fn test_rank_by_pagerank_orders_descending() {
        let metrics = metrics_with(&[("a", 0.2, 1), ("b", 0.5, 1), ("c", 0.3, 1)]);
        assert_eq!(metrics.rank_by_pagerank(), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_rank_by_degree_breaks_ties_by_id() {
        let metrics = metrics_with(&[("b", 0.0, 2), ("a", 0.0, 2), ("c", 0.0, 5)]);
        assert_eq!(metrics.rank_by_degree(), vec!["c", "a", "b"]);
    }
}
