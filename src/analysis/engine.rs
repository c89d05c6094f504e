//! Metrics orchestration: one read-only pass deriving the full
//! [`GraphMetrics`] snapshot from an immutable graph.

use std::collections::HashMap;

use crate::analysis::{centrality, communities, cycles, structure};
use crate::config::GraphConfig;
use crate::core::metrics::{GraphMetrics, GraphSummary, NodeMetrics};
use crate::core::DependencyGraph;

pub struct MetricsEngine {
    config: GraphConfig,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self { config }
    }

    /// Compute the full metrics battery, structural measures first, then the
    /// iterative centralities, then cycle and community analysis.
    ///
    /// Total and side-effect free: every degenerate input (empty graph,
    /// single node, self-loops only, fully disconnected) produces defined
    /// zero or empty values.
    pub fn calculate(&self, graph: &DependencyGraph) -> GraphMetrics {
        log::debug!(
            "Calculating metrics for {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        let degrees = graph.degrees();
        let density = structure::density(graph);
        let (component_count, largest_component) = structure::components(graph);

        let pagerank = centrality::pagerank(graph, &self.config);
        let betweenness = centrality::betweenness(graph);
        let closeness_harmonic = centrality::closeness_harmonic(graph);
        let eigenvector = centrality::eigenvector(graph, &self.config);
        let clustering = structure::local_clustering(graph);

        let node_metrics: HashMap<String, NodeMetrics> = graph
            .sorted_node_ids()
            .into_iter()
            .map(|id| {
                let (closeness, harmonic) =
                    closeness_harmonic.get(&id).copied().unwrap_or((0.0, 0.0));
                let metrics = NodeMetrics {
                    degree: degrees.get(&id).copied().unwrap_or(0),
                    pagerank: pagerank.get(&id).copied().unwrap_or(0.0),
                    betweenness: betweenness.get(&id).copied().unwrap_or(0.0),
                    closeness,
                    harmonic,
                    eigenvector: eigenvector.get(&id).copied().unwrap_or(0.0),
                    clustering: clustering.get(&id).copied().unwrap_or(0.0),
                };
                (id, metrics)
            })
            .collect();

        let cycle_groups = cycles::detect_cycles(graph);
        let cycle_count = cycle_groups.len();
        let community_count = communities::community_count(graph, &self.config);
        let (diameter, radius) = structure::diameter_radius(graph);

        let summary = GraphSummary {
            total_nodes: graph.node_count(),
            total_edges: graph.edge_count(),
            density,
            component_count,
            largest_component,
            is_cyclic: cycle_count > 0,
            cycle_count,
            community_count,
            global_clustering: structure::global_clustering(graph),
            assortativity: structure::assortativity(graph),
            reciprocity: structure::reciprocity(graph),
            diameter,
            radius,
        };

        GraphMetrics {
            node_metrics,
            summary,
        }
    }
}
