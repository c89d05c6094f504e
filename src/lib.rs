// Export modules for library usage
pub mod analysis;
pub mod analyzers;
pub mod builders;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;
pub mod prune;

// Re-export commonly used types
pub use crate::core::{
    metrics::{GraphMetrics, GraphSummary, NodeMetrics},
    DependencyGraph, EdgeKind, GraphEdge, GraphNode, GraphScope, NodeKind,
};

pub use crate::analysis::{community_count, detect_communities, detect_cycles, MetricsEngine};

pub use crate::builders::{BuildOutcome, BuildStats, GraphBuilder};

pub use crate::config::GraphConfig;

pub use crate::errors::{BuildFailure, ConfigError, FailedOperation};

pub use crate::analyzers::{get_inspector, FileInspector, FileReport, Language};

pub use crate::io::mermaid::{to_diagram, DiagramDirection, DiagramOptions};

pub use crate::prune::prune;
