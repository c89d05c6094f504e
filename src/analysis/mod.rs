//! Graph analytics: centrality measures, structural metrics, cycle and
//! community detection, orchestrated by [`engine::MetricsEngine`].
//!
//! Every pass here is single-threaded, synchronous, and read-only over an
//! immutable graph snapshot. Degenerate inputs (empty, single-node,
//! self-loop-only, disconnected) produce defined zero/empty results, never
//! errors.

pub mod centrality;
pub mod communities;
pub mod cycles;
pub mod engine;
pub mod structure;

pub use communities::{community_count, detect_communities};
pub use cycles::detect_cycles;
pub use engine::MetricsEngine;
