pub mod graph;

pub use graph::{BuildOutcome, BuildStats, GraphBuilder};
