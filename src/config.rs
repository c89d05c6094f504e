use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::ConfigError;

/// Tunables for the iterative graph algorithms and the build worker pool.
///
/// Loaded from a `.depmap.toml` file when present; every field falls back to
/// its default so a partial file is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Iteration cap for PageRank, eigenvector centrality, and the Louvain
    /// local-move phase.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Convergence tolerance for the iterative centrality algorithms.
    #[serde(default = "default_convergence_threshold")]
    pub convergence_threshold: f64,

    /// PageRank damping factor.
    #[serde(default = "default_damping_factor")]
    pub damping_factor: f64,

    /// Cap on Louvain contraction levels.
    #[serde(default = "default_max_community_levels")]
    pub max_community_levels: usize,

    /// Worker threads for the parallel builder (0 = rayon default).
    #[serde(default)]
    pub num_threads: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            convergence_threshold: default_convergence_threshold(),
            damping_factor: default_damping_factor(),
            max_community_levels: default_max_community_levels(),
            num_threads: 0,
        }
    }
}

fn default_max_iterations() -> usize {
    100
}

fn default_convergence_threshold() -> f64 {
    1e-6
}

fn default_damping_factor() -> f64 {
    0.85
}

fn default_max_community_levels() -> usize {
    10
}

impl GraphConfig {
    /// Load configuration from a TOML file, validating option ranges.
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: GraphConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.depmap.toml` from the given directory, falling back to defaults
    /// when the file does not exist.
    pub fn load_or_default(dir: &Path) -> anyhow::Result<Self> {
        let path = dir.join(".depmap.toml");
        if path.is_file() {
            Self::from_toml_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::InvalidOption(
                "max_iterations must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.damping_factor) {
            return Err(ConfigError::InvalidOption(format!(
                "damping_factor must be in [0, 1): {}",
                self.damping_factor
            )));
        }
        if self.convergence_threshold <= 0.0 {
            return Err(ConfigError::InvalidOption(
                "convergence_threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
