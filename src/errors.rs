//! Error types for graph construction.
//!
//! Per-file inspection failures follow the "fail completely" pattern: each
//! file is inspected independently, failures are collected and returned next
//! to the graph instead of aborting the build. Only configuration problems
//! surface as hard errors.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors, fatal to the call that received them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown graph scope: {0}")]
    UnknownScope(String),
    #[error("invalid option: {0}")]
    InvalidOption(String),
}

/// Which stage of per-file processing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailedOperation {
    FileRead,
    Inspect,
    DeadlineExceeded,
}

impl FailedOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileRead => "File read",
            Self::Inspect => "Inspection",
            Self::DeadlineExceeded => "Deadline exceeded",
        }
    }
}

/// A file that contributed nothing to the graph, and why.
#[derive(Debug, Clone)]
pub struct BuildFailure {
    pub path: PathBuf,
    pub operation: FailedOperation,
    pub error: String,
}

impl BuildFailure {
    pub fn new(path: PathBuf, operation: FailedOperation, error: anyhow::Error) -> Self {
        Self {
            path,
            operation,
            error: format!("{error:#}"),
        }
    }

    pub fn file_read(path: PathBuf, error: anyhow::Error) -> Self {
        Self::new(path, FailedOperation::FileRead, error)
    }

    pub fn inspect(path: PathBuf, error: anyhow::Error) -> Self {
        Self::new(path, FailedOperation::Inspect, error)
    }

    pub fn deadline(path: PathBuf) -> Self {
        Self {
            path,
            operation: FailedOperation::DeadlineExceeded,
            error: "inspection not started before deadline".to_string(),
        }
    }
}
