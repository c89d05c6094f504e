//! Parallel dependency graph construction.
//!
//! Per-file inspection fans out over a rayon worker pool; each worker produces
//! a partial result that is merged through a single mutex-guarded accumulator.
//! A file that cannot be read or inspected contributes nothing and is recorded
//! as a [`BuildFailure`]; only configuration problems fail the build itself.

use anyhow::Result;
use parking_lot::Mutex;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::analyzers::{get_inspector, FileReport, Language};
use crate::config::GraphConfig;
use crate::core::{DependencyGraph, EdgeKind, GraphScope, NodeKind};
use crate::errors::BuildFailure;
use crate::io;

/// Progress counters for a build, safe to read from other threads.
#[derive(Debug, Default)]
pub struct BuildStats {
    pub total_files: AtomicUsize,
    pub files_processed: AtomicUsize,
    pub files_failed: AtomicUsize,
}

impl BuildStats {
    pub fn progress_ratio(&self) -> f64 {
        let processed = self.files_processed.load(Ordering::Relaxed) as f64;
        let total = self.total_files.load(Ordering::Relaxed) as f64;
        if total > 0.0 {
            processed / total
        } else {
            0.0
        }
    }
}

/// A built graph together with the files that contributed nothing.
#[derive(Debug)]
pub struct BuildOutcome {
    pub graph: DependencyGraph,
    pub failures: Vec<BuildFailure>,
}

pub struct GraphBuilder {
    config: GraphConfig,
    deadline: Option<Instant>,
    stats: Arc<BuildStats>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            deadline: None,
            stats: Arc::new(BuildStats::default()),
        }
    }

    /// Files whose inspection has not started by this instant are skipped and
    /// recorded like any other inspection failure.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn stats(&self) -> &Arc<BuildStats> {
        &self.stats
    }

    /// Build a dependency graph from a fixed file set at the given scope.
    ///
    /// Returns `Err` only for configuration problems; per-file failures are
    /// collected in the outcome.
    pub fn build(&self, files: &[PathBuf], scope: GraphScope) -> Result<BuildOutcome> {
        self.config.validate()?;

        if self.config.num_threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.num_threads)
                .build_global()
                .ok(); // ignore if already configured
        }

        self.stats.total_files.store(files.len(), Ordering::Relaxed);
        log::info!("Inspecting {} files at {} scope", files.len(), scope);

        let reports: Mutex<Vec<FileReport>> = Mutex::new(Vec::new());
        let failures: Mutex<Vec<BuildFailure>> = Mutex::new(Vec::new());

        files.par_iter().for_each(|path| {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    failures.lock().push(BuildFailure::deadline(path.clone()));
                    self.stats.files_failed.fetch_add(1, Ordering::Relaxed);
                    return;
                }
            }

            match self.inspect_file(path) {
                Ok(report) => {
                    reports.lock().push(report);
                    self.stats.files_processed.fetch_add(1, Ordering::Relaxed);
                }
                Err(failure) => {
                    failures.lock().push(failure);
                    self.stats.files_failed.fetch_add(1, Ordering::Relaxed);
                }
            }
        });

        let mut reports = reports.into_inner();
        // Workers finish in arbitrary order; sort for reproducible edge order.
        reports.sort_by(|a, b| a.path.cmp(&b.path));

        let graph = assemble(&reports, scope);
        log::info!(
            "Graph built: {} nodes, {} edges ({} files failed)",
            graph.node_count(),
            graph.edge_count(),
            failures.lock().len()
        );

        Ok(BuildOutcome {
            graph,
            failures: failures.into_inner(),
        })
    }

    /// Discover inspectable files under `root` and build at the given scope.
    pub fn build_project(&self, root: &Path, scope: GraphScope) -> Result<BuildOutcome> {
        let files = io::walker::find_project_files(root, Language::all_supported())?;
        self.build(&files, scope)
    }

    fn inspect_file(&self, path: &Path) -> std::result::Result<FileReport, BuildFailure> {
        let content = io::read_file(path)
            .map_err(|e| BuildFailure::file_read(path.to_path_buf(), e))?;
        let inspector = get_inspector(Language::from_path(path));
        inspector
            .inspect(&content, path.to_path_buf())
            .map_err(|e| BuildFailure::inspect(path.to_path_buf(), e))
    }
}

fn assemble(reports: &[FileReport], scope: GraphScope) -> DependencyGraph {
    match scope {
        GraphScope::File => assemble_files(reports),
        GraphScope::Function => assemble_functions(reports),
        GraphScope::Module => assemble_grouped(reports, scope),
        GraphScope::Package => assemble_grouped(reports, scope),
    }
}

/// Permissive import-to-path matching: `import` matches `candidate` when the
/// candidate path contains the import string, or the import string contains
/// one of the candidate's path segments (directory names or file stem).
/// Approximate on purpose; no type resolution is available.
pub(crate) fn import_matches(import: &str, candidate: &str) -> bool {
    if import.is_empty() {
        return false;
    }
    if candidate.contains(import) {
        return true;
    }
    path_segments(candidate)
        .iter()
        .any(|segment| import.contains(segment.as_str()))
}

/// Path components with the extension stripped from the final one.
fn path_segments(path: &str) -> Vec<String> {
    path.split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .map(|s| match s.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => s.to_string(),
        })
        .collect()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

fn assemble_files(reports: &[FileReport]) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for report in reports {
        graph.add_node_parts(
            report.path.to_string_lossy().to_string(),
            display_name(&report.path),
            NodeKind::File,
        );
    }

    let mut seen: HashSet<(String, String)> = HashSet::new();
    for report in reports {
        let from = report.path.to_string_lossy().to_string();
        for import in &report.imports {
            for candidate in reports {
                if candidate.path == report.path {
                    continue; // no self-edges from import matching
                }
                let to = candidate.path.to_string_lossy().to_string();
                if import_matches(import, &to) && seen.insert((from.clone(), to.clone())) {
                    graph.add_edge_parts(from.clone(), to.clone(), EdgeKind::Import);
                }
            }
        }
    }
    graph
}

/// Function node ids combine the owning file path and the function name, so
/// identically named functions in different files stay distinct. A call name
/// matches a node whose `:`-separated final component equals it exactly.
fn function_node_id(path: &Path, name: &str) -> String {
    format!("{}:{}", path.to_string_lossy(), name)
}

fn assemble_functions(reports: &[FileReport]) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    let mut by_name: HashMap<&str, Vec<String>> = HashMap::new();

    for report in reports {
        for function in &report.functions {
            let id = function_node_id(&report.path, &function.name);
            graph.add_node_parts(id.clone(), function.name.clone(), NodeKind::Function);
            by_name.entry(function.name.as_str()).or_default().push(id);
        }
    }

    let mut seen: HashSet<(String, String)> = HashSet::new();
    for report in reports {
        for function in &report.functions {
            let caller = function_node_id(&report.path, &function.name);
            for called in &function.calls {
                let Some(targets) = by_name.get(called.as_str()) else {
                    continue;
                };
                for target in targets {
                    if seen.insert((caller.clone(), target.clone())) {
                        graph.add_edge_parts(caller.clone(), target.clone(), EdgeKind::Call);
                    }
                }
            }
        }
    }
    graph
}

fn group_id(report: &FileReport, scope: GraphScope) -> String {
    match scope {
        GraphScope::Package => report
            .module
            .split('/')
            .next()
            .unwrap_or(&report.module)
            .to_string(),
        _ => report.module.clone(),
    }
}

fn assemble_grouped(reports: &[FileReport], scope: GraphScope) -> DependencyGraph {
    let kind = if scope == GraphScope::Package {
        NodeKind::Package
    } else {
        NodeKind::Module
    };

    let mut graph = DependencyGraph::new();
    for report in reports {
        let id = group_id(report, scope);
        let name = id.rsplit('/').next().unwrap_or(&id).to_string();
        graph.add_node_parts(id, name, kind);
    }

    let mut seen: HashSet<(String, String)> = HashSet::new();
    for report in reports {
        let from = group_id(report, scope);
        for import in &report.imports {
            for candidate in reports {
                let to = group_id(candidate, scope);
                if to == from {
                    continue;
                }
                if import_matches(import, &to) && seen.insert((from.clone(), to.clone())) {
                    graph.add_edge_parts(from.clone(), to.clone(), EdgeKind::Import);
                }
            }
        }
    }
    graph
}
