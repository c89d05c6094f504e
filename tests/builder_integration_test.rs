//! Building graphs from real files on disk.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use depmap::{GraphBuilder, GraphScope, NodeKind};

fn write_rust_project(dir: &std::path::Path) -> Vec<PathBuf> {
    let main = dir.join("main.rs");
    fs::write(
        &main,
        "use crate::util;\n\nfn main() {\n    run();\n}\n\nfn run() {\n    helper();\n}\n",
    )
    .unwrap();

    let util = dir.join("util.rs");
    fs::write(&util, "pub fn helper() {\n    format_output();\n}\n").unwrap();

    vec![main, util]
}

#[test]
fn test_file_scope_links_imports() {
    let dir = tempfile::tempdir().unwrap();
    let files = write_rust_project(dir.path());

    let outcome = GraphBuilder::new().build(&files, GraphScope::File).unwrap();
    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.graph.node_count(), 2);

    // main.rs declares `use crate::util`, which matches util.rs.
    let main_id = files[0].to_string_lossy().to_string();
    let util_id = files[1].to_string_lossy().to_string();
    let edges: Vec<(String, String)> = outcome
        .graph
        .edges()
        .map(|e| (e.from.clone(), e.to.clone()))
        .collect();
    assert!(edges.contains(&(main_id, util_id)));
}

#[test]
fn test_function_scope_builds_call_edges() {
    let dir = tempfile::tempdir().unwrap();
    let files = write_rust_project(dir.path());

    let outcome = GraphBuilder::new()
        .build(&files, GraphScope::Function)
        .unwrap();

    // main, run, helper.
    assert_eq!(outcome.graph.node_count(), 3);
    for node in outcome.graph.nodes() {
        assert_eq!(node.kind, NodeKind::Function);
        assert!(node.id.contains(':'));
    }

    let main_id = format!("{}:main", files[0].to_string_lossy());
    let run_id = format!("{}:run", files[0].to_string_lossy());
    let helper_id = format!("{}:helper", files[1].to_string_lossy());
    let edges: Vec<(String, String)> = outcome
        .graph
        .edges()
        .map(|e| (e.from.clone(), e.to.clone()))
        .collect();
    assert!(edges.contains(&(main_id, run_id.clone())));
    assert!(edges.contains(&(run_id, helper_id)));
}

#[test]
fn test_unreadable_file_degrades_silently() {
    let dir = tempfile::tempdir().unwrap();
    let mut files = write_rust_project(dir.path());
    files.push(dir.path().join("missing.rs"));

    let outcome = GraphBuilder::new().build(&files, GraphScope::File).unwrap();
    assert_eq!(outcome.graph.node_count(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert!(outcome.failures[0].path.ends_with("missing.rs"));
}

#[test]
fn test_unsupported_language_contributes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.csv");
    fs::write(&data, "a,b,c\n").unwrap();

    let outcome = GraphBuilder::new()
        .build(&[data], GraphScope::File)
        .unwrap();
    assert_eq!(outcome.graph.node_count(), 0);
    assert_eq!(outcome.failures.len(), 1);
}

#[test]
fn test_expired_deadline_skips_all_files() {
    let dir = tempfile::tempdir().unwrap();
    let files = write_rust_project(dir.path());

    let outcome = GraphBuilder::new()
        .with_deadline(Instant::now())
        .build(&files, GraphScope::File)
        .unwrap();
    assert_eq!(outcome.graph.node_count(), 0);
    assert_eq!(outcome.failures.len(), files.len());
}

#[test]
fn test_module_scope_nodes_are_modules() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.py"), "import models\n").unwrap();
    fs::write(dir.path().join("models.py"), "").unwrap();

    let files = vec![dir.path().join("main.py"), dir.path().join("models.py")];
    let outcome = GraphBuilder::new()
        .build(&files, GraphScope::Module)
        .unwrap();

    assert_eq!(outcome.graph.node_count(), 2);
    for node in outcome.graph.nodes() {
        assert_eq!(node.kind, NodeKind::Module);
    }
    assert_eq!(outcome.graph.edge_count(), 1);
}

#[test]
fn test_build_project_discovers_files() {
    let dir = tempfile::tempdir().unwrap();
    write_rust_project(dir.path());
    fs::write(dir.path().join("notes.txt"), "not code").unwrap();

    let outcome = GraphBuilder::new()
        .build_project(dir.path(), GraphScope::File)
        .unwrap();
    assert_eq!(outcome.graph.node_count(), 2);
}

#[test]
fn test_build_stats_track_progress() {
    let dir = tempfile::tempdir().unwrap();
    let files = write_rust_project(dir.path());

    let builder = GraphBuilder::new();
    let _ = builder.build(&files, GraphScope::File).unwrap();
    assert!((builder.stats().progress_ratio() - 1.0).abs() < f64::EPSILON);
}
