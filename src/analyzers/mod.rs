//! File-inspection capability layer.
//!
//! Inspectors extract best-effort syntactic facts from a single source file:
//! declared imports, a module identifier, and function declarations with the
//! names called inside their bodies. No type resolution happens here; the
//! graph builder matches these strings heuristically. One inspector per
//! language, selected through [`get_inspector`].

pub mod javascript;
pub mod python;
pub mod rust;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Unknown,
}

impl Language {
    pub fn from_extension(ext: &str) -> Self {
        static EXTENSION_MAP: &[(&[&str], Language)] = &[
            (&["rs"], Language::Rust),
            (&["py"], Language::Python),
            (&["js", "jsx", "mjs", "cjs"], Language::JavaScript),
            (&["ts", "tsx", "mts", "cts"], Language::TypeScript),
        ];

        EXTENSION_MAP
            .iter()
            .find(|(exts, _)| exts.contains(&ext))
            .map(|(_, lang)| *lang)
            .unwrap_or(Language::Unknown)
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    pub fn all_supported() -> Vec<Language> {
        vec![
            Language::Rust,
            Language::Python,
            Language::JavaScript,
            Language::TypeScript,
        ]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Language::Rust => "Rust",
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Unknown => "Unknown",
        };
        write!(f, "{s}")
    }
}

/// A function declaration and the names called in its body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub calls: Vec<String>,
}

/// Syntactic facts extracted from one file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    /// Declared or path-derived module identifier.
    pub module: String,
    /// Import-path strings in declaration order.
    pub imports: Vec<String>,
    pub functions: Vec<FunctionDecl>,
}

pub trait FileInspector: Send + Sync {
    fn inspect(&self, content: &str, path: PathBuf) -> Result<FileReport>;
    fn language(&self) -> Language;
}

pub fn get_inspector(language: Language) -> Box<dyn FileInspector> {
    type InspectorFactory = fn() -> Box<dyn FileInspector>;

    static INSPECTOR_MAP: &[(Language, InspectorFactory)] = &[
        (Language::Rust, || Box::new(rust::RustInspector::new())),
        (Language::Python, || Box::new(python::PythonInspector::new())),
        (Language::JavaScript, || {
            Box::new(javascript::JavaScriptInspector::new(Language::JavaScript))
        }),
        (Language::TypeScript, || {
            Box::new(javascript::JavaScriptInspector::new(Language::TypeScript))
        }),
    ];

    INSPECTOR_MAP
        .iter()
        .find(|(lang, _)| *lang == language)
        .map(|(_, factory)| factory())
        .unwrap_or_else(|| Box::new(NullInspector))
}

/// Fallback for unsupported languages: inspection always fails, so the file
/// contributes nothing to the graph.
struct NullInspector;

impl FileInspector for NullInspector {
    fn inspect(&self, _content: &str, path: PathBuf) -> Result<FileReport> {
        anyhow::bail!("unsupported language: {}", path.display())
    }

    fn language(&self) -> Language {
        Language::Unknown
    }
}

static CALL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\s*\(").unwrap());

const CALL_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "loop", "match", "return", "fn", "def", "let", "mut", "new",
    "switch", "catch", "function", "await", "async", "yield", "not", "and", "or", "in", "elif",
    "with", "assert", "print", "println", "panic", "typeof", "sizeof", "Some", "Ok", "Err",
];

/// Scan a body for called names. Purely lexical: any identifier followed by an
/// opening parenthesis that is not a declaration keyword.
pub(crate) fn scan_called_names(body: &str) -> Vec<String> {
    let mut calls = Vec::new();
    for capture in CALL_RE.captures_iter(body) {
        let name = &capture[1];
        if CALL_KEYWORDS.contains(&name) {
            continue;
        }
        if !calls.iter().any(|c| c == name) {
            calls.push(name.to_string());
        }
    }
    calls
}

/// Derive a module identifier from a path: the relative path without its
/// extension, slash-separated.
pub(crate) fn module_from_path(path: &Path) -> String {
    let without_ext = path.with_extension("");
    let module = without_ext
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect::<Vec<_>>()
        .join("/");
    if module.is_empty() {
        "unknown".to_string()
    } else {
        module
    }
}

/// Slice a file into (declaration, body) spans given the byte offsets where
/// each function declaration starts. The body of a function runs to the start
/// of the next declaration.
pub(crate) fn body_spans(content: &str, starts: &[(usize, String)]) -> Vec<(String, String)> {
    let mut spans = Vec::new();
    for (i, (start, name)) in starts.iter().enumerate() {
        let end = starts.get(i + 1).map_or(content.len(), |(next, _)| *next);
        spans.push((name.clone(), content[*start..end].to_string()));
    }
    spans
}
