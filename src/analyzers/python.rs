use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

use super::{
    body_spans, module_from_path, scan_called_names, FileInspector, FileReport, FunctionDecl,
    Language,
};

static IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*import\s+([A-Za-z_][A-Za-z0-9_.]*)").unwrap());

static FROM_IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*from\s+([A-Za-z_][A-Za-z0-9_.]*)\s+import").unwrap());

static DEF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(?:async\s+)?def\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// Regex-based Python inspector. Dotted import paths are normalized to slash
/// form for path matching.
pub struct PythonInspector;

impl PythonInspector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PythonInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl FileInspector for PythonInspector {
    fn inspect(&self, content: &str, path: PathBuf) -> Result<FileReport> {
        let mut imports: Vec<String> = IMPORT_RE
            .captures_iter(content)
            .map(|c| c[1].replace('.', "/"))
            .collect();
        imports.extend(
            FROM_IMPORT_RE
                .captures_iter(content)
                .map(|c| c[1].replace('.', "/")),
        );

        let starts: Vec<(usize, String)> = DEF_RE
            .captures_iter(content)
            .filter_map(|c| {
                let m = c.get(0)?;
                Some((m.start(), c[1].to_string()))
            })
            .collect();

        let functions = body_spans(content, &starts)
            .into_iter()
            .map(|(name, body)| FunctionDecl {
                calls: scan_called_names(&body)
                    .into_iter()
                    .filter(|c| c != &name)
                    .collect(),
                name,
            })
            .collect();

        Ok(FileReport {
            module: module_from_path(&path),
            path,
            imports,
            functions,
        })
    }

    fn language(&self) -> Language {
        Language::Python
    }
}
