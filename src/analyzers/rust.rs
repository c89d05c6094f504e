use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

use super::{
    body_spans, module_from_path, scan_called_names, FileInspector, FileReport, FunctionDecl,
    Language,
};

static USE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?use\s+([A-Za-z_][A-Za-z0-9_:]*)").unwrap()
});

static MOD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?mod\s+([A-Za-z_][A-Za-z0-9_]*)\s*;").unwrap());

static FN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?(?:const\s+)?(?:async\s+)?(?:unsafe\s+)?fn\s+([A-Za-z_][A-Za-z0-9_]*)",
    )
    .unwrap()
});

/// Regex-based Rust inspector.
///
/// `use` paths are normalized to slash form so the builder's substring
/// matching can compare them against file paths. Function bodies are sliced
/// line-wise from one `fn` declaration to the next.
pub struct RustInspector;

impl RustInspector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl FileInspector for RustInspector {
    fn inspect(&self, content: &str, path: PathBuf) -> Result<FileReport> {
        let mut imports: Vec<String> = USE_RE
            .captures_iter(content)
            .map(|c| c[1].replace("::", "/"))
            .collect();
        imports.extend(
            MOD_RE
                .captures_iter(content)
                .map(|c| c[1].to_string()),
        );

        let starts: Vec<(usize, String)> = FN_RE
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
        Language::Rust
    }
}
