use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

use super::{
    body_spans, module_from_path, scan_called_names, FileInspector, FileReport, FunctionDecl,
    Language,
};

static ES_IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"import\s+[^;]*?from\s+['"]([^'"]+)['"]"#).unwrap());

static BARE_IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\s*import\s+['"]([^'"]+)['"]"#).unwrap());

static REQUIRE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"require\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());

static FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*([A-Za-z_$][A-Za-z0-9_$]*)")
        .unwrap()
});

static ARROW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*(?:async\s+)?(?:\([^)]*\)|[A-Za-z_$][A-Za-z0-9_$]*)\s*=>",
    )
    .unwrap()
});

/// Regex-based inspector shared by JavaScript and TypeScript.
///
/// Relative import specifiers keep their `./`/`../` prefixes stripped so they
/// compare against project paths.
pub struct JavaScriptInspector {
    language: Language,
}

impl JavaScriptInspector {
    pub fn new(language: Language) -> Self {
        Self { language }
    }
}

fn normalize_specifier(spec: &str) -> String {
    spec.trim_start_matches("./").trim_start_matches("../").to_string()
}

impl FileInspector for JavaScriptInspector {
    fn inspect(&self, content: &str, path: PathBuf) -> Result<FileReport> {
        let mut imports: Vec<String> = ES_IMPORT_RE
            .captures_iter(content)
            .map(|c| normalize_specifier(&c[1]))
            .collect();
        imports.extend(
            BARE_IMPORT_RE
                .captures_iter(content)
                .map(|c| normalize_specifier(&c[1])),
        );
        imports.extend(
            REQUIRE_RE
                .captures_iter(content)
                .map(|c| normalize_specifier(&c[1])),
        );

        let mut starts: Vec<(usize, String)> = FUNCTION_RE
            .captures_iter(content)
            .chain(ARROW_RE.captures_iter(content))
            .filter_map(|c| {
                let m = c.get(0)?;
                Some((m.start(), c[1].to_string()))
            })
            .collect();
        starts.sort_by_key(|(offset, _)| *offset);

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
        self.language
    }
}
