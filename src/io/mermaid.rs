//! Deterministic Mermaid flowchart export.
//!
//! Given the same graph and options the output string is identical: node
//! lines are sorted by sanitized id, edge lines keep the graph's edge
//! encounter order, and style lines are sorted by id. Caps in the options
//! run the pruner before rendering.

use std::collections::HashMap;

use crate::core::{DependencyGraph, EdgeKind};
use crate::prune;

const LOW_COMPLEXITY_MAX: u32 = 5;
const HIGH_COMPLEXITY_MIN: u32 = 10;
const LOW_FILL: &str = "#90ee90";
const HIGH_FILL: &str = "#ff6347";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiagramDirection {
    #[default]
    TopDown,
    LeftRight,
    BottomUp,
    RightLeft,
}

impl DiagramDirection {
    fn header(self) -> &'static str {
        match self {
            DiagramDirection::TopDown => "graph TD",
            DiagramDirection::LeftRight => "graph LR",
            DiagramDirection::BottomUp => "graph BT",
            DiagramDirection::RightLeft => "graph RL",
        }
    }
}

/// Rendering options. The default applies no pruning and no styling.
#[derive(Clone, Debug, Default)]
pub struct DiagramOptions {
    pub direction: DiagramDirection,
    pub max_nodes: Option<usize>,
    pub max_edges: Option<usize>,
    pub show_complexity: bool,
    /// Node id -> complexity score, used for three-tier coloring when
    /// `show_complexity` is set.
    pub complexity: HashMap<String, u32>,
}

impl DiagramOptions {
    pub fn with_direction(mut self, direction: DiagramDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_caps(mut self, max_nodes: usize, max_edges: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self.max_edges = Some(max_edges);
        self
    }

    pub fn with_complexity(mut self, complexity: HashMap<String, u32>) -> Self {
        self.show_complexity = true;
        self.complexity = complexity;
        self
    }
}

/// Replace every character outside `[A-Za-z0-9_]` with `_`, prefix `n` when
/// the result would start with a digit, and map the empty id to `empty`.
/// Idempotent: sanitizing a sanitized id changes nothing.
pub fn sanitize_id(id: &str) -> String {
    if id.is_empty() {
        return "empty".to_string();
    }
    let mut sanitized: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        sanitized.insert(0, 'n');
    }
    sanitized
}

/// Escape a display label for use inside a Mermaid node. The ampersand is
/// replaced first so entities introduced by later replacements survive.
pub fn escape_label(label: &str) -> String {
    label
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('|', "&#124;")
        .replace('[', "&#91;")
        .replace(']', "&#93;")
        .replace('{', "&#123;")
        .replace('}', "&#125;")
        .replace('\n', "<br/>")
}

/// Render a graph as Mermaid flowchart text.
pub fn to_diagram(graph: &DependencyGraph, options: &DiagramOptions) -> String {
    let pruned;
    let graph = if options.max_nodes.is_some() || options.max_edges.is_some() {
        pruned = prune::prune(
            graph,
            options.max_nodes.unwrap_or(usize::MAX),
            options.max_edges.unwrap_or(usize::MAX),
        );
        &pruned
    } else {
        graph
    };

    let mut lines = vec![options.direction.header().to_string()];

    let mut node_lines: Vec<(String, String)> = graph
        .nodes()
        .map(|node| {
            let id = sanitize_id(&node.id);
            let label = escape_label(&node.name);
            (id.clone(), format!("    {id}[\"{label}\"]"))
        })
        .collect();
    node_lines.sort();
    lines.extend(node_lines.into_iter().map(|(_, line)| line));

    for edge in graph.edges() {
        if !graph.contains_node(&edge.from) || !graph.contains_node(&edge.to) {
            continue;
        }
        let from = sanitize_id(&edge.from);
        let to = sanitize_id(&edge.to);
        let line = match edge.kind {
            EdgeKind::Import => format!("    {from} -->|imports| {to}"),
            EdgeKind::Call => format!("    {from} -.->|calls| {to}"),
            EdgeKind::Uses => format!("    {from} -.-|uses| {to}"),
        };
        lines.push(line);
    }

    if options.show_complexity {
        let mut style_lines: Vec<String> = Vec::new();
        for node in graph.nodes() {
            let Some(score) = options.complexity.get(&node.id) else {
                continue;
            };
            let fill = if *score <= LOW_COMPLEXITY_MAX {
                LOW_FILL
            } else if *score > HIGH_COMPLEXITY_MIN {
                HIGH_FILL
            } else {
                continue;
            };
            style_lines.push(format!("    style {} fill:{fill}", sanitize_id(&node.id)));
        }
        style_lines.sort();
        lines.extend(style_lines);
    }

    let mut diagram = lines.join("\n");
    diagram.push('\n');
    diagram
}
