pub mod metrics;

use im::{HashMap, Vector};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap as StdHashMap, HashSet as StdHashSet};
use std::str::FromStr;

use crate::errors::ConfigError;

/// Granularity at which a dependency graph is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphScope {
    File,
    Function,
    Module,
    Package,
}

impl FromStr for GraphScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(GraphScope::File),
            "function" => Ok(GraphScope::Function),
            "module" => Ok(GraphScope::Module),
            "package" => Ok(GraphScope::Package),
            other => Err(ConfigError::UnknownScope(other.to_string())),
        }
    }
}

impl std::fmt::Display for GraphScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GraphScope::File => "file",
            GraphScope::Function => "function",
            GraphScope::Module => "module",
            GraphScope::Package => "package",
        };
        write!(f, "{s}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    File,
    Function,
    Module,
    Package,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    Import,
    Call,
    Uses,
}

/// A source artifact in the dependency graph. Identity is `id`; `name` is a
/// display label only.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

/// A directed relationship between two nodes, referenced by id.
///
/// Endpoints are not required to resolve to known nodes; algorithms walk the
/// derived adjacency views, which only include edges whose endpoints both
/// exist.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

impl GraphEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Directed dependency graph: owned node map plus an edge list, with
/// adjacency views derived on demand.
///
/// Duplicate edges are permitted in the edge list; the derived views collapse
/// them to logical adjacency.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    nodes: HashMap<String, GraphNode>,
    edges: Vector<GraphEdge>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vector::new(),
        }
    }

    pub fn add_node(&mut self, node: GraphNode) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn add_node_parts(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        kind: NodeKind,
    ) {
        self.add_node(GraphNode::new(id, name, kind));
    }

    pub fn add_edge(&mut self, edge: GraphEdge) {
        self.edges.push_back(edge);
    }

    pub fn add_edge_parts(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        kind: EdgeKind,
    ) {
        self.add_edge(GraphEdge::new(from, to, kind));
    }

    pub fn merge(&mut self, other: DependencyGraph) {
        for (id, node) in other.nodes {
            self.nodes.insert(id, node);
        }
        for edge in other.edges {
            self.edges.push_back(edge);
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get_node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter()
    }

    /// Node ids in ascending lexical order. Algorithms iterate in this order
    /// so results are reproducible across runs.
    pub fn sorted_node_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.nodes.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Forward logical adjacency: `from -> {to}` for every edge whose
    /// endpoints both exist. Self-loops are included.
    pub fn adjacency(&self) -> StdHashMap<String, StdHashSet<String>> {
        let mut adj: StdHashMap<String, StdHashSet<String>> = self
            .nodes
            .keys()
            .map(|id| (id.clone(), StdHashSet::new()))
            .collect();
        for edge in &self.edges {
            if self.nodes.contains_key(&edge.from) && self.nodes.contains_key(&edge.to) {
                adj.entry(edge.from.clone())
                    .or_default()
                    .insert(edge.to.clone());
            }
        }
        adj
    }

    /// Reverse logical adjacency: `to -> {from}`.
    pub fn reverse_adjacency(&self) -> StdHashMap<String, StdHashSet<String>> {
        let mut radj: StdHashMap<String, StdHashSet<String>> = self
            .nodes
            .keys()
            .map(|id| (id.clone(), StdHashSet::new()))
            .collect();
        for edge in &self.edges {
            if self.nodes.contains_key(&edge.from) && self.nodes.contains_key(&edge.to) {
                radj.entry(edge.to.clone())
                    .or_default()
                    .insert(edge.from.clone());
            }
        }
        radj
    }

    /// Undirected neighbor view: an edge in either direction connects two
    /// nodes. Self-loops are excluded.
    pub fn undirected_neighbors(&self) -> StdHashMap<String, StdHashSet<String>> {
        let mut neighbors: StdHashMap<String, StdHashSet<String>> = self
            .nodes
            .keys()
            .map(|id| (id.clone(), StdHashSet::new()))
            .collect();
        for edge in &self.edges {
            if edge.is_self_loop() {
                continue;
            }
            if self.nodes.contains_key(&edge.from) && self.nodes.contains_key(&edge.to) {
                neighbors
                    .entry(edge.from.clone())
                    .or_default()
                    .insert(edge.to.clone());
                neighbors
                    .entry(edge.to.clone())
                    .or_default()
                    .insert(edge.from.clone());
            }
        }
        neighbors
    }

    /// Unique directed `(from, to)` pairs with both endpoints present.
    pub fn logical_edges(&self) -> StdHashSet<(String, String)> {
        self.edges
            .iter()
            .filter(|e| self.nodes.contains_key(&e.from) && self.nodes.contains_key(&e.to))
            .map(|e| (e.from.clone(), e.to.clone()))
            .collect()
    }

    /// Total (in + out) logical degree per node.
    pub fn degrees(&self) -> StdHashMap<String, usize> {
        let adj = self.adjacency();
        let radj = self.reverse_adjacency();
        self.nodes
            .keys()
            .map(|id| {
                let out = adj.get(id).map_or(0, |s| s.len());
                let inc = radj.get(id).map_or(0, |s| s.len());
                (id.clone(), out + inc)
            })
            .collect()
    }
}
