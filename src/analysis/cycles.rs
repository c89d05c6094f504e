//! Cycle detection via Tarjan's strongly-connected-components algorithm.
//!
//! Implemented iteratively with an explicit frame stack to avoid stack
//! overflow on large graphs. Only components with more than one member are
//! reported: a lone self-loop is not a cycle group.

use std::collections::HashMap;

use crate::core::DependencyGraph;

/// Find all strongly connected components of size greater than one.
///
/// Each group is sorted by node id; groups are ordered by their first member.
/// A linear chain yields no groups, two disjoint cycles yield two.
pub fn detect_cycles(graph: &DependencyGraph) -> Vec<Vec<String>> {
    let ids = graph.sorted_node_ids();
    let n = ids.len();
    if n == 0 {
        return Vec::new();
    }

    let index_of: HashMap<&str, usize> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    let adjacency = graph.adjacency();
    let successors: Vec<Vec<usize>> = ids
        .iter()
        .map(|id| {
            let mut targets: Vec<usize> = adjacency
                .get(id.as_str())
                .map(|set| set.iter().filter_map(|t| index_of.get(t.as_str()).copied()).collect())
                .unwrap_or_default();
            targets.sort_unstable();
            targets
        })
        .collect();

    let mut state = TarjanState::new(n);
    for v in 0..n {
        if state.index[v].is_none() {
            state.strong_connect(v, &successors);
        }
    }

    let mut groups: Vec<Vec<String>> = state
        .components
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|component| {
            let mut group: Vec<String> = component.into_iter().map(|i| ids[i].clone()).collect();
            group.sort();
            group
        })
        .collect();
    groups.sort();
    groups
}

/// Number of multi-node cycle groups.
pub fn cycle_count(graph: &DependencyGraph) -> usize {
    detect_cycles(graph).len()
}

struct TarjanState {
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    counter: usize,
    components: Vec<Vec<usize>>,
}

impl TarjanState {
    fn new(n: usize) -> Self {
        Self {
            index: vec![None; n],
            lowlink: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            counter: 0,
            components: Vec::new(),
        }
    }

    fn visit(&mut self, v: usize) {
        self.index[v] = Some(self.counter);
        self.lowlink[v] = self.counter;
        self.counter += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
    }

    /// Iterative strongconnect: each frame holds a node and the position of
    /// the next successor to examine, so no recursion depth is needed.
    fn strong_connect(&mut self, start: usize, successors: &[Vec<usize>]) {
        self.visit(start);
        let mut frames: Vec<(usize, usize)> = vec![(start, 0)];

        while let Some(&mut (v, ref mut next)) = frames.last_mut() {
            if *next < successors[v].len() {
                let w = successors[v][*next];
                *next += 1;
                match self.index[w] {
                    None => {
                        self.visit(w);
                        frames.push((w, 0));
                    }
                    Some(w_index) => {
                        if self.on_stack[w] {
                            self.lowlink[v] = self.lowlink[v].min(w_index);
                        }
                    }
                }
            } else {
                frames.pop();
                if let Some(&(parent, _)) = frames.last() {
                    self.lowlink[parent] = self.lowlink[parent].min(self.lowlink[v]);
                }
                if Some(self.lowlink[v]) == self.index[v] {
                    let mut component = Vec::new();
                    while let Some(w) = self.stack.pop() {
                        self.on_stack[w] = false;
                        component.push(w);
                        if w == v {
                            break;
                        }
                    }
                    self.components.push(component);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EdgeKind, GraphNode, NodeKind};

    fn graph_from(nodes: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for id in nodes {
            graph.add_node(GraphNode::new(*id, *id, NodeKind::Module));
        }
        for (from, to) in edges {
            graph.add_edge_parts(*from, *to, EdgeKind::Import);
        }
        graph
    }

    #[test]
    fn test_two_cycle() {
        let graph = graph_from(&["a", "b"], &[("a", "b"), ("b", "a")]);
        let cycles = detect_cycles(&graph);
        assert_eq!(cycles, vec![vec!["a".to_string(), "b".to_string()]]);
    }

    #[test]
    fn test_three_cycle() {
        let graph = graph_from(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let cycles = detect_cycles(&graph);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 3);
    }

    #[test]
    fn test_two_disjoint_cycles() {
        let graph = graph_from(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "a"), ("c", "d"), ("d", "c")],
        );
        let cycles = detect_cycles(&graph);
        assert_eq!(cycles.len(), 2);
        assert_eq!(cycles[0], vec!["a".to_string(), "b".to_string()]);
        assert_eq!(cycles[1], vec!["c".to_string(), "d".to_string()]);
    }

    #[test]
    fn test_linear_chain_has_no_cycles() {
        let graph = graph_from(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        assert!(detect_cycles(&graph).is_empty());
    }

    #[test]
    fn test_lone_self_loop_is_not_a_cycle_group() {
        let graph = graph_from(&["a"], &[("a", "a")]);
        assert!(detect_cycles(&graph).is_empty());
        assert_eq!(cycle_count(&graph), 0);
    }

    #[test]
    fn test_empty_graph() {
        assert!(detect_cycles(&DependencyGraph::new()).is_empty());
    }

    #[test]
    fn test_cycle_with_tail() {
        // a <-> b, with c hanging off b; only {a, b} forms a group.
        let graph = graph_from(&["a", "b", "c"], &[("a", "b"), ("b", "a"), ("b", "c")]);
        let cycles = detect_cycles(&graph);
        assert_eq!(cycles, vec![vec!["a".to_string(), "b".to_string()]]);
    }

    #[test]
    fn test_nested_reachability_does_not_merge_components() {
        // Two 2-cycles connected by a one-way bridge stay separate groups.
        let graph = graph_from(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "a"), ("b", "c"), ("c", "d"), ("d", "c")],
        );
        let cycles = detect_cycles(&graph);
        assert_eq!(cycles.len(), 2);
    }
}
