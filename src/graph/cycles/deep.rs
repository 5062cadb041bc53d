// src/graph/cycles/deep.rs
//! Bounded multi-hop cycle search.
//!
//! Iterative DFS with an explicit frame stack. `visited` holds nodes fully
//! explored without finding a cycle; `on_path` holds the current walk.
//! Nodes whose subtree was cut off by the depth limit are not marked
//! visited, so a shorter route to them can still be explored.
//! Cycles longer than the limit are not reported.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::Cycle;
use crate::graph::store::DependencyGraph;

/// Maximum walk length in edges, clamped to `2..=20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLimit(usize);

impl DepthLimit {
    pub const MIN: usize = 2;
    pub const MAX: usize = 20;
    pub const DEFAULT: usize = 10;

    #[must_use]
    pub fn new(depth: usize) -> Self {
        Self(depth.clamp(Self::MIN, Self::MAX))
    }

    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for DepthLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

struct Frame<'g> {
    node: &'g PathBuf,
    next: usize,
    truncated: bool,
}

impl<'g> Frame<'g> {
    fn new(node: &'g PathBuf) -> Self {
        Self {
            node,
            next: 0,
            truncated: false,
        }
    }
}

/// Searches for a cycle reachable from `start`. The returned path runs from
/// `start` to the first repeated node, inclusive.
#[must_use]
pub fn detect_deep_cycle(graph: &DependencyGraph, start: &Path, limit: DepthLimit) -> Option<Cycle> {
    let start = graph.lookup(start)?;
    let mut visited = HashSet::new();
    search(graph, start, limit, &mut visited).map(Cycle::new)
}

fn search<'g>(
    graph: &'g DependencyGraph,
    start: &'g PathBuf,
    limit: DepthLimit,
    visited: &mut HashSet<&'g PathBuf>,
) -> Option<Vec<PathBuf>> {
    let mut stack = vec![Frame::new(start)];
    let mut on_path: HashSet<&PathBuf> = HashSet::from([start]);

    loop {
        let depth = stack.len().checked_sub(1)?;
        let frame = stack.last_mut()?;

        if depth >= limit.get() {
            frame.truncated = true;
            pop_frame(&mut stack, &mut on_path, visited);
            continue;
        }

        let Some(dep) = graph.dependencies(frame.node).get(frame.next) else {
            pop_frame(&mut stack, &mut on_path, visited);
            continue;
        };
        frame.next += 1;
        let next = graph.lookup(dep).unwrap_or(dep);

        if on_path.contains(next) {
            let mut cycle: Vec<PathBuf> = stack.iter().map(|f| f.node.clone()).collect();
            cycle.push(next.clone());
            return Some(cycle);
        }
        if visited.contains(next) {
            continue;
        }
        on_path.insert(next);
        stack.push(Frame::new(next));
    }
}

fn pop_frame<'g>(
    stack: &mut Vec<Frame<'g>>,
    on_path: &mut HashSet<&'g PathBuf>,
    visited: &mut HashSet<&'g PathBuf>,
) {
    let Some(done) = stack.pop() else { return };
    on_path.remove(done.node);
    if done.truncated {
        if let Some(parent) = stack.last_mut() {
            parent.truncated = true;
        }
    } else {
        visited.insert(done.node);
    }
}

/// Every distinct cycle in the graph. Nodes already part of a reported
/// cycle are not used as new starting points.
#[must_use]
pub fn all_cycles(graph: &DependencyGraph, limit: DepthLimit) -> Vec<Cycle> {
    let mut covered: HashSet<PathBuf> = HashSet::new();
    let mut seen: HashSet<Vec<PathBuf>> = HashSet::new();
    let mut cycles = Vec::new();

    for node in graph.files() {
        if covered.contains(node) {
            continue;
        }
        let Some(found) = detect_deep_cycle(graph, node, limit) else {
            continue;
        };
        let closed = closed_loop(&found.path);
        covered.extend(closed.iter().cloned());
        if seen.insert(canonical(&closed)) {
            cycles.push(Cycle::new(closed));
        }
    }
    cycles
}

/// Drops the lead-in so the walk starts and ends on the repeated node.
pub(crate) fn closed_loop(path: &[PathBuf]) -> Vec<PathBuf> {
    let start = path
        .last()
        .and_then(|last| path.iter().position(|p| p == last))
        .unwrap_or(0);
    path[start..].to_vec()
}

/// Rotation-independent identity of a closed loop.
fn canonical(closed: &[PathBuf]) -> Vec<PathBuf> {
    let open = &closed[..closed.len().saturating_sub(1)];
    let Some(min_idx) = open
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.cmp(b.1))
        .map(|(i, _)| i)
    else {
        return Vec::new();
    };
    open[min_idx..].iter().chain(&open[..min_idx]).cloned().collect()
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    fn graph(list: &[(&str, &str)]) -> DependencyGraph {
        DependencyGraph::from_edges(list.iter().map(|(a, b)| (Path::new(*a), Path::new(*b))))
    }

    #[test]
    fn test_three_node_cycle_path_and_depth() {
        let g = graph(&[("a.ts", "b.ts"), ("b.ts", "c.ts"), ("c.ts", "a.ts")]);
        let cycle = detect_deep_cycle(&g, Path::new("a.ts"), DepthLimit::default());
        assert_eq!(
            cycle,
            Some(Cycle {
                path: vec![p("a.ts"), p("b.ts"), p("c.ts"), p("a.ts")],
                depth: 3,
            })
        );
    }

    #[test]
    fn test_acyclic_chain_and_unknown_start() {
        let g = graph(&[("a.ts", "b.ts"), ("b.ts", "c.ts")]);
        assert_eq!(detect_deep_cycle(&g, Path::new("a.ts"), DepthLimit::default()), None);
        assert_eq!(detect_deep_cycle(&g, Path::new("zzz.ts"), DepthLimit::default()), None);
    }

    #[test]
    fn test_cycle_logic_table() {
        let cases = vec![
            (vec![("a", "b"), ("b", "c")], 0, "No cycles"),
            (vec![("a", "b"), ("b", "a")], 1, "Simple cycle"),
            (vec![("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")], 0, "Diamond DAG"),
            (vec![("a", "a")], 1, "Self loop"),
            (vec![("a", "b"), ("b", "c"), ("c", "a")], 1, "Three node cycle"),
            (vec![("a", "b"), ("b", "a"), ("c", "d"), ("d", "c")], 2, "Disjoint cycles"),
            (vec![("a", "b"), ("b", "c"), ("c", "d"), ("d", "e"), ("e", "a")], 1, "Long cycle"),
            (vec![], 0, "Empty graph"),
        ];

        for (edges, expected, desc) in cases {
            let cycles = all_cycles(&graph(&edges), DepthLimit::default());
            assert_eq!(cycles.len(), expected, "Failed: {desc}");
        }
    }

    #[test]
    fn test_lead_in_is_trimmed_for_project_listing() {
        let g = graph(&[("a", "b"), ("b", "c"), ("c", "b")]);
        let from_a = detect_deep_cycle(&g, Path::new("a"), DepthLimit::default());
        assert_eq!(from_a.map(|c| c.depth), Some(3));

        let cycles = all_cycles(&g, DepthLimit::default());
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].path, vec![p("b"), p("c"), p("b")]);
        assert_eq!(cycles[0].depth, 2);
    }

    #[test]
    fn test_depth_limit_is_a_false_negative_bound() {
        let ring: Vec<(String, String)> = (0..6)
            .map(|i| (format!("n{i}"), format!("n{}", (i + 1) % 6)))
            .collect();
        let refs: Vec<(&str, &str)> = ring.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
        let g = graph(&refs);

        assert!(detect_deep_cycle(&g, Path::new("n0"), DepthLimit::new(5)).is_none());
        assert_eq!(
            detect_deep_cycle(&g, Path::new("n0"), DepthLimit::new(6)).map(|c| c.depth),
            Some(6)
        );
    }

    #[test]
    fn test_truncated_subtree_not_marked_visited() {
        // a -> x -> y -> z -> a is too long at limit 3 via x, but a -> z -> a
        // is found through the second branch even though z was reached first.
        let g = graph(&[("a", "x"), ("x", "y"), ("y", "z"), ("z", "w"), ("a", "z"), ("z", "a")]);
        let cycle = detect_deep_cycle(&g, Path::new("a"), DepthLimit::new(3));
        assert!(cycle.is_some());
    }

    #[test]
    fn test_limit_clamped() {
        assert_eq!(DepthLimit::new(1).get(), 2);
        assert_eq!(DepthLimit::new(50).get(), 20);
        assert_eq!(DepthLimit::default().get(), 10);
    }

    #[test]
    fn test_case_and_extension_insensitive_start() {
        let g = graph(&[("/p/A.ts", "/p/b.ts"), ("/p/b.ts", "/p/A.ts")]);
        assert!(detect_deep_cycle(&g, Path::new("/P/a"), DepthLimit::default()).is_some());
    }
}
