use std::collections::HashSet;

use crate::aif::{ArgGraph, NodeKind};

pub const DEFAULT_MAX_DEPTH: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathKind {
    Support,
    Attack,
    Preference,
}

impl PathKind {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Support => "support",
            Self::Attack => "attack",
            Self::Preference => "preference",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ArgumentPath {
    pub id: String,
    pub nodes: Vec<String>,
    pub edges: Vec<String>,
    pub kind: PathKind,
}

#[derive(Clone, Debug, Default)]
pub struct HighlightSet {
    nodes: HashSet<String>,
    edges: HashSet<String>,
}

impl HighlightSet {
    pub fn from_path(path: &ArgumentPath) -> Self {
        Self {
            nodes: path.nodes.iter().cloned().collect(),
            edges: path.edges.iter().cloned().collect(),
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edges.contains(id)
    }
}

pub fn find_paths(
    graph: &ArgGraph,
    from_id: &str,
    to_id: &str,
    max_depth: usize,
) -> Vec<ArgumentPath> {
    let (Some(from), Some(to)) = (graph.index_of(from_id), graph.index_of(to_id)) else {
        return Vec::new();
    };
    if from == to {
        return Vec::new();
    }

    enumerate(graph, from, to, max_depth)
}

// Paths into an information node, starting from every source-like node.
pub fn find_paths_to_terminal(
    graph: &ArgGraph,
    terminal_id: &str,
    max_depth: usize,
) -> Vec<ArgumentPath> {
    let Some(terminal) = graph.index_of(terminal_id) else {
        return Vec::new();
    };

    let mut paths = Vec::new();
    for source in graph.source_indices() {
        if source == terminal {
            continue;
        }
        paths.extend(enumerate(graph, source, terminal, max_depth));
    }
    paths
}

// Paths out of a relation node, fanning to every reachable information node.
pub fn find_paths_from_source(
    graph: &ArgGraph,
    source_id: &str,
    max_depth: usize,
) -> Vec<ArgumentPath> {
    let Some(source) = graph.index_of(source_id) else {
        return Vec::new();
    };

    let mut paths = Vec::new();
    for (target, node) in graph.nodes().iter().enumerate() {
        if target == source || node.kind != NodeKind::Information {
            continue;
        }
        paths.extend(enumerate(graph, source, target, max_depth));
    }
    paths
}

fn classify(graph: &ArgGraph, edge_indices: &[usize]) -> PathKind {
    let mut kind = PathKind::Support;
    for &edge_index in edge_indices {
        let role = graph.edges()[edge_index].role;
        if role.is_conflict() {
            return PathKind::Attack;
        }
        if role.is_preference() {
            kind = PathKind::Preference;
        }
    }
    kind
}

struct Frame {
    node: usize,
    cursor: usize,
}

// Explicit-stack DFS. The on-path set is scoped to the current branch: a
// node may appear in many enumerated paths but never twice in one.
fn enumerate(graph: &ArgGraph, from: usize, to: usize, max_depth: usize) -> Vec<ArgumentPath> {
    let mut frames = vec![Frame {
        node: from,
        cursor: 0,
    }];
    let mut on_path = HashSet::from([from]);
    let mut edge_trail: Vec<usize> = Vec::new();
    let mut found = Vec::new();

    while let Some(frame) = frames.last_mut() {
        let node = frame.node;
        let edges = graph.outgoing_edges(node);

        let Some(&edge_index) = edges.get(frame.cursor) else {
            frames.pop();
            on_path.remove(&node);
            if !frames.is_empty() {
                edge_trail.pop();
            }
            continue;
        };
        frame.cursor += 1;

        let edge = &graph.edges()[edge_index];
        let Some(target) = graph.index_of(&edge.to) else {
            continue;
        };
        if on_path.contains(&target) {
            continue;
        }
        if edge_trail.len() + 1 > max_depth {
            continue;
        }

        if target == to {
            let mut nodes = frames
                .iter()
                .map(|frame| graph.nodes()[frame.node].id.clone())
                .collect::<Vec<_>>();
            nodes.push(edge.to.clone());

            let mut edge_indices = edge_trail.clone();
            edge_indices.push(edge_index);

            let kind = classify(graph, &edge_indices);
            found.push(ArgumentPath {
                id: format!(
                    "{}->{}#{}",
                    graph.nodes()[from].id,
                    edge.to,
                    found.len()
                ),
                nodes,
                edges: edge_indices
                    .iter()
                    .map(|&index| graph.edges()[index].id.clone())
                    .collect(),
                kind,
            });
            continue;
        }

        frames.push(Frame {
            node: target,
            cursor: 0,
        });
        on_path.insert(target);
        edge_trail.push(edge_index);
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aif::test_graphs::{self, edge, node};
    use crate::aif::{ArgGraph, RawSnapshot};

    fn assert_path_valid(graph: &ArgGraph, path: &ArgumentPath) {
        assert_eq!(path.edges.len(), path.nodes.len() - 1);

        for (pair, edge_id) in path.nodes.windows(2).zip(&path.edges) {
            let edge = graph
                .edges()
                .iter()
                .find(|edge| &edge.id == edge_id)
                .expect("path edge exists");
            assert_eq!(edge.from, pair[0]);
            assert_eq!(edge.to, pair[1]);
        }
    }

    #[test]
    fn paths_satisfy_the_chain_invariant() {
        let graph = test_graphs::attack_chain();
        let paths = find_paths(&graph, "I1", "I3", DEFAULT_MAX_DEPTH);

        assert!(!paths.is_empty());
        for path in &paths {
            assert_path_valid(&graph, path);
        }
    }

    #[test]
    fn conflict_edges_classify_the_path_as_attack() {
        let graph = test_graphs::attack_chain();
        let paths = find_paths(&graph, "I1", "I3", DEFAULT_MAX_DEPTH);

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].kind, PathKind::Attack);
    }

    #[test]
    fn attack_takes_precedence_over_preference() {
        let graph = ArgGraph::from_snapshot(RawSnapshot {
            nodes: vec![
                node("A", "I", "a"),
                node("PA", "PA", "pref"),
                node("CA", "CA", "conflict"),
                node("B", "I", "b"),
            ],
            edges: vec![
                edge("e1", "A", "PA", "preferredElement"),
                edge("e2", "PA", "CA", "dispreferredElement"),
                edge("e3", "CA", "B", "conflictedElement"),
            ],
        });

        let paths = find_paths(&graph, "A", "B", DEFAULT_MAX_DEPTH);
        assert_eq!(paths[0].kind, PathKind::Attack);
    }

    #[test]
    fn preference_only_chains_classify_as_preference() {
        let graph = ArgGraph::from_snapshot(RawSnapshot {
            nodes: vec![
                node("A", "I", "a"),
                node("PA", "PA", "pref"),
                node("B", "I", "b"),
            ],
            edges: vec![
                edge("e1", "A", "PA", "preferredElement"),
                edge("e2", "PA", "B", "dispreferredElement"),
            ],
        });

        let paths = find_paths(&graph, "A", "B", DEFAULT_MAX_DEPTH);
        assert_eq!(paths[0].kind, PathKind::Preference);
    }

    #[test]
    fn support_is_the_default_classification() {
        let graph = test_graphs::attack_chain();
        let paths = find_paths(&graph, "I1", "I2", DEFAULT_MAX_DEPTH);

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].kind, PathKind::Support);
    }

    #[test]
    fn the_depth_bound_cuts_long_chains() {
        let graph = test_graphs::attack_chain();

        assert!(find_paths(&graph, "I1", "I3", 3).is_empty());
        assert_eq!(find_paths(&graph, "I1", "I3", 4).len(), 1);
    }

    #[test]
    fn cycles_do_not_hang_enumeration() {
        let graph = ArgGraph::from_snapshot(RawSnapshot {
            nodes: vec![
                node("A", "I", "a"),
                node("B", "RA", "b"),
                node("C", "I", "c"),
            ],
            edges: vec![
                edge("e1", "A", "B", "premise"),
                edge("e2", "B", "A", "conclusion"),
                edge("e3", "B", "C", "conclusion"),
            ],
        });

        let paths = find_paths(&graph, "A", "C", DEFAULT_MAX_DEPTH);
        assert_eq!(paths.len(), 1);
        for path in &paths {
            let unique = path.nodes.iter().collect::<HashSet<_>>();
            assert_eq!(unique.len(), path.nodes.len());
        }
    }

    #[test]
    fn terminal_enumeration_walks_from_every_source() {
        let graph = test_graphs::attack_chain();
        let paths = find_paths_to_terminal(&graph, "I3", DEFAULT_MAX_DEPTH);

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes.first().map(String::as_str), Some("I1"));
        assert_eq!(paths[0].nodes.last().map(String::as_str), Some("I3"));
    }

    #[test]
    fn relation_selection_fans_out_to_information_nodes() {
        let graph = test_graphs::attack_chain();
        let paths = find_paths_from_source(&graph, "RA1", DEFAULT_MAX_DEPTH);

        let targets = paths
            .iter()
            .filter_map(|path| path.nodes.last().cloned())
            .collect::<Vec<_>>();
        assert_eq!(targets, vec!["I2".to_owned(), "I3".to_owned()]);
    }

    #[test]
    fn highlight_set_mirrors_the_active_path() {
        let graph = test_graphs::attack_chain();
        let paths = find_paths(&graph, "I1", "I3", DEFAULT_MAX_DEPTH);
        let highlight = HighlightSet::from_path(&paths[0]);

        assert!(highlight.contains_node("RA1"));
        assert!(highlight.contains_edge("e3"));
        assert!(!highlight.contains_node("unrelated"));
    }
}
