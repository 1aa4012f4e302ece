use std::collections::HashMap;

use log::warn;

mod parse;
mod provider;

pub use parse::{RawEdge, RawNode, RawSnapshot, parse_snapshot};
pub use provider::{ExpansionFilters, FileProvider, SnapshotProvider};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Information,
    Inference,
    Conflict,
    Preference,
}

impl NodeKind {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "RA" | "Inference" => Self::Inference,
            "CA" | "Conflict" => Self::Conflict,
            "PA" | "Preference" => Self::Preference,
            _ => Self::Information,
        }
    }

    pub fn wire(self) -> &'static str {
        match self {
            Self::Information => "I",
            Self::Inference => "RA",
            Self::Conflict => "CA",
            Self::Preference => "PA",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Information => "statement",
            Self::Inference => "inference",
            Self::Conflict => "conflict",
            Self::Preference => "preference",
        }
    }

    pub fn is_relation(self) -> bool {
        !matches!(self, Self::Information)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeRole {
    Premise,
    Conclusion,
    ConflictingElement,
    ConflictedElement,
    PreferredElement,
    DispreferredElement,
    Other,
}

impl EdgeRole {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "premise" => Self::Premise,
            "conclusion" => Self::Conclusion,
            "conflictingElement" => Self::ConflictingElement,
            "conflictedElement" => Self::ConflictedElement,
            "preferredElement" => Self::PreferredElement,
            "dispreferredElement" => Self::DispreferredElement,
            _ => Self::Other,
        }
    }

    pub fn wire(self) -> &'static str {
        match self {
            Self::Premise => "premise",
            Self::Conclusion => "conclusion",
            Self::ConflictingElement => "conflictingElement",
            Self::ConflictedElement => "conflictedElement",
            Self::PreferredElement => "preferredElement",
            Self::DispreferredElement => "dispreferredElement",
            Self::Other => "other",
        }
    }

    pub fn is_support(self) -> bool {
        matches!(self, Self::Premise | Self::Conclusion)
    }

    pub fn is_conflict(self) -> bool {
        matches!(self, Self::ConflictingElement | Self::ConflictedElement)
    }

    pub fn is_preference(self) -> bool {
        matches!(self, Self::PreferredElement | Self::DispreferredElement)
    }
}

#[derive(Clone, Debug)]
pub struct ArgNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub text: Option<String>,
    pub scheme_key: Option<String>,
}

impl ArgNode {
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

#[derive(Clone, Debug)]
pub struct ArgEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub role: EdgeRole,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub nodes_added: usize,
    pub edges_added: usize,
    pub edges_dropped: usize,
}

impl MergeOutcome {
    pub fn changed_graph(self) -> bool {
        self.nodes_added > 0 || self.edges_added > 0
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NeighborhoodSummary {
    pub support: usize,
    pub conflict: usize,
    pub preference: usize,
}

impl NeighborhoodSummary {
    pub fn total(self) -> usize {
        self.support + self.conflict + self.preference
    }
}

// Nodes keep first-seen order; search scans and layout ordering both rely
// on that order being stable across merges.
#[derive(Clone, Debug, Default)]
pub struct ArgGraph {
    nodes: Vec<ArgNode>,
    edges: Vec<ArgEdge>,
    node_index: HashMap<String, usize>,
    edge_index: HashMap<String, usize>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
}

impl ArgGraph {
    pub fn from_snapshot(snapshot: RawSnapshot) -> Self {
        let mut graph = Self::default();
        graph.merge(snapshot);
        graph
    }

    pub fn merge(&mut self, snapshot: RawSnapshot) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();

        for raw in snapshot.nodes {
            if raw.id.is_empty() || self.node_index.contains_key(&raw.id) {
                continue;
            }

            let node = ArgNode {
                kind: NodeKind::from_wire(&raw.kind),
                label: raw.label.unwrap_or_default(),
                text: raw.text,
                scheme_key: raw.scheme_key,
                id: raw.id,
            };

            self.node_index.insert(node.id.clone(), self.nodes.len());
            self.outgoing.push(Vec::new());
            self.incoming.push(Vec::new());
            self.nodes.push(node);
            outcome.nodes_added += 1;
        }

        for raw in snapshot.edges {
            if raw.id.is_empty() || self.edge_index.contains_key(&raw.id) {
                continue;
            }

            let (Some(&from), Some(&to)) = (
                self.node_index.get(&raw.from),
                self.node_index.get(&raw.to),
            ) else {
                warn!(
                    "dropping edge {} with unknown endpoint ({} -> {})",
                    raw.id, raw.from, raw.to
                );
                outcome.edges_dropped += 1;
                continue;
            };

            let index = self.edges.len();
            self.edge_index.insert(raw.id.clone(), index);
            self.outgoing[from].push(index);
            self.incoming[to].push(index);
            self.edges.push(ArgEdge {
                id: raw.id,
                from: raw.from,
                to: raw.to,
                role: EdgeRole::from_wire(&raw.role),
            });
            outcome.edges_added += 1;
        }

        outcome
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[ArgNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[ArgEdge] {
        &self.edges
    }

    pub fn node_at(&self, index: usize) -> Option<&ArgNode> {
        self.nodes.get(index)
    }

    pub fn node(&self, id: &str) -> Option<&ArgNode> {
        self.node_index.get(id).and_then(|&index| self.nodes.get(index))
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn outgoing_edges(&self, node: usize) -> &[usize] {
        self.outgoing.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn incoming_edges(&self, node: usize) -> &[usize] {
        self.incoming.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn source_indices(&self) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&index| self.incoming[index].is_empty())
            .collect()
    }

    pub fn terminal_indices(&self) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&index| self.outgoing[index].is_empty())
            .collect()
    }

    pub fn neighborhood_summary(&self, node: usize) -> NeighborhoodSummary {
        let mut summary = NeighborhoodSummary::default();

        let edges = self
            .outgoing_edges(node)
            .iter()
            .chain(self.incoming_edges(node).iter());
        for &edge_index in edges {
            let role = self.edges[edge_index].role;
            if role.is_support() {
                summary.support += 1;
            } else if role.is_conflict() {
                summary.conflict += 1;
            } else if role.is_preference() {
                summary.preference += 1;
            }
        }

        summary
    }

    pub fn to_snapshot(&self) -> RawSnapshot {
        RawSnapshot {
            nodes: self
                .nodes
                .iter()
                .map(|node| RawNode {
                    id: node.id.clone(),
                    kind: node.kind.wire().to_owned(),
                    label: Some(node.label.clone()),
                    text: node.text.clone(),
                    scheme_key: node.scheme_key.clone(),
                })
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|edge| RawEdge {
                    id: edge.id.clone(),
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    role: edge.role.wire().to_owned(),
                })
                .collect(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_graphs::{edge, node};
    use super::*;

    fn sample_snapshot() -> RawSnapshot {
        RawSnapshot {
            nodes: vec![
                node("I:c1", "I", "First claim"),
                node("RA:a1", "RA", "Argument"),
                node("I:c2", "I", "Second claim"),
            ],
            edges: vec![
                edge("e1", "I:c1", "RA:a1", "premise"),
                edge("e2", "RA:a1", "I:c2", "conclusion"),
            ],
        }
    }

    #[test]
    fn merge_builds_adjacency() {
        let graph = ArgGraph::from_snapshot(sample_snapshot());

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);

        let ra = graph.index_of("RA:a1").unwrap();
        assert_eq!(graph.outgoing_edges(ra).len(), 1);
        assert_eq!(graph.incoming_edges(ra).len(), 1);
        assert_eq!(graph.source_indices(), vec![graph.index_of("I:c1").unwrap()]);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut graph = ArgGraph::from_snapshot(sample_snapshot());
        let outcome = graph.merge(sample_snapshot());

        assert_eq!(outcome, MergeOutcome::default());
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn merge_drops_edges_with_unknown_endpoints() {
        let mut graph = ArgGraph::from_snapshot(sample_snapshot());
        let outcome = graph.merge(RawSnapshot {
            nodes: Vec::new(),
            edges: vec![edge("e3", "I:c2", "I:missing", "premise")],
        });

        assert_eq!(outcome.edges_dropped, 1);
        assert_eq!(outcome.edges_added, 0);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn dropped_edge_merges_once_endpoints_arrive() {
        let mut graph = ArgGraph::from_snapshot(sample_snapshot());
        graph.merge(RawSnapshot {
            nodes: Vec::new(),
            edges: vec![edge("e3", "I:c2", "CA:x", "conflictingElement")],
        });

        let outcome = graph.merge(RawSnapshot {
            nodes: vec![node("CA:x", "CA", "Conflict")],
            edges: vec![edge("e3", "I:c2", "CA:x", "conflictingElement")],
        });

        assert_eq!(outcome.nodes_added, 1);
        assert_eq!(outcome.edges_added, 1);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn first_delivery_of_a_node_id_wins() {
        let mut graph = ArgGraph::from_snapshot(sample_snapshot());
        graph.merge(RawSnapshot {
            nodes: vec![node("I:c1", "I", "Renamed claim")],
            edges: Vec::new(),
        });

        assert_eq!(graph.node("I:c1").unwrap().label, "First claim");
    }

    #[test]
    fn unknown_kinds_and_roles_are_tolerated() {
        let graph = ArgGraph::from_snapshot(RawSnapshot {
            nodes: vec![node("n1", "mystery", "?"), node("n2", "I", "claim")],
            edges: vec![edge("e1", "n1", "n2", "exotic")],
        });

        assert_eq!(graph.node("n1").unwrap().kind, NodeKind::Information);
        assert_eq!(graph.edges()[0].role, EdgeRole::Other);
    }

    #[test]
    fn neighborhood_summary_counts_by_category() {
        let graph = test_graphs::attack_chain();
        let i2 = graph.index_of("I2").unwrap();
        let summary = graph.neighborhood_summary(i2);

        assert_eq!(summary.support, 1);
        assert_eq!(summary.conflict, 1);
        assert_eq!(summary.preference, 0);
        assert_eq!(summary.total(), 2);
    }
}
