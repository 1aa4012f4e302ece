use std::collections::{HashMap, HashSet};

use crate::aif::ArgGraph;

const ORDERING_SWEEPS: usize = 2;

// Barycenter ordering: alternate downward and upward sweeps, sorting each
// rank by the mean in-rank position of its neighbors in the adjacent rank.
// Ties keep their previous relative order, so the result is deterministic.
pub(super) fn order_ranks(graph: &ArgGraph, levels: &mut [Vec<usize>]) {
    if levels.len() < 2 {
        return;
    }

    for _ in 0..ORDERING_SWEEPS {
        for rank in 1..levels.len() {
            let anchor = position_map(&levels[rank - 1]);
            sort_by_barycenter(graph, &mut levels[rank], &anchor, NeighborSide::Incoming);
        }

        for rank in (0..levels.len() - 1).rev() {
            let anchor = position_map(&levels[rank + 1]);
            sort_by_barycenter(graph, &mut levels[rank], &anchor, NeighborSide::Outgoing);
        }
    }
}

#[derive(Clone, Copy)]
enum NeighborSide {
    Incoming,
    Outgoing,
}

fn position_map(level: &[usize]) -> HashMap<usize, usize> {
    level
        .iter()
        .enumerate()
        .map(|(position, &node)| (node, position))
        .collect()
}

fn sort_by_barycenter(
    graph: &ArgGraph,
    level: &mut [usize],
    anchor: &HashMap<usize, usize>,
    side: NeighborSide,
) {
    let current = position_map(level);

    let mut keyed = level
        .iter()
        .map(|&node| {
            let key = barycenter(graph, node, anchor, side)
                .unwrap_or_else(|| current.get(&node).copied().unwrap_or(0) as f32);
            (key, node)
        })
        .collect::<Vec<_>>();

    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    for (slot, (_key, node)) in level.iter_mut().zip(keyed) {
        *slot = node;
    }
}

fn barycenter(
    graph: &ArgGraph,
    node: usize,
    anchor: &HashMap<usize, usize>,
    side: NeighborSide,
) -> Option<f32> {
    let edge_indices = match side {
        NeighborSide::Incoming => graph.incoming_edges(node),
        NeighborSide::Outgoing => graph.outgoing_edges(node),
    };

    let mut sum = 0.0_f32;
    let mut count = 0_usize;
    let mut seen = HashSet::new();

    for &edge_index in edge_indices {
        let edge = &graph.edges()[edge_index];
        let neighbor_id = match side {
            NeighborSide::Incoming => &edge.from,
            NeighborSide::Outgoing => &edge.to,
        };
        let Some(neighbor) = graph.index_of(neighbor_id) else {
            continue;
        };
        let Some(&position) = anchor.get(&neighbor) else {
            continue;
        };

        if seen.insert(neighbor) {
            sum += position as f32;
            count += 1;
        }
    }

    (count > 0).then(|| sum / count as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aif::test_graphs::{edge, node};
    use crate::aif::{ArgGraph, RawSnapshot};

    #[test]
    fn children_line_up_under_their_parents() {
        // Two independent chains: A -> X and B -> Y, with the child rank
        // seeded in the crossing order [Y, X].
        let graph = ArgGraph::from_snapshot(RawSnapshot {
            nodes: vec![
                node("A", "I", "a"),
                node("B", "I", "b"),
                node("X", "RA", "x"),
                node("Y", "RA", "y"),
            ],
            edges: vec![
                edge("e1", "A", "X", "premise"),
                edge("e2", "B", "Y", "premise"),
            ],
        });

        let a = graph.index_of("A").unwrap();
        let b = graph.index_of("B").unwrap();
        let x = graph.index_of("X").unwrap();
        let y = graph.index_of("Y").unwrap();

        let mut levels = vec![vec![a, b], vec![y, x]];
        order_ranks(&graph, &mut levels);

        assert_eq!(levels[1], vec![x, y]);
    }

    #[test]
    fn ordering_is_deterministic() {
        let graph = crate::aif::test_graphs::attack_chain();
        let members = (0..graph.node_count()).collect::<Vec<_>>();
        let ranks = super::super::rank::assign_ranks(&graph, &members);

        let build = || {
            let max_rank = ranks.values().copied().max().unwrap_or(0);
            let mut levels = vec![Vec::new(); max_rank + 1];
            for &member in &members {
                levels[ranks[&member]].push(member);
            }
            levels
        };

        let mut first = build();
        let mut second = build();
        order_ranks(&graph, &mut first);
        order_ranks(&graph, &mut second);

        assert_eq!(first, second);
    }
}
