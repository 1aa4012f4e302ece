use std::collections::{HashMap, HashSet, VecDeque};

use crate::aif::ArgGraph;

// Kahn leveling over the component's forward edges; every edge then points
// from a lower rank to a strictly higher one except edges closing a cycle.
// Members of cycles left unvisited by the topological pass are placed one
// past their deepest ranked predecessor.
pub(super) fn assign_ranks(graph: &ArgGraph, members: &[usize]) -> HashMap<usize, usize> {
    let member_set = members.iter().copied().collect::<HashSet<_>>();

    let mut ranks = members
        .iter()
        .map(|&index| (index, 0_usize))
        .collect::<HashMap<_, _>>();
    let mut indegree = members
        .iter()
        .map(|&index| (index, 0_usize))
        .collect::<HashMap<_, _>>();

    for &member in members {
        for &edge_index in graph.outgoing_edges(member) {
            let edge = &graph.edges()[edge_index];
            if let Some(target) = graph.index_of(&edge.to)
                && member_set.contains(&target)
                && let Some(degree) = indegree.get_mut(&target)
            {
                *degree += 1;
            }
        }
    }

    let mut queue = members
        .iter()
        .copied()
        .filter(|index| indegree.get(index).copied().unwrap_or(0) == 0)
        .collect::<VecDeque<_>>();
    let mut visited = HashSet::new();

    while let Some(member) = queue.pop_front() {
        visited.insert(member);
        let member_rank = ranks.get(&member).copied().unwrap_or(0);

        for &edge_index in graph.outgoing_edges(member) {
            let edge = &graph.edges()[edge_index];
            let Some(target) = graph.index_of(&edge.to) else {
                continue;
            };
            if !member_set.contains(&target) {
                continue;
            }

            let entry = ranks.entry(target).or_insert(0);
            if *entry < member_rank + 1 {
                *entry = member_rank + 1;
            }

            if let Some(degree) = indegree.get_mut(&target)
                && *degree > 0
            {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(target);
                }
            }
        }
    }

    if visited.len() != members.len() {
        for &member in members {
            if visited.contains(&member) {
                continue;
            }

            let mut max_parent = 0_usize;
            let mut has_parent = false;
            for &edge_index in graph.incoming_edges(member) {
                let edge = &graph.edges()[edge_index];
                let Some(source) = graph.index_of(&edge.from) else {
                    continue;
                };
                if !member_set.contains(&source) {
                    continue;
                }

                has_parent = true;
                let parent_rank = ranks.get(&source).copied().unwrap_or(0);
                max_parent = max_parent.max(parent_rank + 1);
            }

            ranks.insert(member, if has_parent { max_parent } else { 0 });
        }
    }

    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aif::test_graphs;

    #[test]
    fn ranks_follow_edge_direction() {
        let graph = test_graphs::attack_chain();
        let members = (0..graph.node_count()).collect::<Vec<_>>();
        let ranks = assign_ranks(&graph, &members);

        let rank_of = |id: &str| ranks[&graph.index_of(id).unwrap()];
        assert_eq!(rank_of("I1"), 0);
        assert_eq!(rank_of("RA1"), 1);
        assert_eq!(rank_of("I2"), 2);
        assert_eq!(rank_of("CA1"), 3);
        assert_eq!(rank_of("I3"), 4);
    }

    #[test]
    fn cycles_still_get_every_node_ranked() {
        use crate::aif::test_graphs::{edge, node};
        use crate::aif::{ArgGraph, RawSnapshot};

        let graph = ArgGraph::from_snapshot(RawSnapshot {
            nodes: vec![
                node("A", "I", "a"),
                node("B", "RA", "b"),
                node("C", "I", "c"),
            ],
            edges: vec![
                edge("e1", "A", "B", "premise"),
                edge("e2", "B", "C", "conclusion"),
                edge("e3", "C", "A", "premise"),
            ],
        });
        let members = (0..graph.node_count()).collect::<Vec<_>>();
        let ranks = assign_ranks(&graph, &members);

        assert_eq!(ranks.len(), 3);
    }
}
