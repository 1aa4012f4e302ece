use std::collections::HashMap;

use crate::aif::ArgGraph;
use crate::viewport::GraphPoint;

use super::{LayoutOptions, NodeBox, node_size};

pub(super) struct PlacedComponent {
    pub boxes: Vec<(usize, NodeBox)>,
    pub routes: Vec<(usize, Vec<GraphPoint>)>,
    pub cross_extent: f32,
}

// Coordinates are assigned in "flow space" first: the main axis runs along
// ranks, the cross axis across a rank. Direction only decides how flow
// space maps onto x/y at the end.
pub(super) fn place(
    graph: &ArgGraph,
    levels: &[Vec<usize>],
    options: &LayoutOptions,
) -> PlacedComponent {
    let vertical = !options.direction.is_horizontal();

    let flow_size = |node: usize| -> (f32, f32) {
        let (width, height) = node_size(&graph.nodes()[node]);
        if vertical {
            (height, width)
        } else {
            (width, height)
        }
    };

    let mut rank_main = Vec::with_capacity(levels.len());
    let mut rank_cross = Vec::with_capacity(levels.len());
    for level in levels {
        let mut main = 0.0_f32;
        let mut cross = 0.0_f32;
        for (position, &node) in level.iter().enumerate() {
            let (node_main, node_cross) = flow_size(node);
            main = main.max(node_main);
            cross += node_cross;
            if position > 0 {
                cross += options.node_spacing;
            }
        }
        rank_main.push(main);
        rank_cross.push(cross);
    }

    let cross_extent = rank_cross.iter().copied().fold(0.0_f32, f32::max);
    let main_extent = rank_main.iter().sum::<f32>()
        + options.rank_spacing * levels.len().saturating_sub(1) as f32;

    let mut main_offset = Vec::with_capacity(levels.len());
    let mut cursor = 0.0_f32;
    for (rank, &extent) in rank_main.iter().enumerate() {
        main_offset.push(cursor);
        cursor += extent;
        if rank + 1 < levels.len() {
            cursor += options.rank_spacing;
        }
    }

    // Flow-space centers, later converted per direction.
    let mut flow_centers: HashMap<usize, (f32, f32)> = HashMap::new();
    let mut rank_of: HashMap<usize, usize> = HashMap::new();

    for (rank, level) in levels.iter().enumerate() {
        let main_center = main_offset[rank] + rank_main[rank] * 0.5;
        let mut cross_cursor = (cross_extent - rank_cross[rank]) * 0.5;

        for &node in level {
            let (_node_main, node_cross) = flow_size(node);
            flow_centers.insert(node, (main_center, cross_cursor + node_cross * 0.5));
            rank_of.insert(node, rank);
            cross_cursor += node_cross + options.node_spacing;
        }
    }

    let to_graph = |main: f32, cross: f32| -> GraphPoint {
        let main = if options.direction.is_reversed() {
            main_extent - main
        } else {
            main
        };
        if vertical {
            GraphPoint::new(cross, main)
        } else {
            GraphPoint::new(main, cross)
        }
    };

    let mut boxes = Vec::with_capacity(flow_centers.len());
    for level in levels {
        for &node in level {
            let (main, cross) = flow_centers[&node];
            let center = to_graph(main, cross);
            let (width, height) = node_size(&graph.nodes()[node]);
            boxes.push((
                node,
                NodeBox {
                    x: center.x,
                    y: center.y,
                    width,
                    height,
                },
            ));
        }
    }

    let routes = route_edges(
        graph,
        &flow_centers,
        &rank_of,
        &main_offset,
        &rank_main,
        options,
        &to_graph,
    );

    PlacedComponent {
        boxes,
        routes,
        cross_extent,
    }
}

#[allow(clippy::too_many_arguments)]
fn route_edges(
    graph: &ArgGraph,
    flow_centers: &HashMap<usize, (f32, f32)>,
    rank_of: &HashMap<usize, usize>,
    main_offset: &[f32],
    rank_main: &[f32],
    options: &LayoutOptions,
    to_graph: &impl Fn(f32, f32) -> GraphPoint,
) -> Vec<(usize, Vec<GraphPoint>)> {
    let mut groups: Vec<((usize, usize), Vec<usize>)> = Vec::new();
    let mut group_index: HashMap<(usize, usize), usize> = HashMap::new();

    for (edge_index, edge) in graph.edges().iter().enumerate() {
        let (Some(from), Some(to)) = (graph.index_of(&edge.from), graph.index_of(&edge.to)) else {
            continue;
        };
        if !flow_centers.contains_key(&from) || !flow_centers.contains_key(&to) {
            continue;
        }

        let key = (from, to);
        let slot = *group_index.entry(key).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(edge_index);
    }

    let mut routes = Vec::new();

    for ((from, to), edge_indices) in groups {
        let (from_main, from_cross) = flow_centers[&from];
        let (to_main, to_cross) = flow_centers[&to];
        let from_rank = rank_of[&from];
        let to_rank = rank_of[&to];
        let fan = edge_indices.len();

        for (lane, edge_index) in edge_indices.into_iter().enumerate() {
            let offset = options.edge_spacing * (lane as f32 - (fan - 1) as f32 * 0.5);

            let mut points = vec![to_graph(from_main, from_cross)];

            if from_rank.abs_diff(to_rank) > 1 {
                // One bend per crossed rank keeps long edges out of the
                // rank bands they skip.
                let step: isize = if to_rank > from_rank { 1 } else { -1 };
                let span = from_rank.abs_diff(to_rank) as f32;
                let mut cursor = from_rank as isize + step;
                while cursor as usize != to_rank {
                    let rank = cursor as usize;
                    let t = from_rank.abs_diff(rank) as f32 / span;
                    let bend_main = main_offset[rank] + rank_main[rank] * 0.5;
                    let bend_cross = from_cross + (to_cross - from_cross) * t + offset;
                    points.push(to_graph(bend_main, bend_cross));
                    cursor += step;
                }
            } else if offset.abs() > f32::EPSILON {
                points.push(to_graph(
                    (from_main + to_main) * 0.5,
                    (from_cross + to_cross) * 0.5 + offset,
                ));
            }

            points.push(to_graph(to_main, to_cross));
            routes.push((edge_index, points));
        }
    }

    routes
}
