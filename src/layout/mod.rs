use std::collections::HashMap;

use crate::aif::{ArgGraph, ArgNode, NodeKind};
use crate::viewport::GraphPoint;

mod coords;
mod order;
mod rank;

pub const INFO_MIN_WIDTH: f32 = 180.0;
pub const INFO_MAX_WIDTH: f32 = 300.0;
pub const INFO_MIN_HEIGHT: f32 = 60.0;
pub const INFO_MAX_HEIGHT: f32 = 120.0;
pub const RELATION_WIDTH: f32 = 100.0;
pub const RELATION_HEIGHT: f32 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    TopToBottom,
    BottomToTop,
    LeftToRight,
    RightToLeft,
}

impl Direction {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftToRight | Self::RightToLeft)
    }

    pub fn is_reversed(self) -> bool {
        matches!(self, Self::BottomToTop | Self::RightToLeft)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TopToBottom => "top to bottom",
            Self::BottomToTop => "bottom to top",
            Self::LeftToRight => "left to right",
            Self::RightToLeft => "right to left",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutOptions {
    pub direction: Direction,
    pub rank_spacing: f32,
    pub node_spacing: f32,
    pub edge_spacing: f32,
    pub margin: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Compact,
    Standard,
    Spacious,
    Horizontal,
}

impl Preset {
    pub const ALL: [Self; 4] = [
        Self::Compact,
        Self::Standard,
        Self::Spacious,
        Self::Horizontal,
    ];

    pub fn options(self) -> LayoutOptions {
        match self {
            Self::Compact => LayoutOptions {
                direction: Direction::TopToBottom,
                rank_spacing: 60.0,
                node_spacing: 40.0,
                edge_spacing: 8.0,
                margin: 24.0,
            },
            Self::Standard => LayoutOptions {
                direction: Direction::TopToBottom,
                rank_spacing: 100.0,
                node_spacing: 80.0,
                edge_spacing: 12.0,
                margin: 40.0,
            },
            Self::Spacious => LayoutOptions {
                direction: Direction::TopToBottom,
                rank_spacing: 150.0,
                node_spacing: 120.0,
                edge_spacing: 16.0,
                margin: 60.0,
            },
            Self::Horizontal => LayoutOptions {
                direction: Direction::LeftToRight,
                ..Self::Standard.options()
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Standard => "standard",
            Self::Spacious => "spacious",
            Self::Horizontal => "horizontal",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NodeBox {
    pub fn center(&self) -> GraphPoint {
        GraphPoint::new(self.x, self.y)
    }

    pub fn min_x(&self) -> f32 {
        self.x - self.width * 0.5
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width * 0.5
    }

    pub fn min_y(&self) -> f32 {
        self.y - self.height * 0.5
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height * 0.5
    }

    pub fn overlaps(&self, other: &NodeBox, gap: f32) -> bool {
        self.min_x() - gap < other.max_x()
            && other.min_x() - gap < self.max_x()
            && self.min_y() - gap < other.max_y()
            && other.min_y() - gap < self.max_y()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        (self.max_x - self.min_x).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.max_y - self.min_y).max(0.0)
    }

    pub fn center(&self) -> GraphPoint {
        GraphPoint::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 && self.height() <= 0.0
    }

    fn include(&mut self, node_box: &NodeBox) {
        self.min_x = self.min_x.min(node_box.min_x());
        self.min_y = self.min_y.min(node_box.min_y());
        self.max_x = self.max_x.max(node_box.max_x());
        self.max_y = self.max_y.max(node_box.max_y());
    }
}

#[derive(Clone, Debug, Default)]
pub struct Layout {
    pub positions: HashMap<String, NodeBox>,
    pub routes: HashMap<String, Vec<GraphPoint>>,
    pub bounds: Bounds,
}

impl Layout {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

pub fn node_size(node: &ArgNode) -> (f32, f32) {
    match node.kind {
        NodeKind::Information => {
            let chars = node.display_label().chars().count() as f32;
            let width = (INFO_MIN_WIDTH + chars * 2.0).min(INFO_MAX_WIDTH);
            let height = (INFO_MIN_HEIGHT + chars * 0.5).min(INFO_MAX_HEIGHT);
            (width, height)
        }
        _ => (RELATION_WIDTH, RELATION_HEIGHT),
    }
}

// Wide fan-ins read better sideways: lots of leaf premises and only a
// couple of conclusions would otherwise stack into a very tall diagram.
pub fn auto_direction(graph: &ArgGraph) -> Direction {
    let leaves = graph.source_indices().len();
    let terminals = graph.terminal_indices().len();

    if leaves > 5 && terminals <= 2 {
        Direction::LeftToRight
    } else {
        Direction::TopToBottom
    }
}

pub fn layout(graph: &ArgGraph, options: &LayoutOptions) -> Layout {
    if graph.node_count() == 0 {
        return Layout::empty();
    }

    let components = connected_components(graph);
    let vertical = !options.direction.is_horizontal();

    let mut result = Layout::empty();
    let mut bounds: Option<Bounds> = None;
    let mut pack_cursor = options.margin;

    for members in components {
        let ranks = rank::assign_ranks(graph, &members);
        let max_rank = ranks.values().copied().max().unwrap_or(0);

        let mut levels = vec![Vec::new(); max_rank + 1];
        for &member in &members {
            levels[ranks[&member]].push(member);
        }
        order::order_ranks(graph, &mut levels);

        let placed = coords::place(graph, &levels, options);

        // Components pack side by side along the cross axis.
        let (dx, dy) = if vertical {
            (pack_cursor, options.margin)
        } else {
            (options.margin, pack_cursor)
        };

        for (node, node_box) in &placed.boxes {
            let shifted = NodeBox {
                x: node_box.x + dx,
                y: node_box.y + dy,
                ..*node_box
            };
            bounds
                .get_or_insert(Bounds {
                    min_x: shifted.min_x(),
                    min_y: shifted.min_y(),
                    max_x: shifted.max_x(),
                    max_y: shifted.max_y(),
                })
                .include(&shifted);
            result
                .positions
                .insert(graph.nodes()[*node].id.clone(), shifted);
        }

        for (edge_index, points) in placed.routes {
            let shifted = points
                .into_iter()
                .map(|point| GraphPoint::new(point.x + dx, point.y + dy))
                .collect::<Vec<_>>();
            result
                .routes
                .insert(graph.edges()[edge_index].id.clone(), shifted);
        }

        pack_cursor += placed.cross_extent + options.node_spacing * 2.0;
    }

    if let Some(mut bounds) = bounds {
        bounds.min_x -= options.margin;
        bounds.min_y -= options.margin;
        bounds.max_x += options.margin;
        bounds.max_y += options.margin;
        result.bounds = bounds;
    }

    result
}

// Undirected connectivity; component order and member order both follow
// first appearance in the node list so re-layout is reproducible.
fn connected_components(graph: &ArgGraph) -> Vec<Vec<usize>> {
    let node_count = graph.node_count();
    let mut visited = vec![false; node_count];
    let mut components = Vec::new();

    for start in 0..node_count {
        if visited[start] {
            continue;
        }

        let mut members = Vec::new();
        let mut stack = vec![start];
        visited[start] = true;

        while let Some(node) = stack.pop() {
            members.push(node);

            let edges = graph
                .outgoing_edges(node)
                .iter()
                .chain(graph.incoming_edges(node).iter());
            for &edge_index in edges {
                let edge = &graph.edges()[edge_index];
                for endpoint in [&edge.from, &edge.to] {
                    if let Some(index) = graph.index_of(endpoint)
                        && !visited[index]
                    {
                        visited[index] = true;
                        stack.push(index);
                    }
                }
            }
        }

        members.sort_unstable();
        components.push(members);
    }

    components
}
