use std::collections::HashSet;

use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, vec2,
};

use crate::aif::NodeKind;
use crate::util::abbreviate;
use crate::viewport::{GraphPoint, Lod};

use super::super::ViewModel;
use super::super::render_utils::{
    HIGHLIGHT_DIM, blend_color, dim_color, draw_arrow_head, draw_background, draw_polyline,
    edge_style, node_fill, node_outline, polyline_visible, rect_border_toward, rect_visible,
};

const SELECTION_ACCENT: Color32 = Color32::from_rgb(245, 206, 93);
const SEARCH_ACCENT: Color32 = Color32::from_rgb(103, 196, 255);

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.layout_dirty {
            self.relayout();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.viewport.pan, self.viewport.zoom);
        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        if let Some(id) = self.pending_center.take()
            && let Some(node_box) = self.layout.positions.get(&id)
        {
            self.viewport = self.viewport.center_on(node_box.center(), rect.size());
        }

        if self.layout.is_empty() {
            self.visible_node_count = 0;
            self.visible_edge_count = 0;
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "The argument graph is empty.",
                FontId::proportional(14.0),
                Color32::from_gray(160),
            );
            return;
        }

        let viewport = self.viewport;
        let to_screen =
            move |point: GraphPoint| -> Pos2 { rect.min + viewport.graph_to_screen(point).to_vec2() };

        let mut screen_boxes: Vec<(usize, Rect)> = Vec::new();
        for (index, node) in self.graph.nodes().iter().enumerate() {
            let Some(node_box) = self.layout.positions.get(&node.id) else {
                continue;
            };
            let screen_box = Rect::from_min_max(
                to_screen(GraphPoint::new(node_box.min_x(), node_box.min_y())),
                to_screen(GraphPoint::new(node_box.max_x(), node_box.max_y())),
            );
            screen_boxes.push((index, screen_box));
        }

        let visible = screen_boxes
            .iter()
            .copied()
            .filter(|(_, screen_box)| rect_visible(rect, *screen_box))
            .collect::<Vec<_>>();
        self.visible_node_count = visible.len();

        let hovered = self.hovered_node(ui, rect, &visible);
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let minimap_rect = (self.config.show_minimap && !self.layout.bounds.is_degenerate())
            .then(|| crate::minimap::minimap_rect(rect, 12.0));
        let pointer_pos = ui.input(|input| input.pointer.hover_pos());
        let pointer_in_minimap = minimap_rect
            .zip(pointer_pos)
            .is_some_and(|(minimap, pointer)| minimap.contains(pointer));

        if response.clicked_by(egui::PointerButton::Primary) && !pointer_in_minimap {
            match hovered {
                Some(index) => {
                    let node = &self.graph.nodes()[index];
                    let id = node.id.clone();
                    let is_relation = node.kind.is_relation();

                    self.set_selected(Some(id.clone()));
                    if is_relation && self.can_expand(&id) {
                        self.request_expansion(ui.ctx(), &id);
                    }
                }
                None => self.set_selected(None),
            }
        }

        let lod = Lod::for_zoom(self.viewport.zoom);
        let dim_active = !self.highlight.is_empty();
        let search_active = !self.search_query.trim().is_empty();
        let search_matches = if search_active {
            self.search_results
                .iter()
                .map(|result| result.node_index)
                .collect::<HashSet<_>>()
        } else {
            HashSet::new()
        };
        let search_current = search_active
            .then(|| {
                self.search_results
                    .get(self.search_cursor.selected())
                    .map(|result| result.node_index)
            })
            .flatten();

        let box_by_index = |index: usize| -> Option<Rect> {
            screen_boxes
                .iter()
                .find(|(candidate, _)| *candidate == index)
                .map(|(_, screen_box)| *screen_box)
        };

        let mut visible_edge_count = 0usize;
        for edge in self.graph.edges() {
            let (Some(from_index), Some(to_index)) =
                (self.graph.index_of(&edge.from), self.graph.index_of(&edge.to))
            else {
                continue;
            };
            let (Some(from_box), Some(to_box)) = (box_by_index(from_index), box_by_index(to_index))
            else {
                continue;
            };

            let mut points = match self.layout.routes.get(&edge.id) {
                Some(route) if route.len() >= 2 => {
                    route.iter().map(|point| to_screen(*point)).collect::<Vec<_>>()
                }
                _ => vec![from_box.center(), to_box.center()],
            };

            // Pull the endpoints onto the node outlines.
            let second = points[1];
            points[0] = rect_border_toward(from_box, second);
            let second_last = points[points.len() - 2];
            let last = points.len() - 1;
            points[last] = rect_border_toward(to_box, second_last);

            if !polyline_visible(rect, &points, 2.5) {
                continue;
            }
            visible_edge_count += 1;

            let (base_color, pattern) = edge_style(edge.role);
            let highlighted = self.highlight.contains_edge(&edge.id);
            let (width, color) = if highlighted {
                (
                    (2.6 * self.viewport.zoom.sqrt()).clamp(1.4, 4.6),
                    blend_color(base_color, SELECTION_ACCENT, 0.45),
                )
            } else if dim_active {
                (
                    (1.0 * self.viewport.zoom.sqrt()).clamp(0.4, 1.6),
                    dim_color(base_color, HIGHLIGHT_DIM),
                )
            } else {
                (
                    (1.6 * self.viewport.zoom.sqrt()).clamp(0.7, 2.8),
                    base_color,
                )
            };

            let stroke = Stroke::new(width, color);
            draw_polyline(&painter, &points, stroke, &pattern);

            let tip = points[last];
            let direction = tip - points[last - 1];
            let head_size = (7.0 * self.viewport.zoom.sqrt()).clamp(4.0, 11.0);
            draw_arrow_head(&painter, tip, direction, head_size, color);
        }
        self.visible_edge_count = visible_edge_count;

        let mut selection_animating = false;

        for (index, screen_box) in &visible {
            let node = &self.graph.nodes()[*index];
            let is_selected = self.selected.as_deref() == Some(node.id.as_str());
            let is_hovered = hovered == Some(*index);
            let on_path = self.highlight.contains_node(&node.id);
            let is_search_match = search_matches.contains(index);
            let is_search_current = search_current == Some(*index);

            let mut fill = node_fill(node.kind);
            let mut outline = node_outline(node.kind);
            if dim_active && !on_path && !is_selected {
                fill = dim_color(fill, HIGHLIGHT_DIM);
                outline = dim_color(outline, HIGHLIGHT_DIM);
            } else if search_active && !is_search_match && !is_selected {
                fill = dim_color(fill, 0.45);
                outline = dim_color(outline, 0.45);
            }
            if is_hovered {
                fill = blend_color(fill, Color32::WHITE, 0.08);
            }

            let rounding = if node.kind.is_relation() {
                screen_box.height() * 0.5
            } else {
                6.0 * self.viewport.zoom.clamp(0.5, 1.5)
            };

            let selection_mix = ui.ctx().animate_bool(
                ui.make_persistent_id(("node-selection", node.id.as_str())),
                is_selected,
            );
            if selection_mix > 0.0 && selection_mix < 1.0 {
                selection_animating = true;
            }

            painter.rect_filled(*screen_box, rounding, fill);
            painter.rect_stroke(
                *screen_box,
                rounding,
                Stroke::new(
                    1.2 + selection_mix * 1.2,
                    blend_color(outline, SELECTION_ACCENT, selection_mix),
                ),
                StrokeKind::Middle,
            );

            if is_search_match || is_search_current {
                let ring = screen_box.expand(if is_search_current { 5.0 } else { 3.0 });
                painter.rect_stroke(
                    ring,
                    rounding,
                    Stroke::new(
                        if is_search_current { 2.2 } else { 1.4 },
                        SEARCH_ACCENT,
                    ),
                    StrokeKind::Middle,
                );
            }

            self.draw_node_content(&painter, node.kind, *index, *screen_box, lod, on_path);

            if self.can_expand(&node.id) && self.viewport.zoom > 0.5 {
                let summary = self.graph.neighborhood_summary(*index);
                if summary.total() > 0 {
                    let badge_center = screen_box.right_top() + vec2(-4.0, 4.0);
                    painter.circle_filled(badge_center, 8.0, Color32::from_rgb(59, 130, 246));
                    painter.text(
                        badge_center,
                        Align2::CENTER_CENTER,
                        summary.total().to_string(),
                        FontId::proportional(9.0),
                        Color32::WHITE,
                    );
                }
            }

            if self.is_expanding(&node.id) {
                painter.text(
                    screen_box.center_bottom() + vec2(0.0, 8.0),
                    Align2::CENTER_CENTER,
                    "expanding…",
                    FontId::proportional(10.0),
                    Color32::from_gray(200),
                );
            }
        }

        if selection_animating {
            ui.ctx().request_repaint();
        }

        if let Some(hovered_index) = hovered
            && let Some(node) = self.graph.node_at(hovered_index)
        {
            let status = format!(
                "{}  |  {}  |  in {} / out {}",
                abbreviate(node.display_label(), 60),
                node.kind.describe(),
                self.graph.incoming_edges(hovered_index).len(),
                self.graph.outgoing_edges(hovered_index).len(),
            );
            painter.text(
                rect.left_bottom() + vec2(10.0, -10.0),
                Align2::LEFT_BOTTOM,
                status,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if self.config.show_legend {
            draw_legend(&painter, rect);
        }

        if let Some(minimap_rect) = minimap_rect {
            self.draw_minimap(&painter, rect, minimap_rect, &response, pointer_pos);
        }
    }

    // One LOD-resolved paint path per node kind: a bare glyph far out, an
    // abbreviated label at mid zoom, full label plus scheme close in.
    fn draw_node_content(
        &self,
        painter: &egui::Painter,
        kind: NodeKind,
        index: usize,
        screen_box: Rect,
        lod: Lod,
        on_path: bool,
    ) {
        let node = &self.graph.nodes()[index];
        let dimmed = !self.highlight.is_empty() && !on_path;
        let text_color = if dimmed {
            Color32::from_gray(120)
        } else {
            Color32::from_gray(235)
        };

        match lod {
            Lod::Glyph => {
                painter.text(
                    screen_box.center(),
                    Align2::CENTER_CENTER,
                    kind.wire(),
                    FontId::proportional(10.0),
                    text_color,
                );
            }
            Lod::Compact => {
                painter.text(
                    screen_box.center(),
                    Align2::CENTER_CENTER,
                    abbreviate(node.display_label(), 18),
                    FontId::proportional(11.0),
                    text_color,
                );
            }
            Lod::Full => {
                painter.text(
                    screen_box.center(),
                    Align2::CENTER_CENTER,
                    abbreviate(node.display_label(), 48),
                    FontId::proportional(13.0),
                    text_color,
                );

                let secondary = node
                    .scheme_key
                    .as_deref()
                    .map(str::to_owned)
                    .unwrap_or_else(|| {
                        if kind.is_relation() {
                            kind.describe().to_owned()
                        } else {
                            String::new()
                        }
                    });
                if !secondary.is_empty() {
                    painter.text(
                        screen_box.center_bottom() - vec2(0.0, 8.0),
                        Align2::CENTER_CENTER,
                        abbreviate(&secondary, 24),
                        FontId::proportional(10.0),
                        Color32::from_gray(165),
                    );
                }
            }
        }
    }
}

fn draw_legend(painter: &egui::Painter, rect: Rect) {
    let entries = [
        (NodeKind::Information, "statement"),
        (NodeKind::Inference, "inference (RA)"),
        (NodeKind::Conflict, "conflict (CA)"),
        (NodeKind::Preference, "preference (PA)"),
    ];

    let origin = rect.right_top() + vec2(-150.0, 12.0);
    painter.rect_filled(
        Rect::from_min_size(origin - vec2(10.0, 8.0), vec2(148.0, 20.0 * entries.len() as f32 + 14.0)),
        4.0,
        Color32::from_rgba_unmultiplied(15, 18, 24, 220),
    );

    for (row, (kind, label)) in entries.iter().enumerate() {
        let y = origin.y + 4.0 + row as f32 * 20.0;
        painter.circle_filled(Pos2::new(origin.x, y), 5.0, node_outline(*kind));
        painter.text(
            Pos2::new(origin.x + 12.0, y),
            Align2::LEFT_CENTER,
            *label,
            FontId::proportional(11.0),
            Color32::from_gray(220),
        );
    }
}
