use eframe::egui::{self, Color32, Painter, Pos2, Rect, Shape, Stroke, StrokeKind};

use crate::minimap::{MINIMAP_PADDING, MinimapTransform};

use super::super::ViewModel;
use super::super::render_utils::node_outline;

impl ViewModel {
    pub(in crate::app) fn draw_minimap(
        &mut self,
        painter: &Painter,
        canvas: Rect,
        minimap: Rect,
        response: &egui::Response,
        pointer_pos: Option<Pos2>,
    ) {
        painter.rect_filled(minimap, 4.0, Color32::from_rgba_unmultiplied(12, 15, 20, 235));
        painter.rect_stroke(
            minimap,
            4.0,
            Stroke::new(1.0, Color32::from_gray(80)),
            StrokeKind::Middle,
        );

        let transform = MinimapTransform::new(self.layout.bounds, minimap, MINIMAP_PADDING);

        for edge in self.graph.edges() {
            let (Some(from), Some(to)) = (
                self.layout.positions.get(&edge.from),
                self.layout.positions.get(&edge.to),
            ) else {
                continue;
            };

            painter.line_segment(
                [
                    transform.to_minimap(from.center()),
                    transform.to_minimap(to.center()),
                ],
                Stroke::new(0.5, Color32::from_gray(70)),
            );
        }

        for node in self.graph.nodes() {
            let Some(node_box) = self.layout.positions.get(&node.id) else {
                continue;
            };
            let is_selected = self.selected.as_deref() == Some(node.id.as_str());

            painter.circle_filled(
                transform.to_minimap(node_box.center()),
                if is_selected { 3.5 } else { 2.0 },
                node_outline(node.kind),
            );
        }

        // The dashed rectangle is the main viewport mapped through the
        // inverse of its own transform.
        let (top_left, bottom_right) = self.viewport.visible_graph_corners(canvas.size());
        let view_rect = transform
            .viewport_rect(top_left, bottom_right)
            .intersect(minimap);
        if view_rect.is_positive() {
            let corners = [
                view_rect.left_top(),
                view_rect.right_top(),
                view_rect.right_bottom(),
                view_rect.left_bottom(),
                view_rect.left_top(),
            ];
            painter.extend(Shape::dashed_line(
                &corners,
                Stroke::new(1.0, Color32::from_gray(220)),
                4.0,
                3.0,
            ));
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(pointer) = pointer_pos
            && minimap.contains(pointer)
        {
            let target = transform.to_graph(pointer);
            self.viewport = self.viewport.center_on(target, canvas.size());
        }
    }
}
