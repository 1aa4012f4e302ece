use eframe::egui::{self, Rect, Ui};

use crate::viewport::{ZOOM_IN_STEP, ZOOM_OUT_STEP};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        // Anchor in canvas-local screen space, so zooming keeps the graph
        // under the cursor in place.
        let anchor = (pointer - rect.min).to_pos2();

        let factor = if scroll > 0.0 {
            ZOOM_IN_STEP
        } else {
            ZOOM_OUT_STEP
        };
        self.viewport = self.viewport.zoom_by(factor, Some(anchor));
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.viewport = self.viewport.pan_by(response.drag_delta());
        }
    }

    pub(in crate::app) fn hovered_node(
        &self,
        ui: &Ui,
        rect: Rect,
        screen_boxes: &[(usize, Rect)],
    ) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !rect.contains(pointer) {
            return None;
        }

        screen_boxes
            .iter()
            .filter(|(_, screen_box)| screen_box.contains(pointer))
            .min_by(|a, b| a.1.area().total_cmp(&b.1.area()))
            .map(|(index, _)| *index)
    }
}
