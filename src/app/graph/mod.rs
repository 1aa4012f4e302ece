mod interaction;
mod view;

use crate::layout::{self, LayoutOptions, Preset};

use super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn layout_options(&self) -> LayoutOptions {
        let mut options = self.config.preset.options();

        if let Some(direction) = self.config.direction {
            options.direction = direction;
        } else if self.config.preset != Preset::Horizontal {
            options.direction = layout::auto_direction(&self.graph);
        }

        options
    }

    pub(in crate::app) fn relayout(&mut self) {
        let options = self.layout_options();
        self.layout = layout::layout(&self.graph, &options);
        self.layout_dirty = false;

        log::debug!(
            "layout: {} nodes, {} routes, direction {}",
            self.layout.positions.len(),
            self.layout.routes.len(),
            options.direction.label()
        );
    }
}
