use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use eframe::egui::{self, Align, Align2, Context, Layout as EguiLayout, vec2};

use crate::aif::{ArgGraph, RawSnapshot, SnapshotProvider};
use crate::layout::Layout;
use crate::paths::{self, HighlightSet};
use crate::search::ResultCursor;
use crate::viewport::ViewportState;

use super::super::{Notice, ViewModel, ViewerConfig};

impl ViewModel {
    pub(in crate::app) fn new(
        snapshot: RawSnapshot,
        provider: Arc<dyn SnapshotProvider>,
        config: ViewerConfig,
    ) -> Self {
        let graph = ArgGraph::from_snapshot(snapshot);

        Self {
            graph,
            provider,
            config,
            layout: Layout::empty(),
            layout_dirty: true,
            graph_revision: 0,
            viewport: ViewportState::default(),
            selected: None,
            paths: Vec::new(),
            active_path: None,
            highlight: HighlightSet::default(),
            search_query: String::new(),
            search_results: Vec::new(),
            search_cursor: ResultCursor::default(),
            search_revision: 0,
            expanded: HashSet::new(),
            expansion_depth: HashMap::new(),
            pending_expansions: Vec::new(),
            notices: Vec::new(),
            export_error: None,
            export_scale: 2.0,
            pending_center: None,
            visible_node_count: 0,
            visible_edge_count: 0,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.poll_expansions(ctx);

        if !self.search_query.trim().is_empty() && self.search_revision != self.graph_revision {
            self.refresh_search();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("argmap");
                    ui.separator();
                    ui.label(format!("nodes: {}", self.graph.node_count()));
                    ui.label(format!("edges: {}", self.graph.edge_count()));
                    ui.label(format!("zoom: {:.0}%", self.viewport.zoom * 100.0));

                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload snapshot"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Reset view").clicked() {
                        self.viewport = ViewportState::reset();
                    }

                    ui.with_layout(EguiLayout::right_to_left(Align::Center), |ui| {
                        ui.label(format!(
                            "visible: {} nodes / {} edges",
                            self.visible_node_count, self.visible_edge_count
                        ));
                        if !self.pending_expansions.is_empty() {
                            ui.spinner();
                            ui.label(format!("expanding {}", self.pending_expansions.len()));
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(330.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading argument graph...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });

        self.draw_notices(ctx);
        self.draw_export_error(ctx);
    }

    // Selecting a statement asks "how do arguments arrive here"; selecting
    // a relation node asks "where does this relation lead".
    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        if self.selected == selected {
            return;
        }

        self.selected = selected;
        self.recompute_paths();
    }

    pub(in crate::app) fn recompute_paths(&mut self) {
        self.paths.clear();
        self.active_path = None;
        self.highlight.clear();

        let Some(selected) = self.selected.clone() else {
            return;
        };
        let Some(node) = self.graph.node(&selected) else {
            return;
        };

        self.paths = if node.kind.is_relation() {
            paths::find_paths_from_source(&self.graph, &selected, paths::DEFAULT_MAX_DEPTH)
        } else {
            paths::find_paths_to_terminal(&self.graph, &selected, paths::DEFAULT_MAX_DEPTH)
        };

        if !self.paths.is_empty() {
            self.set_active_path(Some(0));
        }
    }

    pub(in crate::app) fn set_active_path(&mut self, index: Option<usize>) {
        self.active_path = index.filter(|&index| index < self.paths.len());
        self.highlight = match self.active_path {
            Some(index) => HighlightSet::from_path(&self.paths[index]),
            None => HighlightSet::default(),
        };
    }

    pub(in crate::app) fn notify(&mut self, ctx: &Context, message: impl Into<String>) {
        let expires_at = ctx.input(|input| input.time) + 4.0;
        self.notices.push(Notice {
            message: message.into(),
            expires_at,
        });
        ctx.request_repaint();
    }

    fn draw_notices(&mut self, ctx: &Context) {
        let now = ctx.input(|input| input.time);
        self.notices.retain(|notice| notice.expires_at > now);
        if self.notices.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("notices"))
            .anchor(Align2::RIGHT_TOP, vec2(-12.0, 48.0))
            .show(ctx, |ui| {
                for notice in &self.notices {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(notice.message.as_str());
                    });
                    ui.add_space(4.0);
                }
            });
        ctx.request_repaint();
    }

    fn draw_export_error(&mut self, ctx: &Context) {
        let Some(error) = self.export_error.clone() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new("Export failed")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(error.as_str());
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.export_error = None;
        }
    }
}
