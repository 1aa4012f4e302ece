use eframe::egui::{self, RichText, Ui};

use crate::util::abbreviate;

use super::super::ViewModel;

const PATH_ROW_HEIGHT: f32 = 22.0;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Click a node in the graph or pick a search result.");
            ui.add_space(8.0);
            ui.small("Statements show the argument chains arriving at them;");
            ui.small("relation nodes show where their relation leads.");
            return;
        };

        let Some(index) = self.graph.index_of(&selected_id) else {
            ui.label("The selected node is no longer part of the graph.");
            return;
        };

        let node = &self.graph.nodes()[index];
        let label = node.display_label().to_owned();
        let kind = node.kind;
        let scheme = node.scheme_key.clone();
        let text = node.text.clone();
        let incoming = self.graph.incoming_edges(index).len();
        let outgoing = self.graph.outgoing_edges(index).len();
        let summary = self.graph.neighborhood_summary(index);
        let depth = self.expansion_depth.get(&selected_id).copied().unwrap_or(0);

        ui.label(RichText::new(abbreviate(&label, 80)).strong());
        ui.small(selected_id.as_str());
        ui.add_space(6.0);

        ui.label(format!("Kind: {}", kind.describe()));
        if let Some(scheme) = scheme {
            ui.label(format!("Scheme: {scheme}"));
        }
        ui.label(format!("Edges: {incoming} in / {outgoing} out"));
        ui.label(format!(
            "Connections: {} supporting, {} conflicting, {} preference",
            summary.support, summary.conflict, summary.preference
        ));
        if self.config.expansion_enabled && kind.is_relation() {
            ui.label(format!(
                "Expansion depth: {depth} of {}",
                self.config.max_expansion_depth
            ));
            if self.is_expanding(&selected_id) {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("fetching neighborhood…");
                });
            }
        }

        if let Some(text) = text {
            ui.add_space(6.0);
            ui.label(RichText::new("Statement text").strong());
            ui.label(abbreviate(&text, 600));
        }

        ui.separator();

        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("Paths ({})", self.paths.len())).strong());
            if ui.button("Clear selection").clicked() {
                self.set_selected(None);
            }
        });

        if self.selected.is_none() {
            return;
        }

        if self.paths.is_empty() {
            ui.label("No argument chains reach this node within the depth bound.");
            return;
        }

        let mut activated = None;
        egui::ScrollArea::vertical()
            .id_salt("path_list_scroll")
            .max_height(300.0)
            .auto_shrink([false, false])
            .show_rows(ui, PATH_ROW_HEIGHT, self.paths.len(), |ui, row_range| {
                for index in row_range {
                    let Some(path) = self.paths.get(index) else {
                        continue;
                    };

                    let is_active = self.active_path == Some(index);
                    let row_label = format!(
                        "{}  ·  {} steps  ·  {} → {}",
                        path.kind.describe(),
                        path.edges.len(),
                        short_endpoint(path.nodes.first()),
                        short_endpoint(path.nodes.last()),
                    );

                    let hover = path
                        .nodes
                        .iter()
                        .map(String::as_str)
                        .collect::<Vec<_>>()
                        .join(" → ");

                    if ui
                        .selectable_label(is_active, row_label)
                        .on_hover_text(hover)
                        .clicked()
                    {
                        activated = Some(index);
                    }
                }
            });

        if let Some(index) = activated {
            self.set_active_path(Some(index));
        }
    }
}

fn short_endpoint(id: Option<&String>) -> String {
    id.map(|id| abbreviate(id, 14)).unwrap_or_default()
}
