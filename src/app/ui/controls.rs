use std::time::{SystemTime, UNIX_EPOCH};

use eframe::egui::{self, Key, RichText, Ui};

use crate::export;
use crate::layout::{Direction, Preset};
use crate::search;
use crate::util::abbreviate;

use super::super::ViewModel;

const SEARCH_ROW_HEIGHT: f32 = 22.0;
const SVG_BACKGROUND: &str = "#131720";

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("View Controls");
        ui.add_space(4.0);

        let mut layout_changed = false;

        ui.label(RichText::new("Layout direction").strong());
        ui.horizontal_wrapped(|ui| {
            layout_changed |= ui
                .selectable_value(&mut self.config.direction, None, "auto")
                .on_hover_text("Pick a direction from the graph shape.")
                .changed();
            for direction in [
                Direction::TopToBottom,
                Direction::BottomToTop,
                Direction::LeftToRight,
                Direction::RightToLeft,
            ] {
                layout_changed |= ui
                    .selectable_value(&mut self.config.direction, Some(direction), direction.label())
                    .changed();
            }
        });

        ui.add_space(4.0);
        ui.label(RichText::new("Spacing preset").strong());
        ui.horizontal_wrapped(|ui| {
            for preset in Preset::ALL {
                layout_changed |= ui
                    .selectable_value(&mut self.config.preset, preset, preset.label())
                    .changed();
            }
        });

        if layout_changed {
            self.layout_dirty = true;
        }

        ui.separator();

        ui.checkbox(&mut self.config.expansion_enabled, "Neighborhood expansion")
            .on_hover_text("Clicking a relation node fetches and merges its neighborhood.");
        ui.add_enabled_ui(self.config.expansion_enabled, |ui| {
            ui.add(
                egui::Slider::new(&mut self.config.max_expansion_depth, 1..=8)
                    .text("Max expansion depth"),
            )
            .on_hover_text("Expansion requests past this many hops are rejected.");
            ui.label("Include on expansion:");
            ui.horizontal(|ui| {
                ui.checkbox(&mut self.config.filters.supporting, "Supporting");
                ui.checkbox(&mut self.config.filters.opposing, "Conflicts");
                ui.checkbox(&mut self.config.filters.preferences, "Preferences");
            });
        });

        ui.separator();

        ui.checkbox(&mut self.config.show_minimap, "Show minimap");
        ui.checkbox(&mut self.config.show_legend, "Show legend");

        ui.separator();

        ui.label(RichText::new("Search").strong());
        let search_response = ui
            .text_edit_singleline(&mut self.search_query)
            .on_hover_text("Matches label, text, id and scheme key, in that order.");

        if search_response.changed() {
            self.refresh_search();
        }
        self.handle_search_keys(ui, &search_response);
        self.draw_search_results(ui);

        ui.separator();

        ui.label(RichText::new("Export").strong());
        ui.add(
            egui::Slider::new(&mut self.export_scale, 0.5..=4.0).text("PNG scale"),
        );
        ui.horizontal(|ui| {
            if ui.button("SVG").clicked() {
                self.export_svg(ui);
            }
            if ui.button("PNG").clicked() {
                self.export_png(ui);
            }
            if ui.button("JSON").clicked() {
                self.export_json(ui);
            }
        });

        ui.separator();
        ui.small("Scroll zooms at the pointer · right or middle drag pans");
        ui.small("Click a statement for incoming chains, a relation to expand");
    }

    pub(in crate::app) fn refresh_search(&mut self) {
        self.search_results = search::search(&self.graph, &self.search_query);
        self.search_revision = self.graph_revision;
        self.search_cursor.clamp_to(self.search_results.len());
    }

    fn handle_search_keys(&mut self, ui: &Ui, search_response: &egui::Response) {
        if self.search_query.trim().is_empty() {
            return;
        }

        let navigating = search_response.has_focus() || search_response.lost_focus();
        if !navigating {
            return;
        }

        let (down, up, enter, escape) = ui.input(|input| {
            (
                input.key_pressed(Key::ArrowDown),
                input.key_pressed(Key::ArrowUp),
                input.key_pressed(Key::Enter),
                input.key_pressed(Key::Escape),
            )
        });

        if down {
            self.search_cursor.move_down(self.search_results.len());
        }
        if up {
            self.search_cursor.move_up();
        }
        if enter {
            self.commit_search_result(self.search_cursor.selected());
        }
        if escape {
            self.search_query.clear();
            self.search_results.clear();
            self.search_cursor.reset();
        }
    }

    fn draw_search_results(&mut self, ui: &mut Ui) {
        if self.search_query.trim().is_empty() {
            return;
        }

        if self.search_results.is_empty() {
            ui.small("No matches.");
            return;
        }

        ui.small(format!("{} matches", self.search_results.len()));

        let mut committed = None;
        egui::ScrollArea::vertical()
            .id_salt("search_results_scroll")
            .max_height(220.0)
            .auto_shrink([false, false])
            .show_rows(
                ui,
                SEARCH_ROW_HEIGHT,
                self.search_results.len(),
                |ui, row_range| {
                    for index in row_range {
                        let Some(result) = self.search_results.get(index) else {
                            continue;
                        };
                        let Some(node) = self.graph.node_at(result.node_index) else {
                            continue;
                        };

                        let row_label = format!(
                            "{}  ({})",
                            abbreviate(node.display_label(), 28),
                            result.field.describe()
                        );
                        let is_cursor = index == self.search_cursor.selected();

                        let mut row = ui.selectable_label(is_cursor, row_label);
                        if let Some(excerpt) = result.excerpt.as_deref() {
                            row = row.on_hover_text(excerpt);
                        } else {
                            row = row.on_hover_text(node.id.as_str());
                        }

                        if row.clicked() {
                            committed = Some(index);
                        }
                    }
                },
            );

        if let Some(index) = committed {
            self.commit_search_result(index);
        }
    }

    fn commit_search_result(&mut self, index: usize) {
        let Some(result) = self.search_results.get(index) else {
            return;
        };
        let Some(node) = self.graph.node_at(result.node_index) else {
            return;
        };

        let id = node.id.clone();
        self.set_selected(Some(id.clone()));
        self.pending_center = Some(id);
    }

    fn export_file_stem() -> String {
        let unix_seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);
        format!("argmap-{unix_seconds}")
    }

    fn export_svg(&mut self, ui: &Ui) {
        if self.layout_dirty {
            self.relayout();
        }

        let svg = export::scene_to_svg(&self.graph, &self.layout, Some(SVG_BACKGROUND));
        let path = format!("{}.svg", Self::export_file_stem());
        match std::fs::write(&path, svg) {
            Ok(()) => self.notify(ui.ctx(), format!("Wrote {path}")),
            Err(error) => self.export_error = Some(format!("Could not write {path}: {error}")),
        }
    }

    fn export_png(&mut self, ui: &Ui) {
        if self.layout_dirty {
            self.relayout();
        }

        let svg = export::scene_to_svg(&self.graph, &self.layout, Some(SVG_BACKGROUND));
        let path = format!("{}.png", Self::export_file_stem());
        let result = export::svg_to_png(&svg, self.export_scale)
            .and_then(|png| std::fs::write(&path, png).map_err(Into::into));

        match result {
            Ok(()) => self.notify(ui.ctx(), format!("Wrote {path}")),
            Err(error) => self.export_error = Some(format!("Could not write {path}: {error:#}")),
        }
    }

    fn export_json(&mut self, ui: &Ui) {
        let path = format!("{}.json", Self::export_file_stem());
        let result = export::snapshot_to_json(&self.graph)
            .and_then(|json| std::fs::write(&path, json).map_err(Into::into));

        match result {
            Ok(()) => self.notify(ui.ctx(), format!("Wrote {path}")),
            Err(error) => self.export_error = Some(format!("Could not write {path}: {error:#}")),
        }
    }
}
