use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::aif::{ArgGraph, ExpansionFilters, RawSnapshot, SnapshotProvider};
use crate::layout::{Direction, Layout, Preset};
use crate::paths::{ArgumentPath, HighlightSet};
use crate::search::{ResultCursor, SearchResult};
use crate::viewport::ViewportState;

mod expand;
mod graph;
mod render_utils;
mod ui;

#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub direction: Option<Direction>,
    pub preset: Preset,
    pub expansion_enabled: bool,
    pub max_expansion_depth: u32,
    pub filters: ExpansionFilters,
    pub show_minimap: bool,
    pub show_legend: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            direction: None,
            preset: Preset::Standard,
            expansion_enabled: true,
            max_expansion_depth: 3,
            filters: ExpansionFilters::default(),
            show_minimap: true,
            show_legend: true,
        }
    }
}

type SnapshotResult = Result<RawSnapshot, String>;

pub struct ArgMapApp {
    provider: Arc<dyn SnapshotProvider>,
    config: ViewerConfig,
    state: AppState,
    reload_rx: Option<Receiver<SnapshotResult>>,
}

enum AppState {
    Loading { rx: Receiver<SnapshotResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct PendingExpansion {
    node_id: String,
    rx: Receiver<SnapshotResult>,
}

struct Notice {
    message: String,
    expires_at: f64,
}

struct ViewModel {
    graph: ArgGraph,
    provider: Arc<dyn SnapshotProvider>,
    config: ViewerConfig,
    layout: Layout,
    layout_dirty: bool,
    graph_revision: u64,
    viewport: ViewportState,
    selected: Option<String>,
    paths: Vec<ArgumentPath>,
    active_path: Option<usize>,
    highlight: HighlightSet,
    search_query: String,
    search_results: Vec<SearchResult>,
    search_cursor: ResultCursor,
    search_revision: u64,
    expanded: HashSet<String>,
    expansion_depth: HashMap<String, u32>,
    pending_expansions: Vec<PendingExpansion>,
    notices: Vec<Notice>,
    export_error: Option<String>,
    export_scale: f32,
    pending_center: Option<String>,
    visible_node_count: usize,
    visible_edge_count: usize,
}

impl ArgMapApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        provider: Arc<dyn SnapshotProvider>,
        config: ViewerConfig,
    ) -> Self {
        let state = Self::start_load(Arc::clone(&provider));
        Self {
            provider,
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(provider: Arc<dyn SnapshotProvider>) -> Receiver<SnapshotResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = provider.initial().map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(provider: Arc<dyn SnapshotProvider>) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(provider),
        }
    }
}

impl eframe::App for ArgMapApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(snapshot) => AppState::Ready(Box::new(ViewModel::new(
                            snapshot,
                            Arc::clone(&self.provider),
                            self.config.clone(),
                        ))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading argument graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load argument graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(Arc::clone(&self.provider)));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(Arc::clone(&self.provider)));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(snapshot)) => {
                            transition = Some(AppState::Ready(Box::new(ViewModel::new(
                                snapshot,
                                Arc::clone(&self.provider),
                                self.config.clone(),
                            ))));
                        }
                        Ok(Err(error)) => {
                            transition = Some(AppState::Error(error));
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
