use std::sync::Arc;
use std::sync::mpsc::{self, TryRecvError};
use std::thread;

use eframe::egui::Context;
use log::{debug, warn};

use super::{PendingExpansion, ViewModel};

impl ViewModel {
    pub(in crate::app) fn is_expanding(&self, node_id: &str) -> bool {
        self.pending_expansions
            .iter()
            .any(|pending| pending.node_id == node_id)
    }

    pub(in crate::app) fn can_expand(&self, node_id: &str) -> bool {
        self.config.expansion_enabled
            && self
                .graph
                .node(node_id)
                .is_some_and(|node| node.kind.is_relation())
            && !self.expanded.contains(node_id)
            && !self.is_expanding(node_id)
    }

    pub(in crate::app) fn request_expansion(&mut self, ctx: &Context, node_id: &str) {
        if !self.config.expansion_enabled || self.is_expanding(node_id) {
            return;
        }

        let depth = self.expansion_depth.get(node_id).copied().unwrap_or(0);
        if depth >= self.config.max_expansion_depth {
            self.notify(
                ctx,
                format!(
                    "Maximum expansion depth ({}) reached for this branch",
                    self.config.max_expansion_depth
                ),
            );
            return;
        }

        let provider = Arc::clone(&self.provider);
        let filters = self.config.filters;
        let id = node_id.to_owned();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = provider
                .neighborhood(&id, filters)
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        self.pending_expansions.push(PendingExpansion {
            node_id: node_id.to_owned(),
            rx,
        });
    }

    pub(in crate::app) fn poll_expansions(&mut self, ctx: &Context) {
        let mut completed = Vec::new();
        let mut still_pending = Vec::new();

        for pending in self.pending_expansions.drain(..) {
            match pending.rx.try_recv() {
                Ok(result) => completed.push((pending.node_id, Some(result))),
                Err(TryRecvError::Empty) => still_pending.push(pending),
                Err(TryRecvError::Disconnected) => completed.push((pending.node_id, None)),
            }
        }
        self.pending_expansions = still_pending;

        for (node_id, result) in completed {
            match result {
                Some(Ok(snapshot)) => {
                    // A response arriving after the user moved on still
                    // merges; the merge is idempotent so this is safe.
                    if self.selected.as_deref() != Some(node_id.as_str()) {
                        debug!("merging stale expansion response for {node_id}");
                    }

                    let source_depth = self.expansion_depth.get(&node_id).copied().unwrap_or(0);
                    let new_ids = snapshot
                        .nodes
                        .iter()
                        .filter(|node| !self.graph.contains_node(&node.id))
                        .map(|node| node.id.clone())
                        .collect::<Vec<_>>();

                    let outcome = self.graph.merge(snapshot);
                    for id in new_ids {
                        self.expansion_depth.insert(id, source_depth + 1);
                    }
                    self.expanded.insert(node_id.clone());

                    if outcome.changed_graph() {
                        self.graph_revision = self.graph_revision.wrapping_add(1);
                        self.layout_dirty = true;
                        self.recompute_paths();
                        self.notify(
                            ctx,
                            format!(
                                "Expanded {node_id}: +{} nodes, +{} edges",
                                outcome.nodes_added, outcome.edges_added
                            ),
                        );
                    } else {
                        self.notify(ctx, format!("{node_id} has nothing further to show"));
                    }
                }
                Some(Err(error)) => {
                    warn!("expansion of {node_id} failed: {error}");
                    self.notify(ctx, format!("Expanding {node_id} failed: {error}"));
                }
                None => {
                    self.notify(ctx, format!("Expansion worker for {node_id} disconnected"));
                }
            }
        }

        if !self.pending_expansions.is_empty() {
            ctx.request_repaint();
        }
    }
}
