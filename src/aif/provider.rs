use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};

use super::parse::{RawSnapshot, parse_snapshot};
use super::EdgeRole;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpansionFilters {
    pub supporting: bool,
    pub opposing: bool,
    pub preferences: bool,
}

impl Default for ExpansionFilters {
    fn default() -> Self {
        Self {
            supporting: true,
            opposing: true,
            preferences: true,
        }
    }
}

impl ExpansionFilters {
    pub fn allows(self, role: EdgeRole) -> bool {
        if role.is_support() {
            self.supporting
        } else if role.is_conflict() {
            self.opposing
        } else if role.is_preference() {
            self.preferences
        } else {
            true
        }
    }
}

pub trait SnapshotProvider: Send + Sync {
    fn initial(&self) -> Result<RawSnapshot>;
    fn neighborhood(&self, node_id: &str, filters: ExpansionFilters) -> Result<RawSnapshot>;
}

// Serves both the initial slice and neighborhood expansions from a single
// snapshot document on disk, standing in for the remote graph service.
pub struct FileProvider {
    path: PathBuf,
    root: Option<String>,
    document: Mutex<Option<Arc<RawSnapshot>>>,
}

impl FileProvider {
    pub fn new(path: PathBuf, root: Option<String>) -> Self {
        Self {
            path,
            root,
            document: Mutex::new(None),
        }
    }

    fn document(&self) -> Result<Arc<RawSnapshot>> {
        let mut slot = self
            .document
            .lock()
            .map_err(|_| anyhow!("snapshot cache lock poisoned"))?;

        if let Some(document) = slot.as_ref() {
            return Ok(Arc::clone(document));
        }

        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read snapshot {}", self.path.display()))?;
        let document = Arc::new(
            parse_snapshot(&raw)
                .with_context(|| format!("failed to parse snapshot {}", self.path.display()))?,
        );
        *slot = Some(Arc::clone(&document));
        Ok(document)
    }

    fn slice_around(
        document: &RawSnapshot,
        center: &str,
        filters: ExpansionFilters,
    ) -> RawSnapshot {
        let mut slice = RawSnapshot::default();

        let mut include_node = |id: &str, slice: &mut RawSnapshot| {
            if slice.nodes.iter().any(|node| node.id == id) {
                return;
            }
            if let Some(node) = document.nodes.iter().find(|node| node.id == id) {
                slice.nodes.push(node.clone());
            }
        };

        include_node(center, &mut slice);

        for edge in &document.edges {
            if edge.from != center && edge.to != center {
                continue;
            }
            if !filters.allows(EdgeRole::from_wire(&edge.role)) {
                continue;
            }

            include_node(&edge.from, &mut slice);
            include_node(&edge.to, &mut slice);
            slice.edges.push(edge.clone());
        }

        slice
    }
}

impl SnapshotProvider for FileProvider {
    fn initial(&self) -> Result<RawSnapshot> {
        let document = self.document()?;

        let Some(root) = self.root.as_deref() else {
            return Ok((*document).clone());
        };

        if !document.nodes.iter().any(|node| node.id == root) {
            return Err(anyhow!(
                "root node {root} not present in {}",
                self.path.display()
            ));
        }

        Ok(Self::slice_around(
            &document,
            root,
            ExpansionFilters::default(),
        ))
    }

    fn neighborhood(&self, node_id: &str, filters: ExpansionFilters) -> Result<RawSnapshot> {
        let document = self.document()?;

        if !document.nodes.iter().any(|node| node.id == node_id) {
            return Err(anyhow!("unknown node {node_id}"));
        }

        Ok(Self::slice_around(&document, node_id, filters))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_graphs::{edge, node};
    use super::*;

    fn document() -> RawSnapshot {
        RawSnapshot {
            nodes: vec![
                node("I1", "I", "Premise"),
                node("RA1", "RA", "Argument"),
                node("I2", "I", "Conclusion"),
                node("CA1", "CA", "Conflict"),
            ],
            edges: vec![
                edge("e1", "I1", "RA1", "premise"),
                edge("e2", "RA1", "I2", "conclusion"),
                edge("e3", "I2", "CA1", "conflictingElement"),
            ],
        }
    }

    #[test]
    fn slice_contains_center_neighbors_and_incident_edges() {
        let slice = FileProvider::slice_around(&document(), "RA1", ExpansionFilters::default());

        let mut ids = slice.nodes.iter().map(|n| n.id.as_str()).collect::<Vec<_>>();
        ids.sort_unstable();
        assert_eq!(ids, vec!["I1", "I2", "RA1"]);
        assert_eq!(slice.edges.len(), 2);
    }

    #[test]
    fn filters_prune_whole_categories() {
        let filters = ExpansionFilters {
            supporting: true,
            opposing: false,
            preferences: true,
        };
        let slice = FileProvider::slice_around(&document(), "I2", filters);

        assert!(slice.edges.iter().all(|e| e.role != "conflictingElement"));
        assert!(!slice.nodes.iter().any(|n| n.id == "CA1"));
    }

    #[test]
    fn file_provider_serves_initial_and_neighborhood_slices() {
        let provider = FileProvider::new(
            "testdata/climate.json".into(),
            Some("RA:measurement".to_owned()),
        );

        let initial = provider.initial().unwrap();
        let mut ids = initial
            .nodes
            .iter()
            .map(|node| node.id.as_str())
            .collect::<Vec<_>>();
        ids.sort_unstable();
        assert_eq!(ids, vec!["I:nasa", "I:warming", "RA:measurement"]);

        let neighborhood = provider
            .neighborhood("CA:bias", ExpansionFilters::default())
            .unwrap();
        assert!(neighborhood.nodes.iter().any(|node| node.id == "I:sensors"));

        assert!(
            provider
                .neighborhood("I:not-there", ExpansionFilters::default())
                .is_err()
        );
    }

    #[test]
    fn missing_root_is_an_error() {
        let provider =
            FileProvider::new("testdata/climate.json".into(), Some("I:missing".to_owned()));
        assert!(provider.initial().is_err());
    }

    #[test]
    fn unknown_role_edges_survive_every_filter() {
        let mut doc = document();
        doc.edges.push(edge("e9", "I1", "I2", "annotates"));
        let filters = ExpansionFilters {
            supporting: false,
            opposing: false,
            preferences: false,
        };

        let slice = FileProvider::slice_around(&doc, "I1", filters);
        assert_eq!(slice.edges.len(), 1);
        assert_eq!(slice.edges[0].id, "e9");
    }
}
