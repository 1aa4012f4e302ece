use crate::aif::ArgGraph;
use crate::util::find_ascii_ci;

const EXCERPT_CONTEXT_CHARS: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchField {
    Label,
    Text,
    Id,
    SchemeKey,
}

impl MatchField {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Text => "text",
            Self::Id => "id",
            Self::SchemeKey => "scheme",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub node_index: usize,
    pub field: MatchField,
    pub excerpt: Option<String>,
}

// Scan order is node-list order, and the first matching field wins, so a
// node is returned at most once.
pub fn search(graph: &ArgGraph, query: &str) -> Vec<SearchResult> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let mut results = Vec::new();

    for (node_index, node) in graph.nodes().iter().enumerate() {
        if let Some(offset) = find_ascii_ci(&node.label, query) {
            results.push(SearchResult {
                node_index,
                field: MatchField::Label,
                excerpt: Some(excerpt_around(&node.label, offset, query.len())),
            });
        } else if let Some((text, offset)) = node
            .text
            .as_deref()
            .and_then(|text| find_ascii_ci(text, query).map(|offset| (text, offset)))
        {
            results.push(SearchResult {
                node_index,
                field: MatchField::Text,
                excerpt: Some(excerpt_around(text, offset, query.len())),
            });
        } else if find_ascii_ci(&node.id, query).is_some() {
            results.push(SearchResult {
                node_index,
                field: MatchField::Id,
                excerpt: None,
            });
        } else if node
            .scheme_key
            .as_deref()
            .is_some_and(|key| find_ascii_ci(key, query).is_some())
        {
            results.push(SearchResult {
                node_index,
                field: MatchField::SchemeKey,
                excerpt: None,
            });
        }
    }

    results
}

fn excerpt_around(text: &str, match_start: usize, match_len: usize) -> String {
    let mut begin = match_start;
    let mut taken = 0;
    for (index, _) in text[..match_start].char_indices().rev() {
        begin = index;
        taken += 1;
        if taken == EXCERPT_CONTEXT_CHARS {
            break;
        }
    }

    let match_end = (match_start + match_len).min(text.len());
    let mut end = match_end;
    let mut taken = 0;
    for (index, ch) in text[match_end..].char_indices() {
        end = match_end + index + ch.len_utf8();
        taken += 1;
        if taken == EXCERPT_CONTEXT_CHARS {
            break;
        }
    }

    let mut excerpt = String::new();
    if begin > 0 {
        excerpt.push('…');
    }
    excerpt.push_str(&text[begin..end]);
    if end < text.len() {
        excerpt.push('…');
    }
    excerpt
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResultCursor {
    selected: usize,
}

impl ResultCursor {
    pub fn selected(self) -> usize {
        self.selected
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }

    // Must run after every results change so the cursor never points past
    // the end of the list.
    pub fn clamp_to(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn move_down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aif::{ArgGraph, RawNode, RawSnapshot};

    fn graph() -> ArgGraph {
        ArgGraph::from_snapshot(RawSnapshot {
            nodes: vec![
                RawNode {
                    id: "I:portal".into(),
                    kind: "I".into(),
                    label: Some("NASA Climate Portal".into()),
                    text: Some("The NASA Climate Portal aggregates satellite measurements of global surface temperature anomalies.".into()),
                    scheme_key: None,
                },
                RawNode {
                    id: "RA:expert".into(),
                    kind: "RA".into(),
                    label: Some("Appeal to measurement".into()),
                    text: None,
                    scheme_key: Some("expert_opinion".into()),
                },
                RawNode {
                    id: "I:nasa-budget".into(),
                    kind: "I".into(),
                    label: Some("Budget figures".into()),
                    text: None,
                    scheme_key: None,
                },
            ],
            edges: Vec::new(),
        })
    }

    #[test]
    fn empty_query_returns_nothing() {
        assert!(search(&graph(), "").is_empty());
        assert!(search(&graph(), "   ").is_empty());
    }

    #[test]
    fn label_matches_are_case_insensitive() {
        let results = search(&graph(), "nasa");

        let first = &results[0];
        assert_eq!(first.field, MatchField::Label);
        assert_eq!(
            graph().node_at(first.node_index).unwrap().id,
            "I:portal"
        );
    }

    #[test]
    fn a_node_is_returned_once_with_the_first_matching_field() {
        // "NASA" appears in both label and text of I:portal; the label wins
        // and the node shows up exactly once.
        let results = search(&graph(), "nasa");

        let portal_hits = results
            .iter()
            .filter(|result| result.node_index == 0)
            .collect::<Vec<_>>();
        assert_eq!(portal_hits.len(), 1);
        assert_eq!(portal_hits[0].field, MatchField::Label);

        // The id-only match still surfaces as an id hit.
        assert!(
            results
                .iter()
                .any(|result| result.node_index == 2 && result.field == MatchField::Id)
        );
    }

    #[test]
    fn scheme_key_is_the_last_resort_field() {
        let results = search(&graph(), "expert");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].field, MatchField::SchemeKey);
        assert_eq!(results[0].excerpt, None);
    }

    #[test]
    fn results_follow_node_list_order() {
        let results = search(&graph(), "a");
        let indices = results.iter().map(|r| r.node_index).collect::<Vec<_>>();

        let mut sorted = indices.clone();
        sorted.sort_unstable();
        assert_eq!(indices, sorted);
    }

    #[test]
    fn excerpts_trim_to_context_and_mark_truncation() {
        let results = search(&graph(), "satellite");
        let excerpt = results[0].excerpt.as_deref().unwrap();

        assert!(excerpt.contains("satellite"));
        assert!(excerpt.starts_with('…'));
        assert!(excerpt.ends_with('…'));
        // 20 chars context + match + 20 chars context, plus the ellipses.
        assert!(excerpt.chars().count() <= 9 + 2 * EXCERPT_CONTEXT_CHARS + 2);
    }

    #[test]
    fn short_fields_produce_untruncated_excerpts() {
        let results = search(&graph(), "Budget");
        let excerpt = results[0].excerpt.as_deref().unwrap();

        assert_eq!(excerpt, "Budget figures");
    }

    #[test]
    fn cursor_clamps_after_the_result_list_shrinks() {
        let mut cursor = ResultCursor::default();

        // Five results, ten "down" presses: pinned to the last entry.
        for _ in 0..10 {
            cursor.move_down(5);
        }
        assert_eq!(cursor.selected(), 4);

        // Query narrowed to two results: clamped to the new last index.
        cursor.clamp_to(2);
        assert_eq!(cursor.selected(), 1);

        cursor.clamp_to(0);
        assert_eq!(cursor.selected(), 0);
    }

    #[test]
    fn cursor_moves_stay_in_range() {
        let mut cursor = ResultCursor::default();
        cursor.move_up();
        assert_eq!(cursor.selected(), 0);

        cursor.move_down(3);
        cursor.move_down(3);
        cursor.move_down(3);
        assert_eq!(cursor.selected(), 2);
    }
}
