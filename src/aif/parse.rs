use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RawSnapshot {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RawNode {
    pub id: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(
        default,
        rename = "schemeKey",
        skip_serializing_if = "Option::is_none"
    )]
    pub scheme_key: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RawEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub role: String,
}

pub fn parse_snapshot(raw: &str) -> Result<RawSnapshot> {
    serde_json::from_str(raw).context("invalid argument graph snapshot JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_snapshot() {
        let snapshot = parse_snapshot(
            r#"{
                "nodes": [
                    {"id": "I:c1", "kind": "I", "label": "Claim one"},
                    {"id": "RA:a1", "kind": "RA", "schemeKey": "expert_opinion"}
                ],
                "edges": [
                    {"id": "e1", "from": "I:c1", "to": "RA:a1", "role": "premise"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.nodes.len(), 2);
        assert_eq!(snapshot.edges.len(), 1);
        assert_eq!(
            snapshot.nodes[1].scheme_key.as_deref(),
            Some("expert_opinion")
        );
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let snapshot = parse_snapshot("{}").unwrap();
        assert!(snapshot.nodes.is_empty());
        assert!(snapshot.edges.is_empty());
    }

    #[test]
    fn rejects_non_json_input() {
        assert!(parse_snapshot("not json").is_err());
    }
}
