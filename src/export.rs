use std::fmt::Write as _;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow, bail};

use crate::aif::{ArgGraph, EdgeRole, NodeKind};
use crate::layout::{Layout, NodeBox};

struct NodePalette {
    fill: &'static str,
    stroke: &'static str,
}

fn node_palette(kind: NodeKind) -> NodePalette {
    match kind {
        NodeKind::Information => NodePalette {
            fill: "#eff6ff",
            stroke: "#3b82f6",
        },
        NodeKind::Inference => NodePalette {
            fill: "#dcfce7",
            stroke: "#16a34a",
        },
        NodeKind::Conflict => NodePalette {
            fill: "#fee2e2",
            stroke: "#dc2626",
        },
        NodeKind::Preference => NodePalette {
            fill: "#f3e8ff",
            stroke: "#9333ea",
        },
    }
}

fn edge_palette(role: EdgeRole) -> (&'static str, &'static str) {
    if role.is_conflict() {
        ("#dc2626", "6 4")
    } else if role.is_preference() {
        ("#9333ea", "2 4")
    } else if role.is_support() {
        ("#64748b", "")
    } else {
        ("#94a3b8", "")
    }
}

fn esc(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

// Vector export of the laid-out scene. Detail is always rendered at full
// LOD regardless of the live viewport zoom.
pub fn scene_to_svg(graph: &ArgGraph, layout: &Layout, background: Option<&str>) -> String {
    let bounds = layout.bounds;
    let width = bounds.width().max(1.0);
    let height = bounds.height().max(1.0);

    let unix_seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="{:.1} {:.1} {width:.1} {height:.1}" font-family="sans-serif">"#,
        bounds.min_x, bounds.min_y,
    );
    let _ = writeln!(
        svg,
        "<!-- generator: argmap {} (unix {unix_seconds}) -->",
        env!("CARGO_PKG_VERSION")
    );

    if let Some(fill) = background {
        let _ = writeln!(
            svg,
            r#"  <rect x="{:.1}" y="{:.1}" width="{width:.1}" height="{height:.1}" fill="{}"/>"#,
            bounds.min_x,
            bounds.min_y,
            esc(fill),
        );
    }

    let _ = writeln!(svg, "  <defs>");
    for (name, color) in [
        ("support", "#64748b"),
        ("conflict", "#dc2626"),
        ("preference", "#9333ea"),
        ("other", "#94a3b8"),
    ] {
        let _ = writeln!(
            svg,
            r#"    <marker id="arrow-{name}" markerWidth="10" markerHeight="10" refX="9" refY="3" orient="auto"><polygon points="0 0, 10 3, 0 6" fill="{color}"/></marker>"#,
        );
    }
    let _ = writeln!(svg, "  </defs>");

    for edge in graph.edges() {
        let points = layout.routes.get(&edge.id).cloned().or_else(|| {
            let from = layout.positions.get(&edge.from)?;
            let to = layout.positions.get(&edge.to)?;
            Some(vec![from.center(), to.center()])
        });
        let Some(points) = points else {
            continue;
        };

        let (stroke, dash) = edge_palette(edge.role);
        let marker = if edge.role.is_conflict() {
            "conflict"
        } else if edge.role.is_preference() {
            "preference"
        } else if edge.role.is_support() {
            "support"
        } else {
            "other"
        };

        let mut path = String::new();
        for (index, point) in points.iter().enumerate() {
            let command = if index == 0 { 'M' } else { 'L' };
            let _ = write!(path, "{command} {:.1} {:.1} ", point.x, point.y);
        }

        let dash_attr = if dash.is_empty() {
            String::new()
        } else {
            format!(r#" stroke-dasharray="{dash}""#)
        };
        let _ = writeln!(
            svg,
            r#"  <path d="{}" fill="none" stroke="{stroke}" stroke-width="2"{dash_attr} marker-end="url(#arrow-{marker})"/>"#,
            path.trim_end(),
        );
    }

    for node in graph.nodes() {
        let Some(node_box) = layout.positions.get(&node.id) else {
            continue;
        };
        let palette = node_palette(node.kind);
        let corner = corner_radius(node, node_box);

        let _ = writeln!(
            svg,
            r#"  <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="{corner:.1}" fill="{}" stroke="{}" stroke-width="1.5"/>"#,
            node_box.min_x(),
            node_box.min_y(),
            node_box.width,
            node_box.height,
            palette.fill,
            palette.stroke,
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" dominant-baseline="middle" font-size="13" fill="#1e293b">{}</text>"#,
            node_box.x,
            node_box.y,
            esc(node.display_label()),
        );
        if let Some(scheme) = node.scheme_key.as_deref() {
            let _ = writeln!(
                svg,
                r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="10" fill="#64748b">{}</text>"#,
                node_box.x,
                node_box.max_y() - 6.0,
                esc(scheme),
            );
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn corner_radius(node: &crate::aif::ArgNode, node_box: &NodeBox) -> f32 {
    if node.kind.is_relation() {
        node_box.height * 0.5
    } else {
        6.0
    }
}

pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>> {
    let mut options = resvg::usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = resvg::usvg::Tree::from_str(svg, &options)
        .map_err(|err| anyhow!("failed to parse generated SVG for PNG export: {err}"))?;

    let size = tree.size().to_int_size();
    let scaled_width = ((size.width() as f32) * scale).ceil();
    let scaled_height = ((size.height() as f32) * scale).ceil();

    if !scaled_width.is_finite() || !scaled_height.is_finite() {
        bail!("scaled dimensions are not finite; try a smaller scale factor");
    }
    if scaled_width < 1.0 || scaled_height < 1.0 {
        bail!("scaled dimensions collapsed below 1px; try a larger scale factor");
    }
    if scaled_width > u32::MAX as f32 || scaled_height > u32::MAX as f32 {
        bail!("scaled dimensions exceed supported limits; try a smaller scale factor");
    }

    let scaled_width = scaled_width as u32;
    let scaled_height = scaled_height as u32;

    let mut pixmap = tiny_skia::Pixmap::new(scaled_width, scaled_height).ok_or_else(|| {
        anyhow!("failed to allocate {scaled_width}x{scaled_height} surface for PNG export")
    })?;

    let transform = tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|err| anyhow!("failed to encode PNG output: {err}"))
}

pub fn snapshot_to_json(graph: &ArgGraph) -> Result<String> {
    serde_json::to_string_pretty(&graph.to_snapshot()).context("failed to serialize snapshot")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aif::test_graphs;
    use crate::layout::{Preset, layout};

    fn scene() -> (ArgGraph, Layout) {
        let graph = test_graphs::attack_chain();
        let laid = layout(&graph, &Preset::Standard.options());
        (graph, laid)
    }

    #[test]
    fn svg_contains_every_node_and_edge() {
        let (graph, laid) = scene();
        let svg = scene_to_svg(&graph, &laid, None);

        assert!(svg.contains("Premise claim"));
        assert!(svg.contains("Attacked claim"));
        assert!(svg.contains("stroke-dasharray"));
        assert_eq!(svg.matches("<rect").count(), graph.node_count());
    }

    #[test]
    fn background_fill_is_optional() {
        let (graph, laid) = scene();

        let plain = scene_to_svg(&graph, &laid, None);
        let filled = scene_to_svg(&graph, &laid, Some("#ffffff"));

        assert!(!plain.contains(r##"fill="#ffffff""##));
        assert!(filled.contains(r##"fill="#ffffff""##));
    }

    #[test]
    fn svg_carries_a_generator_annotation() {
        let (graph, laid) = scene();
        let svg = scene_to_svg(&graph, &laid, None);

        assert!(svg.contains("generator: argmap"));
    }

    #[test]
    fn labels_are_xml_escaped() {
        use crate::aif::test_graphs::node;
        use crate::aif::{ArgGraph, RawSnapshot};

        let graph = ArgGraph::from_snapshot(RawSnapshot {
            nodes: vec![node("n", "I", "claims <are> \"tricky\" & fun")],
            edges: Vec::new(),
        });
        let laid = layout(&graph, &Preset::Standard.options());
        let svg = scene_to_svg(&graph, &laid, None);

        assert!(svg.contains("&lt;are&gt;"));
        assert!(svg.contains("&amp; fun"));
        assert!(!svg.contains("<are>"));
    }

    #[test]
    fn empty_scene_still_renders_a_document() {
        let graph = ArgGraph::default();
        let laid = Layout::empty();
        let svg = scene_to_svg(&graph, &laid, None);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn png_export_rejects_collapsed_dimensions() {
        let (graph, laid) = scene();
        let svg = scene_to_svg(&graph, &laid, None);

        assert!(svg_to_png(&svg, 0.0).is_err());
    }

    #[test]
    fn png_export_produces_image_data() {
        let (graph, laid) = scene();
        let svg = scene_to_svg(&graph, &laid, None);

        let png = svg_to_png(&svg, 0.5).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn json_dump_round_trips_through_the_parser() {
        let (graph, _) = scene();
        let json = snapshot_to_json(&graph).unwrap();
        let reparsed = crate::aif::parse_snapshot(&json).unwrap();

        assert_eq!(reparsed.nodes.len(), graph.node_count());
        assert_eq!(reparsed.edges.len(), graph.edge_count());
    }
}
