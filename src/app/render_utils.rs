use eframe::egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, Vec2, pos2, vec2};

use crate::aif::{EdgeRole, NodeKind};

// Opacity factor applied to everything outside the active highlight chain.
pub(super) const HIGHLIGHT_DIM: f32 = 0.25;

pub(super) fn node_fill(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Information => Color32::from_rgb(39, 62, 105),
        NodeKind::Inference => Color32::from_rgb(34, 84, 56),
        NodeKind::Conflict => Color32::from_rgb(110, 44, 44),
        NodeKind::Preference => Color32::from_rgb(84, 52, 110),
    }
}

pub(super) fn node_outline(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Information => Color32::from_rgb(103, 159, 246),
        NodeKind::Inference => Color32::from_rgb(94, 201, 137),
        NodeKind::Conflict => Color32::from_rgb(239, 111, 111),
        NodeKind::Preference => Color32::from_rgb(192, 132, 245),
    }
}

pub(super) enum LinePattern {
    Solid,
    Dashed,
    Dotted,
}

pub(super) fn edge_style(role: EdgeRole) -> (Color32, LinePattern) {
    if role.is_conflict() {
        (Color32::from_rgb(224, 100, 100), LinePattern::Dashed)
    } else if role.is_preference() {
        (Color32::from_rgb(178, 129, 235), LinePattern::Dotted)
    } else if role.is_support() {
        (Color32::from_gray(130), LinePattern::Solid)
    } else {
        (Color32::from_gray(95), LinePattern::Solid)
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.min + pan;

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [pos2(x, rect.top()), pos2(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [pos2(rect.left(), y), pos2(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        y += step;
    }
}

pub(super) fn rect_visible(canvas: Rect, rect: Rect) -> bool {
    canvas.intersects(rect)
}

pub(super) fn polyline_visible(canvas: Rect, points: &[Pos2], padding: f32) -> bool {
    points.windows(2).any(|pair| {
        let min_x = pair[0].x.min(pair[1].x) - padding;
        let max_x = pair[0].x.max(pair[1].x) + padding;
        let min_y = pair[0].y.min(pair[1].y) - padding;
        let max_y = pair[0].y.max(pair[1].y) + padding;

        !(max_x < canvas.left()
            || min_x > canvas.right()
            || max_y < canvas.top()
            || min_y > canvas.bottom())
    })
}

pub(super) fn draw_polyline(
    painter: &Painter,
    points: &[Pos2],
    stroke: Stroke,
    pattern: &LinePattern,
) {
    match pattern {
        LinePattern::Solid => {
            for pair in points.windows(2) {
                painter.line_segment([pair[0], pair[1]], stroke);
            }
        }
        LinePattern::Dashed => {
            painter.extend(Shape::dashed_line(points, stroke, 8.0, 5.0));
        }
        LinePattern::Dotted => {
            painter.extend(Shape::dashed_line(points, stroke, 2.0, 5.0));
        }
    }
}

pub(super) fn draw_arrow_head(painter: &Painter, tip: Pos2, direction: Vec2, size: f32, color: Color32) {
    let direction = if direction.length_sq() > 0.0001 {
        direction.normalized()
    } else {
        vec2(0.0, 1.0)
    };
    let ortho = vec2(-direction.y, direction.x);

    painter.add(Shape::convex_polygon(
        vec![
            tip,
            tip - direction * size + ortho * (size * 0.5),
            tip - direction * size - ortho * (size * 0.5),
        ],
        color,
        Stroke::NONE,
    ));
}

// Walks from the box center toward `toward` and stops on the box border,
// so edge endpoints and arrow heads sit on the outline instead of the
// center.
pub(super) fn rect_border_toward(rect: Rect, toward: Pos2) -> Pos2 {
    let center = rect.center();
    let delta = toward - center;
    if delta.x.abs() < f32::EPSILON && delta.y.abs() < f32::EPSILON {
        return center;
    }

    let half = rect.size() * 0.5;
    let scale_x = if delta.x.abs() > f32::EPSILON {
        half.x / delta.x.abs()
    } else {
        f32::INFINITY
    };
    let scale_y = if delta.y.abs() > f32::EPSILON {
        half.y / delta.y.abs()
    } else {
        f32::INFINITY
    };

    center + delta * scale_x.min(scale_y).min(1.0)
}
