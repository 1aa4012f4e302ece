use eframe::egui::{Pos2, Rect, pos2, vec2};

use crate::layout::Bounds;
use crate::viewport::GraphPoint;

pub const MINIMAP_WIDTH: f32 = 200.0;
pub const MINIMAP_HEIGHT: f32 = 150.0;
pub const MINIMAP_PADDING: f32 = 8.0;

// Maps the whole graph into a fixed overview rect, preserving aspect ratio
// and centering the content. Minimap pixels are their own coordinate
// space; conversions go through this transform only.
#[derive(Clone, Copy, Debug)]
pub struct MinimapTransform {
    scale: f32,
    origin: Pos2,
    bounds_min: GraphPoint,
}

impl MinimapTransform {
    pub fn new(bounds: Bounds, rect: Rect, padding: f32) -> Self {
        let inner = (rect.width().min(rect.height()) - 2.0 * padding).max(1.0);
        let extent = bounds.width().max(bounds.height()).max(1.0);
        let scale = inner / extent;

        let content = vec2(bounds.width() * scale, bounds.height() * scale);
        let origin = rect.min + (rect.size() - content) * 0.5;

        Self {
            scale,
            origin,
            bounds_min: GraphPoint::new(bounds.min_x, bounds.min_y),
        }
    }

    pub fn to_minimap(&self, point: GraphPoint) -> Pos2 {
        pos2(
            self.origin.x + (point.x - self.bounds_min.x) * self.scale,
            self.origin.y + (point.y - self.bounds_min.y) * self.scale,
        )
    }

    pub fn to_graph(&self, point: Pos2) -> GraphPoint {
        GraphPoint::new(
            self.bounds_min.x + (point.x - self.origin.x) / self.scale,
            self.bounds_min.y + (point.y - self.origin.y) / self.scale,
        )
    }

    pub fn viewport_rect(&self, top_left: GraphPoint, bottom_right: GraphPoint) -> Rect {
        Rect::from_two_pos(self.to_minimap(top_left), self.to_minimap(bottom_right))
    }
}

pub fn minimap_rect(canvas: Rect, margin: f32) -> Rect {
    Rect::from_min_size(
        canvas.right_bottom() - vec2(MINIMAP_WIDTH + margin, MINIMAP_HEIGHT + margin),
        vec2(MINIMAP_WIDTH, MINIMAP_HEIGHT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_bounds() -> Bounds {
        Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 1000.0,
            max_y: 1000.0,
        }
    }

    #[test]
    fn a_center_click_navigates_to_the_graph_center() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(MINIMAP_WIDTH, MINIMAP_HEIGHT));
        let transform = MinimapTransform::new(square_bounds(), rect, MINIMAP_PADDING);

        let point = transform.to_graph(rect.center());
        assert!((point.x - 500.0).abs() < 1.0);
        assert!((point.y - 500.0).abs() < 1.0);
    }

    #[test]
    fn to_minimap_and_to_graph_are_inverse() {
        let rect = Rect::from_min_size(pos2(40.0, 60.0), vec2(MINIMAP_WIDTH, MINIMAP_HEIGHT));
        let transform = MinimapTransform::new(square_bounds(), rect, MINIMAP_PADDING);

        let original = GraphPoint::new(731.0, 88.0);
        let round_trip = transform.to_graph(transform.to_minimap(original));
        assert!((round_trip.x - original.x).abs() < 1e-2);
        assert!((round_trip.y - original.y).abs() < 1e-2);
    }

    #[test]
    fn the_whole_graph_fits_inside_the_rect() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(MINIMAP_WIDTH, MINIMAP_HEIGHT));
        let wide = Bounds {
            min_x: -2000.0,
            min_y: 0.0,
            max_x: 2000.0,
            max_y: 300.0,
        };
        let transform = MinimapTransform::new(wide, rect, MINIMAP_PADDING);

        for corner in [
            GraphPoint::new(wide.min_x, wide.min_y),
            GraphPoint::new(wide.max_x, wide.max_y),
        ] {
            let mapped = transform.to_minimap(corner);
            assert!(rect.expand(0.5).contains(mapped));
        }
    }

    #[test]
    fn aspect_ratio_is_preserved() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(MINIMAP_WIDTH, MINIMAP_HEIGHT));
        let transform = MinimapTransform::new(square_bounds(), rect, MINIMAP_PADDING);

        let a = transform.to_minimap(GraphPoint::new(0.0, 0.0));
        let b = transform.to_minimap(GraphPoint::new(100.0, 0.0));
        let c = transform.to_minimap(GraphPoint::new(0.0, 100.0));
        assert!(((b.x - a.x) - (c.y - a.y)).abs() < 1e-3);
    }
}
