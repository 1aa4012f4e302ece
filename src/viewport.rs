use eframe::egui::{Pos2, Vec2, pos2, vec2};

pub const MIN_ZOOM: f32 = 0.2;
pub const MAX_ZOOM: f32 = 3.0;
pub const ZOOM_IN_STEP: f32 = 1.1;
pub const ZOOM_OUT_STEP: f32 = 0.9;

// Graph-space coordinates. Screen space is egui's Pos2; the two only meet
// through the transforms below.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GraphPoint {
    pub x: f32,
    pub y: f32,
}

impl GraphPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    pub zoom: f32,
    pub pan: Vec2,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl ViewportState {
    pub fn reset() -> Self {
        Self::default()
    }

    pub fn graph_to_screen(&self, point: GraphPoint) -> Pos2 {
        pos2(
            point.x * self.zoom + self.pan.x,
            point.y * self.zoom + self.pan.y,
        )
    }

    pub fn screen_to_graph(&self, point: Pos2) -> GraphPoint {
        GraphPoint::new(
            (point.x - self.pan.x) / self.zoom,
            (point.y - self.pan.y) / self.zoom,
        )
    }

    #[must_use]
    pub fn zoom_by(self, factor: f32, anchor: Option<Pos2>) -> Self {
        let zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        let Some(anchor) = anchor else {
            return Self { zoom, ..self };
        };

        // Keep the graph point under the anchor stationary across the zoom.
        let before = self.screen_to_graph(anchor);
        Self {
            zoom,
            pan: vec2(anchor.x - before.x * zoom, anchor.y - before.y * zoom),
        }
    }

    #[must_use]
    pub fn pan_by(self, delta: Vec2) -> Self {
        Self {
            pan: self.pan + delta,
            ..self
        }
    }

    #[must_use]
    pub fn center_on(self, point: GraphPoint, view: Vec2) -> Self {
        Self {
            zoom: self.zoom,
            pan: vec2(
                view.x * 0.5 - point.x * self.zoom,
                view.y * 0.5 - point.y * self.zoom,
            ),
        }
    }

    pub fn visible_graph_corners(&self, view: Vec2) -> (GraphPoint, GraphPoint) {
        (
            self.screen_to_graph(pos2(0.0, 0.0)),
            self.screen_to_graph(pos2(view.x, view.y)),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lod {
    Glyph,
    Compact,
    Full,
}

impl Lod {
    pub fn for_zoom(zoom: f32) -> Self {
        if zoom < 0.30 {
            Self::Glyph
        } else if zoom < 0.75 {
            Self::Compact
        } else {
            Self::Full
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_stays_clamped_over_any_gesture_sequence() {
        let mut state = ViewportState::default();
        for _ in 0..200 {
            state = state.zoom_by(ZOOM_IN_STEP, None);
            assert!(state.zoom <= MAX_ZOOM);
        }
        assert_eq!(state.zoom, MAX_ZOOM);

        for _ in 0..400 {
            state = state.zoom_by(ZOOM_OUT_STEP, Some(pos2(13.0, 7.0)));
            assert!(state.zoom >= MIN_ZOOM);
        }
        assert_eq!(state.zoom, MIN_ZOOM);
    }

    #[test]
    fn transforms_are_inverse() {
        let state = ViewportState {
            zoom: 1.7,
            pan: vec2(40.0, -12.0),
        };
        let original = GraphPoint::new(310.0, -95.5);
        let round_trip = state.screen_to_graph(state.graph_to_screen(original));

        assert!((round_trip.x - original.x).abs() < 1e-3);
        assert!((round_trip.y - original.y).abs() < 1e-3);
    }

    #[test]
    fn anchored_zoom_keeps_the_anchor_point_fixed() {
        let state = ViewportState {
            zoom: 1.0,
            pan: vec2(25.0, 25.0),
        };
        let anchor = pos2(200.0, 120.0);
        let before = state.screen_to_graph(anchor);

        let zoomed = state.zoom_by(1.1, Some(anchor));
        let after = zoomed.screen_to_graph(anchor);

        assert!((before.x - after.x).abs() < 1e-3);
        assert!((before.y - after.y).abs() < 1e-3);
    }

    #[test]
    fn center_on_maps_the_point_to_the_view_center() {
        let state = ViewportState {
            zoom: 2.0,
            pan: Vec2::ZERO,
        };
        let centered = state.center_on(GraphPoint::new(500.0, 500.0), vec2(800.0, 600.0));
        let screen = centered.graph_to_screen(GraphPoint::new(500.0, 500.0));

        assert!((screen.x - 400.0).abs() < 1e-3);
        assert!((screen.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn lod_thresholds() {
        assert_eq!(Lod::for_zoom(0.2), Lod::Glyph);
        assert_eq!(Lod::for_zoom(0.3), Lod::Compact);
        assert_eq!(Lod::for_zoom(0.74), Lod::Compact);
        assert_eq!(Lod::for_zoom(0.75), Lod::Full);
        assert_eq!(Lod::for_zoom(3.0), Lod::Full);
    }
}
