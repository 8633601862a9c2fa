use egui::{Pos2, Vec2};
use log::warn;

use crate::annotation::Point;

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 10.0;
pub const ZOOM_STEPS: &[f32] = &[
    0.1, 0.25, 0.33, 0.5, 0.67, 0.75, 1.0, 1.5, 2.0, 3.0, 4.0, 6.0, 8.0, 10.0,
];
/// Scales closer than this to a step count as sitting on it.
const STEP_TOLERANCE: f32 = 1e-3;

/// `screen = canvas * scale + offset`. `scale` always stays inside
/// `MIN_SCALE..=MAX_SCALE`, so the inverse is always defined.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportTransform {
    pub scale: f32,
    pub offset: Vec2,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl ViewportTransform {
    pub fn to_screen(&self, point: Point) -> Pos2 {
        Pos2::new(
            point.x * self.scale + self.offset.x,
            point.y * self.scale + self.offset.y,
        )
    }

    pub fn to_canvas(&self, pos: Pos2) -> Point {
        Point::new(
            (pos.x - self.offset.x) / self.scale,
            (pos.y - self.offset.y) / self.scale,
        )
    }

    pub fn length_to_screen(&self, length: f32) -> f32 {
        length * self.scale
    }
}

pub fn clamp_scale(scale: f32) -> f32 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

fn valid_factor(factor: f32) -> bool {
    factor.is_finite() && factor > 0.0
}

/// Persistent pan/zoom plus the transient deltas of the gesture in flight.
///
/// Transient values are composed into [`ViewportController::transform`] for
/// rendering and folded into the persistent transform once, when the gesture
/// ends. Coordinate translation for input always uses the persistent state.
#[derive(Clone, Debug, Default)]
pub struct ViewportController {
    persistent: ViewportTransform,
    pan_origin: Option<Pos2>,
    gesture_pan: Vec2,
    gesture_scale: Option<f32>,
}

impl ViewportController {
    pub fn persistent(&self) -> ViewportTransform {
        self.persistent
    }

    pub fn transform(&self) -> ViewportTransform {
        let scale = match self.gesture_scale {
            Some(factor) => clamp_scale(self.persistent.scale * factor),
            None => self.persistent.scale,
        };
        ViewportTransform {
            scale,
            offset: self.persistent.offset + self.gesture_pan,
        }
    }

    pub fn to_canvas(&self, pos: Pos2) -> Point {
        self.persistent.to_canvas(pos)
    }

    pub fn pan(&mut self, delta: Vec2) {
        if !delta.is_finite() {
            warn!("ignoring non-finite pan delta {delta:?}");
            return;
        }
        self.persistent.offset += delta;
    }

    pub fn zoom(&mut self, factor: f32) -> bool {
        if !valid_factor(factor) {
            warn!("ignoring invalid zoom factor {factor}");
            return false;
        }
        self.persistent.scale = clamp_scale(self.persistent.scale * factor);
        true
    }

    /// Zooms while keeping the canvas point under `anchor` fixed on screen.
    pub fn zoom_at(&mut self, factor: f32, anchor: Pos2) -> bool {
        if !valid_factor(factor) {
            warn!("ignoring invalid zoom factor {factor}");
            return false;
        }
        self.set_scale_at(self.persistent.scale * factor, anchor);
        true
    }

    fn set_scale_at(&mut self, scale: f32, anchor: Pos2) {
        let fixed = self.persistent.to_canvas(anchor);
        self.persistent.scale = clamp_scale(scale);
        self.persistent.offset = anchor.to_vec2() - fixed.to_pos2().to_vec2() * self.persistent.scale;
    }

    pub fn begin_pan(&mut self, at: Pos2) {
        self.pan_origin = Some(at);
        self.gesture_pan = Vec2::ZERO;
    }

    pub fn update_pan(&mut self, at: Pos2) {
        if let Some(origin) = self.pan_origin {
            self.gesture_pan = at - origin;
        }
    }

    pub fn end_pan(&mut self, at: Pos2) {
        self.update_pan(at);
        self.fold_pan();
    }

    /// `factor` is the cumulative magnification since the gesture began.
    pub fn magnify(&mut self, factor: f32) {
        if !valid_factor(factor) {
            warn!("ignoring invalid magnification {factor}");
            return;
        }
        self.gesture_scale = Some(factor);
    }

    pub fn end_magnify(&mut self) {
        if let Some(factor) = self.gesture_scale.take() {
            self.zoom(factor);
        }
    }

    pub fn is_magnifying(&self) -> bool {
        self.gesture_scale.is_some()
    }

    /// Folds whatever transient state is live, as if every gesture was released.
    pub fn finish_gestures(&mut self) {
        self.fold_pan();
        self.end_magnify();
    }

    /// Steps to the first zoom step strictly above the current scale, around `anchor`.
    pub fn zoom_in(&mut self, anchor: Pos2) {
        let scale = self.persistent.scale;
        if let Some(step) = ZOOM_STEPS
            .iter()
            .copied()
            .find(|step| *step > scale + STEP_TOLERANCE)
        {
            self.set_scale_at(step, anchor);
        }
    }

    pub fn zoom_out(&mut self, anchor: Pos2) {
        let scale = self.persistent.scale;
        if let Some(step) = ZOOM_STEPS
            .iter()
            .rev()
            .copied()
            .find(|step| *step < scale - STEP_TOLERANCE)
        {
            self.set_scale_at(step, anchor);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn fold_pan(&mut self) {
        if self.pan_origin.take().is_some() {
            self.persistent.offset += self.gesture_pan;
        }
        self.gesture_pan = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use egui::{pos2, vec2};

    use super::{ViewportController, ViewportTransform, MAX_SCALE, MIN_SCALE};
    use crate::annotation::Point;

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn forward_then_inverse_returns_original_point() {
        let mut viewport = ViewportController::default();
        let samples = [
            Point::new(0.0, 0.0),
            Point::new(-35.5, 12.25),
            Point::new(1024.0, -768.0),
        ];

        let ops: [(f32, (f32, f32)); 4] = [
            (2.0, (50.0, 50.0)),
            (0.3, (-12.0, 7.5)),
            (1.7, (0.0, -300.0)),
            (0.9, (3.25, 3.25)),
        ];
        for (factor, (dx, dy)) in ops {
            viewport.zoom(factor);
            viewport.pan(vec2(dx, dy));
            let transform = viewport.transform();
            for point in samples {
                assert_close(transform.to_canvas(transform.to_screen(point)), point);
            }
        }
    }

    #[test]
    fn inverse_matches_documented_formula() {
        let transform = ViewportTransform {
            scale: 2.0,
            offset: vec2(50.0, 50.0),
        };
        assert_eq!(transform.to_canvas(pos2(150.0, 150.0)), Point::new(50.0, 50.0));
        assert_eq!(transform.to_screen(Point::new(50.0, 50.0)), pos2(150.0, 150.0));
    }

    #[test]
    fn scale_is_clamped_and_bad_factors_are_ignored() {
        let mut viewport = ViewportController::default();
        viewport.zoom(1000.0);
        assert_eq!(viewport.persistent().scale, MAX_SCALE);
        viewport.zoom(1e-9);
        assert_eq!(viewport.persistent().scale, MIN_SCALE);

        assert!(!viewport.zoom(0.0));
        assert!(!viewport.zoom(-2.0));
        assert!(!viewport.zoom(f32::NAN));
        assert_eq!(viewport.persistent().scale, MIN_SCALE);
    }

    #[test]
    fn pan_gesture_is_transient_until_released() {
        let mut viewport = ViewportController::default();
        viewport.begin_pan(pos2(10.0, 10.0));
        viewport.update_pan(pos2(30.0, 15.0));

        assert_eq!(viewport.transform().offset, vec2(20.0, 5.0));
        assert_eq!(viewport.persistent().offset, vec2(0.0, 0.0));

        viewport.end_pan(pos2(40.0, 20.0));
        assert_eq!(viewport.persistent().offset, vec2(30.0, 10.0));
        assert_eq!(viewport.transform(), viewport.persistent());

        // A second release must not fold the delta again.
        viewport.end_pan(pos2(100.0, 100.0));
        assert_eq!(viewport.persistent().offset, vec2(30.0, 10.0));
    }

    #[test]
    fn magnify_folds_exactly_once() {
        let mut viewport = ViewportController::default();
        viewport.magnify(1.5);
        viewport.magnify(2.0);
        assert_eq!(viewport.transform().scale, 2.0);
        assert_eq!(viewport.persistent().scale, 1.0);

        viewport.end_magnify();
        viewport.end_magnify();
        assert_eq!(viewport.persistent().scale, 2.0);
        assert!(!viewport.is_magnifying());
    }

    #[test]
    fn zoom_at_keeps_anchor_fixed() {
        let mut viewport = ViewportController::default();
        viewport.pan(vec2(40.0, -20.0));
        let anchor = pos2(200.0, 120.0);
        let before = viewport.to_canvas(anchor);

        viewport.zoom_at(2.5, anchor);
        assert_close(viewport.to_canvas(anchor), before);
    }

    #[test]
    fn zoom_steps_walk_the_table() {
        let mut viewport = ViewportController::default();
        viewport.zoom_in(pos2(0.0, 0.0));
        assert_eq!(viewport.persistent().scale, 1.5);
        viewport.zoom_out(pos2(0.0, 0.0));
        viewport.zoom_out(pos2(0.0, 0.0));
        assert_eq!(viewport.persistent().scale, 0.75);
    }

    #[test]
    fn zoom_steps_from_scales_between_steps() {
        let origin = pos2(0.0, 0.0);
        let cases: [(f32, bool, f32); 5] = [
            (3.6, true, 4.0),
            (1.9, true, 2.0),
            (0.27, false, 0.25),
            (0.27, true, 0.33),
            (5.0, false, 4.0),
        ];
        for (start, zoom_in, expected) in cases {
            let mut viewport = ViewportController::default();
            viewport.zoom(start);
            if zoom_in {
                viewport.zoom_in(origin);
            } else {
                viewport.zoom_out(origin);
            }
            assert_eq!(viewport.persistent().scale, expected, "from {start}");
        }
    }

    #[test]
    fn zoom_steps_stop_at_the_scale_limits() {
        let mut viewport = ViewportController::default();
        viewport.zoom(MAX_SCALE);
        viewport.zoom_in(pos2(0.0, 0.0));
        assert_eq!(viewport.persistent().scale, MAX_SCALE);

        viewport.reset();
        viewport.zoom(1e-9);
        viewport.zoom_out(pos2(0.0, 0.0));
        assert_eq!(viewport.persistent().scale, MIN_SCALE);
    }

    #[test]
    fn zoom_steps_keep_anchor_fixed() {
        let mut viewport = ViewportController::default();
        viewport.pan(vec2(-30.0, 10.0));
        let anchor = pos2(400.0, 300.0);
        let before = viewport.to_canvas(anchor);

        viewport.zoom_in(anchor);
        assert_eq!(viewport.persistent().scale, 1.5);
        assert_close(viewport.to_canvas(anchor), before);

        viewport.zoom_out(anchor);
        viewport.zoom_out(anchor);
        assert_close(viewport.to_canvas(anchor), before);
    }
}
