//! Pointer and touch gesture tracking.
//!
//! Mouse and touch share one tracker: a press starts a gesture, motion while
//! pressed spins the cube, and a short release without motion counts as a tap.
//! Two or more touches switch the gesture to pinch-zoom.

use std::time::Duration;

use bevy::prelude::*;

/// Screen-space drag (pixels) is scaled by this on top of the rotation speed.
const DRAG_SCALE: f32 = 0.1;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TouchAction {
    None,
    Rotate(Vec2),
    Zoom(f32),
}

#[derive(Resource, Default, Debug)]
pub struct GestureTracker {
    previous: Vec2,
    origin: Vec2,
    pressed: bool,
    moved: bool,
    pressed_at: Duration,
    previous_pinch: Option<f32>,
}

impl GestureTracker {
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn press(&mut self, pos: Vec2, now: Duration) {
        self.pressed = true;
        self.moved = false;
        self.previous = pos;
        self.origin = pos;
        self.pressed_at = now;
        self.previous_pinch = None;
    }

    /// Screen delta since the last sample, or `None` when not pressed.
    pub fn drag(&mut self, pos: Vec2, slop: f32) -> Option<Vec2> {
        if !self.pressed {
            return None;
        }
        if pos.distance(self.origin) > slop {
            self.moved = true;
        }
        let delta = pos - self.previous;
        self.previous = pos;
        Some(delta)
    }

    pub fn touch_move(&mut self, touches: &[Vec2], slop: f32, pinch_rate: f32) -> TouchAction {
        if !self.pressed {
            return TouchAction::None;
        }
        match touches {
            [] => TouchAction::None,
            [a, b, ..] => {
                self.moved = true;
                let distance = a.distance(*b);
                let action = match self.previous_pinch {
                    Some(prev) => TouchAction::Zoom(-(distance - prev) * pinch_rate),
                    None => TouchAction::None,
                };
                self.previous_pinch = Some(distance);
                action
            }
            [single] => {
                self.previous_pinch = None;
                match self.drag(*single, slop) {
                    Some(delta) => TouchAction::Rotate(delta),
                    None => TouchAction::None,
                }
            }
        }
    }

    /// Ends the gesture; true when it was a tap or click.
    pub fn release(&mut self, now: Duration, max_tap: Duration) -> bool {
        if !self.pressed {
            return false;
        }
        self.pressed = false;
        self.previous_pinch = None;
        !self.moved && now.saturating_sub(self.pressed_at) < max_tap
    }
}

/// Angular velocity added for a screen drag: horizontal spins about y, vertical about x.
pub fn spin_delta(screen_delta: Vec2, rotation_speed: f32) -> Vec3 {
    Vec3::new(screen_delta.y, screen_delta.x, 0.0) * rotation_speed * DRAG_SCALE
}

/// Camera distance change for a wheel delta in pixels, positive scrolling away.
pub fn wheel_zoom(delta_y_px: f32, rate: f32) -> f32 {
    delta_y_px * rate
}

pub fn apply_zoom(z: f32, dz: f32, range: Vec2) -> f32 {
    (z + dz).clamp(range.x.min(range.y), range.x.max(range.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAP: Duration = Duration::from_millis(200);
    const SLOP: f32 = 4.0;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn drag_reports_deltas_between_samples() {
        let mut g = GestureTracker::default();
        assert_eq!(g.drag(Vec2::new(5.0, 5.0), SLOP), None);

        g.press(Vec2::new(100.0, 100.0), ms(0));
        assert_eq!(g.drag(Vec2::new(110.0, 95.0), SLOP), Some(Vec2::new(10.0, -5.0)));
        assert_eq!(g.drag(Vec2::new(112.0, 95.0), SLOP), Some(Vec2::new(2.0, 0.0)));
        assert!(!g.release(ms(50), TAP), "a drag is not a tap");
        assert!(!g.is_pressed());
    }

    #[test]
    fn quick_still_release_is_a_tap() {
        let mut g = GestureTracker::default();
        g.press(Vec2::new(10.0, 10.0), ms(1_000));
        // jitter inside the slop radius
        g.drag(Vec2::new(11.0, 12.0), SLOP);
        assert!(g.release(ms(1_150), TAP));
    }

    #[test]
    fn slow_release_is_not_a_tap() {
        let mut g = GestureTracker::default();
        g.press(Vec2::ZERO, ms(0));
        assert!(!g.release(ms(200), TAP));
        assert!(!g.release(ms(201), TAP), "release without press");
    }

    #[test]
    fn pinch_zooms_from_the_second_sample() {
        let mut g = GestureTracker::default();
        g.press(Vec2::ZERO, ms(0));
        let first = [Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)];
        let wider = [Vec2::new(0.0, 0.0), Vec2::new(120.0, 0.0)];
        assert_eq!(g.touch_move(&first, SLOP, 0.1), TouchAction::None);
        match g.touch_move(&wider, SLOP, 0.1) {
            TouchAction::Zoom(dz) => assert!((dz + 2.0).abs() < 1e-5),
            other => panic!("expected zoom, got {other:?}"),
        }
        assert!(!g.release(ms(10), TAP), "a pinch is not a tap");
    }

    #[test]
    fn pinch_baseline_does_not_survive_the_gesture() {
        let mut g = GestureTracker::default();
        g.press(Vec2::ZERO, ms(0));
        g.touch_move(&[Vec2::ZERO, Vec2::new(50.0, 0.0)], SLOP, 0.1);
        g.release(ms(500), TAP);

        g.press(Vec2::ZERO, ms(1_000));
        let action = g.touch_move(&[Vec2::ZERO, Vec2::new(300.0, 0.0)], SLOP, 0.1);
        assert_eq!(action, TouchAction::None);
    }

    #[test]
    fn single_touch_rotates() {
        let mut g = GestureTracker::default();
        g.press(Vec2::new(50.0, 50.0), ms(0));
        assert_eq!(
            g.touch_move(&[Vec2::new(60.0, 40.0)], SLOP, 0.1),
            TouchAction::Rotate(Vec2::new(10.0, -10.0))
        );
    }

    #[test]
    fn drag_maps_to_cube_axes() {
        let spin = spin_delta(Vec2::new(10.0, -20.0), 0.1);
        assert!((spin.x + 0.2).abs() < 1e-6);
        assert!((spin.y - 0.1).abs() < 1e-6);
        assert_eq!(spin.z, 0.0);
    }

    #[test]
    fn zoom_follows_wheel_sign_and_range() {
        assert!((wheel_zoom(100.0, 0.01) - 1.0).abs() < 1e-6);
        assert!((wheel_zoom(-100.0, 0.01) + 1.0).abs() < 1e-6);
        let range = Vec2::new(6.0, 100.0);
        assert_eq!(apply_zoom(20.0, 1.0, range), 21.0);
        assert_eq!(apply_zoom(7.0, -5.0, range), 6.0);
        assert_eq!(apply_zoom(99.0, 5.0, range), 100.0);
    }
}
