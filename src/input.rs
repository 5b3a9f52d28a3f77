use std::time::Duration;

use bevy::input::mouse::{MouseButtonInput, MouseScrollUnit, MouseWheel};
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::window::CursorMoved;
use bevy_egui::EguiContexts;

use crate::gesture::{self, GestureTracker, TouchAction};
use crate::physics::{PhysicsSet, PhysicsWorld};
use crate::scene::{RecolorCube, ResetBalls};
use crate::settings::ToySettings;
use crate::MainCamera;

/// Browsers report roughly this many pixels per wheel line.
const PIXELS_PER_LINE: f32 = 100.0;

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GestureTracker>()
            .init_resource::<MouseDrag>()
            .add_systems(
            Update,
            (
                mouse_gestures,
                touch_gestures,
                wheel_zoom,
                recolor_key,
                reset_key,
                pause_toggle,
                help_toggle,
            )
                .before(PhysicsSet),
        );
    }
}

fn add_spin(world: &mut PhysicsWorld, delta: Vec2, settings: &ToySettings) {
    let spin = gesture::spin_delta(delta, settings.rotation_speed);
    let result = world
        .cube_angvel()
        .and_then(|angvel| world.set_cube_angvel(angvel + spin));
    if let Err(err) = result {
        warn!("drag ignored: {err}");
    }
}

fn zoom_camera(camera: &mut Transform, dz: f32, settings: &ToySettings) {
    camera.translation.z = gesture::apply_zoom(camera.translation.z, dz, settings.zoom_range);
}

/// Mouse button that owns the current gesture and the last known cursor.
#[derive(Resource, Default, Debug)]
struct MouseDrag {
    button: Option<MouseButton>,
    cursor: Option<Vec2>,
}

#[derive(Default, Debug, PartialEq)]
struct MouseFrame {
    spin: Vec2,
    clicked: bool,
}

/// Feeds one frame of mouse events into the tracker.
///
/// Button and cursor events arrive in separate queues, so presses are taken
/// at the cursor position from before this frame's motion and the release is
/// applied after it. Only the button that started the gesture ends it.
#[allow(clippy::too_many_arguments)]
fn replay_mouse(
    gestures: &mut GestureTracker,
    drag: &mut MouseDrag,
    buttons: &[(MouseButton, ButtonState)],
    moves: &[Vec2],
    fallback_cursor: Option<Vec2>,
    now: Duration,
    over_ui: bool,
    settings: &ToySettings,
) -> MouseFrame {
    let mut frame = MouseFrame::default();
    let mut released = false;

    for &(button, state) in buttons {
        match state {
            ButtonState::Pressed => {
                if over_ui || drag.button.is_some() {
                    continue;
                }
                let Some(pos) = drag.cursor.or(fallback_cursor) else {
                    continue;
                };
                drag.button = Some(button);
                gestures.press(pos, now);
            }
            ButtonState::Released => {
                if drag.button == Some(button) {
                    released = true;
                }
            }
        }
    }

    for &pos in moves {
        drag.cursor = Some(pos);
        if let Some(delta) = gestures.drag(pos, settings.tap_slop) {
            frame.spin += delta;
        }
    }

    if released {
        drag.button = None;
        frame.clicked = gestures.release(now, settings.tap_max_duration);
    }
    frame
}

#[allow(clippy::too_many_arguments)]
fn mouse_gestures(
    mut buttons: EventReader<MouseButtonInput>,
    mut cursor: EventReader<CursorMoved>,
    windows: Query<&Window>,
    mut gestures: ResMut<GestureTracker>,
    mut drag: ResMut<MouseDrag>,
    mut world: ResMut<PhysicsWorld>,
    mut recolor: EventWriter<RecolorCube>,
    mut egui: EguiContexts,
    settings: Res<ToySettings>,
    time: Res<Time<Real>>,
) {
    let presses: Vec<_> = buttons.read().map(|ev| (ev.button, ev.state)).collect();
    let moves: Vec<Vec2> = cursor.read().map(|ev| ev.position).collect();
    if presses.is_empty() && moves.is_empty() {
        return;
    }
    let over_ui = egui.ctx_mut().is_pointer_over_area();
    let fallback = windows.iter().find_map(|w| w.cursor_position());

    let frame = replay_mouse(
        &mut gestures,
        &mut drag,
        &presses,
        &moves,
        fallback,
        time.elapsed(),
        over_ui,
        &settings,
    );
    if frame.spin != Vec2::ZERO {
        add_spin(&mut world, frame.spin, &settings);
    }
    if frame.clicked {
        recolor.send(RecolorCube);
    }
}

/// Applies one touch phase change; true when it completed a tap.
fn touch_phase(
    gestures: &mut GestureTracker,
    phase: TouchPhase,
    pos: Vec2,
    now: Duration,
    over_ui: bool,
    max_tap: Duration,
) -> bool {
    match phase {
        TouchPhase::Started => {
            if !over_ui {
                gestures.press(pos, now);
            }
            false
        }
        TouchPhase::Moved => false,
        TouchPhase::Ended => gestures.release(now, max_tap),
        TouchPhase::Canceled => {
            gestures.release(now, max_tap);
            false
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn touch_gestures(
    mut touch_evr: EventReader<TouchInput>,
    touches: Res<Touches>,
    mut gestures: ResMut<GestureTracker>,
    mut world: ResMut<PhysicsWorld>,
    mut q_cam: Query<&mut Transform, With<MainCamera>>,
    mut recolor: EventWriter<RecolorCube>,
    mut egui: EguiContexts,
    settings: Res<ToySettings>,
    time: Res<Time<Real>>,
) {
    let now = time.elapsed();
    let mut moved = false;
    let over_ui = egui.ctx_mut().is_pointer_over_area();

    for ev in touch_evr.read() {
        moved |= ev.phase == TouchPhase::Moved;
        if touch_phase(
            &mut gestures,
            ev.phase,
            ev.position,
            now,
            over_ui,
            settings.tap_max_duration,
        ) {
            recolor.send(RecolorCube);
        }
    }

    if !moved {
        return;
    }
    let positions: Vec<Vec2> = touches.iter().map(|t| t.position()).collect();
    match gestures.touch_move(&positions, settings.tap_slop, settings.pinch_zoom_rate) {
        TouchAction::Rotate(delta) => add_spin(&mut world, delta, &settings),
        TouchAction::Zoom(dz) => {
            if let Ok(mut cam) = q_cam.get_single_mut() {
                zoom_camera(&mut cam, dz, &settings);
            }
        }
        TouchAction::None => {}
    }
}

/// Wheel delta in browser pixels: positive scrolls down, away from the cube.
fn scroll_pixels(unit: MouseScrollUnit, y: f32) -> f32 {
    // winit reports scrolling up as positive
    match unit {
        MouseScrollUnit::Line => -y * PIXELS_PER_LINE,
        MouseScrollUnit::Pixel => -y,
    }
}

fn wheel_zoom(
    mut scroll_evr: EventReader<MouseWheel>,
    mut q_cam: Query<&mut Transform, With<MainCamera>>,
    mut egui: EguiContexts,
    settings: Res<ToySettings>,
) {
    if egui.ctx_mut().is_pointer_over_area() {
        scroll_evr.clear();
        return;
    }
    let Ok(mut cam) = q_cam.get_single_mut() else {
        return;
    };
    for ev in scroll_evr.read() {
        let dz = gesture::wheel_zoom(scroll_pixels(ev.unit, ev.y), settings.wheel_zoom_rate);
        zoom_camera(&mut cam, dz, &settings);
    }
}

fn recolor_key(mut recolor: EventWriter<RecolorCube>, keys: Res<ButtonInput<KeyCode>>) {
    if keys.just_pressed(KeyCode::Space) {
        recolor.send(RecolorCube);
    }
}

fn reset_key(mut reset: EventWriter<ResetBalls>, keys: Res<ButtonInput<KeyCode>>) {
    if keys.just_pressed(KeyCode::KeyR) {
        reset.send(ResetBalls);
    }
}

fn pause_toggle(mut settings: ResMut<ToySettings>, keys: Res<ButtonInput<KeyCode>>) {
    if keys.just_pressed(KeyCode::KeyP) {
        settings.running = !settings.running;
    }
}

fn help_toggle(mut settings: ResMut<ToySettings>, keys: Res<ButtonInput<KeyCode>>) {
    if keys.just_pressed(KeyCode::KeyH) {
        settings.show_help = !settings.show_help;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use bevy::input::mouse::MouseButton::{Left, Right};
    use bevy::input::ButtonState::{Pressed, Released};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn replay(
        g: &mut GestureTracker,
        drag: &mut MouseDrag,
        buttons: &[(MouseButton, ButtonState)],
        moves: &[Vec2],
        now: Duration,
    ) -> MouseFrame {
        let settings = ToySettings::default();
        replay_mouse(g, drag, buttons, moves, None, now, false, &settings)
    }

    fn at_rest(cursor: Vec2) -> (GestureTracker, MouseDrag) {
        let drag = MouseDrag {
            button: None,
            cursor: Some(cursor),
        };
        (GestureTracker::default(), drag)
    }

    #[test]
    fn click_without_motion_recolors() {
        let (mut g, mut drag) = at_rest(Vec2::new(50.0, 50.0));
        let frame = replay(&mut g, &mut drag, &[(Left, Pressed)], &[], ms(0));
        assert!(!frame.clicked);
        let frame = replay(&mut g, &mut drag, &[(Left, Released)], &[], ms(80));
        assert!(frame.clicked);
        assert!(drag.button.is_none());
    }

    #[test]
    fn fast_flick_within_one_frame_spins_instead_of_clicking() {
        let (mut g, mut drag) = at_rest(Vec2::new(100.0, 100.0));
        let moves = [Vec2::new(120.0, 100.0), Vec2::new(160.0, 110.0)];
        let frame = replay(
            &mut g,
            &mut drag,
            &[(Left, Pressed), (Left, Released)],
            &moves,
            ms(16),
        );
        assert!(!frame.clicked);
        assert_eq!(frame.spin, Vec2::new(60.0, 10.0));
        assert!(!g.is_pressed());
        assert_eq!(drag.cursor, Some(Vec2::new(160.0, 110.0)));
    }

    #[test]
    fn only_the_pressing_button_ends_the_drag() {
        let (mut g, mut drag) = at_rest(Vec2::ZERO);
        replay(&mut g, &mut drag, &[(Left, Pressed)], &[], ms(0));

        // second button is ignored both ways
        let frame = replay(
            &mut g,
            &mut drag,
            &[(Right, Pressed), (Right, Released)],
            &[Vec2::new(10.0, 0.0)],
            ms(30),
        );
        assert!(!frame.clicked);
        assert!(g.is_pressed());
        assert_eq!(drag.button, Some(Left));
        assert_eq!(frame.spin, Vec2::new(10.0, 0.0));

        replay(&mut g, &mut drag, &[(Left, Released)], &[], ms(60));
        assert!(!g.is_pressed());
    }

    #[test]
    fn presses_over_the_panel_do_not_start_a_gesture() {
        let settings = ToySettings::default();
        let (mut g, mut drag) = at_rest(Vec2::new(5.0, 5.0));
        let frame = replay_mouse(
            &mut g,
            &mut drag,
            &[(Left, Pressed)],
            &[Vec2::new(40.0, 5.0)],
            None,
            ms(0),
            true,
            &settings,
        );
        assert_eq!(frame, MouseFrame::default());
        assert!(!g.is_pressed());
    }

    #[test]
    fn first_press_uses_window_cursor_when_nothing_has_moved() {
        let settings = ToySettings::default();
        let mut g = GestureTracker::default();
        let mut drag = MouseDrag::default();
        replay_mouse(
            &mut g,
            &mut drag,
            &[(Left, Pressed)],
            &[],
            Some(Vec2::new(30.0, 30.0)),
            ms(0),
            false,
            &settings,
        );
        assert!(g.is_pressed());
        assert_eq!(g.drag(Vec2::new(33.0, 30.0), settings.tap_slop), Some(Vec2::new(3.0, 0.0)));
    }

    #[test]
    fn touch_starting_over_the_panel_is_ignored() {
        let max_tap = ToySettings::default().tap_max_duration;
        let mut g = GestureTracker::default();
        let pos = Vec2::new(20.0, 20.0);
        assert!(!touch_phase(&mut g, TouchPhase::Started, pos, ms(0), true, max_tap));
        assert!(!g.is_pressed());
        assert!(!touch_phase(&mut g, TouchPhase::Ended, pos, ms(50), true, max_tap));
    }

    #[test]
    fn quick_touch_is_a_tap_but_cancel_is_not() {
        let max_tap = ToySettings::default().tap_max_duration;
        let mut g = GestureTracker::default();
        let pos = Vec2::new(200.0, 300.0);
        touch_phase(&mut g, TouchPhase::Started, pos, ms(0), false, max_tap);
        assert!(g.is_pressed());
        assert!(touch_phase(&mut g, TouchPhase::Ended, pos, ms(90), false, max_tap));

        touch_phase(&mut g, TouchPhase::Started, pos, ms(500), false, max_tap);
        assert!(!touch_phase(&mut g, TouchPhase::Canceled, pos, ms(550), false, max_tap));
        assert!(!g.is_pressed());
    }

    #[test]
    fn wheel_lines_are_a_hundred_pixels_in_browser_direction() {
        assert_relative_eq!(scroll_pixels(MouseScrollUnit::Line, -1.0), 100.0);
        assert_relative_eq!(scroll_pixels(MouseScrollUnit::Line, 2.0), -200.0);
        assert_relative_eq!(scroll_pixels(MouseScrollUnit::Pixel, 35.0), -35.0);
    }

    #[test]
    fn scrolling_down_moves_the_camera_away() {
        let settings = ToySettings::default();
        let dz = gesture::wheel_zoom(
            scroll_pixels(MouseScrollUnit::Line, -1.0),
            settings.wheel_zoom_rate,
        );
        assert_relative_eq!(dz, 1.0);
        let z = gesture::apply_zoom(20.0, dz, settings.zoom_range);
        assert!(z > 20.0);

        let dz = gesture::wheel_zoom(
            scroll_pixels(MouseScrollUnit::Pixel, 50.0),
            settings.wheel_zoom_rate,
        );
        assert!(gesture::apply_zoom(20.0, dz, settings.zoom_range) < 20.0);
    }
}
