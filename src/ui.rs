use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin};

use crate::physics::PhysicsWorld;
use crate::scene::{RecolorCube, ResetBalls};
use crate::settings::ToySettings;

pub struct UiPlugin;
impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .add_systems(Update, (settings_panel, help_panel));
    }
}

fn settings_panel(
    mut contexts: EguiContexts,
    mut settings: ResMut<ToySettings>,
    world: Res<PhysicsWorld>,
    diagnostics: Res<DiagnosticsStore>,
    mut recolor: EventWriter<RecolorCube>,
    mut reset: EventWriter<ResetBalls>,
) {
    egui::Window::new("Settings").show(contexts.ctx_mut(), |ui| {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                ui.label(format!("FPS: {:.1}", value));
            }
        }
        if let Ok(spin) = world.cube_angvel() {
            ui.label(format!(
                "Spin: ({:.2}, {:.2}, {:.2}) rad/s",
                spin.x, spin.y, spin.z
            ));
        }

        ui.separator();

        // Read through a copy so untouched widgets don't flag the resource as changed.
        let mut edited = settings.clone();
        ui.checkbox(&mut edited.running, "Running");
        ui.add(egui::Slider::new(&mut edited.gravity, -60.0..=0.0).text("Gravity"));
        ui.add(
            egui::Slider::new(&mut edited.rotation_speed, 0.0..=1.0).text("Rotation speed"),
        );
        ui.add(
            egui::Slider::new(&mut edited.max_angular_velocity, 0.5..=30.0)
                .text("Max spin (rad/s)"),
        );
        ui.add(egui::Slider::new(&mut edited.spin_damping, 0.9..=1.0).text("Spin damping"));
        ui.checkbox(&mut edited.show_help, "Show help");

        ui.separator();

        ui.horizontal(|ui| {
            if ui.button("Recolor").clicked() {
                recolor.send(RecolorCube);
            }
            if ui.button("Reset balls").clicked() {
                reset.send(ResetBalls);
            }
        });

        if edited.running != settings.running
            || edited.gravity != settings.gravity
            || edited.rotation_speed != settings.rotation_speed
            || edited.max_angular_velocity != settings.max_angular_velocity
            || edited.spin_damping != settings.spin_damping
            || edited.show_help != settings.show_help
        {
            *settings = edited;
        }
    });
}

fn help_panel(mut contexts: EguiContexts, settings: Res<ToySettings>) {
    if settings.show_help {
        egui::Window::new("Help").show(contexts.ctx_mut(), |ui| {
            ui.label("Drag (mouse or touch): Spin the cube");
            ui.label("Click / Tap / Space: Recolor the cube");
            ui.label("Mouse Wheel / Pinch: Zoom");
            ui.label("R: Reset balls");
            ui.label("P: Pause physics");
            ui.label("H: Toggle Help");
        });
    }
}
