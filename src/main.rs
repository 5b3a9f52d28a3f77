mod cube;
mod gesture;
mod input;
mod physics;
mod pool_ball;
mod scene;
mod settings;
mod ui;

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use input::InputPlugin;
use physics::PhysicsPlugin;
use scene::ScenePlugin;
use settings::{ToySettings, CAMERA_START_Z};
use ui::UiPlugin;

fn main() {
    App::new()
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(Msaa::Sample4)
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 400.0,
        })
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "poolcube".into(),
                resolution: (1280., 800.).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ToySettings::from_env())
        .add_plugins((PhysicsPlugin, ScenePlugin, InputPlugin, UiPlugin))
        .add_systems(Startup, (setup_camera, setup_lights))
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3dBundle {
            projection: Projection::Perspective(PerspectiveProjection {
                fov: 75f32.to_radians(),
                near: 0.1,
                far: 1000.0,
                ..default()
            }),
            tonemapping: Tonemapping::TonyMcMapface,
            transform: Transform::from_xyz(0.0, 0.0, CAMERA_START_Z)
                .looking_at(Vec3::ZERO, Vec3::Y),
            ..default()
        },
        MainCamera,
    ));
}

fn setup_lights(mut commands: Commands) {
    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 2_000.0,
            ..default()
        },
        transform: Transform::from_xyz(0.0, 1.0, 1.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });
}

#[derive(Component)]
pub struct MainCamera;
