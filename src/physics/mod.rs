// Rigid-body simulation using rapier3d

mod clock;
mod material;
mod world;

pub use world::PhysicsWorld;

use bevy::prelude::*;
use rapier3d::prelude::RigidBodyHandle;

use clock::StepClock;
use crate::gesture::GestureTracker;
use crate::settings::ToySettings;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhysicsSet;

/// Mesh whose transform is copied from a rapier body every frame.
#[derive(Component)]
pub struct PhysicsBody(pub RigidBodyHandle);

/// Mesh that rotates with the cube.
#[derive(Component)]
pub struct FollowsCube;

pub struct PhysicsPlugin;
impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<ToySettings>()
            .cloned()
            .unwrap_or_default();
        let mut world = PhysicsWorld::new(settings.gravity);
        world.set_solver_iterations(settings.solver_iterations);

        app.insert_resource(world)
            .init_resource::<StepClock>()
            .add_systems(
                Update,
                (
                    govern_spin,
                    step_physics,
                    sync_bodies,
                    sync_cube,
                )
                    .chain()
                    .in_set(PhysicsSet),
            );
    }
}

pub fn clamp_spin(angvel: Vec3, max: f32) -> Vec3 {
    let max = max.abs();
    angvel.clamp(Vec3::splat(-max), Vec3::splat(max))
}

/// Cube spin for the next step: damped only while nobody holds it, then clamped.
pub fn next_spin(angvel: Vec3, pressed: bool, damping: f32, max: f32) -> Vec3 {
    let damped = if pressed { angvel } else { angvel * damping };
    clamp_spin(damped, max)
}

fn govern_spin(
    settings: Res<ToySettings>,
    gestures: Res<GestureTracker>,
    mut world: ResMut<PhysicsWorld>,
) {
    let result = world.cube_angvel().and_then(|angvel| {
        let next = next_spin(
            angvel,
            gestures.is_pressed(),
            settings.spin_damping,
            settings.max_angular_velocity,
        );
        if next != angvel {
            world.set_cube_angvel(next)?;
        }
        Ok(())
    });
    if let Err(err) = result {
        warn!("spin update skipped: {err}");
    }
}

fn step_physics(
    time: Res<Time>,
    settings: Res<ToySettings>,
    mut clock: ResMut<StepClock>,
    mut world: ResMut<PhysicsWorld>,
) {
    if !settings.running {
        return;
    }
    if settings.is_changed() {
        world.set_gravity(settings.gravity);
        world.set_solver_iterations(settings.solver_iterations);
    }
    let steps = clock.advance(
        time.delta_seconds(),
        settings.fixed_timestep,
        settings.max_substeps,
    );
    if steps == settings.max_substeps {
        debug!(
            "physics hit the substep cap ({steps}), {:.4}s carried over",
            clock.pending()
        );
    }
    for _ in 0..steps {
        world.step(settings.fixed_timestep);
    }
}

fn sync_bodies(world: Res<PhysicsWorld>, mut q: Query<(&PhysicsBody, &mut Transform)>) {
    for (body, mut t) in &mut q {
        match world.body_pose(body.0) {
            Ok((translation, rotation)) => {
                t.translation = translation;
                t.rotation = rotation;
            }
            Err(err) => warn!("{err}"),
        }
    }
}

fn sync_cube(world: Res<PhysicsWorld>, mut q: Query<&mut Transform, With<FollowsCube>>) {
    let Ok(rotation) = world.cube_rotation() else {
        return;
    };
    for mut t in &mut q {
        t.rotation = rotation;
    }
}
