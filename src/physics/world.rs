use std::num::NonZeroUsize;

use bevy::prelude::{Quat, Resource, Vec3};
use rapier3d::prelude::*;
use thiserror::Error;

use super::material::{ContactMaterial, ContactMaterialTable, Material};
use crate::cube;

#[derive(Debug, Error)]
pub enum PhysicsError {
    #[error("no rigid body for handle {0:?}")]
    MissingBody(RigidBodyHandle),
    #[error("cube body has not been built")]
    NoCube,
}

/// Rapier simulation state for the cube and its balls.
#[derive(Resource)]
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    contact_materials: ContactMaterialTable,
    cube: Option<RigidBodyHandle>,
}

impl PhysicsWorld {
    pub fn new(gravity_y: f32) -> Self {
        let mut contact_materials = ContactMaterialTable::new(ContactMaterial::default());
        contact_materials.insert(
            Material::Ball,
            Material::Wall,
            ContactMaterial {
                friction: 0.05,
                restitution: 0.0,
            },
        );

        Self {
            gravity: vector![0.0, gravity_y, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            contact_materials,
            cube: None,
        }
    }

    pub fn set_gravity(&mut self, gravity_y: f32) {
        self.gravity = vector![0.0, gravity_y, 0.0];
    }

    pub fn set_solver_iterations(&mut self, iterations: usize) {
        self.integration_parameters.num_solver_iterations =
            NonZeroUsize::new(iterations).unwrap_or(NonZeroUsize::MIN);
    }

    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &self.contact_materials,
            &(),
        );
    }

    /// Kinematic body at the origin with one thin box collider per face.
    pub fn build_cube(&mut self, size: f32, thickness: f32) -> RigidBodyHandle {
        let body = RigidBodyBuilder::kinematic_velocity_based().build();
        let handle = self.rigid_body_set.insert(body);
        for wall in cube::walls(size, thickness) {
            let e = wall.half_extents;
            let collider = ColliderBuilder::cuboid(e.x, e.y, e.z)
                .translation(to_vector(wall.offset))
                .friction(0.1)
                .restitution(0.7)
                .user_data(Material::Wall.user_data())
                .active_hooks(ActiveHooks::MODIFY_SOLVER_CONTACTS)
                .build();
            self.collider_set
                .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        }
        self.cube = Some(handle);
        handle
    }

    pub fn add_ball(
        &mut self,
        position: Vec3,
        radius: f32,
        mass: f32,
        ccd: bool,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(position))
            .ccd_enabled(ccd)
            .build();
        let handle = self.rigid_body_set.insert(body);
        let collider = ColliderBuilder::ball(radius)
            .mass(mass)
            .user_data(Material::Ball.user_data())
            .active_hooks(ActiveHooks::MODIFY_SOLVER_CONTACTS)
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        handle
    }

    /// Teleports a ball and clears its motion.
    pub fn place_ball(
        &mut self,
        handle: RigidBodyHandle,
        position: Vec3,
    ) -> Result<(), PhysicsError> {
        let body = self
            .rigid_body_set
            .get_mut(handle)
            .ok_or(PhysicsError::MissingBody(handle))?;
        body.set_translation(to_vector(position), true);
        body.set_rotation(Rotation::identity(), true);
        body.set_linvel(Vector::zeros(), true);
        body.set_angvel(Vector::zeros(), true);
        Ok(())
    }

    pub fn body_pose(&self, handle: RigidBodyHandle) -> Result<(Vec3, Quat), PhysicsError> {
        let body = self
            .rigid_body_set
            .get(handle)
            .ok_or(PhysicsError::MissingBody(handle))?;
        Ok((from_vector(body.translation()), from_rotation(body.rotation())))
    }

    pub fn cube_angvel(&self) -> Result<Vec3, PhysicsError> {
        let body = self.cube_body()?;
        Ok(from_vector(body.angvel()))
    }

    pub fn set_cube_angvel(&mut self, angvel: Vec3) -> Result<(), PhysicsError> {
        let handle = self.cube.ok_or(PhysicsError::NoCube)?;
        let body = self
            .rigid_body_set
            .get_mut(handle)
            .ok_or(PhysicsError::MissingBody(handle))?;
        body.set_angvel(to_vector(angvel), true);
        Ok(())
    }

    pub fn cube_rotation(&self) -> Result<Quat, PhysicsError> {
        let body = self.cube_body()?;
        Ok(from_rotation(body.rotation()))
    }

    /// Stops the spin and squares the cube back up.
    pub fn reset_cube(&mut self) -> Result<(), PhysicsError> {
        let handle = self.cube.ok_or(PhysicsError::NoCube)?;
        let body = self
            .rigid_body_set
            .get_mut(handle)
            .ok_or(PhysicsError::MissingBody(handle))?;
        body.set_angvel(Vector::zeros(), true);
        body.set_rotation(Rotation::identity(), true);
        Ok(())
    }

    fn cube_body(&self) -> Result<&RigidBody, PhysicsError> {
        let handle = self.cube.ok_or(PhysicsError::NoCube)?;
        self.rigid_body_set
            .get(handle)
            .ok_or(PhysicsError::MissingBody(handle))
    }
}

fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn from_rotation(r: &Rotation<Real>) -> Quat {
    Quat::from_xyzw(r.i, r.j, r.k, r.w)
}
