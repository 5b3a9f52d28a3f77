use std::collections::HashMap;

use rapier3d::prelude::*;

/// Surface kind, stored in a collider's `user_data`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Material {
    Ball = 1,
    Wall = 2,
}

impl Material {
    pub fn from_user_data(data: u128) -> Option<Self> {
        match data {
            1 => Some(Material::Ball),
            2 => Some(Material::Wall),
            _ => None,
        }
    }

    pub fn user_data(self) -> u128 {
        self as u128
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ContactMaterial {
    pub friction: f32,
    pub restitution: f32,
}

impl Default for ContactMaterial {
    fn default() -> Self {
        Self {
            friction: 0.3,
            restitution: 0.0,
        }
    }
}

/// Pairwise friction/restitution, applied to solver contacts each step.
#[derive(Clone, Debug, Default)]
pub struct ContactMaterialTable {
    pairs: HashMap<(Material, Material), ContactMaterial>,
    fallback: ContactMaterial,
}

impl ContactMaterialTable {
    pub fn new(fallback: ContactMaterial) -> Self {
        Self {
            pairs: HashMap::new(),
            fallback,
        }
    }

    pub fn insert(&mut self, a: Material, b: Material, contact: ContactMaterial) {
        self.pairs.insert(Self::key(a, b), contact);
    }

    pub fn get(&self, a: Material, b: Material) -> ContactMaterial {
        self.pairs
            .get(&Self::key(a, b))
            .copied()
            .unwrap_or(self.fallback)
    }

    fn key(a: Material, b: Material) -> (Material, Material) {
        if (a as u8) <= (b as u8) {
            (a, b)
        } else {
            (b, a)
        }
    }
}

impl PhysicsHooks for ContactMaterialTable {
    fn modify_solver_contacts(&self, context: &mut ContactModificationContext) {
        let kind = |handle: ColliderHandle| {
            context
                .colliders
                .get(handle)
                .and_then(|c| Material::from_user_data(c.user_data))
        };
        let (Some(a), Some(b)) = (kind(context.collider1), kind(context.collider2)) else {
            return;
        };
        let contact = self.get(a, b);
        for solver_contact in context.solver_contacts.iter_mut() {
            solver_contact.friction = contact.friction;
            solver_contact.restitution = contact.restitution;
        }
    }
}
