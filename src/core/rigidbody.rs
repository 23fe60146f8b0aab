use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::types::{Anchor, BodyId, BodyType, Transform2D};
use crate::utils::math::{cross, rect_moment_of_inertia};

/// A continuous force applied at a point in the body's unit-square
/// coordinates, where `(0.5, 0.5)` is the centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppliedForce {
    pub force: Vec2,
    pub point: Vec2,
}

/// Bulk property update consumed by [`crate::PhysicsSolver::update_body_properties`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPropertiesUpdate {
    pub id: BodyId,
    pub mass: f32,
    pub inverse_mass: f32,
    pub restitution: f32,
    pub is_dynamic: bool,
}

/// Dynamics state of one body.
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    pub id: BodyId,
    pub transform: Transform2D,
    pub velocity: Vec2,
    pub angular_velocity: f32,
    pub restitution: f32,
    pub forces: Vec<AppliedForce>,
    mass: f32,
    inverse_mass: f32,
    inertia: f32,
    inverse_inertia: f32,
    body_type: BodyType,
    anchored: bool,
    is_dynamic: bool,
}

impl PhysicsBody {
    pub fn new(
        id: BodyId,
        transform: Transform2D,
        velocity: Vec2,
        angular_velocity: f32,
        mass: f32,
        restitution: f32,
    ) -> Self {
        let mut body = Self {
            id,
            transform,
            velocity,
            angular_velocity,
            restitution: restitution.clamp(0.0, 1.0),
            forces: Vec::new(),
            mass,
            inverse_mass: 0.0,
            inertia: 0.0,
            inverse_inertia: 0.0,
            body_type: BodyType::Dynamic,
            anchored: false,
            is_dynamic: true,
        };
        body.set_mass(mass);
        body
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    pub fn inverse_inertia(&self) -> f32 {
        self.inverse_inertia
    }

    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    pub fn is_dynamic(&self) -> bool {
        self.is_dynamic
    }

    /// Follows its own velocity but is never pushed by forces or contacts.
    pub fn is_kinematic(&self) -> bool {
        !self.anchored && self.body_type == BodyType::Kinematic
    }

    /// Immovable by impulses and corrections.
    pub fn is_immovable(&self) -> bool {
        !self.is_dynamic || self.inverse_mass == 0.0
    }

    pub fn center(&self, anchor: Anchor) -> Vec2 {
        anchor.center(self.transform.position, self.transform.size)
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.inverse_mass = if mass > 0.0 { 1.0 / mass } else { 0.0 };
        self.recompute_mass_properties();
    }

    pub fn set_body_type(&mut self, body_type: BodyType) {
        self.body_type = body_type;
        self.is_dynamic = !self.anchored && body_type == BodyType::Dynamic;
        self.inverse_mass = if self.mass > 0.0 { 1.0 / self.mass } else { 0.0 };
        self.recompute_mass_properties();
    }

    pub fn set_anchored(&mut self, anchored: bool) {
        self.anchored = anchored;
        self.set_body_type(self.body_type);
    }

    /// Applies a host-supplied property set. The host's inverse mass is kept
    /// unless the body is non-dynamic or massless. `is_dynamic` can only
    /// switch dynamics off; anchored and non-`Dynamic` bodies stay non-dynamic.
    pub fn apply_properties(&mut self, update: &BodyPropertiesUpdate) {
        self.mass = update.mass;
        self.inverse_mass = if update.inverse_mass.is_finite() {
            update.inverse_mass.max(0.0)
        } else {
            0.0
        };
        self.restitution = update.restitution.clamp(0.0, 1.0);
        self.is_dynamic =
            update.is_dynamic && !self.anchored && self.body_type == BodyType::Dynamic;
        self.recompute_mass_properties();
    }

    /// Re-derives inertia from mass and size.
    pub fn recompute_mass_properties(&mut self) {
        if !self.is_dynamic || !(self.mass > 0.0) {
            self.inverse_mass = 0.0;
        }

        self.inertia = rect_moment_of_inertia(self.mass.max(0.0), self.transform.size);
        self.inverse_inertia = if self.inverse_mass > 0.0 && self.inertia > f32::EPSILON {
            1.0 / self.inertia
        } else {
            0.0
        };
    }

    pub fn set_transform(&mut self, transform: Transform2D) {
        let resized = transform.size != self.transform.size;
        self.transform = transform;
        if resized {
            self.recompute_mass_properties();
        }
    }

    /// Instantaneous velocity change from an impulse applied at a world point.
    pub fn apply_impulse(&mut self, impulse: Vec2, point: Vec2, anchor: Anchor) {
        if self.is_immovable() {
            return;
        }

        self.velocity += impulse * self.inverse_mass;
        let lever_arm = point - self.center(anchor);
        self.angular_velocity += cross(lever_arm, impulse) * self.inverse_inertia;
    }

    pub fn add_force(&mut self, force: Vec2, point: Vec2) {
        self.forces.push(AppliedForce { force, point });
    }

    pub fn clear_forces(&mut self) {
        self.forces.clear();
    }
}
