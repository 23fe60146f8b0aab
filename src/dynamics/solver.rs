use std::collections::{HashMap, HashSet};

use glam::Vec2;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::{
    collision::contact::CollisionResult,
    config::EngineConfig,
    core::{
        rigidbody::{BodyPropertiesUpdate, PhysicsBody},
        types::{Anchor, BodyId, BodyType, Transform2D},
    },
    error::{PhysicsError, Result},
    utils::math::{angular_to_linear, cross},
};

/// Tuning for impulse resolution and positional correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpulseParams {
    pub impulse_scaler: f32,
    pub penetration_slop: f32,
    pub impulse_epsilon: f32,
    pub correction_factor: f32,
}

impl ImpulseParams {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            impulse_scaler: config.impulse_scaler,
            penetration_slop: config.penetration_slop,
            impulse_epsilon: config.impulse_epsilon,
            correction_factor: config.correction_factor,
        }
    }
}

impl Default for ImpulseParams {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// What resolving one contact did to its two bodies.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PairOutcome {
    /// Impulse magnitude along the normal, zero when none was applied.
    pub impulse: f32,
    pub moved_a: bool,
    pub moved_b: bool,
}

/// Single-contact impulse and position solver.
pub struct ImpulseSolver;

impl ImpulseSolver {
    /// Resolves one contact whose normal points from `body_a` to `body_b`.
    pub fn resolve_pair(
        body_a: &mut PhysicsBody,
        body_b: &mut PhysicsBody,
        contact: &CollisionResult,
        params: &ImpulseParams,
        anchor: Anchor,
    ) -> PairOutcome {
        let mut outcome = PairOutcome::default();

        if contact.penetration <= params.penetration_slop {
            return outcome;
        }
        if !body_a.is_dynamic() && !body_b.is_dynamic() {
            return outcome;
        }

        let inverse_mass_a = body_a.inverse_mass();
        let inverse_mass_b = body_b.inverse_mass();
        let total_inverse_mass = inverse_mass_a + inverse_mass_b;
        if total_inverse_mass <= 0.0 {
            return outcome;
        }

        let normal = contact.normal;
        let lever_a = contact.contact_point - body_a.center(anchor);
        let lever_b = contact.contact_point - body_b.center(anchor);

        let velocity_a = body_a.velocity + angular_to_linear(body_a.angular_velocity, lever_a);
        let velocity_b = body_b.velocity + angular_to_linear(body_b.angular_velocity, lever_b);
        let velocity_along_normal = (velocity_b - velocity_a).dot(normal);

        // Already separating: correct position only.
        if velocity_along_normal <= -params.impulse_epsilon {
            outcome.impulse =
                Self::apply_impulse(body_a, body_b, normal, lever_a, lever_b, velocity_along_normal, params);
        }

        let correction = (contact.penetration - params.penetration_slop) * params.correction_factor;
        if correction > 0.0 {
            let push = normal * (correction / total_inverse_mass);
            if body_a.is_dynamic() && inverse_mass_a > 0.0 {
                body_a.transform.position -= push * inverse_mass_a;
                outcome.moved_a = true;
            }
            if body_b.is_dynamic() && inverse_mass_b > 0.0 {
                body_b.transform.position += push * inverse_mass_b;
                outcome.moved_b = true;
            }
        }

        outcome
    }

    fn apply_impulse(
        body_a: &mut PhysicsBody,
        body_b: &mut PhysicsBody,
        normal: Vec2,
        lever_a: Vec2,
        lever_b: Vec2,
        velocity_along_normal: f32,
        params: &ImpulseParams,
    ) -> f32 {
        let restitution = body_a.restitution.min(body_b.restitution);
        let lever_a_normal = cross(lever_a, normal);
        let lever_b_normal = cross(lever_b, normal);

        let denominator = body_a.inverse_mass()
            + body_b.inverse_mass()
            + lever_a_normal * lever_a_normal * body_a.inverse_inertia()
            + lever_b_normal * lever_b_normal * body_b.inverse_inertia();
        if denominator <= f32::EPSILON {
            return 0.0;
        }

        let magnitude =
            -(1.0 + restitution) * velocity_along_normal / denominator * params.impulse_scaler;
        let impulse = normal * magnitude;

        if body_a.is_dynamic() {
            body_a.velocity -= impulse * body_a.inverse_mass();
            body_a.angular_velocity -= magnitude * lever_a_normal * body_a.inverse_inertia();
        }
        if body_b.is_dynamic() {
            body_b.velocity += impulse * body_b.inverse_mass();
            body_b.angular_velocity += magnitude * lever_b_normal * body_b.inverse_inertia();
        }

        magnitude
    }
}

/// Owns every body's dynamics state and resolves reported contacts.
#[derive(Debug)]
pub struct PhysicsSolver {
    bodies: HashMap<BodyId, PhysicsBody>,
    params: ImpulseParams,
    anchor: Anchor,
    default_mass: f32,
    default_restitution: f32,
}

impl Default for PhysicsSolver {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl PhysicsSolver {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            bodies: HashMap::new(),
            params: ImpulseParams::from_config(config),
            anchor: config.anchor,
            default_mass: config.default_mass,
            default_restitution: config.default_restitution,
        }
    }

    /// Registers a dynamic body with the configured default mass and restitution.
    pub fn create_body(
        &mut self,
        id: BodyId,
        size: Vec2,
        position: Vec2,
        rotation: f32,
        velocity: Vec2,
        angular_velocity: f32,
    ) -> Result<()> {
        if self.bodies.contains_key(&id) {
            return Err(PhysicsError::DuplicateId(id));
        }

        let body = PhysicsBody::new(
            id,
            Transform2D::new(position, size, rotation),
            velocity,
            angular_velocity,
            self.default_mass,
            self.default_restitution,
        );
        self.bodies.insert(id, body);
        debug!("Created physics body {id}");
        Ok(())
    }

    pub fn destroy_body(&mut self, id: BodyId) -> Result<()> {
        self.bodies.remove(&id).ok_or(PhysicsError::UnknownId(id))?;
        debug!("Destroyed physics body {id}");
        Ok(())
    }

    /// Applies updates in order. Stops at the first unknown id; earlier
    /// updates stay applied.
    pub fn update_body_properties(&mut self, updates: &[BodyPropertiesUpdate]) -> Result<()> {
        for update in updates {
            let body = self
                .bodies
                .get_mut(&update.id)
                .ok_or(PhysicsError::UnknownId(update.id))?;
            body.apply_properties(update);
        }
        Ok(())
    }

    /// Resolves every contact and returns the ids whose position changed.
    pub fn resolve_collisions(&mut self, collisions: &[CollisionResult]) -> HashSet<BodyId> {
        let mut moved = HashSet::new();
        let mut impulses = 0usize;

        for contact in collisions {
            let first = contact.pair.first();
            let second = contact.pair.second();

            // Take one body out so both can be borrowed mutably.
            let Some(mut body_a) = self.bodies.remove(&first) else {
                trace!("No physics body for {first}, skipping contact");
                continue;
            };
            let outcome = match self.bodies.get_mut(&second) {
                Some(body_b) => Some(ImpulseSolver::resolve_pair(
                    &mut body_a,
                    body_b,
                    contact,
                    &self.params,
                    self.anchor,
                )),
                None => {
                    trace!("No physics body for {second}, skipping contact");
                    None
                }
            };
            self.bodies.insert(first, body_a);

            let Some(outcome) = outcome else {
                continue;
            };
            if outcome.impulse != 0.0 {
                impulses += 1;
            }
            if outcome.moved_a {
                moved.insert(first);
            }
            if outcome.moved_b {
                moved.insert(second);
            }
        }

        trace!(
            "resolved {} contacts: {} impulses, {} bodies moved",
            collisions.len(),
            impulses,
            moved.len()
        );
        moved
    }

    pub fn set_impulse_scaler(&mut self, value: f32) {
        self.params.impulse_scaler = value;
    }

    pub fn impulse_scaler(&self) -> f32 {
        self.params.impulse_scaler
    }

    pub fn params(&self) -> &ImpulseParams {
        &self.params
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn body(&self, id: BodyId) -> Option<&PhysicsBody> {
        self.bodies.get(&id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut PhysicsBody> {
        self.bodies.get_mut(&id)
    }

    fn require_mut(&mut self, id: BodyId) -> Result<&mut PhysicsBody> {
        self.bodies.get_mut(&id).ok_or(PhysicsError::UnknownId(id))
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> impl Iterator<Item = &PhysicsBody> {
        self.bodies.values()
    }

    pub fn bodies_mut(&mut self) -> impl Iterator<Item = &mut PhysicsBody> {
        self.bodies.values_mut()
    }

    pub fn set_transform(&mut self, id: BodyId, transform: Transform2D) -> Result<()> {
        self.require_mut(id)?.set_transform(transform);
        Ok(())
    }

    pub fn set_velocity(&mut self, id: BodyId, velocity: Vec2, angular_velocity: f32) -> Result<()> {
        let body = self.require_mut(id)?;
        body.velocity = velocity;
        body.angular_velocity = angular_velocity;
        Ok(())
    }

    pub fn set_body_type(&mut self, id: BodyId, body_type: BodyType) -> Result<()> {
        self.require_mut(id)?.set_body_type(body_type);
        Ok(())
    }

    pub fn set_anchored(&mut self, id: BodyId, anchored: bool) -> Result<()> {
        self.require_mut(id)?.set_anchored(anchored);
        Ok(())
    }

    /// Adds a continuous force at `point` in the body's unit square.
    pub fn apply_force(&mut self, id: BodyId, force: Vec2, point: Vec2) -> Result<()> {
        let body = self.require_mut(id)?;
        if force == Vec2::ZERO {
            warn!("Ignoring zero force applied to body {id}");
            return Ok(());
        }
        body.add_force(force, point);
        Ok(())
    }

    /// Changes velocity immediately. `point` is in world space.
    pub fn apply_impulse(&mut self, id: BodyId, impulse: Vec2, point: Vec2) -> Result<()> {
        let anchor = self.anchor;
        let body = self.require_mut(id)?;
        if impulse == Vec2::ZERO {
            warn!("Ignoring zero impulse applied to body {id}");
            return Ok(());
        }
        body.apply_impulse(impulse, point, anchor);
        Ok(())
    }
}
