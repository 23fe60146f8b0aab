use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use log::{debug, trace};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::{
    collision::{
        contact::CollisionResult,
        events::{CollisionEvent, ContactTracker},
        groups::GroupId,
        solver::CollisionSolver,
    },
    config::EngineConfig,
    core::{
        mask::CollisionMask,
        rigidbody::{BodyPropertiesUpdate, PhysicsBody},
        types::{Anchor, BodyId, BodyType, Transform2D},
    },
    dynamics::{integrator::Integrator, solver::PhysicsSolver},
    error::{PhysicsError, Result},
    utils::{
        logging::{ScopedTimer, warn_if_frame_budget_exceeded},
        profiling::{PhaseTimer, PhysicsProfiler},
    },
};

/// World handle for hosts that move the simulation between threads.
pub type SharedWorld = Arc<Mutex<PhysicsWorld>>;

/// Everything needed to register one body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub transform: Transform2D,
    pub velocity: Vec2,
    pub angular_velocity: f32,
    /// Registers a collision mask.
    pub collider: bool,
    pub group: Option<String>,
    /// Registers a physics body.
    pub physics: bool,
    pub mass: Option<f32>,
    pub restitution: Option<f32>,
    pub body_type: BodyType,
    pub anchored: bool,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            transform: Transform2D::default(),
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            collider: true,
            group: None,
            physics: true,
            mass: None,
            restitution: None,
            body_type: BodyType::Dynamic,
            anchored: false,
        }
    }
}

impl BodyDesc {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            transform: Transform2D::from_position_size(position, size),
            ..Self::default()
        }
    }

    pub fn rotation(mut self, rotation: f32) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn angular_velocity(mut self, angular_velocity: f32) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn restitution(mut self, restitution: f32) -> Self {
        self.restitution = Some(restitution);
        self
    }

    pub fn body_type(mut self, body_type: BodyType) -> Self {
        self.body_type = body_type;
        self
    }

    pub fn anchored(mut self, anchored: bool) -> Self {
        self.anchored = anchored;
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Collision mask only; the body is never moved by the solver.
    pub fn collider_only(mut self) -> Self {
        self.collider = true;
        self.physics = false;
        self
    }

    /// Physics body only; it never collides.
    pub fn physics_only(mut self) -> Self {
        self.collider = false;
        self.physics = true;
        self
    }
}

/// Output of one [`PhysicsWorld::step`].
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub contacts: Vec<CollisionResult>,
    pub events: Vec<CollisionEvent>,
    /// Bodies whose transform changed, sorted by id.
    pub changed: Vec<BodyId>,
}

/// Owns both solvers and runs one simulation step at a time.
#[derive(Debug)]
pub struct PhysicsWorld {
    config: EngineConfig,
    collision: CollisionSolver,
    physics: PhysicsSolver,
    integrator: Integrator,
    tracker: ContactTracker,
    pending_updates: HashSet<BodyId>,
    pending_events: Vec<CollisionEvent>,
    disabled: HashSet<BodyId>,
    profiler: PhysicsProfiler,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::from_config(EngineConfig::default())
    }

    pub fn builder() -> PhysicsWorldBuilder {
        PhysicsWorldBuilder::new()
    }

    fn from_config(config: EngineConfig) -> Self {
        Self {
            collision: CollisionSolver::from_config(&config),
            physics: PhysicsSolver::from_config(&config),
            integrator: Integrator::from_config(&config),
            tracker: ContactTracker::new(),
            pending_updates: HashSet::new(),
            pending_events: Vec::new(),
            disabled: HashSet::new(),
            profiler: PhysicsProfiler::default(),
            config,
        }
    }

    pub fn into_shared(self) -> SharedWorld {
        Arc::new(Mutex::new(self))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn anchor(&self) -> Anchor {
        self.config.anchor
    }

    pub fn collision(&self) -> &CollisionSolver {
        &self.collision
    }

    pub fn physics(&self) -> &PhysicsSolver {
        &self.physics
    }

    pub fn profiler(&self) -> &PhysicsProfiler {
        &self.profiler
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.collision.contains(id) || self.physics.contains(id)
    }

    /// Registers a body's mask and/or dynamics under a host-chosen id.
    /// Nothing is registered if any part of the description is rejected.
    pub fn add_body(&mut self, id: BodyId, desc: BodyDesc) -> Result<()> {
        if self.contains(id) {
            return Err(PhysicsError::DuplicateId(id));
        }
        if let Some(group) = desc.group.as_deref() {
            self.collision.groups().require(group)?;
        }

        let transform = desc.transform;
        if desc.collider {
            self.collision
                .create_mask(id, transform.size, transform.position, transform.rotation)?;
            if let Some(group) = desc.group.as_deref() {
                self.collision.set_mask_group(id, group)?;
            }
        }

        if desc.physics {
            self.physics.create_body(
                id,
                transform.size,
                transform.position,
                transform.rotation,
                desc.velocity,
                desc.angular_velocity,
            )?;

            if desc.mass.is_some() || desc.restitution.is_some() {
                let mass = desc.mass.unwrap_or(self.config.default_mass);
                self.physics.update_body_properties(&[BodyPropertiesUpdate {
                    id,
                    mass,
                    inverse_mass: if mass > 0.0 { 1.0 / mass } else { 0.0 },
                    restitution: desc.restitution.unwrap_or(self.config.default_restitution),
                    is_dynamic: true,
                }])?;
            }
            self.physics.set_body_type(id, desc.body_type)?;
            self.physics.set_anchored(id, desc.anchored)?;
        }

        self.pending_updates.insert(id);
        debug!(
            "Added body {id} (collider: {}, physics: {})",
            desc.collider, desc.physics
        );
        Ok(())
    }

    /// Removes every part of a body. Contacts it was part of are reported
    /// as ended by the next step.
    pub fn remove_body(&mut self, id: BodyId) -> Result<()> {
        if !self.contains(id) {
            return Err(PhysicsError::UnknownId(id));
        }

        if self.collision.contains(id) {
            self.collision.destroy_mask(id)?;
        }
        if self.physics.contains(id) {
            self.physics.destroy_body(id)?;
        }

        self.pending_updates.remove(&id);
        self.disabled.remove(&id);
        self.pending_events.extend(self.tracker.forget(id));
        debug!("Removed body {id}");
        Ok(())
    }

    /// Host-driven move. The body is re-tested on the next step.
    pub fn set_transform(&mut self, id: BodyId, transform: Transform2D) -> Result<()> {
        if !self.contains(id) {
            return Err(PhysicsError::UnknownId(id));
        }

        if self.collision.contains(id) {
            self.collision.set_transform(id, transform)?;
        }
        if self.physics.contains(id) {
            self.physics.set_transform(id, transform)?;
        }
        self.pending_updates.insert(id);
        Ok(())
    }

    /// Disabled bodies keep their state but are left out of collision checks.
    pub fn set_body_enabled(&mut self, id: BodyId, enabled: bool) -> Result<()> {
        if !self.contains(id) {
            return Err(PhysicsError::UnknownId(id));
        }

        if enabled {
            self.disabled.remove(&id);
        } else {
            self.disabled.insert(id);
        }
        self.pending_updates.insert(id);
        Ok(())
    }

    pub fn is_body_enabled(&self, id: BodyId) -> bool {
        self.contains(id) && !self.disabled.contains(&id)
    }

    pub fn transform(&self, id: BodyId) -> Option<Transform2D> {
        self.physics
            .body(id)
            .map(|body| body.transform)
            .or_else(|| self.collision.mask(id).map(|mask| mask.transform))
    }

    pub fn velocity(&self, id: BodyId) -> Option<Vec2> {
        self.physics.body(id).map(|body| body.velocity)
    }

    pub fn angular_velocity(&self, id: BodyId) -> Option<f32> {
        self.physics.body(id).map(|body| body.angular_velocity)
    }

    pub fn body(&self, id: BodyId) -> Option<&PhysicsBody> {
        self.physics.body(id)
    }

    pub fn mask(&self, id: BodyId) -> Option<&CollisionMask> {
        self.collision.mask(id)
    }

    pub fn set_velocity(&mut self, id: BodyId, velocity: Vec2, angular_velocity: f32) -> Result<()> {
        self.physics.set_velocity(id, velocity, angular_velocity)
    }

    pub fn update_body_properties(&mut self, updates: &[BodyPropertiesUpdate]) -> Result<()> {
        self.physics.update_body_properties(updates)
    }

    pub fn set_body_type(&mut self, id: BodyId, body_type: BodyType) -> Result<()> {
        self.physics.set_body_type(id, body_type)
    }

    pub fn set_anchored(&mut self, id: BodyId, anchored: bool) -> Result<()> {
        self.physics.set_anchored(id, anchored)
    }

    pub fn apply_force(&mut self, id: BodyId, force: Vec2, point: Vec2) -> Result<()> {
        self.physics.apply_force(id, force, point)
    }

    pub fn apply_impulse(&mut self, id: BodyId, impulse: Vec2, point: Vec2) -> Result<()> {
        self.physics.apply_impulse(id, impulse, point)
    }

    pub fn create_group(&mut self, name: &str) -> Result<GroupId> {
        self.collision.groups_mut().create_group(name)
    }

    pub fn set_groups_collidable(&mut self, group_a: &str, group_b: &str, collidable: bool) -> Result<()> {
        self.collision
            .groups_mut()
            .set_collidable(group_a, group_b, collidable)
    }

    pub fn set_body_group(&mut self, id: BodyId, group: &str) -> Result<GroupId> {
        let group = self.collision.set_mask_group(id, group)?;
        self.pending_updates.insert(id);
        Ok(group)
    }

    pub fn set_impulse_scaler(&mut self, value: f32) {
        self.physics.set_impulse_scaler(value);
    }

    pub fn impulse_scaler(&self) -> f32 {
        self.physics.impulse_scaler()
    }

    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.collision.set_parallel_enabled(enabled);
    }

    pub fn parallel_enabled(&self) -> bool {
        self.collision.parallel_enabled()
    }

    /// Runs integrate, collide, and resolve once, returning what happened.
    pub fn step(&mut self, dt: f32) -> StepReport {
        let _timer = ScopedTimer::new("world step");
        let started = Instant::now();
        self.profiler.reset();
        self.profiler.body_count = self.collision.len().max(self.physics.len());

        let integrated = {
            let _phase = PhaseTimer::new(&mut self.profiler.integrator_time);
            self.integrator.step(self.physics.bodies_mut(), dt)
        };
        self.sync_masks(&integrated);

        let mut updated: Vec<BodyId> = self.pending_updates.drain().collect();
        updated.sort_unstable();
        let updated_set: HashSet<BodyId> = updated.iter().copied().collect();

        let valid: HashSet<BodyId> = self
            .collision
            .ids()
            .filter(|id| !self.disabled.contains(id))
            .collect();
        let contacts = self.collision.check_collisions(&valid, &updated);

        let stats = self.collision.last_stats();
        self.profiler.broad_phase_time = stats.broad_phase_time;
        self.profiler.narrow_phase_time = stats.narrow_phase_time;
        self.profiler.candidate_pair_count = stats.candidate_pairs;
        self.profiler.contact_count = contacts.len();

        let mut events = std::mem::take(&mut self.pending_events);
        events.extend(self.tracker.update(&updated_set, &contacts));

        let resolved = {
            let _phase = PhaseTimer::new(&mut self.profiler.solver_time);
            self.physics.resolve_collisions(&contacts)
        };
        let mut resolved: Vec<BodyId> = resolved.into_iter().collect();
        resolved.sort_unstable();
        self.sync_masks(&resolved);

        let mut changed = integrated;
        changed.extend(resolved);
        changed.sort_unstable();
        changed.dedup();

        self.profiler.total_frame_time = started.elapsed();
        if let Some(budget) = self.config.frame_budget_ms {
            warn_if_frame_budget_exceeded(self.profiler.total_frame_time, budget);
        }
        self.profiler.report();
        trace!(
            "step: {} contacts, {} events, {} changed",
            contacts.len(),
            events.len(),
            changed.len()
        );

        StepReport {
            contacts,
            events,
            changed,
        }
    }

    /// Copies moved bodies' transforms into their masks and queues them
    /// for the next collision check.
    fn sync_masks(&mut self, moved: &[BodyId]) {
        for &id in moved {
            let Some(transform) = self.physics.body(id).map(|body| body.transform) else {
                continue;
            };
            if self.collision.set_transform(id, transform).is_ok() {
                self.pending_updates.insert(id);
            }
        }
    }
}

/// Builds a [`PhysicsWorld`] from a validated [`EngineConfig`].
#[derive(Debug, Clone, Default)]
pub struct PhysicsWorldBuilder {
    config: EngineConfig,
    parallel: bool,
}

impl PhysicsWorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cell_size(mut self, cell_size: f32) -> Self {
        self.config.cell_size = cell_size;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.config.anchor = anchor;
        self
    }

    pub fn impulse_scaler(mut self, impulse_scaler: f32) -> Self {
        self.config.impulse_scaler = impulse_scaler;
        self
    }

    pub fn penetration_slop(mut self, slop: f32) -> Self {
        self.config.penetration_slop = slop;
        self
    }

    pub fn correction_factor(mut self, factor: f32) -> Self {
        self.config.correction_factor = factor;
        self
    }

    pub fn dampening(mut self, dampening: f32) -> Self {
        self.config.dampening = dampening;
        self
    }

    pub fn frame_budget_ms(mut self, budget: f32) -> Self {
        self.config.frame_budget_ms = Some(budget);
        self
    }

    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn build(self) -> Result<PhysicsWorld> {
        self.config.validate()?;
        let mut world = PhysicsWorld::from_config(self.config);
        world.set_parallel_enabled(self.parallel);
        Ok(world)
    }
}
