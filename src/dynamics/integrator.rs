use glam::Vec2;

use crate::{
    config::EngineConfig,
    core::{rigidbody::PhysicsBody, types::BodyId},
};

/// Advances bodies by their accumulated forces and velocities.
///
/// Forces and velocities decay by `max(1 - dampening * dt, 0)` every step;
/// anything whose magnitude falls to `force_threshold` or below is dropped.
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    pub dampening: f32,
    pub force_threshold: f32,
}

impl Default for Integrator {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl Integrator {
    pub fn new(dampening: f32, force_threshold: f32) -> Self {
        Self {
            dampening,
            force_threshold,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.dampening, config.force_threshold)
    }

    pub fn decay(&self, dt: f32) -> f32 {
        (1.0 - self.dampening * dt).max(0.0)
    }

    /// Steps every dynamic and kinematic body and returns those whose
    /// transform changed.
    pub fn step<'a>(
        &self,
        bodies: impl IntoIterator<Item = &'a mut PhysicsBody>,
        dt: f32,
    ) -> Vec<BodyId> {
        if dt <= 0.0 {
            return Vec::new();
        }

        let decay = self.decay(dt);
        bodies
            .into_iter()
            .filter_map(|body| {
                let moved = if body.is_dynamic() {
                    self.integrate_body(body, dt, decay)
                } else if body.is_kinematic() {
                    self.integrate_kinematic(body, dt, decay)
                } else {
                    false
                };
                moved.then_some(body.id)
            })
            .collect()
    }

    /// Returns whether position or rotation changed.
    pub fn integrate_body(&self, body: &mut PhysicsBody, dt: f32, decay: f32) -> bool {
        let (force, torque) = self.accumulate_forces(body, decay);
        body.velocity += force * body.inverse_mass() * dt;
        body.angular_velocity += torque * body.inverse_mass() * dt;
        self.advance(body, dt, decay)
    }

    /// Moves a kinematic body along its velocities. Stored forces are left
    /// untouched and never act on it.
    pub fn integrate_kinematic(&self, body: &mut PhysicsBody, dt: f32, decay: f32) -> bool {
        self.advance(body, dt, decay)
    }

    fn advance(&self, body: &mut PhysicsBody, dt: f32, decay: f32) -> bool {
        if body.velocity.length() <= self.force_threshold {
            body.velocity = Vec2::ZERO;
        } else {
            body.velocity *= decay;
        }

        if body.angular_velocity.abs() <= self.force_threshold {
            body.angular_velocity = 0.0;
        } else {
            body.angular_velocity *= decay;
        }

        let moved = body.velocity != Vec2::ZERO || body.angular_velocity != 0.0;
        body.transform.position += body.velocity * dt;
        body.transform.rotation += body.angular_velocity * dt;
        moved
    }

    /// Decays stored forces, drops spent ones, and sums the rest into a net
    /// force and torque about the body centre.
    fn accumulate_forces(&self, body: &mut PhysicsBody, decay: f32) -> (Vec2, f32) {
        let threshold = self.force_threshold;
        body.forces.retain_mut(|applied| {
            applied.force *= decay;
            applied.force.length() > threshold
        });

        body.forces
            .iter()
            .fold((Vec2::ZERO, 0.0), |(force, torque), applied| {
                let arm = applied.point - Vec2::splat(0.5);
                let f = applied.force;
                (force + f, torque + f.x * arm.y - f.y * arm.x)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{BodyType, Transform2D};
    use approx::assert_abs_diff_eq;

    fn body(velocity: Vec2) -> PhysicsBody {
        PhysicsBody::new(BodyId(1), Transform2D::default(), velocity, 0.0, 1.0, 0.2)
    }

    #[test]
    fn velocity_decays_and_moves_the_body() {
        let integrator = Integrator::default();
        let mut moving = body(Vec2::new(1.0, 0.0));

        let moved = integrator.step([&mut moving], 0.1);

        assert_eq!(moved, vec![BodyId(1)]);
        assert_abs_diff_eq!(moving.velocity.x, 0.92, epsilon = 1e-6);
        assert_abs_diff_eq!(moving.transform.position.x, 0.092, epsilon = 1e-6);
    }

    #[test]
    fn centred_force_accelerates_without_spin() {
        let integrator = Integrator::default();
        let mut pushed = body(Vec2::ZERO);
        pushed.add_force(Vec2::new(10.0, 0.0), Vec2::splat(0.5));

        integrator.step([&mut pushed], 0.1);

        // 10 decays to 9.2, adds 0.92, then the velocity decays to 0.8464.
        assert_abs_diff_eq!(pushed.forces[0].force.x, 9.2, epsilon = 1e-5);
        assert_abs_diff_eq!(pushed.velocity.x, 0.8464, epsilon = 1e-5);
        assert_eq!(pushed.angular_velocity, 0.0);
    }

    #[test]
    fn off_centre_force_spins_the_body() {
        let integrator = Integrator::default();
        let mut pushed = body(Vec2::ZERO);
        pushed.add_force(Vec2::new(0.0, 10.0), Vec2::new(1.0, 0.5));

        integrator.step([&mut pushed], 0.1);

        // torque = f.x * arm.y - f.y * arm.x = -9.2 * 0.5
        assert_abs_diff_eq!(pushed.angular_velocity, -0.46 * 0.92, epsilon = 1e-5);
        assert!(pushed.transform.rotation < 0.0);
    }

    #[test]
    fn small_values_snap_to_rest() {
        let integrator = Integrator::default();
        let mut drifting = body(Vec2::new(0.005, 0.0));
        drifting.add_force(Vec2::new(0.0105, 0.0), Vec2::splat(0.5));

        let moved = integrator.step([&mut drifting], 0.1);

        assert!(moved.is_empty());
        assert!(drifting.forces.is_empty());
        assert_eq!(drifting.velocity, Vec2::ZERO);
        assert_eq!(drifting.transform.position, Vec2::ZERO);
    }

    #[test]
    fn non_dynamic_bodies_are_skipped() {
        let integrator = Integrator::default();
        let mut anchored = body(Vec2::new(3.0, 0.0));
        anchored.set_anchored(true);

        assert!(integrator.step([&mut anchored], 0.1).is_empty());
        assert_eq!(anchored.transform.position, Vec2::ZERO);
    }

    #[test]
    fn kinematic_bodies_follow_velocity_but_ignore_forces() {
        let integrator = Integrator::default();
        let mut mover = body(Vec2::new(5.0, 0.0));
        mover.set_body_type(BodyType::Kinematic);
        mover.add_force(Vec2::new(0.0, 100.0), Vec2::splat(0.5));

        let moved = integrator.step([&mut mover], 0.1);

        assert_eq!(moved, vec![BodyId(1)]);
        assert_abs_diff_eq!(mover.velocity.x, 4.6, epsilon = 1e-5);
        assert_abs_diff_eq!(mover.transform.position.x, 0.46, epsilon = 1e-5);
        assert_eq!(mover.velocity.y, 0.0);
        assert_eq!(mover.forces.len(), 1);
    }

    #[test]
    fn static_and_anchored_kinematic_bodies_stay_put() {
        let integrator = Integrator::default();
        let mut fixed = body(Vec2::new(5.0, 0.0));
        fixed.set_body_type(BodyType::Static);
        let mut pinned = body(Vec2::new(5.0, 0.0));
        pinned.set_body_type(BodyType::Kinematic);
        pinned.set_anchored(true);

        assert!(integrator.step([&mut fixed, &mut pinned], 0.1).is_empty());
        assert_eq!(fixed.transform.position, Vec2::ZERO);
        assert_eq!(pinned.transform.position, Vec2::ZERO);
    }

    #[test]
    fn large_steps_clamp_decay_at_zero() {
        let integrator = Integrator::default();
        assert_eq!(integrator.decay(2.0), 0.0);
        assert_abs_diff_eq!(integrator.decay(0.5), 0.6, epsilon = 1e-6);
    }
}
