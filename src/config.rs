//! Global configuration constants and the tunable engine configuration.

use serde::{Deserialize, Serialize};

use crate::{
    core::types::Anchor,
    error::{PhysicsError, Result},
};

/// Edge length of a broad-phase grid cell, in world units.
pub const DEFAULT_CELL_SIZE: f32 = 60.0;

/// Penetration depth at or below which a contact is ignored.
pub const DEFAULT_PENETRATION_SLOP: f32 = 0.05;

/// Fraction of the (slop-adjusted) penetration removed by positional correction.
pub const DEFAULT_CORRECTION_FACTOR: f32 = 1.0;

/// Approach speed along the normal below which no impulse is applied.
pub const DEFAULT_IMPULSE_EPSILON: f32 = 0.001;

/// Global multiplier applied to every collision impulse.
pub const DEFAULT_IMPULSE_SCALER: f32 = 1.5;

/// Mass given to newly created bodies.
pub const DEFAULT_MASS: f32 = 1.0;

/// Restitution given to newly created bodies.
pub const DEFAULT_RESTITUTION: f32 = 0.2;

/// Rectangle moment of inertia constant: `I = k * m * (w² + h²)`.
pub const MOMENT_OF_INERTIA_CONSTANT: f32 = 1.0 / 12.0;

/// Per-second decay applied to forces and velocities.
pub const DEFAULT_DAMPENING: f32 = 0.8;

/// Magnitude under which forces are dropped and velocities snap to zero.
pub const DEFAULT_FORCE_THRESHOLD: f32 = 0.01;

/// Tunable parameters for a [`crate::PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub cell_size: f32,
    pub anchor: Anchor,
    pub penetration_slop: f32,
    pub correction_factor: f32,
    pub impulse_epsilon: f32,
    pub impulse_scaler: f32,
    pub default_mass: f32,
    pub default_restitution: f32,
    pub dampening: f32,
    pub force_threshold: f32,
    /// Optional per-step budget; exceeding it logs a warning.
    pub frame_budget_ms: Option<f32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            anchor: Anchor::default(),
            penetration_slop: DEFAULT_PENETRATION_SLOP,
            correction_factor: DEFAULT_CORRECTION_FACTOR,
            impulse_epsilon: DEFAULT_IMPULSE_EPSILON,
            impulse_scaler: DEFAULT_IMPULSE_SCALER,
            default_mass: DEFAULT_MASS,
            default_restitution: DEFAULT_RESTITUTION,
            dampening: DEFAULT_DAMPENING,
            force_threshold: DEFAULT_FORCE_THRESHOLD,
            frame_budget_ms: None,
        }
    }
}

impl EngineConfig {
    /// Rejects values that would make the grid or solver misbehave.
    pub fn validate(&self) -> Result<()> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(PhysicsError::InvalidConfiguration(
                "cell_size must be a positive finite number",
            ));
        }
        if self.penetration_slop < 0.0 {
            return Err(PhysicsError::InvalidConfiguration(
                "penetration_slop must not be negative",
            ));
        }
        if self.correction_factor < 0.0 {
            return Err(PhysicsError::InvalidConfiguration(
                "correction_factor must not be negative",
            ));
        }
        if self.impulse_epsilon < 0.0 {
            return Err(PhysicsError::InvalidConfiguration(
                "impulse_epsilon must not be negative",
            ));
        }
        if !self.impulse_scaler.is_finite() {
            return Err(PhysicsError::InvalidConfiguration(
                "impulse_scaler must be finite",
            ));
        }
        if self.dampening < 0.0 {
            return Err(PhysicsError::InvalidConfiguration(
                "dampening must not be negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.default_restitution) {
            return Err(PhysicsError::InvalidConfiguration(
                "default_restitution must lie in [0, 1]",
            ));
        }
        Ok(())
    }
}
