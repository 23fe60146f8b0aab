//! Simulation dynamics: force integration and impulse-based contact resolution.

pub mod integrator;
pub mod solver;

pub use integrator::Integrator;
pub use solver::{ImpulseParams, ImpulseSolver, PairOutcome, PhysicsSolver};
