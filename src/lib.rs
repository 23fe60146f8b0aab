//! Rect Physics – 2D rigid-body core for oriented rectangles.
//!
//! Collision masks are placed in a persistent uniform grid, candidate pairs
//! are confirmed with the separating axis theorem, and overlapping dynamic
//! bodies are pushed apart with impulses and positional correction.
//! [`PhysicsWorld`] ties the pieces into a single per-step call; the
//! [`CollisionSolver`] and [`PhysicsSolver`] can also be driven directly.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod utils;
pub mod world;

pub use glam::Vec2;

pub use collision::{
    BodyPair, CollisionEvent, CollisionGroups, CollisionResult, CollisionSolver, GroupId,
    RectGeometry, SATAlgorithm, SatResult, SpatialGrid,
};
pub use config::EngineConfig;
pub use core::{
    Anchor, AppliedForce, BodyId, BodyPropertiesUpdate, BodyType, CollisionMask, PhysicsBody,
    Transform2D,
};
pub use dynamics::{ImpulseParams, ImpulseSolver, Integrator, PhysicsSolver};
pub use error::{PhysicsError, Result};
pub use utils::profiling::PhysicsProfiler;
pub use world::{BodyDesc, PhysicsWorld, PhysicsWorldBuilder, SharedWorld, StepReport};
