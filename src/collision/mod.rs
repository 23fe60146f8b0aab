//! Collision detection: rectangle geometry, grid broad phase, SAT narrow phase,
//! collision groups, and contact events.

pub mod broadphase;
pub mod contact;
pub mod events;
pub mod groups;
pub mod narrowphase;
pub mod shapes;
pub mod solver;

pub use broadphase::{Aabb2, GridCell, SpatialGrid};
pub use contact::{BodyPair, CollisionResult};
pub use events::{CollisionEvent, ContactTracker};
pub use groups::{CollisionGroups, DEFAULT_COLLISION_GROUP, GroupId};
pub use narrowphase::{SATAlgorithm, SatContact, SatResult};
pub use shapes::RectGeometry;
pub use solver::{CheckStats, CollisionSolver};
