//! Core types describing bodies, collision masks, and shared value data.

pub mod mask;
pub mod rigidbody;
pub mod types;

pub use mask::CollisionMask;
pub use rigidbody::{AppliedForce, BodyPropertiesUpdate, PhysicsBody};
pub use types::{Anchor, BodyId, BodyType, Transform2D};
