use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::types::BodyId;

/// Unordered pair of bodies stored with the smaller id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyPair(BodyId, BodyId);

impl BodyPair {
    pub fn new(a: BodyId, b: BodyId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn first(&self) -> BodyId {
        self.0
    }

    pub fn second(&self) -> BodyId {
        self.1
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.0 == id || self.1 == id
    }
}

/// One overlapping pair found by a collision check.
///
/// `normal` points from `pair.first()` toward `pair.second()`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionResult {
    pub pair: BodyPair,
    pub penetration: f32,
    pub normal: Vec2,
    pub contact_point: Vec2,
}
