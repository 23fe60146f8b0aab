use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Host-assigned identifier of a body, stable for the body's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl BodyId {
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl From<u32> for BodyId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which point of the rectangle `Transform2D::position` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Anchor {
    /// `position` is the rectangle's centre; corners sit at ± half extents.
    #[default]
    Center,
    /// `position` is the unrotated min corner; corners span `(0,0)`–`(w,h)`.
    TopLeft,
}

impl Anchor {
    /// Centre of mass of a rectangle placed with this anchor.
    pub fn center(self, position: Vec2, size: Vec2) -> Vec2 {
        match self {
            Anchor::Center => position,
            Anchor::TopLeft => position + size * 0.5,
        }
    }
}

/// Position, extent, and orientation (radians) of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub position: Vec2,
    pub size: Vec2,
    pub rotation: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            size: Vec2::ONE,
            rotation: 0.0,
        }
    }
}

impl Transform2D {
    pub fn new(position: Vec2, size: Vec2, rotation: f32) -> Self {
        Self {
            position,
            size,
            rotation,
        }
    }

    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            rotation: 0.0,
        }
    }

    /// A rectangle with no extent in either axis has no shape.
    pub fn is_degenerate(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }
}

/// How a body participates in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyType {
    #[default]
    Dynamic,
    Static,
    /// Moves by its own velocity; forces and contacts never push it.
    Kinematic,
}
