//! Additional 2D math helpers layered on top of `glam`.

use glam::Vec2;

use crate::config::MOMENT_OF_INERTIA_CONSTANT;

/// Scalar 2D cross product `a.x * b.y - a.y * b.x`.
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Linear velocity of a point at lever arm `r` on a body spinning at `angular`.
#[inline]
pub fn angular_to_linear(angular: f32, r: Vec2) -> Vec2 {
    Vec2::new(-r.y * angular, r.x * angular)
}

/// Moment of inertia of a solid rectangle about its centre.
pub fn rect_moment_of_inertia(mass: f32, size: Vec2) -> f32 {
    MOMENT_OF_INERTIA_CONSTANT * mass * (size.x * size.x + size.y * size.y)
}
