use std::cmp::Ordering;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::mask::CollisionMask;

/// Penetration data for a pair of overlapping polygons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SatContact {
    /// Unit normal pointing from the first polygon toward the second.
    pub normal: Vec2,
    pub depth: f32,
    pub point: Vec2,
}

/// Flat outcome of a SAT test. Derived fields are zeroed when not collided.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SatResult {
    pub collided: bool,
    pub normal: Vec2,
    pub penetration: f32,
    pub contact_point: Vec2,
}

impl SatResult {
    pub fn separated() -> Self {
        Self::default()
    }

    pub fn contact(&self) -> Option<SatContact> {
        self.collided.then_some(SatContact {
            normal: self.normal,
            depth: self.penetration,
            point: self.contact_point,
        })
    }
}

impl From<Option<SatContact>> for SatResult {
    fn from(contact: Option<SatContact>) -> Self {
        match contact {
            Some(contact) => Self {
                collided: true,
                normal: contact.normal,
                penetration: contact.depth,
                contact_point: contact.point,
            },
            None => Self::separated(),
        }
    }
}

/// Separating axis theorem for convex polygons.
pub struct SATAlgorithm;

impl SATAlgorithm {
    /// Scalar interval covered by `vertices` along `axis`.
    pub fn project_polygon(axis: Vec2, vertices: &[Vec2]) -> (f32, f32) {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;

        for vertex in vertices {
            let projection = vertex.dot(axis);
            min = min.min(projection);
            max = max.max(projection);
        }

        (min, max)
    }

    /// Tests two polygons for overlap, returning the minimum translation
    /// data oriented from `position_a` toward `position_b`.
    ///
    /// When the positions coincide along the chosen axis, the normal is
    /// oriented by comparing the two vertex lists, so swapping the arguments
    /// still flips it. Identical polygons get the same normal either way.
    ///
    /// The contact point is `position_a` advanced half the penetration along
    /// the normal, an approximation rather than a clipped contact manifold.
    pub fn intersect(
        vertices_a: &[Vec2],
        axes_a: &[Vec2],
        position_a: Vec2,
        vertices_b: &[Vec2],
        axes_b: &[Vec2],
        position_b: Vec2,
    ) -> Option<SatContact> {
        if vertices_a.is_empty() || vertices_b.is_empty() {
            return None;
        }

        let mut min_overlap = f32::MAX;
        let mut min_axis = None;

        for &axis in axes_a.iter().chain(axes_b) {
            let (min_a, max_a) = Self::project_polygon(axis, vertices_a);
            let (min_b, max_b) = Self::project_polygon(axis, vertices_b);

            if min_a > max_b || min_b > max_a {
                return None;
            }

            let overlap = max_a.min(max_b) - min_a.max(min_b);
            if overlap < min_overlap {
                min_overlap = overlap;
                min_axis = Some(axis);
            }
        }

        // No axes means neither shape has an edge to test against.
        let mut axis = min_axis?;
        let offset = (position_b - position_a).dot(axis);
        if offset < 0.0 || (offset == 0.0 && Self::tie_break_flips(axis, vertices_a, vertices_b)) {
            axis = -axis;
        }

        let normal = axis.normalize_or_zero();
        Some(SatContact {
            normal,
            depth: min_overlap,
            point: position_a + axis * (min_overlap * 0.5),
        })
    }

    /// Canonical axis sign when `vertices_a` orders first, reversed otherwise.
    fn tie_break_flips(axis: Vec2, vertices_a: &[Vec2], vertices_b: &[Vec2]) -> bool {
        let canonical = axis.x > 0.0 || (axis.x == 0.0 && axis.y > 0.0);
        let a_first = Self::order_vertices(vertices_a, vertices_b) != Ordering::Greater;
        canonical != a_first
    }

    fn order_vertices(vertices_a: &[Vec2], vertices_b: &[Vec2]) -> Ordering {
        vertices_a
            .iter()
            .zip(vertices_b)
            .map(|(a, b)| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| vertices_a.len().cmp(&vertices_b.len()))
    }

    /// Host-facing form of [`Self::intersect`].
    pub fn does_collide(
        vertices_a: &[Vec2],
        axes_a: &[Vec2],
        position_a: Vec2,
        vertices_b: &[Vec2],
        axes_b: &[Vec2],
        position_b: Vec2,
    ) -> SatResult {
        Self::intersect(vertices_a, axes_a, position_a, vertices_b, axes_b, position_b).into()
    }

    pub fn intersect_masks(mask_a: &CollisionMask, mask_b: &CollisionMask) -> Option<SatContact> {
        Self::intersect(
            mask_a.vertices(),
            mask_a.axes(),
            mask_a.position(),
            mask_b.vertices(),
            mask_b.axes(),
            mask_b.position(),
        )
    }
}
