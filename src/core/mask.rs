use glam::Vec2;

use super::types::{Anchor, BodyId, Transform2D};
use crate::collision::{
    broadphase::{Aabb2, GridCell},
    groups::GroupId,
    shapes::RectGeometry,
};

/// Collision geometry of one body plus its current broad-phase footprint.
#[derive(Debug, Clone)]
pub struct CollisionMask {
    pub id: BodyId,
    pub transform: Transform2D,
    pub group: GroupId,
    vertices: Vec<Vec2>,
    axes: Vec<Vec2>,
    pub(crate) occupied_cells: Vec<GridCell>,
}

impl CollisionMask {
    /// Builds a mask and computes its geometry. Grid placement is the
    /// caller's job since the grid is owned by the collision solver.
    pub fn new(id: BodyId, transform: Transform2D, anchor: Anchor) -> Self {
        let mut mask = Self {
            id,
            transform,
            group: GroupId::DEFAULT,
            vertices: Vec::with_capacity(4),
            axes: Vec::with_capacity(4),
            occupied_cells: Vec::new(),
        };
        mask.recompute_geometry(anchor);
        mask
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn axes(&self) -> &[Vec2] {
        &self.axes
    }

    pub fn occupied_cells(&self) -> &[GridCell] {
        &self.occupied_cells
    }

    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    pub fn is_degenerate(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Recomputes vertices and axes from the current transform.
    pub fn recompute_geometry(&mut self, anchor: Anchor) {
        let Transform2D {
            position,
            size,
            rotation,
        } = self.transform;

        self.vertices = match anchor {
            Anchor::Center => {
                RectGeometry::compute_vertices(size.x, size.y, position.x, position.y, rotation)
            }
            Anchor::TopLeft => RectGeometry::compute_vertices_from_corner(
                size.x, size.y, position.x, position.y, rotation,
            ),
        };
        self.axes = RectGeometry::compute_axes(&self.vertices);
    }

    /// World-space bounds of the current vertices, `None` when degenerate.
    pub fn bounds(&self) -> Option<Aabb2> {
        Aabb2::from_points(&self.vertices)
    }
}
