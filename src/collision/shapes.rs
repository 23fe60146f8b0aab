use glam::Vec2;

/// Geometry kernel for oriented rectangles.
pub struct RectGeometry;

impl RectGeometry {
    /// World-space corners of a `width × height` rectangle centred on `(x, y)`
    /// and rotated by `rotation` radians. Degenerate sizes yield no vertices.
    pub fn compute_vertices(width: f32, height: f32, x: f32, y: f32, rotation: f32) -> Vec<Vec2> {
        let half_width = width * 0.5;
        let half_height = height * 0.5;
        Self::transform_corners(
            width,
            height,
            [
                Vec2::new(-half_width, -half_height),
                Vec2::new(half_width, -half_height),
                Vec2::new(half_width, half_height),
                Vec2::new(-half_width, half_height),
            ],
            Vec2::new(x, y),
            rotation,
        )
    }

    /// Same as [`Self::compute_vertices`] but with `(x, y)` naming the
    /// rectangle's unrotated min corner, rotating about that corner.
    pub fn compute_vertices_from_corner(
        width: f32,
        height: f32,
        x: f32,
        y: f32,
        rotation: f32,
    ) -> Vec<Vec2> {
        Self::transform_corners(
            width,
            height,
            [
                Vec2::ZERO,
                Vec2::new(width, 0.0),
                Vec2::new(width, height),
                Vec2::new(0.0, height),
            ],
            Vec2::new(x, y),
            rotation,
        )
    }

    fn transform_corners(
        width: f32,
        height: f32,
        local: [Vec2; 4],
        translation: Vec2,
        rotation: f32,
    ) -> Vec<Vec2> {
        if width <= 0.0 || height <= 0.0 {
            return Vec::new();
        }

        let rotation = Vec2::from_angle(rotation);
        local
            .iter()
            .map(|corner| translation + rotation.rotate(*corner))
            .collect()
    }

    /// Unit face normals, one per non-degenerate edge (wrapping).
    pub fn compute_axes(vertices: &[Vec2]) -> Vec<Vec2> {
        let count = vertices.len();
        let mut axes = Vec::with_capacity(count);

        for index in 0..count {
            let edge = vertices[(index + 1) % count] - vertices[index];
            let length = edge.length();
            if length == 0.0 {
                continue;
            }

            let edge = edge / length;
            axes.push(Vec2::new(edge.y, -edge.x));
        }

        axes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

    #[test]
    fn centred_vertices_are_symmetric_about_position() {
        let vertices = RectGeometry::compute_vertices(4.0, 2.0, 10.0, 5.0, 0.0);
        assert_eq!(vertices.len(), 4);
        assert!(vertices[0].abs_diff_eq(Vec2::new(8.0, 4.0), 1e-6));
        assert!(vertices[2].abs_diff_eq(Vec2::new(12.0, 6.0), 1e-6));
    }

    #[test]
    fn corner_vertices_start_at_position() {
        let vertices = RectGeometry::compute_vertices_from_corner(4.0, 2.0, 10.0, 5.0, 0.0);
        assert!(vertices[0].abs_diff_eq(Vec2::new(10.0, 5.0), 1e-6));
        assert!(vertices[2].abs_diff_eq(Vec2::new(14.0, 7.0), 1e-6));
    }

    #[test]
    fn quarter_turn_swaps_extents() {
        let vertices = RectGeometry::compute_vertices(4.0, 2.0, 0.0, 0.0, FRAC_PI_2);
        let max_x = vertices.iter().map(|v| v.x).fold(f32::MIN, f32::max);
        let max_y = vertices.iter().map(|v| v.y).fold(f32::MIN, f32::max);
        assert_abs_diff_eq!(max_x, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(max_y, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn axes_are_unit_and_perpendicular_for_any_rotation() {
        for step in 0..16 {
            let rotation = step as f32 * FRAC_PI_4 * 0.5;
            let vertices = RectGeometry::compute_vertices(3.0, 1.5, -2.0, 7.0, rotation);
            let axes = RectGeometry::compute_axes(&vertices);
            assert_eq!(axes.len(), 4);

            for (index, axis) in axes.iter().enumerate() {
                assert_abs_diff_eq!(axis.length(), 1.0, epsilon = 1e-5);
                let next = axes[(index + 1) % axes.len()];
                assert_abs_diff_eq!(axis.dot(next), 0.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn axes_point_outward() {
        let vertices = RectGeometry::compute_vertices(2.0, 2.0, 0.0, 0.0, 0.3);
        let axes = RectGeometry::compute_axes(&vertices);
        for (index, axis) in axes.iter().enumerate() {
            let midpoint = (vertices[index] + vertices[(index + 1) % 4]) * 0.5;
            assert!(axis.dot(midpoint) > 0.0, "axis {index} points inward");
        }
    }

    #[test]
    fn full_turn_returns_to_start() {
        let start = RectGeometry::compute_vertices(5.0, 3.0, 1.0, 2.0, 0.0);
        let turned = RectGeometry::compute_vertices(5.0, 3.0, 1.0, 2.0, TAU);
        for (a, b) in start.iter().zip(&turned) {
            assert!(a.abs_diff_eq(*b, 1e-4), "{a:?} != {b:?}");
        }
    }

    #[test]
    fn degenerate_sizes_have_no_shape() {
        assert!(RectGeometry::compute_vertices(0.0, 3.0, 0.0, 0.0, 0.0).is_empty());
        assert!(RectGeometry::compute_vertices(2.0, -1.0, 0.0, 0.0, 0.0).is_empty());
        assert!(RectGeometry::compute_axes(&[]).is_empty());
    }

    #[test]
    fn zero_length_edges_are_skipped() {
        let collapsed = [Vec2::ZERO, Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(1.0, 0.0)];
        let axes = RectGeometry::compute_axes(&collapsed);
        assert_eq!(axes.len(), 2);
    }
}
