use std::collections::HashSet;
use std::f32::consts::{PI, TAU};

use approx::assert_abs_diff_eq;
use rect_physics::collision::GridCell;
use rect_physics::*;

fn rect(size: Vec2, position: Vec2, rotation: f32) -> (Vec<Vec2>, Vec<Vec2>) {
    let vertices = RectGeometry::compute_vertices(size.x, size.y, position.x, position.y, rotation);
    let axes = RectGeometry::compute_axes(&vertices);
    (vertices, axes)
}

#[test]
fn axes_stay_orthonormal_under_rotation() {
    for step in 0..16 {
        let angle = step as f32 * PI / 8.0;
        let (vertices, axes) = rect(Vec2::new(3.0, 1.5), Vec2::new(10.0, -4.0), angle);

        assert_eq!(vertices.len(), 4);
        assert_eq!(axes.len(), 4);
        for (index, axis) in axes.iter().enumerate() {
            assert_abs_diff_eq!(axis.length(), 1.0, epsilon = 1e-5);
            let next = axes[(index + 1) % axes.len()];
            assert_abs_diff_eq!(axis.dot(next), 0.0, epsilon = 1e-5);
        }
    }
}

#[test]
fn full_turn_returns_to_start() {
    let (start, _) = rect(Vec2::new(2.0, 5.0), Vec2::new(-3.0, 7.0), 0.0);
    let (turned, _) = rect(Vec2::new(2.0, 5.0), Vec2::new(-3.0, 7.0), TAU);

    for (a, b) in start.iter().zip(&turned) {
        assert!(a.abs_diff_eq(*b, 1e-4), "{a:?} vs {b:?}");
    }
}

#[test]
fn disjoint_boxes_exit_without_penetration() {
    let (va, aa) = rect(Vec2::ONE, Vec2::ZERO, 0.0);
    let (vb, ab) = rect(Vec2::ONE, Vec2::new(0.0, 5.0), 0.0);

    let result = SATAlgorithm::does_collide(&va, &aa, Vec2::ZERO, &vb, &ab, Vec2::new(0.0, 5.0));
    assert!(!result.collided);
    assert_eq!(result.penetration, 0.0);
}

#[test]
fn collision_is_symmetric_for_rotated_boxes() {
    let pos_a = Vec2::new(1.0, 1.0);
    let pos_b = Vec2::new(1.8, 1.3);
    let (va, aa) = rect(Vec2::new(2.0, 1.0), pos_a, 0.7);
    let (vb, ab) = rect(Vec2::new(1.0, 3.0), pos_b, -0.3);

    let forward = SATAlgorithm::does_collide(&va, &aa, pos_a, &vb, &ab, pos_b);
    let backward = SATAlgorithm::does_collide(&vb, &ab, pos_b, &va, &aa, pos_a);

    assert_eq!(forward.collided, backward.collided);
    assert!(forward.collided);
    assert_abs_diff_eq!(forward.penetration, backward.penetration, epsilon = 1e-5);
    assert!(forward.normal.abs_diff_eq(-backward.normal, 1e-5));
    assert!(forward.normal.dot(pos_b - pos_a) >= 0.0);
}

#[test]
fn grid_holds_every_spanned_cell_and_drops_old_ones() {
    let mut solver = CollisionSolver::new(60.0, Anchor::Center);
    let id = BodyId(3);
    solver
        .create_mask(id, Vec2::new(130.0, 70.0), Vec2::new(0.0, 0.0), 0.0)
        .expect("fresh id");

    // x in [-65, 65] -> -2..=1, y in [-35, 35] -> -1..=0
    let initial: HashSet<GridCell> = solver
        .mask(id)
        .expect("registered")
        .occupied_cells()
        .iter()
        .copied()
        .collect();
    assert_eq!(initial.len(), 4 * 2);
    for x in -2..=1 {
        for y in -1..=0 {
            assert!(solver.grid().contains((x, y), id));
        }
    }

    solver
        .set_transform(id, Transform2D::from_position_size(Vec2::new(270.0, 270.0), Vec2::splat(10.0)))
        .expect("registered");
    solver.check_collisions(&HashSet::from([id]), &[id]);

    let moved = solver.mask(id).expect("registered").occupied_cells().to_vec();
    assert_eq!(moved, vec![(4, 4)]);
    for cell in initial {
        assert!(!solver.grid().contains(cell, id), "stale entry in {cell:?}");
    }
}

#[test]
fn top_left_anchor_spans_position_to_position_plus_size() {
    let mut solver = CollisionSolver::new(60.0, Anchor::TopLeft);
    solver
        .create_mask(BodyId(1), Vec2::splat(20.0), Vec2::splat(50.0), 0.0)
        .expect("fresh id");

    let mask = solver.mask(BodyId(1)).expect("registered");
    assert_eq!(mask.vertices()[0], Vec2::splat(50.0));
    assert_eq!(mask.vertices()[2], Vec2::splat(70.0));
    assert_eq!(mask.occupied_cells().len(), 4);
}

#[test]
fn many_bodies_report_only_true_overlaps() {
    let mut solver = CollisionSolver::default();
    let mut valid = HashSet::new();
    let mut updated = Vec::new();

    // A row of 10 boxes, each overlapping only its right-hand neighbour.
    for i in 0..10u32 {
        let id = BodyId(i);
        solver
            .create_mask(id, Vec2::new(10.0, 10.0), Vec2::new(i as f32 * 9.0, 0.0), 0.0)
            .expect("fresh id");
        valid.insert(id);
        updated.push(id);
    }

    let results = solver.check_collisions(&valid, &updated);
    let pairs: HashSet<BodyPair> = results.iter().map(|result| result.pair).collect();
    let expected: HashSet<BodyPair> = (0..9u32)
        .map(|i| BodyPair::new(BodyId(i), BodyId(i + 1)))
        .collect();

    assert_eq!(pairs, expected);
    assert_eq!(results.len(), expected.len());
    for result in &results {
        assert_abs_diff_eq!(result.penetration, 1.0, epsilon = 1e-4);
        assert!(result.normal.abs_diff_eq(Vec2::X, 1e-5));
    }
}
