use std::collections::HashSet;

use rect_physics::*;

fn contact(penetration: f32, normal: Vec2) -> CollisionResult {
    CollisionResult {
        pair: BodyPair::new(BodyId(1), BodyId(2)),
        penetration,
        normal,
        contact_point: Vec2::new(0.3, 0.1),
    }
}

fn solver_with_static_second(dynamic_flag: bool, mass: f32) -> PhysicsSolver {
    let mut solver = PhysicsSolver::default();
    solver
        .create_body(BodyId(1), Vec2::ONE, Vec2::ZERO, 0.0, Vec2::new(3.0, -1.0), 0.5)
        .expect("fresh id");
    solver
        .create_body(BodyId(2), Vec2::ONE, Vec2::new(0.6, 0.2), 0.3, Vec2::new(-2.0, 0.5), -1.0)
        .expect("fresh id");
    solver
        .update_body_properties(&[BodyPropertiesUpdate {
            id: BodyId(2),
            mass,
            inverse_mass: if mass > 0.0 { 1.0 / mass } else { 0.0 },
            restitution: 0.8,
            is_dynamic: dynamic_flag,
        }])
        .expect("registered");
    solver
}

#[test]
fn immovable_bodies_never_change() {
    let cases = [(false, 1.0), (true, 0.0), (true, -2.0), (false, 0.0)];
    let depths = [0.06, 0.5, 3.0, 40.0];
    let normals = [Vec2::X, Vec2::NEG_Y, Vec2::new(0.6, 0.8)];

    for (dynamic_flag, mass) in cases {
        for depth in depths {
            for normal in normals {
                let mut solver = solver_with_static_second(dynamic_flag, mass);
                let before = solver.body(BodyId(2)).expect("registered").clone();

                let moved = solver.resolve_collisions(&[contact(depth, normal)]);

                let after = solver.body(BodyId(2)).expect("registered");
                assert!(!moved.contains(&BodyId(2)));
                assert_eq!(after.transform, before.transform);
                assert_eq!(after.velocity, before.velocity);
                assert_eq!(after.angular_velocity, before.angular_velocity);
            }
        }
    }
}

#[test]
fn two_immovable_bodies_are_skipped_entirely() {
    let mut solver = solver_with_static_second(false, 1.0);
    solver
        .update_body_properties(&[BodyPropertiesUpdate {
            id: BodyId(1),
            mass: 1.0,
            inverse_mass: 1.0,
            restitution: 0.2,
            is_dynamic: false,
        }])
        .expect("registered");

    let moved = solver.resolve_collisions(&[contact(1.0, Vec2::X)]);
    assert_eq!(moved, HashSet::new());
    assert_eq!(
        solver.body(BodyId(1)).expect("registered").velocity,
        Vec2::new(3.0, -1.0)
    );
}

#[test]
fn heavier_bodies_move_less() {
    let mut solver = PhysicsSolver::default();
    solver
        .create_body(BodyId(1), Vec2::ONE, Vec2::ZERO, 0.0, Vec2::ZERO, 0.0)
        .expect("fresh id");
    solver
        .create_body(BodyId(2), Vec2::ONE, Vec2::new(0.5, 0.0), 0.0, Vec2::ZERO, 0.0)
        .expect("fresh id");
    solver
        .update_body_properties(&[BodyPropertiesUpdate {
            id: BodyId(2),
            mass: 3.0,
            inverse_mass: 1.0 / 3.0,
            restitution: 0.2,
            is_dynamic: true,
        }])
        .expect("registered");

    solver.resolve_collisions(&[contact(0.5, Vec2::X)]);

    let a = solver.body(BodyId(1)).expect("registered").transform.position.x;
    let b = solver.body(BodyId(2)).expect("registered").transform.position.x - 0.5;
    assert!((a + 0.3375).abs() < 1e-5, "a moved {a}");
    assert!((b - 0.1125).abs() < 1e-5, "b moved {b}");
}

#[test]
fn angular_velocity_responds_to_off_centre_contacts() {
    let mut solver = PhysicsSolver::default();
    solver
        .create_body(BodyId(1), Vec2::ONE, Vec2::ZERO, 0.0, Vec2::new(1.0, 0.0), 0.0)
        .expect("fresh id");
    solver
        .create_body(BodyId(2), Vec2::ONE, Vec2::new(0.9, 0.0), 0.0, Vec2::ZERO, 0.0)
        .expect("fresh id");

    // Contact above the line of centres.
    solver.resolve_collisions(&[CollisionResult {
        pair: BodyPair::new(BodyId(1), BodyId(2)),
        penetration: 0.1,
        normal: Vec2::X,
        contact_point: Vec2::new(0.45, 0.4),
    }]);

    let a = solver.body(BodyId(1)).expect("registered");
    let b = solver.body(BodyId(2)).expect("registered");
    assert!(a.velocity.x < 1.0);
    assert!(b.velocity.x > 0.0);
    assert!(a.angular_velocity != 0.0);
    assert!(b.angular_velocity != 0.0);
    assert!(a.angular_velocity.signum() != b.angular_velocity.signum());
}
