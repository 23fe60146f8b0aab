use rect_physics::*;

fn main() -> Result<()> {
    let mut world = PhysicsWorld::builder().frame_budget_ms(16.0).build()?;

    let floor = BodyId(0);
    world.add_body(
        floor,
        BodyDesc::new(Vec2::new(0.0, -5.0), Vec2::new(40.0, 2.0)).body_type(BodyType::Static),
    )?;

    let crate_id = BodyId(1);
    world.add_body(
        crate_id,
        BodyDesc::new(Vec2::new(0.0, -3.6), Vec2::new(2.0, 2.0))
            .rotation(0.2)
            .velocity(Vec2::new(3.0, -1.0))
            .restitution(0.1),
    )?;
    world.apply_force(crate_id, Vec2::new(0.0, -20.0), Vec2::new(0.5, 0.5))?;

    for frame in 0..120 {
        let report = world.step(1.0 / 60.0);
        for event in &report.events {
            println!("frame {frame}: {event:?}");
        }
    }

    if let Some(transform) = world.transform(crate_id) {
        println!(
            "Crate after two seconds: position {:?}, rotation {:.3}",
            transform.position, transform.rotation
        );
    }
    Ok(())
}
