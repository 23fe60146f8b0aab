use rect_physics::*;

fn main() -> Result<()> {
    let mut world = PhysicsWorld::new();
    world.create_group("players")?;
    world.create_group("pickups")?;
    world.set_groups_collidable("players", "pickups", false)?;

    world.add_body(BodyId(1), BodyDesc::new(Vec2::ZERO, Vec2::ONE).group("players"))?;
    world.add_body(
        BodyId(2),
        BodyDesc::new(Vec2::new(0.4, 0.0), Vec2::ONE)
            .group("pickups")
            .collider_only(),
    )?;
    world.add_body(BodyId(3), BodyDesc::new(Vec2::new(-0.6, 0.0), Vec2::ONE))?;

    let report = world.step(1.0 / 60.0);
    for contact in &report.contacts {
        println!(
            "{} touches {} (depth {:.2}, normal {:?})",
            contact.pair.first(),
            contact.pair.second(),
            contact.penetration,
            contact.normal
        );
    }
    println!("moved: {:?}", report.changed);
    Ok(())
}
