use tank_core::{CollisionWorld, TickContext, Vec2};

#[test]
fn tick_context_advances_and_tracks_time() {
    let ctx = TickContext::new(0, 0.5);
    let later = ctx.next().next().next();

    assert_eq!(later.tick, 3);
    assert_eq!(later.dt_seconds, 0.5);
    assert_eq!(later.elapsed_seconds(), 1.5);
}

#[test]
fn move_towards_stops_at_the_target() {
    let from = Vec2::new(0.0, 0.0);
    let to = Vec2::new(3.0, 4.0);

    assert_eq!(from.move_towards(to, 2.5), Vec2::new(1.5, 2.0));
    assert_eq!(from.move_towards(to, 10.0), to);
    assert_eq!(to.move_towards(to, 1.0), to);
}

#[test]
fn vector_helpers() {
    let v = Vec2::new(3.0, -4.0);

    assert_eq!(v.length(), 5.0);
    let n = v.normalize_or_zero();
    assert!((n.x - 0.6).abs() < 1e-6 && (n.y + 0.8).abs() < 1e-6);
    assert_eq!(Vec2::ZERO.normalize_or_zero(), Vec2::ZERO);
    assert_eq!(v.perp(), Vec2::new(4.0, 3.0));
    assert_eq!(v.dot(v.perp()), 0.0);
    assert!(Vec2::new(1.0, 0.0).perp_dot(Vec2::new(0.0, 1.0)) > 0.0);
    assert_eq!(-v + v, Vec2::ZERO);
    assert!(!Vec2::new(f32::NAN, 0.0).is_finite());
}

struct Walled;

impl CollisionWorld for Walled {
    fn is_point_in_solid(&self, position: Vec2, clearance_radius: f32, _h: f32) -> bool {
        position.x.abs() <= clearance_radius
    }

    fn world_size(&self) -> f32 {
        200.0
    }
}

#[test]
fn collision_world_bounds_and_forwarding() {
    let world = Walled;
    let by_ref = &world;

    assert_eq!(world.half_extent(), 100.0);
    assert!(world.contains(Vec2::new(-100.0, 100.0)));
    assert!(!world.contains(Vec2::new(100.5, 0.0)));
    assert!(by_ref.is_point_in_solid(Vec2::new(3.0, 50.0), 4.0, 1.0));
    assert!(!by_ref.is_point_in_solid(Vec2::new(5.0, 50.0), 4.0, 1.0));
    assert_eq!(by_ref.world_size(), 200.0);
}
