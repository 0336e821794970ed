use core::f64::consts::SQRT_2;

use proptest::prelude::*;
use tank_core::CollisionWorld;
use tank_nav::{
    GridDescriptor, NavConfig, Obstacle, ObstacleWorld, QuantizedNode, SearchGraph, SearchNode,
    Vec2,
};

fn open_descriptor(world_size: f32, stride: i32) -> GridDescriptor<ObstacleWorld> {
    GridDescriptor::new(
        ObstacleWorld::new(world_size),
        &NavConfig::default().with_stride(stride),
    )
}

proptest! {
    #[test]
    fn successors_are_the_eight_neighbors_one_stride_away(
        x in -10_000i32..10_000,
        y in -10_000i32..10_000,
        stride in 1i32..64,
    ) {
        let graph = open_descriptor(800.0, stride);
        let node = QuantizedNode::new(x, y, stride);
        let mut out = Vec::new();
        graph.successors(&node, &mut out);

        prop_assert_eq!(out.len(), 8);
        for (next, cost) in &out {
            let dx = next.x - node.x;
            let dy = next.y - node.y;
            prop_assert!(dx.abs() == stride || dx == 0);
            prop_assert!(dy.abs() == stride || dy == 0);
            prop_assert!(dx != 0 || dy != 0);

            let expected = if dx != 0 && dy != 0 { SQRT_2 } else { 1.0 };
            prop_assert_eq!(*cost, expected);
        }

        let diagonals = out.iter().filter(|(_, c)| *c == SQRT_2).count();
        prop_assert_eq!(diagonals, 4);
    }

    #[test]
    fn matching_lattice_nodes_share_a_hash_bin(
        x in -10_000i32..10_000,
        y in -10_000i32..10_000,
        dx in -40i32..40,
        dy in -40i32..40,
        stride in 2i32..32,
    ) {
        let graph = open_descriptor(800.0, stride);
        let a = QuantizedNode::new(x, y, stride).rounded();
        let b = QuantizedNode::new(x + dx, y + dy, stride).rounded();

        if a.matches(&b) {
            prop_assert_eq!(a, b);
            prop_assert_eq!(graph.hash_bin(&a), graph.hash_bin(&b));
        }
    }

    #[test]
    fn in_bounds_agrees_with_the_world(
        x in -600i32..600,
        y in -600i32..600,
        world_size in prop::sample::select(vec![100.0f32, 400.0, 800.0, 1001.0]),
    ) {
        let graph = open_descriptor(world_size, 1);
        let node = QuantizedNode::new(x, y, 1);
        let half = world_size / 2.0;
        let expected = (x as f32).abs() <= half && (y as f32).abs() <= half;

        prop_assert_eq!(graph.in_bounds(&node), expected);
        prop_assert_eq!(graph.in_bounds(&node), graph.world().contains(node.to_world()));
    }
}

#[test]
fn successors_clear_the_output_buffer_first() {
    let graph = open_descriptor(800.0, 10);
    let node = QuantizedNode::new(0, 0, 10);
    let mut out = vec![(QuantizedNode::new(999, 999, 10), 123.0); 5];

    graph.successors(&node, &mut out);
    graph.successors(&node, &mut out);

    assert_eq!(out.len(), 8);
    assert!(out.iter().all(|(n, _)| n.x != 999));
}

#[test]
fn successors_do_not_filter_blocked_neighbors() {
    let world = ObstacleWorld::new(800.0).with_obstacle(Obstacle::new(
        Vec2::new(10.0, 0.0),
        Vec2::new(1.0, 1.0),
        5.0,
    ));
    let graph = GridDescriptor::new(world, &NavConfig::default());
    let node = QuantizedNode::new(0, 0, 10);

    let mut out = Vec::new();
    graph.successors(&node, &mut out);

    let blocked: Vec<_> = out.iter().filter(|(n, _)| !graph.is_accessible(n)).collect();
    assert_eq!(out.len(), 8);
    assert_eq!(blocked.len(), 1);
    assert_eq!((blocked[0].0.x, blocked[0].0.y), (10, 0));
}

#[test]
fn nodes_outside_the_map_are_inaccessible() {
    for world_size in [100.0f32, 400.0, 800.0, 1600.0] {
        let graph = open_descriptor(world_size, 1);
        let half = (world_size / 2.0) as i32;

        for (x, y) in [
            (half + 1, 0),
            (-half - 1, 0),
            (0, half + 1),
            (0, -half - 1),
            (half + 50, half + 50),
        ] {
            assert!(
                !graph.is_accessible(&QuantizedNode::new(x, y, 1)),
                "({x}, {y}) should be off a {world_size} map"
            );
        }

        for (x, y) in [(half, half), (-half, -half), (0, 0), (half, -half)] {
            assert!(
                graph.is_accessible(&QuantizedNode::new(x, y, 1)),
                "({x}, {y}) should be on a {world_size} map"
            );
        }
    }
}

#[test]
fn obstacles_block_nodes_within_clearance() {
    let world = ObstacleWorld::new(800.0).with_obstacle(Obstacle::new(
        Vec2::new(0.0, 0.0),
        Vec2::new(10.0, 10.0),
        8.0,
    ));
    let config = NavConfig::default();
    let graph = GridDescriptor::new(world, &config);

    assert!(!graph.is_accessible(&QuantizedNode::new(0, 0, 10)));
    // Footprint edge at 10, tank radius 4.32: 14 is too close, 15 clears it.
    assert!(!graph.is_accessible(&QuantizedNode::new(14, 0, 10)));
    assert!(graph.is_accessible(&QuantizedNode::new(15, 0, 10)));
}

#[test]
fn raised_obstacles_leave_room_underneath() {
    let world = ObstacleWorld::new(800.0).with_obstacle(
        Obstacle::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), 5.0).raised(10.0),
    );
    let graph = GridDescriptor::new(world, &NavConfig::default());

    assert!(graph.is_accessible(&QuantizedNode::new(0, 0, 10)));
}

#[test]
fn heuristic_is_euclidean_in_lattice_steps() {
    let graph = open_descriptor(800.0, 10);
    let a = QuantizedNode::new(0, 0, 10);

    assert_eq!(graph.heuristic(&a, &a), 0.0);
    assert!((graph.heuristic(&a, &QuantizedNode::new(30, 40, 10)) - 5.0).abs() < 1e-12);
    assert!((graph.heuristic(&a, &QuantizedNode::new(20, 20, 10)) - 2.0 * SQRT_2).abs() < 1e-12);
}

#[test]
fn heuristic_never_exceeds_a_single_step_cost() {
    let graph = open_descriptor(800.0, 7);
    let node = QuantizedNode::new(14, -21, 7);
    let mut out = Vec::new();
    graph.successors(&node, &mut out);

    for (next, cost) in out {
        assert!(graph.heuristic(&node, &next) <= cost + 1e-12);
    }
}

#[test]
fn nodes_in_the_same_cell_share_a_hash_bin() {
    let graph = open_descriptor(800.0, 10);

    let a = QuantizedNode::new(20, -30, 10);
    let b = QuantizedNode::new(27, -21, 10);
    let c = QuantizedNode::new(30, -30, 10);

    assert_eq!(graph.hash_bin(&a), graph.hash_bin(&b));
    assert_ne!(graph.hash_bin(&a), graph.hash_bin(&c));
}

#[test]
fn unrounded_neighbors_can_match_across_cells() {
    let graph = open_descriptor(800.0, 10);
    let a = QuantizedNode::new(9, 0, 10);
    let b = QuantizedNode::new(10, 0, 10);

    assert!(a.matches(&b));
    assert_ne!(graph.hash_bin(&a), graph.hash_bin(&b));
    assert_ne!(graph.hash_bin(&a.rounded()), graph.hash_bin(&b.rounded()));
    assert!(!a.rounded().matches(&b.rounded()));
}

#[test]
fn nodes_beyond_the_integer_range_of_the_map_are_out_of_bounds() {
    let graph = open_descriptor(800.0, 10);

    assert!(!graph.in_bounds(&graph.node_at(Vec2::new(-3.0e9, 0.0))));
    assert!(!graph.in_bounds(&graph.node_at(Vec2::new(0.0, 3.0e9))));
    assert!(graph.in_bounds(&graph.node_at(Vec2::new(400.0, -400.0))));
}

#[test]
fn node_at_snaps_world_positions() {
    let graph = open_descriptor(800.0, 10);
    let node = graph.node_at(Vec2::new(-3.2, 18.9));
    assert_eq!((node.x, node.y, node.stride()), (-10, 10, 10));
}
