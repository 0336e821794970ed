use core::f64::consts::SQRT_2;

use tank_core::{CollisionWorld, Vec2};

use crate::{NavConfig, QuantizedNode, SearchGraph};

/// The 8-connected planning lattice over a collision world.
///
/// Costs and the heuristic are measured in lattice steps, so an axis-aligned step costs 1
/// and a diagonal step costs `sqrt(2)` whatever the stride.
#[derive(Debug, Clone)]
pub struct GridDescriptor<W> {
    world: W,
    stride: i32,
    clearance_radius: f32,
    clearance_height: f32,
}

impl<W: CollisionWorld> GridDescriptor<W> {
    pub fn new(world: W, config: &NavConfig) -> Self {
        Self {
            world,
            stride: config.stride.max(1),
            clearance_radius: config.clearance_radius,
            clearance_height: config.clearance_height,
        }
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn stride(&self) -> i32 {
        self.stride
    }

    /// Lattice node for the cell containing `p`.
    pub fn node_at(&self, p: Vec2) -> QuantizedNode {
        QuantizedNode::snapped(p, self.stride)
    }

    /// Inside the world square; see [`CollisionWorld::contains`].
    pub fn in_bounds(&self, node: &QuantizedNode) -> bool {
        self.world.contains(node.to_world())
    }
}

impl<W: CollisionWorld> SearchGraph for GridDescriptor<W> {
    type Node = QuantizedNode;

    /// Lattice cell of the node. Agrees with `matches` for rounded nodes only: with
    /// stride 10, `(9, 0)` and `(10, 0)` match but fall in different cells.
    fn hash_bin(&self, node: &QuantizedNode) -> u64 {
        let (cx, cy) = node.cell();
        (u64::from(cx as u32) << 32) | u64::from(cy as u32)
    }

    fn is_accessible(&self, node: &QuantizedNode) -> bool {
        self.in_bounds(node)
            && !self.world.is_point_in_solid(
                node.to_world(),
                self.clearance_radius,
                self.clearance_height,
            )
    }

    fn successors(&self, node: &QuantizedNode, out: &mut Vec<(QuantizedNode, f64)>) {
        out.clear();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let cost = if dx != 0 && dy != 0 { SQRT_2 } else { 1.0 };
                out.push((node.offset(dx, dy), cost));
            }
        }
    }

    fn heuristic(&self, from: &QuantizedNode, to: &QuantizedNode) -> f64 {
        let dx = f64::from(from.x) - f64::from(to.x);
        let dy = f64::from(from.y) - f64::from(to.y);
        dx.hypot(dy) / f64::from(self.stride)
    }
}
