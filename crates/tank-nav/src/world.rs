#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tank_core::{CollisionWorld, Vec2};

/// Axis-aligned box standing on (or raised above) the ground plane.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Obstacle {
    pub center: Vec2,
    pub half_extents: Vec2,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base: f32,
    pub height: f32,
}

impl Obstacle {
    pub fn new(center: Vec2, half_extents: Vec2, height: f32) -> Self {
        Self {
            center,
            half_extents,
            base: 0.0,
            height,
        }
    }

    /// Lifts the box so its bottom face sits at `base`.
    pub fn raised(mut self, base: f32) -> Self {
        self.base = base;
        self
    }

    /// Vertical overlap with a probe spanning `[0, clearance_height)`.
    fn spans_height(&self, clearance_height: f32) -> bool {
        self.height > 0.0 && self.base < clearance_height && self.base + self.height > 0.0
    }

    /// Whether a disc of `radius` at `p` touches the box footprint.
    fn touches(&self, p: Vec2, radius: f32) -> bool {
        let dx = ((p.x - self.center.x).abs() - self.half_extents.x).max(0.0);
        let dy = ((p.y - self.center.y).abs() - self.half_extents.y).max(0.0);
        dx * dx + dy * dy <= radius * radius
    }

    /// Whether the segment `a -> b` crosses the box footprint (slab test).
    fn crosses(&self, a: Vec2, b: Vec2) -> bool {
        let min = self.center - self.half_extents;
        let max = self.center + self.half_extents;
        let dir = b - a;

        let mut t_enter = 0.0f32;
        let mut t_exit = 1.0f32;
        for (origin, delta, lo, hi) in [(a.x, dir.x, min.x, max.x), (a.y, dir.y, min.y, max.y)] {
            if delta.abs() <= f32::EPSILON {
                if origin < lo || origin > hi {
                    return false;
                }
                continue;
            }
            let t0 = (lo - origin) / delta;
            let t1 = (hi - origin) / delta;
            t_enter = t_enter.max(t0.min(t1));
            t_exit = t_exit.min(t0.max(t1));
            if t_enter > t_exit {
                return false;
            }
        }
        true
    }
}

/// Square map centered on the origin with box obstacles.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObstacleWorld {
    world_size: f32,
    obstacles: Vec<Obstacle>,
}

impl ObstacleWorld {
    pub fn new(world_size: f32) -> Self {
        Self {
            world_size,
            obstacles: Vec::new(),
        }
    }

    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Whether a shot travelling at `height` above ground from `from` to `to` hits a box.
    pub fn segment_blocked(&self, from: Vec2, to: Vec2, height: f32) -> bool {
        self.obstacles.iter().any(|o| {
            o.height > 0.0 && height >= o.base && height < o.base + o.height && o.crosses(from, to)
        })
    }
}

impl CollisionWorld for ObstacleWorld {
    fn is_point_in_solid(
        &self,
        position: Vec2,
        clearance_radius: f32,
        clearance_height: f32,
    ) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.spans_height(clearance_height) && o.touches(position, clearance_radius))
    }

    fn world_size(&self) -> f32 {
        self.world_size
    }
}
