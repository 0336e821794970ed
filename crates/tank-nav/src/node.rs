#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tank_core::Vec2;

/// A world position on the planning lattice.
///
/// Coordinates are integer world units; `stride` is the lattice spacing shared by every
/// node of one search. `PartialEq` is exact comparison. The search treats nodes as the
/// same position through [`proximity_eq`](Self::proximity_eq) instead, which accepts any
/// offset of up to half a stride (rounded up) on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuantizedNode {
    pub x: i32,
    pub y: i32,
    stride: i32,
}

impl QuantizedNode {
    /// `stride` values below 1 are clamped to 1.
    pub fn new(x: i32, y: i32, stride: i32) -> Self {
        Self {
            x,
            y,
            stride: stride.max(1),
        }
    }

    /// Nearest integer position to `p`, not yet snapped to the lattice.
    pub fn from_world(p: Vec2, stride: i32) -> Self {
        Self::new(p.x.round() as i32, p.y.round() as i32, stride)
    }

    /// Lattice node for the cell containing `p`.
    pub fn snapped(p: Vec2, stride: i32) -> Self {
        Self::from_world(p, stride).rounded()
    }

    pub fn stride(&self) -> i32 {
        self.stride
    }

    /// Snaps onto the lattice by removing the remainder of each coordinate.
    ///
    /// Uses floor (Euclidean) remainder: `-3` with stride 10 snaps to `-10`, not `0`, so
    /// cells on both sides of the origin have the same width. Idempotent.
    ///
    /// A coordinate whose floor lattice point lies below `i32::MIN` snaps up to the next
    /// lattice point instead.
    pub fn round(&mut self) {
        self.x = snap_down(self.x, self.stride);
        self.y = snap_down(self.y, self.stride);
    }

    pub fn rounded(mut self) -> Self {
        self.round();
        self
    }

    pub fn is_rounded(&self) -> bool {
        self.x.rem_euclid(self.stride) == 0 && self.y.rem_euclid(self.stride) == 0
    }

    /// Per-axis distance under which two nodes count as the same: `ceil(stride / 2)`.
    pub fn tolerance(&self) -> i32 {
        self.stride.saturating_add(1) / 2
    }

    /// Approximate equality used for search membership.
    ///
    /// Reflexive and symmetric (the larger of the two strides sets the tolerance) but not
    /// transitive: with stride 10, `x = 0` matches `x = 5` and `x = 5` matches `x = 10`,
    /// yet `0` and `10` are different nodes. Lattice-aligned nodes never hit that case for
    /// strides of 2 or more, which is why the planner rounds start and goal first.
    pub fn proximity_eq(&self, other: &Self) -> bool {
        let tolerance = self.stride.max(other.stride).saturating_add(1) / 2;
        let tolerance = tolerance.unsigned_abs();
        self.x.abs_diff(other.x) <= tolerance && self.y.abs_diff(other.y) <= tolerance
    }

    /// Lattice cell index of this node.
    pub fn cell(&self) -> (i32, i32) {
        (
            self.x.div_euclid(self.stride),
            self.y.div_euclid(self.stride),
        )
    }

    /// The node `dx` and `dy` strides away.
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx.saturating_mul(self.stride)),
            y: self.y.saturating_add(dy.saturating_mul(self.stride)),
            stride: self.stride,
        }
    }

    pub fn to_world(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

fn snap_down(v: i32, stride: i32) -> i32 {
    let rem = v.rem_euclid(stride);
    // `rem < stride`, so stepping up from `v` stays in range whenever stepping down does not.
    v.checked_sub(rem).unwrap_or(v + (stride - rem))
}
