use crate::Vec2;

/// Read-only collision queries against the game world.
///
/// Positions are ground-plane coordinates; the vertical extent of the probe starts at the
/// ground and reaches `clearance_height`.
pub trait CollisionWorld {
    /// True when a probe of the given radius and height centered at `position` touches a
    /// solid (building, box, wall).
    fn is_point_in_solid(&self, position: Vec2, clearance_radius: f32, clearance_height: f32)
        -> bool;

    /// Edge length of the square map, centered on the origin.
    fn world_size(&self) -> f32;

    fn half_extent(&self) -> f32 {
        self.world_size() * 0.5
    }

    fn contains(&self, position: Vec2) -> bool {
        let half = self.half_extent();
        position.x >= -half && position.x <= half && position.y >= -half && position.y <= half
    }
}

impl<W: CollisionWorld + ?Sized> CollisionWorld for &W {
    fn is_point_in_solid(
        &self,
        position: Vec2,
        clearance_radius: f32,
        clearance_height: f32,
    ) -> bool {
        (**self).is_point_in_solid(position, clearance_radius, clearance_height)
    }

    fn world_size(&self) -> f32 {
        (**self).world_size()
    }
}
