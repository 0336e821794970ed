use tank_core::{CollisionWorld, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{search, GridDescriptor, NavConfig, NavConfigError, SearchError, SearchLimits};

/// World-space route, requested start first and requested goal last.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavPath {
    pub points: Vec<Vec2>,
    /// Search cost in lattice steps.
    pub cost: f64,
}

impl NavPath {
    pub fn new(points: Vec<Vec2>, cost: f64) -> Self {
        Self { points, cost }
    }

    /// Euclidean length of the polyline in world units.
    pub fn length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

pub trait Navigator {
    fn find_path(&self, start: Vec2, goal: Vec2) -> Option<NavPath>;
}

/// World-space path queries over a [`GridDescriptor`].
#[derive(Debug, Clone)]
pub struct GridPlanner<W> {
    descriptor: GridDescriptor<W>,
    limits: SearchLimits,
}

impl<W: CollisionWorld> GridPlanner<W> {
    pub fn new(world: W, config: &NavConfig) -> Result<Self, NavConfigError> {
        config.validate()?;
        Ok(Self {
            descriptor: GridDescriptor::new(world, config),
            limits: config.limits(),
        })
    }

    pub fn descriptor(&self) -> &GridDescriptor<W> {
        &self.descriptor
    }

    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// Plans from `start` to `goal`.
    ///
    /// Both endpoints are snapped to their lattice cells before searching. The returned
    /// points keep the exact requested endpoints and use lattice positions in between.
    pub fn plan(&self, start: Vec2, goal: Vec2) -> Result<NavPath, SearchError> {
        let from = self.descriptor.node_at(start);
        let to = self.descriptor.node_at(goal);
        let found = search(&self.descriptor, &from, &to, self.limits)?;

        let inner_len = found.nodes.len().saturating_sub(2);
        let mut points = Vec::with_capacity(inner_len + 2);
        points.push(start);
        points.extend(
            found
                .nodes
                .iter()
                .skip(1)
                .take(inner_len)
                .map(|n| n.to_world()),
        );
        points.push(goal);

        Ok(NavPath::new(points, found.cost))
    }
}

impl<W: CollisionWorld> Navigator for GridPlanner<W> {
    fn find_path(&self, start: Vec2, goal: Vec2) -> Option<NavPath> {
        match self.plan(start, goal) {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::debug!(?start, ?goal, %err, "no route");
                None
            }
        }
    }
}
