#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{NavConfigError, SearchLimits};

/// Tank radius in world units.
pub const TANK_RADIUS: f32 = 4.32;
/// Tank height in world units.
pub const TANK_HEIGHT: f32 = 2.05;
pub const DEFAULT_STRIDE: i32 = 10;
pub const DEFAULT_MAX_EXPANSIONS: usize = 200_000;

/// Planning parameters.
///
/// A stride at or below the tank radius lets the bot reach any point of the map but
/// multiplies the work per query; the default trades precision for speed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct NavConfig {
    pub stride: i32,
    pub clearance_radius: f32,
    pub clearance_height: f32,
    pub max_expansions: Option<usize>,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            stride: DEFAULT_STRIDE,
            clearance_radius: TANK_RADIUS,
            clearance_height: TANK_HEIGHT,
            max_expansions: Some(DEFAULT_MAX_EXPANSIONS),
        }
    }
}

impl NavConfig {
    pub fn with_stride(mut self, stride: i32) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: Option<usize>) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Checks the values a planner relies on.
    ///
    /// Stride 1 is rejected: its tolerance of one unit makes adjacent lattice points
    /// compare equal, and the search would then treat every neighbor as already visited.
    pub fn validate(&self) -> Result<(), NavConfigError> {
        if self.stride < 2 {
            return Err(NavConfigError::StrideTooSmall(self.stride));
        }
        for (name, value) in [
            ("clearance_radius", self.clearance_radius),
            ("clearance_height", self.clearance_height),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(NavConfigError::InvalidClearance { name, value });
            }
        }
        if self.max_expansions == Some(0) {
            return Err(NavConfigError::ZeroBudget);
        }
        Ok(())
    }

    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_expansions: self.max_expansions,
        }
    }
}
