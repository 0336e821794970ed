#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-tick inputs handed to every predicate and action.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32) -> Self {
        Self { tick, dt_seconds }
    }

    /// Context for the tick after this one, keeping the same timestep.
    pub fn next(self) -> Self {
        Self {
            tick: self.tick.wrapping_add(1),
            dt_seconds: self.dt_seconds,
        }
    }

    /// Simulated time at the start of this tick.
    pub fn elapsed_seconds(&self) -> f64 {
        self.tick as f64 * self.dt_seconds as f64
    }
}
