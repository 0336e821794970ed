//! Tick context, agent and collision contracts shared by the tank bot crates.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod math;
pub mod tick;
pub mod world;

pub use agent::TankAgent;
pub use math::Vec2;
pub use tick::TickContext;
pub use world::CollisionWorld;
