//! Quantized grid navigation for the tank bot.
//!
//! World positions are snapped onto a lattice whose spacing is the quantization stride
//! ([`QuantizedNode`]). A [`GridDescriptor`] describes that lattice as a graph (8-connected
//! neighbors, accessibility against the collision world, admissible heuristic) and
//! [`search`] runs A* over any [`SearchGraph`]. [`GridPlanner`] ties the pieces together
//! for world-space queries.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod config;
pub mod descriptor;
pub mod error;
pub mod graph;
pub mod node;
pub mod planner;
pub mod search;
pub mod world;

pub use config::NavConfig;
pub use descriptor::GridDescriptor;
pub use error::{NavConfigError, SearchError};
pub use graph::{SearchGraph, SearchNode};
pub use node::QuantizedNode;
pub use planner::{GridPlanner, NavPath, Navigator};
pub use search::{search, SearchLimits, SearchPath};
pub use tank_core::Vec2;
pub use world::{Obstacle, ObstacleWorld};
