//! Navigation: first-step search and per-unit steering.

pub mod pathfinder;
pub mod steer;

pub use pathfinder::{first_step, CacheStats, Pathfinder};
pub use steer::steer;
