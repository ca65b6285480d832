//! Kitchen Bot Decision Core
//!
//! Turn-by-turn control of a team of kitchen units: which order each unit
//! works on, which step of the recipe it is on, and which way it walks.
//! The game itself is reached only through [`KitchenApi`].

pub mod api;
pub mod config;
pub mod events;
pub mod fleet;
pub mod nav;
pub mod orders;
pub mod raid;
pub mod sandbox;
pub mod workflow;
pub mod world;

pub use api::{BotView, KitchenApi, Side};
pub use config::{BotConfig, ConfigError};
pub use events::{DecisionLog, TurnEvents};
pub use fleet::Fleet;
pub use nav::Pathfinder;
pub use orders::{Assignment, TaskAssigner, Valuer};
pub use raid::{RaidController, RaidState};
pub use sandbox::{generate_orders, Layout, LayoutError, Sandbox, SandboxRules, SandboxStats};
pub use workflow::{Stations, Unit, Workflow, WorkflowState};
pub use world::{Grid, TileIndex};
