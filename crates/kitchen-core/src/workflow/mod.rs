//! Unit Workflow
//!
//! Per-unit state machine that turns an assigned order into world actions.

pub mod machine;
pub mod stations;
pub mod state;
pub mod unit;

pub use machine::{TurnContext, Workflow};
pub use stations::Stations;
pub use state::WorkflowState;
pub use unit::Unit;
