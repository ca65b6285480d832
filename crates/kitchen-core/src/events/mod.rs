//! Decision Events
//!
//! Per-turn buffering of decision records and their JSONL sink.

pub mod logger;

pub use logger::{DecisionLog, TurnEvents};
