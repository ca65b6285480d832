//! Orders
//!
//! Expected-value scoring of customer orders and the per-turn assignment
//! pass that hands them to idle units.

pub mod assignment;
pub mod valuation;

pub use assignment::{Assignment, TaskAssigner};
pub use valuation::{OrderScore, RankedOrder, Valuer};
