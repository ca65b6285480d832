//! Sample data fixtures for testing.
//!
//! Ready-made orders and kitchen layouts for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // kitchen-events = { path = "../kitchen-events", features = ["test-fixtures"] }
//!
//! use kitchen_events::fixtures;
//!
//! let orders = fixtures::sample_orders();
//! let layout = fixtures::kitchen_layout();
//! ```

use crate::Order;

/// Returns sample orders from the fixtures file.
///
/// Contains 4 orders:
/// - 1 single-meat order (long window, high reward)
/// - 1 noodles + sauce order (no prep needed)
/// - 1 egg + onions order with a tight window
/// - 1 low-reward sauce order whose penalty dwarfs its payoff
pub fn sample_orders() -> Vec<Order> {
    let json = include_str!("../tests/fixtures/sample_orders.json");
    serde_json::from_str(json).expect("Failed to parse sample_orders.json")
}

/// Two-station kitchen with two bot spawns.
///
/// Shop, counters, trash and sink on the west wall; cookers, submission
/// tiles and sink table on the east wall.
pub fn kitchen_layout() -> &'static str {
    include_str!("../tests/fixtures/kitchen.txt")
}

/// One bot and a counter walled in on every side.
pub fn enclosed_layout() -> &'static str {
    include_str!("../tests/fixtures/enclosed.txt")
}

/// One bot at the west end of a U-shaped corridor, counter at the east end.
pub fn corridor_layout() -> &'static str {
    include_str!("../tests/fixtures/corridor.txt")
}
