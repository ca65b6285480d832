//! Shared data types for the kitchen bot.
//!
//! This crate contains pure data structures with no decision logic: grid
//! geometry, tiles, items, orders, and the decision trace record. It is a
//! dependency for every other crate in the workspace.

pub mod decision;
pub mod geometry;
pub mod item;
pub mod order;
pub mod tile;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

pub use decision::{ActionKind, DecisionEvent, DecisionKind, ReleaseReason};
pub use geometry::{Pos, Step, DIAGONALS, MOVES};
pub use item::{Catalog, CookStage, Food, FoodKind, Item, Pan, Plate, ShopItem};
pub use order::{Order, OrderId, UnitId};
pub use tile::{TileCategory, TileView};
