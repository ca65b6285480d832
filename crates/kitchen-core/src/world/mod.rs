//! Static World
//!
//! Read-only views over the map: the walkability grid and the per-category
//! tile index built from it.

pub mod grid;
pub mod tile_index;

pub use grid::Grid;
pub use tile_index::TileIndex;
