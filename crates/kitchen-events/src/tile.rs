//! Tile Types
//!
//! Static tile categories and the per-cell view returned by the game API.

use serde::{Deserialize, Serialize};

use crate::item::Item;

/// Category label of a map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileCategory {
    /// Plain walkable floor
    Floor,
    /// Impassable wall
    Wall,
    /// Work surface for chopping and assembly
    Counter,
    /// Storage surface
    Box,
    /// Heat source; holds a pan
    Cooker,
    /// Buy food and tools here
    Shop,
    /// Plates are assembled and handed in here
    Submit,
    /// Dirty plates collect here for washing
    Sink,
    /// Washed plates wait here
    SinkTable,
    /// Discard held items here
    Trash,
}

impl TileCategory {
    /// Whether units may stand on cells of this category
    pub fn is_walkable(&self) -> bool {
        matches!(self, TileCategory::Floor)
    }

    /// Label used by the game's tile names
    pub fn label(&self) -> &'static str {
        match self {
            TileCategory::Floor => "FLOOR",
            TileCategory::Wall => "WALL",
            TileCategory::Counter => "COUNTER",
            TileCategory::Box => "BOX",
            TileCategory::Cooker => "COOKER",
            TileCategory::Shop => "SHOP",
            TileCategory::Submit => "SUBMIT",
            TileCategory::Sink => "SINK",
            TileCategory::SinkTable => "SINKTABLE",
            TileCategory::Trash => "TRASH",
        }
    }

    /// Parse a game tile name
    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.label() == label)
    }

    /// Returns all category variants.
    pub fn all() -> &'static [TileCategory] {
        &[
            TileCategory::Floor,
            TileCategory::Wall,
            TileCategory::Counter,
            TileCategory::Box,
            TileCategory::Cooker,
            TileCategory::Shop,
            TileCategory::Submit,
            TileCategory::Sink,
            TileCategory::SinkTable,
            TileCategory::Trash,
        ]
    }
}

/// Snapshot of one tile's dynamic contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileView {
    pub category: TileCategory,
    /// Item resting on the tile, if any
    pub item: Option<Item>,
    /// Clean plates stacked here (sink tables)
    #[serde(default)]
    pub clean_plates: u32,
    /// Dirty plates waiting here (sinks)
    #[serde(default)]
    pub dirty_plates: u32,
}

impl TileView {
    pub fn empty(category: TileCategory) -> Self {
        Self {
            category,
            item: None,
            clean_plates: 0,
            dirty_plates: 0,
        }
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.item = Some(item);
        self
    }
}
