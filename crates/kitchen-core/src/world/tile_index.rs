//! Tile Index
//!
//! Category → coordinates lookup, built once per map by a single scan.

use std::collections::HashMap;

use kitchen_events::{Pos, TileCategory};

use super::Grid;

#[derive(Debug, Clone, Default)]
pub struct TileIndex {
    by_category: HashMap<TileCategory, Vec<Pos>>,
}

impl TileIndex {
    /// Group every cell of `grid` by category, keeping scan order.
    pub fn build(grid: &Grid) -> Self {
        let mut by_category: HashMap<TileCategory, Vec<Pos>> = HashMap::new();
        for pos in grid.positions() {
            if let Some(category) = grid.category(pos) {
                by_category.entry(category).or_default().push(pos);
            }
        }
        Self { by_category }
    }

    /// All cells of a category in scan order (empty if absent)
    pub fn all(&self, category: TileCategory) -> &[Pos] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, category: TileCategory) -> bool {
        !self.all(category).is_empty()
    }

    /// Nearest cell of `category` by Chebyshev distance.
    ///
    /// Ties go to the first cell in scan order. `None` means the map has no
    /// such tile at all, which callers treat as permanent.
    pub fn nearest(&self, from: Pos, category: TileCategory) -> Option<Pos> {
        self.all(category)
            .iter()
            .copied()
            .min_by_key(|p| from.chebyshev(*p))
    }

    /// Like [`nearest`](Self::nearest) but skips `taken` cells when any
    /// other cell of the category exists.
    pub fn nearest_free(&self, from: Pos, category: TileCategory, taken: &[Pos]) -> Option<Pos> {
        self.all(category)
            .iter()
            .copied()
            .filter(|p| !taken.contains(p))
            .min_by_key(|p| from.chebyshev(*p))
            .or_else(|| self.nearest(from, category))
    }
}
