//! Walkability Grid
//!
//! Immutable snapshot of a kitchen's static layout. Dynamic occupancy is
//! layered on top by the pathfinder, never stored here.

use kitchen_events::{Pos, TileCategory};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    /// Row-major categories
    categories: Vec<TileCategory>,
    walkable: Vec<bool>,
}

impl Grid {
    /// Build from a row-major category list; walkability follows the category.
    pub fn new(width: u32, height: u32, categories: Vec<TileCategory>) -> Self {
        assert_eq!(
            categories.len(),
            (width as usize) * (height as usize),
            "category count must match grid size"
        );
        let walkable = categories.iter().map(TileCategory::is_walkable).collect();
        Self {
            width: width as i32,
            height: height as i32,
            categories,
            walkable,
        }
    }

    /// Build by querying a category for every cell.
    pub fn from_fn(width: u32, height: u32, mut category_at: impl FnMut(Pos) -> TileCategory) -> Self {
        let mut categories = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                categories.push(category_at(Pos::new(x, y)));
            }
        }
        Self::new(width, height, categories)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn idx(&self, pos: Pos) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some((pos.y * self.width + pos.x) as usize)
    }

    pub fn category(&self, pos: Pos) -> Option<TileCategory> {
        self.idx(pos).map(|idx| self.categories[idx])
    }

    /// Out-of-bounds cells are never walkable
    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.idx(pos).map(|idx| self.walkable[idx]).unwrap_or(false)
    }

    /// Every cell, column by column (x outer, y inner).
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.width).flat_map(move |x| (0..self.height).map(move |y| Pos::new(x, y)))
    }

    /// Number of cells; bounds the size of any search
    pub fn area(&self) -> usize {
        self.categories.len()
    }
}
