//! ASCII Layouts
//!
//! One character per cell, one line per row:
//!
//! | char | tile        |
//! |------|-------------|
//! | `.`  | floor       |
//! | `b`  | floor with a bot spawn |
//! | `#`  | wall        |
//! | `C`  | counter     |
//! | `B`  | box         |
//! | `K`  | cooker      |
//! | `$`  | shop        |
//! | `U`  | submission  |
//! | `S`  | sink        |
//! | `T`  | sink table  |
//! | `X`  | trash       |

use std::path::Path;

use thiserror::Error;

use kitchen_events::{Pos, TileCategory};

use crate::world::Grid;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout has no rows")]
    Empty,
    #[error("row {row} is {found} cells wide, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile '{ch}' at ({x}, {y})")]
    UnknownTile { ch: char, x: usize, y: usize },
    #[error("failed to read layout: {0}")]
    Io(#[from] std::io::Error),
}

/// A parsed layout: static grid plus bot spawn cells in reading order
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub grid: Grid,
    pub spawns: Vec<Pos>,
}

impl Layout {
    pub fn from_file(path: &Path) -> Result<Self, LayoutError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();
        let width = rows.first().ok_or(LayoutError::Empty)?.chars().count();

        let mut categories = Vec::with_capacity(width * rows.len());
        let mut spawns = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(LayoutError::Ragged {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                if ch == 'b' {
                    spawns.push(Pos::new(x as i32, y as i32));
                }
                categories.push(category_for(ch).ok_or(LayoutError::UnknownTile { ch, x, y })?);
            }
        }

        Ok(Self {
            grid: Grid::new(width as u32, rows.len() as u32, categories),
            spawns,
        })
    }
}

fn category_for(ch: char) -> Option<TileCategory> {
    let category = match ch {
        '.' | 'b' => TileCategory::Floor,
        '#' => TileCategory::Wall,
        'C' => TileCategory::Counter,
        'B' => TileCategory::Box,
        'K' => TileCategory::Cooker,
        '$' => TileCategory::Shop,
        'U' => TileCategory::Submit,
        'S' => TileCategory::Sink,
        'T' => TileCategory::SinkTable,
        'X' => TileCategory::Trash,
        _ => return None,
    };
    Some(category)
}
