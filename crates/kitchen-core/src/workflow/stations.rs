//! Station Binding
//!
//! The fixed working tiles a unit uses for its whole game, resolved once from
//! its starting position.

use kitchen_events::{Pos, TileCategory};

use crate::world::TileIndex;

/// Component: a unit's bound working tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stations {
    /// Where choppable food is placed and chopped
    pub counter: Pos,
    /// Holds the unit's pan
    pub cooker: Pos,
    /// Where the plate is assembled and handed in
    pub submit: Pos,
    pub sink: Option<Pos>,
    pub sink_table: Option<Pos>,
}

impl Stations {
    /// Bind the nearest tiles to `from`, preferring ones not in `taken`.
    ///
    /// Fails with the first required category the map lacks. The shop is not
    /// bound (the nearest one is used at each visit) but must exist.
    pub fn resolve(index: &TileIndex, from: Pos, taken: &[Pos]) -> Result<Self, TileCategory> {
        let required = |category| index.nearest_free(from, category, taken).ok_or(category);

        let counter = required(TileCategory::Counter)?;
        let cooker = required(TileCategory::Cooker)?;
        let submit = required(TileCategory::Submit)?;
        if !index.contains(TileCategory::Shop) {
            return Err(TileCategory::Shop);
        }

        Ok(Self {
            counter,
            cooker,
            submit,
            sink: index.nearest_free(from, TileCategory::Sink, taken),
            sink_table: index.nearest_free(from, TileCategory::SinkTable, taken),
        })
    }

    /// Tiles this binding claims exclusively when alternatives exist
    pub fn claimed(&self) -> [Pos; 3] {
        [self.counter, self.cooker, self.submit]
    }

    /// Whether plates can be washed and reused
    pub fn can_wash(&self) -> bool {
        self.sink.is_some() && self.sink_table.is_some()
    }
}
