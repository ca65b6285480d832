//! Game API
//!
//! The turn-oriented query/action surface the decision core consumes. The
//! game engine (or the sandbox) implements it; the core never reaches past it.

use kitchen_events::{Item, Order, Pos, ShopItem, Step, TileView, UnitId};

use crate::world::Grid;

/// Which team's kitchen a query or unit refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    Home,
    Enemy,
}

/// One unit as the game reports it this turn
#[derive(Debug, Clone, PartialEq)]
pub struct BotView {
    pub id: UnitId,
    pub pos: Pos,
    pub holding: Option<Item>,
    /// Kitchen the unit is currently standing in
    pub side: Side,
}

/// Query/action surface of the game.
///
/// Every action returns whether the game accepted it. A `false` leaves the
/// world unchanged; callers re-read state on their next decision instead of
/// assuming success.
pub trait KitchenApi {
    fn turn(&self) -> u32;
    fn team_bot_ids(&self) -> Vec<UnitId>;
    fn bot(&self, id: UnitId) -> Option<BotView>;
    /// Static layout of a kitchen; `None` when that side is not visible
    fn grid(&self, side: Side) -> Option<Grid>;
    fn tile(&self, side: Side, pos: Pos) -> Option<TileView>;
    fn orders(&self) -> Vec<Order>;
    fn money(&self) -> i64;

    fn move_bot(&mut self, id: UnitId, step: Step) -> bool;
    fn buy(&mut self, id: UnitId, item: ShopItem, at: Pos) -> bool;
    fn place(&mut self, id: UnitId, at: Pos) -> bool;
    fn pickup(&mut self, id: UnitId, at: Pos) -> bool;
    fn chop(&mut self, id: UnitId, at: Pos) -> bool;
    fn take_from_pan(&mut self, id: UnitId, at: Pos) -> bool;
    fn add_food_to_plate(&mut self, id: UnitId, at: Pos) -> bool;
    fn submit(&mut self, id: UnitId, at: Pos) -> bool;
    fn trash(&mut self, id: UnitId, at: Pos) -> bool;
    fn wash_sink(&mut self, id: UnitId, at: Pos) -> bool;
    fn take_clean_plate(&mut self, id: UnitId, at: Pos) -> bool;

    fn can_switch_maps(&self) -> bool {
        false
    }

    fn switch_maps(&mut self, _id: UnitId) -> bool {
        false
    }
}
