//! Sandbox Kitchen
//!
//! A small deterministic stand-in for the game engine. It implements
//! [`KitchenApi`] with simplified rules so the decision core can be driven
//! end to end without the real game:
//!
//! - one move per bot per turn, onto free floor
//! - every interaction requires standing next to the tile
//! - food in a pan cooks one step per turn, then burns
//! - orders expire at their expiry turn and charge their penalty
//! - submitted plates come back dirty in the sink

pub mod layout;
pub mod orders;

pub use layout::{Layout, LayoutError};
pub use orders::generate_orders;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use kitchen_events::{
    Catalog, CookStage, FoodKind, Item, Order, Plate, Pos, ShopItem, Step, TileCategory,
    TileView, UnitId,
};

use crate::api::{BotView, KitchenApi, Side};
use crate::world::Grid;

/// Sandbox tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxRules {
    pub prices: Catalog,
    pub starting_money: i64,
    /// Turns in a pan until cooked
    pub cook_turns: u32,
    /// Turns in a pan until burnt
    pub burn_turns: u32,
    /// First turn on which bots may cross to the enemy kitchen
    pub switch_turn: u32,
}

impl Default for SandboxRules {
    fn default() -> Self {
        Self {
            prices: Catalog::default(),
            starting_money: 500,
            cook_turns: 20,
            burn_turns: 40,
            switch_turn: 0,
        }
    }
}

/// Running totals for a sandbox game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxStats {
    pub served: u32,
    pub expired: u32,
    pub rewards: i64,
    pub penalties: i64,
}

#[derive(Debug, Clone)]
struct SandboxBot {
    pos: Pos,
    holding: Option<Item>,
    side: Side,
}

/// One kitchen: layout plus dynamic tile contents
#[derive(Debug, Clone)]
struct Kitchen {
    grid: Grid,
    tiles: BTreeMap<Pos, TileView>,
    /// Turns the food in each cooker's pan has been cooking
    cooking: BTreeMap<Pos, u32>,
}

impl Kitchen {
    fn new(grid: Grid) -> Self {
        let tiles = grid
            .positions()
            .filter_map(|pos| grid.category(pos).map(|c| (pos, TileView::empty(c))))
            .collect();
        Self {
            grid,
            tiles,
            cooking: BTreeMap::new(),
        }
    }

    fn category(&self, pos: Pos) -> Option<TileCategory> {
        self.grid.category(pos)
    }

    fn first(&self, category: TileCategory) -> Option<Pos> {
        self.grid
            .positions()
            .find(|pos| self.category(*pos) == Some(category))
    }

    fn advance_cooking(&mut self, rules: &SandboxRules) {
        for (pos, turns) in self.cooking.iter_mut() {
            *turns += 1;
            let Some(Item::Pan(pan)) = self.tiles.get_mut(pos).and_then(|t| t.item.as_mut()) else {
                continue;
            };
            let Some(food) = pan.food.as_mut() else {
                continue;
            };
            food.cook_stage = if *turns >= rules.burn_turns {
                CookStage::Burnt
            } else if *turns >= rules.cook_turns {
                CookStage::Cooked
            } else {
                CookStage::Raw
            };
        }
    }
}

/// In-memory kitchen game
#[derive(Debug, Clone)]
pub struct Sandbox {
    turn: u32,
    money: i64,
    rules: SandboxRules,
    home: Kitchen,
    enemy: Option<Kitchen>,
    bots: BTreeMap<UnitId, SandboxBot>,
    orders: Vec<Order>,
    /// Orders not yet visible, by creation turn
    scheduled: Vec<Order>,
    moved: HashSet<UnitId>,
    stats: SandboxStats,
}

impl Sandbox {
    /// Build from a home layout; bots spawn at `b` cells with ids 1, 2, …
    pub fn new(layout: Layout, rules: SandboxRules) -> Self {
        let bots = layout
            .spawns
            .iter()
            .enumerate()
            .map(|(i, pos)| {
                (
                    UnitId(i as u32 + 1),
                    SandboxBot {
                        pos: *pos,
                        holding: None,
                        side: Side::Home,
                    },
                )
            })
            .collect();
        Self {
            turn: 0,
            money: rules.starting_money,
            home: Kitchen::new(layout.grid),
            enemy: None,
            bots,
            orders: Vec::new(),
            scheduled: Vec::new(),
            moved: HashSet::new(),
            stats: SandboxStats::default(),
            rules,
        }
    }

    pub fn parse(text: &str, rules: SandboxRules) -> Result<Self, LayoutError> {
        Ok(Self::new(Layout::parse(text)?, rules))
    }

    /// Add an enemy kitchen that bots can switch into
    pub fn with_enemy(mut self, layout: Layout) -> Self {
        self.enemy = Some(Kitchen::new(layout.grid));
        self
    }

    /// Queue an order; it becomes visible on its creation turn
    pub fn add_order(&mut self, order: Order) {
        if order.created_turn <= self.turn {
            self.orders.push(order);
        } else {
            self.scheduled.push(order);
        }
    }

    pub fn set_money(&mut self, money: i64) {
        self.money = money;
    }

    /// Place an item directly on a tile
    pub fn put_item(&mut self, side: Side, pos: Pos, item: Item) {
        if let Some(tile) = self.kitchen_mut(side).and_then(|k| k.tiles.get_mut(&pos)) {
            tile.item = Some(item);
        }
    }

    /// Put an item directly in a bot's hands
    pub fn give(&mut self, id: UnitId, item: Item) {
        if let Some(bot) = self.bots.get_mut(&id) {
            bot.holding = Some(item);
        }
    }

    pub fn stats(&self) -> SandboxStats {
        self.stats
    }

    /// End the turn: cook, reveal scheduled orders, expire stale ones.
    pub fn advance_turn(&mut self) {
        self.turn += 1;
        self.moved.clear();

        let rules = self.rules.clone();
        self.home.advance_cooking(&rules);
        if let Some(enemy) = self.enemy.as_mut() {
            enemy.advance_cooking(&rules);
        }

        let turn = self.turn;
        let (due, later): (Vec<Order>, Vec<Order>) = std::mem::take(&mut self.scheduled)
            .into_iter()
            .partition(|o| o.created_turn <= turn);
        self.orders.extend(due);
        self.scheduled = later;

        for order in self.orders.iter_mut() {
            if order.is_active && !order.is_claimed() && order.is_expired(turn) {
                order.is_active = false;
                self.money -= order.penalty;
                self.stats.expired += 1;
                self.stats.penalties += order.penalty;
                debug!(order = %order.order_id, turn, "Sandbox order expired");
            }
        }
    }

    fn kitchen(&self, side: Side) -> Option<&Kitchen> {
        match side {
            Side::Home => Some(&self.home),
            Side::Enemy => self.enemy.as_ref(),
        }
    }

    fn kitchen_mut(&mut self, side: Side) -> Option<&mut Kitchen> {
        match side {
            Side::Home => Some(&mut self.home),
            Side::Enemy => self.enemy.as_mut(),
        }
    }

    /// The bot's side, if it exists and stands next to `at`
    fn reach(&self, id: UnitId, at: Pos) -> Option<Side> {
        let bot = self.bots.get(&id)?;
        bot.pos.is_adjacent(at).then_some(bot.side)
    }

    /// Run `f` on the bot's hands and the tile it reaches, if adjacent.
    fn with_tile(
        &mut self,
        id: UnitId,
        at: Pos,
        f: impl FnOnce(&mut Option<Item>, &mut TileView, &mut BTreeMap<Pos, u32>) -> bool,
    ) -> bool {
        let Some(side) = self.reach(id, at) else {
            return false;
        };
        let Some(bot) = self.bots.get_mut(&id) else {
            return false;
        };
        let kitchen = match side {
            Side::Home => &mut self.home,
            Side::Enemy => match self.enemy.as_mut() {
                Some(enemy) => enemy,
                None => return false,
            },
        };
        let Some(tile) = kitchen.tiles.get_mut(&at) else {
            return false;
        };
        f(&mut bot.holding, tile, &mut kitchen.cooking)
    }

    fn occupied(&self, side: Side, pos: Pos) -> bool {
        self.bots.values().any(|b| b.side == side && b.pos == pos)
    }
}

impl KitchenApi for Sandbox {
    fn turn(&self) -> u32 {
        self.turn
    }

    fn team_bot_ids(&self) -> Vec<UnitId> {
        self.bots.keys().copied().collect()
    }

    fn bot(&self, id: UnitId) -> Option<BotView> {
        self.bots.get(&id).map(|bot| BotView {
            id,
            pos: bot.pos,
            holding: bot.holding.clone(),
            side: bot.side,
        })
    }

    fn grid(&self, side: Side) -> Option<Grid> {
        self.kitchen(side).map(|k| k.grid.clone())
    }

    fn tile(&self, side: Side, pos: Pos) -> Option<TileView> {
        self.kitchen(side)?.tiles.get(&pos).cloned()
    }

    fn orders(&self) -> Vec<Order> {
        self.orders.clone()
    }

    fn money(&self) -> i64 {
        self.money
    }

    fn move_bot(&mut self, id: UnitId, step: Step) -> bool {
        if self.moved.contains(&id) || step.is_stay() || !step.is_unit() {
            return false;
        }
        let Some(bot) = self.bots.get(&id) else {
            return false;
        };
        let (side, next) = (bot.side, bot.pos.offset(step));
        let walkable = self.kitchen(side).is_some_and(|k| k.grid.is_walkable(next));
        if !walkable || self.occupied(side, next) {
            return false;
        }
        if let Some(bot) = self.bots.get_mut(&id) {
            bot.pos = next;
        }
        self.moved.insert(id);
        true
    }

    fn buy(&mut self, id: UnitId, item: ShopItem, at: Pos) -> bool {
        let cost = self.rules.prices.cost(item);
        if self.money < cost {
            return false;
        }
        let bought = self.with_tile(id, at, |hands, tile, _| {
            if tile.category != TileCategory::Shop || hands.is_some() {
                return false;
            }
            *hands = Some(item.to_item());
            true
        });
        if bought {
            self.money -= cost;
        }
        bought
    }

    fn place(&mut self, id: UnitId, at: Pos) -> bool {
        self.with_tile(id, at, |hands, tile, cooking| {
            let Some(item) = hands.take() else {
                return false;
            };
            let placed = match (tile.category, &item, tile.item.as_mut()) {
                (TileCategory::Counter | TileCategory::Box, _, None) => true,
                (TileCategory::Cooker, Item::Pan(_), None) => true,
                (TileCategory::Submit, Item::Plate(_), None) => true,
                (TileCategory::Cooker, Item::Food(food), Some(Item::Pan(pan)))
                    if pan.food.is_none() && food.kind.can_cook() =>
                {
                    pan.food = Some(food.clone());
                    cooking.insert(at, 0);
                    return true;
                }
                _ => false,
            };
            if placed {
                tile.item = Some(item);
            } else {
                *hands = Some(item);
            }
            placed
        })
    }

    fn pickup(&mut self, id: UnitId, at: Pos) -> bool {
        self.with_tile(id, at, |hands, tile, cooking| {
            let pickable = matches!(
                tile.category,
                TileCategory::Counter | TileCategory::Box | TileCategory::Cooker | TileCategory::Submit
            );
            if !pickable || hands.is_some() || tile.item.is_none() {
                return false;
            }
            *hands = tile.item.take();
            cooking.remove(&at);
            true
        })
    }

    fn chop(&mut self, id: UnitId, at: Pos) -> bool {
        self.with_tile(id, at, |hands, tile, _| {
            if tile.category != TileCategory::Counter || hands.is_some() {
                return false;
            }
            match tile.item.as_mut() {
                Some(Item::Food(food)) if food.kind.can_chop() && !food.chopped => {
                    food.chopped = true;
                    true
                }
                _ => false,
            }
        })
    }

    fn take_from_pan(&mut self, id: UnitId, at: Pos) -> bool {
        self.with_tile(id, at, |hands, tile, cooking| {
            if hands.is_some() {
                return false;
            }
            let Some(Item::Pan(pan)) = tile.item.as_mut() else {
                return false;
            };
            let Some(food) = pan.food.take() else {
                return false;
            };
            *hands = Some(Item::Food(food));
            cooking.remove(&at);
            true
        })
    }

    fn add_food_to_plate(&mut self, id: UnitId, at: Pos) -> bool {
        self.with_tile(id, at, |hands, tile, _| {
            let Some(Item::Food(food)) = hands.as_ref() else {
                return false;
            };
            if !food.is_ready() {
                return false;
            }
            let Some(Item::Plate(plate)) = tile.item.as_mut() else {
                return false;
            };
            if plate.dirty {
                return false;
            }
            plate.foods.push(food.clone());
            *hands = None;
            true
        })
    }

    fn submit(&mut self, id: UnitId, at: Pos) -> bool {
        let turn = self.turn;
        let Some(side) = self.reach(id, at) else {
            return false;
        };
        let on_submit = self
            .kitchen(side)
            .and_then(|k| k.category(at))
            .is_some_and(|c| c == TileCategory::Submit);
        if side != Side::Home || !on_submit {
            return false;
        }
        let Some(Item::Plate(plate)) = self.bots.get(&id).and_then(|b| b.holding.clone()) else {
            return false;
        };
        if plate.dirty || plate.is_empty() {
            return false;
        }

        let served = sorted(plate.kinds());
        let Some(order) = self
            .orders
            .iter_mut()
            .find(|o| o.is_open(turn) && sorted(o.required.clone()) == served)
        else {
            return false;
        };
        order.is_active = false;
        order.claimed_by = Some(id.0);
        self.money += order.reward;
        self.stats.served += 1;
        self.stats.rewards += order.reward;
        debug!(order = %order.order_id, unit = %id, turn, "Sandbox order served");

        if let Some(bot) = self.bots.get_mut(&id) {
            bot.holding = None;
        }
        if let Some(sink) = self.home.first(TileCategory::Sink) {
            if let Some(tile) = self.home.tiles.get_mut(&sink) {
                tile.dirty_plates += 1;
            }
        }
        true
    }

    fn trash(&mut self, id: UnitId, at: Pos) -> bool {
        self.with_tile(id, at, |hands, tile, _| {
            if tile.category != TileCategory::Trash {
                return false;
            }
            match hands.as_mut() {
                None => false,
                Some(Item::Food(_)) => {
                    *hands = None;
                    true
                }
                Some(Item::Plate(plate)) => {
                    plate.foods.clear();
                    true
                }
                Some(Item::Pan(pan)) => {
                    pan.food = None;
                    true
                }
            }
        })
    }

    fn wash_sink(&mut self, id: UnitId, at: Pos) -> bool {
        let Some(side) = self.reach(id, at) else {
            return false;
        };
        let Some(kitchen) = self.kitchen_mut(side) else {
            return false;
        };
        let Some(table) = kitchen.first(TileCategory::SinkTable) else {
            return false;
        };
        match kitchen.tiles.get_mut(&at) {
            Some(sink) if sink.category == TileCategory::Sink && sink.dirty_plates > 0 => {
                sink.dirty_plates -= 1;
            }
            _ => return false,
        }
        if let Some(table) = kitchen.tiles.get_mut(&table) {
            table.clean_plates += 1;
        }
        true
    }

    fn take_clean_plate(&mut self, id: UnitId, at: Pos) -> bool {
        self.with_tile(id, at, |hands, tile, _| {
            if tile.category != TileCategory::SinkTable || hands.is_some() || tile.clean_plates == 0 {
                return false;
            }
            tile.clean_plates -= 1;
            *hands = Some(Item::Plate(Plate::default()));
            true
        })
    }

    fn can_switch_maps(&self) -> bool {
        self.enemy.is_some() && self.turn >= self.rules.switch_turn
    }

    fn switch_maps(&mut self, id: UnitId) -> bool {
        if !self.can_switch_maps() || self.moved.contains(&id) {
            return false;
        }
        let Some(bot) = self.bots.get(&id) else {
            return false;
        };
        let target = match bot.side {
            Side::Home => Side::Enemy,
            Side::Enemy => Side::Home,
        };
        let pos = bot.pos;
        let walkable = self.kitchen(target).is_some_and(|k| k.grid.is_walkable(pos));
        if !walkable || self.occupied(target, pos) {
            return false;
        }
        if let Some(bot) = self.bots.get_mut(&id) {
            bot.side = target;
        }
        self.moved.insert(id);
        true
    }
}

fn sorted(mut kinds: Vec<FoodKind>) -> Vec<FoodKind> {
    kinds.sort();
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen_events::{Food, Pan};

    const TINY: &str = "\
#######
#$b..K#
#C...U#
#X...S#
#....T#
#######
";

    fn sandbox() -> Sandbox {
        Sandbox::parse(TINY, SandboxRules::default()).unwrap()
    }

    const BOT: UnitId = UnitId(1);

    #[test]
    fn test_one_move_per_turn() {
        let mut sb = sandbox();
        assert!(sb.move_bot(BOT, Step::new(1, 1)));
        assert!(!sb.move_bot(BOT, Step::new(1, 0)));
        sb.advance_turn();
        assert!(sb.move_bot(BOT, Step::new(1, 0)));
        assert_eq!(sb.bot(BOT).unwrap().pos, Pos::new(4, 2));

        // Onto the sink
        sb.advance_turn();
        assert!(!sb.move_bot(BOT, Step::new(1, 1)));
        assert_eq!(sb.bot(BOT).unwrap().pos, Pos::new(4, 2));
    }

    #[test]
    fn test_buy_needs_adjacency_and_money() {
        let mut sb = sandbox();
        let shop = Pos::new(1, 1);
        assert!(!sb.buy(BOT, ShopItem::Pan, Pos::new(5, 1)));

        sb.set_money(10);
        assert!(!sb.buy(BOT, ShopItem::Pan, shop));
        sb.set_money(100);
        assert!(sb.buy(BOT, ShopItem::Pan, shop));
        assert_eq!(sb.money(), 100 - Catalog::default().pan);
        // Hands full
        assert!(!sb.buy(BOT, ShopItem::Plate, shop));
    }

    #[test]
    fn test_cooking_progresses_then_burns() {
        let mut sb = sandbox();
        let cooker = Pos::new(5, 1);
        sb.put_item(Side::Home, cooker, Item::Pan(Pan::default()));
        sb.bots.get_mut(&BOT).unwrap().pos = Pos::new(4, 1);
        sb.give(BOT, Item::Food(Food::raw(FoodKind::Egg)));
        assert!(sb.place(BOT, cooker));

        let stage = |sb: &Sandbox| match sb.tile(Side::Home, cooker).unwrap().item {
            Some(Item::Pan(Pan { food: Some(food) })) => food.cook_stage,
            other => panic!("unexpected cooker contents: {:?}", other),
        };
        for _ in 0..19 {
            sb.advance_turn();
        }
        assert_eq!(stage(&sb), CookStage::Raw);
        sb.advance_turn();
        assert_eq!(stage(&sb), CookStage::Cooked);
        for _ in 0..20 {
            sb.advance_turn();
        }
        assert_eq!(stage(&sb), CookStage::Burnt);
    }

    #[test]
    fn test_submit_matches_multiset_and_dirties_plate() {
        let mut sb = sandbox();
        let submit = Pos::new(5, 2);
        sb.add_order(Order::new(1, vec![FoodKind::Sauce, FoodKind::Noodles], 90, 5).with_window(0, 50));
        sb.bots.get_mut(&BOT).unwrap().pos = Pos::new(4, 2);
        sb.give(
            BOT,
            Item::Plate(Plate {
                foods: vec![Food::raw(FoodKind::Noodles), Food::raw(FoodKind::Sauce)],
                dirty: false,
            }),
        );

        let money = sb.money();
        assert!(sb.submit(BOT, submit));
        assert_eq!(sb.money(), money + 90);
        assert_eq!(sb.stats().served, 1);
        assert!(sb.bot(BOT).unwrap().holding.is_none());
        assert_eq!(sb.tile(Side::Home, Pos::new(5, 3)).unwrap().dirty_plates, 1);
        assert!(!sb.orders()[0].is_active);
    }

    #[test]
    fn test_orders_expire_with_penalty() {
        let mut sb = sandbox();
        sb.add_order(Order::new(1, vec![FoodKind::Egg], 50, 7).with_window(0, 2));
        sb.add_order(Order::new(2, vec![FoodKind::Egg], 50, 7).with_window(3, 40));
        assert_eq!(sb.orders().len(), 1);

        let money = sb.money();
        sb.advance_turn();
        sb.advance_turn();
        assert_eq!(sb.money(), money - 7);
        assert_eq!(sb.stats().expired, 1);
        sb.advance_turn();
        assert_eq!(sb.orders().len(), 2);
    }

    #[test]
    fn test_wash_cycle() {
        let mut sb = sandbox();
        let sink = Pos::new(5, 3);
        let table = Pos::new(5, 4);
        sb.bots.get_mut(&BOT).unwrap().pos = Pos::new(4, 3);
        assert!(!sb.wash_sink(BOT, sink));
        sb.home.tiles.get_mut(&sink).unwrap().dirty_plates = 1;
        assert!(sb.wash_sink(BOT, sink));
        assert_eq!(sb.tile(Side::Home, table).unwrap().clean_plates, 1);
        assert!(sb.take_clean_plate(BOT, table));
        assert!(sb.bot(BOT).unwrap().holding.as_ref().is_some_and(Item::is_plate));
    }

    #[test]
    fn test_trash_keeps_vessels() {
        let mut sb = sandbox();
        let trash = Pos::new(1, 3);
        sb.bots.get_mut(&BOT).unwrap().pos = Pos::new(2, 3);
        sb.give(
            BOT,
            Item::Plate(Plate {
                foods: vec![Food::raw(FoodKind::Sauce)],
                dirty: false,
            }),
        );
        assert!(sb.trash(BOT, trash));
        assert_eq!(sb.bot(BOT).unwrap().holding, Some(Item::Plate(Plate::default())));

        sb.give(BOT, Item::Food(Food::raw(FoodKind::Meat)));
        assert!(sb.trash(BOT, trash));
        assert_eq!(sb.bot(BOT).unwrap().holding, None);
    }
}
