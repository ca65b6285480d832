//! Workflow Machine
//!
//! Drives one unit through buy → prep → cook → plate → submit. Each call to
//! [`Workflow::step`] attempts at most one world action (a move or an
//! interaction). Transitions that only inspect the world chain within the
//! same call, up to the configured pass limit.
//!
//! Tool state (pan on the cooker, plate on the submission tile) is read back
//! from the world on every visit to INIT instead of being remembered.

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use kitchen_events::{
    ActionKind, Catalog, CookStage, DecisionKind, Food, Item, Pan, Plate, Pos, ReleaseReason,
    ShopItem, Step, TileCategory, UnitId, DIAGONALS,
};

use crate::api::{KitchenApi, Side};
use crate::config::{PathingConfig, WorkflowConfig};
use crate::events::TurnEvents;
use crate::nav::{steer, Pathfinder};
use crate::world::{Grid, TileIndex};

use super::{Stations, Unit, WorkflowState};

/// Shared, per-turn inputs for stepping units
pub struct TurnContext<'a> {
    pub turn: u32,
    pub grid: &'a Grid,
    /// Station tiles another unit is working at right now
    pub busy: &'a BTreeSet<Pos>,
    pub index: &'a TileIndex,
    pub pathfinder: &'a mut Pathfinder,
    /// Tracked positions of every unit, updated eagerly after moves
    pub positions: &'a mut BTreeMap<UnitId, Pos>,
    pub events: &'a mut TurnEvents,
    pub rng: &'a mut SmallRng,
}

impl TurnContext<'_> {
    fn record(&mut self, unit: UnitId, kind: DecisionKind) {
        self.events.record(self.turn, Some(unit), kind);
    }

    fn occupied_by_other(&self, unit: UnitId, pos: Pos) -> bool {
        self.positions.iter().any(|(id, p)| *id != unit && *p == pos)
    }

    fn other_positions(&self, unit: UnitId) -> Vec<Pos> {
        self.positions
            .iter()
            .filter(|(id, _)| **id != unit)
            .map(|(_, p)| *p)
            .collect()
    }
}

/// Whether the current call may keep evaluating
enum Flow {
    /// A non-acting transition; evaluate the new state now
    Continue,
    /// Acted, waited, or stalled; this unit is done for the turn
    Done,
}

/// The per-unit state machine. Stateless itself: all mutable state lives in
/// the [`Unit`] record.
#[derive(Debug, Clone, Default)]
pub struct Workflow {
    config: WorkflowConfig,
    pathing: PathingConfig,
    prices: Catalog,
}

impl Workflow {
    pub fn new(config: WorkflowConfig, pathing: PathingConfig, prices: Catalog) -> Self {
        Self {
            config,
            pathing,
            prices,
        }
    }

    /// Advance one unit by one turn.
    ///
    /// Units without bound stations do nothing: a map missing a required
    /// tile category can never be worked.
    pub fn step<A: KitchenApi>(&self, unit: &mut Unit, api: &mut A, ctx: &mut TurnContext<'_>) {
        let Some(stations) = unit.stations else {
            return;
        };

        self.check_order(unit, api, ctx);

        for _ in 0..self.config.max_internal_passes.max(1) {
            if let Flow::Done = self.advance(unit, &stations, api, ctx) {
                return;
            }
        }
        debug!(unit = %unit.id, state = %unit.state, "Internal pass limit reached");
    }

    /// Drop an order that expired, vanished, or was claimed elsewhere.
    fn check_order<A: KitchenApi>(&self, unit: &mut Unit, api: &A, ctx: &mut TurnContext<'_>) {
        let Some(order_id) = unit.order_id() else {
            return;
        };
        let orders = api.orders();
        let reason = match orders.iter().find(|o| o.order_id == order_id) {
            Some(order) if order.is_expired(ctx.turn) => ReleaseReason::Expired,
            Some(order) if order.is_active && !order.is_claimed() => return,
            _ => ReleaseReason::Stale,
        };
        unit.release(ctx.turn, reason, ctx.events);

        if unit.state.is_tool_state() {
            return;
        }
        let holding = held(api, unit.id);
        let next = if holding.is_some() {
            WorkflowState::Trash
        } else {
            WorkflowState::Init
        };
        self.transition(unit, ctx, next);
    }

    fn advance<A: KitchenApi>(
        &self,
        unit: &mut Unit,
        stations: &Stations,
        api: &mut A,
        ctx: &mut TurnContext<'_>,
    ) -> Flow {
        let holding = held(api, unit.id);
        if holding.is_some() && unit.state.requires_empty_hands() {
            return self.go(unit, ctx, WorkflowState::ForcedTrash);
        }

        match unit.state {
            WorkflowState::Nothing => self.nothing(unit, api, ctx),
            WorkflowState::Init => self.init(unit, stations, api, ctx),
            WorkflowState::BuyPan => self.buy_pan(unit, stations, holding, api, ctx),
            WorkflowState::BuyPlate => self.buy_plate(unit, api, ctx),
            WorkflowState::PlacePlate => self.place_plate(unit, stations, holding, api, ctx),
            WorkflowState::BuyFood => self.buy_food(unit, api, ctx),
            WorkflowState::PlaceOnCounter => {
                self.place_on_counter(unit, stations, holding, api, ctx)
            }
            WorkflowState::ChopFood => self.chop_food(unit, stations, api, ctx),
            WorkflowState::PickupChopped => self.pickup_chopped(unit, stations, holding, api, ctx),
            WorkflowState::CookFood => self.cook_food(unit, stations, holding, api, ctx),
            WorkflowState::WaitAndTake => self.wait_and_take(unit, stations, api, ctx),
            WorkflowState::AddFood => self.add_food(unit, stations, holding, api, ctx),
            WorkflowState::Submit => self.submit(unit, stations, holding, api, ctx),
            WorkflowState::WashDish => self.wash_dish(unit, stations, holding, api, ctx),
            WorkflowState::GetPlateFromSinkTable => {
                self.get_plate(unit, stations, holding, api, ctx)
            }
            WorkflowState::Trash => self.discard(unit, stations, holding, false, api, ctx),
            WorkflowState::ForcedTrash => self.discard(unit, stations, holding, true, api, ctx),
        }
    }

    // --- States ---

    fn nothing<A: KitchenApi>(&self, unit: &mut Unit, api: &mut A, ctx: &mut TurnContext<'_>) -> Flow {
        if unit.assignment.is_some() {
            return self.go(unit, ctx, WorkflowState::Init);
        }

        let candidates: Vec<Step> = DIAGONALS
            .iter()
            .copied()
            .filter(|step| {
                let next = unit.pos.offset(*step);
                ctx.grid.is_walkable(next) && !ctx.occupied_by_other(unit.id, next)
            })
            .collect();
        if let Some(step) = candidates.choose(&mut *ctx.rng).copied() {
            self.move_unit(unit, api, ctx, step);
        }
        Flow::Done
    }

    fn init<A: KitchenApi>(
        &self,
        unit: &mut Unit,
        stations: &Stations,
        api: &A,
        ctx: &mut TurnContext<'_>,
    ) -> Flow {
        let Some(assignment) = unit.assignment.as_ref() else {
            return self.go(unit, ctx, WorkflowState::Nothing);
        };

        let plate = plate_at(api, stations.submit);
        if plate
            .as_ref()
            .is_some_and(|p| p.foods.len() > assignment.plated.len())
        {
            if ctx.busy.contains(&stations.submit) {
                // A teammate's plate in progress; never ours to discard
                debug!(unit = %unit.id, submit = %stations.submit, "Submission tile in use");
                return Flow::Done;
            }
            return self.go(unit, ctx, WorkflowState::Trash);
        }

        let pan = pan_at(api, stations.cooker);
        if pan.as_ref().is_some_and(|p| p.food.is_some()) {
            return self.go(unit, ctx, WorkflowState::WaitAndTake);
        }

        let next = match (pan.is_some(), plate.is_some()) {
            (true, true) => WorkflowState::BuyFood,
            (true, false) => WorkflowState::BuyPlate,
            (false, _) => WorkflowState::BuyPan,
        };
        self.go(unit, ctx, next)
    }

    fn buy_pan<A: KitchenApi>(
        &self,
        unit: &mut Unit,
        stations: &Stations,
        holding: Option<Item>,
        api: &mut A,
        ctx: &mut TurnContext<'_>,
    ) -> Flow {
        match holding {
            Some(Item::Pan(_)) => {
                if self.interact(unit, api, ctx, stations.cooker, ActionKind::Place, A::place)
                    == Some(true)
                {
                    self.transition(unit, ctx, WorkflowState::Init);
                }
                Flow::Done
            }
            Some(_) => self.go(unit, ctx, WorkflowState::ForcedTrash),
            None => {
                if pan_at(api, stations.cooker).is_some() {
                    return self.go(unit, ctx, WorkflowState::Init);
                }
                self.purchase(unit, api, ctx, ShopItem::Pan);
                Flow::Done
            }
        }
    }

    fn buy_plate<A: KitchenApi>(&self, unit: &mut Unit, api: &mut A, ctx: &mut TurnContext<'_>) -> Flow {
        if self.purchase(unit, api, ctx, ShopItem::Plate) == Some(true) {
            self.transition(unit, ctx, WorkflowState::PlacePlate);
        }
        Flow::Done
    }

    fn place_plate<A: KitchenApi>(
        &self,
        unit: &mut Unit,
        stations: &Stations,
        holding: Option<Item>,
        api: &mut A,
        ctx: &mut TurnContext<'_>,
    ) -> Flow {
        match holding {
            None => self.go(unit, ctx, WorkflowState::Init),
            Some(Item::Plate(_)) => {
                if self.interact(unit, api, ctx, stations.submit, ActionKind::Place, A::place)
                    == Some(true)
                {
                    self.transition(unit, ctx, WorkflowState::Init);
                }
                Flow::Done
            }
            Some(_) => self.go(unit, ctx, WorkflowState::ForcedTrash),
        }
    }

    fn buy_food<A: KitchenApi>(&self, unit: &mut Unit, api: &mut A, ctx: &mut TurnContext<'_>) -> Flow {
        let Some(assignment) = unit.assignment.as_ref() else {
            return self.go(unit, ctx, WorkflowState::Init);
        };
        let Some(kind) = assignment.next_needed() else {
            return self.go(unit, ctx, WorkflowState::Submit);
        };

        if self.purchase(unit, api, ctx, ShopItem::Food(kind)) == Some(true) {
            if let Some(assignment) = unit.assignment.as_mut() {
                assignment.take_next();
            }
            let next = if kind.can_chop() {
                WorkflowState::PlaceOnCounter
            } else if kind.can_cook() {
                WorkflowState::CookFood
            } else {
                WorkflowState::AddFood
            };
            self.transition(unit, ctx, next);
        }
        Flow::Done
    }

    fn place_on_counter<A: KitchenApi>(
        &self,
        unit: &mut Unit,
        stations: &Stations,
        holding: Option<Item>,
        api: &mut A,
        ctx: &mut TurnContext<'_>,
    ) -> Flow {
        match holding {
            None => self.lost_in_flight(unit, ctx),
            Some(Item::Food(_)) => {
                if self.interact(unit, api, ctx, stations.counter, ActionKind::Place, A::place)
                    == Some(true)
                {
                    self.transition(unit, ctx, WorkflowState::ChopFood);
                }
                Flow::Done
            }
            Some(_) => self.go(unit, ctx, WorkflowState::ForcedTrash),
        }
    }

    fn chop_food<A: KitchenApi>(
        &self,
        unit: &mut Unit,
        stations: &Stations,
        api: &mut A,
        ctx: &mut TurnContext<'_>,
    ) -> Flow {
        match food_at(api, stations.counter) {
            None => self.lost_in_flight(unit, ctx),
            Some(food) if food.chopped => self.go(unit, ctx, WorkflowState::PickupChopped),
            Some(_) => {
                if self.interact(unit, api, ctx, stations.counter, ActionKind::Chop, A::chop)
                    == Some(true)
                {
                    self.transition(unit, ctx, WorkflowState::PickupChopped);
                }
                Flow::Done
            }
        }
    }

    fn pickup_chopped<A: KitchenApi>(
        &self,
        unit: &mut Unit,
        stations: &Stations,
        holding: Option<Item>,
        api: &mut A,
        ctx: &mut TurnContext<'_>,
    ) -> Flow {
        if let Some(item) = holding {
            return match item {
                Item::Food(food) => self.go(unit, ctx, after_chop(&food)),
                _ => self.go(unit, ctx, WorkflowState::ForcedTrash),
            };
        }

        match food_at(api, stations.counter) {
            None => self.lost_in_flight(unit, ctx),
            Some(food) if !food.chopped => self.go(unit, ctx, WorkflowState::ChopFood),
            Some(food) => {
                if self.interact(unit, api, ctx, stations.counter, ActionKind::Pickup, A::pickup)
                    == Some(true)
                {
                    self.transition(unit, ctx, after_chop(&food));
                }
                Flow::Done
            }
        }
    }

    fn cook_food<A: KitchenApi>(
        &self,
        unit: &mut Unit,
        stations: &Stations,
        holding: Option<Item>,
        api: &mut A,
        ctx: &mut TurnContext<'_>,
    ) -> Flow {
        match holding {
            None => self.lost_in_flight(unit, ctx),
            Some(Item::Food(_)) => match pan_at(api, stations.cooker) {
                // No pan, or a pan still holding something else
                None => self.go(unit, ctx, WorkflowState::ForcedTrash),
                Some(pan) if pan.food.is_some() => self.go(unit, ctx, WorkflowState::ForcedTrash),
                Some(_) => {
                    if self.interact(unit, api, ctx, stations.cooker, ActionKind::Place, A::place)
                        == Some(true)
                    {
                        self.transition(unit, ctx, WorkflowState::WaitAndTake);
                    }
                    Flow::Done
                }
            },
            Some(_) => self.go(unit, ctx, WorkflowState::ForcedTrash),
        }
    }

    fn wait_and_take<A: KitchenApi>(
        &self,
        unit: &mut Unit,
        stations: &Stations,
        api: &mut A,
        ctx: &mut TurnContext<'_>,
    ) -> Flow {
        let Some(food) = pan_at(api, stations.cooker).and_then(|pan| pan.food) else {
            return self.lost_in_flight(unit, ctx);
        };

        if food.cook_stage == CookStage::Raw {
            // Stand by the cooker until it is done
            self.approach(unit, api, ctx, stations.cooker);
            return Flow::Done;
        }

        if self.interact(
            unit,
            api,
            ctx,
            stations.cooker,
            ActionKind::TakeFromPan,
            A::take_from_pan,
        ) == Some(true)
        {
            let ours = unit
                .assignment
                .as_ref()
                .is_some_and(|a| a.in_flight == Some(food.kind));
            let next = if ours && food.cook_stage == CookStage::Cooked {
                WorkflowState::AddFood
            } else {
                WorkflowState::Trash
            };
            self.transition(unit, ctx, next);
        }
        Flow::Done
    }

    fn add_food<A: KitchenApi>(
        &self,
        unit: &mut Unit,
        stations: &Stations,
        holding: Option<Item>,
        api: &mut A,
        ctx: &mut TurnContext<'_>,
    ) -> Flow {
        let food = match holding {
            None => return self.lost_in_flight(unit, ctx),
            Some(Item::Food(food)) => food,
            Some(_) => return self.go(unit, ctx, WorkflowState::ForcedTrash),
        };
        if plate_at(api, stations.submit).is_none() {
            return self.go(unit, ctx, WorkflowState::Init);
        }

        if self.interact(
            unit,
            api,
            ctx,
            stations.submit,
            ActionKind::AddFoodToPlate,
            A::add_food_to_plate,
        ) != Some(true)
        {
            return Flow::Done;
        }

        let Some(assignment) = unit.assignment.as_mut() else {
            return self.go(unit, ctx, WorkflowState::Init);
        };
        assignment.mark_plated(food.kind);
        let next = if assignment.is_expired(ctx.turn) {
            unit.release(ctx.turn, ReleaseReason::Expired, ctx.events);
            WorkflowState::Trash
        } else if assignment.is_complete() {
            WorkflowState::Submit
        } else {
            WorkflowState::Init
        };
        self.transition(unit, ctx, next);
        Flow::Done
    }

    fn submit<A: KitchenApi>(
        &self,
        unit: &mut Unit,
        stations: &Stations,
        holding: Option<Item>,
        api: &mut A,
        ctx: &mut TurnContext<'_>,
    ) -> Flow {
        match holding {
            None => {
                if !plate_at(api, stations.submit).is_some_and(|p| !p.is_empty()) {
                    return self.go(unit, ctx, WorkflowState::Init);
                }
                self.interact(unit, api, ctx, stations.submit, ActionKind::Pickup, A::pickup);
                Flow::Done
            }
            Some(Item::Plate(_)) => {
                match self.interact(unit, api, ctx, stations.submit, ActionKind::Submit, A::submit) {
                    Some(true) => {
                        unit.release(ctx.turn, ReleaseReason::Submitted, ctx.events);
                        let next = if self.config.dish_reuse && stations.can_wash() {
                            WorkflowState::WashDish
                        } else {
                            WorkflowState::Init
                        };
                        self.transition(unit, ctx, next);
                    }
                    Some(false) => self.transition(unit, ctx, WorkflowState::Trash),
                    None => {}
                }
                Flow::Done
            }
            Some(_) => self.go(unit, ctx, WorkflowState::ForcedTrash),
        }
    }

    fn wash_dish<A: KitchenApi>(
        &self,
        unit: &mut Unit,
        stations: &Stations,
        holding: Option<Item>,
        api: &mut A,
        ctx: &mut TurnContext<'_>,
    ) -> Flow {
        let (Some(sink), Some(sink_table)) = (stations.sink, stations.sink_table) else {
            return self.go(unit, ctx, WorkflowState::Init);
        };
        if holding.is_some() {
            return self.go(unit, ctx, WorkflowState::Init);
        }

        let clean = api
            .tile(Side::Home, sink_table)
            .map_or(0, |t| t.clean_plates);
        if clean > 0 {
            return self.go(unit, ctx, WorkflowState::GetPlateFromSinkTable);
        }
        let dirty = api.tile(Side::Home, sink).map_or(0, |t| t.dirty_plates);
        if dirty == 0 {
            return self.go(unit, ctx, WorkflowState::Init);
        }

        self.interact(unit, api, ctx, sink, ActionKind::WashSink, A::wash_sink);
        Flow::Done
    }

    fn get_plate<A: KitchenApi>(
        &self,
        unit: &mut Unit,
        stations: &Stations,
        holding: Option<Item>,
        api: &mut A,
        ctx: &mut TurnContext<'_>,
    ) -> Flow {
        match holding {
            Some(Item::Plate(_)) => return self.go(unit, ctx, WorkflowState::PlacePlate),
            Some(_) => return self.go(unit, ctx, WorkflowState::ForcedTrash),
            None => {}
        }
        let Some(sink_table) = stations.sink_table else {
            return self.go(unit, ctx, WorkflowState::Init);
        };
        if api.tile(Side::Home, sink_table).map_or(0, |t| t.clean_plates) == 0 {
            return self.go(unit, ctx, WorkflowState::Init);
        }

        if self.interact(
            unit,
            api,
            ctx,
            sink_table,
            ActionKind::TakeCleanPlate,
            A::take_clean_plate,
        ) == Some(true)
        {
            self.transition(unit, ctx, WorkflowState::PlacePlate);
        }
        Flow::Done
    }

    /// TRASH and FORCED_TRASH.
    ///
    /// Empty-handed, TRASH first collects a spoiled plate from the
    /// submission tile; FORCED_TRASH just returns to INIT.
    fn discard<A: KitchenApi>(
        &self,
        unit: &mut Unit,
        stations: &Stations,
        holding: Option<Item>,
        forced: bool,
        api: &mut A,
        ctx: &mut TurnContext<'_>,
    ) -> Flow {
        let Some(item) = holding else {
            if !forced
                && !ctx.busy.contains(&stations.submit)
                && plate_at(api, stations.submit).is_some_and(|p| !p.is_empty())
            {
                self.interact(unit, api, ctx, stations.submit, ActionKind::Pickup, A::pickup);
                return Flow::Done;
            }
            return self.go(unit, ctx, WorkflowState::Init);
        };

        let Some(trash) = ctx.index.nearest(unit.pos, TileCategory::Trash) else {
            self.report_missing(unit, ctx, TileCategory::Trash);
            return Flow::Done;
        };
        if self.interact(unit, api, ctx, trash, ActionKind::Trash, A::trash) != Some(true) {
            return Flow::Done;
        }

        let next = match item {
            Item::Food(food) => {
                if let Some(assignment) = unit.assignment.as_mut() {
                    if assignment.in_flight == Some(food.kind) {
                        assignment.requeue(food.kind);
                    }
                }
                WorkflowState::Init
            }
            Item::Plate(plate) => {
                if let Some(assignment) = unit.assignment.as_mut() {
                    if !plate.is_empty() {
                        assignment.requeue_plated();
                    }
                }
                // Trashing empties the plate but the unit keeps it
                WorkflowState::PlacePlate
            }
            Item::Pan(_) => WorkflowState::BuyPan,
        };
        self.transition(unit, ctx, next);
        Flow::Done
    }

    // --- Helpers ---

    /// The in-flight ingredient is gone (taken, burnt away, or never landed).
    fn lost_in_flight(&self, unit: &mut Unit, ctx: &mut TurnContext<'_>) -> Flow {
        if let Some(assignment) = unit.assignment.as_mut() {
            assignment.requeue_in_flight();
        }
        self.go(unit, ctx, WorkflowState::Init)
    }

    /// Buy at the nearest shop. `None` while travelling or short of money.
    fn purchase<A: KitchenApi>(
        &self,
        unit: &mut Unit,
        api: &mut A,
        ctx: &mut TurnContext<'_>,
        item: ShopItem,
    ) -> Option<bool> {
        let Some(shop) = ctx.index.nearest(unit.pos, TileCategory::Shop) else {
            self.report_missing(unit, ctx, TileCategory::Shop);
            return None;
        };
        if let Reach::EnRoute = self.approach(unit, api, ctx, shop) {
            return None;
        }
        let cost = self.prices.cost(item);
        if api.money() < cost {
            debug!(unit = %unit.id, ?item, cost, "Waiting for funds");
            return None;
        }
        let ok = api.buy(unit.id, item, shop);
        Some(self.checked(unit, ctx, ActionKind::Buy, ok))
    }

    /// Walk next to `target`, then attempt `action` there.
    ///
    /// `None` while still travelling, otherwise whether the game accepted it.
    fn interact<A: KitchenApi>(
        &self,
        unit: &mut Unit,
        api: &mut A,
        ctx: &mut TurnContext<'_>,
        target: Pos,
        kind: ActionKind,
        action: impl FnOnce(&mut A, UnitId, Pos) -> bool,
    ) -> Option<bool> {
        if let Reach::EnRoute = self.approach(unit, api, ctx, target) {
            return None;
        }
        let ok = action(api, unit.id, target);
        Some(self.checked(unit, ctx, kind, ok))
    }

    fn checked(&self, unit: &Unit, ctx: &mut TurnContext<'_>, action: ActionKind, ok: bool) -> bool {
        if !ok {
            debug!(unit = %unit.id, ?action, state = %unit.state, "Action rejected");
            ctx.record(
                unit.id,
                DecisionKind::ActionRejected {
                    action,
                    state: unit.state.name().to_string(),
                },
            );
        }
        ok
    }

    /// Take one step toward standing next to `target`.
    fn approach<A: KitchenApi>(
        &self,
        unit: &mut Unit,
        api: &mut A,
        ctx: &mut TurnContext<'_>,
        target: Pos,
    ) -> Reach {
        if unit.pos.is_adjacent(target) {
            return Reach::Arrived;
        }

        let others = ctx.other_positions(unit.id);
        let avoid = if self.pathing.avoid_backtrack {
            unit.previous_pos
        } else {
            None
        };
        match steer(ctx.pathfinder, ctx.grid, unit.pos, target, &others, avoid) {
            Some(step) if !step.is_stay() => {
                self.move_unit(unit, api, ctx, step);
            }
            _ => {
                debug!(unit = %unit.id, %target, "No route");
                ctx.record(unit.id, DecisionKind::NoRoute { destination: target });
            }
        }
        Reach::EnRoute
    }

    /// Issue a move unless the target cell is already taken; track eagerly.
    fn move_unit<A: KitchenApi>(
        &self,
        unit: &mut Unit,
        api: &mut A,
        ctx: &mut TurnContext<'_>,
        step: Step,
    ) -> bool {
        let next = unit.pos.offset(step);
        if ctx.occupied_by_other(unit.id, next) {
            return false;
        }
        let ok = api.move_bot(unit.id, step);
        if ok {
            unit.previous_pos = Some(unit.pos);
            unit.pos = next;
            ctx.positions.insert(unit.id, next);
        }
        self.checked(unit, ctx, ActionKind::Move, ok)
    }

    fn report_missing(&self, unit: &mut Unit, ctx: &mut TurnContext<'_>, category: TileCategory) {
        if unit.missing == Some(category) {
            return;
        }
        unit.missing = Some(category);
        warn!(unit = %unit.id, ?category, "Map has no tile of a required category");
        ctx.record(unit.id, DecisionKind::MissingTile { category });
    }

    fn go(&self, unit: &mut Unit, ctx: &mut TurnContext<'_>, to: WorkflowState) -> Flow {
        self.transition(unit, ctx, to);
        Flow::Continue
    }

    fn transition(&self, unit: &mut Unit, ctx: &mut TurnContext<'_>, to: WorkflowState) {
        if unit.state == to {
            return;
        }
        debug!(unit = %unit.id, from = %unit.state, %to, "Transition");
        ctx.record(
            unit.id,
            DecisionKind::Transition {
                from: unit.state.name().to_string(),
                to: to.name().to_string(),
            },
        );
        unit.state = to;
    }
}

/// Outcome of one movement attempt
enum Reach {
    Arrived,
    EnRoute,
}

fn held<A: KitchenApi>(api: &A, unit: UnitId) -> Option<Item> {
    api.bot(unit).and_then(|bot| bot.holding)
}

fn item_at<A: KitchenApi>(api: &A, pos: Pos) -> Option<Item> {
    api.tile(Side::Home, pos).and_then(|tile| tile.item)
}

fn pan_at<A: KitchenApi>(api: &A, pos: Pos) -> Option<Pan> {
    match item_at(api, pos)? {
        Item::Pan(pan) => Some(pan),
        _ => None,
    }
}

fn plate_at<A: KitchenApi>(api: &A, pos: Pos) -> Option<Plate> {
    match item_at(api, pos)? {
        Item::Plate(plate) => Some(plate),
        _ => None,
    }
}

fn food_at<A: KitchenApi>(api: &A, pos: Pos) -> Option<Food> {
    match item_at(api, pos)? {
        Item::Food(food) => Some(food),
        _ => None,
    }
}

/// Where a chopped ingredient goes next
fn after_chop(food: &Food) -> WorkflowState {
    if food.kind.can_cook() {
        WorkflowState::CookFood
    } else {
        WorkflowState::AddFood
    }
}
