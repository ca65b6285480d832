//! Fleet
//!
//! Owns every controlled unit and runs one decision cycle per game turn:
//! sync positions, bind stations, assign orders, then step each unit in id
//! order. Positions are tracked eagerly, so a unit processed later in the
//! turn sees where earlier units moved to.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use kitchen_events::{DecisionEvent, DecisionKind, OrderId, Pos, ReleaseReason, UnitId};

use crate::api::{KitchenApi, Side};
use crate::config::BotConfig;
use crate::events::TurnEvents;
use crate::nav::{CacheStats, Pathfinder};
use crate::orders::{TaskAssigner, Valuer};
use crate::raid::{RaidController, RaidState};
use crate::workflow::{Stations, TurnContext, Unit, Workflow, WorkflowState};
use crate::world::{Grid, TileIndex};

/// Static home-kitchen data, loaded on the first turn
#[derive(Debug, Clone)]
struct Kitchen {
    grid: Grid,
    index: TileIndex,
}

/// Decision core for a whole team
pub struct Fleet {
    assigner: TaskAssigner,
    workflow: Workflow,
    units: BTreeMap<UnitId, Unit>,
    kitchen: Option<Kitchen>,
    pathfinder: Pathfinder,
    raid: RaidController,
    rng: SmallRng,
    events: TurnEvents,
}

impl Fleet {
    pub fn new(config: BotConfig) -> Self {
        let valuer = Valuer::new(config.valuation.clone(), config.prices.clone());
        Self {
            assigner: TaskAssigner::new(config.assignment.clone(), valuer),
            workflow: Workflow::new(
                config.workflow.clone(),
                config.pathing.clone(),
                config.prices.clone(),
            ),
            units: BTreeMap::new(),
            kitchen: None,
            pathfinder: Pathfinder::new(config.pathing.cache),
            raid: RaidController::new(config.raid.clone()),
            rng: SmallRng::seed_from_u64(config.seed),
            events: TurnEvents::new(),
        }
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn raid(&self) -> &RaidController {
        &self.raid
    }

    /// Path cache counters accumulated over the whole game
    pub fn path_stats(&self) -> CacheStats {
        self.pathfinder.stats()
    }

    /// Decisions recorded since the last drain
    pub fn events(&self) -> &TurnEvents {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<DecisionEvent> {
        self.events.drain()
    }

    /// Run one full decision cycle against the game.
    pub fn play_turn<A: KitchenApi>(&mut self, api: &mut A) {
        let turn = api.turn();

        if self.kitchen.is_none() {
            let Some(grid) = api.grid(Side::Home) else {
                warn!(turn, "Home kitchen layout unavailable");
                return;
            };
            let index = TileIndex::build(&grid);
            info!(width = grid.width(), height = grid.height(), "Kitchen indexed");
            self.kitchen = Some(Kitchen { grid, index });
        }

        let mut positions = self.sync_units(api);
        self.bind_stations(turn);
        self.start_raid(api, turn);
        self.assign_orders(api, turn);

        let Some(kitchen) = self.kitchen.as_ref() else {
            return;
        };
        let raider = self.raid.unit();
        let ids: Vec<UnitId> = self.units.keys().copied().collect();
        for id in ids {
            if raider == Some(id) {
                let holding = api.bot(id).is_some_and(|bot| bot.holding.is_some());
                if !(self.raid.state() == RaidState::Idle && holding) {
                    self.raid.step(api, &mut self.events);
                    if self.raid.take_returning() == Some(id) {
                        info!(unit = %id, "Raider back on orders");
                        if let Some(unit) = self.units.get_mut(&id) {
                            unit.previous_pos = None;
                            unit.state = WorkflowState::Init;
                        }
                    }
                    continue;
                }
            }

            let busy = busy_tiles(&self.units, id, raider);
            let Some(unit) = self.units.get_mut(&id) else {
                continue;
            };
            let mut ctx = TurnContext {
                turn,
                grid: &kitchen.grid,
                busy: &busy,
                index: &kitchen.index,
                pathfinder: &mut self.pathfinder,
                positions: &mut positions,
                events: &mut self.events,
                rng: &mut self.rng,
            };
            self.workflow.step(unit, api, &mut ctx);
        }

        let stats = self.pathfinder.stats();
        debug!(turn, hits = stats.hits, misses = stats.misses, "Path cache");
    }

    /// Refresh tracked positions from the game and register new units.
    ///
    /// Returns the obstacle snapshot: every unit standing in the home kitchen.
    fn sync_units<A: KitchenApi>(&mut self, api: &A) -> BTreeMap<UnitId, Pos> {
        let ids = api.team_bot_ids();
        self.units.retain(|id, _| ids.contains(id));

        let mut positions = BTreeMap::new();
        for id in ids {
            let Some(bot) = api.bot(id) else {
                continue;
            };
            let unit = self
                .units
                .entry(id)
                .or_insert_with(|| Unit::new(id, bot.pos));
            unit.pos = bot.pos;
            if bot.side == Side::Home {
                positions.insert(id, bot.pos);
            }
        }
        positions
    }

    fn bind_stations(&mut self, turn: u32) {
        let Some(kitchen) = self.kitchen.as_ref() else {
            return;
        };
        let ids: Vec<UnitId> = self.units.keys().copied().collect();
        for id in ids {
            let taken: Vec<Pos> = self
                .units
                .values()
                .filter(|u| u.id != id)
                .filter_map(|u| u.stations)
                .flat_map(|s| s.claimed())
                .collect();
            let Some(unit) = self.units.get_mut(&id) else {
                continue;
            };
            if unit.stations.is_some() || unit.missing.is_some() {
                continue;
            }
            match Stations::resolve(&kitchen.index, unit.pos, &taken) {
                Ok(stations) => {
                    debug!(unit = %id, ?stations, "Stations bound");
                    unit.stations = Some(stations);
                }
                Err(category) => {
                    warn!(unit = %id, ?category, "Map has no tile of a required category");
                    unit.missing = Some(category);
                    self.events
                        .record(turn, Some(id), DecisionKind::MissingTile { category });
                }
            }
        }
    }

    /// Pull the last unit off orders once the raid window opens.
    fn start_raid<A: KitchenApi>(&mut self, api: &A, turn: u32) {
        if !self.raid.should_start(turn) {
            return;
        }
        let Some(unit) = self.units.values_mut().next_back() else {
            return;
        };
        unit.release(turn, ReleaseReason::Raid, &mut self.events);
        if api.bot(unit.id).is_some_and(|bot| bot.holding.is_some()) {
            unit.state = WorkflowState::ForcedTrash;
        }
        self.raid.start(unit.id);
    }

    /// Give each idle unit the best order nobody else holds.
    fn assign_orders<A: KitchenApi>(&mut self, api: &A, turn: u32) {
        let orders = api.orders();
        let raider = self.raid.unit();
        let ids: Vec<UnitId> = self.units.keys().copied().collect();

        for id in ids {
            if raider == Some(id) {
                continue;
            }
            let taken: HashSet<OrderId> = self
                .units
                .values()
                .filter(|u| u.id != id)
                .filter_map(Unit::order_id)
                .collect();
            let busy = busy_tiles(&self.units, id, raider);
            let Some(unit) = self.units.get_mut(&id) else {
                continue;
            };
            let Some(stations) = unit.stations else {
                continue;
            };
            if unit.assignment.is_some() {
                continue;
            }
            if stations.claimed().iter().any(|pos| busy.contains(pos)) {
                debug!(unit = %id, "Stations shared with a busy unit; waiting");
                continue;
            }
            let Some(assignment) = self.assigner.choose(&orders, turn, &taken) else {
                continue;
            };

            info!(
                unit = %id,
                order = %assignment.order_id,
                expected_value = assignment.expected_value,
                "Order assigned"
            );
            self.events.record(
                turn,
                Some(id),
                DecisionKind::Assigned {
                    order_id: assignment.order_id,
                    expected_value: assignment.expected_value,
                },
            );
            unit.assignment = Some(assignment);
        }
    }
}

/// Station tiles in use by units other than `id`.
///
/// A unit is busy while it holds an order or is anywhere past NOTHING (the
/// wash cycle runs after its order is released). The raider is skipped: its
/// workflow is suspended.
fn busy_tiles(units: &BTreeMap<UnitId, Unit>, id: UnitId, raider: Option<UnitId>) -> BTreeSet<Pos> {
    units
        .values()
        .filter(|u| u.id != id && Some(u.id) != raider)
        .filter(|u| u.assignment.is_some() || u.state != WorkflowState::Nothing)
        .filter_map(|u| u.stations)
        .flat_map(|s| s.claimed())
        .collect()
}
