//! Raid Controller
//!
//! Late-game sabotage run by one unit: cross to the enemy kitchen, pick up a
//! piece of the target food from a counter or box, and throw it away at the
//! enemy's trash. Runs once per game; a finished raid never restarts.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use kitchen_events::{ActionKind, DecisionKind, Item, Pos, TileCategory, UnitId};

use crate::api::{KitchenApi, Side};
use crate::config::RaidConfig;
use crate::events::TurnEvents;
use crate::nav::{steer, Pathfinder};
use crate::world::{Grid, TileIndex};

/// Component: progress of the raid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RaidState {
    #[default]
    Idle,
    SwitchingToEnemy,
    FindingTarget,
    MovingToTarget,
    PickingUp,
    FindingTrash,
    MovingToTrash,
    Trashing,
    Complete,
    Failed,
}

impl RaidState {
    pub fn name(&self) -> &'static str {
        match self {
            RaidState::Idle => "IDLE",
            RaidState::SwitchingToEnemy => "SWITCHING_TO_ENEMY",
            RaidState::FindingTarget => "FINDING_TARGET",
            RaidState::MovingToTarget => "MOVING_TO_TARGET",
            RaidState::PickingUp => "PICKING_UP",
            RaidState::FindingTrash => "FINDING_TRASH",
            RaidState::MovingToTrash => "MOVING_TO_TRASH",
            RaidState::Trashing => "TRASHING",
            RaidState::Complete => "COMPLETE",
            RaidState::Failed => "FAILED",
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, RaidState::Complete | RaidState::Failed)
    }
}

/// The enemy kitchen's static layout, loaded on first sight
#[derive(Debug, Clone)]
struct EnemyMap {
    grid: Grid,
    index: TileIndex,
}

#[derive(Debug, Clone)]
pub struct RaidController {
    config: RaidConfig,
    state: RaidState,
    unit: Option<UnitId>,
    target: Option<Pos>,
    trash: Option<Pos>,
    enemy: Option<EnemyMap>,
    pathfinder: Pathfinder,
    /// The trip home has been attempted after finishing
    returned: bool,
}

impl RaidController {
    pub fn new(config: RaidConfig) -> Self {
        Self {
            config,
            state: RaidState::Idle,
            unit: None,
            target: None,
            trash: None,
            enemy: None,
            pathfinder: Pathfinder::new(true),
            returned: false,
        }
    }

    pub fn state(&self) -> RaidState {
        self.state
    }

    /// The unit currently raiding
    pub fn unit(&self) -> Option<UnitId> {
        self.unit
    }

    /// Whether a raid should begin this turn
    pub fn should_start(&self, turn: u32) -> bool {
        self.config.enabled
            && self.unit.is_none()
            && self.state == RaidState::Idle
            && turn >= self.config.start_turn
            && turn < self.config.timeout_turn
    }

    pub fn start(&mut self, unit: UnitId) {
        info!(%unit, target = %self.config.target, "Raid started");
        self.unit = Some(unit);
    }

    /// Hand the unit back once the raid has finished and it is home.
    pub fn take_returning(&mut self) -> Option<UnitId> {
        if self.state.is_finished() && self.returned {
            self.unit.take()
        } else {
            None
        }
    }

    /// Advance the raid by one turn for `unit`.
    ///
    /// Non-acting transitions chain; at most one world action is attempted.
    pub fn step<A: KitchenApi>(&mut self, api: &mut A, events: &mut TurnEvents) {
        let Some(unit) = self.unit else {
            return;
        };
        let turn = api.turn();

        if self.state.is_finished() {
            self.finish(unit, api, events, turn);
            return;
        }
        if turn >= self.config.timeout_turn {
            self.return_home(unit, api, events, turn);
            return;
        }

        let mut acted = false;
        for _ in 0..RAID_PASSES {
            let before = self.state;
            acted = self.advance(unit, api);
            if self.state != before {
                debug!(%unit, from = before.name(), to = self.state.name(), "Raid transition");
                events.record(
                    turn,
                    Some(unit),
                    DecisionKind::RaidStep {
                        state: self.state.name().to_string(),
                    },
                );
            }
            if acted || self.state == before || self.state.is_finished() {
                break;
            }
        }
        if self.state.is_finished() && !acted {
            self.finish(unit, api, events, turn);
        }
    }

    /// Returns whether a world action was attempted.
    fn advance<A: KitchenApi>(&mut self, unit: UnitId, api: &mut A) -> bool {
        let Some(bot) = api.bot(unit) else {
            self.state = RaidState::Failed;
            return false;
        };

        match self.state {
            RaidState::Idle => {
                self.state = RaidState::SwitchingToEnemy;
                false
            }
            RaidState::SwitchingToEnemy => {
                if bot.side == Side::Enemy {
                    self.state = RaidState::FindingTarget;
                    return false;
                }
                if !api.can_switch_maps() {
                    // Wait for the window to open; the timeout ends the wait
                    return false;
                }
                if api.switch_maps(unit) {
                    self.state = RaidState::FindingTarget;
                } else {
                    self.state = RaidState::Failed;
                }
                true
            }
            RaidState::FindingTarget => {
                if bot.side != Side::Enemy {
                    self.state = RaidState::SwitchingToEnemy;
                    return false;
                }
                self.target = self.find_target(api, bot.pos);
                self.state = match self.target {
                    Some(pos) => {
                        info!(%unit, %pos, "Raid target found");
                        RaidState::MovingToTarget
                    }
                    None => RaidState::Failed,
                };
                false
            }
            RaidState::MovingToTarget => {
                let target = match self.target {
                    Some(pos) if self.holds_target(api, pos) => pos,
                    _ => {
                        self.state = RaidState::FindingTarget;
                        return false;
                    }
                };
                if bot.pos.is_adjacent(target) {
                    self.state = RaidState::PickingUp;
                    return false;
                }
                self.move_toward(unit, api, bot.pos, target)
            }
            RaidState::PickingUp => {
                let Some(target) = self.target else {
                    self.state = RaidState::FindingTarget;
                    return false;
                };
                if api.pickup(unit, target) {
                    self.state = RaidState::FindingTrash;
                } else {
                    self.target = None;
                    self.state = RaidState::FindingTarget;
                }
                true
            }
            RaidState::FindingTrash => {
                self.trash = self
                    .enemy
                    .as_ref()
                    .and_then(|map| map.index.nearest(bot.pos, TileCategory::Trash));
                self.state = if self.trash.is_some() {
                    RaidState::MovingToTrash
                } else {
                    RaidState::Failed
                };
                false
            }
            RaidState::MovingToTrash => {
                let Some(trash) = self.trash else {
                    self.state = RaidState::FindingTrash;
                    return false;
                };
                if bot.pos.is_adjacent(trash) {
                    self.state = RaidState::Trashing;
                    return false;
                }
                self.move_toward(unit, api, bot.pos, trash)
            }
            RaidState::Trashing => {
                let Some(trash) = self.trash else {
                    self.state = RaidState::FindingTrash;
                    return false;
                };
                if api.trash(unit, trash) {
                    info!(%unit, "Raid succeeded");
                    self.state = RaidState::Complete;
                } else {
                    self.state = RaidState::Failed;
                }
                true
            }
            RaidState::Complete | RaidState::Failed => false,
        }
    }

    /// Nearest counter or box on the enemy side holding the target food
    fn find_target<A: KitchenApi>(&mut self, api: &A, from: Pos) -> Option<Pos> {
        if self.enemy.is_none() {
            let grid = api.grid(Side::Enemy)?;
            let index = TileIndex::build(&grid);
            self.enemy = Some(EnemyMap { grid, index });
        }
        let map = self.enemy.as_ref()?;
        map.index
            .all(TileCategory::Counter)
            .iter()
            .chain(map.index.all(TileCategory::Box))
            .copied()
            .filter(|pos| self.holds_target(api, *pos))
            .min_by_key(|pos| from.chebyshev(*pos))
    }

    fn holds_target<A: KitchenApi>(&self, api: &A, pos: Pos) -> bool {
        matches!(
            api.tile(Side::Enemy, pos).and_then(|t| t.item),
            Some(Item::Food(food)) if food.kind == self.config.target
        )
    }

    fn move_toward<A: KitchenApi>(&mut self, unit: UnitId, api: &mut A, from: Pos, to: Pos) -> bool {
        let Some(map) = self.enemy.as_ref() else {
            self.state = RaidState::Failed;
            return false;
        };
        match steer(&mut self.pathfinder, &map.grid, from, to, &[], None) {
            Some(step) if !step.is_stay() => {
                if !api.move_bot(unit, step) {
                    debug!(%unit, ?step, "Raid move rejected");
                }
                true
            }
            _ => {
                debug!(%unit, %to, "Raid has no route");
                false
            }
        }
    }

    fn return_home<A: KitchenApi>(
        &mut self,
        unit: UnitId,
        api: &mut A,
        events: &mut TurnEvents,
        turn: u32,
    ) {
        info!(%unit, state = self.state.name(), "Raid timed out");
        self.state = RaidState::Complete;
        events.record(
            turn,
            Some(unit),
            DecisionKind::RaidStep {
                state: self.state.name().to_string(),
            },
        );
        self.finish(unit, api, events, turn);
    }

    /// Head back to the home kitchen if still on the enemy side.
    fn finish<A: KitchenApi>(&mut self, unit: UnitId, api: &mut A, events: &mut TurnEvents, turn: u32) {
        self.returned = true;
        let on_enemy_side = api.bot(unit).is_some_and(|bot| bot.side == Side::Enemy);
        if !on_enemy_side {
            return;
        }
        if api.can_switch_maps() && api.switch_maps(unit) {
            info!(%unit, "Raider switched back home");
        } else {
            debug!(%unit, "Raider could not switch back home");
            events.record(
                turn,
                Some(unit),
                DecisionKind::ActionRejected {
                    action: ActionKind::SwitchMaps,
                    state: self.state.name().to_string(),
                },
            );
        }
    }
}

/// Bound on chained raid transitions per turn
const RAID_PASSES: usize = 4;

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RaidConfig {
        RaidConfig {
            enabled: true,
            start_turn: 10,
            timeout_turn: 20,
            ..Default::default()
        }
    }

    #[test]
    fn test_should_start_inside_window_only() {
        let raid = RaidController::new(config());
        assert!(!raid.should_start(9));
        assert!(raid.should_start(10));
        assert!(raid.should_start(19));
        assert!(!raid.should_start(20));

        let disabled = RaidController::new(RaidConfig::default());
        assert!(!disabled.should_start(300));
    }

    #[test]
    fn test_started_raid_does_not_restart() {
        let mut raid = RaidController::new(config());
        raid.start(UnitId(2));
        assert_eq!(raid.unit(), Some(UnitId(2)));
        assert!(!raid.should_start(12));
        // Not finished yet: the unit stays on the raid
        assert_eq!(raid.take_returning(), None);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(RaidState::MovingToTrash.name(), "MOVING_TO_TRASH");
        assert!(RaidState::Failed.is_finished());
        assert!(!RaidState::Trashing.is_finished());
    }
}
