//! Unit Record
//!
//! Everything the fleet tracks about one controlled unit between turns.

use tracing::info;

use kitchen_events::{DecisionKind, OrderId, Pos, ReleaseReason, TileCategory, UnitId};

use crate::events::TurnEvents;
use crate::orders::Assignment;

use super::{Stations, WorkflowState};

/// Component: per-unit decision state
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub id: UnitId,
    /// Tracked position (updated eagerly after a successful move)
    pub pos: Pos,
    /// Cell occupied before the last move
    pub previous_pos: Option<Pos>,
    pub state: WorkflowState,
    pub assignment: Option<Assignment>,
    /// Bound working tiles; `None` until resolved
    pub stations: Option<Stations>,
    /// Required tile category the map lacks, once discovered
    pub missing: Option<TileCategory>,
}

impl Unit {
    pub fn new(id: UnitId, pos: Pos) -> Self {
        Self {
            id,
            pos,
            previous_pos: None,
            state: WorkflowState::Nothing,
            assignment: None,
            stations: None,
            missing: None,
        }
    }

    pub fn order_id(&self) -> Option<OrderId> {
        self.assignment.as_ref().map(|a| a.order_id)
    }

    /// Let go of the held order, if any
    pub fn release(
        &mut self,
        turn: u32,
        reason: ReleaseReason,
        events: &mut TurnEvents,
    ) -> Option<Assignment> {
        let assignment = self.assignment.take()?;
        info!(
            unit = %self.id,
            order = %assignment.order_id,
            ?reason,
            "Order released"
        );
        events.record(
            turn,
            Some(self.id),
            DecisionKind::Released {
                order_id: assignment.order_id,
                reason,
            },
        );
        Some(assignment)
    }
}
