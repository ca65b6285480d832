//! Decision Trace Types
//!
//! Structured record of what the decision core did each turn. One JSON object
//! per line when written out.

use serde::{Deserialize, Serialize};

use crate::geometry::Pos;
use crate::order::{OrderId, UnitId};
use crate::tile::TileCategory;

/// World-mutating request kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Move,
    Buy,
    Place,
    Pickup,
    Chop,
    TakeFromPan,
    AddFoodToPlate,
    Submit,
    Trash,
    WashSink,
    TakeCleanPlate,
    SwitchMaps,
}

/// Why a unit let go of its order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseReason {
    /// Plate was accepted
    Submitted,
    /// Expiry turn passed while held
    Expired,
    /// Order vanished, went inactive, or was claimed elsewhere
    Stale,
    /// Unit was pulled off to raid
    Raid,
}

/// What happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionKind {
    Assigned {
        order_id: OrderId,
        expected_value: f64,
    },
    Released {
        order_id: OrderId,
        reason: ReleaseReason,
    },
    Transition {
        from: String,
        to: String,
    },
    ActionRejected {
        action: ActionKind,
        state: String,
    },
    NoRoute {
        destination: Pos,
    },
    MissingTile {
        category: TileCategory,
    },
    RaidStep {
        state: String,
    },
}

/// One trace record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionEvent {
    pub event_id: String,
    pub turn: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<UnitId>,
    #[serde(flatten)]
    pub kind: DecisionKind,
}
