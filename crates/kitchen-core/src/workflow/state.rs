//! Workflow States
//!
//! The closed set of steps a unit moves through while working an order.

use serde::{Deserialize, Serialize};

/// Component: current step of a unit's workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowState {
    /// No order; wander
    #[default]
    Nothing,
    /// Re-check tools and pick the next step
    Init,
    BuyPan,
    BuyPlate,
    PlacePlate,
    BuyFood,
    PlaceOnCounter,
    ChopFood,
    PickupChopped,
    CookFood,
    WaitAndTake,
    AddFood,
    Submit,
    WashDish,
    GetPlateFromSinkTable,
    /// Discard the held item (or the plate on the submission tile)
    Trash,
    /// Discard whatever is held before a step that needs empty hands
    ForcedTrash,
}

impl WorkflowState {
    /// Name used in traces and logs
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Nothing => "NOTHING",
            WorkflowState::Init => "INIT",
            WorkflowState::BuyPan => "BUY_PAN",
            WorkflowState::BuyPlate => "BUY_PLATE",
            WorkflowState::PlacePlate => "PLACE_PLATE",
            WorkflowState::BuyFood => "BUY_FOOD",
            WorkflowState::PlaceOnCounter => "PLACE_ON_COUNTER",
            WorkflowState::ChopFood => "CHOP_FOOD",
            WorkflowState::PickupChopped => "PICKUP_CHOPPED",
            WorkflowState::CookFood => "COOK_FOOD",
            WorkflowState::WaitAndTake => "WAIT_AND_TAKE",
            WorkflowState::AddFood => "ADD_FOOD",
            WorkflowState::Submit => "SUBMIT",
            WorkflowState::WashDish => "WASH_DISH",
            WorkflowState::GetPlateFromSinkTable => "GET_PLATE_FROM_SINKTABLE",
            WorkflowState::Trash => "TRASH",
            WorkflowState::ForcedTrash => "FORCED_TRASH",
        }
    }

    /// States that maintain the pan or plate rather than a specific order.
    ///
    /// A unit in one of these keeps going when its order is dropped.
    pub fn is_tool_state(&self) -> bool {
        matches!(
            self,
            WorkflowState::BuyPan
                | WorkflowState::BuyPlate
                | WorkflowState::PlacePlate
                | WorkflowState::WashDish
                | WorkflowState::GetPlateFromSinkTable
        )
    }

    /// States whose action needs empty hands
    pub fn requires_empty_hands(&self) -> bool {
        matches!(
            self,
            WorkflowState::BuyFood | WorkflowState::BuyPlate | WorkflowState::WaitAndTake
        )
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
