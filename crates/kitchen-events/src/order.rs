//! Order Types
//!
//! Customer orders as reported by the game, plus the identifier newtypes
//! shared across the workspace.

use serde::{Deserialize, Serialize};

use crate::item::FoodKind;

/// Identifier of a controlled unit (bot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u32);

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bot_{}", self.0)
    }
}

/// Identifier of a customer order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u32);

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// A customer order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    /// Ingredients the plate must contain (a multiset)
    pub required: Vec<FoodKind>,
    /// Paid on successful submission
    pub reward: i64,
    /// Charged when the order expires unserved
    pub penalty: i64,
    pub created_turn: u32,
    pub expires_turn: u32,
    /// Set once someone has served this order
    #[serde(default)]
    pub claimed_by: Option<u32>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Order {
    pub fn new(order_id: u32, required: Vec<FoodKind>, reward: i64, penalty: i64) -> Self {
        Self {
            order_id: OrderId(order_id),
            required,
            reward,
            penalty,
            created_turn: 0,
            expires_turn: u32::MAX,
            claimed_by: None,
            is_active: true,
        }
    }

    pub fn with_window(mut self, created_turn: u32, expires_turn: u32) -> Self {
        self.created_turn = created_turn;
        self.expires_turn = expires_turn;
        self
    }

    /// An order is expired on and after its expiry turn
    pub fn is_expired(&self, turn: u32) -> bool {
        self.expires_turn <= turn
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed_by.is_some()
    }

    /// Active, unclaimed and not yet expired
    pub fn is_open(&self, turn: u32) -> bool {
        self.is_active && !self.is_claimed() && !self.is_expired(turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_requires_active_unclaimed_unexpired() {
        let order = Order::new(1, vec![FoodKind::Meat], 20, 5).with_window(0, 100);
        assert!(order.is_open(0));
        assert!(order.is_open(99));
        assert!(!order.is_open(100));

        let mut claimed = order.clone();
        claimed.claimed_by = Some(3);
        assert!(!claimed.is_open(10));

        let mut inactive = order;
        inactive.is_active = false;
        assert!(!inactive.is_open(10));
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"order_id":7,"required":["EGG","SAUCE"],"reward":30,"penalty":4,"created_turn":2,"expires_turn":90}"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_id, OrderId(7));
        assert!(order.is_active);
        assert_eq!(order.claimed_by, None);
        assert_eq!(order.required, vec![FoodKind::Egg, FoodKind::Sauce]);
    }
}
