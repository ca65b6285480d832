//! Task Assignment
//!
//! Greedy, non-reassigning binding of orders to idle units, and the private
//! working copy of an order each unit carries while it works.

use std::collections::HashSet;

use kitchen_events::{FoodKind, Order, OrderId};

use crate::config::{AssignmentConfig, AssignmentPolicy};

use super::valuation::{RankedOrder, Valuer};

/// A unit's working copy of its order.
///
/// `remaining` is a multiset of ingredients still to buy; items are popped
/// off as they are bought and pushed back when discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub order_id: OrderId,
    pub expires_turn: u32,
    pub expected_value: f64,
    /// Still to be bought
    pub remaining: Vec<FoodKind>,
    /// Already on the plate
    pub plated: Vec<FoodKind>,
    /// Bought but not yet plated
    pub in_flight: Option<FoodKind>,
}

impl Assignment {
    pub fn new(order: &Order, expected_value: f64) -> Self {
        Self {
            order_id: order.order_id,
            expires_turn: order.expires_turn,
            expected_value,
            remaining: order.required.clone(),
            plated: Vec::new(),
            in_flight: None,
        }
    }

    fn from_ranked(ranked: &RankedOrder) -> Self {
        Self::new(&ranked.order, ranked.score.expected_value)
    }

    /// Next ingredient to buy (the end of the list)
    pub fn next_needed(&self) -> Option<FoodKind> {
        self.remaining.last().copied()
    }

    /// Pop the next ingredient after a successful purchase
    pub fn take_next(&mut self) -> Option<FoodKind> {
        let kind = self.remaining.pop()?;
        self.in_flight = Some(kind);
        Some(kind)
    }

    /// Put an ingredient back on the shopping list
    pub fn requeue(&mut self, kind: FoodKind) {
        if self.in_flight == Some(kind) {
            self.in_flight = None;
        }
        self.remaining.push(kind);
    }

    /// Re-queue whatever was in flight, if anything
    pub fn requeue_in_flight(&mut self) {
        if let Some(kind) = self.in_flight.take() {
            self.remaining.push(kind);
        }
    }

    /// The in-flight ingredient landed on the plate
    pub fn mark_plated(&mut self, kind: FoodKind) {
        if self.in_flight == Some(kind) {
            self.in_flight = None;
        }
        self.plated.push(kind);
    }

    /// The plate was emptied: everything on it must be bought again
    pub fn requeue_plated(&mut self) {
        self.remaining.append(&mut self.plated);
    }

    /// Nothing left to buy and nothing in flight
    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty() && self.in_flight.is_none()
    }

    pub fn is_expired(&self, turn: u32) -> bool {
        self.expires_turn <= turn
    }
}

/// Picks orders for idle units.
#[derive(Debug, Clone, Default)]
pub struct TaskAssigner {
    config: AssignmentConfig,
    valuer: Valuer,
}

impl TaskAssigner {
    pub fn new(config: AssignmentConfig, valuer: Valuer) -> Self {
        Self { config, valuer }
    }

    pub fn valuer(&self) -> &Valuer {
        &self.valuer
    }

    /// Best order for one idle unit, skipping ids held by other units.
    ///
    /// The ranking is recomputed on every call.
    pub fn choose(&self, orders: &[Order], turn: u32, taken: &HashSet<OrderId>) -> Option<Assignment> {
        match self.config.policy {
            AssignmentPolicy::ExpectedValue => self
                .valuer
                .rank(orders, turn)
                .iter()
                .filter(|r| !taken.contains(&r.order.order_id))
                .find(|r| self.worth_taking(r))
                .map(Assignment::from_ranked),
            AssignmentPolicy::FirstUnclaimed => orders
                .iter()
                .filter(|o| o.is_open(turn) && !taken.contains(&o.order_id))
                .map(|o| Assignment::new(o, self.valuer.score(o, turn).expected_value))
                .next(),
        }
    }

    fn worth_taking(&self, ranked: &RankedOrder) -> bool {
        let profitable = !self.config.require_profit || ranked.order.reward > ranked.score.cost;
        profitable && ranked.score.success_probability > self.config.min_success_probability
    }
}
