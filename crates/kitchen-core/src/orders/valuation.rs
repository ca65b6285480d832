//! Order Valuation
//!
//! Turns each visible order into a risk-adjusted expected value:
//!
//! - cost: sum of ingredient prices
//! - estimated time: per-ingredient cook + chop + fixed overhead turns
//! - time buffer: turns left before expiry minus estimated time
//! - success probability: logistic of the buffer (0 buffer = 50%)
//! - expected value: (reward − cost)·p − (penalty + cost)·(1 − p)

use kitchen_events::{Catalog, Order, OrderId};

use crate::config::ValuationConfig;

/// Valuation breakdown for one order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderScore {
    pub order_id: OrderId,
    pub cost: i64,
    pub estimated_time: u32,
    pub time_buffer: i64,
    pub success_probability: f64,
    pub expected_value: f64,
}

/// An order paired with its valuation
#[derive(Debug, Clone, PartialEq)]
pub struct RankedOrder {
    pub order: Order,
    pub score: OrderScore,
}

/// Scores and ranks orders with fixed constants and prices.
#[derive(Debug, Clone, Default)]
pub struct Valuer {
    config: ValuationConfig,
    prices: Catalog,
}

impl Valuer {
    pub fn new(config: ValuationConfig, prices: Catalog) -> Self {
        Self { config, prices }
    }

    pub fn prices(&self) -> &Catalog {
        &self.prices
    }

    /// Ingredient cost of an order
    pub fn cost(&self, order: &Order) -> i64 {
        order
            .required
            .iter()
            .map(|kind| self.prices.food_cost(*kind))
            .sum()
    }

    /// Turns needed to prepare every ingredient of an order
    pub fn estimated_time(&self, order: &Order) -> u32 {
        order
            .required
            .iter()
            .map(|kind| {
                let cook = if kind.can_cook() { self.config.cook_turns } else { 0 };
                let chop = if kind.can_chop() { self.config.chop_turns } else { 0 };
                cook + chop + self.config.per_item_overhead
            })
            .sum()
    }

    /// Logistic of the time buffer
    pub fn success_probability(&self, time_buffer: i64) -> f64 {
        1.0 / (1.0 + (-(time_buffer as f64) / self.config.steepness).exp())
    }

    /// Full breakdown for one order at `turn`
    pub fn score(&self, order: &Order, turn: u32) -> OrderScore {
        let cost = self.cost(order);
        let estimated_time = self.estimated_time(order);
        let time_remaining = order.expires_turn as i64 - turn as i64;
        let time_buffer = time_remaining - estimated_time as i64;
        let p = self.success_probability(time_buffer);
        let expected_value =
            (order.reward - cost) as f64 * p - (order.penalty + cost) as f64 * (1.0 - p);

        OrderScore {
            order_id: order.order_id,
            cost,
            estimated_time,
            time_buffer,
            success_probability: p,
            expected_value,
        }
    }

    /// Open orders sorted by expected value, highest first.
    ///
    /// Claimed, inactive and expired orders are dropped before scoring.
    /// The sort is stable: equal expected values keep the game's listing order.
    pub fn rank(&self, orders: &[Order], turn: u32) -> Vec<RankedOrder> {
        let mut ranked: Vec<RankedOrder> = orders
            .iter()
            .filter(|order| order.is_open(turn))
            .map(|order| RankedOrder {
                order: order.clone(),
                score: self.score(order, turn),
            })
            .collect();
        ranked.sort_by(|a, b| b.score.expected_value.total_cmp(&a.score.expected_value));
        ranked
    }
}
