//! Random order stream for sandbox games.

use rand::seq::SliceRandom;
use rand::Rng;

use kitchen_events::{Catalog, FoodKind, Order};

/// Spread `count` orders over the first `horizon` turns.
///
/// Each order asks for one to three ingredients and pays two to four times
/// their cost; its window is long enough to cook everything with some slack.
pub fn generate_orders<R: Rng>(rng: &mut R, count: usize, horizon: u32, prices: &Catalog) -> Vec<Order> {
    let spacing = (horizon / count.max(1) as u32).max(1);
    (0..count)
        .map(|i| {
            let size: u32 = rng.gen_range(1..=3);
            let required: Vec<FoodKind> = (0..size)
                .filter_map(|_| FoodKind::all().choose(rng).copied())
                .collect();
            let cost: i64 = required.iter().map(|k| prices.food_cost(*k)).sum();
            let reward = cost * rng.gen_range(2..=4);
            let penalty = rng.gen_range(5..=30);
            let created = i as u32 * spacing;
            let window = 40 * size + rng.gen_range(20..=60);
            Order::new(i as u32 + 1, required, reward, penalty)
                .with_window(created, created + window)
        })
        .collect()
}
