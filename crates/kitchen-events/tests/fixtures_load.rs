//! Fixture loading tests.

#![cfg(feature = "test-fixtures")]

use kitchen_events::{fixtures, FoodKind, OrderId};

#[test]
fn test_sample_orders_load() {
    let orders = fixtures::sample_orders();
    assert_eq!(orders.len(), 4);
    assert_eq!(orders[0].order_id, OrderId(1));
    assert_eq!(orders[0].required, vec![FoodKind::Meat]);
    assert!(orders.iter().all(|o| o.is_active && o.claimed_by.is_none()));
}

#[test]
fn test_layouts_are_rectangular() {
    for layout in [
        fixtures::kitchen_layout(),
        fixtures::enclosed_layout(),
        fixtures::corridor_layout(),
    ] {
        let widths: Vec<usize> = layout
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| l.len())
            .collect();
        assert!(!widths.is_empty());
        assert!(widths.iter().all(|w| *w == widths[0]));
    }
}
