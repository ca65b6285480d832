//! Pathfinding on the fixture kitchens

use std::collections::BTreeSet;

use kitchen_core::nav::first_step;
use kitchen_core::{Layout, Pathfinder, TileIndex};
use kitchen_events::{fixtures, Pos, Step, TileCategory};

#[test]
fn test_corridor_walk_reaches_counter() {
    let layout = Layout::parse(fixtures::corridor_layout()).unwrap();
    let counter = TileIndex::build(&layout.grid)
        .nearest(layout.spawns[0], TileCategory::Counter)
        .unwrap();
    let mut pathfinder = Pathfinder::new(true);

    let mut pos = layout.spawns[0];
    let mut steps = 0;
    while !pos.is_adjacent(counter) {
        pathfinder.clear();
        let step = pathfinder.next_step(&layout.grid, pos, counter).unwrap();
        assert!(!step.is_stay());
        pos = pos.offset(step);
        assert!(layout.grid.is_walkable(pos));
        steps += 1;
        assert!(steps <= layout.grid.area());
    }
    // Straight along the top row: (1,1) to (8,1)
    assert_eq!(steps, 7);
}

#[test]
fn test_enclosed_counter_never_routes() {
    let layout = Layout::parse(fixtures::enclosed_layout()).unwrap();
    let start = layout.spawns[0];
    let counter = Pos::new(3, 3);
    let mut pathfinder = Pathfinder::new(true);

    for _ in 0..3 {
        assert_eq!(pathfinder.next_step(&layout.grid, start, counter), None);
    }
    let stats = pathfinder.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);
}

#[test]
fn test_cached_answers_match_fresh_search() {
    let layout = Layout::parse(fixtures::kitchen_layout()).unwrap();
    let grid = &layout.grid;
    let index = TileIndex::build(grid);
    let targets: Vec<Pos> = [TileCategory::Shop, TileCategory::Cooker, TileCategory::Trash]
        .into_iter()
        .flat_map(|c| index.all(c).to_vec())
        .collect();
    let obstacles: BTreeSet<Pos> = layout.spawns.iter().copied().collect();

    let mut pathfinder = Pathfinder::new(true);
    pathfinder.set_obstacles(obstacles.iter().copied());
    for start in grid.positions().filter(|p| grid.is_walkable(*p)) {
        for target in &targets {
            let fresh = first_step(grid, start, *target, &obstacles);
            assert_eq!(pathfinder.next_step(grid, start, *target), fresh);
            assert_eq!(pathfinder.next_step(grid, start, *target), fresh);
        }
    }
    assert!(pathfinder.stats().hits >= pathfinder.stats().misses);
}

#[test]
fn test_adjacent_start_stays() {
    let layout = Layout::parse(fixtures::kitchen_layout()).unwrap();
    let mut pathfinder = Pathfinder::new(false);
    // Spawn (4,1) is not adjacent to the shop; (2,1) is
    assert_ne!(
        pathfinder.next_step(&layout.grid, Pos::new(4, 1), Pos::new(1, 1)),
        Some(Step::STAY)
    );
    assert_eq!(
        pathfinder.next_step(&layout.grid, Pos::new(2, 1), Pos::new(1, 1)),
        Some(Step::STAY)
    );
    assert_eq!(pathfinder.stats().misses, 0);
}
