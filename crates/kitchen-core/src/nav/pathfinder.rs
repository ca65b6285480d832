//! First-Step Pathfinder
//!
//! Breadth-first search over the eight neighbours (plus staying put) that
//! answers one question: which single step brings a unit closer to standing
//! next to its destination. Other units are transient obstacles layered over
//! the static grid per query.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use kitchen_events::{Pos, Step, MOVES};

use crate::world::Grid;

/// Cache hit/miss counters for one pathfinder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Routes memoized under one obstacle snapshot
type Routes = HashMap<(Pos, Pos), Option<Step>>;

/// Bound on distinct obstacle snapshots kept before the cache is reset
const MAX_SNAPSHOTS: usize = 256;

/// Memoizing first-step pathfinder.
///
/// Entries are keyed by (start, destination) under the obstacle snapshot
/// they were computed with, so an answer is only ever reused for the exact
/// obstacle set that produced it. Entries outlive the turn: the static grid
/// never changes, and units crossing the same cells with the same company
/// reuse earlier searches.
#[derive(Debug, Clone, Default)]
pub struct Pathfinder {
    cache: HashMap<BTreeSet<Pos>, Routes>,
    obstacles: BTreeSet<Pos>,
    caching: bool,
    stats: CacheStats,
}

impl Pathfinder {
    pub fn new(caching: bool) -> Self {
        Self {
            caching,
            ..Default::default()
        }
    }

    /// Drop all memoized routes (needed when the grid itself changes).
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Replace the dynamic obstacle snapshot. Routes memoized under other
    /// snapshots are kept and become visible again when that set returns.
    pub fn set_obstacles(&mut self, obstacles: impl IntoIterator<Item = Pos>) {
        self.obstacles = obstacles.into_iter().collect();
    }

    pub fn obstacles(&self) -> &BTreeSet<Pos> {
        &self.obstacles
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// First step from `start` toward any cell adjacent to `destination`.
    ///
    /// `Some(Step::STAY)` when already adjacent, `None` when no route exists
    /// under the current obstacles.
    pub fn next_step(&mut self, grid: &Grid, start: Pos, destination: Pos) -> Option<Step> {
        if !self.caching {
            return first_step(grid, start, destination, &self.obstacles);
        }
        if let Some(step) = self
            .cache
            .get(&self.obstacles)
            .and_then(|routes| routes.get(&(start, destination)))
        {
            self.stats.hits += 1;
            return *step;
        }
        self.stats.misses += 1;
        let step = first_step(grid, start, destination, &self.obstacles);
        if !self.cache.contains_key(&self.obstacles) && self.cache.len() >= MAX_SNAPSHOTS {
            self.cache.clear();
        }
        self.cache
            .entry(self.obstacles.clone())
            .or_default()
            .insert((start, destination), step);
        step
    }
}

/// Uncached breadth-first search. O(width × height).
pub fn first_step(
    grid: &Grid,
    start: Pos,
    destination: Pos,
    obstacles: &BTreeSet<Pos>,
) -> Option<Step> {
    if start.is_adjacent(destination) {
        return Some(Step::STAY);
    }

    let mut visited: HashSet<Pos> = HashSet::with_capacity(grid.area());
    let mut queue: VecDeque<(Pos, Step)> = VecDeque::new();
    visited.insert(start);

    for step in MOVES {
        let next = start.offset(step);
        if expandable(grid, next, obstacles, &visited) {
            visited.insert(next);
            queue.push_back((next, step));
        }
    }

    while let Some((cell, first)) = queue.pop_front() {
        if cell.is_adjacent(destination) {
            return Some(first);
        }
        for step in MOVES {
            let next = cell.offset(step);
            if expandable(grid, next, obstacles, &visited) {
                visited.insert(next);
                queue.push_back((next, first));
            }
        }
    }

    None
}

fn expandable(grid: &Grid, pos: Pos, obstacles: &BTreeSet<Pos>, visited: &HashSet<Pos>) -> bool {
    grid.is_walkable(pos) && !obstacles.contains(&pos) && !visited.contains(&pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen_events::TileCategory;

    /// Parse '#' as wall, 'C' as counter, everything else as floor.
    fn grid(rows: &[&str]) -> Grid {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        Grid::from_fn(width, height, |p| {
            match rows[p.y as usize].as_bytes()[p.x as usize] {
                b'#' => TileCategory::Wall,
                b'C' => TileCategory::Counter,
                _ => TileCategory::Floor,
            }
        })
    }

    #[test]
    fn test_adjacent_start_stays() {
        let g = grid(&["....", "..C.", "...."]);
        let step = first_step(&g, Pos::new(1, 0), Pos::new(2, 1), &BTreeSet::new());
        assert_eq!(step, Some(Step::STAY));
    }

    #[test]
    fn test_diagonal_moves_count_as_one() {
        let g = grid(&[".....", ".....", ".....", ".....", "....C"]);
        // Only three diagonal steps reach (3, 3) in the minimum three turns
        let step = first_step(&g, Pos::new(0, 0), Pos::new(4, 4), &BTreeSet::new()).unwrap();
        assert_eq!(step, Step::new(1, 1));
    }

    #[test]
    fn test_walls_force_detour() {
        let g = grid(&[
            ".#...", //
            ".#.C.", //
            ".....",
        ]);
        let step = first_step(&g, Pos::new(0, 0), Pos::new(3, 1), &BTreeSet::new()).unwrap();
        assert_eq!(step, Step::new(0, 1));
    }

    #[test]
    fn test_enclosed_destination_has_no_route() {
        let g = grid(&[
            ".....", //
            ".###.", //
            ".#C#.", //
            ".###.", //
            ".....",
        ]);
        for _ in 0..3 {
            assert_eq!(first_step(&g, Pos::new(0, 0), Pos::new(2, 2), &BTreeSet::new()), None);
        }
    }

    #[test]
    fn test_units_block_corridor() {
        let g = grid(&[
            "#####", //
            "....C", //
            "#####",
        ]);
        let blocked: BTreeSet<Pos> = [Pos::new(2, 1)].into_iter().collect();
        assert_eq!(first_step(&g, Pos::new(0, 1), Pos::new(4, 1), &blocked), None);
        assert_eq!(
            first_step(&g, Pos::new(0, 1), Pos::new(4, 1), &BTreeSet::new()),
            Some(Step::new(1, 0))
        );
    }

    #[test]
    fn test_cache_hits_and_invalidation() {
        let g = grid(&["......", "......", ".....C"]);
        let mut finder = Pathfinder::new(true);

        let a = finder.next_step(&g, Pos::new(0, 0), Pos::new(5, 2));
        let b = finder.next_step(&g, Pos::new(0, 0), Pos::new(5, 2));
        assert_eq!(a, b);
        assert_eq!(finder.stats(), CacheStats { hits: 1, misses: 1 });

        // Same obstacles again: cache survives
        finder.set_obstacles(Vec::new());
        finder.next_step(&g, Pos::new(0, 0), Pos::new(5, 2));
        assert_eq!(finder.stats().hits, 2);

        // Different obstacles: recomputed
        finder.set_obstacles([Pos::new(1, 1)]);
        let c = finder.next_step(&g, Pos::new(0, 0), Pos::new(5, 2));
        assert_eq!(finder.stats().misses, 2);
        assert_ne!(c, Some(Step::new(1, 1)));

        // Back to the first snapshot: its routes were kept
        finder.set_obstacles(Vec::new());
        assert_eq!(finder.next_step(&g, Pos::new(0, 0), Pos::new(5, 2)), a);
        assert_eq!(finder.stats(), CacheStats { hits: 3, misses: 2 });
    }

    #[test]
    fn test_routes_survive_snapshot_churn() {
        let g = grid(&["......", "......", ".....C"]);
        let mut finder = Pathfinder::new(true);
        for round in 0..2 {
            for x in 0..4 {
                finder.set_obstacles([Pos::new(x, 1)]);
                finder.next_step(&g, Pos::new(0, 0), Pos::new(5, 2));
            }
            let expected = if round == 0 { 0 } else { 4 };
            assert_eq!(finder.stats().hits, expected);
        }
        assert_eq!(finder.stats().misses, 4);
    }

    #[test]
    fn test_repeated_steps_reach_target() {
        let g = grid(&[
            "........", //
            ".######.", //
            ".#....#.", //
            ".#.C..#.", //
            ".#....#.", //
            ".###.##.", //
            "........",
        ]);
        let destination = Pos::new(3, 3);
        let mut pos = Pos::new(0, 0);
        let bound = (g.width() * g.height()) as usize;
        let mut turns = 0;
        while !pos.is_adjacent(destination) {
            let step = first_step(&g, pos, destination, &BTreeSet::new()).expect("route exists");
            assert!(!step.is_stay());
            pos = pos.offset(step);
            assert!(g.is_walkable(pos));
            turns += 1;
            assert!(turns <= bound);
        }
    }
}
