//! Steering
//!
//! Wraps the pathfinder with the per-unit obstacle policy: other units block,
//! and the cell a unit just left is avoided unless that leaves no route.

use kitchen_events::{Pos, Step};

use crate::world::Grid;

use super::Pathfinder;

/// Next step for a unit at `start` heading next to `destination`.
///
/// `others` are the tracked positions of every other unit. `avoid` is the
/// forced-reverse cell; it is dropped from the obstacle set when keeping it
/// would leave the unit without a route.
pub fn steer(
    pathfinder: &mut Pathfinder,
    grid: &Grid,
    start: Pos,
    destination: Pos,
    others: &[Pos],
    avoid: Option<Pos>,
) -> Option<Step> {
    if let Some(avoid) = avoid.filter(|p| *p != start) {
        pathfinder.set_obstacles(others.iter().copied().chain(std::iter::once(avoid)));
        if let Some(step) = pathfinder.next_step(grid, start, destination) {
            return Some(step);
        }
    }
    pathfinder.set_obstacles(others.iter().copied());
    pathfinder.next_step(grid, start, destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen_events::TileCategory;

    fn corridor() -> Grid {
        // Single-lane corridor with the target at the east end
        Grid::from_fn(6, 3, |p| match (p.x, p.y) {
            (5, 1) => TileCategory::Counter,
            (_, 1) => TileCategory::Floor,
            _ => TileCategory::Wall,
        })
    }

    #[test]
    fn test_avoided_cell_dropped_when_only_route() {
        let grid = corridor();
        let mut finder = Pathfinder::new(true);
        let step = steer(&mut finder, &grid, Pos::new(1, 1), Pos::new(5, 1), &[], Some(Pos::new(2, 1)));
        assert_eq!(step, Some(Step::new(1, 0)));
    }

    #[test]
    fn test_avoided_cell_respected_when_alternative_exists() {
        let grid = Grid::from_fn(5, 5, |p| {
            if p == Pos::new(4, 2) {
                TileCategory::Counter
            } else {
                TileCategory::Floor
            }
        });
        let mut finder = Pathfinder::new(false);
        let step = steer(&mut finder, &grid, Pos::new(1, 2), Pos::new(4, 2), &[], Some(Pos::new(2, 2)))
            .unwrap();
        assert_ne!(Pos::new(1, 2).offset(step), Pos::new(2, 2));
    }

    #[test]
    fn test_other_units_always_block() {
        let grid = corridor();
        let mut finder = Pathfinder::new(true);
        let step = steer(&mut finder, &grid, Pos::new(1, 1), Pos::new(5, 1), &[Pos::new(3, 1)], None);
        assert_eq!(step, None);
    }
}
