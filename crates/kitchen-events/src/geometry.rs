//! Grid Geometry
//!
//! Cell coordinates, relative steps, and the Chebyshev metric used for
//! 8-directional movement.

use serde::{Deserialize, Serialize};

/// A grid cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance: max(|dx|, |dy|)
    pub fn chebyshev(&self, other: Pos) -> u32 {
        (self.x - other.x).unsigned_abs().max((self.y - other.y).unsigned_abs())
    }

    /// True when `other` is this cell or one of its eight neighbours
    pub fn is_adjacent(&self, other: Pos) -> bool {
        self.chebyshev(other) <= 1
    }

    /// The cell reached by taking `step` from here
    pub fn offset(&self, step: Step) -> Pos {
        Pos::new(self.x + step.dx, self.y + step.dy)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A relative move of at most one cell in each axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    pub dx: i32,
    pub dy: i32,
}

impl Step {
    /// The null move
    pub const STAY: Step = Step { dx: 0, dy: 0 };

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn is_stay(&self) -> bool {
        *self == Self::STAY
    }

    /// Whether this is a legal single-turn move (including the null move)
    pub fn is_unit(&self) -> bool {
        self.dx.abs() <= 1 && self.dy.abs() <= 1
    }
}

/// Search expansion order: stay, the four orthogonals, then the diagonals.
pub const MOVES: [Step; 9] = [
    Step::new(0, 0),
    Step::new(0, -1),
    Step::new(0, 1),
    Step::new(-1, 0),
    Step::new(1, 0),
    Step::new(-1, -1),
    Step::new(-1, 1),
    Step::new(1, -1),
    Step::new(1, 1),
];

/// The four diagonal moves, used by idle wandering
pub const DIAGONALS: [Step; 4] = [
    Step::new(-1, -1),
    Step::new(-1, 1),
    Step::new(1, -1),
    Step::new(1, 1),
];
