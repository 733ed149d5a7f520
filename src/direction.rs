//! Direction algebra for the plot grid.
//!
//! Eight ordinal/cardinal directions in clockwise order starting at north,
//! and the four cardinal directions rivers travel along between lattice
//! vertices. North is (0, -1): row 0 is the top of the map.

use serde::{Deserialize, Serialize};

/// Direction indices for 8-neighbor analysis
/// Order: N, NE, E, SE, S, SW, W, NW
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

/// Direction offsets for 8-neighbor analysis (dx, dy)
pub const DIR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // E
    (1, 1),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // W
    (-1, -1), // NW
];

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 8]
    }

    /// Unit step (dx, dy) for one move in this direction.
    pub fn step(self) -> (i32, i32) {
        DIR_OFFSETS[self.index()]
    }

    pub fn is_diagonal(self) -> bool {
        self.index() % 2 == 1
    }

    /// Turn by `steps` eighth-turns; clockwise is positive.
    pub fn rotate(self, steps: i32) -> Self {
        Self::from_index((self.index() as i32 + steps).rem_euclid(8) as usize)
    }

    pub fn opposite(self) -> Self {
        self.rotate(4)
    }

    /// The cardinal direction(s) that make up this direction:
    /// one for axis-aligned directions, two (clockwise order) for diagonals.
    pub fn cardinals(self) -> Vec<CardinalDirection> {
        let first = CardinalDirection::from_index(self.index() / 2);
        if self.is_diagonal() {
            vec![first, CardinalDirection::from_index(self.index() / 2 + 1)]
        } else {
            vec![first]
        }
    }

    /// Coarse direction from (x, y) toward (fx, fy), ignoring wrap.
    ///
    /// Axis-aligned directions win while one delta is at least twice the other.
    /// Returns `None` for identical coordinates.
    pub fn classify(x: i32, y: i32, fx: i32, fy: i32) -> Option<Direction> {
        let dx = (x - fx).abs();
        let dy = (y - fy).abs();
        let dir = if x > fx && dx >= 2 * dy {
            Direction::West
        } else if x < fx && dx >= 2 * dy {
            Direction::East
        } else if y < fy && dy >= 2 * dx {
            Direction::South
        } else if y > fy && dy >= 2 * dx {
            Direction::North
        } else if x > fx && y < fy {
            Direction::SouthWest
        } else if x > fx && y > fy {
            Direction::NorthWest
        } else if x < fx && y < fy {
            Direction::SouthEast
        } else if x < fx && y > fy {
            Direction::NorthEast
        } else {
            return None;
        };
        Some(dir)
    }
}

/// The four directions a river edge can run from a lattice vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardinalDirection {
    North,
    East,
    South,
    West,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::North,
        CardinalDirection::East,
        CardinalDirection::South,
        CardinalDirection::West,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    pub fn step(self) -> (i32, i32) {
        self.direction().step()
    }

    /// The matching 8-way direction.
    pub fn direction(self) -> Direction {
        Direction::from_index(self.index() * 2)
    }

    /// True for north/south (edges along a plot's east side).
    pub fn is_vertical(self) -> bool {
        matches!(self, CardinalDirection::North | CardinalDirection::South)
    }

    pub fn name(self) -> &'static str {
        match self {
            CardinalDirection::North => "North",
            CardinalDirection::East => "East",
            CardinalDirection::South => "South",
            CardinalDirection::West => "West",
        }
    }
}

impl std::fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_unit_vectors() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.step();
            assert!(dx.abs() <= 1 && dy.abs() <= 1);
            assert_eq!(dir.is_diagonal(), dx != 0 && dy != 0);
            let (ox, oy) = dir.opposite().step();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn test_rotate_wraps_both_ways() {
        assert_eq!(Direction::North.rotate(-1), Direction::NorthWest);
        assert_eq!(Direction::NorthWest.rotate(1), Direction::North);
        assert_eq!(Direction::East.rotate(10), Direction::South);
    }

    #[test]
    fn test_cardinals_of_diagonals() {
        assert_eq!(
            Direction::NorthEast.cardinals(),
            vec![CardinalDirection::North, CardinalDirection::East]
        );
        assert_eq!(
            Direction::NorthWest.cardinals(),
            vec![CardinalDirection::West, CardinalDirection::North]
        );
        assert_eq!(Direction::South.cardinals(), vec![CardinalDirection::South]);
    }

    #[test]
    fn test_classify_prefers_axis() {
        assert_eq!(Direction::classify(5, 5, 5, 5), None);
        assert_eq!(Direction::classify(5, 5, 9, 6), Some(Direction::East));
        assert_eq!(Direction::classify(5, 5, 4, 0), Some(Direction::North));
        assert_eq!(Direction::classify(5, 5, 8, 7), Some(Direction::SouthEast));
        assert_eq!(Direction::classify(5, 5, 3, 3), Some(Direction::NorthWest));
        assert_eq!(Direction::classify(5, 5, 2, 7), Some(Direction::SouthWest));
    }

    #[test]
    fn test_cardinal_opposites() {
        for card in CardinalDirection::ALL {
            assert_eq!(card.opposite().opposite(), card);
            assert_ne!(card.opposite(), card);
            assert_eq!(card.direction().cardinals(), vec![card]);
        }
    }
}
