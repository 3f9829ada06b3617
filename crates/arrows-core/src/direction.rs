use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MapError;

/// Facing of a tile. The discriminant is the wire code and must never change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    #[default]
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    /// All directions in wire-code order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Zero-based code stored in the byte stream
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Look up a direction by its wire code
    pub fn from_code(code: u8) -> Result<Self, MapError> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(MapError::InvalidDirection(code))
    }

    /// Direction rotated 90 degrees clockwise
    pub fn rotate_cw(self) -> Self {
        Self::ALL[(self.code() as usize + 1) % 4]
    }

    /// Direction rotated 90 degrees counter-clockwise
    pub fn rotate_ccw(self) -> Self {
        Self::ALL[(self.code() as usize + 3) % 4]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(Direction::North.code(), 0);
        assert_eq!(Direction::East.code(), 1);
        assert_eq!(Direction::South.code(), 2);
        assert_eq!(Direction::West.code(), 3);
    }

    #[test]
    fn test_from_code() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_code(dir.code()).unwrap(), dir);
        }
        assert!(matches!(
            Direction::from_code(4),
            Err(MapError::InvalidDirection(4))
        ));
    }

    #[test]
    fn test_rotation() {
        assert_eq!(Direction::North.rotate_cw(), Direction::East);
        assert_eq!(Direction::West.rotate_cw(), Direction::North);
        assert_eq!(Direction::North.rotate_ccw(), Direction::West);
        for direction in Direction::ALL {
            assert_eq!(direction.rotate_cw().rotate_ccw(), direction);
        }
    }
}
