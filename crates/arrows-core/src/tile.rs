use serde::{Deserialize, Serialize};
use std::fmt;

use crate::direction::Direction;
use crate::error::MapError;

/// Kind of tile placed in a cell.
///
/// The discriminant is the wire code. New variants may only be appended;
/// reordering breaks every map already saved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileType {
    #[default]
    Empty = 0,
    Arrow = 1,
    Source = 2,
    Blocker = 3,
    Delay = 4,
    Detector = 5,
    SplitterUpDown = 6,
    SplitterUpRight = 7,
    SplitterUpRightLeft = 8,
    Pulse = 9,
    BlueArrow = 10,
    Diagonal = 11,
    BlueSplitterUpUp = 12,
    BlueSplitterRightUp = 13,
    BlueSplitterUpDiagonal = 14,
    Not = 15,
    And = 16,
    Xor = 17,
    Latch = 18,
    Flipflop = 19,
    Random = 20,
    Button = 21,
    LevelSource = 22,
    LevelTarget = 23,
    DirectionalButton = 24,
    Unknown = 25,
}

impl TileType {
    /// All tile types in wire-code order
    pub const ALL: [TileType; 26] = [
        TileType::Empty,
        TileType::Arrow,
        TileType::Source,
        TileType::Blocker,
        TileType::Delay,
        TileType::Detector,
        TileType::SplitterUpDown,
        TileType::SplitterUpRight,
        TileType::SplitterUpRightLeft,
        TileType::Pulse,
        TileType::BlueArrow,
        TileType::Diagonal,
        TileType::BlueSplitterUpUp,
        TileType::BlueSplitterRightUp,
        TileType::BlueSplitterUpDiagonal,
        TileType::Not,
        TileType::And,
        TileType::Xor,
        TileType::Latch,
        TileType::Flipflop,
        TileType::Random,
        TileType::Button,
        TileType::LevelSource,
        TileType::LevelTarget,
        TileType::DirectionalButton,
        TileType::Unknown,
    ];

    /// Zero-based code stored in the byte stream
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Look up a tile type by its wire code
    pub fn from_code(code: u8) -> Result<Self, MapError> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(MapError::InvalidTileType(code))
    }

    pub fn is_empty(self) -> bool {
        self == TileType::Empty
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Value of a single grid cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    #[serde(rename = "type")]
    pub tile_type: TileType,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "is_false")]
    pub flipped: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Tile {
    /// The Empty tile every fresh cell holds
    pub const EMPTY: Tile = Tile {
        tile_type: TileType::Empty,
        direction: Direction::North,
        flipped: false,
    };

    pub const fn new(tile_type: TileType, direction: Direction, flipped: bool) -> Self {
        Tile {
            tile_type,
            direction,
            flipped,
        }
    }

    /// A north-facing, unflipped tile of the given type
    pub const fn of(tile_type: TileType) -> Self {
        Tile::new(tile_type, Direction::North, false)
    }

    pub const fn with_direction(self, direction: Direction) -> Self {
        Tile { direction, ..self }
    }

    pub const fn with_flipped(self, flipped: bool) -> Self {
        Tile { flipped, ..self }
    }

    /// Check if the cell holds nothing, regardless of orientation
    pub fn is_empty(&self) -> bool {
        self.tile_type.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_type_codes() {
        assert_eq!(TileType::Empty.code(), 0);
        assert_eq!(TileType::Arrow.code(), 1);
        assert_eq!(TileType::Not.code(), 15);
        assert_eq!(TileType::DirectionalButton.code(), 24);
        assert_eq!(TileType::Unknown.code(), 25);

        for (i, tile_type) in TileType::ALL.iter().enumerate() {
            assert_eq!(tile_type.code() as usize, i);
            assert_eq!(TileType::from_code(i as u8).unwrap(), *tile_type);
        }
    }

    #[test]
    fn test_tile_type_out_of_range() {
        assert!(matches!(
            TileType::from_code(26),
            Err(MapError::InvalidTileType(26))
        ));
        assert!(TileType::from_code(255).is_err());
    }

    #[test]
    fn test_tile_defaults() {
        let tile = Tile::default();
        assert_eq!(tile, Tile::EMPTY);
        assert!(tile.is_empty());
        assert_eq!(tile.direction, Direction::North);
        assert!(!tile.flipped);
    }

    #[test]
    fn test_tile_builders() {
        let tile = Tile::of(TileType::Arrow)
            .with_direction(Direction::East)
            .with_flipped(true);
        assert_eq!(tile, Tile::new(TileType::Arrow, Direction::East, true));
        assert!(!tile.is_empty());

        // Orientation on an Empty tile still compares structurally
        let odd_empty = Tile::EMPTY.with_direction(Direction::West);
        assert!(odd_empty.is_empty());
        assert_ne!(odd_empty, Tile::EMPTY);
    }

    #[test]
    fn test_tile_json_shape() {
        let tile = Tile::new(TileType::Delay, Direction::South, false);
        let json = serde_json::to_string(&tile).unwrap();
        assert_eq!(json, r#"{"type":"Delay","direction":"South"}"#);

        let parsed: Tile = serde_json::from_str(r#"{"type":"Xor","flipped":true}"#).unwrap();
        assert_eq!(parsed, Tile::new(TileType::Xor, Direction::North, true));
    }
}
