//! Dense 16x16 tile blocks and the coordinate math that addresses them.
//!
//! A map is split into fixed-size chunks; the chunk is also the grouping unit
//! of the wire format. Absolute coordinates resolve to a chunk with floor
//! division, so negative cells land in negative chunks at non-negative local
//! offsets.

use std::fmt;

use crate::tile::{Tile, TileType};

/// Size of each chunk in both dimensions (16x16 cells per chunk).
pub const CHUNK_SIZE: usize = 16;

/// Number of cells in one chunk.
pub const CHUNK_AREA: usize = CHUNK_SIZE * CHUNK_SIZE;

/// Coordinate of a chunk in the grid.
///
/// Ordering is row-major (`y` first) so that sorted chunks read top-down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Which 16-row block (y / CHUNK_SIZE)
    pub y: i32,
    /// Which 16-column block (x / CHUNK_SIZE)
    pub x: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Create a ChunkCoord from a cell's absolute coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrows_core::ChunkCoord;
    ///
    /// assert_eq!(ChunkCoord::from_cell(17, 33), ChunkCoord::new(1, 2));
    /// assert_eq!(ChunkCoord::from_cell(-1, -16), ChunkCoord::new(-1, -1));
    /// assert_eq!(ChunkCoord::from_cell(-17, 0), ChunkCoord::new(-2, 0));
    /// ```
    pub fn from_cell(x: i32, y: i32) -> Self {
        Self {
            x: x.div_euclid(CHUNK_SIZE as i32),
            y: y.div_euclid(CHUNK_SIZE as i32),
        }
    }

    /// Absolute coordinates of this chunk's (0, 0) cell
    pub fn origin(&self) -> (i32, i32) {
        (self.x * CHUNK_SIZE as i32, self.y * CHUNK_SIZE as i32)
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A single 16x16 chunk of tiles.
///
/// Every slot always holds a value; untouched slots are [`Tile::EMPTY`].
#[derive(Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Tiles in row-major order, index `y * 16 + x`.
    tiles: [Tile; CHUNK_AREA],
}

impl Chunk {
    /// Create a new chunk filled with empty tiles.
    pub fn new() -> Self {
        Self {
            tiles: [Tile::EMPTY; CHUNK_AREA],
        }
    }

    #[inline]
    fn index(x: u8, y: u8) -> usize {
        assert!(
            (x as usize) < CHUNK_SIZE && (y as usize) < CHUNK_SIZE,
            "local coordinate ({x}, {y}) outside chunk"
        );
        y as usize * CHUNK_SIZE + x as usize
    }

    /// Get the tile at the given local coordinates.
    ///
    /// # Arguments
    ///
    /// * `x` - Column within this chunk (0-15)
    /// * `y` - Row within this chunk (0-15)
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is outside 0-15.
    pub fn get(&self, x: u8, y: u8) -> Tile {
        self.tiles[Self::index(x, y)]
    }

    /// Get a mutable reference to the tile at the given local coordinates.
    pub fn get_mut(&mut self, x: u8, y: u8) -> &mut Tile {
        &mut self.tiles[Self::index(x, y)]
    }

    /// Replace the tile at the given local coordinates.
    ///
    /// Returns the previous tile.
    pub fn set(&mut self, x: u8, y: u8, tile: Tile) -> Tile {
        std::mem::replace(&mut self.tiles[Self::index(x, y)], tile)
    }

    /// Check if no cell in this chunk holds a non-Empty tile.
    pub fn is_empty(&self) -> bool {
        self.tiles.iter().all(Tile::is_empty)
    }

    /// Number of non-Empty tiles.
    pub fn len(&self) -> usize {
        self.tiles.iter().filter(|tile| !tile.is_empty()).count()
    }

    /// Distinct non-Empty tile types, in row-major first-occurrence order.
    pub fn tile_types(&self) -> Vec<TileType> {
        let mut types = Vec::new();
        for tile in &self.tiles {
            if !tile.is_empty() && !types.contains(&tile.tile_type) {
                types.push(tile.tile_type);
            }
        }
        types
    }

    /// Iterate over all 256 cells in row-major order.
    ///
    /// Returns an iterator of ((local_x, local_y), tile) tuples.
    pub fn iter(&self) -> impl Iterator<Item = ((u8, u8), Tile)> + '_ {
        self.tiles.iter().enumerate().map(|(i, tile)| {
            let x = (i % CHUNK_SIZE) as u8;
            let y = (i / CHUNK_SIZE) as u8;
            ((x, y), *tile)
        })
    }

    /// Iterate over cells of one type in column-major order (x outer, y inner).
    pub fn cells_of_type(&self, tile_type: TileType) -> impl Iterator<Item = ((u8, u8), Tile)> + '_ {
        (0..CHUNK_SIZE as u8)
            .flat_map(|x| (0..CHUNK_SIZE as u8).map(move |y| (x, y)))
            .map(move |(x, y)| ((x, y), self.get(x, y)))
            .filter(move |(_, tile)| tile.tile_type == tile_type)
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("tiles", &self.len())
            .field("types", &self.tile_types())
            .finish()
    }
}

/// Convert absolute coordinates to local coordinates within a chunk.
///
/// # Returns
///
/// A tuple of (local_x, local_y) within the chunk (0-15 for each).
pub fn to_local_coords(x: i32, y: i32) -> (u8, u8) {
    let local_x = x.rem_euclid(CHUNK_SIZE as i32) as u8;
    let local_y = y.rem_euclid(CHUNK_SIZE as i32) as u8;
    (local_x, local_y)
}

/// Convert chunk coordinate and local coordinates to absolute coordinates.
pub fn to_global_coords(chunk: &ChunkCoord, local_x: u8, local_y: u8) -> (i32, i32) {
    let (origin_x, origin_y) = chunk.origin();
    (origin_x + local_x as i32, origin_y + local_y as i32)
}
