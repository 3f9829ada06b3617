//! Sparse map of chunks addressed by absolute cell coordinates.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::chunk::{to_global_coords, to_local_coords, Chunk, ChunkCoord};
use crate::tile::Tile;

/// A whole map: a version tag plus every chunk that has been materialized.
///
/// Only `get_mut` and `set` create chunks; reads never change the map.
/// Chunks that hold nothing but Empty tiles are kept until [`Grid::prune`]
/// and never reach the wire format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Grid {
    /// Format version, carried through encode/decode untouched
    #[serde(default)]
    pub version: u16,
    /// Sparse chunk storage, serialized as a flat `"x,y"` tile map
    #[serde(default, rename = "tiles", with = "tile_map_serde")]
    chunks: HashMap<ChunkCoord, Chunk>,
}

/// Flat JSON form: only non-Empty tiles, keyed by "x,y"
mod tile_map_serde {
    use super::*;
    use serde::ser::SerializeMap;
    use serde::{de, Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(chunks: &HashMap<ChunkCoord, Chunk>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut coords: Vec<_> = chunks.keys().copied().collect();
        coords.sort();

        let mut map = serializer.serialize_map(None)?;
        for coord in coords {
            for ((local_x, local_y), tile) in chunks[&coord].iter() {
                if tile.is_empty() {
                    continue;
                }
                let (x, y) = to_global_coords(&coord, local_x, local_y);
                map.serialize_entry(&format!("{},{}", x, y), &tile)?;
            }
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<HashMap<ChunkCoord, Chunk>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TileMapVisitor;

        impl<'de> de::Visitor<'de> for TileMapVisitor {
            type Value = HashMap<ChunkCoord, Chunk>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map with \"x,y\" coordinate keys")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: de::MapAccess<'de>,
            {
                let mut grid = Grid::new();

                while let Some(key) = map.next_key::<String>()? {
                    let tile: Tile = map.next_value()?;
                    let (x, y) = parse_key(&key)
                        .ok_or_else(|| de::Error::custom(format!("invalid coordinate key {key:?}")))?;
                    grid.set(x, y, tile);
                }

                Ok(grid.chunks)
            }
        }

        deserializer.deserialize_map(TileMapVisitor)
    }

    fn parse_key(key: &str) -> Option<(i32, i32)> {
        let (x, y) = key.split_once(',')?;
        Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
    }
}

impl Grid {
    /// Create an empty grid with version 0
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(version: u16) -> Self {
        Self {
            version,
            chunks: HashMap::new(),
        }
    }

    /// Get the tile at absolute coordinates.
    ///
    /// Cells in chunks that were never materialized read as [`Tile::EMPTY`].
    pub fn get(&self, x: i32, y: i32) -> Tile {
        let (local_x, local_y) = to_local_coords(x, y);
        self.chunks
            .get(&ChunkCoord::from_cell(x, y))
            .map(|chunk| chunk.get(local_x, local_y))
            .unwrap_or_default()
    }

    /// Get a mutable reference to the tile at absolute coordinates.
    ///
    /// Creates the containing chunk if it doesn't exist.
    pub fn get_mut(&mut self, x: i32, y: i32) -> &mut Tile {
        let (local_x, local_y) = to_local_coords(x, y);
        self.chunk_mut(ChunkCoord::from_cell(x, y))
            .get_mut(local_x, local_y)
    }

    /// Replace the tile at absolute coordinates.
    ///
    /// Creates the containing chunk if necessary. Returns the previous tile.
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) -> Tile {
        let (local_x, local_y) = to_local_coords(x, y);
        self.chunk_mut(ChunkCoord::from_cell(x, y))
            .set(local_x, local_y, tile)
    }

    /// Reset a cell to the Empty tile, returning what was there.
    ///
    /// Does not create a chunk that isn't already present.
    pub fn clear(&mut self, x: i32, y: i32) -> Tile {
        let (local_x, local_y) = to_local_coords(x, y);
        match self.chunks.get_mut(&ChunkCoord::from_cell(x, y)) {
            Some(chunk) => chunk.set(local_x, local_y, Tile::EMPTY),
            None => Tile::EMPTY,
        }
    }

    /// Get a chunk by its chunk coordinate.
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Get or create a chunk by its chunk coordinate.
    pub fn chunk_mut(&mut self, coord: ChunkCoord) -> &mut Chunk {
        self.chunks.entry(coord).or_default()
    }

    /// All materialized chunks, sorted by coordinate.
    pub fn chunks(&self) -> Vec<(ChunkCoord, &Chunk)> {
        let mut chunks: Vec<_> = self.chunks.iter().map(|(coord, chunk)| (*coord, chunk)).collect();
        chunks.sort_by_key(|(coord, _)| *coord);
        chunks
    }

    /// Number of materialized chunks, including all-Empty ones.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of non-Empty tiles across all chunks.
    pub fn tile_count(&self) -> usize {
        self.chunks.values().map(Chunk::len).sum()
    }

    /// Check if the grid holds no non-Empty tile.
    pub fn is_empty(&self) -> bool {
        self.chunks.values().all(Chunk::is_empty)
    }

    /// Iterate over non-Empty tiles with absolute coordinates.
    ///
    /// Chunks are visited in coordinate order, cells in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = ((i32, i32), Tile)> + '_ {
        self.chunks().into_iter().flat_map(|(coord, chunk)| {
            chunk
                .iter()
                .filter(|(_, tile)| !tile.is_empty())
                .map(move |((local_x, local_y), tile)| (to_global_coords(&coord, local_x, local_y), tile))
        })
    }

    /// Get all non-Empty tiles within an inclusive rectangle.
    ///
    /// Only chunks overlapping the rectangle are visited. A rectangle wider
    /// than the map scans the materialized chunks instead of its own area.
    pub fn tiles_in_rect(&self, min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Vec<((i32, i32), Tile)> {
        let start = ChunkCoord::from_cell(min_x, min_y);
        let end = ChunkCoord::from_cell(max_x, max_y);
        if start.x > end.x || start.y > end.y {
            return Vec::new();
        }

        let span = (end.x as i64 - start.x as i64 + 1) * (end.y as i64 - start.y as i64 + 1);
        let overlapping: Vec<(ChunkCoord, &Chunk)> = if span > self.chunks.len() as i64 {
            self.chunks
                .iter()
                .filter(|(coord, _)| {
                    (start.x..=end.x).contains(&coord.x) && (start.y..=end.y).contains(&coord.y)
                })
                .map(|(coord, chunk)| (*coord, chunk))
                .collect()
        } else {
            (start.y..=end.y)
                .flat_map(|chunk_y| (start.x..=end.x).map(move |chunk_x| ChunkCoord::new(chunk_x, chunk_y)))
                .filter_map(|coord| self.chunks.get(&coord).map(|chunk| (coord, chunk)))
                .collect()
        };

        let mut result = Vec::new();
        for (coord, chunk) in overlapping {
            for ((local_x, local_y), tile) in chunk.iter() {
                if tile.is_empty() {
                    continue;
                }
                let (x, y) = to_global_coords(&coord, local_x, local_y);
                if x >= min_x && x <= max_x && y >= min_y && y <= max_y {
                    result.push(((x, y), tile));
                }
            }
        }

        result
    }

    /// Inclusive bounding box `((min_x, min_y), (max_x, max_y))` of non-Empty tiles.
    pub fn bounds(&self) -> Option<((i32, i32), (i32, i32))> {
        self.tiles().fold(None, |acc, ((x, y), _)| match acc {
            None => Some(((x, y), (x, y))),
            Some(((min_x, min_y), (max_x, max_y))) => {
                Some(((min_x.min(x), min_y.min(y)), (max_x.max(x), max_y.max(y))))
            }
        })
    }

    /// Drop chunks that hold only Empty tiles. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.chunks.len();
        self.chunks.retain(|_, chunk| !chunk.is_empty());
        before - self.chunks.len()
    }

    /// Serialize the grid to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize the grid to pretty JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a grid from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Grids compare by version and tile contents; all-Empty chunks don't count.
impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.tiles().eq(other.tiles())
    }
}

impl Eq for Grid {}
