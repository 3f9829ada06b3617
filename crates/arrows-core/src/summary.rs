use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::grid::Grid;
use crate::tile::TileType;

/// Inclusive rectangle covering every non-Empty tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    pub fn width(&self) -> u32 {
        self.max_x.abs_diff(self.min_x) + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y.abs_diff(self.min_y) + 1
    }
}

/// Overview of a map's contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSummary {
    pub version: u16,
    /// Chunks holding at least one non-Empty tile
    pub chunks: usize,
    pub tiles: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    /// Non-Empty tile counts, in wire-code order
    pub by_type: BTreeMap<TileType, usize>,
}

impl MapSummary {
    pub fn of(grid: &Grid) -> Self {
        let mut by_type = BTreeMap::new();
        for (_, tile) in grid.tiles() {
            *by_type.entry(tile.tile_type).or_insert(0) += 1;
        }

        let bounds = grid.bounds().map(|((min_x, min_y), (max_x, max_y))| Bounds {
            min_x,
            min_y,
            max_x,
            max_y,
        });

        Self {
            version: grid.version,
            chunks: grid.chunks().iter().filter(|(_, chunk)| !chunk.is_empty()).count(),
            tiles: by_type.values().sum(),
            bounds,
            by_type,
        }
    }
}

impl fmt::Display for MapSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "version: {}", self.version)?;
        writeln!(f, "chunks:  {}", self.chunks)?;
        writeln!(f, "tiles:   {}", self.tiles)?;
        if let Some(b) = &self.bounds {
            writeln!(
                f,
                "bounds:  ({}, {})..=({}, {}) [{}x{}]",
                b.min_x,
                b.min_y,
                b.max_x,
                b.max_y,
                b.width(),
                b.height()
            )?;
        }
        for (tile_type, count) in &self.by_type {
            writeln!(f, "  {:<24}{}", tile_type.to_string(), count)?;
        }
        Ok(())
    }
}
