use arrows_core::{Direction, Grid, MapError, MapSummary, Tile, TileType};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Map editing engine exposed to JavaScript
#[wasm_bindgen]
#[derive(Default)]
pub struct MapEngine {
    grid: Grid,
}

/// Structured error object for JavaScript
#[derive(Serialize)]
pub struct JsMapError {
    code: String,
    message: String,
}

impl From<MapError> for JsMapError {
    fn from(err: MapError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

fn to_js_error(err: MapError) -> JsValue {
    let js_error = JsMapError::from(err);
    serde_wasm_bindgen::to_value(&js_error).unwrap_or(JsValue::NULL)
}

/// Tile data for JavaScript, using wire codes for type and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileData {
    pub x: i32,
    pub y: i32,
    pub tile_type: u8,
    pub direction: u8,
    pub flipped: bool,
}

impl TileData {
    fn new(x: i32, y: i32, tile: Tile) -> Self {
        Self {
            x,
            y,
            tile_type: tile.tile_type.code(),
            direction: tile.direction.code(),
            flipped: tile.flipped,
        }
    }

    fn to_tile(self) -> Result<Tile, MapError> {
        Ok(Tile::new(
            TileType::from_code(self.tile_type)?,
            Direction::from_code(self.direction)?,
            self.flipped,
        ))
    }
}

#[wasm_bindgen]
impl MapEngine {
    /// Create an empty map
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a map from its base64 text form
    #[wasm_bindgen(js_name = fromBase64)]
    pub fn from_base64(text: &str) -> Result<MapEngine, JsValue> {
        Grid::from_base64(text)
            .map(|grid| MapEngine { grid })
            .map_err(to_js_error)
    }

    /// Export the map as base64 text
    #[wasm_bindgen(js_name = toBase64)]
    pub fn to_base64(&self) -> Result<String, JsValue> {
        self.grid.to_base64().map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn version(&self) -> u16 {
        self.grid.version
    }

    #[wasm_bindgen(js_name = setVersion)]
    pub fn set_version(&mut self, version: u16) {
        self.grid.version = version;
    }

    /// Get tile data at a cell, or null for an empty cell
    #[wasm_bindgen(js_name = getTile)]
    pub fn get_tile(&self, x: i32, y: i32) -> JsValue {
        match self.tile_data(x, y) {
            Some(data) => serde_wasm_bindgen::to_value(&data).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    /// Place a tile. Type and direction are wire codes.
    #[wasm_bindgen(js_name = setTile)]
    pub fn set_tile(
        &mut self,
        x: i32,
        y: i32,
        tile_type: u8,
        direction: u8,
        flipped: bool,
    ) -> Result<(), JsValue> {
        self.place(TileData {
            x,
            y,
            tile_type,
            direction,
            flipped,
        })
        .map_err(to_js_error)
    }

    /// Reset a cell to empty. Returns true if it held a tile.
    #[wasm_bindgen(js_name = clearTile)]
    pub fn clear_tile(&mut self, x: i32, y: i32) -> bool {
        !self.grid.clear(x, y).is_empty()
    }

    /// Rotate the tile at a cell a quarter turn. Returns false for empty cells.
    #[wasm_bindgen(js_name = rotateTile)]
    pub fn rotate_tile(&mut self, x: i32, y: i32, clockwise: bool) -> bool {
        let tile = self.grid.get(x, y);
        if tile.is_empty() {
            return false;
        }
        let direction = if clockwise {
            tile.direction.rotate_cw()
        } else {
            tile.direction.rotate_ccw()
        };
        self.grid.set(x, y, tile.with_direction(direction));
        true
    }

    /// Toggle the flipped flag of the tile at a cell. Returns false for empty cells.
    #[wasm_bindgen(js_name = flipTile)]
    pub fn flip_tile(&mut self, x: i32, y: i32) -> bool {
        let tile = self.grid.get(x, y);
        if tile.is_empty() {
            return false;
        }
        self.grid.set(x, y, tile.with_flipped(!tile.flipped));
        true
    }

    /// Get non-empty tiles in an inclusive rectangle as a JSON array
    #[wasm_bindgen(js_name = tilesInRect)]
    pub fn tiles_in_rect(&self, min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> String {
        let tiles = self.rect_data(min_x, min_y, max_x, max_y);
        serde_json::to_string(&tiles).unwrap_or_else(|_| "[]".to_string())
    }

    /// Paste a base64 map into this one, shifted by an offset
    #[wasm_bindgen(js_name = importAt)]
    pub fn import_at(&mut self, text: &str, offset_x: i32, offset_y: i32) -> Result<(), JsValue> {
        #[cfg(all(debug_assertions, target_arch = "wasm32"))]
        web_sys::console::log_1(&format!("[Map] Importing at ({}, {})", offset_x, offset_y).into());

        self.grid
            .import_base64(text, offset_x, offset_y)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = tileCount)]
    pub fn tile_count(&self) -> usize {
        self.grid.tile_count()
    }

    /// Summary of the map as JSON
    pub fn summary(&self) -> String {
        serde_json::to_string(&MapSummary::of(&self.grid)).unwrap_or_else(|_| "{}".to_string())
    }

    /// Export the map as JSON
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> String {
        self.grid.to_json().unwrap_or_else(|_| "{}".to_string())
    }

    /// Drop chunks left empty by edits
    pub fn compact(&mut self) -> usize {
        self.grid.prune()
    }
}

impl MapEngine {
    fn tile_data(&self, x: i32, y: i32) -> Option<TileData> {
        let tile = self.grid.get(x, y);
        (!tile.is_empty()).then(|| TileData::new(x, y, tile))
    }

    fn place(&mut self, data: TileData) -> Result<(), MapError> {
        let tile = data.to_tile()?;
        self.grid.set(data.x, data.y, tile);
        Ok(())
    }

    fn rect_data(&self, min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Vec<TileData> {
        let mut tiles: Vec<_> = self
            .grid
            .tiles_in_rect(min_x, min_y, max_x, max_y)
            .into_iter()
            .map(|((x, y), tile)| TileData::new(x, y, tile))
            .collect();
        tiles.sort_by_key(|t| (t.y, t.x));
        tiles
    }
}
