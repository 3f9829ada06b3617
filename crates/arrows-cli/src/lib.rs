pub mod config;

use anyhow::{Context, Result};
use arrows_core::{Grid, MapSummary};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::config::Config;

/// Read a whole input source; `-` means stdin
pub fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
    }
}

fn load_map(text: &str) -> Result<Grid> {
    let grid = Grid::from_base64(text).context("failed to decode map")?;
    debug!(version = grid.version, tiles = grid.tile_count(), "map loaded");
    Ok(grid)
}

fn export(grid: &Grid) -> Result<String> {
    grid.to_base64().context("failed to encode map")
}

/// Human-readable or JSON summary of a base64 map
pub fn inspect(text: &str, json: bool) -> Result<String> {
    let summary = MapSummary::of(&load_map(text)?);
    if json {
        Ok(serde_json::to_string_pretty(&summary)?)
    } else {
        Ok(summary.to_string())
    }
}

/// Decode and re-encode a map, optionally stamping a new version
pub fn recode(text: &str, version: Option<u16>, config: &Config) -> Result<String> {
    let mut grid = load_map(text)?;
    if let Some(version) = version.or(config.version) {
        info!(from = grid.version, to = version, "overriding map version");
        grid.version = version;
    }
    export(&grid)
}

/// Convert a base64 map to JSON
pub fn to_json(text: &str, compact: bool, config: &Config) -> Result<String> {
    let grid = load_map(text)?;
    let json = if config.pretty_json && !compact {
        grid.to_json_pretty()?
    } else {
        grid.to_json()?
    };
    Ok(json)
}

/// Convert a JSON map to base64
pub fn from_json(json: &str) -> Result<String> {
    let grid = Grid::from_json(json).context("failed to parse JSON map")?;
    export(&grid)
}

/// Move every tile of a map by an offset
pub fn shift(text: &str, dx: i32, dy: i32, version: Option<u16>, config: &Config) -> Result<String> {
    let bytes = arrows_core::decode_envelope(text).context("failed to decode map")?;
    let mut grid = Grid::new();
    grid.import(&bytes, dx, dy).context("failed to decode map")?;
    info!(dx, dy, tiles = grid.tile_count(), "shifted map");

    if let Some(version) = version.or(config.version) {
        grid.version = version;
    }
    export(&grid)
}
