//! Binary map format and its base64 text envelope.
//!
//! All integers are little-endian with no padding:
//!
//! ```text
//! version:u16  chunk_count:u16
//! chunk_count x {
//!     chunk_x:i16  chunk_y:i16  group_count-1:u8
//!     group_count x {
//!         type_code:u8  cell_count-1:u8
//!         cell_count x { position:u8  orientation:u8 }
//!     }
//! }
//! ```
//!
//! Chunk coordinates are two's-complement. For chunks in `0..32768` this is
//! byte-identical to an unsigned field, and it lets maps extend into negative
//! coordinates.

mod packing;
mod reader;
mod writer;

pub use packing::{pack_orientation, pack_position, unpack_orientation, unpack_position};
use reader::ByteReader;
use writer::ByteWriter;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::str::FromStr;
use tracing::{debug, trace};

use crate::chunk::{to_global_coords, Chunk, ChunkCoord, CHUNK_AREA};
use crate::error::{MapError, Result};
use crate::grid::Grid;
use crate::tile::{Tile, TileType};

/// Decode a raw byte stream into a new grid.
pub fn decode(bytes: &[u8]) -> Result<Grid> {
    let mut grid = Grid::new();
    import(&mut grid, bytes, 0, 0)?;
    Ok(grid)
}

/// Decode a raw byte stream into an existing grid.
///
/// Every decoded cell is written at its absolute coordinate plus
/// `(offset_x, offset_y)`, overwriting whatever was there. The grid's version
/// is replaced by the stream's. The whole stream is read before the grid is
/// touched, so on error the grid is unchanged.
pub fn import(grid: &mut Grid, bytes: &[u8], offset_x: i32, offset_y: i32) -> Result<()> {
    let (version, cells) = read_cells(bytes, offset_x, offset_y)?;

    grid.version = version;
    for ((x, y), tile) in cells {
        grid.set(x, y, tile);
    }

    Ok(())
}

/// Read every cell of a stream, in stream order, at its shifted coordinate.
fn read_cells(bytes: &[u8], offset_x: i32, offset_y: i32) -> Result<(u16, Vec<((i32, i32), Tile)>)> {
    let mut reader = ByteReader::new(bytes);

    let version = reader.read_u16()?;
    let chunk_count = reader.read_u16()?;
    debug!(version, chunk_count, bytes = bytes.len(), "decoding map");

    let mut cells = Vec::new();
    for _ in 0..chunk_count {
        let chunk_x = reader.read_i16()? as i32;
        let chunk_y = reader.read_i16()? as i32;
        let group_count = reader.read_u8()? as usize + 1;
        trace!(chunk_x, chunk_y, group_count, "decoding chunk");

        let coord = ChunkCoord::new(chunk_x, chunk_y);

        for _ in 0..group_count {
            let tile_type = TileType::from_code(reader.read_u8()?)?;
            let cell_count = reader.read_u8()? as usize + 1;

            for _ in 0..cell_count {
                let (local_x, local_y) = unpack_position(reader.read_u8()?);
                let (direction, flipped) = unpack_orientation(reader.read_u8()?);

                // Unshifted cells of an i16 chunk always fit in i32
                let (x, y) = to_global_coords(&coord, local_x, local_y);
                let shifted = x
                    .checked_add(offset_x)
                    .zip(y.checked_add(offset_y))
                    .ok_or(MapError::OffsetOutOfRange {
                        x,
                        y,
                        offset_x,
                        offset_y,
                    })?;
                cells.push((shifted, Tile::new(tile_type, direction, flipped)));
            }
        }
    }

    if reader.remaining() > 0 {
        debug!(
            offset = reader.position(),
            trailing = reader.remaining(),
            "ignoring bytes after last chunk"
        );
    }

    Ok((version, cells))
}

/// Encode a grid into a raw byte stream.
///
/// Chunks are written in coordinate order; chunks without a non-Empty tile are
/// skipped and not counted.
pub fn encode(grid: &Grid) -> Result<Vec<u8>> {
    let mut writer = ByteWriter::with_capacity(4 + grid.tile_count() * 2);

    writer.write_u16(grid.version);
    let count_slot = writer.reserve_u16();

    let mut written = 0usize;
    for (coord, chunk) in grid.chunks() {
        if encode_chunk(&mut writer, coord, chunk)? {
            written += 1;
        }
    }

    let chunk_count = u16::try_from(written).map_err(|_| MapError::TooManyChunks(written))?;
    writer.patch_u16(count_slot, chunk_count);
    debug!(version = grid.version, chunk_count, bytes = writer.len(), "encoded map");

    Ok(writer.into_bytes())
}

/// Write one chunk. Returns false, writing nothing, if the chunk is empty.
fn encode_chunk(writer: &mut ByteWriter, coord: ChunkCoord, chunk: &Chunk) -> Result<bool> {
    let types = chunk.tile_types();
    if types.is_empty() {
        return Ok(false);
    }

    let out_of_range = || MapError::ChunkOutOfRange {
        x: coord.x,
        y: coord.y,
    };
    let chunk_x = i16::try_from(coord.x).map_err(|_| out_of_range())?;
    let chunk_y = i16::try_from(coord.y).map_err(|_| out_of_range())?;

    writer.write_i16(chunk_x);
    writer.write_i16(chunk_y);
    // At most 25 non-Empty types exist
    writer.write_u8((types.len() - 1) as u8);
    trace!(%coord, groups = types.len(), "encoding chunk");

    for tile_type in types {
        writer.write_u8(tile_type.code());
        let count_slot = writer.reserve_u8();

        let mut cells = 0usize;
        for ((x, y), tile) in chunk.cells_of_type(tile_type) {
            writer.write_u8(pack_position(x, y));
            writer.write_u8(pack_orientation(tile.direction, tile.flipped));
            cells += 1;
        }

        // 1..=256 cells per group by construction
        debug_assert!((1..=CHUNK_AREA).contains(&cells));
        writer.patch_u8(count_slot, (cells - 1) as u8);
    }

    Ok(true)
}

/// Strip the base64 envelope.
///
/// Surrounding whitespace is ignored; anything else malformed fails before
/// any structural parsing.
pub fn decode_envelope(text: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(text.trim())?)
}

/// Wrap raw bytes in the base64 envelope.
pub fn encode_envelope(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

impl Grid {
    /// Decode a grid from its base64 text form
    pub fn from_base64(text: &str) -> Result<Self> {
        decode(&decode_envelope(text)?)
    }

    /// Encode the grid to its base64 text form
    pub fn to_base64(&self) -> Result<String> {
        Ok(encode_envelope(&encode(self)?))
    }

    /// Merge raw map bytes into this grid, shifted by an offset
    pub fn import(&mut self, bytes: &[u8], offset_x: i32, offset_y: i32) -> Result<()> {
        import(self, bytes, offset_x, offset_y)
    }

    /// Merge a base64 map into this grid, shifted by an offset
    pub fn import_base64(&mut self, text: &str, offset_x: i32, offset_y: i32) -> Result<()> {
        let bytes = decode_envelope(text)?;
        import(self, &bytes, offset_x, offset_y)
    }
}

impl FromStr for Grid {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        Grid::from_base64(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_arrow_layout() {
        let mut grid = Grid::with_version(1);
        grid.set(0, 0, Tile::new(TileType::Arrow, Direction::East, true));

        let bytes = encode(&grid).unwrap();
        assert_eq!(
            bytes,
            vec![
                0x01, 0x00, // version
                0x01, 0x00, // chunk count
                0x00, 0x00, 0x00, 0x00, // chunk (0, 0)
                0x00, // one type group
                0x01, // Arrow
                0x00, // one cell
                0x00, // position (0, 0)
                0x05, // East | flipped
            ]
        );

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, grid);
        assert_eq!(decoded.get(0, 0), Tile::new(TileType::Arrow, Direction::East, true));
        assert_eq!(decoded.get(1, 0), Tile::EMPTY);
    }

    #[test]
    fn test_empty_grid() {
        let grid = Grid::with_version(7);
        assert_eq!(encode(&grid).unwrap(), vec![0x07, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_empty_chunks_are_pruned() {
        let mut grid = Grid::new();
        for i in 0..10 {
            let _ = grid.get_mut(i * 16, 0);
        }
        grid.set(500, 500, Tile::of(TileType::Arrow));
        grid.clear(500, 500);
        assert_eq!(grid.chunk_count(), 11);

        assert_eq!(encode(&grid).unwrap(), vec![0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_groups_follow_first_occurrence() {
        let mut grid = Grid::new();
        grid.set(0, 1, Tile::of(TileType::Delay));
        grid.set(1, 0, Tile::of(TileType::Source));

        let bytes = encode(&grid).unwrap();
        assert_eq!(
            bytes,
            vec![
                0x00, 0x00, 0x01, 0x00, // header
                0x00, 0x00, 0x00, 0x00, 0x01, // chunk (0, 0), two groups
                0x02, 0x00, 0x01, 0x00, // Source at (1, 0)
                0x04, 0x00, 0x10, 0x00, // Delay at (0, 1)
            ]
        );
    }

    #[test]
    fn test_cells_written_column_major() {
        let mut grid = Grid::new();
        grid.set(1, 0, Tile::of(TileType::Arrow));
        grid.set(0, 2, Tile::of(TileType::Arrow).with_direction(Direction::West));

        let bytes = encode(&grid).unwrap();
        assert_eq!(
            &bytes[9..],
            &[0x01, 0x01, 0x20, 0x03, 0x01, 0x00][..]
        );
    }

    #[test]
    fn test_full_chunk_boundary() {
        let mut grid = Grid::new();
        for x in 0..16 {
            for y in 0..16 {
                grid.set(x, y, Tile::of(TileType::Blocker));
            }
        }

        let bytes = encode(&grid).unwrap();
        assert_eq!(bytes.len(), 4 + 5 + 2 + 256 * 2);
        assert_eq!(bytes[8], 0x00);
        assert_eq!(bytes[9], TileType::Blocker.code());
        assert_eq!(bytes[10], 0xFF);

        assert_eq!(decode(&bytes).unwrap(), grid);
    }

    #[test]
    fn test_negative_chunks_round_trip() {
        let mut grid = Grid::new();
        grid.set(-1, -1, Tile::new(TileType::Not, Direction::South, false));

        let bytes = encode(&grid).unwrap();
        assert_eq!(&bytes[4..8], &[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(bytes[11], 0xFF);

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.get(-1, -1), Tile::new(TileType::Not, Direction::South, false));
    }

    #[test]
    fn test_chunk_out_of_range() {
        let mut grid = Grid::new();
        grid.set(i16::MAX as i32 * 16 + 16, 0, Tile::of(TileType::Arrow));

        let err = encode(&grid).unwrap_err();
        assert!(matches!(err, MapError::ChunkOutOfRange { x: 32768, y: 0 }));
    }

    #[test]
    fn test_decode_truncated() {
        let mut grid = Grid::new();
        grid.set(3, 3, Tile::of(TileType::Arrow));
        let bytes = encode(&grid).unwrap();

        for len in 0..bytes.len() {
            let err = decode(&bytes[..len]).unwrap_err();
            assert!(matches!(err, MapError::Truncated { .. }), "len {len}: {err}");
        }
    }

    #[test]
    fn test_decode_invalid_tile_type() {
        let bytes = [0, 0, 1, 0, 0, 0, 0, 0, 0, 26, 0, 0, 0];
        assert!(matches!(decode(&bytes), Err(MapError::InvalidTileType(26))));
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let bytes = [0x02, 0x00, 0x00, 0x00, 0xDE, 0xAD];
        let grid = decode(&bytes).unwrap();
        assert_eq!(grid.version, 2);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_duplicate_cells_last_write_wins() {
        let bytes = [
            0, 0, 1, 0, // header
            0, 0, 0, 0, 1, // chunk (0, 0), two groups
            1, 0, 0x11, 0, // Arrow at (1, 1)
            3, 0, 0x11, 2, // Blocker at (1, 1) facing south
        ];
        let grid = decode(&bytes).unwrap();
        assert_eq!(grid.get(1, 1), Tile::new(TileType::Blocker, Direction::South, false));
    }

    #[test]
    fn test_import_with_offset() {
        let mut source = Grid::with_version(9);
        source.set(0, 0, Tile::of(TileType::Source));
        source.set(15, 15, Tile::of(TileType::Arrow));
        let bytes = encode(&source).unwrap();

        let mut target = Grid::with_version(1);
        target.set(100, 100, Tile::of(TileType::Button));
        target.import(&bytes, 10, -20).unwrap();

        assert_eq!(target.version, 9);
        assert_eq!(target.get(10, -20), Tile::of(TileType::Source));
        assert_eq!(target.get(25, -5), Tile::of(TileType::Arrow));
        assert_eq!(target.get(100, 100), Tile::of(TileType::Button));
        assert_eq!(target.tile_count(), 3);
    }

    #[test]
    fn test_import_offset_overflow() {
        let mut source = Grid::new();
        source.set(5, 0, Tile::of(TileType::Arrow));
        let bytes = encode(&source).unwrap();

        let mut target = Grid::with_version(3);
        let err = target.import(&bytes, i32::MAX, 0).unwrap_err();
        assert!(matches!(
            err,
            MapError::OffsetOutOfRange {
                x: 5,
                y: 0,
                offset_x: i32::MAX,
                offset_y: 0
            }
        ));
        assert_eq!(target.version, 3);
        assert!(target.is_empty());

        let err = target.import(&bytes, i32::MAX - 4, 0).unwrap_err();
        assert!(matches!(err, MapError::OffsetOutOfRange { .. }));

        // The largest offset that still fits lands on the last column
        target.import(&bytes, i32::MAX - 5, 0).unwrap();
        assert_eq!(target.get(i32::MAX, 0), Tile::of(TileType::Arrow));
    }

    #[test]
    fn test_failed_import_leaves_grid_untouched() {
        let mut source = Grid::with_version(9);
        source.set(0, 0, Tile::of(TileType::Arrow));
        source.set(20, 0, Tile::of(TileType::Delay));
        let bytes = encode(&source).unwrap();

        let mut target = Grid::with_version(1);
        target.set(50, 50, Tile::of(TileType::Button));
        let before = target.clone();

        let err = target.import(&bytes[..bytes.len() - 1], 0, 0).unwrap_err();
        assert!(matches!(err, MapError::Truncated { .. }));
        assert_eq!(target, before);
        assert_eq!(target.version, 1);
        assert_eq!(target.get(0, 0), Tile::EMPTY);
        assert_eq!(target.tile_count(), 1);

        assert!(target.import_base64("AQA=", 0, 0).is_err());
        assert!(target.import_base64("%%%", 0, 0).is_err());
        assert_eq!(target, before);
    }

    #[test]
    fn test_envelope() {
        let mut grid = Grid::with_version(1);
        grid.set(0, 0, Tile::new(TileType::Arrow, Direction::East, true));

        let text = grid.to_base64().unwrap();
        assert_eq!(text, "AQABAAAAAAAAAQAABQ==");

        let parsed: Grid = format!("  {text}\n").parse().unwrap();
        assert_eq!(parsed, grid);
    }

    #[test]
    fn test_envelope_errors() {
        assert!(matches!(Grid::from_base64("not base64!"), Err(MapError::Envelope(_))));
        // Valid base64, structurally short
        assert!(matches!(Grid::from_base64("AQA="), Err(MapError::Truncated { .. })));
    }
}
