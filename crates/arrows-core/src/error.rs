use thiserror::Error;

/// Errors produced while encoding or decoding a map
#[derive(Error, Debug)]
pub enum MapError {
    /// Tile type wire code outside the known table
    #[error("invalid tile type code: {0}")]
    InvalidTileType(u8),

    /// Direction wire code outside 0..=3
    #[error("invalid direction code: {0}")]
    InvalidDirection(u8),

    /// The byte stream ended before the structure it describes
    #[error("map data truncated at byte {offset}: needed {needed} more byte(s), {remaining} left")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A chunk coordinate does not fit the signed 16-bit wire field
    #[error("chunk ({x}, {y}) is outside the encodable range")]
    ChunkOutOfRange { x: i32, y: i32 },

    /// An import offset pushes a cell past the `i32` coordinate range
    #[error("cell ({x}, {y}) shifted by ({offset_x}, {offset_y}) is outside the map")]
    OffsetOutOfRange {
        x: i32,
        y: i32,
        offset_x: i32,
        offset_y: i32,
    },

    /// More non-empty chunks than the 16-bit chunk count can describe
    #[error("too many chunks to encode: {0}")]
    TooManyChunks(usize),

    #[error("invalid base64 envelope: {0}")]
    Envelope(#[from] base64::DecodeError),
}

impl MapError {
    /// Stable machine-readable code for bindings
    pub fn code(&self) -> &'static str {
        match self {
            MapError::InvalidTileType(_) => "INVALID_TILE_TYPE",
            MapError::InvalidDirection(_) => "INVALID_DIRECTION",
            MapError::Truncated { .. } => "TRUNCATED",
            MapError::ChunkOutOfRange { .. } => "CHUNK_OUT_OF_RANGE",
            MapError::OffsetOutOfRange { .. } => "OFFSET_OUT_OF_RANGE",
            MapError::TooManyChunks(_) => "TOO_MANY_CHUNKS",
            MapError::Envelope(_) => "INVALID_BASE64",
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
