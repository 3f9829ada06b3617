pub mod chunk;
pub mod codec;
pub mod direction;
pub mod error;
pub mod grid;
pub mod summary;
pub mod tile;

pub use chunk::{Chunk, ChunkCoord, CHUNK_AREA, CHUNK_SIZE};
pub use codec::{decode, decode_envelope, encode, encode_envelope, import};
pub use direction::Direction;
pub use error::MapError;
pub use grid::Grid;
pub use summary::{Bounds, MapSummary};
pub use tile::{Tile, TileType};
