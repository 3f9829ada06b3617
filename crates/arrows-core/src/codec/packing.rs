//! Single-byte field packing used by each cell record.

use crate::direction::Direction;

/// Pack local chunk coordinates into one byte.
///
/// Bit layout:
/// - Bits 0-3: local x
/// - Bits 4-7: local y
#[inline]
pub fn pack_position(x: u8, y: u8) -> u8 {
    (x & 0x0F) | ((y & 0x0F) << 4)
}

/// Unpack a position byte back to (x, y)
#[inline]
pub fn unpack_position(byte: u8) -> (u8, u8) {
    (byte & 0x0F, (byte & 0xF0) >> 4)
}

/// Pack orientation into one byte.
///
/// Bit layout:
/// - Bits 0-1: direction code
/// - Bit 2: flipped
/// - Bits 3-7: reserved, written as zero
#[inline]
pub fn pack_orientation(direction: Direction, flipped: bool) -> u8 {
    let mut flags = direction.code() & 0b011;
    if flipped {
        flags |= 0b100;
    }
    flags
}

/// Unpack an orientation byte. Reserved bits are ignored.
#[inline]
pub fn unpack_orientation(byte: u8) -> (Direction, bool) {
    // Two bits always land in 0..=3
    let direction = Direction::ALL[(byte & 0b011) as usize];
    let flipped = byte & 0b100 != 0;
    (direction, flipped)
}
