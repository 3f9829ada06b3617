/// Growable little-endian output buffer with back-patchable slots.
#[derive(Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i16(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a zero byte to be filled in later; returns its offset
    pub fn reserve_u8(&mut self) -> usize {
        self.buf.push(0);
        self.buf.len() - 1
    }

    /// Write a zero u16 to be filled in later; returns its offset
    pub fn reserve_u16(&mut self) -> usize {
        self.write_u16(0);
        self.buf.len() - 2
    }

    pub fn patch_u8(&mut self, offset: usize, value: u8) {
        self.buf[offset] = value;
    }

    pub fn patch_u16(&mut self, offset: usize, value: u16) {
        self.buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_little_endian() {
        let mut writer = ByteWriter::default();
        writer.write_u8(0x01);
        writer.write_u16(0x1234);
        writer.write_i16(-2);
        assert_eq!(writer.into_bytes(), vec![0x01, 0x34, 0x12, 0xFE, 0xFF]);
    }

    #[test]
    fn test_patch_reserved_slots() {
        let mut writer = ByteWriter::with_capacity(8);
        let count = writer.reserve_u16();
        let small = writer.reserve_u8();
        writer.write_u8(0xEE);
        writer.patch_u16(count, 0x0302);
        writer.patch_u8(small, 7);

        assert_eq!(writer.len(), 4);
        assert_eq!(writer.into_bytes(), vec![0x02, 0x03, 7, 0xEE]);
    }
}
