/// Append-only byte writer for building datagrams front to back.
///
/// Writes cannot fail; callers check positions against `layout` instead.
pub struct ArtNetWriter {
    buf: Vec<u8>,
}

impl ArtNetWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Offset the next write lands on.
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16_le(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u16_be(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_slice(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::ArtNetWriter;

    #[test]
    fn writes_in_requested_byte_order() {
        let mut writer = ArtNetWriter::with_capacity(4);
        writer.write_u16_le(0x5000);
        writer.write_u16_be(14);
        assert_eq!(writer.position(), 4);
        assert_eq!(writer.finish(), vec![0x00, 0x50, 0x00, 0x0e]);
    }
}
