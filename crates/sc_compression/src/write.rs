//! Append-only buffer writer
//!

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::endian::Endian;

/// Endian-aware writer that accumulates bytes in memory
///
/// The counterpart of [`crate::read::ByteReader`]. It only appends, there is no
/// seeking back to patch earlier fields.
///
/// ```
/// use sc_compression::{endian::Endian, write::ByteWriter};
///
/// let mut writer = ByteWriter::new(Endian::Big);
/// writer.write(b"SC");
/// writer.write_i32(1);
///
/// assert_eq!(writer.buffer(), b"SC\x00\x00\x00\x01");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    buffer: Vec<u8>,
    endian: Endian,
}

impl ByteWriter {
    /// Create an empty writer
    pub fn new(endian: Endian) -> Self {
        Self {
            buffer: Vec::new(),
            endian,
        }
    }

    /// Change the byte order for all following numeric writes
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Byte order currently in effect
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Append raw bytes
    pub fn write(&mut self, value: &[u8]) {
        self.buffer.extend_from_slice(value);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.write_u8(value as u8);
    }

    pub fn write_u16(&mut self, value: u16) {
        let mut b = [0u8; 2];
        match self.endian {
            Endian::Big => BigEndian::write_u16(&mut b, value),
            Endian::Little => LittleEndian::write_u16(&mut b, value),
        }
        self.write(&b);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.write_u16(value as u16);
    }

    pub fn write_u32(&mut self, value: u32) {
        let mut b = [0u8; 4];
        match self.endian {
            Endian::Big => BigEndian::write_u32(&mut b, value),
            Endian::Little => LittleEndian::write_u32(&mut b, value),
        }
        self.write(&b);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.write_u32(value as u32);
    }

    pub fn write_u64(&mut self, value: u64) {
        let mut b = [0u8; 8];
        match self.endian {
            Endian::Big => BigEndian::write_u64(&mut b, value),
            Endian::Little => LittleEndian::write_u64(&mut b, value),
        }
        self.write(&b);
    }

    pub fn write_i64(&mut self, value: i64) {
        self.write_u64(value as u64);
    }

    pub fn write_f32(&mut self, value: f32) {
        self.write_u32(value.to_bits());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.write_u64(value.to_bits());
    }

    /// Number of bytes written so far
    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    /// The bytes written so far
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the writer and return its buffer
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}
