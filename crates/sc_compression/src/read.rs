//! Sequential reader over an in-memory buffer
//!

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::{
    endian::Endian,
    error::{Error, Result},
};

/// Endian-aware cursor over a borrowed byte buffer
///
/// Every read either returns exactly the bytes it promises or fails with
/// [`Error::OutOfData`]; a failed read leaves the position untouched. Slices are
/// borrowed from the underlying buffer so skipping a large region never allocates.
///
/// ```
/// use sc_compression::{endian::Endian, read::ByteReader};
///
/// let mut reader = ByteReader::new(&[0x00, 0x01, 0x02, 0x00], Endian::Big);
/// assert_eq!(reader.read_u16().unwrap(), 1);
///
/// reader.set_endian(Endian::Little);
/// assert_eq!(reader.read_u16().unwrap(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
    endian: Endian,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the start of `data`
    pub fn new(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            position: 0,
            endian,
        }
    }

    /// Change the byte order for all following numeric reads
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Byte order currently in effect
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Move to an absolute position. Positions past the end are rejected.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(Error::SeekOutOfBounds {
                position,
                len: self.data.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Current absolute position
    pub fn tell(&self) -> usize {
        self.position
    }

    /// Number of bytes between the position and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Read exactly `size` bytes
    pub fn read(&mut self, size: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if size > remaining {
            return Err(Error::OutOfData {
                requested: size,
                remaining,
            });
        }

        let data = self.data;
        let bytes = &data[self.position..self.position + size];
        self.position += size;
        Ok(bytes)
    }

    /// Advance past `size` bytes without looking at them
    pub fn skip(&mut self, size: usize) -> Result<()> {
        self.read(size).map(|_| ())
    }

    /// Verify that the next bytes match `expected`.
    ///
    /// Returns [`Error::UnknownMagic`] carrying both tags on mismatch, or
    /// [`Error::OutOfData`] when the buffer is too short to hold the tag at all.
    pub fn expect_magic(&mut self, expected: &[u8]) -> Result<()> {
        let actual = self.read(expected.len())?;
        if actual != expected {
            return Err(Error::UnknownMagic {
                expected: expected.to_vec(),
                actual: actual.to_vec(),
            });
        }
        Ok(())
    }

    /// Everything from the position to the end, possibly empty
    pub fn read_all_remaining(&mut self) -> &'a [u8] {
        let data = self.data;
        let bytes = &data[self.position..];
        self.position = data.len();
        bytes
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buffer = [0u8; N];
        buffer.copy_from_slice(self.read(N)?);
        Ok(buffer)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.read_array::<2>()?;
        Ok(match self.endian {
            Endian::Big => BigEndian::read_u16(&b),
            Endian::Little => LittleEndian::read_u16(&b),
        })
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.read_array::<4>()?;
        Ok(match self.endian {
            Endian::Big => BigEndian::read_u32(&b),
            Endian::Little => LittleEndian::read_u32(&b),
        })
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let b = self.read_array::<8>()?;
        Ok(match self.endian {
            Endian::Big => BigEndian::read_u64(&b),
            Endian::Little => LittleEndian::read_u64(&b),
        })
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }
}
