//! Header of the versioned `SC` container.
//!
//! | Offset | Field               | Description                                              |
//! |--------|---------------------|----------------------------------------------------------|
//! | 0x0000 | Magic number        | 2 bytes: `SC`                                            |
//! | 0x0002 | Version             | 4 bytes, big endian                                      |
//! | 0x0006 | Extended version    | 4 bytes, big endian, only present when version is `4`    |
//!
//! What follows depends on the resolved version. Versions `0x05000000` and `0x06000000` switch to
//! little endian and carry a metadata table:
//!
//! | Field               | Description                                                   |
//! |---------------------|---------------------------------------------------------------|
//! | Reserved            | 2 bytes, only for `0x06000000`                                |
//! | Metadata length     | 4 bytes: size of the metadata table                           |
//! | Metadata            | (Metadata length) bytes, skipped                              |
//!
//! Every other version stays big endian and carries a content hash:
//!
//! | Field               | Description                                                   |
//! |---------------------|---------------------------------------------------------------|
//! | Hash length         | 4 bytes: size of the hash                                     |
//! | Hash                | (Hash length) bytes                                           |
//!
//! The rest of the buffer is the inner payload, which is usually itself compressed.

use tracing::{debug, instrument};

use crate::{
    endian::Endian,
    error::{Error, Result},
    read::ByteReader,
    signature::MAGIC_SC,
    write::ByteWriter,
};

/// Version value announcing that the real version follows in the next four bytes
pub const VERSION_EXTENDED: i32 = 4;

/// Version with a little endian metadata table
pub const VERSION_METADATA: i32 = 0x0500_0000;

/// Version with a reserved field in front of the little endian metadata table
pub const VERSION_METADATA_RESERVED: i32 = 0x0600_0000;

/// Version specific block that sits between the version and the payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScMetadata<'a> {
    /// Content hash of the older versions
    Hash(&'a [u8]),

    /// Opaque metadata table of the newer versions
    Table {
        /// Present only for [`VERSION_METADATA_RESERVED`]
        reserved: Option<i16>,
        /// Table contents, never interpreted
        table: &'a [u8],
    },
}

/// Decoded `SC` container header
///
/// Slices borrow from the buffer the header was read from.
///
/// ```
/// use sc_compression::container::ScHeader;
///
/// let input = b"SC\x00\x00\x00\x01\x00\x00\x00\x02\xAB\xCDpayload";
/// let (header, payload) = ScHeader::strip(input).unwrap();
///
/// assert_eq!(header.version, 1);
/// assert_eq!(header.hash(), Some(&[0xAB, 0xCD][..]));
/// assert_eq!(payload, b"payload");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScHeader<'a> {
    /// The version was stored behind the [`VERSION_EXTENDED`] marker
    pub extended: bool,

    /// Resolved version
    pub version: i32,

    /// Hash or metadata table, depending on the version
    pub metadata: ScMetadata<'a>,
}

impl<'a> ScHeader<'a> {
    /// Whether `version` uses the little endian metadata table layout
    pub fn has_metadata_table(version: i32) -> bool {
        version == VERSION_METADATA || version == VERSION_METADATA_RESERVED
    }

    /// Consume a header from `reader`, leaving it positioned at the payload.
    ///
    /// The reader is switched to big endian first and is left little endian for the
    /// metadata table versions. Declared lengths are checked against the remaining data
    /// before anything is sliced.
    #[instrument(skip_all, err)]
    pub fn read(reader: &mut ByteReader<'a>) -> Result<Self> {
        reader.set_endian(Endian::Big);
        reader.expect_magic(MAGIC_SC)?;

        let mut version = reader.read_i32()?;
        let extended = version == VERSION_EXTENDED;
        if extended {
            version = reader.read_i32()?;
        }

        let metadata = if Self::has_metadata_table(version) {
            reader.set_endian(Endian::Little);

            let reserved = if version == VERSION_METADATA_RESERVED {
                Some(reader.read_i16()?)
            } else {
                None
            };

            let length = reader.read_u32()? as usize;
            ScMetadata::Table {
                reserved,
                table: reader.read(length)?,
            }
        } else {
            let length = reader.read_u32()? as usize;
            ScMetadata::Hash(reader.read(length)?)
        };

        debug!(version, extended, payload = reader.remaining(), "read sc header");

        Ok(ScHeader {
            extended,
            version,
            metadata,
        })
    }

    /// Split `buffer` into its header and the payload that follows it
    pub fn strip(buffer: &'a [u8]) -> Result<(Self, &'a [u8])> {
        let mut reader = ByteReader::new(buffer, Endian::Big);
        let header = Self::read(&mut reader)?;
        Ok((header, reader.read_all_remaining()))
    }

    /// Encode the header so that [`ScHeader::read`] yields it back.
    ///
    /// Fails with [`Error::InconsistentHeader`] when `metadata` does not match the layout
    /// `version` implies, or when a version of [`VERSION_EXTENDED`] is not marked extended.
    pub fn write(&self, writer: &mut ByteWriter) -> Result<()> {
        self.check_layout()?;

        writer.set_endian(Endian::Big);
        writer.write(MAGIC_SC);

        if self.extended {
            writer.write_i32(VERSION_EXTENDED);
        }
        writer.write_i32(self.version);

        match self.metadata {
            ScMetadata::Table { reserved, table } => {
                writer.set_endian(Endian::Little);
                if let Some(reserved) = reserved {
                    writer.write_i16(reserved);
                }
                writer.write_u32(table.len() as u32);
                writer.write(table);
            }
            ScMetadata::Hash(hash) => {
                writer.write_u32(hash.len() as u32);
                writer.write(hash);
            }
        }

        Ok(())
    }

    fn check_layout(&self) -> Result<()> {
        let reason = match self.metadata {
            _ if self.version == VERSION_EXTENDED && !self.extended => {
                "a bare version 4 is read as the extended marker"
            }
            ScMetadata::Hash(_) if Self::has_metadata_table(self.version) => {
                "version carries a metadata table, not a hash"
            }
            ScMetadata::Table { .. } if !Self::has_metadata_table(self.version) => {
                "version carries a hash, not a metadata table"
            }
            ScMetadata::Table { reserved, .. }
                if reserved.is_some() != (self.version == VERSION_METADATA_RESERVED) =>
            {
                "reserved field is present exactly for version 0x6000000"
            }
            _ if u32::try_from(self.metadata_len()).is_err() => {
                "hash or metadata table longer than a 32-bit length"
            }
            _ => return Ok(()),
        };

        Err(Error::InconsistentHeader {
            version: self.version,
            reason,
        })
    }

    /// The content hash, for versions that carry one
    pub fn hash(&self) -> Option<&'a [u8]> {
        match self.metadata {
            ScMetadata::Hash(hash) => Some(hash),
            ScMetadata::Table { .. } => None,
        }
    }

    /// Size of the hash or metadata table
    pub fn metadata_len(&self) -> usize {
        match self.metadata {
            ScMetadata::Hash(hash) => hash.len(),
            ScMetadata::Table { table, .. } => table.len(),
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::container::{
        ScHeader, ScMetadata, VERSION_EXTENDED, VERSION_METADATA, VERSION_METADATA_RESERVED,
    };
    use crate::endian::Endian;
    use crate::error::{Error, Result};
    use crate::read::ByteReader;
    use crate::write::ByteWriter;

    #[test]
    fn read_hash_header() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            b'S', b'C',
            0x00, 0x00, 0x00, 0x03,
            0x00, 0x00, 0x00, 0x04,
            b'a', b'b', b'c', b'd',
            0x00, 0x00, 0x00, 0x00, 0x05,
        ];

        let (header, payload) = ScHeader::strip(&input)?;

        assert_eq!(
            header,
            ScHeader {
                extended: false,
                version: 3,
                metadata: ScMetadata::Hash(b"abcd"),
            }
        );
        assert_eq!(payload, &[0x00, 0x00, 0x00, 0x00, 0x05]);

        Ok(())
    }

    #[test]
    fn read_extended_metadata_header() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            b'S', b'C',
            0x00, 0x00, 0x00, 0x04,
            0x05, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00,
            0xAA, 0xBB, 0xCC,
            0x28, 0xB5,
        ];

        let mut reader = ByteReader::new(&input, Endian::Big);
        let header = ScHeader::read(&mut reader)?;

        assert!(header.extended);
        assert_eq!(header.version, VERSION_METADATA);
        assert_eq!(header.hash(), None);
        assert_eq!(header.metadata_len(), 3);
        assert_eq!(reader.endian(), Endian::Little);
        assert_eq!(reader.read_all_remaining(), &[0x28, 0xB5]);

        Ok(())
    }

    #[test]
    fn read_reserved_metadata_header() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            b'S', b'C',
            0x00, 0x00, 0x00, 0x04,
            0x06, 0x00, 0x00, 0x00,
            0x01, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0xAA, 0xBB,
        ];

        let (header, payload) = ScHeader::strip(&input)?;

        assert_eq!(
            header.metadata,
            ScMetadata::Table {
                reserved: Some(1),
                table: &[0xAA, 0xBB],
            }
        );
        assert_eq!(header.version, VERSION_METADATA_RESERVED);
        assert!(payload.is_empty());

        Ok(())
    }

    #[test]
    fn read_bad_magic() {
        let input = b"XX\x00\x00\x00\x01\x00\x00\x00\x00";

        match ScHeader::strip(input) {
            Err(Error::UnknownMagic { expected, actual }) => {
                assert_eq!(expected, b"SC".to_vec());
                assert_eq!(actual, b"XX".to_vec());
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn read_hash_length_overflow() {
        #[rustfmt::skip]
        let input = [
            b'S', b'C',
            0x00, 0x00, 0x00, 0x01,
            0x00, 0x00, 0x10, 0x00,
            0x01, 0x02,
        ];

        assert!(matches!(
            ScHeader::strip(&input),
            Err(Error::OutOfData {
                requested: 0x1000,
                remaining: 2
            })
        ));
    }

    #[test]
    fn read_negative_hash_length() {
        #[rustfmt::skip]
        let input = [
            b'S', b'C',
            0x00, 0x00, 0x00, 0x01,
            0xFF, 0xFF, 0xFF, 0xFF,
            0x01, 0x02,
        ];

        assert!(matches!(
            ScHeader::strip(&input),
            Err(Error::OutOfData { remaining: 2, .. })
        ));
    }

    #[test]
    fn read_metadata_length_overflow() {
        #[rustfmt::skip]
        let input = [
            b'S', b'C',
            0x05, 0x00, 0x00, 0x00,
            0xFF, 0xFF, 0xFF, 0x7F,
            0x00,
        ];

        assert!(matches!(
            ScHeader::strip(&input),
            Err(Error::OutOfData { remaining: 1, .. })
        ));
    }

    #[test]
    fn read_truncated_header() {
        assert!(matches!(
            ScHeader::strip(b"SC\x00\x00"),
            Err(Error::OutOfData {
                requested: 4,
                remaining: 2
            })
        ));
    }

    #[test]
    fn write_header_round_trip() -> Result<()> {
        let table = [0x10u8; 7];
        let headers = [
            ScHeader {
                extended: false,
                version: 1,
                metadata: ScMetadata::Hash(&[0xDE, 0xAD, 0xBE, 0xEF]),
            },
            ScHeader {
                extended: true,
                version: 3,
                metadata: ScMetadata::Hash(&[]),
            },
            ScHeader {
                extended: false,
                version: VERSION_METADATA,
                metadata: ScMetadata::Table {
                    reserved: None,
                    table: &table,
                },
            },
            ScHeader {
                extended: true,
                version: VERSION_METADATA_RESERVED,
                metadata: ScMetadata::Table {
                    reserved: Some(-1),
                    table: &table,
                },
            },
        ];

        for header in headers {
            let mut writer = ByteWriter::new(Endian::Big);
            header.write(&mut writer)?;
            writer.write(b"inner payload");

            let buffer = writer.into_inner();
            let (actual, payload) = ScHeader::strip(&buffer)?;

            assert_eq!(actual, header);
            assert_eq!(payload, b"inner payload");
        }

        Ok(())
    }

    #[test]
    fn write_hash_header_bytes() -> Result<()> {
        let header = ScHeader {
            extended: true,
            version: 1,
            metadata: ScMetadata::Hash(b"hi"),
        };

        let mut writer = ByteWriter::new(Endian::Little);
        header.write(&mut writer)?;

        #[rustfmt::skip]
        let expected = vec![
            b'S', b'C',
            0x00, 0x00, 0x00, 0x04,
            0x00, 0x00, 0x00, 0x01,
            0x00, 0x00, 0x00, 0x02,
            b'h', b'i',
        ];

        assert_eq!(writer.into_inner(), expected);

        Ok(())
    }

    #[test]
    fn write_rejects_bare_extended_marker() {
        let header = ScHeader {
            extended: false,
            version: VERSION_EXTENDED,
            metadata: ScMetadata::Hash(b"ab"),
        };

        let mut writer = ByteWriter::new(Endian::Big);
        assert!(matches!(
            header.write(&mut writer),
            Err(Error::InconsistentHeader {
                version: VERSION_EXTENDED,
                ..
            })
        ));
        assert_eq!(writer.position(), 0);
    }

    #[test]
    fn write_extended_marker_as_version() -> Result<()> {
        let header = ScHeader {
            extended: true,
            version: VERSION_EXTENDED,
            metadata: ScMetadata::Hash(b"ab"),
        };

        let mut writer = ByteWriter::new(Endian::Big);
        header.write(&mut writer)?;
        let buffer = writer.into_inner();

        assert_eq!(ScHeader::strip(&buffer)?, (header, &[][..]));

        Ok(())
    }

    #[test]
    fn write_rejects_metadata_for_version() {
        let table = [0x10u8; 2];

        #[rustfmt::skip]
        let headers = [
            // table on a hash version
            ScHeader {
                extended: false,
                version: 1,
                metadata: ScMetadata::Table { reserved: None, table: &table },
            },
            // hash on a table version
            ScHeader {
                extended: true,
                version: VERSION_METADATA,
                metadata: ScMetadata::Hash(b"ab"),
            },
            ScHeader {
                extended: true,
                version: VERSION_METADATA,
                metadata: ScMetadata::Table { reserved: Some(0), table: &table },
            },
            ScHeader {
                extended: true,
                version: VERSION_METADATA_RESERVED,
                metadata: ScMetadata::Table { reserved: None, table: &table },
            },
        ];

        for header in headers {
            let mut writer = ByteWriter::new(Endian::Big);
            let result = header.write(&mut writer);

            assert!(
                matches!(
                    result,
                    Err(Error::InconsistentHeader { version, .. }) if version == header.version
                ),
                "{header:?} gave {result:?}"
            );
            assert!(writer.buffer().is_empty());
        }
    }
}
