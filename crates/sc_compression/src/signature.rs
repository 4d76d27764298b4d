//! Detection of the outer format of a buffer.

use std::fmt;

use crate::error::Error;

/// Magic of the versioned SC container
pub const MAGIC_SC: &[u8; 2] = b"SC";

/// Magic of the LZHAM compressed SCLZ envelope
pub const MAGIC_SCLZ: &[u8; 4] = b"SCLZ";

/// Magic of the signed wrapper
pub const MAGIC_SIG: &[u8; 4] = b"Sig:";

/// Magic of a Zstandard frame
pub const MAGIC_ZSTD: &[u8; 4] = b"\x28\xB5\x2F\xFD";

/// Buffers shorter than this never classify as anything but [`Signature::None`]
pub const MIN_SIGNATURE_LEN: usize = 5;

/// Outer format of a buffer as determined by [`Signature::detect`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Signature {
    /// Nothing recognised, the buffer is already raw data
    None = 0,

    /// LZMA stream with the 4-byte size header used by asset files
    Lzma = 1,

    /// Versioned `SC` container
    ScContainer = 2,

    /// LZHAM data behind an `SCLZ` header
    ScLzCompressed = 3,

    /// Fixed-size `Sig:` block in front of another buffer
    SignedWrapper = 4,

    /// Zstandard frame
    Zstd = 5,
}

impl Signature {
    /// Classify `buffer` by its leading bytes.
    ///
    /// The lzma and zstd checks run first and the magic tags are checked afterwards, so a
    /// matching tag always replaces the earlier guess.
    pub fn detect(buffer: &[u8]) -> Signature {
        if buffer.len() < MIN_SIGNATURE_LEN {
            return Signature::None;
        }

        let mut signature = Signature::None;

        if looks_like_lzma(&buffer[1..5]) {
            signature = Signature::Lzma;
        } else if buffer.starts_with(MAGIC_ZSTD) {
            signature = Signature::Zstd;
        }

        if buffer.starts_with(MAGIC_SCLZ) {
            signature = Signature::ScLzCompressed;
        } else if buffer.starts_with(MAGIC_SC) {
            signature = Signature::ScContainer;
        } else if buffer.starts_with(MAGIC_SIG) {
            signature = Signature::SignedWrapper;
        }

        signature
    }

    /// Short lowercase name used in logs and diagnostics
    pub fn name(self) -> &'static str {
        match self {
            Signature::None => "none",
            Signature::Lzma => "lzma",
            Signature::ScContainer => "sc",
            Signature::ScLzCompressed => "sclz",
            Signature::SignedWrapper => "sig",
            Signature::Zstd => "zstd",
        }
    }
}

/// Matches `00 00? 00` anchored at the start of the dictionary-size window.
///
/// The optional middle byte makes the three byte form redundant, so this reduces to the
/// first two bytes of the window being zero.
fn looks_like_lzma(window: &[u8]) -> bool {
    matches!(window, [0x00, 0x00, ..])
}

impl TryFrom<u8> for Signature {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Signature::None),
            1 => Ok(Signature::Lzma),
            2 => Ok(Signature::ScContainer),
            3 => Ok(Signature::ScLzCompressed),
            4 => Ok(Signature::SignedWrapper),
            5 => Ok(Signature::Zstd),
            other => Err(Error::UnrecognizedSignature(other)),
        }
    }
}

impl From<Signature> for u8 {
    fn from(value: Signature) -> Self {
        value as u8
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::error::Error;
    use crate::signature::Signature;

    #[test]
    fn detect_short_buffers_as_none() {
        #[rustfmt::skip]
        let inputs: [&[u8]; 7] = [
            b"", b"S", b"SC", b"SCLZ", b"Sig:",
            b"\x28\xB5\x2F\xFD",
            b"\x5D\x00\x00\x00",
        ];

        for input in inputs {
            assert_eq!(Signature::detect(input), Signature::None);
        }
    }

    #[test]
    fn detect_lzma_dictionary_pattern() {
        #[rustfmt::skip]
        let inputs = [
            [0x5D, 0x00, 0x00, 0x04, 0x00],
            [0x5D, 0x00, 0x00, 0x00, 0x01],
            [0x5D, 0x00, 0x00, 0x80, 0x00],
        ];

        for input in inputs {
            assert_eq!(Signature::detect(&input), Signature::Lzma);
        }
    }

    #[test]
    fn detect_rejects_single_zero() {
        assert_eq!(
            Signature::detect(&[0x5D, 0x00, 0x10, 0x00, 0x00]),
            Signature::None
        );
        assert_eq!(
            Signature::detect(&[0x5D, 0x01, 0x00, 0x00, 0x00]),
            Signature::None
        );
    }

    #[test]
    fn detect_magic_tags() {
        assert_eq!(Signature::detect(b"\x28\xB5\x2F\xFD\x00"), Signature::Zstd);
        assert_eq!(Signature::detect(b"SCLZ\x12"), Signature::ScLzCompressed);
        assert_eq!(Signature::detect(b"SC\x00\x00\x00\x01"), Signature::ScContainer);
        assert_eq!(Signature::detect(b"Sig:\x00"), Signature::SignedWrapper);
        assert_eq!(Signature::detect(b"hello world"), Signature::None);
    }

    #[test]
    fn detect_container_followed_by_zeros() {
        assert_eq!(
            Signature::detect(b"SC\x00\x00\x00\x04\x00\x00"),
            Signature::ScContainer
        );
        assert_eq!(
            Signature::detect(b"Sig:\x00\x00\x00\x00"),
            Signature::SignedWrapper
        );
    }

    #[test]
    fn convert_from_raw() {
        assert_eq!(Signature::try_from(5).ok(), Some(Signature::Zstd));
        assert_eq!(u8::from(Signature::ScContainer), 2);
        assert!(matches!(
            Signature::try_from(9),
            Err(Error::UnrecognizedSignature(9))
        ));
    }
}
