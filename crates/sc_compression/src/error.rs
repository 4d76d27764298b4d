//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

use crate::signature::Signature;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// A fixed tag did not match the bytes found at its offset
    #[error("unknown magic: expected {expected:02X?}, found {actual:02X?}")]
    #[diagnostic(help("the buffer is not the container its signature suggested"))]
    UnknownMagic {
        /// The tag the format requires
        expected: Vec<u8>,
        /// The bytes actually present
        actual: Vec<u8>,
    },

    /// A read or skip requested more bytes than remain
    #[error("out of data: requested {requested} bytes but only {remaining} remain")]
    OutOfData {
        /// Number of bytes asked for
        requested: usize,
        /// Number of bytes left in the buffer
        remaining: usize,
    },

    /// A seek targeted a position past the end of the buffer
    #[error("seek out of bounds: position {position} is past the end at {len}")]
    SeekOutOfBounds {
        /// Absolute position asked for
        position: usize,
        /// Length of the buffer
        len: usize,
    },

    /// An `SC` header whose fields cannot be encoded so that they read back the same
    #[error("inconsistent sc header for version {version:#x}: {reason}")]
    #[diagnostic(help("build the header from the version it will be read back with"))]
    InconsistentHeader {
        /// Resolved version of the header
        version: i32,
        /// Which fields disagree
        reason: &'static str,
    },

    /// The format was recognised but no codec for it is available in this build
    #[error("no codec available for {0} data")]
    #[diagnostic(help("register a codec for this signature on the CodecRegistry"))]
    UnsupportedSignature(Signature),

    /// A raw signature value outside of the known set
    #[error("unrecognized signature {0}")]
    UnrecognizedSignature(u8),

    /// The external codec rejected its input
    #[error("{codec} codec failed")]
    Codec {
        /// Name of the codec that failed
        codec: &'static str,
        /// The codec's own diagnostic
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An endianness name other than `big` or `little`
    #[error("unknown endian requested: {0}")]
    UnknownEndian(String),
}

impl Error {
    /// Wrap an error reported by an external codec
    pub fn codec(
        codec: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Codec {
            codec,
            source: source.into(),
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
