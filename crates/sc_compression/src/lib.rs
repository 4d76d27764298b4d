//! This library detects and unwraps the compressed containers used to ship *Supercell* game assets.
//!
//! # Format Documentation
//!
//! Asset files are wrapped in one or more envelopes. Each envelope is recognised by its leading
//! bytes and either strips to another buffer or is decoded by an external codec. Files are
//! commonly nested two or three deep, for example a signed wrapper around an `SC` container
//! around an LZMA stream.
//!
//! | Signature                    | Leading bytes                    | Handling                                 |
//! |------------------------------|----------------------------------|------------------------------------------|
//! | `SCLZ`                       | `53 43 4C 5A` ("SCLZ")           | LZHAM codec, terminal                    |
//! | `SC`                         | `53 43` ("SC")                   | header stripped, payload unwrapped again |
//! | `Sig:`                       | `53 69 67 3A` ("Sig:")           | 68 bytes stripped, rest unwrapped again  |
//! | Zstandard                    | `28 B5 2F FD`                    | zstd codec, terminal                     |
//! | LZMA                         | `?? 00 00` (see below)           | lzma codec, terminal                     |
//! | None                         | anything else                    | returned unchanged                       |
//!
//! Magic tags are checked after the LZMA and Zstandard checks and take precedence over them.
//! Buffers shorter than five bytes are always returned unchanged.
//!
//! ## SC Container
//!
//! See [`container`] for the header layout. Depending on the version it carries either a
//! content hash or an opaque metadata table, both of which are exposed through
//! [`DecodeContext`].
//!
//! ## SCLZ
//!
//! | Offset (bytes) | Field                  | Description                                      |
//! |----------------|------------------------|--------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: "SCLZ"                                  |
//! | 0x0004         | Dictionary size        | 1 byte: base two logarithm of the dictionary     |
//! | 0x0005         | Uncompressed size      | 4 bytes, little endian                           |
//! | 0x0009         | Data                   | LZHAM stream to the end of the buffer            |
//!
//! ## LZMA
//!
//! There is no magic. A buffer whose second and third bytes are zero (the low bytes of a
//! typical dictionary size) is taken to be LZMA. Asset files store a 4-byte uncompressed size
//! after the five property bytes, which is replaced by the standard 8-byte "unknown size"
//! before decoding.
//!
//! ## Additional Information
//!
//! - **Endianness**: big endian for the `SC` header up to its version-specific block, little
//!   endian for the newer metadata tables and for `SCLZ`
//! - **Codecs**: see [`codec`] for what is built in and how to add LZHAM

pub mod codec;
pub mod container;
pub mod decompress;
pub mod endian;
pub mod error;
pub mod read;
pub mod signature;
pub mod write;

pub use codec::{Codec, CodecRegistry, CodecRequest};
pub use decompress::{decompress, DecodeContext, Decompressor, Unwrapped};
pub use signature::Signature;
