//! Boundary between the unwrapping logic and the external decompressors.
//!
//! The algorithms themselves live in other crates. Each one is adapted to [`Codec`] and
//! registered in a [`CodecRegistry`] under the [`Signature`] it decodes; the dispatcher asks
//! the registry and fails with [`crate::error::Error::UnsupportedSignature`] when nothing is
//! registered.
//!
//! | Signature                       | Built-in     | Cargo feature |
//! |---------------------------------|--------------|---------------|
//! | [`Signature::Lzma`]             | [`lzma`]     | `lzma`        |
//! | [`Signature::Zstd`]             | [`zstd`]     | `zstd`        |
//! | [`Signature::ScLzCompressed`]   | none         |               |
//!
//! There is no LZHAM implementation in the Rust ecosystem this crate depends on, so SCLZ
//! data only decodes once the caller registers its own [`Codec`] for it.

use std::{
    collections::HashMap,
    fmt::{self, Debug},
    sync::{Arc, OnceLock},
};

use tracing::debug;

use crate::{error::Result, signature::Signature};

#[cfg(feature = "lzma")]
pub mod lzma;

#[cfg(feature = "zstd")]
pub mod zstd;

/// Input handed to a [`Codec`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecRequest<'a> {
    /// Compressed bytes
    pub data: &'a [u8],

    /// Exact output size, when the envelope declares one
    pub uncompressed_size: Option<usize>,

    /// Base two logarithm of the dictionary size, for LZHAM
    pub dict_size_log2: Option<u8>,
}

impl<'a> CodecRequest<'a> {
    /// Request for a self-describing stream
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            uncompressed_size: None,
            dict_size_log2: None,
        }
    }
}

/// An external decompressor
///
/// Implementations are synchronous and must not keep state between calls, a single
/// instance is shared by every [`crate::Decompressor`] using the registry.
pub trait Codec: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    /// Decode `request` into the terminal payload.
    ///
    /// Failures reported by the underlying library are returned as
    /// [`crate::error::Error::Codec`].
    fn decompress(&self, request: &CodecRequest<'_>) -> Result<Vec<u8>>;
}

/// Map from signature to the codec that decodes it
///
/// ```
/// use sc_compression::{codec::CodecRegistry, signature::Signature};
///
/// let registry = CodecRegistry::empty();
/// assert!(!registry.is_available(Signature::Zstd));
/// ```
#[derive(Clone)]
pub struct CodecRegistry {
    codecs: HashMap<Signature, Arc<dyn Codec>>,
}

impl CodecRegistry {
    /// Registry without any codec
    pub fn empty() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// Registry with every codec compiled into this build
    #[allow(unused_mut)]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();

        #[cfg(feature = "lzma")]
        registry.register(Signature::Lzma, lzma::LzmaCodec);

        #[cfg(feature = "zstd")]
        registry.register(Signature::Zstd, self::zstd::ZstdCodec);

        registry
    }

    /// Process-wide registry of the built-in codecs, created on first use
    pub fn global() -> Arc<CodecRegistry> {
        static GLOBAL: OnceLock<Arc<CodecRegistry>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| Arc::new(CodecRegistry::builtin()))
            .clone()
    }

    /// Install `codec` for `signature`, returning the one it replaces
    pub fn register(
        &mut self,
        signature: Signature,
        codec: impl Codec + 'static,
    ) -> Option<Arc<dyn Codec>> {
        debug!(%signature, codec = codec.name(), "registering codec");
        self.codecs.insert(signature, Arc::new(codec))
    }

    /// Builder form of [`CodecRegistry::register`]
    pub fn with(mut self, signature: Signature, codec: impl Codec + 'static) -> Self {
        self.register(signature, codec);
        self
    }

    /// Remove the codec for `signature`
    pub fn unregister(&mut self, signature: Signature) -> Option<Arc<dyn Codec>> {
        self.codecs.remove(&signature)
    }

    /// Codec registered for `signature`, if any
    pub fn get(&self, signature: Signature) -> Option<&dyn Codec> {
        self.codecs.get(&signature).map(Arc::as_ref)
    }

    /// Whether a codec is registered for `signature`
    pub fn is_available(&self, signature: Signature) -> bool {
        self.codecs.contains_key(&signature)
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut entries: Vec<_> = self
            .codecs
            .iter()
            .map(|(signature, codec)| (*signature, codec.name()))
            .collect();
        entries.sort_unstable_by_key(|(signature, _)| u8::from(*signature));

        f.debug_map().entries(entries).finish()
    }
}
