//! Recursive unwrapping of nested envelopes
//!

use std::sync::Arc;

use tracing::{debug, instrument, trace, warn};

use crate::{
    codec::{Codec, CodecRegistry, CodecRequest},
    container::ScHeader,
    endian::Endian,
    error::{Error, Result},
    read::ByteReader,
    signature::{Signature, MAGIC_SCLZ, MAGIC_ZSTD},
    write::ByteWriter,
};

/// Total size of the `Sig:` block stripped in front of signed files
pub const SIGNED_WRAPPER_LEN: usize = 68;

/// Value of [`DecodeContext::file_version`] until an `SC` header has been read
pub const UNKNOWN_VERSION: i32 = -1;

/// Size of the dictionary-size prefix kept from an asset LZMA header
const LZMA_PROPERTIES_LEN: usize = 5;

/// Size of the uncompressed-size field asset files store after the properties
const LZMA_ASSET_SIZE_LEN: usize = 4;

/// Everything learned about a buffer while unwrapping it
///
/// A fresh context is created for each call to [`Decompressor::unpack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeContext {
    layers: Vec<Signature>,
    file_version: i32,
    hash: Option<Vec<u8>>,
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self {
            layers: Vec::new(),
            file_version: UNKNOWN_VERSION,
            hash: None,
        }
    }
}

impl DecodeContext {
    /// The innermost signature detected
    pub fn signature(&self) -> Signature {
        self.layers.last().copied().unwrap_or(Signature::None)
    }

    /// Every signature detected, outermost first
    pub fn layers(&self) -> &[Signature] {
        &self.layers
    }

    /// Number of dispatcher transitions taken
    pub fn transitions(&self) -> usize {
        self.layers.len()
    }

    /// Version of the last `SC` header, or [`UNKNOWN_VERSION`]
    pub fn file_version(&self) -> i32 {
        self.file_version
    }

    /// Content hash of the last `SC` header that carried one
    pub fn hash(&self) -> Option<&[u8]> {
        self.hash.as_deref()
    }
}

/// Result of [`Decompressor::unpack`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unwrapped {
    /// Terminal bytes
    pub payload: Vec<u8>,

    /// What was found on the way there
    pub context: DecodeContext,
}

enum Step<'a> {
    Unwrap(&'a [u8]),
    Done(Vec<u8>),
}

/// Unwraps asset buffers until raw data is reached
///
/// Containers and signed wrappers are stripped and the inner buffer is classified again;
/// compressed streams are handed to the [`Codec`] registered for their signature and its
/// output is returned as is.
///
/// ```
/// use sc_compression::Decompressor;
///
/// let decompressor = Decompressor::default();
///
/// let data = b"SC\x00\x00\x00\x01\x00\x00\x00\x00raw bytes";
/// let unwrapped = decompressor.unpack(data).unwrap();
///
/// assert_eq!(unwrapped.payload, b"raw bytes");
/// assert_eq!(unwrapped.context.file_version(), 1);
/// ```
///
/// The registry is shared: [`Decompressor::default`] points at [`CodecRegistry::global`] and
/// cloning a decompressor does not copy its codecs until one of them is modified.
#[derive(Debug, Clone)]
pub struct Decompressor {
    registry: Arc<CodecRegistry>,
}

impl Default for Decompressor {
    fn default() -> Self {
        Self::shared(CodecRegistry::global())
    }
}

impl Decompressor {
    /// Create a decompressor that delegates to the codecs in `registry`
    pub fn new(registry: CodecRegistry) -> Self {
        Self::shared(Arc::new(registry))
    }

    /// Create a decompressor around a registry shared with others
    pub fn shared(registry: Arc<CodecRegistry>) -> Self {
        Self { registry }
    }

    /// Codecs used by this decompressor
    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    /// Mutable access to the codecs, to register extra ones such as LZHAM.
    ///
    /// A registry still shared with other decompressors is copied first.
    pub fn registry_mut(&mut self) -> &mut CodecRegistry {
        Arc::make_mut(&mut self.registry)
    }

    /// Unwrap `buffer` and return only the terminal payload
    pub fn decompress(&self, buffer: &[u8]) -> Result<Vec<u8>> {
        self.unpack(buffer).map(|unwrapped| unwrapped.payload)
    }

    /// Unwrap `buffer`, returning the terminal payload with the collected context
    #[instrument(skip_all, fields(len = buffer.len()), err)]
    pub fn unpack(&self, buffer: &[u8]) -> Result<Unwrapped> {
        let mut context = DecodeContext::default();
        let mut current = buffer;

        loop {
            let signature = Signature::detect(current);
            context.layers.push(signature);
            trace!(%signature, len = current.len(), "detected layer");

            match self.step(current, signature, &mut context)? {
                Step::Unwrap(inner) => current = inner,
                Step::Done(payload) => {
                    debug!(
                        layers = context.layers.len(),
                        len = payload.len(),
                        "unwrapped buffer"
                    );
                    return Ok(Unwrapped { payload, context });
                }
            }
        }
    }

    fn step<'a>(
        &self,
        buffer: &'a [u8],
        signature: Signature,
        context: &mut DecodeContext,
    ) -> Result<Step<'a>> {
        match signature {
            Signature::None => Ok(Step::Done(buffer.to_vec())),
            Signature::ScContainer => {
                let (header, payload) = ScHeader::strip(buffer)?;

                context.file_version = header.version;
                if let Some(hash) = header.hash() {
                    context.hash = Some(hash.to_vec());
                }

                Ok(Step::Unwrap(payload))
            }
            Signature::SignedWrapper => {
                let mut reader = ByteReader::new(buffer, Endian::Big);
                reader.skip(SIGNED_WRAPPER_LEN)?;
                Ok(Step::Unwrap(reader.read_all_remaining()))
            }
            Signature::ScLzCompressed => {
                let codec = self.codec(signature)?;

                let mut reader = ByteReader::new(buffer, Endian::Little);
                reader.expect_magic(MAGIC_SCLZ)?;
                let dict_size_log2 = reader.read_u8()?;
                let uncompressed_size = reader.read_u32()? as usize;

                let request = CodecRequest {
                    data: reader.read_all_remaining(),
                    uncompressed_size: Some(uncompressed_size),
                    dict_size_log2: Some(dict_size_log2),
                };
                codec.decompress(&request).map(Step::Done)
            }
            Signature::Lzma => {
                let codec = self.codec(signature)?;
                let stream = lzma_alone_stream(buffer)?;
                codec.decompress(&CodecRequest::new(&stream)).map(Step::Done)
            }
            Signature::Zstd => {
                let codec = self.codec(signature)?;
                ByteReader::new(buffer, Endian::Big).expect_magic(MAGIC_ZSTD)?;
                codec.decompress(&CodecRequest::new(buffer)).map(Step::Done)
            }
        }
    }

    fn codec(&self, signature: Signature) -> Result<&dyn Codec> {
        self.registry.get(signature).ok_or_else(|| {
            warn!(%signature, "no codec registered");
            Error::UnsupportedSignature(signature)
        })
    }
}

/// Turn an asset LZMA header into a standard 13-byte one with an unknown size.
///
/// Asset files keep the five property bytes and follow them with a 4-byte size, the
/// standard header wants an 8-byte size where all ones means "unknown".
fn lzma_alone_stream(buffer: &[u8]) -> Result<Vec<u8>> {
    let mut reader = ByteReader::new(buffer, Endian::Little);
    let properties = reader.read(LZMA_PROPERTIES_LEN)?;
    reader.skip(LZMA_ASSET_SIZE_LEN)?;

    let mut writer = ByteWriter::new(Endian::Little);
    writer.write(properties);
    writer.write_u64(u64::MAX);
    writer.write(reader.read_all_remaining());
    Ok(writer.into_inner())
}

/// Unwrap `buffer` with the process-wide default codecs
///
/// ```
/// assert_eq!(sc_compression::decompress(b"plain").unwrap(), b"plain");
/// ```
pub fn decompress(buffer: &[u8]) -> Result<Vec<u8>> {
    Decompressor::default().decompress(buffer)
}
