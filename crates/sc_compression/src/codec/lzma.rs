//! LZMA decompression (requires the `lzma` feature).
//!
//! Asset files store a classic `.lzma` header with a 4-byte size field in place of the usual
//! 8-byte one. The dispatcher rewrites it into a 13-byte header with an unknown size before
//! calling this codec, so the stream is decoded until its end marker or the end of input.

#![cfg(feature = "lzma")]

use tracing::instrument;

use crate::{
    codec::{Codec, CodecRequest},
    error::{Error, Result},
};

/// LZMA "alone" stream decoder backed by [`lzma_rs`]
#[derive(Debug, Clone, Copy, Default)]
pub struct LzmaCodec;

impl Codec for LzmaCodec {
    fn name(&self) -> &'static str {
        "lzma"
    }

    #[instrument(skip_all, fields(len = request.data.len()), err)]
    fn decompress(&self, request: &CodecRequest<'_>) -> Result<Vec<u8>> {
        let mut input = request.data;
        let mut output = Vec::with_capacity(request.uncompressed_size.unwrap_or_default());

        lzma_rs::lzma_decompress(&mut input, &mut output)
            .map_err(|e| Error::codec(self.name(), e))?;

        Ok(output)
    }
}
