//! Zstandard decompression (requires the `zstd` feature).

#![cfg(feature = "zstd")]

use tracing::instrument;

use crate::{
    codec::{Codec, CodecRequest},
    error::{Error, Result},
};

/// Zstandard frame decoder backed by [`zstd`](https://docs.rs/zstd)
#[derive(Debug, Clone, Copy, Default)]
pub struct ZstdCodec;

impl Codec for ZstdCodec {
    fn name(&self) -> &'static str {
        "zstd"
    }

    #[instrument(skip_all, fields(len = request.data.len()), err)]
    fn decompress(&self, request: &CodecRequest<'_>) -> Result<Vec<u8>> {
        zstd::decode_all(request.data).map_err(|e| Error::codec(self.name(), e))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::codec::{zstd::ZstdCodec, Codec, CodecRequest};
    use crate::error::{Error, Result};

    #[test]
    fn decode_frame() -> Result<()> {
        let compressed = zstd::encode_all(&b"hello"[..], 0)?;

        let actual = ZstdCodec.decompress(&CodecRequest::new(&compressed))?;
        assert_eq!(actual, b"hello".to_vec());

        Ok(())
    }

    #[test]
    fn size_hint_is_not_trusted() -> Result<()> {
        let compressed = zstd::encode_all(&b"hello"[..], 0)?;
        let request = CodecRequest {
            uncompressed_size: Some(1),
            ..CodecRequest::new(&compressed)
        };

        assert_eq!(ZstdCodec.decompress(&request)?, b"hello".to_vec());

        Ok(())
    }

    #[test]
    fn decode_truncated_frame_fails() {
        let err = ZstdCodec
            .decompress(&CodecRequest::new(b"\x28\xB5\x2F\xFD\x00"))
            .unwrap_err();

        assert!(matches!(err, Error::Codec { codec: "zstd", .. }));
    }
}
