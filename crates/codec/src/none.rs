//! Passthrough codec.

use iobuf::ByteChain;

use crate::algorithm::CodecType;
use crate::error::CodecError;
use crate::level::CompressionLevel;

/// Codec whose "compressed" form is the verbatim input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NoCompressionCodec {
    _private: (),
}

impl NoCompressionCodec {
    /// Accepts any abstract level, and `Precise(0)` as the only raw level.
    pub fn new(level: CompressionLevel) -> Result<Self, CodecError> {
        match level {
            CompressionLevel::Fastest
            | CompressionLevel::Default
            | CompressionLevel::Best
            | CompressionLevel::Precise(0) => Ok(Self { _private: () }),
            CompressionLevel::Precise(level) => Err(CodecError::InvalidLevel {
                codec: CodecType::NoCompression,
                level,
            }),
        }
    }

    pub(crate) fn compress(self, data: &ByteChain) -> ByteChain {
        data.clone()
    }

    pub(crate) fn uncompress(
        self,
        data: &ByteChain,
        uncompressed_length: Option<u64>,
    ) -> Result<ByteChain, CodecError> {
        if let Some(declared) = uncompressed_length {
            let actual = data.len() as u64;
            if declared != actual {
                return Err(CodecError::length_mismatch(
                    CodecType::NoCompression,
                    declared,
                    actual,
                ));
            }
        }
        Ok(data.clone())
    }
}
