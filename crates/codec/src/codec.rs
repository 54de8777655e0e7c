//! The codec contract: one value type that dispatches to every built-in
//! algorithm after applying the checks common to all of them.

use iobuf::ByteChain;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::algorithm::CodecType;
use crate::error::CodecError;
use crate::level::CompressionLevel;
use crate::lz4::Lz4Codec;
use crate::none::NoCompressionCodec;
use crate::snappy::SnappyCodec;
use crate::zlib::ZlibCodec;

/// Largest uncompressed length accepted by codecs without a tighter engine limit.
pub const DEFAULT_MAX_UNCOMPRESSED_LENGTH: u64 = u64::MAX - 1;

/// A configured compression codec.
///
/// Codecs are immutable once built and keep no state between calls, so a
/// single value can serve any number of callers concurrently. Every call to
/// [`Codec::compress`] or [`Codec::uncompress`] processes one complete message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Codec {
    /// Verbatim passthrough.
    NoCompression(NoCompressionCodec),
    /// LZ4 block codec.
    Lz4(Lz4Codec),
    /// Raw Snappy codec.
    Snappy(SnappyCodec),
    /// Streaming zlib codec.
    Zlib(ZlibCodec),
}

impl Codec {
    /// Builds the codec identified by `codec_type`, resolving `level` to the
    /// codec's engine parameter.
    pub fn new(codec_type: CodecType, level: CompressionLevel) -> Result<Self, CodecError> {
        Ok(match codec_type {
            CodecType::NoCompression => Self::NoCompression(NoCompressionCodec::new(level)?),
            CodecType::Lz4 => Self::Lz4(Lz4Codec::new(level)?),
            CodecType::Snappy => Self::Snappy(SnappyCodec::new(level)?),
            CodecType::Zlib => Self::Zlib(ZlibCodec::new(level)?),
        })
    }

    /// Returns the algorithm implemented by this codec.
    #[must_use]
    pub const fn codec_type(&self) -> CodecType {
        match self {
            Self::NoCompression(_) => CodecType::NoCompression,
            Self::Lz4(_) => CodecType::Lz4,
            Self::Snappy(_) => CodecType::Snappy,
            Self::Zlib(_) => CodecType::Zlib,
        }
    }

    /// Reports whether [`Codec::uncompress`] requires a known uncompressed length.
    #[must_use]
    pub const fn needs_uncompressed_length(&self) -> bool {
        matches!(self, Self::Lz4(_))
    }

    /// Returns the largest uncompressed length the codec can produce.
    #[must_use]
    pub const fn max_uncompressed_length(&self) -> u64 {
        match self {
            Self::Lz4(_) => Lz4Codec::MAX_UNCOMPRESSED_LENGTH,
            Self::Snappy(_) => SnappyCodec::MAX_UNCOMPRESSED_LENGTH,
            Self::NoCompression(_) | Self::Zlib(_) => DEFAULT_MAX_UNCOMPRESSED_LENGTH,
        }
    }

    /// Compresses `data` into a newly allocated chain.
    ///
    /// Empty input always yields an empty chain without invoking the engine.
    #[cfg_attr(
        feature = "tracing",
        instrument(skip_all, fields(codec = %self.codec_type(), input_len = data.len()))
    )]
    pub fn compress(&self, data: &ByteChain) -> Result<ByteChain, CodecError> {
        if data.is_empty() {
            return Ok(ByteChain::new());
        }

        match self {
            Self::NoCompression(codec) => Ok(codec.compress(data)),
            Self::Lz4(codec) => codec.compress(data),
            Self::Snappy(codec) => codec.compress(data),
            Self::Zlib(codec) => Ok(codec.compress(data)),
        }
    }

    /// Decompresses `data` into a newly allocated chain.
    ///
    /// `uncompressed_length` is the caller's knowledge of the decoded size:
    /// `None` when unknown. A known length is validated against the codec's
    /// limits before any decoding and against the decoded size afterwards.
    ///
    /// # Errors
    ///
    /// - [`CodecError::UncompressedLengthRequired`] when the length is unknown
    ///   and the codec needs it.
    /// - [`CodecError::UncompressedLengthTooLarge`] when the length exceeds
    ///   [`Codec::max_uncompressed_length`].
    /// - [`CodecError::LengthMismatch`] when the input is empty and the length
    ///   is neither unknown nor zero, or when the decoded size differs.
    /// - Data errors ([`CodecError::Corrupt`], [`CodecError::TrailingData`],
    ///   [`CodecError::Engine`]) reported by the variant.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            skip_all,
            fields(codec = %self.codec_type(), input_len = data.len(), uncompressed_length = ?uncompressed_length)
        )
    )]
    pub fn uncompress(
        &self,
        data: &ByteChain,
        uncompressed_length: Option<u64>,
    ) -> Result<ByteChain, CodecError> {
        match uncompressed_length {
            None if self.needs_uncompressed_length() => {
                return Err(CodecError::UncompressedLengthRequired(self.codec_type()));
            }
            Some(length) if length > self.max_uncompressed_length() => {
                return Err(CodecError::UncompressedLengthTooLarge {
                    codec: self.codec_type(),
                    length,
                    max: self.max_uncompressed_length(),
                });
            }
            _ => {}
        }

        if data.is_empty() {
            return match uncompressed_length {
                None | Some(0) => Ok(ByteChain::new()),
                Some(declared) => Err(CodecError::length_mismatch(self.codec_type(), declared, 0)),
            };
        }

        match self {
            Self::NoCompression(codec) => codec.uncompress(data, uncompressed_length),
            Self::Lz4(codec) => {
                let length = uncompressed_length
                    .ok_or(CodecError::UncompressedLengthRequired(CodecType::Lz4))?;
                codec.uncompress(data, length)
            }
            Self::Snappy(codec) => codec.uncompress(data, uncompressed_length),
            Self::Zlib(codec) => codec.uncompress(data, uncompressed_length),
        }
    }
}
