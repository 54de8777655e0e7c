//! Error type shared by every codec.

use std::io;

use thiserror::Error;

use crate::algorithm::CodecType;

/// Broad classification of a [`CodecError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// The caller broke the codec contract: bad level, bad codec type, or a
    /// length hint the codec cannot accept. Fix the calling code.
    InvalidArgument,
    /// The data itself is at fault: corrupt or truncated streams, trailing
    /// garbage, or a length hint that disagrees with the real payload.
    Runtime,
}

/// Errors surfaced by codec construction, compression and decompression.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The requested level is outside the codec's supported range.
    #[error("{codec}: invalid level {level}")]
    InvalidLevel {
        /// Codec that rejected the level.
        codec: CodecType,
        /// Raw level after abstract levels were resolved.
        level: i32,
    },

    /// The numeric codec identifier does not name a built-in codec.
    #[error("compression type {0} not supported")]
    UnsupportedType(u32),

    /// The codec cannot decompress without being told the original length.
    #[error("{0}: uncompressed length required")]
    UncompressedLengthRequired(CodecType),

    /// The declared length exceeds what the codec's engine can represent.
    #[error("{codec}: uncompressed length {length} exceeds maximum {max}")]
    UncompressedLengthTooLarge {
        /// Codec whose limit was exceeded.
        codec: CodecType,
        /// Length declared by the caller.
        length: u64,
        /// Largest length the codec accepts.
        max: u64,
    },

    /// The declared length disagrees with the length actually decoded.
    #[error("{codec}: invalid uncompressed length: declared {declared}, actual {actual}")]
    LengthMismatch {
        /// Codec that detected the mismatch.
        codec: CodecType,
        /// Length declared by the caller.
        declared: u64,
        /// Length found in, or produced from, the input.
        actual: u64,
    },

    /// The compressed input is malformed or truncated.
    #[error("{codec}: corrupt input: {reason}")]
    Corrupt {
        /// Codec that rejected the input.
        codec: CodecType,
        /// Engine-specific description of the failure.
        reason: String,
    },

    /// Bytes follow the end of a complete compressed stream.
    #[error("{0}: junk after end of data")]
    TrailingData(CodecType),

    /// The engine reported an error while processing the stream.
    #[error("{codec}: {operation} error: {message}")]
    Engine {
        /// Codec whose engine failed.
        codec: CodecType,
        /// Engine entry point that failed.
        operation: &'static str,
        /// Message reported by the engine.
        message: String,
    },
}

impl CodecError {
    /// Returns whether the error is a contract violation or a data failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidLevel { .. }
            | Self::UnsupportedType(_)
            | Self::UncompressedLengthRequired(_)
            | Self::UncompressedLengthTooLarge { .. } => ErrorKind::InvalidArgument,
            Self::LengthMismatch { .. }
            | Self::Corrupt { .. }
            | Self::TrailingData(_)
            | Self::Engine { .. } => ErrorKind::Runtime,
        }
    }

    pub(crate) fn corrupt(codec: CodecType, reason: impl ToString) -> Self {
        Self::Corrupt {
            codec,
            reason: reason.to_string(),
        }
    }

    pub(crate) const fn length_mismatch(codec: CodecType, declared: u64, actual: u64) -> Self {
        Self::LengthMismatch {
            codec,
            declared,
            actual,
        }
    }
}

impl From<CodecError> for io::Error {
    fn from(e: CodecError) -> Self {
        let kind = match e.kind() {
            ErrorKind::InvalidArgument => io::ErrorKind::InvalidInput,
            ErrorKind::Runtime => io::ErrorKind::InvalidData,
        };
        Self::new(kind, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_violations_are_invalid_arguments() {
        let errors = [
            CodecError::InvalidLevel {
                codec: CodecType::Lz4,
                level: 3,
            },
            CodecError::UnsupportedType(9),
            CodecError::UncompressedLengthRequired(CodecType::Lz4),
            CodecError::UncompressedLengthTooLarge {
                codec: CodecType::Snappy,
                length: u64::MAX,
                max: u64::from(u32::MAX),
            },
        ];
        for err in errors {
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{err}");
        }
    }

    #[test]
    fn data_failures_are_runtime_errors() {
        let errors = [
            CodecError::length_mismatch(CodecType::Zlib, 5, 0),
            CodecError::corrupt(CodecType::Snappy, "bad varint"),
            CodecError::TrailingData(CodecType::Zlib),
            CodecError::Engine {
                codec: CodecType::Zlib,
                operation: "inflate",
                message: "invalid stored block lengths".into(),
            },
        ];
        for err in errors {
            assert_eq!(err.kind(), ErrorKind::Runtime, "{err}");
        }
    }

    #[test]
    fn io_error_conversion_preserves_classification() {
        let invalid: io::Error = CodecError::UncompressedLengthRequired(CodecType::Lz4).into();
        assert_eq!(invalid.kind(), io::ErrorKind::InvalidInput);

        let runtime: io::Error = CodecError::TrailingData(CodecType::Zlib).into();
        assert_eq!(runtime.kind(), io::ErrorKind::InvalidData);
        assert_eq!(runtime.to_string(), "zlib: junk after end of data");
    }

    #[test]
    fn messages_name_the_codec() {
        let err = CodecError::InvalidLevel {
            codec: CodecType::NoCompression,
            level: 1,
        };
        assert_eq!(err.to_string(), "none: invalid level 1");
    }
}
