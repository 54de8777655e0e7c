//! Shared enumeration describing the codecs supported by the workspace.

use core::fmt;
use core::str::FromStr;

use crate::error::CodecError;

/// Stable identifier of a compression algorithm.
///
/// The numeric discriminants are part of the public contract and are accepted
/// by [`CodecType::try_from`] and [`crate::get_codec_by_id`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[repr(u32)]
pub enum CodecType {
    /// Verbatim passthrough.
    NoCompression = 0,
    /// LZ4 block format; decompression needs the original length.
    Lz4 = 1,
    /// Raw Snappy; the uncompressed length travels in the stream preamble.
    Snappy = 2,
    /// zlib stream (RFC 1950) with a selectable compression level.
    Zlib = 3,
}

impl CodecType {
    /// Returns the canonical display name used for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoCompression => "none",
            Self::Lz4 => "lz4",
            Self::Snappy => "snappy",
            Self::Zlib => "zlib",
        }
    }

    /// Returns the numeric identifier of the codec.
    #[must_use]
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Returns every codec type built into the crate, ordered by identifier.
    #[must_use]
    pub const fn available() -> &'static [Self] {
        &[Self::NoCompression, Self::Lz4, Self::Snappy, Self::Zlib]
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for CodecType {
    type Error = CodecError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::available()
            .iter()
            .copied()
            .find(|codec| codec.id() == id)
            .ok_or(CodecError::UnsupportedType(id))
    }
}

/// Error returned when attempting to parse an unsupported codec name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CodecTypeParseError {
    input: String,
}

impl CodecTypeParseError {
    /// Creates a parse error capturing the original input.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// Returns the invalid input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for CodecTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported codec: {}", self.input)
    }
}

impl std::error::Error for CodecTypeParseError {}

impl FromStr for CodecType {
    type Err = CodecTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "no-compression" | "identity" => Ok(Self::NoCompression),
            "lz4" => Ok(Self::Lz4),
            "snappy" | "snap" => Ok(Self::Snappy),
            "zlib" | "deflate" => Ok(Self::Zlib),
            other => Err(CodecTypeParseError::new(other)),
        }
    }
}
