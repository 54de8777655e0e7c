//! Abstract compression levels resolved by each codec at construction.

use core::fmt;
use core::str::FromStr;

/// Speed/ratio selector handed to [`crate::get_codec`].
///
/// The abstract variants are mapped by every codec to its own engine
/// parameter. [`CompressionLevel::Precise`] carries a raw, codec-specific
/// number that the codec validates against its supported range.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CompressionLevel {
    /// Favour speed over compression ratio.
    Fastest,
    /// The codec's balanced default.
    #[default]
    Default,
    /// Favour the best possible compression ratio.
    Best,
    /// An explicit engine level, e.g. `0..=9` for zlib.
    Precise(i32),
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fastest => f.write_str("fastest"),
            Self::Default => f.write_str("default"),
            Self::Best => f.write_str("best"),
            Self::Precise(level) => write!(f, "{level}"),
        }
    }
}

/// Error returned when a level string is neither a keyword nor an integer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompressionLevelParseError {
    input: String,
}

impl CompressionLevelParseError {
    /// Returns the invalid input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for CompressionLevelParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid compression level: {}", self.input)
    }
}

impl std::error::Error for CompressionLevelParseError {}

impl FromStr for CompressionLevel {
    type Err = CompressionLevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "fastest" | "fast" => Ok(Self::Fastest),
            "default" => Ok(Self::Default),
            "best" => Ok(Self::Best),
            _ => trimmed
                .parse::<i32>()
                .map(Self::Precise)
                .map_err(|_| CompressionLevelParseError {
                    input: trimmed.to_string(),
                }),
        }
    }
}
