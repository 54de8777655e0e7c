//! Lookup of built-in codecs by type or numeric identifier.

use crate::algorithm::CodecType;
use crate::codec::Codec;
use crate::error::CodecError;
use crate::level::CompressionLevel;

/// Returns a codec of the requested type configured for `level`.
///
/// # Errors
///
/// Returns [`CodecError::InvalidLevel`] when the codec rejects the level.
///
/// # Examples
///
/// ```
/// use codec::{CodecType, CompressionLevel, get_codec};
///
/// let codec = get_codec(CodecType::Zlib, CompressionLevel::Best).unwrap();
/// assert_eq!(codec.codec_type(), CodecType::Zlib);
/// ```
pub fn get_codec(codec_type: CodecType, level: CompressionLevel) -> Result<Codec, CodecError> {
    let codec = Codec::new(codec_type, level)?;
    debug_assert_eq!(codec.codec_type(), codec_type);
    #[cfg(feature = "tracing")]
    tracing::debug!(codec = %codec_type, %level, "codec created");
    Ok(codec)
}

/// Returns a codec for a numeric identifier received from outside the process.
///
/// # Errors
///
/// Returns [`CodecError::UnsupportedType`] for identifiers that do not name a
/// built-in codec, and [`CodecError::InvalidLevel`] as for [`get_codec`].
pub fn get_codec_by_id(id: u32, level: CompressionLevel) -> Result<Codec, CodecError> {
    get_codec(CodecType::try_from(id)?, level)
}
