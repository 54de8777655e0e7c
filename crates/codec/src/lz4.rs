//! LZ4 block codec.
//!
//! Output is a bare LZ4 block with no frame header, so the decoder has to be
//! told how many bytes to produce. Neither engine offers a segmented API, so
//! chained input is flattened into a private contiguous copy first.

use iobuf::ByteChain;
use lz4::block::CompressionMode;
use lz4_flex::block::{compress_into, decompress_into, get_maximum_output_size};

use crate::algorithm::CodecType;
use crate::error::CodecError;
use crate::level::CompressionLevel;

/// Level passed to the LZ4HC entry point (`LZ4HC_CLEVEL_DEFAULT`).
const HIGH_COMPRESSION_LEVEL: i32 = 9;

/// LZ4 block codec with a standard and a high-compression mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Lz4Codec {
    high_compression: bool,
}

impl Lz4Codec {
    /// The block decoder tracks sizes in a signed 32-bit integer and documents
    /// roughly 1.9 GB as the largest supported block; stay below that.
    pub const MAX_UNCOMPRESSED_LENGTH: u64 = (1.8 * (1u64 << 30) as f64) as u64;

    /// Resolves `Fastest`/`Default` to level 1 (standard) and `Best` to level 2
    /// (high compression). Raw levels must be 1 or 2.
    pub fn new(level: CompressionLevel) -> Result<Self, CodecError> {
        let level = match level {
            CompressionLevel::Fastest | CompressionLevel::Default => 1,
            CompressionLevel::Best => 2,
            CompressionLevel::Precise(level) => level,
        };
        if !(1..=2).contains(&level) {
            return Err(CodecError::InvalidLevel {
                codec: CodecType::Lz4,
                level,
            });
        }
        Ok(Self {
            high_compression: level > 1,
        })
    }

    /// Reports whether the codec uses the LZ4HC entry point.
    #[must_use]
    pub const fn is_high_compression(&self) -> bool {
        self.high_compression
    }

    pub(crate) fn compress(self, data: &ByteChain) -> Result<ByteChain, CodecError> {
        check_input_length(data.len() as u64)?;
        let input = data.coalesced();
        let mut out = vec![0u8; get_maximum_output_size(input.len())];

        let written = if self.high_compression {
            lz4::block::compress_to_buffer(
                &input,
                Some(CompressionMode::HIGHCOMPRESSION(HIGH_COMPRESSION_LEVEL)),
                false,
                &mut out,
            )
            .unwrap_or_else(|e| panic!("LZ4HC rejected a worst-case sized output buffer: {e}"))
        } else {
            compress_into(&input, &mut out)
                .unwrap_or_else(|e| panic!("LZ4 rejected a worst-case sized output buffer: {e}"))
        };
        assert!(
            written <= out.len(),
            "LZ4 reported {written} bytes written into a {} byte buffer",
            out.len()
        );

        out.truncate(written);
        Ok(ByteChain::from(out))
    }

    pub(crate) fn uncompress(
        self,
        data: &ByteChain,
        uncompressed_length: u64,
    ) -> Result<ByteChain, CodecError> {
        let input = data.coalesced();
        // Bounded by MAX_UNCOMPRESSED_LENGTH, which fits in usize on every
        // supported target.
        let expected = uncompressed_length as usize;
        let mut out = vec![0u8; expected];

        let produced = decompress_into(&input, &mut out)
            .map_err(|e| CodecError::corrupt(CodecType::Lz4, e))?;
        if produced != expected {
            return Err(CodecError::length_mismatch(
                CodecType::Lz4,
                uncompressed_length,
                produced as u64,
            ));
        }

        Ok(ByteChain::from(out))
    }
}

/// Inputs above the decodable maximum would compress into blocks no hint can
/// unlock, and LZ4HC refuses them outright.
fn check_input_length(length: u64) -> Result<(), CodecError> {
    if length > Lz4Codec::MAX_UNCOMPRESSED_LENGTH {
        return Err(CodecError::UncompressedLengthTooLarge {
            codec: CodecType::Lz4,
            length,
            max: Lz4Codec::MAX_UNCOMPRESSED_LENGTH,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sample() -> Vec<u8> {
        b"lz4 block payload, lz4 block payload, lz4 block payload".repeat(40)
    }

    #[test]
    fn abstract_levels_select_mode() {
        assert!(!Lz4Codec::new(CompressionLevel::Fastest).unwrap().is_high_compression());
        assert!(!Lz4Codec::new(CompressionLevel::Default).unwrap().is_high_compression());
        assert!(Lz4Codec::new(CompressionLevel::Best).unwrap().is_high_compression());
        assert!(Lz4Codec::new(CompressionLevel::Precise(2)).unwrap().is_high_compression());
    }

    #[test]
    fn raw_levels_outside_one_and_two_are_rejected() {
        for level in [0, 3, -1] {
            let err = Lz4Codec::new(CompressionLevel::Precise(level)).expect_err("invalid level");
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
    }

    #[test]
    fn both_modes_round_trip() {
        let payload = sample();
        for level in [CompressionLevel::Default, CompressionLevel::Best] {
            let codec = Lz4Codec::new(level).unwrap();
            let compressed = codec.compress(&ByteChain::from(payload.clone())).expect("compress");
            assert!(compressed.len() < payload.len());
            let restored = codec
                .uncompress(&compressed, payload.len() as u64)
                .expect("decompress");
            assert_eq!(restored.to_vec(), payload);
        }
    }

    #[test]
    fn output_is_a_standard_block() {
        let payload = sample();
        for level in [CompressionLevel::Default, CompressionLevel::Best] {
            let codec = Lz4Codec::new(level).unwrap();
            let compressed = codec
                .compress(&ByteChain::from(payload.clone()))
                .expect("compress")
                .to_vec();
            let decoded = lz4_flex::block::decompress(&compressed, payload.len()).expect("decode");
            assert_eq!(decoded, payload);
        }
    }

    #[test]
    fn chained_input_matches_contiguous_input() {
        let payload = sample();
        let (head, tail) = payload.split_at(100);
        let chained = ByteChain::from_segments([head.to_vec(), tail.to_vec()]);
        let codec = Lz4Codec::new(CompressionLevel::Default).unwrap();
        assert_eq!(
            codec.compress(&chained).expect("compress chained"),
            codec.compress(&ByteChain::from(payload)).expect("compress flat")
        );
    }

    #[test]
    fn input_above_maximum_is_rejected() {
        assert!(check_input_length(Lz4Codec::MAX_UNCOMPRESSED_LENGTH).is_ok());
        let err = check_input_length(Lz4Codec::MAX_UNCOMPRESSED_LENGTH + 1)
            .expect_err("input too large");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(matches!(
            err,
            CodecError::UncompressedLengthTooLarge {
                codec: CodecType::Lz4,
                ..
            }
        ));
    }

    #[test]
    fn truncated_block_is_rejected() {
        let payload = sample();
        let codec = Lz4Codec::new(CompressionLevel::Default).unwrap();
        let mut compressed = codec.compress(&ByteChain::from(payload.clone())).expect("compress");
        compressed.truncate(compressed.len() - 4);
        let err = codec
            .uncompress(&compressed, payload.len() as u64)
            .expect_err("truncated block");
        assert_eq!(err.kind(), ErrorKind::Runtime);
    }

    #[test]
    fn short_declared_length_is_rejected() {
        let payload = sample();
        let codec = Lz4Codec::new(CompressionLevel::Default).unwrap();
        let compressed = codec.compress(&ByteChain::from(payload.clone())).expect("compress");
        let err = codec
            .uncompress(&compressed, payload.len() as u64 - 1)
            .expect_err("declared length too small");
        assert_eq!(err.kind(), ErrorKind::Runtime);
    }

    #[test]
    fn long_declared_length_is_rejected() {
        let payload = sample();
        let codec = Lz4Codec::new(CompressionLevel::Default).unwrap();
        let compressed = codec.compress(&ByteChain::from(payload.clone())).expect("compress");
        let err = codec
            .uncompress(&compressed, payload.len() as u64 + 1)
            .expect_err("declared length too large");
        assert_eq!(err.kind(), ErrorKind::Runtime);
    }
}
