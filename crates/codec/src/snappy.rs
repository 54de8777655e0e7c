//! Raw Snappy codec.
//!
//! A raw Snappy stream starts with the uncompressed length as a varint,
//! followed by a sequence of literal and copy elements. The encoder works on
//! independent 64 KiB fragments whose element streams are simply concatenated,
//! which lets compression pull its input through a [`ChainCursor`] fragment by
//! fragment instead of flattening the whole chain first.

use bytes::Buf;
use iobuf::{ByteChain, ChainCursor};
use snap::raw::{Decoder, Encoder, decompress_len, max_compress_len};

use crate::algorithm::CodecType;
use crate::error::CodecError;
use crate::level::CompressionLevel;

/// Size of the independently compressed input fragments.
const FRAGMENT_LENGTH: usize = 1 << 16;

/// Longest varint encoding of a 64-bit length.
const MAX_VARINT_LENGTH: usize = 10;

/// Raw Snappy codec. Snappy has a single compression level.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SnappyCodec {
    _private: (),
}

impl SnappyCodec {
    /// The stream preamble stores lengths in 32 bits.
    pub const MAX_UNCOMPRESSED_LENGTH: u64 = u32::MAX as u64;

    /// Accepts any abstract level, and `Precise(1)` as the only raw level.
    pub fn new(level: CompressionLevel) -> Result<Self, CodecError> {
        match level {
            CompressionLevel::Fastest
            | CompressionLevel::Default
            | CompressionLevel::Best
            | CompressionLevel::Precise(1) => Ok(Self { _private: () }),
            CompressionLevel::Precise(level) => Err(CodecError::InvalidLevel {
                codec: CodecType::Snappy,
                level,
            }),
        }
    }

    pub(crate) fn compress(self, data: &ByteChain) -> Result<ByteChain, CodecError> {
        let mut source = data.cursor();
        let total = source.remaining();
        if total as u64 > Self::MAX_UNCOMPRESSED_LENGTH {
            return Err(CodecError::UncompressedLengthTooLarge {
                codec: CodecType::Snappy,
                length: total as u64,
                max: Self::MAX_UNCOMPRESSED_LENGTH,
            });
        }

        let mut out = Vec::with_capacity(max_compress_len(total));
        write_varint(&mut out, total as u64);

        let mut encoder = Encoder::new();
        let mut block = vec![0u8; max_compress_len(FRAGMENT_LENGTH)];
        let mut gathered = Vec::new();
        while source.has_remaining() {
            let fragment_len = source.remaining().min(FRAGMENT_LENGTH);
            let in_place = source.chunk().len() >= fragment_len;
            let fragment = if in_place {
                &source.chunk()[..fragment_len]
            } else {
                gather(&mut source, fragment_len, &mut gathered);
                &gathered[..]
            };

            let written = encoder
                .compress(fragment, &mut block)
                .map_err(|e| CodecError::Engine {
                    codec: CodecType::Snappy,
                    operation: "compress",
                    message: e.to_string(),
                })?;
            // Each fragment is encoded as a complete stream; keep only its
            // elements, since the preamble for the whole input is already out.
            out.extend_from_slice(&block[varint_length(fragment_len as u64)..written]);

            if in_place {
                source.advance(fragment_len);
            }
        }

        Ok(ByteChain::from(out))
    }

    pub(crate) fn uncompress(
        self,
        data: &ByteChain,
        uncompressed_length: Option<u64>,
    ) -> Result<ByteChain, CodecError> {
        let actual = embedded_length(data.cursor())?;
        if let Some(declared) = uncompressed_length {
            if declared != actual as u64 {
                return Err(CodecError::length_mismatch(
                    CodecType::Snappy,
                    declared,
                    actual as u64,
                ));
            }
        }

        // The cursor is single pass, so the body is read through a fresh one.
        // Snappy decodes from one contiguous span; this is zero-copy when the
        // input chain holds a single segment.
        let mut source = data.cursor();
        let compressed = source.copy_to_bytes(source.remaining());

        let mut out = vec![0u8; actual];
        let produced = Decoder::new()
            .decompress(&compressed, &mut out)
            .map_err(|e| CodecError::corrupt(CodecType::Snappy, e))?;
        if produced != actual {
            return Err(CodecError::length_mismatch(
                CodecType::Snappy,
                actual as u64,
                produced as u64,
            ));
        }

        Ok(ByteChain::from(out))
    }
}

/// Reads the uncompressed length from the stream preamble.
fn embedded_length(mut source: ChainCursor<'_>) -> Result<usize, CodecError> {
    let mut preamble = [0u8; MAX_VARINT_LENGTH];
    let len = source.remaining().min(MAX_VARINT_LENGTH);
    source.copy_to_slice(&mut preamble[..len]);
    decompress_len(&preamble[..len]).map_err(|e| CodecError::corrupt(CodecType::Snappy, e))
}

/// Copies the next `len` bytes of `source` into `scratch`, across segments.
fn gather(source: &mut ChainCursor<'_>, len: usize, scratch: &mut Vec<u8>) {
    scratch.clear();
    scratch.resize(len, 0);
    source.copy_to_slice(scratch);
}

fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

fn varint_length(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}
