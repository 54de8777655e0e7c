//! # Overview
//!
//! Streaming zlib codec. Unlike the block codecs, deflate cannot be handed a
//! single output buffer of known size up front, so both directions drive the
//! engine step by step and grow the output chain on demand, linking a new
//! segment whenever the engine fills the current one.
//!
//! # Buffer sizing
//!
//! The first output segment is sized to the expected output when that is
//! known and at most [`MAX_SINGLE_STEP_LENGTH`]: the deflate bound of the
//! input when compressing, the caller's declared length when decompressing.
//! Otherwise, and for every later segment, [`DEFAULT_BUFFER_LENGTH`] is used.
//!
//! # Examples
//!
//! ```
//! use codec::{CodecType, CompressionLevel, get_codec};
//! use iobuf::ByteChain;
//!
//! let codec = get_codec(CodecType::Zlib, CompressionLevel::Best).unwrap();
//! let input = ByteChain::from_segments([&b"split "[..], &b"payload"[..]]);
//! let compressed = codec.compress(&input).unwrap();
//! let restored = codec.uncompress(&compressed, None).unwrap();
//! assert_eq!(restored, input);
//! ```

mod session;

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};
use iobuf::ByteChain;

use crate::algorithm::CodecType;
use crate::error::CodecError;
use crate::grower::OutputChain;
use crate::level::CompressionLevel;

use self::session::EngineSession;

/// Largest first output segment allocated in one go (64 MiB).
pub const MAX_SINGLE_STEP_LENGTH: usize = 64 << 20;

/// Capacity of every segment linked after the first one (4 MiB).
pub const DEFAULT_BUFFER_LENGTH: usize = 4 << 20;

/// zlib's `Z_DEFAULT_COMPRESSION` sentinel.
pub const DEFAULT_LEVEL: i32 = -1;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct BufferLengths {
    max_single_step: usize,
    default: usize,
}

impl BufferLengths {
    const STANDARD: Self = Self {
        max_single_step: MAX_SINGLE_STEP_LENGTH,
        default: DEFAULT_BUFFER_LENGTH,
    };

    /// First segment capacity for an output expected to be `expected` bytes long.
    fn first(self, expected: Option<u64>) -> usize {
        match expected {
            Some(len) if len <= self.max_single_step as u64 => len as usize,
            _ => self.default,
        }
    }
}

/// zlib stream codec with a configurable compression level.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ZlibCodec {
    level: i32,
    buffers: BufferLengths,
}

impl ZlibCodec {
    /// Resolves `Fastest` to 1, `Default` to [`DEFAULT_LEVEL`] and `Best` to 9.
    /// Raw levels must be in `0..=9` or equal [`DEFAULT_LEVEL`].
    pub fn new(level: CompressionLevel) -> Result<Self, CodecError> {
        let level = match level {
            CompressionLevel::Fastest => 1,
            CompressionLevel::Default => DEFAULT_LEVEL,
            CompressionLevel::Best => 9,
            CompressionLevel::Precise(level) => level,
        };
        if level != DEFAULT_LEVEL && !(0..=9).contains(&level) {
            return Err(CodecError::InvalidLevel {
                codec: CodecType::Zlib,
                level,
            });
        }
        Ok(Self {
            level,
            buffers: BufferLengths::STANDARD,
        })
    }

    /// Returns the resolved zlib level, [`DEFAULT_LEVEL`] meaning the engine default.
    #[must_use]
    pub const fn level(&self) -> i32 {
        self.level
    }

    #[cfg(test)]
    const fn with_buffer_lengths(mut self, max_single_step: usize, default: usize) -> Self {
        self.buffers = BufferLengths {
            max_single_step,
            default,
        };
        self
    }

    fn compression(self) -> Compression {
        if self.level == DEFAULT_LEVEL {
            Compression::default()
        } else {
            Compression::new(self.level as u32)
        }
    }

    pub(crate) fn compress(self, data: &ByteChain) -> ByteChain {
        let mut stream = EngineSession::new(Compress::new(self.compression(), true), "deflate");
        let bound = deflate_bound(data.len() as u64);
        let mut out = OutputChain::with_capacity(self.buffers.first(Some(bound)));

        for segment in data.segments() {
            let mut input = segment;
            while !input.is_empty() {
                if out.available() == 0 {
                    out.grow(self.buffers.default);
                }
                let (consumed, status) = deflate(&mut stream, input, &mut out, FlushCompress::None);
                assert_eq!(status, Status::Ok, "deflate stalled with input and output space");
                input = &input[consumed..];
            }
        }

        loop {
            if out.available() == 0 {
                out.grow(self.buffers.default);
            }
            match deflate(&mut stream, &[], &mut out, FlushCompress::Finish) {
                (_, Status::Ok) => {}
                (_, Status::StreamEnd) => break,
                (_, Status::BufError) => panic!("deflate stalled while finishing the stream"),
            }
        }

        stream.complete();
        out.finish()
    }

    pub(crate) fn uncompress(
        self,
        data: &ByteChain,
        uncompressed_length: Option<u64>,
    ) -> Result<ByteChain, CodecError> {
        let mut stream = EngineSession::new(Decompress::new(true), "inflate");
        let mut out = OutputChain::with_capacity(self.buffers.first(uncompressed_length));
        let mut stream_end = false;

        for segment in data.segments() {
            let mut input = segment;
            while !input.is_empty() {
                if stream_end {
                    return Err(CodecError::TrailingData(CodecType::Zlib));
                }
                let (consumed, ended) = self.inflate(&mut stream, input, &mut out)?;
                stream_end = ended;
                input = &input[consumed..];
            }
        }

        // Input is exhausted; let the engine flush what it still holds.
        while !stream_end {
            let (_, ended) = self.inflate(&mut stream, &[], &mut out)?;
            stream_end = ended;
        }

        let (_, total_out) = stream.totals();
        let output = out.finish();
        if let Some(declared) = uncompressed_length {
            if declared != total_out {
                return Err(CodecError::length_mismatch(
                    CodecType::Zlib,
                    declared,
                    total_out,
                ));
            }
        }

        stream.complete();
        Ok(output)
    }

    /// Runs one inflate step, growing the output first if the tail is full.
    /// Returns the number of input bytes consumed and whether the stream ended.
    fn inflate(
        self,
        stream: &mut EngineSession<Decompress>,
        input: &[u8],
        out: &mut OutputChain,
    ) -> Result<(usize, bool), CodecError> {
        if out.available() == 0 {
            out.grow(self.buffers.default);
        }

        let before = stream.totals();
        let result = stream.decompress(input, out.spare_mut(), FlushDecompress::None);
        let (consumed, produced) = stream.progress_since(before);
        out.commit(produced);

        match result {
            Ok(Status::Ok) => Ok((consumed, false)),
            Ok(Status::StreamEnd) => Ok((consumed, true)),
            Ok(Status::BufError) => Err(CodecError::Engine {
                codec: CodecType::Zlib,
                operation: "inflate",
                message: "buffer error: compressed stream is truncated".to_string(),
            }),
            Err(e) => Err(CodecError::Engine {
                codec: CodecType::Zlib,
                operation: "inflate",
                message: e.to_string(),
            }),
        }
    }
}

/// Runs one deflate step into the tail of `out`, returning the number of
/// input bytes consumed and the engine status.
fn deflate(
    stream: &mut EngineSession<Compress>,
    input: &[u8],
    out: &mut OutputChain,
    flush: FlushCompress,
) -> (usize, Status) {
    let before = stream.totals();
    let status = stream
        .compress(input, out.spare_mut(), flush)
        .unwrap_or_else(|e| panic!("deflate rejected a well-formed call: {e}"));
    let (consumed, produced) = stream.progress_since(before);
    out.commit(produced);
    (consumed, status)
}

/// Upper bound of the zlib-wrapped deflate output for `len` input bytes with
/// the default window and memory settings (zlib's `deflateBound`).
pub fn deflate_bound(len: u64) -> u64 {
    len + (len >> 12) + (len >> 14) + (len >> 25) + 13
}
