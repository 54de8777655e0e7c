#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `codec` puts several compression algorithms behind one contract: a caller
//! picks a [`CodecType`] and a [`CompressionLevel`], obtains a [`Codec`] from
//! [`get_codec`], and then compresses or decompresses complete messages held in
//! [`iobuf::ByteChain`] values. Callers never need to know which engine sits
//! behind the codec, whether it can consume segmented input, or how it sizes
//! its output.
//!
//! # Design
//!
//! The crate currently provides four variants:
//!
//! - [`none`] passes data through unchanged.
//! - [`lz4`] emits bare LZ4 blocks via [`lz4_flex`](https://docs.rs/lz4_flex),
//!   with the high-compression mode served by [`lz4`](https://docs.rs/lz4).
//! - [`snappy`] emits raw Snappy via [`snap`](https://docs.rs/snap), pulling
//!   its input through an [`iobuf::ChainCursor`].
//! - [`zlib`] drives [`flate2`](https://docs.rs/flate2) step by step and grows
//!   a segmented output chain as the engine fills it.
//!
//! [`Codec`] applies the checks shared by every variant (empty input, length
//! hint limits) before dispatching.
//!
//! # Invariants
//!
//! - Codecs hold no mutable state; every call processes one whole message and
//!   a single [`Codec`] may be shared freely across threads.
//! - Compressing an empty chain yields an empty chain for every variant.
//! - Output never depends on how the input chain is segmented.
//! - Engine state is released when a call returns, including on error paths.
//!
//! # Errors
//!
//! Every fallible operation returns [`CodecError`]. [`CodecError::kind`]
//! separates caller contract violations ([`ErrorKind::InvalidArgument`]) from
//! problems with the data itself ([`ErrorKind::Runtime`]). Engine failures that
//! can only stem from a bug, such as an encoder rejecting a worst-case sized
//! buffer, panic instead of being reported.
//!
//! # Examples
//!
//! ```
//! use codec::{CodecType, CompressionLevel, get_codec};
//! use iobuf::ByteChain;
//!
//! # fn main() -> Result<(), codec::CodecError> {
//! let data = ByteChain::from(vec![b'A'; 10_000]);
//! let codec = get_codec(CodecType::Lz4, CompressionLevel::Default)?;
//!
//! let compressed = codec.compress(&data)?;
//! assert!(compressed.len() < data.len());
//!
//! let restored = codec.uncompress(&compressed, Some(data.len() as u64))?;
//! assert_eq!(restored, data);
//! # Ok(())
//! # }
//! ```
//!
//! # See also
//!
//! - [`iobuf`] for the segmented buffer chain these codecs consume and produce.

pub mod algorithm;
mod codec;
mod error;
mod grower;
mod level;
pub mod lz4;
pub mod none;
mod registry;
pub mod snappy;
pub mod zlib;

pub use crate::algorithm::{CodecType, CodecTypeParseError};
pub use crate::codec::{Codec, DEFAULT_MAX_UNCOMPRESSED_LENGTH};
pub use crate::error::{CodecError, ErrorKind};
pub use crate::level::{CompressionLevel, CompressionLevelParseError};
pub use crate::lz4::Lz4Codec;
pub use crate::none::NoCompressionCodec;
pub use crate::registry::{get_codec, get_codec_by_id};
pub use crate::snappy::SnappyCodec;
pub use crate::zlib::ZlibCodec;
