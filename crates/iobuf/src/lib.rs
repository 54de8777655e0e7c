#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `iobuf` provides [`ByteChain`], an ordered sequence of reference-counted
//! byte segments that together form one logical byte string. Chains are the
//! unit of exchange for the `codec` crate: callers hand a chain to a codec and
//! receive a freshly built chain back.
//!
//! # Design
//!
//! Segments are [`bytes::Bytes`] values, so duplicating a chain or slicing a
//! segment out of it never copies payload bytes. Forward reads go through
//! [`ChainCursor`], which implements [`bytes::Buf`] over the chain's native
//! segmentation and only gathers bytes when a caller asks for a contiguous span
//! that straddles a segment boundary.
//!
//! # Invariants
//!
//! - [`ByteChain::len`] always equals the sum of the segment lengths.
//! - Equality between chains compares logical content, never segmentation.
//! - A cursor never yields an empty chunk while bytes remain.
//!
//! # Examples
//!
//! ```
//! use bytes::Buf;
//! use iobuf::ByteChain;
//!
//! let chain = ByteChain::from_segments([&b"hello, "[..], &b"world"[..]]);
//! assert_eq!(chain.len(), 12);
//! assert!(chain.is_chained());
//!
//! let mut cursor = chain.cursor();
//! assert_eq!(cursor.chunk(), b"hello, ");
//! cursor.advance(7);
//! assert_eq!(cursor.copy_to_bytes(5).as_ref(), b"world");
//! ```

mod chain;
mod cursor;

pub use crate::chain::{ByteChain, Segments};
pub use crate::cursor::ChainCursor;
