//! Forward-only pull cursor over the segments of a [`ByteChain`](crate::ByteChain).

use std::io;

use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Single-pass reader over a chain's segments.
///
/// The cursor exposes the three operations pull-style consumers expect,
/// through the [`Buf`] trait:
///
/// - [`Buf::remaining`] reports how many bytes are still available;
/// - [`Buf::chunk`] peeks the next contiguous span without copying;
/// - [`Buf::advance`] skips `n` bytes, crossing segment boundaries as needed.
///
/// A cursor cannot be rewound. Consumers that need two passes over the same
/// chain create two cursors.
#[derive(Clone, Debug)]
pub struct ChainCursor<'a> {
    segments: &'a [Bytes],
    index: usize,
    offset: usize,
    remaining: usize,
}

impl<'a> ChainCursor<'a> {
    pub(crate) fn new(segments: &'a [Bytes]) -> Self {
        let remaining = segments.iter().map(Bytes::len).sum();
        let mut cursor = Self {
            segments,
            index: 0,
            offset: 0,
            remaining,
        };
        cursor.skip_exhausted();
        cursor
    }

    /// Moves past segments that have been fully consumed or are empty so that
    /// `chunk` never reports an empty span while bytes remain.
    fn skip_exhausted(&mut self) {
        while let Some(segment) = self.segments.get(self.index) {
            if self.offset < segment.len() {
                break;
            }
            self.index += 1;
            self.offset = 0;
        }
    }

    fn current(&self) -> Option<&'a Bytes> {
        self.segments.get(self.index)
    }
}

impl Buf for ChainCursor<'_> {
    fn remaining(&self) -> usize {
        self.remaining
    }

    fn chunk(&self) -> &[u8] {
        self.current()
            .map_or(&[][..], |segment| &segment[self.offset..])
    }

    fn advance(&mut self, mut cnt: usize) {
        assert!(
            cnt <= self.remaining,
            "cannot advance past end of chain: {cnt} > {}",
            self.remaining
        );
        self.remaining -= cnt;
        while cnt > 0 {
            let Some(segment) = self.current() else {
                break;
            };
            let step = cnt.min(segment.len() - self.offset);
            self.offset += step;
            cnt -= step;
            self.skip_exhausted();
        }
    }

    fn copy_to_bytes(&mut self, len: usize) -> Bytes {
        assert!(
            len <= self.remaining,
            "cannot copy {len} bytes from a cursor holding {}",
            self.remaining
        );
        if let Some(segment) = self.current() {
            if segment.len() - self.offset >= len {
                let out = segment.slice(self.offset..self.offset + len);
                self.advance(len);
                return out;
            }
        }

        let mut out = BytesMut::with_capacity(len);
        out.put((&mut *self).take(len));
        out.freeze()
    }
}

impl io::Read for ChainCursor<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len().min(self.chunk().len());
        buf[..len].copy_from_slice(&self.chunk()[..len]);
        self.advance(len);
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use crate::ByteChain;
    use bytes::Buf;
    use proptest::prelude::*;
    use std::io::Read;

    fn split_chain() -> ByteChain {
        ByteChain::from_segments([&b""[..], &b"abc"[..], &b""[..], &b"de"[..], &b"fghij"[..]])
    }

    #[test]
    fn chunk_skips_leading_empty_segments() {
        let chain = split_chain();
        let cursor = chain.cursor();
        assert_eq!(cursor.remaining(), 10);
        assert_eq!(cursor.chunk(), b"abc");
    }

    #[test]
    fn advance_crosses_segment_boundaries() {
        let chain = split_chain();
        let mut cursor = chain.cursor();
        cursor.advance(4);
        assert_eq!(cursor.remaining(), 6);
        assert_eq!(cursor.chunk(), b"e");
        cursor.advance(1);
        assert_eq!(cursor.chunk(), b"fghij");
        cursor.advance(5);
        assert_eq!(cursor.remaining(), 0);
        assert!(cursor.chunk().is_empty());
    }

    #[test]
    #[should_panic(expected = "cannot advance past end of chain")]
    fn advance_past_end_panics() {
        let chain = split_chain();
        let mut cursor = chain.cursor();
        cursor.advance(11);
    }

    #[test]
    fn copy_to_bytes_within_segment_is_zero_copy() {
        let chain = split_chain();
        let mut cursor = chain.cursor();
        cursor.advance(5);
        let peeked = cursor.chunk().as_ptr();
        let bytes = cursor.copy_to_bytes(3);
        assert_eq!(bytes.as_ref(), b"fgh");
        assert_eq!(bytes.as_ptr(), peeked);
        assert_eq!(cursor.remaining(), 2);
    }

    #[test]
    fn copy_to_bytes_gathers_across_segments() {
        let chain = split_chain();
        let mut cursor = chain.cursor();
        cursor.advance(1);
        let bytes = cursor.copy_to_bytes(7);
        assert_eq!(bytes.as_ref(), b"bcdefgh");
        assert_eq!(cursor.chunk(), b"ij");
    }

    #[test]
    fn independent_cursors_over_same_chain() {
        let chain = split_chain();
        let mut first = chain.cursor();
        first.advance(8);
        let second = chain.cursor();
        assert_eq!(second.remaining(), 10);
        assert_eq!(first.remaining(), 2);
    }

    #[test]
    fn read_drains_whole_chain() {
        let chain = split_chain();
        let mut out = Vec::new();
        chain.cursor().read_to_end(&mut out).expect("read chain");
        assert_eq!(out, b"abcdefghij");
    }

    #[test]
    fn empty_chain_cursor() {
        let chain = ByteChain::new();
        let mut cursor = chain.cursor();
        assert_eq!(cursor.remaining(), 0);
        assert!(cursor.chunk().is_empty());
        assert!(cursor.copy_to_bytes(0).is_empty());
    }

    proptest! {
        #[test]
        fn cursor_reassembles_chain(
            parts in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 0..12),
            step in 1usize..9,
        ) {
            let expected: Vec<u8> = parts.concat();
            let chain = ByteChain::from_segments(parts);
            let mut cursor = chain.cursor();
            let mut gathered = Vec::new();
            while cursor.has_remaining() {
                let chunk = cursor.chunk();
                prop_assert!(!chunk.is_empty());
                let take = step.min(chunk.len());
                gathered.extend_from_slice(&chunk[..take]);
                cursor.advance(take);
            }
            prop_assert_eq!(gathered, expected);
        }
    }
}
