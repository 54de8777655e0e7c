//! Owned sequence of byte segments forming one logical buffer.

use std::fmt;
use std::iter::FusedIterator;
use std::slice;

use bytes::{Buf, Bytes};

use crate::cursor::ChainCursor;

/// Ordered chain of contiguous byte segments.
///
/// The logical content of a chain is the concatenation of its segments in
/// order. Segments may be empty; they contribute nothing to the logical
/// content and are skipped by [`ChainCursor`].
///
/// Cloning a chain is cheap: the segments are reference counted, so the clone
/// shares storage with the original while owning its own segment list.
#[derive(Clone, Default)]
pub struct ByteChain {
    segments: Vec<Bytes>,
}

impl ByteChain {
    /// Creates an empty chain with no segments.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Builds a chain from the provided segments, preserving their order.
    pub fn from_segments<I, B>(segments: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Links `segment` after the current tail.
    pub fn push(&mut self, segment: impl Into<Bytes>) {
        self.segments.push(segment.into());
    }

    /// Links every segment of `other` after the current tail.
    pub fn append(&mut self, other: Self) {
        self.segments.extend(other.segments);
    }

    /// Returns the logical length of the chain, i.e. the sum of all segment lengths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.iter().map(Bytes::len).sum()
    }

    /// Reports whether the chain holds no bytes. A chain made only of empty
    /// segments is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(Bytes::is_empty)
    }

    /// Returns the number of linked segments, including empty ones.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Reports whether the chain is made of more than one segment.
    #[must_use]
    pub fn is_chained(&self) -> bool {
        self.segments.len() > 1
    }

    /// Shortens the chain to `len` logical bytes, dropping trailing segments
    /// as required. Has no effect when `len` is at least [`Self::len`].
    pub fn truncate(&mut self, len: usize) {
        let mut kept = 0usize;
        let mut retained = self.segments.len();
        for (index, segment) in self.segments.iter_mut().enumerate() {
            if kept + segment.len() >= len {
                segment.truncate(len - kept);
                retained = index + 1;
                break;
            }
            kept += segment.len();
        }
        self.segments.truncate(retained);
    }

    /// Flattens the chain into a single contiguous segment in place.
    pub fn coalesce(&mut self) {
        if self.segments.len() > 1 {
            let flat = self.coalesced();
            self.segments.clear();
            self.segments.push(flat);
        }
    }

    /// Returns the logical content as one contiguous segment without touching
    /// `self`.
    ///
    /// Chains whose bytes live in a single segment are returned without
    /// copying; anything else is gathered into a fresh allocation.
    #[must_use]
    pub fn coalesced(&self) -> Bytes {
        let mut cursor = self.cursor();
        let len = cursor.remaining();
        cursor.copy_to_bytes(len)
    }

    /// Iterates over the contiguous segments in chain order.
    pub fn segments(&self) -> Segments<'_> {
        Segments {
            inner: self.segments.iter(),
        }
    }

    /// Returns a forward-only cursor positioned at the first byte of the chain.
    #[must_use]
    pub fn cursor(&self) -> ChainCursor<'_> {
        ChainCursor::new(&self.segments)
    }

    /// Copies the logical content into a new [`Vec`].
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        for segment in &self.segments {
            out.extend_from_slice(segment);
        }
        out
    }
}

impl fmt::Debug for ByteChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteChain")
            .field("len", &self.len())
            .field(
                "segments",
                &self.segments.iter().map(Bytes::len).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl PartialEq for ByteChain {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .segments()
                .flatten()
                .eq(other.segments().flatten())
    }
}

impl Eq for ByteChain {}

impl From<Bytes> for ByteChain {
    fn from(segment: Bytes) -> Self {
        Self {
            segments: vec![segment],
        }
    }
}

impl From<Vec<u8>> for ByteChain {
    fn from(segment: Vec<u8>) -> Self {
        Self::from(Bytes::from(segment))
    }
}

impl From<&'static [u8]> for ByteChain {
    fn from(segment: &'static [u8]) -> Self {
        Self::from(Bytes::from_static(segment))
    }
}

impl FromIterator<Bytes> for ByteChain {
    fn from_iter<I: IntoIterator<Item = Bytes>>(iter: I) -> Self {
        Self::from_segments(iter)
    }
}

/// Iterator over the contiguous segments of a [`ByteChain`].
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    inner: slice::Iter<'a, Bytes>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Bytes::as_ref)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Segments<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(Bytes::as_ref)
    }
}

impl ExactSizeIterator for Segments<'_> {}

impl FusedIterator for Segments<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_segments() -> ByteChain {
        ByteChain::from_segments([&b"abc"[..], &b""[..], &b"defgh"[..], &b"ij"[..]])
    }

    #[test]
    fn length_is_sum_of_segments() {
        let chain = three_segments();
        assert_eq!(chain.len(), 10);
        assert_eq!(chain.segment_count(), 4);
        assert!(chain.is_chained());
        assert!(!chain.is_empty());
    }

    #[test]
    fn chain_of_empty_segments_is_empty() {
        let chain = ByteChain::from_segments([Bytes::new(), Bytes::new()]);
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
        assert_eq!(chain, ByteChain::new());
    }

    #[test]
    fn push_and_append_link_after_tail() {
        let mut chain = ByteChain::from(b"ab".to_vec());
        chain.push(Bytes::from_static(b"cd"));
        chain.append(ByteChain::from_segments([&b"e"[..], &b"f"[..]]));
        assert_eq!(chain.to_vec(), b"abcdef");
        assert_eq!(chain.segment_count(), 4);
    }

    #[test]
    fn coalesce_flattens_in_place() {
        let mut chain = three_segments();
        chain.coalesce();
        assert_eq!(chain.segment_count(), 1);
        assert_eq!(chain.to_vec(), b"abcdefghij");
    }

    #[test]
    fn coalesced_leaves_original_untouched() {
        let chain = three_segments();
        let flat = chain.coalesced();
        assert_eq!(flat.as_ref(), b"abcdefghij");
        assert_eq!(chain.segment_count(), 4);
    }

    #[test]
    fn coalesced_single_segment_shares_storage() {
        let segment = Bytes::from(vec![7u8; 64]);
        let chain = ByteChain::from(segment.clone());
        let flat = chain.coalesced();
        assert_eq!(flat.as_ptr(), segment.as_ptr());
    }

    #[test]
    fn truncate_drops_trailing_segments() {
        let mut chain = three_segments();
        chain.truncate(4);
        assert_eq!(chain.to_vec(), b"abcd");
        assert_eq!(chain.len(), 4);

        let mut whole = three_segments();
        whole.truncate(100);
        assert_eq!(whole.len(), 10);
    }

    #[test]
    fn equality_ignores_segmentation() {
        let split = three_segments();
        let flat = ByteChain::from(b"abcdefghij".to_vec());
        assert_eq!(split, flat);
        assert_ne!(split, ByteChain::from(b"abcdefghiJ".to_vec()));
        assert_ne!(split, ByteChain::from(b"abcdefghi".to_vec()));
    }

    #[test]
    fn segments_iterate_in_order() {
        let chain = three_segments();
        let collected: Vec<&[u8]> = chain.segments().collect();
        assert_eq!(collected, vec![&b"abc"[..], &b""[..], &b"defgh"[..], &b"ij"[..]]);
        assert_eq!(chain.segments().len(), 4);
    }

    #[test]
    fn clone_shares_segment_storage() {
        let chain = ByteChain::from(vec![1u8; 32]);
        let copy = chain.clone();
        let original = chain.segments().next().expect("segment");
        let cloned = copy.segments().next().expect("segment");
        assert_eq!(original.as_ptr(), cloned.as_ptr());
    }
}
