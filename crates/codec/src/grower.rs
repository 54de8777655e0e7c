//! Output chain grown segment by segment while a streaming engine runs.
//!
//! Streaming engines write into whatever output window they are handed and
//! report how much they produced. [`OutputChain`] owns a list of fixed-capacity
//! segments plus a cursor into the tail segment. When the tail is full a new
//! segment is linked after it and the cursor moves there; bytes already written
//! are never moved or reallocated.

use iobuf::ByteChain;

/// Segments produced so far plus the write cursor into the last one.
#[derive(Debug)]
pub(crate) struct OutputChain {
    segments: Vec<Vec<u8>>,
    /// Unwritten bytes at the end of the last segment.
    available: usize,
}

impl OutputChain {
    /// Creates a chain whose first segment can hold `capacity` bytes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            segments: vec![vec![0u8; capacity]],
            available: capacity,
        }
    }

    /// Unwritten capacity left in the tail segment.
    pub(crate) const fn available(&self) -> usize {
        self.available
    }

    /// Links a new segment of `capacity` bytes after the tail and points the
    /// cursor at it. The tail must be full.
    pub(crate) fn grow(&mut self, capacity: usize) {
        assert_eq!(
            self.available, 0,
            "output segment grown while {} bytes were still available",
            self.available
        );
        #[cfg(feature = "tracing")]
        tracing::trace!(
            segment = self.segments.len(),
            capacity,
            "linking output segment"
        );
        self.segments.push(vec![0u8; capacity]);
        self.available = capacity;
    }

    /// The writable window at the end of the tail segment.
    pub(crate) fn spare_mut(&mut self) -> &mut [u8] {
        let available = self.available;
        match self.segments.last_mut() {
            Some(tail) => {
                let start = tail.len() - available;
                &mut tail[start..]
            }
            None => &mut [],
        }
    }

    /// Records that the engine wrote `written` bytes into [`Self::spare_mut`].
    pub(crate) fn commit(&mut self, written: usize) {
        assert!(
            written <= self.available,
            "engine reported {written} bytes written into a {} byte window",
            self.available
        );
        self.available -= written;
    }

    /// Number of linked segments, including a still-empty tail.
    #[cfg(test)]
    pub(crate) fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Trims the unused end of the tail and freezes the segments into a chain.
    pub(crate) fn finish(mut self) -> ByteChain {
        if let Some(tail) = self.segments.last_mut() {
            let written = tail.len() - self.available;
            tail.truncate(written);
        }
        ByteChain::from_segments(self.segments.into_iter().filter(|segment| !segment.is_empty()))
    }
}
