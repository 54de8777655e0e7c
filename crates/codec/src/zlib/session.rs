//! Call-scoped ownership of a streaming engine.

use std::ops::{Deref, DerefMut};

use flate2::{Compress, Decompress};

/// Running totals every streaming engine exposes.
pub(super) trait StreamEngine {
    fn total_in(&self) -> u64;
    fn total_out(&self) -> u64;
}

impl StreamEngine for Compress {
    fn total_in(&self) -> u64 {
        Compress::total_in(self)
    }

    fn total_out(&self) -> u64 {
        Compress::total_out(self)
    }
}

impl StreamEngine for Decompress {
    fn total_in(&self) -> u64 {
        Decompress::total_in(self)
    }

    fn total_out(&self) -> u64 {
        Decompress::total_out(self)
    }
}

/// Owns an engine for the duration of one `compress`/`uncompress` call.
///
/// The engine is released when the session drops, whichever way the call
/// exits. A session that drops before [`EngineSession::complete`] was called
/// discards whatever the engine still buffers; that is expected on error paths
/// and only logged.
pub(super) struct EngineSession<E: StreamEngine> {
    engine: E,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    operation: &'static str,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    completed: bool,
}

impl<E: StreamEngine> EngineSession<E> {
    pub(super) const fn new(engine: E, operation: &'static str) -> Self {
        Self {
            engine,
            operation,
            completed: false,
        }
    }

    /// Input consumed and output produced since the engine reported `before`
    /// as its totals.
    pub(super) fn progress_since(&self, before: (u64, u64)) -> (usize, usize) {
        (
            (self.engine.total_in() - before.0) as usize,
            (self.engine.total_out() - before.1) as usize,
        )
    }

    pub(super) fn totals(&self) -> (u64, u64) {
        (self.engine.total_in(), self.engine.total_out())
    }

    /// Marks the stream as fully processed.
    pub(super) fn complete(&mut self) {
        self.completed = true;
    }
}

impl<E: StreamEngine> Deref for EngineSession<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.engine
    }
}

impl<E: StreamEngine> DerefMut for EngineSession<E> {
    fn deref_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}

impl<E: StreamEngine> Drop for EngineSession<E> {
    fn drop(&mut self) {
        #[cfg(feature = "tracing")]
        if !self.completed {
            tracing::debug!(
                operation = self.operation,
                total_in = self.engine.total_in(),
                total_out = self.engine.total_out(),
                "releasing unfinished stream"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use flate2::{Compression, FlushCompress, Status};

    use super::*;

    #[test]
    fn session_reports_engine_progress() {
        let mut session = EngineSession::new(Compress::new(Compression::fast(), true), "deflate");
        assert!(!session.completed);
        assert_eq!(session.operation, "deflate");

        let before = session.totals();
        let mut out = vec![0u8; 256];
        let status = session
            .compress(b"session payload", &mut out, FlushCompress::Finish)
            .unwrap();
        assert_eq!(status, Status::StreamEnd);

        let (consumed, produced) = session.progress_since(before);
        assert_eq!(consumed, 15);
        assert!(produced > 0);
        session.complete();
        assert!(session.completed);
    }

    #[test]
    fn unfinished_session_drops_quietly() {
        let session = EngineSession::new(Decompress::new(true), "inflate");
        assert_eq!(session.totals(), (0, 0));
        drop(session);
    }
}
