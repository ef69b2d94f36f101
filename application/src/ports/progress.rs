//! Reading progress port
//!
//! Defines the callbacks a presentation adapter receives while a reading is
//! streamed.

use arcana_domain::DivinationKind;

/// Callback for progress updates during a reading
///
/// Implementations live in the presentation layer (console, REPL, ...).
pub trait ReadingProgress: Send + Sync {
    /// Called once before the first chunk is requested.
    fn on_reading_start(&self, _kind: DivinationKind) {}

    /// Called for each text chunk, in arrival order.
    fn on_chunk(&self, chunk: &str);

    /// Called with the sentinel when the session fails.
    fn on_interrupted(&self, sentinel: &str);

    /// Called once when the stream is exhausted.
    fn on_reading_end(&self) {}
}

/// No-op progress for when nothing needs to be displayed
pub struct NoProgress;

impl ReadingProgress for NoProgress {
    fn on_chunk(&self, _chunk: &str) {}
    fn on_interrupted(&self, _sentinel: &str) {}
}
