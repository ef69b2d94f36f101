//! Streaming events delivered to the consumer of a reading.

/// An event in a streamed reading.
///
/// A session yields any number of `Delta` events, then either ends silently
/// (success) or yields exactly one `Interrupted` event and ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A decoded text chunk, in arrival order.
    Delta(String),
    /// The session failed; carries the sentinel text shown in place of
    /// further output.
    Interrupted(String),
}

impl StreamEvent {
    /// Returns the text to append to the display, for either variant.
    pub fn text(&self) -> &str {
        match self {
            StreamEvent::Delta(s) | StreamEvent::Interrupted(s) => s,
        }
    }

    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Interrupted(_))
    }

    pub fn into_text(self) -> String {
        match self {
            StreamEvent::Delta(s) | StreamEvent::Interrupted(s) => s,
        }
    }
}
