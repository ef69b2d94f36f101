//! The text a UI shows for the current reading.

use super::event::StreamEvent;

/// Monotonically growing text of one reading.
///
/// Reset when a new session starts. Once an [`StreamEvent::Interrupted`] has
/// been applied the text is frozen: the sentinel is always the last thing
/// shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultText {
    text: String,
    interrupted: bool,
}

impl ResultText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the text for a new session.
    pub fn reset(&mut self) {
        self.text.clear();
        self.interrupted = false;
    }

    /// Append an event. Returns false if the event was ignored because the
    /// session already ended with a sentinel.
    pub fn apply(&mut self, event: &StreamEvent) -> bool {
        if self.interrupted {
            return false;
        }
        self.text.push_str(event.text());
        self.interrupted = event.is_terminal();
        true
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }
}

impl std::fmt::Display for ResultText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
