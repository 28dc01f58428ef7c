//! UI collaborator surface
//!
//! Rendering is not part of the core: the client drives whatever implements
//! [`ChatUi`]. The trait is the minimal surface the connection manager needs:
//! a transcript-append sink, a transcript-replace sink (for full snapshots),
//! an input enable/disable toggle, and a transient "thinking" indicator that
//! the manager clears the moment the next substantive message is rendered.
//!
//! Implementations must be cheap and non-blocking; they are called from the
//! client's receive loop.

use chatwire_core::QuestionEntry;

/// Which side of the conversation authored a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderKind {
    User,
    Assistant,
}

/// Surface the connection manager drives
pub trait ChatUi: Send + Sync {
    /// Append one entry to the transcript
    ///
    /// `text` may contain newlines; they separate visual lines.
    fn append(&self, text: &str, sender: SenderKind);

    /// Replace the entire transcript with an ordered snapshot
    fn replace_transcript(&self, entries: &[QuestionEntry]);

    /// Enable or disable the input affordances
    fn set_input_enabled(&self, enabled: bool);

    /// Show or clear the transient "thinking" indicator
    fn set_thinking(&self, active: bool);
}

/// UI that ignores everything
///
/// For consumers that observe the client purely through dispatched events.
pub struct NullUi;

impl ChatUi for NullUi {
    fn append(&self, _text: &str, _sender: SenderKind) {}
    fn replace_transcript(&self, _entries: &[QuestionEntry]) {}
    fn set_input_enabled(&self, _enabled: bool) {}
    fn set_thinking(&self, _active: bool) {}
}
