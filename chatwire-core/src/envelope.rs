//! Wire envelope types for the chat protocol
//!
//! The protocol is a pair of flat JSON shapes exchanged as text frames over a
//! persistent channel:
//!
//! - **Outbound** (client to server): `{"message": <text>, "sender": <tag>}`.
//! - **Inbound** (server to client): `{"type": <discriminator>, ...}` where
//!   the discriminator selects one of a closed set of message kinds.
//!
//! # Inbound Message Kinds
//!
//! - `assistant.message`: a reply to render in the transcript
//! - `error.message`: an upstream failure, rendered identically to an
//!   assistant message (the distinction is semantic, not visual)
//! - `close.connection`: the server is ending the session; may carry a final
//!   closing text to render
//! - `question.list`: a full ordered snapshot of prior entries that replaces
//!   the visible transcript rather than appending to it
//!
//! Servers may attach extra fields (the reference backend always includes
//! `sender` and `timestamp`); unknown fields are ignored and the known
//! optional ones are preserved.

use serde::{Deserialize, Serialize};

/// Conventional sender tag for user-authored outbound messages
pub const SENDER_USER: &str = "user";

/// Sender tag the backend uses for assistant-authored messages
pub const SENDER_ASSISTANT: &str = "assistant";

/// Outbound envelope: free text plus a sender tag
///
/// # Examples
///
/// ```rust
/// use chatwire_core::{OutboundEnvelope, SENDER_USER};
///
/// let envelope = OutboundEnvelope::new("hi", SENDER_USER);
/// assert_eq!(envelope.message, "hi");
/// assert_eq!(envelope.sender, "user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEnvelope {
    /// The message text; newlines are carried verbatim
    pub message: String,
    /// Opaque sender tag, conventionally [`SENDER_USER`]
    pub sender: String,
}

impl OutboundEnvelope {
    /// Create a new outbound envelope
    pub fn new(message: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sender: sender.into(),
        }
    }
}

/// One entry of a `question.list` snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionEntry {
    pub message: String,
    pub sender: String,
}

/// Inbound message, classified by the `type` discriminator
///
/// This is a closed set. The codec never produces this enum for a `type`
/// outside the set; see [`crate::codec::Decoded::Unknown`] for how
/// unrecognized discriminators are reported instead of failing the decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InboundMessage {
    /// A reply from the assistant
    #[serde(rename = "assistant.message")]
    Assistant {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sender: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<String>,
    },

    /// An upstream error, rendered the same way as an assistant reply
    #[serde(rename = "error.message")]
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sender: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<String>,
    },

    /// The server is terminating the session
    ///
    /// The optional `message` is a server-supplied closing text to render as
    /// a final transcript entry.
    #[serde(rename = "close.connection")]
    CloseConnection {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sender: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<String>,
    },

    /// Full ordered snapshot of prior entries, replacing the transcript
    #[serde(rename = "question.list")]
    QuestionList { questions: Vec<QuestionEntry> },
}

impl InboundMessage {
    /// The wire discriminator for this message
    pub fn kind(&self) -> &'static str {
        match self {
            InboundMessage::Assistant { .. } => "assistant.message",
            InboundMessage::Error { .. } => "error.message",
            InboundMessage::CloseConnection { .. } => "close.connection",
            InboundMessage::QuestionList { .. } => "question.list",
        }
    }

    /// The renderable text carried by this message, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            InboundMessage::Assistant { message, .. } => Some(message),
            InboundMessage::Error { message, .. } => Some(message),
            InboundMessage::CloseConnection { message, .. } => message.as_deref(),
            InboundMessage::QuestionList { .. } => None,
        }
    }
}
