//! Codec for chat envelope serialization and classification
//!
//! # Why a Codec Module?
//!
//! Serde handles the raw JSON; this module adds the protocol rules on top:
//!
//! - **Classification**: inbound frames are sorted by their `type`
//!   discriminator into the closed [`InboundMessage`] set.
//! - **Forward tolerance**: a well-formed frame with an unrecognized `type`
//!   is not a decode error. It comes back as [`Decoded::Unknown`] so the
//!   caller can apply its drop policy (ignore or warn) instead of the codec
//!   deciding for it.
//! - **Error mapping**: malformed JSON and shape mismatches become
//!   [`Error::Decode`], which the client treats as a recoverable no-op.
//!
//! # Two-Step Decoding
//!
//! Decoding first parses to a generic `serde_json::Value` to read the
//! discriminator, and only then deserializes into the typed enum. A tagged
//! serde enum alone would turn every unknown `type` into a hard error, which
//! is the wrong failure mode for a protocol expected to grow new kinds.
//!
//! # Examples
//!
//! ```rust
//! use chatwire_core::{codec, codec::Decoded, OutboundEnvelope};
//!
//! let json = codec::encode_outbound(&OutboundEnvelope::new("hi", "user")).unwrap();
//! assert_eq!(json, r#"{"message":"hi","sender":"user"}"#);
//!
//! let decoded = codec::decode_inbound(r#"{"type":"assistant.message","message":"hi"}"#).unwrap();
//! assert!(matches!(decoded, Decoded::Message(_)));
//! ```

use crate::envelope::{InboundMessage, OutboundEnvelope};
use crate::error::{Error, Result};

/// Discriminators the codec maps into [`InboundMessage`]
const KNOWN_KINDS: &[&str] = &[
    "assistant.message",
    "error.message",
    "close.connection",
    "question.list",
];

/// Outcome of decoding an inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A recognized, fully classified message
    Message(InboundMessage),
    /// Well-formed frame with a `type` outside the closed set
    ///
    /// The payload is dropped; only the discriminator is reported so the
    /// caller can log it.
    Unknown { kind: String },
}

/// Encode an outbound envelope to its wire text
pub fn encode_outbound(envelope: &OutboundEnvelope) -> Result<String> {
    serde_json::to_string(envelope).map_err(|e| Error::Serialization(e.to_string()))
}

/// Decode and classify an inbound wire frame
///
/// # Errors
///
/// Returns [`Error::Decode`] when the frame is not valid JSON, is missing the
/// `type` discriminator, or carries a recognized `type` with the wrong shape
/// (for example `assistant.message` without a `message` field).
pub fn decode_inbound(data: &str) -> Result<Decoded> {
    let value: serde_json::Value =
        serde_json::from_str(data).map_err(|e| Error::Decode(e.to_string()))?;

    let kind = value
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or_else(|| Error::Decode("missing \"type\" discriminator".to_string()))?
        .to_string();

    if !KNOWN_KINDS.contains(&kind.as_str()) {
        return Ok(Decoded::Unknown { kind });
    }

    let message: InboundMessage =
        serde_json::from_value(value).map_err(|e| Error::Decode(e.to_string()))?;
    Ok(Decoded::Message(message))
}
