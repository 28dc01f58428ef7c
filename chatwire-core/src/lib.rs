//! Core wire types and codec for chatwire
//!
//! This crate provides the protocol layer of the chatwire chat client:
//!
//! - **Envelope types**: the flat outbound `{message, sender}` shape and the
//!   closed set of `type`-discriminated inbound message kinds
//! - **Codec**: serialization of outbound envelopes and classification of
//!   inbound frames, with unknown discriminators reported rather than failed
//! - **Close codes**: the split between ordinary clean closure, the two
//!   application-terminal codes, and everything else that triggers reconnect
//! - **Error handling**: internal error types that never cross the public
//!   client contract
//!
//! # Architecture
//!
//! The crate is transport-agnostic: it deals in text frames and leaves how
//! those frames move to the `chatwire-client` crate, which owns the
//! connection lifecycle, reconnection, and event dispatch.
//!
//! # Example
//!
//! ```rust
//! use chatwire_core::{codec, codec::Decoded, InboundMessage, OutboundEnvelope};
//!
//! let wire = codec::encode_outbound(&OutboundEnvelope::new("hi", "user")).unwrap();
//! assert!(wire.contains("\"message\":\"hi\""));
//!
//! let frame = r#"{"type":"assistant.message","message":"hello"}"#;
//! match codec::decode_inbound(frame).unwrap() {
//!     Decoded::Message(InboundMessage::Assistant { message, .. }) => {
//!         assert_eq!(message, "hello");
//!     }
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

pub mod close;
pub mod codec;
pub mod envelope;
pub mod error;

pub use close::{CloseCode, CloseEvent};
pub use codec::Decoded;
pub use envelope::{
    InboundMessage, OutboundEnvelope, QuestionEntry, SENDER_ASSISTANT, SENDER_USER,
};
pub use error::{Error, Result};
