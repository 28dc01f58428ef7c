//! Error types for chatwire
//!
//! The chat protocol deliberately keeps failures local: a malformed frame or
//! a dropped socket must never escape the client as a panic or a caller-facing
//! exception. The `Error` enum here exists for the internal seams (codec,
//! transport) where a `Result` is the right shape; the client API converts
//! these into state transitions, dispatched events, or logged diagnostics.
//!
//! # Error Categories
//!
//! - **Transport**: socket-level failures (connect refused, broken pipe,
//!   WebSocket protocol violations). Recovered by forcing closure and letting
//!   the reconnect policy take over.
//! - **Decode**: a frame that is not valid JSON or does not match the inbound
//!   envelope shape. Recovered as a logged no-op; the receive loop survives.
//! - **Serialization**: an outbound envelope that cannot be encoded. In
//!   practice unreachable for the flat envelope shape, but kept explicit.

use thiserror::Error;

/// Result type for chatwire operations
pub type Result<T> = std::result::Result<T, Error>;

/// Internal error type for chatwire operations
///
/// These errors circulate between the codec, the transport, and the
/// connection manager. None of them cross the public client contract:
/// the manager absorbs them into reconnects, terminations, or diagnostics.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Transport layer failure
    ///
    /// Covers connection establishment failures and socket-level errors.
    /// The connection manager funnels these into its close-handling path,
    /// so there is a single place where a dead socket is dealt with.
    #[error("transport error: {0}")]
    Transport(String),

    /// Malformed inbound payload
    ///
    /// The frame was not valid JSON, or it was missing the `type`
    /// discriminator, or a recognized type carried the wrong shape.
    /// Always recoverable; the offending frame is dropped.
    #[error("decode error: {0}")]
    Decode(String),

    /// Outbound envelope could not be serialized
    #[error("serialization error: {0}")]
    Serialization(String),
}
