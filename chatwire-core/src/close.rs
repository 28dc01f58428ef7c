//! Close codes and close events
//!
//! The close-code space splits into three behaviors for the client:
//!
//! - **Ordinary clean closure** (1000, or 1005 when the peer sent no code):
//!   expected terminal, no reconnect.
//! - **Application-terminal codes**: [`CloseCode::SESSION_TERMINATE`] (4000)
//!   and [`CloseCode::UNAUTHORIZED`] (4001). These permanently suppress
//!   reconnection for the manager's lifetime.
//! - **Anything else non-clean**: feeds the reconnect policy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// WebSocket close code
///
/// Newtype over the raw `u16` so the two application-terminal codes have one
/// authoritative definition instead of bare literals scattered around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CloseCode(pub u16);

impl CloseCode {
    /// Normal closure (1000)
    pub const NORMAL: CloseCode = CloseCode(1000);
    /// No status code present in the close frame (1005)
    pub const NO_STATUS: CloseCode = CloseCode(1005);
    /// Connection dropped without a close handshake (1006)
    pub const ABNORMAL: CloseCode = CloseCode(1006);
    /// Server ended the chat session (4000)
    pub const SESSION_TERMINATE: CloseCode = CloseCode(4000);
    /// Session identifier was rejected (4001)
    pub const UNAUTHORIZED: CloseCode = CloseCode(4001);

    /// Whether this code permanently suppresses reconnection
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::SESSION_TERMINATE | Self::UNAUTHORIZED)
    }
}

impl From<u16> for CloseCode {
    fn from(code: u16) -> Self {
        CloseCode(code)
    }
}

impl fmt::Display for CloseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A closure of the underlying channel
///
/// `was_clean` mirrors browser WebSocket semantics: true when the close
/// handshake completed (a close frame was received), false when the channel
/// simply died.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseEvent {
    pub code: CloseCode,
    pub was_clean: bool,
}

impl CloseEvent {
    /// A closure that completed the close handshake
    pub fn clean(code: CloseCode) -> Self {
        Self {
            code,
            was_clean: true,
        }
    }

    /// A closure without a handshake (dropped socket, transport error)
    pub fn abnormal() -> Self {
        Self {
            code: CloseCode::ABNORMAL,
            was_clean: false,
        }
    }
}
