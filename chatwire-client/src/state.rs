//! Connection state tracking
//!
//! # Connection States
//!
//! - **Connecting**: attempting to establish the channel
//! - **Open**: connected and able to transmit
//! - **Closed**: the channel is gone; the manager is deciding what to do next
//! - **Reconnecting**: waiting out the retry delay before the next attempt
//! - **Terminated**: permanently inert (terminal close code, server-issued
//!   session end, or retry budget exhausted); no outgoing transitions
//!
//! # State Transitions
//!
//! ```text
//! Connecting → Open → Closed
//!      ↑                 ↓
//!      └── Reconnecting ←┤
//!                        ↓
//!                   Terminated
//! ```
//!
//! A clean ordinary closure leaves the machine in `Closed`; terminal close
//! codes and retry exhaustion absorb it into `Terminated`.

use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Connection state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Attempting to establish the channel
    Connecting,
    /// Connected and operational
    Open,
    /// Channel closed; not yet reconnecting or terminated
    Closed,
    /// Waiting for the retry delay before attempt `attempt`
    Reconnecting { attempt: u32 },
    /// Permanently inert
    Terminated,
}

impl ConnectionState {
    /// Whether sends are currently valid
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }

    /// Whether the manager will never reconnect again
    pub fn is_terminated(&self) -> bool {
        matches!(self, ConnectionState::Terminated)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Open => write!(f, "open"),
            ConnectionState::Closed => write!(f, "closed"),
            ConnectionState::Reconnecting { attempt } => {
                write!(f, "reconnecting (attempt {})", attempt)
            }
            ConnectionState::Terminated => write!(f, "terminated"),
        }
    }
}

/// Shared, cloneable cell holding the current state
#[derive(Clone)]
pub(crate) struct StateCell {
    inner: Arc<RwLock<ConnectionState>>,
}

impl StateCell {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(ConnectionState::Connecting)),
        }
    }

    pub(crate) async fn get(&self) -> ConnectionState {
        self.inner.read().await.clone()
    }

    pub(crate) async fn set(&self, state: ConnectionState) {
        *self.inner.write().await = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_state_cell_transitions() {
        let cell = StateCell::new();
        assert_eq!(cell.get().await, ConnectionState::Connecting);

        cell.set(ConnectionState::Open).await;
        assert!(cell.get().await.is_open());

        cell.set(ConnectionState::Reconnecting { attempt: 2 }).await;
        assert_eq!(
            cell.get().await,
            ConnectionState::Reconnecting { attempt: 2 }
        );

        cell.set(ConnectionState::Terminated).await;
        assert!(cell.get().await.is_terminated());
    }

    #[test]
    fn test_display() {
        assert_eq!(ConnectionState::Open.to_string(), "open");
        assert_eq!(
            ConnectionState::Reconnecting { attempt: 1 }.to_string(),
            "reconnecting (attempt 1)"
        );
    }
}
