use serde::{Deserialize, Serialize};

/// Fatal transport failures.
///
/// Any error from the byte source ends the reader; a consumer that wants to
/// reconnect builds a new reader over a fresh transport. Timeouts are fatal
/// too: a powered headset streams continuously, so silence means the link is
/// gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum TransportError {
    /// No data arrived within the transport's read timeout.
    #[error("Transport read timed out")]
    TimedOut,
    /// The peer closed the connection or the link dropped.
    #[error("Transport disconnected")]
    Disconnected,
    /// Any other I/O failure.
    #[error("Transport I/O error: {0}")]
    Io(String),
}
