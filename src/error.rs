// ABOUTME: Session manager error types covering bind, state and engine failures
// ABOUTME: Background failures are logged and contained; only foreground lifecycle calls return these

use crate::engine::EngineError;
use thiserror::Error;

/// Error type for session lifecycle operations
///
/// Only `initialize()` and state-sensitive lifecycle calls return these.
/// Submit failures are converted to [`crate::types::SubmissionResult`]
/// values instead, and keep-alive/dispatch failures are logged where they
/// occur.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The bind handshake with the SMSC failed; the session is unusable
    #[error("Bind failed: {0}")]
    Bind(#[source] EngineError),

    /// The session is not in a valid state for the requested operation
    #[error("Invalid session state: {0}")]
    InvalidState(&'static str),

    /// Error reported by the underlying protocol engine
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Result type alias for session lifecycle operations
pub type SessionResult<T> = Result<T, SessionError>;
