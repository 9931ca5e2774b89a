// ABOUTME: Contract consumed from the external SMPP protocol engine
// ABOUTME: Defines bind/submit/probe/unbind primitives, the inbound push callbacks and engine value types

use crate::config::SessionConfig;
use crate::types::{InboundMessage, OutboundMessage};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Error reported by the protocol engine
///
/// The engine owns the socket, the PDU codec and the request window; this
/// enum is the shape its failures take at the session-manager boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Network-level failure (connect, read, write)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The peer rejected the request at the protocol level
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// No response was received within the caller-specified timeout
    #[error("No response within {0:?}")]
    Timeout(Duration),

    /// The connection was closed by the peer or the engine
    #[error("Connection closed")]
    Closed,

    /// The request could not be built (malformed address, oversized text)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Successful submit response from the SMSC
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    /// Provider-assigned message identifier
    pub message_id: String,
}

/// Outcome of a liveness probe that received a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The peer acknowledged the probe
    Alive,
    /// The peer responded but flagged the probe as failed
    Rejected {
        /// Cause reported by the engine
        cause: String,
    },
}

/// Session traffic counters, logged at shutdown when the engine keeps them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Liveness probes sent
    pub tx_probes: u64,
    /// Probe responses received
    pub rx_probes: u64,
    /// Submit requests sent
    pub tx_submits: u64,
    /// Submit responses received
    pub rx_submits: u64,
    /// Mobile-originated deliveries received
    pub rx_delivers: u64,
}

/// Summary of an outstanding request that expired without a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiredRequest {
    /// Command identifier of the expired request
    pub command_id: u32,
    /// Command status the request carried
    pub command_status: u32,
    /// Sequence number of the expired request
    pub sequence_number: u32,
}

impl std::fmt::Display for ExpiredRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "command_id: {:#010x}, command_status: {}, sequence_number: {}",
            self.command_id, self.command_status, self.sequence_number
        )
    }
}

/// Acknowledgment returned to the engine for every serviced inbound request
///
/// The engine turns this into the protocol-level response PDU. An
/// acknowledgment is produced whether or not any listener is registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InboundAck {
    /// Command status to report to the peer (0 = ok)
    pub status: u32,
}

impl InboundAck {
    /// Positive acknowledgment
    pub const OK: InboundAck = InboundAck { status: 0 };
}

/// Push callbacks invoked by the engine's I/O threads
///
/// Implemented by the inbound dispatcher and handed to the engine at bind
/// time. Calls arrive on threads this crate does not own, so
/// implementations must be fast and must never panic out of these methods.
pub trait InboundHandler: Send + Sync {
    /// A mobile-originated message arrived and requires an acknowledgment
    fn on_inbound(&self, message: InboundMessage) -> InboundAck;

    /// An outstanding request expired without a response
    fn on_request_expired(&self, expired: ExpiredRequest);
}

/// A live, bound SMPP session owned by the protocol engine
///
/// Handed out by [`ProtocolEngine::bind`] and shared between the session
/// manager, concurrent submit callers and the keep-alive monitor, so every
/// operation takes `&self`. Futures are `Send` because the monitor holds
/// the session across await points on a spawned task.
pub trait BoundSession: Send + Sync + 'static {
    /// Submit an outbound message and wait up to `timeout` for the response
    fn submit(
        &self,
        message: &OutboundMessage,
        timeout: Duration,
    ) -> impl Future<Output = EngineResult<SubmitTicket>> + Send;

    /// Send a liveness probe and wait up to `timeout` for the response
    fn probe_liveness(
        &self,
        timeout: Duration,
    ) -> impl Future<Output = EngineResult<ProbeOutcome>> + Send;

    /// Send an unbind request and wait up to `timeout` for the response
    fn unbind(&self, timeout: Duration) -> impl Future<Output = EngineResult<()>> + Send;

    /// Traffic counters for this session, if the engine keeps them
    fn stats(&self) -> Option<SessionStats>;
}

/// The external SMPP protocol engine
///
/// Opens the socket, performs the bind handshake, encodes and decodes PDUs
/// and runs the per-request timeout window. This crate only orchestrates
/// the session lifecycle on top of it.
pub trait ProtocolEngine: Send + Sync {
    /// Session handle type produced by a successful bind
    type Session: BoundSession;

    /// Connect and perform the bind handshake
    ///
    /// The handler receives inbound pushes for the lifetime of the
    /// returned session.
    fn bind(
        &self,
        config: &SessionConfig,
        handler: Arc<dyn InboundHandler>,
    ) -> impl Future<Output = EngineResult<Self::Session>> + Send;

    /// Release the engine and any thread pools it owns
    ///
    /// Called once during shutdown, after the session handle is dropped.
    fn release(&self);
}
