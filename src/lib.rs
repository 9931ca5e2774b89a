// ABOUTME: Client-side SMPP session manager orchestrating bind, submit, keep-alive and shutdown
// ABOUTME: The wire protocol lives behind the ProtocolEngine traits supplied by the host

//! Session lifecycle management for SMPP clients.
//!
//! This crate maintains one outbound connection to an SMSC on top of an
//! external protocol engine: it drives the bind/monitor/submit/unbind state
//! machine, keeps the link alive with a background probe task and fans
//! inbound mobile-originated messages out to registered listeners.
//!
//! * **Lifecycle orchestration** - `initialize()` binds and starts the
//!   keep-alive monitor; `shutdown()` runs a best-effort multi-step
//!   teardown and reports per-step failures
//! * **Concurrent submits** - any number of tasks may submit while bound;
//!   failures come back as values, never as errors
//! * **Inbound fan-out** - listeners are invoked in registration order,
//!   isolated from each other's panics
//! * **Engine-agnostic** - PDU encoding, TCP transport, request windowing
//!   and charset handling are behind the [`ProtocolEngine`] /
//!   [`BoundSession`] traits
//!
//! # Example
//!
//! ```rust,no_run
//! use smpp_session::{SessionConfig, SessionManager};
//! # use smpp_session::{
//! #     BoundSession, EngineResult, InboundHandler, OutboundMessage, ProbeOutcome,
//! #     ProtocolEngine, SessionStats, SubmitTicket,
//! # };
//! # use std::sync::Arc;
//! # use std::time::Duration;
//! # struct Engine;
//! # struct Session;
//! # impl BoundSession for Session {
//! #     async fn submit(
//! #         &self,
//! #         _message: &OutboundMessage,
//! #         _timeout: Duration,
//! #     ) -> EngineResult<SubmitTicket> {
//! #         Ok(SubmitTicket { message_id: "ABC123".to_string() })
//! #     }
//! #     async fn probe_liveness(&self, _timeout: Duration) -> EngineResult<ProbeOutcome> {
//! #         Ok(ProbeOutcome::Alive)
//! #     }
//! #     async fn unbind(&self, _timeout: Duration) -> EngineResult<()> {
//! #         Ok(())
//! #     }
//! #     fn stats(&self) -> Option<SessionStats> {
//! #         None
//! #     }
//! # }
//! # impl ProtocolEngine for Engine {
//! #     type Session = Session;
//! #     async fn bind(
//! #         &self,
//! #         _config: &SessionConfig,
//! #         _handler: Arc<dyn InboundHandler>,
//! #     ) -> EngineResult<Session> {
//! #         Ok(Session)
//! #     }
//! #     fn release(&self) {}
//! # }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SessionConfig::transceiver("localhost", 2775, "system_id", "password");
//!     let manager = SessionManager::new(config, Engine);
//!
//!     // Bind and start the keep-alive monitor
//!     manager.initialize().await?;
//!
//!     // Submit returns a result value either way
//!     let result = manager.submit("Hello, World!", "1000", "2000").await;
//!     match result.message_id() {
//!         Some(id) => println!("Message sent with ID: {id}"),
//!         None => println!("Message not sent"),
//!     }
//!
//!     // Best-effort teardown; per-step failures are reported, not thrown
//!     let report = manager.shutdown().await;
//!     assert!(report.is_clean());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod listener;
pub mod monitor;
pub mod session;
pub mod types;


// Re-export the main session API for easy access
pub use config::{BindMode, ConfigError, SessionConfig};
pub use dispatch::InboundDispatcher;
pub use engine::{
    BoundSession, EngineError, EngineResult, ExpiredRequest, InboundAck, InboundHandler,
    ProbeOutcome, ProtocolEngine, SessionStats, SubmitTicket,
};
pub use error::{SessionError, SessionResult};
pub use listener::{ListenerRegistry, MessageListener};
pub use monitor::KeepAliveMonitor;
pub use session::{SessionManager, SessionState, ShutdownReport, ShutdownStep};
pub use types::{InboundMessage, OutboundMessage, OutboundMessageBuilder, SubmissionResult};
