// ABOUTME: Session lifecycle manager driving bind, steady-state submits, keep-alive and shutdown
// ABOUTME: Owns the config, the bound session handle, the listener registry and the monitor task

use crate::config::SessionConfig;
use crate::dispatch::InboundDispatcher;
use crate::engine::{BoundSession, ProtocolEngine};
use crate::error::{SessionError, SessionResult};
use crate::listener::{ListenerRegistry, MessageListener};
use crate::monitor::KeepAliveMonitor;
use crate::types::{OutboundMessage, SubmissionResult};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// How long a submit call waits for the SMSC response
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(15);

/// How long the unbind request waits during shutdown
pub const UNBIND_TIMEOUT: Duration = Duration::from_secs(5);

/// Lifecycle state of the session manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, `initialize()` not yet called
    Uninitialized,
    /// Bind handshake in progress
    Binding,
    /// Bound; submits are accepted and the monitor is running
    Bound,
    /// Shutdown in progress
    Unbinding,
    /// Torn down; the manager is permanently finished
    Closed,
    /// The bind handshake failed; sending and receiving are impossible
    BindFailed,
}

/// Teardown step identifiers for [`ShutdownReport`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownStep {
    /// Stopping the keep-alive monitor
    StopMonitor,
    /// Sending the unbind request to the SMSC
    Unbind,
}

impl std::fmt::Display for ShutdownStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownStep::StopMonitor => write!(f, "stop keep-alive monitor"),
            ShutdownStep::Unbind => write!(f, "unbind from SMSC"),
        }
    }
}

/// Aggregate outcome of the best-effort teardown sequence
///
/// Every step runs even if an earlier one failed; failures are collected
/// here instead of aborting the teardown.
#[derive(Debug, Default)]
pub struct ShutdownReport {
    failures: Vec<(ShutdownStep, String)>,
}

impl ShutdownReport {
    fn record(&mut self, step: ShutdownStep, cause: impl Into<String>) {
        self.failures.push((step, cause.into()));
    }

    /// True if every teardown step completed without error
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// The steps that failed, with their causes
    pub fn failures(&self) -> &[(ShutdownStep, String)] {
        &self.failures
    }
}

/// Top-level orchestrator for one SMPP client session
///
/// Drives the `Uninitialized → Binding → Bound → Unbinding → Closed`
/// lifecycle (with a terminal `BindFailed` branch), exposes message
/// submission while bound and fans inbound messages out to registered
/// listeners. At most one bound session exists per manager instance.
///
/// `submit` may be called from any number of tasks concurrently with the
/// keep-alive monitor; the bound session handle is shared through an `Arc`,
/// so a submit already in flight keeps the handle alive even if `shutdown`
/// releases the manager's slot underneath it.
pub struct SessionManager<E: ProtocolEngine> {
    engine: E,
    config: SessionConfig,
    listeners: Arc<ListenerRegistry>,
    state: Mutex<SessionState>,
    session: Mutex<Option<Arc<E::Session>>>,
    monitor: Mutex<Option<KeepAliveMonitor>>,
}

impl<E: ProtocolEngine> SessionManager<E> {
    /// Create an unbound manager from configuration and a protocol engine
    pub fn new(config: SessionConfig, engine: E) -> Self {
        Self {
            engine,
            config,
            listeners: Arc::new(ListenerRegistry::new()),
            state: Mutex::new(SessionState::Uninitialized),
            session: Mutex::new(None),
            monitor: Mutex::new(None),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap()
    }

    /// The configuration this manager was built with
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Register an inbound message listener
    ///
    /// Listeners are invoked in registration order. May be called before or
    /// after `initialize()`; a dispatch already in progress keeps the list
    /// it started with.
    pub fn register_listener(&self, listener: Arc<dyn MessageListener>) {
        self.listeners.register(listener);
    }

    /// Atomically replace the active listener list
    pub fn replace_listeners(&self, listeners: Vec<Arc<dyn MessageListener>>) {
        self.listeners.replace(listeners);
    }

    /// True while the keep-alive monitor task is alive
    pub fn monitor_running(&self) -> bool {
        self.monitor
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|monitor| monitor.is_running())
    }

    /// Traffic counters for the bound session, if the engine keeps them
    pub fn stats(&self) -> Option<crate::engine::SessionStats> {
        let session = self.session.lock().unwrap().clone();
        session.and_then(|session| session.stats())
    }

    /// Bind to the SMSC and start the keep-alive monitor
    ///
    /// On success the manager is `Bound` with the monitor running. On
    /// failure the manager parks in the terminal `BindFailed` state: the
    /// error is logged and returned, no monitor is started, and there is no
    /// automatic retry; only `shutdown()` is meaningful afterwards.
    pub async fn initialize(&self) -> SessionResult<()> {
        {
            let mut state = self.state.lock().unwrap();
            if *state != SessionState::Uninitialized {
                return Err(SessionError::InvalidState(
                    "initialize is only valid once, before any other lifecycle call",
                ));
            }
            *state = SessionState::Binding;
        }

        let handler = Arc::new(InboundDispatcher::new(Arc::clone(&self.listeners)));

        match self.engine.bind(&self.config, handler).await {
            Ok(session) => {
                let session = Arc::new(session);
                *self.session.lock().unwrap() = Some(Arc::clone(&session));
                *self.state.lock().unwrap() = SessionState::Bound;
                info!(
                    host = %self.config.host,
                    port = self.config.port,
                    system_id = %self.config.system_id,
                    "Session bound"
                );
                self.start_monitor(session);
                Ok(())
            }
            Err(err) => {
                *self.state.lock().unwrap() = SessionState::BindFailed;
                error!(
                    "Error occurred while binding session. Cannot send or receive any messages. Error is: {err}"
                );
                Err(SessionError::Bind(err))
            }
        }
    }

    /// Start the keep-alive monitor; a no-op if one is already running
    fn start_monitor(&self, session: Arc<E::Session>) {
        let mut monitor = self.monitor.lock().unwrap();
        if monitor.as_ref().is_some_and(|m| m.is_running()) {
            return;
        }
        *monitor = Some(KeepAliveMonitor::spawn(
            session,
            self.config.keep_alive_interval,
        ));
    }

    /// Submit a text message, applying the configured delivery-receipt flag
    pub async fn submit(
        &self,
        text: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> SubmissionResult {
        let message = OutboundMessage {
            to: to.into(),
            from: from.into(),
            text: text.into(),
            request_delivery_receipt: self.config.request_delivery_receipt,
        };
        self.submit_message(&message).await
    }

    /// Submit an outbound message and wait for the SMSC response
    ///
    /// Valid only while `Bound`. Every failure (timeout, transport error,
    /// malformed address) is logged and converted into
    /// [`SubmissionResult::NotSubmitted`]; this never returns an error to
    /// the caller.
    pub async fn submit_message(&self, message: &OutboundMessage) -> SubmissionResult {
        if self.state() != SessionState::Bound {
            return SubmissionResult::NotSubmitted {
                reason: "session is not bound".to_string(),
            };
        }

        // Clone the handle out of the slot so shutdown cannot invalidate a
        // submit already in flight.
        let Some(session) = self.session.lock().unwrap().clone() else {
            return SubmissionResult::NotSubmitted {
                reason: "session is not bound".to_string(),
            };
        };

        debug!(
            to = %message.to,
            from = %message.from,
            "About to send message: {}",
            message.text
        );

        match session.submit(message, SUBMIT_TIMEOUT).await {
            Ok(ticket) => {
                debug!(to = %message.to, "Message sent with message id {}", ticket.message_id);
                SubmissionResult::Submitted {
                    message_id: ticket.message_id,
                }
            }
            Err(err) => {
                error!(
                    to = %message.to,
                    from = %message.from,
                    "Error sending message: {err}"
                );
                debug!(to = %message.to, "Message **NOT** sent");
                SubmissionResult::NotSubmitted {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Tear the session down
    ///
    /// Runs the teardown sequence best-effort: stop the monitor and wait up
    /// to one keep-alive interval, unbind with a bounded timeout, log final
    /// session statistics when available, release the session handle, then
    /// release the engine. A step failure is recorded in the returned
    /// report and never prevents the remaining steps. Calling `shutdown`
    /// again after it completed is a no-op.
    pub async fn shutdown(&self) -> ShutdownReport {
        let mut report = ShutdownReport::default();

        {
            let mut state = self.state.lock().unwrap();
            match *state {
                SessionState::Closed | SessionState::Unbinding => return report,
                _ => *state = SessionState::Unbinding,
            }
        }

        info!("Shutting down session");

        // Step 1 + 2: signal the monitor and wait up to one keep-alive
        // interval for it to exit.
        let monitor = self.monitor.lock().unwrap().take();
        if let Some(monitor) = monitor {
            let exited = monitor.stop(self.config.keep_alive_interval).await;
            if !exited {
                report.record(
                    ShutdownStep::StopMonitor,
                    "monitor did not exit within the grace period",
                );
            }
        }

        let session = self.session.lock().unwrap().clone();
        if let Some(session) = &session {
            // Step 3: best-effort unbind.
            info!("Releasing session");
            if let Err(err) = session.unbind(UNBIND_TIMEOUT).await {
                warn!("Unbind failed: {err}");
                report.record(ShutdownStep::Unbind, err.to_string());
            }

            // Step 4: final counters, informational only.
            if let Some(stats) = session.stats() {
                info!("tx-probes :: {}", stats.tx_probes);
                info!("rx-probes :: {}", stats.rx_probes);
                info!("tx-submits :: {}", stats.tx_submits);
                info!("rx-submits :: {}", stats.rx_submits);
                info!("rx-delivers :: {}", stats.rx_delivers);
            }
        }

        // Step 5: release the handle. In-flight submits hold their own
        // clones and finish against those.
        self.session.lock().unwrap().take();

        // Step 6: release the engine and the pools it owns.
        self.engine.release();

        *self.state.lock().unwrap() = SessionState::Closed;
        info!("Session shut down");
        report
    }
}
