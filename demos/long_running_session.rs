// ABOUTME: Long-running session demo exercising the full lifecycle against a loopback engine
// ABOUTME: Shows bind, listener fan-out, a CLI-driven submit, keep-alive and clean shutdown

//! # Long-Running SMPP Session Demo
//!
//! Drives the session manager through its whole lifecycle against an
//! in-process loopback engine that stands in for a real SMSC: bind, one
//! submit taken from the command line, periodic keep-alive probes, an
//! injected mobile-originated message, and the multi-step shutdown.
//!
//! ```bash
//! cargo run --example long_running_session -- \
//!   --message "Hello" --from 1000 --to 2000 --run-duration 90
//! ```

use argh::FromArgs;
use smpp_session::{
    BoundSession, EngineResult, InboundAck, InboundHandler, InboundMessage, MessageListener,
    OutboundMessage, ProbeOutcome, ProtocolEngine, SessionConfig, SessionManager, SessionStats,
    SubmitTicket,
};
use std::error::Error;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Long-running SMPP session demo
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debugging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// the message text to submit once after binding
    #[argh(option, default = "String::from(\"Hello from smpp-session\")")]
    message: String,

    /// the telephone number the message will be from
    #[argh(option, short = 'f', default = "String::from(\"1000\")")]
    from: String,

    /// the recipient telephone number
    #[argh(option, short = 't', default = "String::from(\"2000\")")]
    to: String,

    /// keep-alive interval in seconds (default: 10)
    #[argh(option, default = "10")]
    keep_alive_interval: u64,

    /// how long to run the session in seconds (default: 60)
    #[argh(option, default = "60")]
    run_duration: u64,
}

/// Loopback stand-in for a real protocol engine
///
/// Answers every request positively and pushes one mobile-originated
/// message back through the bound handler shortly after bind.
#[derive(Default)]
struct LoopbackEngine {
    session: LoopbackSession,
}

#[derive(Clone, Default)]
struct LoopbackSession {
    counters: Arc<LoopbackCounters>,
}

#[derive(Default)]
struct LoopbackCounters {
    submits: AtomicU64,
    probes: AtomicU64,
}

impl BoundSession for LoopbackSession {
    async fn submit(
        &self,
        _message: &OutboundMessage,
        _timeout: Duration,
    ) -> EngineResult<SubmitTicket> {
        let n = self.counters.submits.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(SubmitTicket {
            message_id: format!("LOOP{n:04}"),
        })
    }

    async fn probe_liveness(&self, _timeout: Duration) -> EngineResult<ProbeOutcome> {
        self.counters.probes.fetch_add(1, Ordering::SeqCst);
        Ok(ProbeOutcome::Alive)
    }

    async fn unbind(&self, _timeout: Duration) -> EngineResult<()> {
        Ok(())
    }

    fn stats(&self) -> Option<SessionStats> {
        let probes = self.counters.probes.load(Ordering::SeqCst);
        Some(SessionStats {
            tx_probes: probes,
            rx_probes: probes,
            tx_submits: self.counters.submits.load(Ordering::SeqCst),
            rx_submits: self.counters.submits.load(Ordering::SeqCst),
            rx_delivers: 1,
        })
    }
}

impl ProtocolEngine for LoopbackEngine {
    type Session = LoopbackSession;

    async fn bind(
        &self,
        config: &SessionConfig,
        handler: Arc<dyn InboundHandler>,
    ) -> EngineResult<LoopbackSession> {
        info!(
            host = %config.host,
            port = config.port,
            "Loopback engine bound as {:?}",
            config.bind_mode
        );

        // Simulate a handset replying a little while after we bind.
        tokio::spawn(async move {
            sleep(Duration::from_secs(5)).await;
            let ack = handler.on_inbound(InboundMessage::new("PONG", "2000", "1000"));
            info!("Injected mobile-originated message, ack status {}", ack.status);
        });

        Ok(self.session.clone())
    }

    fn release(&self) {
        info!("Loopback engine released");
    }
}

struct PrintingListener;

impl MessageListener for PrintingListener {
    fn on_message(&self, message: &InboundMessage) {
        info!(
            "Listener received \"{}\" from {} to {}",
            message.text, message.from, message.to
        );
    }
}

struct CountingListener {
    seen: Mutex<u64>,
}

impl MessageListener for CountingListener {
    fn on_message(&self, _message: &InboundMessage) {
        let mut seen = self.seen.lock().unwrap();
        *seen += 1;
        info!("Inbound messages so far: {seen}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = argh::from_env();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli_args.debugging {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let run_duration = Duration::from_secs(cli_args.run_duration);

    let config = SessionConfig::transceiver("loopback.invalid", 2775, "demo", "demo")
        .with_keep_alive_interval(Duration::from_secs(cli_args.keep_alive_interval));
    let manager = SessionManager::new(config, LoopbackEngine::default());

    manager.register_listener(Arc::new(PrintingListener));
    manager.register_listener(Arc::new(CountingListener {
        seen: Mutex::new(0),
    }));

    info!("Initializing session");
    manager.initialize().await?;

    let result = manager
        .submit(&cli_args.message, &cli_args.from, &cli_args.to)
        .await;
    match result.message_id() {
        Some(id) => info!("Message sent with message id {id}"),
        None => info!("Message not submitted: {}", result.reason().unwrap_or("?")),
    }

    info!(
        "Idling for {} seconds with the keep-alive monitor running",
        run_duration.as_secs()
    );
    sleep(run_duration).await;

    info!("Shutting down");
    let report = manager.shutdown().await;
    if report.is_clean() {
        info!("Shutdown completed cleanly");
    } else {
        for (step, cause) in report.failures() {
            info!("Shutdown step failed ({step}): {cause}");
        }
    }

    Ok(())
}
