// ABOUTME: Keep-alive monitor task issuing periodic liveness probes for a bound session
// ABOUTME: Cooperative stop via an atomic flag plus a notify observed at every wait point

use crate::engine::{BoundSession, EngineError, ProbeOutcome};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How long a single liveness probe waits for its response
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(100);

/// Background task that probes session liveness at a fixed interval
///
/// One monitor runs per bound session. Each iteration sends a probe through
/// the engine, classifies the outcome and sleeps one keep-alive interval.
/// Probe failures are logged and never tear the session down; the only exit
/// is the stop signal set during shutdown, observed at the loop head and at
/// both wait points so the task exits promptly instead of finishing a full
/// sleep.
pub struct KeepAliveMonitor {
    running: Arc<AtomicBool>,
    stop: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl KeepAliveMonitor {
    /// Spawn the monitor task for a bound session
    pub fn spawn<S: BoundSession>(session: Arc<S>, interval: Duration) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let stop = Arc::new(Notify::new());

        let task = tokio::spawn(run_loop(
            session,
            interval,
            Arc::clone(&running),
            Arc::clone(&stop),
        ));

        Self {
            running,
            stop,
            task: Some(task),
        }
    }

    /// True while the monitor task is alive
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Signal the monitor to stop and wait up to `grace` for it to exit
    ///
    /// Returns true if the task exited within the grace period. The task is
    /// never aborted; a probe still in flight is left to finish on its own.
    pub async fn stop(mut self, grace: Duration) -> bool {
        self.running.store(false, Ordering::Release);
        // notify_one stores a permit, so the signal is not lost if the task
        // is between wait points when shutdown runs.
        self.stop.notify_one();

        match self.task.take() {
            None => true,
            Some(task) => match tokio::time::timeout(grace, task).await {
                Ok(_) => {
                    debug!("Keep-alive monitor stopped");
                    true
                }
                Err(_) => {
                    warn!("Keep-alive monitor did not exit within {grace:?}, proceeding");
                    false
                }
            },
        }
    }
}

async fn run_loop<S: BoundSession>(
    session: Arc<S>,
    interval: Duration,
    running: Arc<AtomicBool>,
    stop: Arc<Notify>,
) {
    debug!("Keep-alive monitor started, interval {interval:?}");

    while running.load(Ordering::Acquire) {
        tokio::select! {
            outcome = session.probe_liveness(PROBE_TIMEOUT) => match outcome {
                Ok(ProbeOutcome::Alive) => {
                    debug!("Liveness probe acknowledged");
                }
                Ok(ProbeOutcome::Rejected { cause }) => {
                    warn!("Failed to properly receive probe response: {cause}");
                }
                Err(EngineError::Timeout(timeout)) => {
                    warn!("Failed to receive probe response within {timeout:?}");
                }
                Err(err) => {
                    warn!("Error while waiting for probe response: {err}");
                }
            },
            _ = stop.notified() => break,
        }

        if !running.load(Ordering::Acquire) {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = stop.notified() => break,
        }
    }

    debug!("Keep-alive monitor exiting");
}
