//! Background removal of expired sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::datetime;
use crate::db::SessionStore;
use crate::Result;

/// Default sweep interval (5 minutes).
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 5 * 60;

/// Periodically deletes sessions whose expiry has passed.
pub struct SessionSweeper {
    sessions: Arc<dyn SessionStore>,
    interval: Duration,
}

impl SessionSweeper {
    /// Create a sweeper running every `interval`.
    ///
    /// A zero interval is raised to one millisecond.
    pub fn new(sessions: Arc<dyn SessionStore>, interval: Duration) -> Self {
        Self {
            sessions,
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Get the sweep interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run a single sweep cycle.
    ///
    /// Every session with expiry at or before the cycle's start time is
    /// removed. Returns the number of sessions deleted.
    pub async fn sweep_once(&self) -> Result<u64> {
        let started = datetime::now();
        let removed = self.sessions.delete_expired(started).await?;
        if removed > 0 {
            info!(removed, "Swept expired sessions");
        } else {
            debug!("No expired sessions to sweep");
        }
        Ok(removed)
    }

    /// Start the sweeper on the tokio runtime.
    pub fn spawn(self) -> SweeperHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let drain_timeout = self.interval;
        let task = tokio::spawn(self.run(shutdown_rx));
        SweeperHandle {
            shutdown_tx,
            task,
            drain_timeout,
        }
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_ms = self.interval.as_millis() as u64, "Session sweeper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep_once().await {
                        warn!(error = %e, "Session sweep failed, retrying next cycle");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Session sweeper stopped");
    }
}

/// Handle to a running [`SessionSweeper`].
pub struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
    drain_timeout: Duration,
}

impl SweeperHandle {
    /// Check whether the sweeper task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal the sweeper to stop and wait for it.
    ///
    /// Waits at most one sweep interval; a sweep still running after that is
    /// aborted.
    pub async fn shutdown(self) {
        // Send fails only if the task already exited.
        let _ = self.shutdown_tx.send(true);

        let mut task = self.task;
        match tokio::time::timeout(self.drain_timeout, &mut task).await {
            Ok(Ok(())) => debug!("Session sweeper drained"),
            Ok(Err(e)) => warn!(error = %e, "Session sweeper task ended abnormally"),
            Err(_) => {
                warn!("Session sweeper did not stop within one interval, aborting");
                task.abort();
                let _ = task.await;
            }
        }
    }
}
