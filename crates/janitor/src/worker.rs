//! Janitor worker - the long-lived Scanning/Sleeping loop.
//!
//! After every pass the worker sleeps for exactly one retention window,
//! then scans again. It stops only when its shutdown signal fires.

use crate::clock::{Clock, SystemClock};
use crate::error::JanitorError;
use crate::store::{ArtifactDir, LocalDir};
use crate::sweep::{SweepReport, sweep_once};
use deckbot_core::AppConfig;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct JanitorConfig {
    pub storage_dir: PathBuf,
    /// Maximum artifact age. Doubles as the pause between passes.
    pub retention: Duration,
}

impl JanitorConfig {
    pub fn from_minutes(storage_dir: impl Into<PathBuf>, minutes: u64) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            retention: Duration::from_secs(minutes.saturating_mul(60)),
        }
    }

    pub fn from_app(config: &AppConfig) -> Self {
        Self {
            storage_dir: config.storage_dir(),
            retention: config.retention(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.retention
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JanitorPhase {
    Idle,
    Scanning,
    Sleeping,
    Stopped,
}

pub struct Janitor {
    config: JanitorConfig,
    dir: Arc<dyn ArtifactDir>,
    clock: Arc<dyn Clock>,
    phase: watch::Sender<JanitorPhase>,
}

impl Janitor {
    pub fn new(config: JanitorConfig) -> Self {
        let dir = Arc::new(LocalDir::new(config.storage_dir.clone()));
        let (phase, _) = watch::channel(JanitorPhase::Idle);
        Self {
            config,
            dir,
            clock: Arc::new(SystemClock),
            phase,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_dir(mut self, dir: Arc<dyn ArtifactDir>) -> Self {
        self.dir = dir;
        self
    }

    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// One sweep pass evaluated against the clock's current time.
    pub async fn run_pass(&self) -> Result<SweepReport, JanitorError> {
        let now = self.clock.now();
        sweep_once(self.dir.as_ref(), self.config.retention, now).await
    }

    /// Loops until `shutdown` turns true or its sender is dropped.
    ///
    /// An interrupted pass is abandoned as is; deletions already made stay made.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let interval = self.config.interval();
        info!(
            "🧹 Janitor: sweeping {} every {}s",
            self.config.storage_dir.display(),
            interval.as_secs()
        );

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            self.phase.send_replace(JanitorPhase::Scanning);
            match self.run_pass().await {
                Ok(report) => log_report(&report),
                // Next pass retries; a missing directory must not kill the worker.
                Err(e) => error!("❌ Janitor: sweep failed: {}", e),
            }

            self.phase.send_replace(JanitorPhase::Sleeping);
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                _ = self.clock.sleep(interval) => {}
            }
        }

        self.phase.send_replace(JanitorPhase::Stopped);
        info!("🧹 Janitor: stopped");
    }

    /// Runs the loop on its own task. Dropping the handle also stops it.
    pub fn spawn(self) -> JanitorHandle {
        let (shutdown, rx) = watch::channel(false);
        let phase = self.phase.subscribe();
        let task = tokio::spawn(async move { self.run(rx).await });
        JanitorHandle { shutdown, phase, task }
    }
}

fn log_report(report: &SweepReport) {
    if report.has_deletions() || !report.failed.is_empty() {
        info!(
            removed = report.removed.len(),
            failed = report.failed.len(),
            retained = report.retained,
            duration_ms = report.duration_ms,
            "Janitor pass complete"
        );
    } else {
        debug!(scanned = report.scanned, "Janitor pass complete, nothing to remove");
    }
}

pub struct JanitorHandle {
    shutdown: watch::Sender<bool>,
    phase: watch::Receiver<JanitorPhase>,
    task: JoinHandle<()>,
}

impl JanitorHandle {
    pub fn phase(&self) -> JanitorPhase {
        *self.phase.borrow()
    }

    /// Signals shutdown and waits for the loop to exit. Returns the final phase.
    pub async fn stop(self) -> JanitorPhase {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            error!("Janitor task ended abnormally: {}", e);
        }
        *self.phase.borrow()
    }
}
