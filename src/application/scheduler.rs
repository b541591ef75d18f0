use crate::application::reconciler::{MetricReconciler, ReconcileSummary};
use crate::application::snapshot_builder::SnapshotBuilder;
use crate::config::PollInterval;
use crate::domain::errors::RobotError;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    /// Snapshot built and folded into the counters
    Applied(ReconcileSummary),
    /// Cycle-scoped failure; counters left untouched
    Failed,
}

/// Drives the poll loop: build a snapshot, reconcile, sleep.
pub struct Scheduler {
    builder: SnapshotBuilder,
    reconciler: Arc<MetricReconciler>,
    interval: PollInterval,
    log_updates: bool,
}

impl Scheduler {
    pub fn new(
        builder: SnapshotBuilder,
        reconciler: Arc<MetricReconciler>,
        interval: PollInterval,
        log_updates: bool,
    ) -> Self {
        Self {
            builder,
            reconciler,
            interval,
            log_updates,
        }
    }

    /// Run exactly one poll cycle.
    ///
    /// Returns `Err` only for fatal errors; transport and API failures are
    /// logged and reported as `CycleOutcome::Failed`.
    pub async fn run_cycle(&self) -> Result<CycleOutcome, RobotError> {
        let start = Instant::now();
        if self.log_updates {
            info!("Scheduler: update starts");
        } else {
            debug!("Scheduler: update starts");
        }

        let snapshot = match self.builder.build().await {
            Ok(snapshot) => snapshot,
            Err(e) if e.is_fatal() => {
                error!("Scheduler: update failed fatally: {}", e);
                return Err(e);
            }
            Err(e) => {
                warn!("Scheduler: update failed: {}", e);
                return Ok(CycleOutcome::Failed);
            }
        };
        let fetched = start.elapsed();

        let summary = self.reconciler.apply(&snapshot).await;
        if self.log_updates {
            info!(
                "Scheduler: update ended: total={}, entries={}, dur={:?}",
                summary.total, summary.entries, fetched
            );
        } else {
            debug!(
                "Scheduler: update ended: total={}, entries={}, dur={:?}",
                summary.total, summary.entries, fetched
            );
        }

        Ok(CycleOutcome::Applied(summary))
    }

    pub async fn run_once(&self) -> Result<CycleOutcome, RobotError> {
        self.run_cycle().await
    }

    /// Poll until `shutdown` flips to `true` (or its sender is dropped).
    ///
    /// With `oneshot` the loop ends after the first cycle, whatever its outcome.
    pub async fn run(
        &self,
        oneshot: bool,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), RobotError> {
        loop {
            self.run_cycle().await?;

            if oneshot || *shutdown.borrow() {
                return Ok(());
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval.as_duration()) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Scheduler: shutdown requested, stopping poll loop");
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Start the continuous poll loop as a supervised background task.
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        info!(
            "Scheduler: Starting poll loop (interval: {} min)",
            self.interval.minutes()
        );
        let task = tokio::spawn(async move { self.run(false, shutdown_rx).await });
        SchedulerHandle { shutdown_tx, task }
    }
}

pub struct SchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<Result<(), RobotError>>,
}

impl SchedulerHandle {
    /// Resolves when the poll loop ends on its own, which only happens on a fatal error.
    pub async fn wait(&mut self) -> anyhow::Result<()> {
        (&mut self.task).await??;
        Ok(())
    }

    /// Signal shutdown and wait for the in-flight cycle to finish.
    pub async fn stop(self) -> anyhow::Result<()> {
        // The task may already have exited; a closed channel is fine.
        let _ = self.shutdown_tx.send(true);
        self.task.await??;
        Ok(())
    }
}
