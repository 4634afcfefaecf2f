//! Polling scheduler
//!
//! Runs one pass to completion, waits for the interval, and repeats until
//! cancelled. Passes never overlap and are never interrupted mid-I/O: the
//! pass runs on a blocking worker that is always awaited to completion, and
//! shutdown is observed only before a pass, at the pass's own safe points,
//! or during the wait.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;

use crate::cancel::CancelToken;
use crate::sync::{PassOutcome, TracingSink, TreeReconciler};
use crate::Error;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Drives periodic synchronization of one source/replica pair.
pub struct Scheduler {
    reconciler: Arc<TreeReconciler>,
    source: PathBuf,
    replica: PathBuf,
    interval: Duration,
}

impl Scheduler {
    pub fn new(
        reconciler: TreeReconciler,
        source: impl Into<PathBuf>,
        replica: impl Into<PathBuf>,
        interval: Duration,
    ) -> Self {
        Self {
            reconciler: Arc::new(reconciler),
            source: source.into(),
            replica: replica.into(),
            interval,
        }
    }

    /// Token that stops the scheduler and any pass it is running.
    pub fn cancel_token(&self) -> CancelToken {
        self.reconciler.cancel_token().clone()
    }

    /// Run a single pass on the current thread and log its outcome.
    pub fn run_once(&self) -> PassOutcome {
        run_pass(&self.reconciler, &self.source, &self.replica)
    }

    /// Run passes until cancelled. Returns the number of passes started.
    ///
    /// A failed pass is logged and the loop carries on with the next
    /// interval.
    pub async fn run(self) -> usize {
        let cancel = self.cancel_token();
        let mut passes = 0;

        loop {
            if cancel.is_cancelled() {
                break;
            }

            let reconciler = Arc::clone(&self.reconciler);
            let source = self.source.clone();
            let replica = self.replica.clone();
            let worker =
                tokio::task::spawn_blocking(move || run_pass(&reconciler, &source, &replica));
            passes += 1;

            let outcome = match worker.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    let error = Error::Worker {
                        message: e.to_string(),
                    };
                    tracing::error!("Error during synchronization: {}", error);
                    PassOutcome::Failed(error)
                }
            };
            if matches!(outcome, PassOutcome::Cancelled) {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = cancel.cancelled() => break,
            }
        }

        tracing::info!("Synchronization stopped after {} pass(es)", passes);
        passes
    }
}

fn run_pass(reconciler: &TreeReconciler, source: &Path, replica: &Path) -> PassOutcome {
    tracing::info!(
        "Synchronization started at {}",
        Local::now().format(TIME_FORMAT)
    );

    let outcome = PassOutcome::from(reconciler.synchronize(source, replica, &mut TracingSink));

    match &outcome {
        PassOutcome::Completed(report) => {
            for failure in &report.failures {
                tracing::error!(
                    "Error during synchronization: {} failed at {}: {}",
                    failure.phase,
                    failure.path,
                    failure.message
                );
            }
            tracing::info!(
                "Synchronization completed at {} ({})",
                Local::now().format(TIME_FORMAT),
                report.summary()
            );
        }
        PassOutcome::Failed(e) => {
            tracing::error!("Error during synchronization: {}", e);
        }
        PassOutcome::Cancelled => {
            tracing::info!("Synchronization cancelled at {}", Local::now().format(TIME_FORMAT));
        }
    }

    outcome
}
