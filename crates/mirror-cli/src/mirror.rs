//! Wiring between the command line and the mirror engine

use std::path::Path;

use mirror_core::{MirrorConfig, Scheduler, TreeReconciler};

use crate::error::{CliError, Result};

fn scheduler(source: &Path, replica: &Path, config: &MirrorConfig) -> Scheduler {
    Scheduler::new(
        TreeReconciler::new(config),
        source,
        replica,
        config.interval(),
    )
}

/// Run a single pass. A failed pass is an error so that the exit status
/// reflects it.
pub fn run_once(source: &Path, replica: &Path, config: &MirrorConfig) -> Result<()> {
    let outcome = scheduler(source, replica, config).run_once();
    if outcome.is_failure() {
        return Err(CliError::PassFailed);
    }
    Ok(())
}

/// Run passes until Ctrl-C. The pass in flight, if any, finishes its
/// current entry before the process exits.
pub fn run_forever(source: &Path, replica: &Path, config: &MirrorConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let scheduler = scheduler(source, replica, config);
        let cancel = scheduler.cancel_token();

        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown requested, finishing current work");
                    cancel.cancel();
                }
                Err(e) => tracing::warn!(error = %e, "Cannot listen for Ctrl-C"),
            }
        });

        let passes = scheduler.run().await;
        tracing::debug!(passes, "Scheduler exited");
    });

    Ok(())
}
