//! Watch command - keep the coordinators polling and print each update

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clever_coordinator::{Coordinator, Readout, ReadoutSource, Refresh};

use super::status::select;
use super::Account;
use crate::output::OutputContext;

/// How often the published snapshot is checked for changes
const CHECK_INTERVAL: Duration = Duration::from_millis(500);

/// Poll until Ctrl+C, printing the readouts whenever a refresh publishes
pub async fn watch(account: &Account, selection: &[Readout], ctx: &OutputContext) -> Result<()> {
    match account.charge_point_coordinator() {
        Some(coordinator) => {
            follow(Arc::new(coordinator), &select(Readout::CHARGE_POINT, selection), ctx).await
        }
        None => {
            let coordinator = account.subscription_coordinator();
            follow(Arc::new(coordinator), &select(Readout::SUBSCRIPTION, selection), ctx).await
        }
    }
}

async fn follow<R>(
    coordinator: Arc<Coordinator<R>>,
    readouts: &[Readout],
    ctx: &OutputContext,
) -> Result<()>
where
    R: Refresh,
    R::Output: ReadoutSource,
{
    let poll = coordinator
        .start()
        .await
        .with_context(|| format!("Failed to start {} coordinator", coordinator.name()))?;
    ctx.info(&format!(
        "Refreshing every {}s, press Ctrl+C to stop",
        coordinator.interval().as_secs()
    ));

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let mut shown: Option<(DateTime<Utc>, bool)> = None;
    while running.load(Ordering::SeqCst) {
        if let Some(snapshot) = coordinator.snapshot() {
            let current = (snapshot.updated_at, snapshot.stale);
            if shown != Some(current) {
                ctx.print_readouts(&snapshot, readouts);
                shown = Some(current);
            }
        }
        tokio::time::sleep(CHECK_INTERVAL).await;
    }

    poll.stop();
    ctx.info("Stopped");
    Ok(())
}
