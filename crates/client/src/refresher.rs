//! Background worker for the periodic silent refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::client::{CycleOutcome, InventoryClient};
use crate::gateway::InventoryGateway;
use crate::render::Renderer;

/// Handle to a running refresh task.
///
/// Dropping the handle leaves the task running for the life of the runtime;
/// call [`RefreshHandle::shutdown`] to stop it.
#[derive(Debug)]
pub struct RefreshHandle {
    shutdown: Arc<Notify>,
    join: JoinHandle<()>,
}

impl RefreshHandle {
    /// Request shutdown and wait for the task to finish.
    ///
    /// A refresh that is already in flight runs to completion first.
    pub async fn shutdown(self) {
        self.shutdown.notify_one();
        if let Err(e) = self.join.await {
            tracing::warn!(error = %e, "refresh task ended abnormally");
        }
    }
}

/// Spawn a task that calls [`InventoryClient::periodic_refresh`] every
/// `period`, starting one period from now.
///
/// A tick that finds a cycle in flight is dropped. Ticks missed while a slow
/// refresh was running are skipped, not replayed.
pub fn spawn_periodic_refresh<G, R>(client: Arc<InventoryClient<G, R>>, period: Duration) -> RefreshHandle
where
    G: InventoryGateway + 'static,
    R: Renderer + 'static,
{
    let shutdown = Arc::new(Notify::new());
    let signal = shutdown.clone();
    // Anchored at spawn time, not at the task's first poll.
    let start = Instant::now() + period;

    let join = tokio::spawn(async move {
        tracing::info!(period_secs = period.as_secs(), "periodic refresh started");

        let mut ticks = tokio::time::interval_at(start, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = signal.notified() => {
                    tracing::info!("periodic refresh received shutdown signal");
                    break;
                }
                _ = ticks.tick() => {
                    match client.periodic_refresh().await {
                        CycleOutcome::Busy => tracing::debug!("refresh tick dropped; cycle in flight"),
                        outcome => tracing::debug!(?outcome, "refresh tick done"),
                    }
                }
            }
        }

        tracing::info!("periodic refresh stopped");
    });

    RefreshHandle { shutdown, join }
}
