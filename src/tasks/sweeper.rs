//! Expiry Sweeper
//!
//! Background task that periodically deletes expired entries from the document
//! store on behalf of a [`CacheStore`](crate::cache::CacheStore).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cache::CacheCore;

/// Whether a cache currently has a sweeper.
#[derive(Debug, Default)]
pub enum SweepState {
    #[default]
    Idle,
    Running(Sweeper),
}

/// Handle to a running sweep task.
///
/// Stopping is fire-and-forget: the task is signalled and left to exit on its
/// own, so a sweep already holding the cache lock still completes.
#[derive(Debug)]
pub struct Sweeper {
    interval: Duration,
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Sweeper {
    /// Spawns the sweep loop for `core`. Must be called inside a Tokio runtime.
    pub(crate) fn spawn(core: Arc<CacheCore>, interval: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run(core, interval, shutdown_rx));

        Self {
            interval,
            shutdown_tx,
            handle,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Signals the task to exit and returns immediately.
    pub fn stop(self) -> JoinHandle<()> {
        // The receiver is gone if the task already exited.
        let _ = self.shutdown_tx.send(true);
        self.handle
    }
}

async fn run(core: Arc<CacheCore>, interval: Duration, mut shutdown_rx: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the first sweep waits a full interval.
    ticker.tick().await;

    info!(
        "Sweeper started for {} with interval {:?}",
        core.collection(),
        interval
    );

    loop {
        tokio::select! {
            biased;

            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                match core.sweep_expired().await {
                    Ok(0) => debug!("Sweep: no expired entries in {}", core.collection()),
                    Ok(removed) => info!("Sweep: removed {} expired entries from {}", removed, core.collection()),
                    Err(e) => warn!("Sweep of {} failed: {}", core.collection(), e),
                }
            }
        }
    }

    info!("Sweeper stopped for {}", core.collection());
}
