// SPDX-License-Identifier: BUSL-1.1
//! # Polling Synchronization
//!
//! Remote observers pull container snapshots on a fixed short interval and
//! stop once the terminal `RELEASED` state is observed; after release no
//! further transition is possible, so continued polling is wasted work. A
//! manual refresh is honored immediately regardless of the interval timer.
//!
//! The stop condition lives in [`next_poll`], a pure function testable
//! without any timer; [`watch_container`] is the scheduled-task form that
//! publishes snapshots on a `tokio::sync::watch` channel.
//!
//! `INSPECTION_FAILED` does not stop the watcher: it is terminal only for
//! automatic progression, and external remediation may still move the
//! container.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::container::Container;
use crate::status::{ClearanceError, OverallStatus};

/// Default poll interval for remote observers.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Polling policy for one observed container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Decide whether to keep polling after observing a snapshot.
///
/// Returns the delay until the next poll, or `None` once the container is
/// `RELEASED`.
pub fn next_poll(policy: &PollPolicy, snapshot: &Container) -> Option<Duration> {
    if snapshot.overall_status == OverallStatus::Released {
        None
    } else {
        Some(policy.interval)
    }
}

/// Anything a watcher can fetch container snapshots from: the in-process
/// registry, or a remote client in a split deployment.
pub trait ContainerSource: Send + Sync {
    fn fetch(
        &self,
        container_id: &str,
    ) -> impl std::future::Future<Output = Result<Container, ClearanceError>> + Send;
}

impl ContainerSource for crate::registry::ContainerRegistry {
    fn fetch(
        &self,
        container_id: &str,
    ) -> impl std::future::Future<Output = Result<Container, ClearanceError>> + Send {
        async move {
            self.get(container_id)
                .ok_or_else(|| ClearanceError::NotFound(container_id.to_string()))
        }
    }
}

/// Handle to a running container watcher.
pub struct WatchHandle {
    /// Latest observed snapshot; `None` until the first fetch lands.
    pub updates: watch::Receiver<Option<Container>>,
    /// Resolves with the terminal snapshot once `RELEASED` is observed, or
    /// the fetch error that ended the watch.
    pub task: JoinHandle<Result<Container, ClearanceError>>,
    refresh_tx: mpsc::Sender<()>,
}

impl WatchHandle {
    /// Request an immediate re-fetch, bypassing the interval timer.
    /// Coalesces with an already-pending refresh.
    pub fn refresh(&self) {
        let _ = self.refresh_tx.try_send(());
    }
}

/// Spawn a polling watcher for one container.
///
/// The first fetch happens immediately; afterwards the loop wakes on the
/// interval tick or on [`WatchHandle::refresh`], whichever comes first, and
/// exits once the snapshot is terminal per [`next_poll`].
pub fn watch_container<S>(
    source: Arc<S>,
    container_id: impl Into<String>,
    policy: PollPolicy,
) -> WatchHandle
where
    S: ContainerSource + 'static,
{
    let container_id = container_id.into();
    let (updates_tx, updates_rx) = watch::channel(None);
    let (refresh_tx, mut refresh_rx) = mpsc::channel::<()>(1);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(policy.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                Some(()) = refresh_rx.recv() => {}
            }

            let snapshot = match source.fetch(&container_id).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    tracing::warn!(container_id, error = %e, "container watch ended on fetch error");
                    return Err(e);
                }
            };

            let stop = next_poll(&policy, &snapshot).is_none();
            let _ = updates_tx.send(Some(snapshot.clone()));

            if stop {
                tracing::debug!(container_id, "container released, stopping watch");
                return Ok(snapshot);
            }
        }
    });

    WatchHandle {
        updates: updates_rx,
        task,
        refresh_tx,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
