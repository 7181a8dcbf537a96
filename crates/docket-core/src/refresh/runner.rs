use std::future::Future;
use std::ops::ControlFlow;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::api::{ApiError, Backend, fetch_snapshot};
use crate::refresh::controller::{FetchOutcome, RefreshController};
use crate::refresh::types::Snapshot;

/// Where snapshots come from.
#[async_trait]
pub trait SnapshotSource<T>: Send + Sync {
    async fn fetch(&self) -> Result<T, ApiError>;

    /// Label used in logs and timeout errors.
    fn describe(&self) -> String {
        "snapshot".to_string()
    }
}

/// A status endpoint on a [`Backend`].
pub struct EndpointSource<'a, B: ?Sized> {
    backend: &'a B,
    path: String,
}

impl<'a, B: Backend + ?Sized> EndpointSource<'a, B> {
    pub fn new(backend: &'a B, path: impl Into<String>) -> Self {
        Self {
            backend,
            path: path.into(),
        }
    }
}

#[async_trait]
impl<T, B> SnapshotSource<T> for EndpointSource<'_, B>
where
    T: DeserializeOwned + Send + 'static,
    B: Backend + ?Sized,
{
    async fn fetch(&self) -> Result<T, ApiError> {
        fetch_snapshot(self.backend, &self.path).await
    }

    fn describe(&self) -> String {
        self.path.clone()
    }
}

/// The user-facing live toggle. Dropping it ends the polling loop.
#[derive(Debug)]
pub struct LiveSwitch {
    tx: watch::Sender<bool>,
}

impl LiveSwitch {
    pub fn new(enabled: bool) -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(enabled);
        (Self { tx }, rx)
    }

    pub fn set(&self, enabled: bool) {
        self.tx.send_replace(enabled);
    }

    pub fn is_on(&self) -> bool {
        *self.tx.borrow()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A terminal snapshot arrived and the reload ran.
    Finished,
    /// The update callback asked to stop.
    Stopped,
    /// The live switch was dropped.
    Cancelled,
}

/// Poll `source` on the controller's interval until a terminal snapshot,
/// a `Break` from `on_update`, or the live switch going away.
///
/// The first fetch happens immediately. Fetches are bounded by the
/// controller's fetch timeout; a fetch that outlives it counts as failed.
/// Any toggle seen while a fetch was in flight discards its response. `on_update` sees
/// every applied, failed and finished fetch (never discarded ones).
/// `reload` runs exactly once, after the terminal snapshot was applied.
pub async fn run<T, S, U, R, Fut>(
    controller: &mut RefreshController<T>,
    source: &S,
    mut live: watch::Receiver<bool>,
    mut on_update: U,
    reload: R,
) -> RunOutcome
where
    T: Snapshot,
    S: SnapshotSource<T> + ?Sized,
    U: FnMut(&RefreshController<T>, FetchOutcome) -> ControlFlow<()>,
    R: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    let interval = controller.interval();
    let fetch_timeout = controller.fetch_timeout();
    let label = source.describe();
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    controller.set_enabled(*live.borrow_and_update());

    info!(
        event = "core.refresh.loop_started",
        source = %label,
        interval_secs = interval.as_secs()
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(ticket) = controller.begin_fetch() else {
                    continue;
                };
                debug!(event = "core.refresh.tick_started", source = %label, epoch = ticket.epoch());

                let result = match tokio::time::timeout(fetch_timeout, source.fetch()).await {
                    Ok(result) => result,
                    Err(_) => Err(ApiError::Timeout { path: label.clone() }),
                };

                // Toggles made while the request was in flight. The channel only
                // keeps the latest value, so off-then-on looks like no change.
                match live.has_changed() {
                    Ok(true) => {
                        let enabled = *live.borrow_and_update();
                        if !controller.set_enabled(enabled) {
                            controller.invalidate();
                        }
                    }
                    Ok(false) => {}
                    Err(_) => return cancelled(&label),
                }

                match controller.complete_fetch(ticket, result) {
                    FetchOutcome::Discarded => {}
                    FetchOutcome::Finished => {
                        let _ = on_update(controller, FetchOutcome::Finished);
                        info!(event = "core.refresh.reload_started", source = %label);
                        reload().await;
                        info!(event = "core.refresh.loop_completed", source = %label);
                        return RunOutcome::Finished;
                    }
                    outcome => {
                        if on_update(controller, outcome).is_break() {
                            info!(event = "core.refresh.loop_stopped", source = %label);
                            return RunOutcome::Stopped;
                        }
                    }
                }
            }
            changed = live.changed() => {
                if changed.is_err() {
                    return cancelled(&label);
                }
                let enabled = *live.borrow_and_update();
                if controller.set_enabled(enabled) && enabled {
                    ticker.reset_immediately();
                }
            }
        }
    }
}

fn cancelled(label: &str) -> RunOutcome {
    info!(event = "core.refresh.loop_cancelled", source = %label);
    RunOutcome::Cancelled
}
