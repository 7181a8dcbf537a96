use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::api::ApiError;
use crate::config::defaults::DEFAULT_TIMEOUT_SECS;
use crate::refresh::types::Snapshot;

/// Proof that a fetch was issued, tagged with the epoch it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    epoch: u64,
}

impl FetchTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Snapshot replaced the previous one.
    Applied,
    /// Snapshot was terminal: applied, and polling is now off.
    Finished,
    /// Fetch failed; previous snapshot kept.
    Failed,
    /// Response belonged to an older epoch or arrived while disabled.
    Discarded,
}

/// Polling state for one status endpoint.
///
/// Every enable/disable transition starts a new epoch. Responses are only
/// applied when their ticket's epoch is still current, so a response that
/// was in flight while the user toggled polling off (and maybe on again)
/// never lands.
#[derive(Debug, Clone)]
pub struct RefreshController<T> {
    enabled: bool,
    epoch: u64,
    interval: Duration,
    fetch_timeout: Duration,
    latest: Option<T>,
    last_updated: Option<DateTime<Utc>>,
    last_error: Option<String>,
    finished: bool,
}

impl<T: Snapshot> RefreshController<T> {
    pub fn new(interval: Duration, enabled: bool) -> Self {
        Self {
            enabled,
            epoch: 0,
            interval,
            fetch_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            latest: None,
            last_updated: None,
            last_error: None,
            finished: false,
        }
    }

    /// Bound a single fetch independently of the polling interval.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn latest(&self) -> Option<&T> {
        self.latest.as_ref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True once a terminal snapshot has stopped polling.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Toggle polling. Returns whether the state actually changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        self.epoch += 1;
        if enabled {
            self.finished = false;
        }
        info!(
            event = "core.refresh.toggled",
            enabled = enabled,
            epoch = self.epoch
        );
        true
    }

    /// Start a new epoch without changing the enabled flag.
    ///
    /// Used when the toggle moved and came back while a fetch was in
    /// flight: the flag looks unchanged but the outstanding ticket is stale.
    pub fn invalidate(&mut self) {
        self.epoch += 1;
        debug!(event = "core.refresh.epoch_invalidated", epoch = self.epoch);
    }

    /// Issue a ticket for the next fetch, or `None` while disabled.
    pub fn begin_fetch(&self) -> Option<FetchTicket> {
        self.enabled.then_some(FetchTicket { epoch: self.epoch })
    }

    /// Apply the result of a fetch started with `ticket`.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<T, ApiError>) -> FetchOutcome {
        if !self.enabled || ticket.epoch != self.epoch {
            debug!(
                event = "core.refresh.response_discarded",
                ticket_epoch = ticket.epoch,
                current_epoch = self.epoch,
                enabled = self.enabled
            );
            return FetchOutcome::Discarded;
        }

        match result {
            Err(e) => {
                warn!(
                    event = "core.refresh.fetch_failed",
                    error = %e,
                    transient = e.is_transient()
                );
                self.last_error = Some(e.to_string());
                FetchOutcome::Failed
            }
            Ok(snapshot) => {
                let terminal = snapshot.is_terminal();
                self.latest = Some(snapshot);
                self.last_updated = Some(Utc::now());
                self.last_error = None;

                if terminal {
                    self.enabled = false;
                    self.epoch += 1;
                    self.finished = true;
                    info!(event = "core.refresh.terminal_reached", epoch = self.epoch);
                    FetchOutcome::Finished
                } else {
                    debug!(event = "core.refresh.snapshot_applied", epoch = self.epoch);
                    FetchOutcome::Applied
                }
            }
        }
    }
}
