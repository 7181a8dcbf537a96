//! Polling of status endpoints.
//!
//! [`RefreshController`] is the synchronous state machine (enabled flag,
//! epoch, latest snapshot) and [`run`] drives it on a tokio interval. A
//! snapshot reporting a terminal state stops the loop and triggers exactly
//! one full reload.

pub mod controller;
pub mod runner;
pub mod types;

pub use controller::{FetchOutcome, FetchTicket, RefreshController};
pub use runner::{EndpointSource, LiveSwitch, RunOutcome, SnapshotSource, run};
pub use types::{JobProgress, JobState, Snapshot, SystemSnapshot};
