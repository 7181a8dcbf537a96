use serde::{Deserialize, Serialize};

use crate::workflow::DraftChange;

/// What changed as the result of a dispatched command.
///
/// Only successful changes produce events; failures travel in the
/// `Err(DispatchError)` channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    LiveToggled { enabled: bool },
    /// A status snapshot replaced the previous one. `finished` marks a
    /// terminal snapshot, after which polling is off.
    SnapshotRefreshed { finished: bool },
    ListLoaded {
        page: u64,
        last_page: u64,
        total: u64,
    },
    ActionCompleted { path: String, message: String },
    DraftEdited { change: DraftChange },
    DraftSaved { path: String, message: String },
}
