use serde::{Deserialize, Serialize};

use crate::filters::FilterState;
use crate::workflow::DraftAction;

/// Everything a user can do on a console page.
///
/// Commands use owned types so they can be serialized, queued and sent
/// across boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Turn live polling of the status endpoint on or off.
    SetLive { enabled: bool },
    /// Run one polling tick now (no-op while live mode is off).
    PollStatus,
    /// Re-fetch the displayed list with its current filters and page.
    RefreshNow,
    /// Apply a filter selection. Always lands on page 1.
    ApplyFilters { filters: FilterState },
    GoToPage { page: u64 },
    /// POST to an action endpoint (process, cancel, delete, clear cache).
    RunAction {
        path: String,
        body: serde_json::Value,
    },
    /// Local, unsynced edit of the workflow draft.
    EditDraft { action: DraftAction },
    /// Validate and persist the whole draft. `force` skips validation.
    SaveDraft { path: String, force: bool },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordId;

    #[test]
    fn test_command_serde_roundtrip() {
        let mut filters = FilterState::new();
        filters.set("estado", "activo");
        let commands = vec![
            Command::SetLive { enabled: true },
            Command::PollStatus,
            Command::RefreshNow,
            Command::ApplyFilters { filters },
            Command::GoToPage { page: 3 },
            Command::RunAction {
                path: "/imports/4/cancel".to_string(),
                body: serde_json::json!({}),
            },
            Command::EditDraft {
                action: DraftAction::DeleteNode {
                    id: RecordId::Local(2),
                },
            },
            Command::SaveDraft {
                path: "/workflows/1".to_string(),
                force: false,
            },
        ];
        for cmd in commands {
            let json = serde_json::to_string(&cmd).unwrap();
            let back: Command = serde_json::from_str(&json).unwrap();
            assert_eq!(cmd, back);
        }
    }
}
