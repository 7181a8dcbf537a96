use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use crate::api::{Backend, fetch_snapshot, run_action, save_draft};
use crate::filters::FilterSession;
use crate::pagination::PageError;
use crate::refresh::{FetchOutcome, RefreshController, Snapshot};
use crate::state::errors::DispatchError;
use crate::state::events::Event;
use crate::state::store::Store;
use crate::state::types::Command;
use crate::workflow::{WorkflowDraft, validate_draft};

/// Store for one console page: a filtered list, an optional polled status
/// endpoint and a workflow draft.
///
/// When a polled snapshot turns terminal, the list is reloaded once in the
/// same dispatch.
pub struct ConsoleStore<B, S = serde_json::Value> {
    backend: B,
    status_path: Option<String>,
    refresh: RefreshController<S>,
    list: FilterSession<serde_json::Value>,
    draft: WorkflowDraft,
}

impl<B, S> ConsoleStore<B, S>
where
    B: Backend,
    S: Snapshot + DeserializeOwned + Send + Sync,
{
    pub fn new(backend: B, list_path: impl Into<String>, refresh_interval: Duration) -> Self {
        Self {
            backend,
            status_path: None,
            refresh: RefreshController::new(refresh_interval, false),
            list: FilterSession::new(list_path),
            draft: WorkflowDraft::default(),
        }
    }

    pub fn with_status_path(mut self, path: impl Into<String>) -> Self {
        self.status_path = Some(path.into());
        self
    }

    pub fn with_draft(mut self, draft: WorkflowDraft) -> Self {
        self.draft = draft;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn list(&self) -> &FilterSession<serde_json::Value> {
        &self.list
    }

    pub fn refresh(&self) -> &RefreshController<S> {
        &self.refresh
    }

    pub fn draft(&self) -> &WorkflowDraft {
        &self.draft
    }

    fn list_loaded(&self) -> Event {
        let page = self.list.page();
        Event::ListLoaded {
            page: page.current_page,
            last_page: page.last_page,
            total: page.total,
        }
    }

    async fn poll_status(&mut self) -> Result<Vec<Event>, DispatchError> {
        let path = self
            .status_path
            .clone()
            .ok_or(DispatchError::NoStatusEndpoint)?;
        let Some(ticket) = self.refresh.begin_fetch() else {
            debug!(event = "core.state.poll_skipped", reason = "live_off");
            return Ok(Vec::new());
        };

        let result = fetch_snapshot(&self.backend, &path).await;
        match self.refresh.complete_fetch(ticket, result) {
            FetchOutcome::Applied => Ok(vec![Event::SnapshotRefreshed { finished: false }]),
            FetchOutcome::Finished => {
                self.list.reload(&self.backend).await?;
                Ok(vec![
                    Event::SnapshotRefreshed { finished: true },
                    self.list_loaded(),
                ])
            }
            FetchOutcome::Failed => Err(DispatchError::RefreshFailed {
                message: self.refresh.last_error().unwrap_or_default().to_string(),
            }),
            FetchOutcome::Discarded => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl<B, S> Store for ConsoleStore<B, S>
where
    B: Backend,
    S: Snapshot + DeserializeOwned + Send + Sync,
{
    type Error = DispatchError;

    async fn dispatch(&mut self, cmd: Command) -> Result<Vec<Event>, DispatchError> {
        debug!(event = "core.state.dispatch_started", command = ?cmd);

        let result = match cmd {
            Command::SetLive { enabled } => {
                if self.refresh.set_enabled(enabled) {
                    Ok(vec![Event::LiveToggled { enabled }])
                } else {
                    Ok(Vec::new())
                }
            }
            Command::PollStatus => self.poll_status().await,
            Command::RefreshNow => match self.list.reload(&self.backend).await {
                Ok(_) => Ok(vec![self.list_loaded()]),
                Err(e) => Err(e.into()),
            },
            Command::ApplyFilters { filters } => {
                match self.list.apply(&self.backend, filters).await {
                    Ok(_) => Ok(vec![self.list_loaded()]),
                    Err(e) => Err(e.into()),
                }
            }
            Command::GoToPage { page } => {
                if page == 0 {
                    Err(PageError::InvalidPageNumber.into())
                } else {
                    match self.list.go_to_page(&self.backend, page).await {
                        Ok(_) => Ok(vec![self.list_loaded()]),
                        Err(e) => Err(e.into()),
                    }
                }
            }
            Command::RunAction { path, body } => {
                match run_action(&self.backend, &path, &body).await {
                    Ok(outcome) => Ok(vec![Event::ActionCompleted {
                        message: outcome.display_message().to_string(),
                        path,
                    }]),
                    Err(e) => Err(e.into()),
                }
            }
            Command::EditDraft { action } => match self.draft.apply(action) {
                Ok(change) => Ok(vec![Event::DraftEdited { change }]),
                Err(e) => Err(e.into()),
            },
            Command::SaveDraft { path, force } => {
                let violations = validate_draft(&self.draft);
                if !violations.is_empty() && !force {
                    Err(DispatchError::InvalidDraft { violations })
                } else {
                    match save_draft(&self.backend, &path, &self.draft).await {
                        Ok(outcome) => Ok(vec![Event::DraftSaved {
                            message: outcome.display_message().to_string(),
                            path,
                        }]),
                        Err(e) => Err(e.into()),
                    }
                }
            }
        };

        match &result {
            Ok(events) => info!(
                event = "core.state.dispatch_completed",
                event_count = events.len()
            ),
            Err(e) => error!(event = "core.state.dispatch_failed", error = %e),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::api::fake::FakeBackend;
    use crate::filters::FilterState;
    use crate::records::RecordId;
    use crate::refresh::JobProgress;
    use crate::workflow::{DraftAction, DraftChange, NodeKind, Position};
    use serde_json::json;

    fn store() -> ConsoleStore<FakeBackend, JobProgress> {
        ConsoleStore::new(FakeBackend::new(), "/imports", Duration::from_secs(5))
            .with_status_path("/imports/7/status")
    }

    fn list_body(page: u64) -> serde_json::Value {
        json!({"data": [{"id": 1}], "current_page": page, "last_page": 3, "per_page": 1, "total": 3})
    }

    #[test]
    fn test_console_store_implements_store_trait() {
        fn assert_store<T: Store>(_s: &T) {}
        assert_store(&store());
    }

    #[tokio::test]
    async fn test_poll_is_noop_while_live_off() {
        let mut store = store();
        let events = store.dispatch(Command::PollStatus).await.unwrap();
        assert!(events.is_empty());
        assert!(store.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn test_terminal_poll_reloads_list_once() {
        let mut store = store();
        store
            .backend()
            .push_ok(json!({"estado": "procesando", "porcentaje_avance": 42.5}));
        store
            .backend()
            .push_ok(json!({"estado": "completada", "porcentaje_avance": 100}));
        store.backend().push_ok(list_body(1));

        store.dispatch(Command::SetLive { enabled: true }).await.unwrap();
        let events = store.dispatch(Command::PollStatus).await.unwrap();
        assert_eq!(events, vec![Event::SnapshotRefreshed { finished: false }]);

        let events = store.dispatch(Command::PollStatus).await.unwrap();
        assert_eq!(
            events,
            vec![
                Event::SnapshotRefreshed { finished: true },
                Event::ListLoaded {
                    page: 1,
                    last_page: 3,
                    total: 3
                }
            ]
        );
        assert!(!store.refresh().is_enabled());

        // polling stays off after the terminal snapshot
        let events = store.dispatch(Command::PollStatus).await.unwrap();
        assert!(events.is_empty());

        let calls = store.backend().calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2].path, "/imports");
    }

    #[tokio::test]
    async fn test_plain_json_snapshots_keep_polling() {
        let mut store: ConsoleStore<FakeBackend> =
            ConsoleStore::new(FakeBackend::new(), "/cache", Duration::from_secs(30))
                .with_status_path("/dashboard/status");
        store
            .backend()
            .push_ok(json!({"system_status": {}, "cache_stats": {"hits": 3}}));

        store.dispatch(Command::SetLive { enabled: true }).await.unwrap();
        let events = store.dispatch(Command::PollStatus).await.unwrap();
        assert_eq!(events, vec![Event::SnapshotRefreshed { finished: false }]);
        assert!(store.refresh().is_enabled());
        assert_eq!(store.refresh().latest().unwrap()["cache_stats"]["hits"], 3);
    }

    #[tokio::test]
    async fn test_set_live_twice_emits_once() {
        let mut store = store();
        let first = store.dispatch(Command::SetLive { enabled: true }).await.unwrap();
        let second = store.dispatch(Command::SetLive { enabled: true }).await.unwrap();
        assert_eq!(first, vec![Event::LiveToggled { enabled: true }]);
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_poll_without_status_endpoint() {
        let mut store: ConsoleStore<FakeBackend> =
            ConsoleStore::new(FakeBackend::new(), "/audit", Duration::from_secs(5));
        let result = store.dispatch(Command::PollStatus).await;
        assert!(matches!(result, Err(DispatchError::NoStatusEndpoint)));
    }

    #[tokio::test]
    async fn test_failed_poll_reports_error() {
        let mut store = store();
        store.backend().push_err(ApiError::Timeout {
            path: "/imports/7/status".to_string(),
        });
        store.dispatch(Command::SetLive { enabled: true }).await.unwrap();
        let result = store.dispatch(Command::PollStatus).await;
        assert!(matches!(result, Err(DispatchError::RefreshFailed { .. })));
        assert!(store.refresh().is_enabled());
    }

    #[tokio::test]
    async fn test_apply_filters_then_page() {
        let mut store = store();
        store.backend().push_ok(list_body(1));
        store.backend().push_ok(list_body(2));

        let mut filters = FilterState::new();
        filters.set("estado", "fallida");
        let events = store
            .dispatch(Command::ApplyFilters { filters })
            .await
            .unwrap();
        assert_eq!(
            events,
            vec![Event::ListLoaded {
                page: 1,
                last_page: 3,
                total: 3
            }]
        );

        store.dispatch(Command::GoToPage { page: 2 }).await.unwrap();
        let calls = store.backend().calls();
        assert_eq!(
            calls[1].query,
            vec![
                ("estado".to_string(), "fallida".to_string()),
                ("page".to_string(), "2".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_page_zero_rejected() {
        let mut store = store();
        let result = store.dispatch(Command::GoToPage { page: 0 }).await;
        assert!(matches!(
            result,
            Err(DispatchError::Page(PageError::InvalidPageNumber))
        ));
    }

    #[tokio::test]
    async fn test_rejected_action_is_error() {
        let mut store = store();
        store
            .backend()
            .push_ok(json!({"success": false, "message": "Import already running"}));
        let result = store
            .dispatch(Command::RunAction {
                path: "/imports/7/process".to_string(),
                body: json!({}),
            })
            .await;
        assert!(matches!(
            result,
            Err(DispatchError::Api(ApiError::ActionRejected { .. }))
        ));
    }

    #[tokio::test]
    async fn test_invalid_draft_not_saved_unless_forced() {
        let mut store = store();
        store
            .dispatch(Command::EditDraft {
                action: DraftAction::AddNode {
                    kind: NodeKind::Task,
                    label: "Revisar".to_string(),
                    position: Position::default(),
                },
            })
            .await
            .unwrap();

        let result = store
            .dispatch(Command::SaveDraft {
                path: "/workflows/1".to_string(),
                force: false,
            })
            .await;
        assert!(matches!(result, Err(DispatchError::InvalidDraft { .. })));
        assert!(store.backend().calls().is_empty());

        store.backend().push_ok(json!({"success": true}));
        let events = store
            .dispatch(Command::SaveDraft {
                path: "/workflows/1".to_string(),
                force: true,
            })
            .await
            .unwrap();
        assert!(matches!(&events[0], Event::DraftSaved { .. }));
        assert_eq!(store.backend().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_node_event_lists_removed_edges() {
        let mut store = store();
        for (kind, label) in [(NodeKind::Start, "Inicio"), (NodeKind::End, "Fin")] {
            store
                .dispatch(Command::EditDraft {
                    action: DraftAction::AddNode {
                        kind,
                        label: label.to_string(),
                        position: Position::default(),
                    },
                })
                .await
                .unwrap();
        }
        store
            .dispatch(Command::EditDraft {
                action: DraftAction::Connect {
                    source: RecordId::Local(1),
                    target: RecordId::Local(2),
                    label: None,
                },
            })
            .await
            .unwrap();

        let events = store
            .dispatch(Command::EditDraft {
                action: DraftAction::DeleteNode {
                    id: RecordId::Local(2),
                },
            })
            .await
            .unwrap();
        assert_eq!(
            events,
            vec![Event::DraftEdited {
                change: DraftChange::NodeDeleted {
                    id: RecordId::Local(2),
                    removed_edges: vec![RecordId::Local(1)],
                }
            }]
        );
        assert!(store.draft().edges.is_empty());
    }
}
