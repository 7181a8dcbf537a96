//! docket-core: client-side state for a document-management admin console
//!
//! The console talks to a JSON-over-HTTP backend. This library holds the
//! pieces of client state that are more than plain display: polling of
//! status endpoints, filter round-trips, and local editing of collections
//! that are only saved as a whole. It is used by the `docket` CLI.
//!
//! # Main Entry Points
//!
//! - [`refresh`] - Poll a status endpoint until it reports a terminal state
//! - [`filters`] - Filter selection, debounce and server round-trip
//! - [`records`] - Optimistic local replicas with cascade delete
//! - [`workflow`] - Workflow drafts and their pre-save validation
//! - [`api`] - Backend transport and response normalization
//! - [`state`] - Command/event dispatch for one console page
//! - [`config`] - Configuration management

pub mod api;
pub mod config;
pub mod errors;
pub mod events;
pub mod filters;
pub mod imports;
pub mod logging;
pub mod pagination;
pub mod records;
pub mod refresh;
pub mod state;
pub mod workflow;

// Re-export commonly used types at crate root for convenience
pub use api::{ActionOutcome, ApiClient, ApiError, Backend};
pub use config::DocketConfig;
pub use errors::{ConfigError, DocketError, DocketResult};
pub use filters::{Debouncer, FilterSession, FilterState};
pub use imports::{ImportConfig, ImportError, ImportRequest};
pub use logging::init_logging;
pub use pagination::{Page, PageLink};
pub use records::{DraftError, ListAction, Record, RecordId, Replica};
pub use refresh::{
    FetchOutcome, JobProgress, JobState, LiveSwitch, RefreshController, RunOutcome, Snapshot,
    SystemSnapshot,
};
pub use state::{Command, ConsoleStore, DispatchError, Event, Store};
pub use workflow::{
    DraftAction, DraftChange, Violation, ViolationCode, WorkflowDraft, validate_draft,
};
