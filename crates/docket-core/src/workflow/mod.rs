//! Workflow drafts: a node/connection graph edited locally and saved whole.
//!
//! # Main Entry Points
//!
//! - [`WorkflowDraft::apply`] / [`WorkflowDraft::reduce`] - local edits
//! - [`validate_draft`] - pre-save checks, pure and deterministic
//! - [`persistence`] - load/save drafts as JSON files

pub mod draft;
pub mod persistence;
pub mod types;
pub mod validation;

pub use draft::{DraftAction, DraftChange, WorkflowDraft};
pub use types::{NodeKind, Position, WorkflowEdge, WorkflowNode};
pub use validation::{Violation, ViolationCode, validate_draft};
