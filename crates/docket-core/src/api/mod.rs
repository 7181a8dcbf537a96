//! JSON-over-HTTP access to the console backend.
//!
//! [`Backend`] is the seam every controller talks through; [`ApiClient`] is
//! the reqwest implementation. Typed helpers ([`fetch_page`],
//! [`fetch_snapshot`], [`run_action`]) decode raw JSON at this boundary so
//! the rest of the crate only sees normalized types.

pub mod backend;
pub mod client;
pub mod errors;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use backend::{
    Backend, fetch_page, fetch_snapshot, into_outcome, run_action, save_draft, upload_import,
};
pub use client::ApiClient;
pub use errors::ApiError;
pub use types::ActionOutcome;
