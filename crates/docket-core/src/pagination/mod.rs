//! Normalized pagination.
//!
//! The backend returns paginated collections in two shapes: a flat one with
//! `current_page`/`total`/`links` next to `data`, and a resource-style one
//! with a nested `meta` object and a `links` map. Both are converted into a
//! single [`Page`] at the loading boundary so nothing downstream branches on
//! payload shape.

pub mod errors;
pub mod links;
pub mod types;

pub use errors::PageError;
pub use links::{build_links, page_numbers};
pub use types::{Page, PageLink, PagePayload, RawPage};
