//! List filtering.
//!
//! [`FilterState`] is the user's filter selection, [`FilterSession`] the
//! server round-trip that turns it into a displayed page, and [`Debouncer`]
//! coalesces rapid input (typing into a search box) into one request.

pub mod debounce;
pub mod errors;
pub mod session;
pub mod state;

pub use debounce::Debouncer;
pub use errors::FilterError;
pub use session::FilterSession;
pub use state::{FilterState, PAGE_KEY, SEARCH_KEY};
