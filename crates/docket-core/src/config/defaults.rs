//! Default values for configuration fields.
//!
//! Config types keep every field optional; these constants are what the
//! accessors on [`DocketConfig`](super::DocketConfig) fall back to.

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Conservative fetch timeout so a hung request cannot starve the next poll.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_JOB_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_DASHBOARD_INTERVAL_SECS: u64 = 30;

pub const MIN_INTERVAL_SECS: u64 = 1;
pub const MAX_INTERVAL_SECS: u64 = 3600;

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_PER_PAGE: u64 = 15;

/// Environment variable that overrides `server.base_url`.
pub const BASE_URL_ENV: &str = "DOCKET_BASE_URL";
