//! Configuration type definitions for docket.
//!
//! These types are serialized/deserialized from TOML config files. Every
//! field is optional so that a project config only overrides what it names;
//! resolved values come from the accessors on [`DocketConfig`].
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! base_url = "https://docs.example.org"
//! csrf_token = "d41d8cd98f00b204"
//! timeout_secs = 15
//!
//! [refresh]
//! interval_secs = 5
//!
//! [filters]
//! debounce_ms = 300
//! ```

use serde::{Deserialize, Serialize};

/// Main configuration loaded from TOML config files.
///
/// Loaded from:
/// 1. User config: `~/.docket/config.toml`
/// 2. Project config: `./.docket/config.toml`
///
/// Project config values override user config values.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DocketConfig {
    /// Backend connection settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Auto-refresh cadence
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Filter and pagination behavior
    #[serde(default)]
    pub filters: FilterConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ServerConfig {
    /// Base URL of the console backend.
    /// Default: http://localhost:8000
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Token sent as `X-CSRF-TOKEN` on mutating requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,

    /// Per-request timeout in seconds.
    /// Default: 15 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Auto-refresh configuration.
///
/// Intervals are clamped to 1..=3600 seconds when resolved.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RefreshConfig {
    /// Generic status polling interval. Default: 5 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_secs: Option<u64>,

    /// Import job progress polling interval. Default: 5 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_interval_secs: Option<u64>,

    /// System dashboard polling interval. Default: 30 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_interval_secs: Option<u64>,
}

/// Filter and pagination configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FilterConfig {
    /// Search input quiescence window in milliseconds. Default: 500ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,

    /// Page size for client-side pagination. Default: 15.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
}
