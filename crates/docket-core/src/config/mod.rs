//! # Configuration System
//!
//! Hierarchical TOML configuration for docket.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.docket/config.toml` (global user preferences)
//! 3. **Project config** - `./.docket/config.toml` (per-directory overrides)
//! 4. **Environment** - `DOCKET_BASE_URL`
//! 5. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Usage Example
//!
//! ```toml
//! # ~/.docket/config.toml
//! [server]
//! base_url = "https://docs.example.org"
//! timeout_secs = 10
//!
//! [refresh]
//! job_interval_secs = 5
//! dashboard_interval_secs = 30
//!
//! [filters]
//! debounce_ms = 500
//! per_page = 25
//! ```
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use docket_core::config::DocketConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DocketConfig::load_hierarchy()?;
//!     println!("talking to {}", config.base_url());
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use types::{DocketConfig, FilterConfig, RefreshConfig, ServerConfig};
pub use validation::validate_config;

use std::time::Duration;

impl DocketConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }

    /// Base URL of the console backend, without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.server
            .base_url
            .as_deref()
            .unwrap_or(defaults::DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    /// Per-request timeout applied to every backend call.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.server
                .timeout_secs
                .unwrap_or(defaults::DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Poll cadence for generic status endpoints.
    pub fn refresh_interval(&self) -> Duration {
        clamp_interval(
            self.refresh
                .interval_secs
                .unwrap_or(defaults::DEFAULT_REFRESH_INTERVAL_SECS),
        )
    }

    /// Poll cadence for import job progress.
    pub fn job_interval(&self) -> Duration {
        clamp_interval(
            self.refresh
                .job_interval_secs
                .unwrap_or(defaults::DEFAULT_JOB_INTERVAL_SECS),
        )
    }

    /// Poll cadence for the system dashboard.
    pub fn dashboard_interval(&self) -> Duration {
        clamp_interval(
            self.refresh
                .dashboard_interval_secs
                .unwrap_or(defaults::DEFAULT_DASHBOARD_INTERVAL_SECS),
        )
    }

    /// Quiescence window for free-text search inputs.
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(
            self.filters
                .debounce_ms
                .unwrap_or(defaults::DEFAULT_DEBOUNCE_MS),
        )
    }

    pub fn per_page(&self) -> u64 {
        self.filters.per_page.unwrap_or(defaults::DEFAULT_PER_PAGE)
    }
}

fn clamp_interval(secs: u64) -> Duration {
    Duration::from_secs(secs.clamp(defaults::MIN_INTERVAL_SECS, defaults::MAX_INTERVAL_SECS))
}
