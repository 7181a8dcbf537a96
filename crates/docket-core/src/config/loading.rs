//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.docket/config.toml`
//! 3. **Project config** - `./.docket/config.toml`
//! 4. **Environment** - `DOCKET_BASE_URL`

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::defaults::BASE_URL_ENV;
use crate::config::types::{DocketConfig, FilterConfig, RefreshConfig, ServerConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be parsed, or if
/// validation of the merged result fails. Missing config files are not errors.
pub fn load_hierarchy() -> Result<DocketConfig, ConfigError> {
    let user_path = user_config_path();
    let project_path = std::env::current_dir()
        .ok()
        .map(|dir| dir.join(".docket").join("config.toml"));

    let mut config = load_from_paths(user_path.as_deref(), project_path.as_deref())?;

    if let Ok(url) = std::env::var(BASE_URL_ENV)
        && !url.trim().is_empty()
    {
        debug!(event = "core.config.env_override_applied", key = BASE_URL_ENV);
        config.server.base_url = Some(url);
    }

    validate_config(&config)?;
    Ok(config)
}

/// Load and merge the user and project config files at explicit paths.
///
/// Missing files are skipped. Does not validate.
pub fn load_from_paths(
    user_path: Option<&Path>,
    project_path: Option<&Path>,
) -> Result<DocketConfig, ConfigError> {
    let mut config = DocketConfig::default();

    for path in [user_path, project_path].into_iter().flatten() {
        match load_config_file(path) {
            Ok(file_config) => {
                debug!(event = "core.config.file_loaded", path = %path.display());
                config = merge_configs(config, file_config);
            }
            Err(ConfigError::ConfigNotFound { .. }) => {}
            Err(e) => return Err(e),
        }
    }

    Ok(config)
}

/// Load a configuration file from the given path.
pub fn load_config_file(path: &Path) -> Result<DocketConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        Err(e) => return Err(ConfigError::IoError { source: e }),
    };

    toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Path of the user-level config file, if a home directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".docket").join("config.toml"))
}

/// Merge two configurations, with override_config taking precedence.
///
/// Override values replace base values only if present.
pub fn merge_configs(base: DocketConfig, override_config: DocketConfig) -> DocketConfig {
    DocketConfig {
        server: ServerConfig {
            base_url: override_config.server.base_url.or(base.server.base_url),
            csrf_token: override_config.server.csrf_token.or(base.server.csrf_token),
            timeout_secs: override_config
                .server
                .timeout_secs
                .or(base.server.timeout_secs),
        },
        refresh: RefreshConfig {
            interval_secs: override_config
                .refresh
                .interval_secs
                .or(base.refresh.interval_secs),
            job_interval_secs: override_config
                .refresh
                .job_interval_secs
                .or(base.refresh.job_interval_secs),
            dashboard_interval_secs: override_config
                .refresh
                .dashboard_interval_secs
                .or(base.refresh.dashboard_interval_secs),
        },
        filters: FilterConfig {
            debounce_ms: override_config
                .filters
                .debounce_ms
                .or(base.filters.debounce_ms),
            per_page: override_config.filters.per_page.or(base.filters.per_page),
        },
    }
}
