use clap::ArgMatches;
use tracing::info;

use docket_core::config::{DocketConfig, FilterConfig, RefreshConfig, ServerConfig};

use super::helpers::load_config_with_warning;

/// Every setting with defaults filled in.
fn effective(config: &DocketConfig) -> DocketConfig {
    DocketConfig {
        server: ServerConfig {
            base_url: Some(config.base_url().to_string()),
            csrf_token: config.server.csrf_token.as_ref().map(|_| "<set>".to_string()),
            timeout_secs: Some(config.request_timeout().as_secs()),
        },
        refresh: RefreshConfig {
            interval_secs: Some(config.refresh_interval().as_secs()),
            job_interval_secs: Some(config.job_interval().as_secs()),
            dashboard_interval_secs: Some(config.dashboard_interval().as_secs()),
        },
        filters: FilterConfig {
            debounce_ms: Some(config.debounce_window().as_millis() as u64),
            per_page: Some(config.per_page()),
        },
    }
}

pub(crate) fn handle_config_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_warning(matches);
    config.validate()?;

    print!("{}", toml::to_string_pretty(&effective(&config))?);

    info!(event = "cli.config_completed");
    Ok(())
}
