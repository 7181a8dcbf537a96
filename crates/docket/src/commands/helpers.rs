use clap::ArgMatches;
use tracing::{info, warn};

use docket_core::api::ApiClient;
use docket_core::config::DocketConfig;
use docket_core::events;
use docket_core::refresh::LiveSwitch;

/// Load configuration with warning on errors.
///
/// Falls back to defaults if config loading fails, but notifies the user via:
/// - stderr message for immediate visibility
/// - structured log event `cli.config.load_failed` for debugging
///
/// A `--base-url` flag overrides whatever was loaded.
pub fn load_config_with_warning(matches: &ArgMatches) -> DocketConfig {
    let mut config = match DocketConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.docket/config.toml and ./.docket/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            DocketConfig::default()
        }
    };

    if let Some(url) = matches.get_one::<String>("base-url") {
        config.server.base_url = Some(url.clone());
    }

    config
}

/// Build the HTTP client for the effective configuration.
pub fn build_client(config: &DocketConfig) -> Result<ApiClient, Box<dyn std::error::Error>> {
    config.validate()?;
    let client = ApiClient::from_config(config)?;
    events::log_backend_resolved(client.base_url(), config.request_timeout().as_secs());
    Ok(client)
}

/// Collect a repeatable string argument.
pub fn many<'a>(matches: &'a ArgMatches, id: &str) -> Vec<&'a str> {
    matches
        .get_many::<String>(id)
        .map(|values| values.map(String::as_str).collect())
        .unwrap_or_default()
}

/// Stop a polling loop on Ctrl-C by dropping its live switch.
pub fn cancel_on_ctrl_c(switch: LiveSwitch) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!(event = "cli.polling_interrupted");
        }
        drop(switch);
    });
}
