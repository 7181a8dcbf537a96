use clap::ArgMatches;
use tracing::{error, info};

use docket_core::events;
use docket_core::state::{Command, ConsoleStore, Event, Store};

use super::helpers::{build_client, load_config_with_warning};

pub(crate) async fn handle_action_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let endpoint = matches
        .get_one::<String>("endpoint")
        .ok_or("Endpoint argument is required")?;
    let body: serde_json::Value = match matches.get_one::<String>("data") {
        Some(raw) => serde_json::from_str(raw).map_err(|e| format!("Invalid --data JSON: {}", e))?,
        None => serde_json::json!({}),
    };

    info!(event = "cli.action_started", endpoint = %endpoint);

    let config = load_config_with_warning(matches);
    let client = build_client(&config)?;
    let mut store: ConsoleStore<_> =
        ConsoleStore::new(client, endpoint.as_str(), config.refresh_interval());

    match store
        .dispatch(Command::RunAction {
            path: endpoint.clone(),
            body,
        })
        .await
    {
        Ok(dispatched) => {
            for event in dispatched {
                if let Event::ActionCompleted { message, .. } = event {
                    println!("✅ {}", message);
                }
            }
            info!(event = "cli.action_completed", endpoint = %endpoint);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Action failed: {}", e);
            error!(event = "cli.action_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}
