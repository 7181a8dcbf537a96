use std::ops::ControlFlow;
use std::time::Duration;

use clap::ArgMatches;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use docket_core::ApiClient;
use docket_core::refresh::{
    EndpointSource, FetchOutcome, LiveSwitch, RefreshController, Snapshot, SystemSnapshot, run,
};

use super::helpers::{build_client, cancel_on_ctrl_c, load_config_with_warning};

#[derive(Serialize)]
struct SnapshotLine<'a, T> {
    updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

fn print_line<T: Serialize + Snapshot>(controller: &RefreshController<T>, outcome: FetchOutcome) {
    let line = SnapshotLine {
        updated_at: controller.last_updated().map(|t| t.to_rfc3339()),
        snapshot: match outcome {
            FetchOutcome::Failed => None,
            _ => controller.latest(),
        },
        error: match outcome {
            FetchOutcome::Failed => controller.last_error(),
            _ => None,
        },
    };
    match serde_json::to_string(&line) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("❌ Could not encode snapshot: {}", e),
    }
}

async fn watch<T>(
    client: &ApiClient,
    endpoint: &str,
    interval: Duration,
    fetch_timeout: Duration,
    max_ticks: Option<u64>,
) where
    T: Snapshot + DeserializeOwned + Serialize + Send + 'static,
{
    let source = EndpointSource::new(client, endpoint);
    let mut controller: RefreshController<T> =
        RefreshController::new(interval, true).with_fetch_timeout(fetch_timeout);
    let (switch, live) = LiveSwitch::new(true);
    cancel_on_ctrl_c(switch);

    let mut ticks = 0u64;
    let outcome = run(
        &mut controller,
        &source,
        live,
        |controller, outcome| {
            print_line(controller, outcome);
            ticks += 1;
            match max_ticks {
                Some(max) if ticks >= max => ControlFlow::Break(()),
                _ => ControlFlow::Continue(()),
            }
        },
        || async {},
    )
    .await;

    info!(event = "cli.watch_completed", outcome = ?outcome, ticks = ticks);
}

pub(crate) async fn handle_watch_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let endpoint = matches
        .get_one::<String>("endpoint")
        .ok_or("Endpoint argument is required")?;
    let max_ticks = matches.get_one::<u64>("max-ticks").copied();
    let dashboard = matches.get_flag("dashboard");

    let config = load_config_with_warning(matches);
    let client = build_client(&config)?;
    let interval = match matches.get_one::<u64>("interval") {
        Some(secs) => Duration::from_secs(*secs),
        None if dashboard => config.dashboard_interval(),
        None => config.refresh_interval(),
    };

    info!(
        event = "cli.watch_started",
        endpoint = %endpoint,
        interval_secs = interval.as_secs(),
        dashboard = dashboard
    );

    if dashboard {
        watch::<SystemSnapshot>(&client, endpoint, interval, config.request_timeout(), max_ticks).await;
    } else {
        watch::<serde_json::Value>(&client, endpoint, interval, config.request_timeout(), max_ticks).await;
    }
    Ok(())
}
