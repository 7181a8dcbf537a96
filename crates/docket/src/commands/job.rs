use std::ops::ControlFlow;
use std::time::Duration;

use clap::ArgMatches;
use tracing::{error, info, warn};

use docket_core::api::fetch_snapshot;
use docket_core::refresh::{
    EndpointSource, FetchOutcome, JobProgress, JobState, LiveSwitch, RefreshController, RunOutcome,
    run,
};

use super::helpers::{build_client, cancel_on_ctrl_c, load_config_with_warning};

/// `/imports/7/status` -> `/imports/7`
fn detail_endpoint(status_endpoint: &str) -> String {
    let trimmed = status_endpoint.trim_end_matches('/');
    trimmed
        .strip_suffix("/status")
        .unwrap_or(trimmed)
        .to_string()
}

pub(crate) async fn handle_job_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let endpoint = matches
        .get_one::<String>("endpoint")
        .ok_or("Endpoint argument is required")?;
    let detail = matches
        .get_one::<String>("detail")
        .cloned()
        .unwrap_or_else(|| detail_endpoint(endpoint));

    let config = load_config_with_warning(matches);
    let client = build_client(&config)?;
    let interval = matches
        .get_one::<u64>("interval")
        .map(|secs| Duration::from_secs(*secs))
        .unwrap_or_else(|| config.job_interval());

    info!(
        event = "cli.job_started",
        endpoint = %endpoint,
        detail = %detail,
        interval_secs = interval.as_secs()
    );

    let source = EndpointSource::new(&client, endpoint.as_str());
    let mut controller: RefreshController<JobProgress> =
        RefreshController::new(interval, true).with_fetch_timeout(config.request_timeout());
    let (switch, live) = LiveSwitch::new(true);
    cancel_on_ctrl_c(switch);

    let outcome = run(
        &mut controller,
        &source,
        live,
        |controller, outcome| {
            match (outcome, controller.latest()) {
                (FetchOutcome::Failed, _) => eprintln!(
                    "⚠️  Poll failed: {}",
                    controller.last_error().unwrap_or("unknown error")
                ),
                (_, Some(progress)) => println!("{}", progress.summary()),
                (_, None) => {}
            }
            ControlFlow::Continue(())
        },
        || async {
            match fetch_snapshot::<serde_json::Value, _>(&client, &detail).await {
                Ok(job) => match serde_json::to_string_pretty(&job) {
                    Ok(json) => println!("{}", json),
                    Err(e) => warn!(event = "cli.job_detail_encode_failed", error = %e),
                },
                Err(e) => {
                    eprintln!("⚠️  Could not reload job detail: {}", e);
                    warn!(event = "cli.job_detail_failed", error = %e);
                }
            }
        },
    )
    .await;

    if outcome != RunOutcome::Finished {
        info!(event = "cli.job_interrupted", outcome = ?outcome);
        return Ok(());
    }

    let final_state = controller
        .latest()
        .map(|p| p.state)
        .unwrap_or(JobState::Unknown);
    info!(event = "cli.job_completed", state = %final_state);

    match final_state {
        JobState::Completada => {
            println!("✅ Job completed");
            Ok(())
        }
        state => {
            error!(event = "cli.job_not_completed", state = %state);
            Err(format!("Job ended in state '{}'", state).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_endpoint() {
        assert_eq!(detail_endpoint("/imports/7/status"), "/imports/7");
        assert_eq!(detail_endpoint("/imports/7/status/"), "/imports/7");
        assert_eq!(detail_endpoint("/jobs/7"), "/jobs/7");
    }
}
