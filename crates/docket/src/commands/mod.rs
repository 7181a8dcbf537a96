use clap::ArgMatches;
use tracing::error;

use docket_core::events;

pub mod helpers;

mod action;
mod completions;
mod config;
mod import;
mod job;
mod list;
mod search;
mod watch;
mod workflow;

pub async fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let command = matches.subcommand_name().unwrap_or("none");
    events::log_app_startup(command);

    let result = match matches.subcommand() {
        Some(("list", sub_matches)) => list::handle_list_command(sub_matches).await,
        Some(("search", sub_matches)) => search::handle_search_command(sub_matches).await,
        Some(("watch", sub_matches)) => watch::handle_watch_command(sub_matches).await,
        Some(("job", sub_matches)) => job::handle_job_command(sub_matches).await,
        Some(("action", sub_matches)) => action::handle_action_command(sub_matches).await,
        Some(("import", sub_matches)) => import::handle_import_command(sub_matches).await,
        Some(("workflow", sub_matches)) => workflow::handle_workflow_command(sub_matches).await,
        Some(("config", sub_matches)) => config::handle_config_command(sub_matches),
        Some(("completions", sub_matches)) => {
            completions::handle_completions_command(sub_matches)
        }
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    };

    events::log_app_shutdown(command, result.is_ok());
    result
}
