use clap::ArgMatches;
use tracing::{error, info};

use docket_core::events;
use docket_core::filters::{FilterSession, FilterState};
use docket_core::pagination::Page;

use super::helpers::{build_client, load_config_with_warning, many};
use crate::table::TableFormatter;

/// Build the filter selection from `--filter` and `--search`.
pub(crate) fn filters_from_args(matches: &ArgMatches) -> Result<FilterState, Box<dyn std::error::Error>> {
    let mut filters = FilterState::new();
    for pair in many(matches, "filter") {
        filters.set_pair(pair)?;
    }
    // `search` reads its query from stdin and has no --search flag
    if let Some(search) = matches.try_get_one::<String>("search").ok().flatten() {
        filters.set_search(search.clone());
    }
    Ok(filters)
}

pub(crate) fn print_page(page: &Page<serde_json::Value>) {
    if page.is_empty() {
        println!("No results.");
        return;
    }
    let formatter = TableFormatter::new(&page.data);
    formatter.print_table(&page.data);
    println!(
        "{} (page {} of {})",
        page.summary(),
        page.current_page,
        page.last_page
    );
}

pub(crate) async fn handle_list_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let endpoint = matches
        .get_one::<String>("endpoint")
        .ok_or("Endpoint argument is required")?;
    let page_number = matches.get_one::<u64>("page").copied().unwrap_or(1);
    let json_output = matches.get_flag("json");
    let filters = match filters_from_args(matches) {
        Ok(filters) => filters,
        Err(e) => {
            eprintln!("❌ {}", e);
            error!(event = "cli.list_invalid_filter", error = %e);
            return Err(e);
        }
    };

    info!(
        event = "cli.list_started",
        endpoint = %endpoint,
        page = page_number,
        json_output = json_output
    );

    let config = load_config_with_warning(matches);
    let client = build_client(&config)?;
    let mut session: FilterSession<serde_json::Value> =
        FilterSession::new(endpoint.as_str()).with_per_page(config.per_page());

    match session.load(&client, filters, page_number).await {
        Ok(page) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(page)?);
            } else {
                print_page(page);
            }
            info!(event = "cli.list_completed", count = page.data.len(), total = page.total);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to list {}: {}", endpoint, e);
            error!(event = "cli.list_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}
