use clap::ArgMatches;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use docket_core::filters::{Debouncer, FilterSession, FilterState};
use docket_core::ApiClient;

use super::helpers::{build_client, load_config_with_warning};
use super::list::{filters_from_args, print_page};

/// Interactive search: every stdin line replaces the search text, and the
/// list is fetched once input has been quiet for the debounce window.
pub(crate) async fn handle_search_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let endpoint = matches
        .get_one::<String>("endpoint")
        .ok_or("Endpoint argument is required")?;
    let base_filters = filters_from_args(matches)?;

    let config = load_config_with_warning(matches);
    let client = build_client(&config)?;
    let window = config.debounce_window();
    let mut session: FilterSession<serde_json::Value> =
        FilterSession::new(endpoint.as_str()).with_per_page(config.per_page());

    info!(
        event = "cli.search_started",
        endpoint = %endpoint,
        debounce_ms = window.as_millis() as u64
    );

    let (debouncer, mut ready) = Debouncer::new(window);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut searches = 0u64;

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(text) => {
                    let mut filters = base_filters.clone();
                    filters.set_search(text.trim().to_string());
                    debouncer.push(filters);
                }
                None => break,
            },
            Some(filters) = ready.recv() => {
                run_search(&mut session, &client, filters, &mut searches).await;
            }
        }
    }

    // end of input: run whatever is still pending, then stop
    debouncer.finish();
    while let Some(filters) = ready.recv().await {
        run_search(&mut session, &client, filters, &mut searches).await;
    }

    info!(event = "cli.search_completed", searches = searches);
    Ok(())
}

async fn run_search(
    session: &mut FilterSession<serde_json::Value>,
    client: &ApiClient,
    filters: FilterState,
    searches: &mut u64,
) {
    *searches += 1;
    match session.apply(client, filters).await {
        Ok(page) => print_page(page),
        Err(e) => {
            eprintln!("❌ Search failed: {}", e);
            warn!(event = "cli.search_failed", error = %e);
        }
    }
}
