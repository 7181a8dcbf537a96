use std::path::PathBuf;

use clap::ArgMatches;
use tracing::{error, info};

use docket_core::api::upload_import;
use docket_core::events;
use docket_core::imports::{ImportConfig, ImportRequest, parse_mapping};

use super::helpers::{build_client, load_config_with_warning, many};

fn request_from_args(matches: &ArgMatches) -> Result<ImportRequest, Box<dyn std::error::Error>> {
    let required = |id: &str| -> Result<String, Box<dyn std::error::Error>> {
        matches
            .get_one::<String>(id)
            .cloned()
            .ok_or_else(|| format!("--{} is required", id).into())
    };

    Ok(ImportRequest {
        name: required("name")?,
        entity_type: required("entity-type")?,
        description: matches.get_one::<String>("description").cloned(),
        file: PathBuf::from(required("file")?),
        config: ImportConfig {
            field_mapping: parse_mapping(&many(matches, "map"))?,
            skip_header: matches.get_flag("skip-header"),
            update_existing: matches.get_flag("update-existing"),
            validate_only: matches.get_flag("validate-only"),
        },
    })
}

pub(crate) async fn handle_import_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let endpoint = matches
        .get_one::<String>("endpoint")
        .ok_or("Endpoint argument is required")?;

    let request = request_from_args(matches)?;
    if let Err(e) = request.validate() {
        eprintln!("❌ Invalid import: {}", e);
        error!(event = "cli.import_invalid", error = %e);
        return Err(e.into());
    }

    info!(
        event = "cli.import_started",
        endpoint = %endpoint,
        file = %request.file.display(),
        columns = request.config.field_mapping.len()
    );

    let config = load_config_with_warning(matches);
    let client = build_client(&config)?;

    match upload_import(&client, endpoint, &request).await {
        Ok(outcome) => {
            println!("✅ {}", outcome.display_message());
            if let Some(id) = outcome.extra.get("id") {
                println!("   Import id: {}", id);
            }
            info!(event = "cli.import_completed", endpoint = %endpoint);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Import failed: {}", e);
            if let docket_core::ApiError::Validation { fields, .. } = &e {
                for (field, messages) in fields {
                    eprintln!("   {}: {}", field, messages.join(", "));
                }
            }
            error!(event = "cli.import_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}
