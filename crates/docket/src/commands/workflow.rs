use std::path::{Path, PathBuf};

use clap::ArgMatches;
use tracing::{error, info};

use docket_core::RecordId;
use docket_core::events;
use docket_core::state::{Command, ConsoleStore, DispatchError, Event, Store};
use docket_core::workflow::persistence::{load_draft, save_draft};
use docket_core::workflow::{
    DraftAction, DraftChange, NodeKind, Position, Violation, WorkflowDraft, validate_draft,
};

use super::helpers::{build_client, load_config_with_warning, many};

/// Horizontal spacing of nodes added from the command line.
const NODE_SPACING: f64 = 220.0;

pub(crate) async fn handle_workflow_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("validate", sub_matches)) => handle_validate(sub_matches),
        Some(("edit", sub_matches)) => handle_edit(sub_matches),
        Some(("save", sub_matches)) => handle_save(sub_matches).await,
        _ => {
            error!(event = "cli.workflow_subcommand_unknown");
            Err("Unknown workflow command".into())
        }
    }
}

fn draft_path(matches: &ArgMatches) -> Result<PathBuf, Box<dyn std::error::Error>> {
    matches
        .get_one::<String>("draft")
        .map(PathBuf::from)
        .ok_or_else(|| "Draft argument is required".into())
}

fn print_violations(violations: &[Violation]) {
    for violation in violations {
        match violation.element {
            Some(id) => eprintln!("   [{}] {}", id, violation.message),
            None => eprintln!("   {}", violation.message),
        }
    }
}

fn handle_validate(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let path = draft_path(matches)?;
    let json_output = matches.get_flag("json");

    info!(event = "cli.workflow_validate_started", path = %path.display());

    let draft = load_draft(&path)?;
    let violations = validate_draft(&draft);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&violations)?);
    } else if violations.is_empty() {
        println!(
            "✅ Draft is valid ({} nodes, {} connections)",
            draft.nodes.len(),
            draft.edges.len()
        );
    } else {
        eprintln!("❌ Draft has {} problem(s):", violations.len());
        print_violations(&violations);
    }

    info!(
        event = "cli.workflow_validate_completed",
        violations = violations.len()
    );

    if violations.is_empty() {
        Ok(())
    } else {
        Err(format!("Draft has {} problem(s)", violations.len()).into())
    }
}

fn open_or_create(path: &Path) -> Result<WorkflowDraft, Box<dyn std::error::Error>> {
    if path.exists() {
        return Ok(load_draft(path)?);
    }
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    info!(event = "cli.workflow_draft_created", path = %path.display());
    Ok(WorkflowDraft {
        name,
        ..WorkflowDraft::default()
    })
}

/// Parse the edit flags into actions: additions, connections,
/// disconnections, then deletions.
fn actions_from_args(
    matches: &ArgMatches,
    existing_nodes: usize,
) -> Result<Vec<DraftAction>, Box<dyn std::error::Error>> {
    let mut actions = Vec::new();

    for (offset, raw) in many(matches, "add-node").into_iter().enumerate() {
        let (kind, label) = raw
            .split_once(':')
            .ok_or_else(|| format!("Invalid node '{}': expected kind:label", raw))?;
        let kind = NodeKind::parse(kind).ok_or_else(|| format!("Unknown node kind '{}'", kind))?;
        actions.push(DraftAction::AddNode {
            kind,
            label: label.to_string(),
            position: Position {
                x: (existing_nodes + offset) as f64 * NODE_SPACING,
                y: 0.0,
            },
        });
    }

    for raw in many(matches, "connect") {
        let (source, target) = raw
            .split_once(':')
            .ok_or_else(|| format!("Invalid connection '{}': expected source:target", raw))?;
        actions.push(DraftAction::Connect {
            source: source.parse::<RecordId>()?,
            target: target.parse::<RecordId>()?,
            label: None,
        });
    }

    for id in many(matches, "disconnect") {
        actions.push(DraftAction::Disconnect { id: id.parse()? });
    }

    for id in many(matches, "delete-node") {
        actions.push(DraftAction::DeleteNode { id: id.parse()? });
    }

    Ok(actions)
}

fn describe(change: &DraftChange) -> String {
    match change {
        DraftChange::NodeAdded { id } => format!("added node {}", id),
        DraftChange::NodeUpdated { id } => format!("updated node {}", id),
        DraftChange::NodeDeleted { id, removed_edges } => format!(
            "deleted node {} and {} connection(s)",
            id,
            removed_edges.len()
        ),
        DraftChange::Connected { id } => format!("added connection {}", id),
        DraftChange::Disconnected { id } => format!("removed connection {}", id),
    }
}

fn handle_edit(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let path = draft_path(matches)?;
    let mut draft = open_or_create(&path)?;
    let actions = actions_from_args(matches, draft.nodes.len())?;

    info!(
        event = "cli.workflow_edit_started",
        path = %path.display(),
        actions = actions.len()
    );

    // the file is only written once every edit applied
    for action in actions {
        let change = draft.apply(action)?;
        println!("{}", describe(&change));
    }
    save_draft(&draft, &path)?;

    let violations = validate_draft(&draft);
    if !violations.is_empty() {
        eprintln!("⚠️  Draft has {} problem(s):", violations.len());
        print_violations(&violations);
    }

    info!(event = "cli.workflow_edit_completed", path = %path.display());
    Ok(())
}

async fn handle_save(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let path = draft_path(matches)?;
    let endpoint = matches
        .get_one::<String>("endpoint")
        .ok_or("Endpoint argument is required")?;
    let force = matches.get_flag("force");

    info!(
        event = "cli.workflow_save_started",
        path = %path.display(),
        endpoint = %endpoint,
        force = force
    );

    let draft = load_draft(&path)?;
    let config = load_config_with_warning(matches);
    let client = build_client(&config)?;
    let mut store: ConsoleStore<_> =
        ConsoleStore::new(client, endpoint.as_str(), config.refresh_interval()).with_draft(draft);

    match store
        .dispatch(Command::SaveDraft {
            path: endpoint.clone(),
            force,
        })
        .await
    {
        Ok(dispatched) => {
            for event in dispatched {
                if let Event::DraftSaved { message, .. } = event {
                    println!("✅ {}", message);
                }
            }
            info!(event = "cli.workflow_save_completed", endpoint = %endpoint);
            Ok(())
        }
        Err(DispatchError::InvalidDraft { violations }) => {
            eprintln!(
                "❌ Not saved: draft has {} problem(s) (use --force to save anyway):",
                violations.len()
            );
            print_violations(&violations);
            error!(event = "cli.workflow_save_refused", violations = violations.len());
            Err(format!("Draft has {} problem(s)", violations.len()).into())
        }
        Err(e) => {
            eprintln!("❌ Save failed: {}", e);
            error!(event = "cli.workflow_save_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}
