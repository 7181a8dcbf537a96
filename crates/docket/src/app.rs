use clap::{Arg, ArgAction, Command};
use clap_complete::Shell;

pub fn build_cli() -> Command {
    Command::new("docket")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Browse, watch and edit the document console from a terminal")
        .long_about("docket talks to the document console's JSON API. It lists filtered collections, follows status endpoints until they settle, posts actions and imports, and edits workflow drafts offline before saving them in one request.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .help("Console base URL (overrides config and DOCKET_BASE_URL)")
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("list")
                .about("Fetch one page of a filtered collection")
                .arg(
                    Arg::new("endpoint")
                        .help("List endpoint, e.g. /documents")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("filter")
                        .long("filter")
                        .short('f')
                        .help("Filter as key=value (repeatable; 'all' and empty values are ignored)")
                        .action(ArgAction::Append)
                )
                .arg(
                    Arg::new("search")
                        .long("search")
                        .short('s')
                        .help("Free-text search")
                )
                .arg(
                    Arg::new("page")
                        .long("page")
                        .short('p')
                        .help("Page number")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("1")
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("search")
                .about("Search a collection interactively, one query per stdin line")
                .long_about("Reads search text from stdin, one query per line. A request is sent only after input has been quiet for the debounce window ([filters] debounce_ms), so fast typing or pasted input costs one request.")
                .arg(
                    Arg::new("endpoint")
                        .help("List endpoint, e.g. /audit")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("filter")
                        .long("filter")
                        .short('f')
                        .help("Fixed filter as key=value (repeatable)")
                        .action(ArgAction::Append)
                )
        )
        .subcommand(
            Command::new("watch")
                .about("Poll a status endpoint and print each snapshot as a JSON line")
                .arg(
                    Arg::new("endpoint")
                        .help("Status endpoint, e.g. /dashboard/status")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .short('i')
                        .help("Seconds between polls (overrides config)")
                        .value_parser(clap::value_parser!(u64).range(1..=3600))
                )
                .arg(
                    Arg::new("max-ticks")
                        .long("max-ticks")
                        .help("Stop after this many snapshots")
                        .value_parser(clap::value_parser!(u64).range(1..))
                )
                .arg(
                    Arg::new("dashboard")
                        .long("dashboard")
                        .help("Treat the endpoint as the system dashboard (status, cache and health sections)")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("job")
                .about("Follow an import job until it completes, fails or is cancelled")
                .arg(
                    Arg::new("endpoint")
                        .help("Job status endpoint, e.g. /imports/7/status")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("detail")
                        .long("detail")
                        .help("Endpoint fetched once when the job ends (default: status endpoint without /status)")
                )
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .short('i')
                        .help("Seconds between polls (overrides config)")
                        .value_parser(clap::value_parser!(u64).range(1..=3600))
                )
        )
        .subcommand(
            Command::new("action")
                .about("POST to an action endpoint (process, cancel, delete, clear cache)")
                .arg(
                    Arg::new("endpoint")
                        .help("Action endpoint, e.g. /imports/7/cancel")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("data")
                        .long("data")
                        .short('d')
                        .help("JSON request body (default: {})")
                )
        )
        .subcommand(
            Command::new("import")
                .about("Upload a data file as a new import")
                .arg(
                    Arg::new("endpoint")
                        .help("Import creation endpoint, e.g. /imports")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("file")
                        .long("file")
                        .help("Data file to upload")
                        .required(true)
                )
                .arg(
                    Arg::new("name")
                        .long("name")
                        .short('n')
                        .help("Import name")
                        .required(true)
                )
                .arg(
                    Arg::new("entity-type")
                        .long("entity-type")
                        .short('t')
                        .help("Entity type the rows become")
                        .required(true)
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .help("Free-text description")
                )
                .arg(
                    Arg::new("map")
                        .long("map")
                        .short('m')
                        .help("Column mapping as column=field (repeatable)")
                        .action(ArgAction::Append)
                        .required(true)
                )
                .arg(
                    Arg::new("skip-header")
                        .long("skip-header")
                        .help("First row is a header")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("update-existing")
                        .long("update-existing")
                        .help("Update records that already exist")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("validate-only")
                        .long("validate-only")
                        .help("Validate the file without importing")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("workflow")
                .about("Edit and validate workflow drafts")
                .subcommand_required(true)
                .subcommand(
                    Command::new("validate")
                        .about("Check a draft file for problems")
                        .arg(
                            Arg::new("draft")
                                .help("Draft JSON file")
                                .required(true)
                                .index(1)
                        )
                        .arg(
                            Arg::new("json")
                                .long("json")
                                .help("Output in JSON format")
                                .action(ArgAction::SetTrue)
                        )
                )
                .subcommand(
                    Command::new("edit")
                        .about("Apply local edits to a draft file (created if missing)")
                        .arg(
                            Arg::new("draft")
                                .help("Draft JSON file")
                                .required(true)
                                .index(1)
                        )
                        .arg(
                            Arg::new("add-node")
                                .long("add-node")
                                .help("Add a node as kind:label (start, task, approval, decision, end)")
                                .action(ArgAction::Append)
                        )
                        .arg(
                            Arg::new("delete-node")
                                .long("delete-node")
                                .help("Delete a node and its connections")
                                .action(ArgAction::Append)
                        )
                        .arg(
                            Arg::new("connect")
                                .long("connect")
                                .help("Connect two nodes as source:target")
                                .action(ArgAction::Append)
                        )
                        .arg(
                            Arg::new("disconnect")
                                .long("disconnect")
                                .help("Remove a connection by id")
                                .action(ArgAction::Append)
                        )
                )
                .subcommand(
                    Command::new("save")
                        .about("Validate a draft and save it to the console")
                        .arg(
                            Arg::new("draft")
                                .help("Draft JSON file")
                                .required(true)
                                .index(1)
                        )
                        .arg(
                            Arg::new("endpoint")
                                .help("Workflow save endpoint, e.g. /workflows/3")
                                .required(true)
                                .index(2)
                        )
                        .arg(
                            Arg::new("force")
                                .long("force")
                                .help("Save even when validation reports problems")
                                .action(ArgAction::SetTrue)
                        )
                )
        )
        .subcommand(
            Command::new("config")
                .about("Print the effective configuration as TOML")
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Target shell")
                        .required(true)
                        .index(1)
                        .value_parser(clap::value_parser!(Shell))
                )
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_build() {
        let app = build_cli();
        assert_eq!(app.get_name(), "docket");
        app.debug_assert();
    }

    #[test]
    fn test_cli_list_filters_and_page() {
        let matches = build_cli()
            .try_get_matches_from(vec![
                "docket",
                "list",
                "/documents",
                "-f",
                "estado=activo",
                "--filter",
                "tipo=pdf",
                "--page",
                "3",
            ])
            .unwrap();
        let list = matches.subcommand_matches("list").unwrap();
        let filters: Vec<&String> = list.get_many::<String>("filter").unwrap().collect();
        assert_eq!(filters, vec!["estado=activo", "tipo=pdf"]);
        assert_eq!(list.get_one::<u64>("page"), Some(&3));
    }

    #[test]
    fn test_cli_list_rejects_page_zero() {
        let result = build_cli().try_get_matches_from(vec!["docket", "list", "/documents", "-p", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_global_base_url_after_subcommand() {
        let matches = build_cli()
            .try_get_matches_from(vec!["docket", "watch", "/status", "--base-url", "http://x.test"])
            .unwrap();
        let watch = matches.subcommand_matches("watch").unwrap();
        assert_eq!(
            watch.get_one::<String>("base-url").map(String::as_str),
            Some("http://x.test")
        );
    }

    #[test]
    fn test_cli_import_requires_mapping() {
        let result = build_cli().try_get_matches_from(vec![
            "docket",
            "import",
            "/imports",
            "--file",
            "a.csv",
            "--name",
            "A",
            "--entity-type",
            "documentos",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_workflow_edit_repeatable_args() {
        let matches = build_cli()
            .try_get_matches_from(vec![
                "docket",
                "workflow",
                "edit",
                "draft.json",
                "--add-node",
                "start:Inicio",
                "--add-node",
                "end:Fin",
                "--connect",
                "local-1:local-2",
            ])
            .unwrap();
        let edit = matches
            .subcommand_matches("workflow")
            .and_then(|m| m.subcommand_matches("edit"))
            .unwrap();
        assert_eq!(edit.get_many::<String>("add-node").unwrap().count(), 2);
    }

    #[test]
    fn test_cli_completions_shell() {
        let matches = build_cli()
            .try_get_matches_from(vec!["docket", "completions", "zsh"])
            .unwrap();
        let sub = matches.subcommand_matches("completions").unwrap();
        assert_eq!(sub.get_one::<Shell>("shell"), Some(&Shell::Zsh));
    }
}
