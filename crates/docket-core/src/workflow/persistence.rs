use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::records::DraftError;
use crate::workflow::draft::WorkflowDraft;

fn cleanup_temp_file(temp_file: &Path, original_error: &std::io::Error) {
    if let Err(cleanup_err) = fs::remove_file(temp_file) {
        warn!(
            event = "core.workflow.temp_file_cleanup_failed",
            temp_file = %temp_file.display(),
            original_error = %original_error,
            cleanup_error = %cleanup_err,
        );
    }
}

/// Load a draft from a JSON file.
pub fn load_draft(path: &Path) -> Result<WorkflowDraft, DraftError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| DraftError::ParseError {
        message: format!("{}: {}", path.display(), e),
    })
}

/// Write a draft to a JSON file via a temp file and rename.
pub fn save_draft(draft: &WorkflowDraft, path: &Path) -> Result<(), DraftError> {
    let json = serde_json::to_string_pretty(draft).map_err(|e| DraftError::ParseError {
        message: e.to_string(),
    })?;

    let temp_file = path.with_extension("json.tmp");

    if let Err(e) = fs::write(&temp_file, &json) {
        cleanup_temp_file(&temp_file, &e);
        return Err(e.into());
    }

    if let Err(e) = fs::rename(&temp_file, path) {
        cleanup_temp_file(&temp_file, &e);
        return Err(e.into());
    }

    info!(
        event = "core.workflow.draft_saved",
        path = %path.display(),
        nodes = draft.nodes.len(),
        edges = draft.edges.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::draft::DraftAction;
    use crate::workflow::types::{NodeKind, Position};

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.json");

        let mut draft = WorkflowDraft::default();
        draft.name = "intake".to_string();
        draft
            .apply(DraftAction::AddNode {
                kind: NodeKind::Start,
                label: "Start".to_string(),
                position: Position::default(),
            })
            .unwrap();

        save_draft(&draft, &path).unwrap();
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = load_draft(&path).unwrap();
        assert_eq!(loaded, draft);
    }

    #[test]
    fn test_load_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_draft(&path),
            Err(DraftError::ParseError { .. })
        ));
    }

    #[test]
    fn test_load_rejects_local_id_at_counter_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.json");
        fs::write(
            &path,
            r#"{"name": "x", "nodes": [{"id": "local-18446744073709551615", "kind": "start", "label": "Inicio"}], "edges": []}"#,
        )
        .unwrap();
        assert!(matches!(
            load_draft(&path),
            Err(DraftError::ParseError { .. })
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_draft(&dir.path().join("missing.json")),
            Err(DraftError::IoError { .. })
        ));
    }
}
