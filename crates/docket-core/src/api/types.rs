use serde::{Deserialize, Serialize};

fn default_success() -> bool {
    true
}

/// Result body of a POST action endpoint.
///
/// Endpoints that omit `success` are treated as successful; HTTP-level
/// failures never reach this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ActionOutcome {
    /// Message to show the user, falling back to a generic one.
    pub fn display_message(&self) -> &str {
        match (&self.message, self.success) {
            (Some(m), _) if !m.trim().is_empty() => m.as_str(),
            (_, true) => "Operation completed",
            (_, false) => "Operation failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_keeps_extra_fields() {
        let outcome: ActionOutcome = serde_json::from_str(
            r#"{"success": true, "message": "Cache cleared", "freed_bytes": 2048}"#,
        )
        .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.display_message(), "Cache cleared");
        assert_eq!(outcome.extra["freed_bytes"], 2048);
    }

    #[test]
    fn test_missing_success_defaults_true() {
        let outcome: ActionOutcome = serde_json::from_str(r#"{"id": 9}"#).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.display_message(), "Operation completed");
    }

    #[test]
    fn test_failure_without_message() {
        let outcome: ActionOutcome = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(outcome.display_message(), "Operation failed");
    }
}
