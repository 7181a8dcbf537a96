use std::collections::BTreeMap;

use crate::errors::DocketError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Request to '{path}' timed out")]
    Timeout { path: String },

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Action rejected: {message}")]
    ActionRejected { message: String },

    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Whether the next poll tick is a reasonable retry.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network { .. } | ApiError::Timeout { .. } => true,
            ApiError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl DocketError for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            ApiError::Network { .. } => "API_NETWORK_ERROR",
            ApiError::Timeout { .. } => "API_TIMEOUT",
            ApiError::Status { .. } => "API_STATUS_ERROR",
            ApiError::Validation { .. } => "API_VALIDATION_FAILED",
            ApiError::Decode { .. } => "API_DECODE_ERROR",
            ApiError::ActionRejected { .. } => "API_ACTION_REJECTED",
            ApiError::InvalidUrl { .. } => "API_INVALID_URL",
            ApiError::Io { .. } => "API_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ApiError::Validation { .. } | ApiError::ActionRejected { .. } | ApiError::InvalidUrl { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(
            ApiError::Timeout {
                path: "/x".to_string()
            }
            .is_transient()
        );
        assert!(
            ApiError::Status {
                status: 503,
                body: String::new()
            }
            .is_transient()
        );
        assert!(
            !ApiError::Status {
                status: 404,
                body: String::new()
            }
            .is_transient()
        );
        assert!(
            !ApiError::ActionRejected {
                message: "no".to_string()
            }
            .is_transient()
        );
    }

    #[test]
    fn test_action_rejected_display() {
        let error = ApiError::ActionRejected {
            message: "Import is already running".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Action rejected: Import is already running"
        );
        assert_eq!(error.error_code(), "API_ACTION_REJECTED");
        assert!(error.is_user_error());
    }
}
