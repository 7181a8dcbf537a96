use crate::api::ApiError;
use crate::errors::DocketError;
use crate::pagination::PageError;
use crate::records::DraftError;
use crate::workflow::Violation;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Page(#[from] PageError),
    #[error("Draft has {} problem(s); first: {}", .violations.len(), first_message(.violations))]
    InvalidDraft { violations: Vec<Violation> },
    #[error("Status refresh failed: {message}")]
    RefreshFailed { message: String },
    #[error("This page has no status endpoint")]
    NoStatusEndpoint,
}

fn first_message(violations: &[Violation]) -> &str {
    violations
        .first()
        .map(|v| v.message.as_str())
        .unwrap_or("none")
}

impl DocketError for DispatchError {
    fn error_code(&self) -> &'static str {
        match self {
            DispatchError::Api(e) => e.error_code(),
            DispatchError::Draft(e) => e.error_code(),
            DispatchError::Page(e) => e.error_code(),
            DispatchError::InvalidDraft { .. } => "DISPATCH_INVALID_DRAFT",
            DispatchError::RefreshFailed { .. } => "DISPATCH_REFRESH_FAILED",
            DispatchError::NoStatusEndpoint => "DISPATCH_NO_STATUS_ENDPOINT",
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            DispatchError::Api(e) => e.is_user_error(),
            DispatchError::Draft(e) => e.is_user_error(),
            DispatchError::Page(e) => e.is_user_error(),
            DispatchError::InvalidDraft { .. } => true,
            DispatchError::RefreshFailed { .. } => false,
            DispatchError::NoStatusEndpoint => true,
        }
    }
}
