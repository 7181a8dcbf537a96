use crate::errors::DocketError;

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Invalid filter '{value}': expected key=value")]
    InvalidPair { value: String },

    #[error("'{key}' is reserved and cannot be used as a filter")]
    ReservedKey { key: String },
}

impl DocketError for FilterError {
    fn error_code(&self) -> &'static str {
        match self {
            FilterError::InvalidPair { .. } => "FILTER_INVALID_PAIR",
            FilterError::ReservedKey { .. } => "FILTER_RESERVED_KEY",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}
