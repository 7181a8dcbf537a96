use crate::errors::DocketError;
use crate::records::id::RecordId;

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("Record '{id}' not found")]
    NotFound { id: RecordId },

    #[error("Duplicate record id '{id}'")]
    DuplicateId { id: RecordId },

    #[error("Connection endpoint '{id}' does not exist")]
    UnknownEndpoint { id: RecordId },

    #[error("A connection from '{source_id}' to '{target_id}' already exists")]
    DuplicateConnection {
        source_id: RecordId,
        target_id: RecordId,
    },

    #[error("Invalid record id '{value}': expected an integer or 'local-<n>'")]
    InvalidId { value: String },

    #[error("Failed to parse draft: {message}")]
    ParseError { message: String },

    #[error("IO error on draft file: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl DocketError for DraftError {
    fn error_code(&self) -> &'static str {
        match self {
            DraftError::NotFound { .. } => "RECORD_NOT_FOUND",
            DraftError::DuplicateId { .. } => "DUPLICATE_RECORD_ID",
            DraftError::UnknownEndpoint { .. } => "UNKNOWN_ENDPOINT",
            DraftError::DuplicateConnection { .. } => "DUPLICATE_CONNECTION",
            DraftError::InvalidId { .. } => "INVALID_RECORD_ID",
            DraftError::ParseError { .. } => "DRAFT_PARSE_ERROR",
            DraftError::IoError { .. } => "DRAFT_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        !matches!(self, DraftError::IoError { .. })
    }
}
