use crate::errors::DocketError;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Import name cannot be empty")]
    EmptyName,

    #[error("Entity type cannot be empty")]
    EmptyEntityType,

    #[error("Import file not found: {path}")]
    FileNotFound { path: String },

    #[error("Field mapping cannot be empty")]
    EmptyMapping,

    #[error("Invalid mapping '{value}': expected column=field")]
    InvalidMapping { value: String },

    #[error("Field '{field}' is mapped from more than one column")]
    DuplicateTarget { field: String },
}

impl DocketError for ImportError {
    fn error_code(&self) -> &'static str {
        match self {
            ImportError::EmptyName => "IMPORT_EMPTY_NAME",
            ImportError::EmptyEntityType => "IMPORT_EMPTY_ENTITY_TYPE",
            ImportError::FileNotFound { .. } => "IMPORT_FILE_NOT_FOUND",
            ImportError::EmptyMapping => "IMPORT_EMPTY_MAPPING",
            ImportError::InvalidMapping { .. } => "IMPORT_INVALID_MAPPING",
            ImportError::DuplicateTarget { .. } => "IMPORT_DUPLICATE_TARGET",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}
