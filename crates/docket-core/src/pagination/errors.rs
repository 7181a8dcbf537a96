use crate::errors::DocketError;

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Invalid page size: must be greater than 0")]
    InvalidPageSize,

    #[error("Invalid page number: pages start at 1")]
    InvalidPageNumber,
}

impl DocketError for PageError {
    fn error_code(&self) -> &'static str {
        match self {
            PageError::InvalidPageSize => "INVALID_PAGE_SIZE",
            PageError::InvalidPageNumber => "INVALID_PAGE_NUMBER",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}
