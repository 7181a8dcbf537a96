//! Import creation requests.
//!
//! An import is uploaded as a multipart form: metadata fields, the data file
//! itself and a JSON configuration blob holding the column-to-field mapping
//! and behavior flags. The file is transported, never parsed, here.

pub mod errors;
pub mod types;

pub use errors::ImportError;
pub use types::{ImportConfig, ImportRequest, parse_mapping};
