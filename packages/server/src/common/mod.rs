//! Small helpers shared across domains and the HTTP layer.

pub mod filename;
pub mod json;

pub use filename::{profile_filename, sanitize_filename_part, DOCUMENT_EXTENSION, DOCUMENT_PREFIX};
pub use json::{extract_json_object, JsonExtractError};
