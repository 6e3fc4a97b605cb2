//! Structural checks for repository resource documents

mod document;
mod file;


pub use document::{DocumentReport, validate_document};
pub use file::{ValidationResult, parse_documents, validate_file, validate_yaml_str};
