use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;
use tracing::debug;

use super::document::validate_document;
use crate::error::FileError;
use crate::rules::RuleSet;

/// Outcome of validating one resource file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

impl From<FileError> for ValidationResult {
    fn from(err: FileError) -> Self {
        Self::from_errors(vec![err.to_string()])
    }
}

/// Parse a multi-document YAML stream, dropping null documents
///
/// `<<` merge keys are resolved. Duplicate keys within a mapping are a
/// syntax error.
pub fn parse_documents(content: &str) -> Result<Vec<Value>, FileError> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        let mut value = Value::deserialize(document)?;
        value.apply_merge()?;
        if !value.is_null() {
            documents.push(value);
        }
    }

    if documents.is_empty() {
        return Err(FileError::NoDocuments);
    }

    Ok(documents)
}

pub fn validate_yaml_str(rules: &RuleSet, content: &str) -> ValidationResult {
    let documents = match parse_documents(content) {
        Ok(documents) => documents,
        Err(err) => return err.into(),
    };

    let errors = documents
        .iter()
        .enumerate()
        .flat_map(|(idx, doc)| validate_document(rules, idx + 1, doc).errors)
        .collect();

    ValidationResult::from_errors(errors)
}

pub fn validate_file(rules: &RuleSet, path: &Path) -> ValidationResult {
    debug!("Validating {}", path.display());

    match std::fs::read_to_string(path) {
        Ok(content) => validate_yaml_str(rules, &content),
        Err(err) => FileError::Read(err).into(),
    }
}
