use serde_yaml::Value;
use std::fmt::Display;
use tracing::debug;

use crate::rules::{REQUIRED_METADATA, RuleSet, is_helm_chart_url, type_name};

/// Problems found in one document of a resource file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
    /// 1-based position of the document within its file
    pub number: usize,
    pub errors: Vec<String>,
}

struct DocumentChecker {
    number: usize,
    errors: Vec<String>,
}

impl DocumentChecker {
    fn error(&mut self, message: impl Display) {
        self.errors.push(format!("Document {}: {message}", self.number));
    }
}

/// Apply the rule checklist to a single parsed document.
///
/// Missing `apiVersion` or `kind` stops the checks for this document.
/// Kinds without rules pass through with no errors.
pub fn validate_document(rules: &RuleSet, number: usize, doc: &Value) -> DocumentReport {
    let mut checker = DocumentChecker {
        number,
        errors: Vec::new(),
    };
    check_document(rules, doc, &mut checker);

    debug!("Document {number}: {} error(s)", checker.errors.len());

    DocumentReport {
        number,
        errors: checker.errors,
    }
}

fn check_document(rules: &RuleSet, doc: &Value, checker: &mut DocumentChecker) {
    if !doc.is_mapping() {
        checker.error(format_args!("Expected a mapping, got {}", type_name(doc)));
        return;
    }

    let Some(api_version) = doc.get("apiVersion") else {
        checker.error("Missing 'apiVersion' field");
        return;
    };

    let Some(kind) = doc.get("kind") else {
        checker.error("Missing 'kind' field");
        return;
    };

    let Some(kind) = kind.as_str() else {
        return;
    };
    let Some(kind_rules) = rules.rules_for(kind) else {
        debug!("Skipping unchecked kind {kind}");
        return;
    };

    if let Some(expected) = rules.expected_api_version(kind)
        && api_version.as_str() != Some(expected)
    {
        checker.error(format_args!(
            "Incorrect apiVersion '{}' (expected '{expected}')",
            display_scalar(api_version)
        ));
    }

    for (field, field_type) in &kind_rules.required_fields {
        match doc.get(*field) {
            None => checker.error(format_args!("Missing required field '{field}'")),
            Some(value) if !field_type.matches(value) => checker.error(format_args!(
                "Field '{field}' should be {field_type}, got {}",
                type_name(value)
            )),
            Some(_) => {}
        }
    }

    if let Some(Value::Mapping(metadata)) = doc.get("metadata") {
        for field in REQUIRED_METADATA {
            if !metadata.contains_key(*field) {
                checker.error(format_args!("Missing metadata.{field}"));
            }
        }
    }

    let Some(Value::Mapping(spec)) = doc.get("spec") else {
        return;
    };

    for field in &kind_rules.required_spec {
        if !spec.contains_key(*field) {
            checker.error(format_args!("Missing spec.{field}"));
        }
    }

    if kind_rules.layer_selector_heuristic {
        let url = spec.get("url").and_then(Value::as_str).unwrap_or_default();
        if is_helm_chart_url(url) && !spec.contains_key("layerSelector") {
            checker.error(format_args!(
                "{kind} for Helm charts should include 'layerSelector' with mediaType"
            ));
        }
    }
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => format!("<{}>", type_name(other)),
    }
}
