//! Rule tables for Flux v2 repository resources
//!
//! Rules are plain data: a kind gets enforcement by having a `KindRules`
//! entry, so supporting another kind is a table addition.

use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fmt;

pub const FLUX_SOURCE_V1: &str = "source.toolkit.fluxcd.io/v1";
pub const KUSTOMIZE_V1BETA1: &str = "kustomize.config.k8s.io/v1beta1";

pub const HELM_REPOSITORY: &str = "HelmRepository";
pub const OCI_REPOSITORY: &str = "OCIRepository";
pub const KUSTOMIZATION: &str = "Kustomization";

/// Fields every checked resource must carry under `metadata`
pub const REQUIRED_METADATA: &[&str] = &["name", "namespace"];

const REPOSITORY_FIELDS: &[(&str, FieldType)] = &[
    ("apiVersion", FieldType::String),
    ("kind", FieldType::String),
    ("metadata", FieldType::Mapping),
    ("spec", FieldType::Mapping),
];

const REPOSITORY_SPEC: &[&str] = &["url", "interval"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Mapping,
    String,
}

impl FieldType {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::Mapping => value.is_mapping(),
            FieldType::String => value.is_string(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldType::Mapping => "mapping",
            FieldType::String => "string",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name the YAML type of a value for error messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}

/// Checks applied to documents of one recognized kind
#[derive(Debug, Clone)]
pub struct KindRules {
    pub required_fields: Vec<(&'static str, FieldType)>,
    pub required_spec: Vec<&'static str>,
    /// Require `spec.layerSelector` when the URL looks like a Helm chart registry
    pub layer_selector_heuristic: bool,
}

#[derive(Debug, Clone)]
pub struct RuleSet {
    api_versions: BTreeMap<&'static str, &'static str>,
    kinds: BTreeMap<&'static str, KindRules>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self {
            api_versions: BTreeMap::new(),
            kinds: BTreeMap::new(),
        }
    }

    /// The stock Flux v2 source-controller rules
    pub fn flux_v2() -> Self {
        let repository = KindRules {
            required_fields: REPOSITORY_FIELDS.to_vec(),
            required_spec: REPOSITORY_SPEC.to_vec(),
            layer_selector_heuristic: false,
        };

        Self::new()
            .with_api_version(HELM_REPOSITORY, FLUX_SOURCE_V1)
            .with_api_version(OCI_REPOSITORY, FLUX_SOURCE_V1)
            // Kustomization only has a version entry; its documents pass through unchecked
            .with_api_version(KUSTOMIZATION, KUSTOMIZE_V1BETA1)
            .with_kind(HELM_REPOSITORY, repository.clone())
            .with_kind(
                OCI_REPOSITORY,
                KindRules {
                    layer_selector_heuristic: true,
                    ..repository
                },
            )
    }

    pub fn with_api_version(mut self, kind: &'static str, api_version: &'static str) -> Self {
        self.api_versions.insert(kind, api_version);
        self
    }

    pub fn with_kind(mut self, kind: &'static str, rules: KindRules) -> Self {
        self.kinds.insert(kind, rules);
        self
    }

    pub fn expected_api_version(&self, kind: &str) -> Option<&'static str> {
        self.api_versions.get(kind).copied()
    }

    /// Rules for `kind`, or `None` when documents of that kind are not checked
    pub fn rules_for(&self, kind: &str) -> Option<&KindRules> {
        self.kinds.get(kind)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::flux_v2()
    }
}

/// Heuristic: does this OCI URL point at a packaged Helm chart?
///
/// Substring match only, so `oci://registry/helmfile-tools` also counts.
pub fn is_helm_chart_url(url: &str) -> bool {
    let url = url.to_lowercase();
    url.contains("helm") || url.contains("charts")
}
