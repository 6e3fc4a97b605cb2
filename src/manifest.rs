//! Manifest loading and the per-resource validation run

use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{FileError, ManifestError};
use crate::rules::RuleSet;
use crate::validation::{ValidationResult, validate_file};

pub const MANIFEST_FILE: &str = "kustomization.yaml";

/// The kustomization file listing which resources belong to a run
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub resources: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Manifest {
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file has no resources rather than being malformed
        match serde_yaml::from_str::<Value>(content)? {
            Value::Null => Ok(Self::default()),
            value => serde_yaml::from_value(value),
        }
    }

    pub fn load(base_dir: &Path) -> Result<Self, ManifestError> {
        if !base_dir.exists() {
            return Err(ManifestError::DirectoryNotFound(base_dir.to_path_buf()));
        }

        let path = base_dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(ManifestError::ManifestNotFound(path));
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ManifestError::Read {
            path: path.clone(),
            source,
        })?;

        Self::from_yaml(&content).map_err(|err| ManifestError::parse(&path, content, &err))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Resource path exactly as listed in the manifest
    pub resource: String,
    pub result: ValidationResult,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn all_valid(&self) -> bool {
        self.files.iter().all(|file| file.result.valid)
    }

    pub fn invalid_count(&self) -> usize {
        self.files.iter().filter(|file| !file.result.valid).count()
    }
}

pub fn validate_resource(rules: &RuleSet, base_dir: &Path, resource: &str) -> FileReport {
    let path = base_dir.join(resource);

    let result = if path.exists() {
        validate_file(rules, &path)
    } else {
        FileError::NotFound(path).into()
    };

    FileReport {
        resource: resource.to_string(),
        result,
    }
}

pub fn validate_manifest(rules: &RuleSet, base_dir: &Path, manifest: &Manifest) -> RunReport {
    let files: Vec<FileReport> = manifest
        .resources
        .iter()
        .map(|resource| validate_resource(rules, base_dir, resource))
        .collect();

    let report = RunReport { files };
    info!(
        "Checked {} resources, {} invalid",
        report.files.len(),
        report.invalid_count()
    );
    report
}

/// Load the manifest in `base_dir` and validate every listed resource
pub fn run(rules: &RuleSet, base_dir: &Path) -> Result<RunReport, ManifestError> {
    debug!("Loading {} from {}", MANIFEST_FILE, base_dir.display());
    let manifest = Manifest::load(base_dir)?;
    Ok(validate_manifest(rules, base_dir, &manifest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const VALID: &str = r#"apiVersion: source.toolkit.fluxcd.io/v1
kind: HelmRepository
metadata:
  name: bitnami
  namespace: flux-system
spec:
  url: https://charts.bitnami.com/bitnami
  interval: 1h
"#;

    #[test]
    fn test_manifest_resources() {
        let manifest = Manifest::from_yaml("resources:\n  - a.yaml\n  - b.yaml\n").unwrap();
        assert_eq!(manifest.resources, vec!["a.yaml", "b.yaml"]);
    }

    #[test]
    fn test_manifest_without_resources() {
        assert!(Manifest::from_yaml("").unwrap().resources.is_empty());
        assert!(Manifest::from_yaml("kind: Kustomization\n").unwrap().resources.is_empty());
        assert!(Manifest::from_yaml("resources:\n").unwrap().resources.is_empty());
    }

    #[test]
    fn test_manifest_with_bad_resources() {
        assert!(Manifest::from_yaml("resources: 5\n").is_err());
        assert!(Manifest::from_yaml("resources: [unclosed\n").is_err());
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        let err = run(&RuleSet::flux_v2(), &missing).unwrap_err();
        assert!(matches!(err, ManifestError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_missing_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let err = run(&RuleSet::flux_v2(), temp_dir.path()).unwrap_err();
        assert!(matches!(err, ManifestError::ManifestNotFound(_)));
        assert!(err.to_string().contains("kustomization.yaml not found"));
    }

    #[test]
    fn test_unparseable_manifest_has_span() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(MANIFEST_FILE), "resources: [a.yaml\n").unwrap();
        let err = run(&RuleSet::flux_v2(), temp_dir.path()).unwrap_err();
        match err {
            ManifestError::Parse { span, .. } => assert!(span.is_some()),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_does_not_stop_run() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(MANIFEST_FILE),
            "resources:\n  - missing.yaml\n  - helm.yaml\n",
        )
        .unwrap();
        fs::write(temp_dir.path().join("helm.yaml"), VALID).unwrap();

        let report = run(&RuleSet::flux_v2(), temp_dir.path()).unwrap();
        assert_eq!(report.files.len(), 2);
        assert!(!report.all_valid());
        assert_eq!(report.invalid_count(), 1);

        let missing = &report.files[0];
        assert_eq!(missing.resource, "missing.yaml");
        assert_eq!(missing.result.errors.len(), 1);
        assert!(missing.result.errors[0].starts_with("File not found:"));
        assert!(report.files[1].result.valid);
    }

    #[test]
    fn test_empty_resources_is_not_a_failure() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(MANIFEST_FILE), "resources: []\n").unwrap();
        let report = run(&RuleSet::flux_v2(), temp_dir.path()).unwrap();
        assert!(report.is_empty());
        assert!(report.all_valid());
    }

    #[test]
    fn test_nested_resource_paths() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("helm")).unwrap();
        fs::write(temp_dir.path().join("helm/bitnami.yaml"), VALID).unwrap();

        let report = validate_resource(&RuleSet::flux_v2(), temp_dir.path(), "helm/bitnami.yaml");
        assert!(report.result.valid);
        assert_eq!(report.resource, "helm/bitnami.yaml");
    }
}
