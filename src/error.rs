//! Error types
//!
//! `ManifestError` aborts a run before any resource is checked. `FileError`
//! is recorded against a single resource and never stops the run.

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum ManifestError {
    #[error("Directory not found: {}", .0.display())]
    #[diagnostic(
        code(fluxrepo::directory_not_found),
        help("pass the repositories directory as the first argument")
    )]
    DirectoryNotFound(PathBuf),

    #[error("kustomization.yaml not found at {}", .0.display())]
    #[diagnostic(code(fluxrepo::manifest_not_found))]
    ManifestNotFound(PathBuf),

    #[error("Failed to read kustomization.yaml: {source}")]
    #[diagnostic(code(fluxrepo::manifest_read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse kustomization.yaml: {message}")]
    #[diagnostic(
        code(fluxrepo::manifest_parse),
        help("`resources` must be a list of file paths relative to the manifest")
    )]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
        message: String,
    },
}

impl ManifestError {
    pub fn parse(path: &Path, content: String, err: &serde_yaml::Error) -> Self {
        let span = err
            .location()
            .map(|location| SourceSpan::new(location.index().into(), 0));

        ManifestError::Parse {
            src: NamedSource::new(path.display().to_string(), content),
            span,
            message: err.to_string(),
        }
    }
}

/// Problems that make a whole resource file invalid
#[derive(Error, Debug)]
pub enum FileError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid YAML syntax: {0}")]
    Syntax(#[from] serde_yaml::Error),

    #[error("No YAML documents found in file")]
    NoDocuments,
}
