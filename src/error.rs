use std::path::PathBuf;

use crate::model::ValidationIssue;

#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unsupported file type: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    #[error("No survey found at {0}")]
    NotFound(PathBuf),

    #[error("Survey has {} problem(s):\n{}", .0.len(), format_issues(.0))]
    InvalidSurvey(Vec<ValidationIssue>),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("  - {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, PreviewError>;
