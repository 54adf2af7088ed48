use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::{PreviewError, Result};

pub const LOG_ENV: &str = "SIGMAQ_LOG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// `tracing` filter directive, overridden by `SIGMAQ_LOG`.
    pub log_directive: String,
    pub log_dir: Option<PathBuf>,
    /// Seconds before the time limit at which the warning dialog opens.
    pub time_warning_secs: u64,
    /// Show correct answers and the breakdown even when the survey hides them.
    pub reveal_answers: bool,
    pub mouse: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            log_directive: "info".to_string(),
            log_dir: None,
            time_warning_secs: 120,
            reveal_answers: false,
            mouse: true,
        }
    }
}

impl PreviewConfig {
    /// `--config` wins over `<config dir>/preview.yaml`. Only a missing
    /// explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| PreviewError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| PreviewError::Config(e.to_string()))
    }

    /// Directory for the log file: configured, else the platform data dir,
    /// else the system temp dir.
    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .or_else(|| project_dirs().map(|d| d.data_local_dir().to_path_buf()))
            .unwrap_or_else(|| std::env::temp_dir().join("sigmaq-preview"))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "SigmaQ", "sigmaq-preview")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("preview.yaml"))
}
