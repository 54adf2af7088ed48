use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::{PreviewError, Result};
use crate::model::{Survey, ValidationIssue};
use crate::renderer::{self, ImportedAnswer};
use crate::store::AnswerStore;

const SURVEY_FILE_NAMES: [&str; 3] = ["survey.json", "survey.yaml", "survey.yml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            _ => Err(PreviewError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// A file is used as is; a directory must contain one of `survey.json`,
/// `survey.yaml` or `survey.yml`.
pub fn resolve_survey_path(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if path.is_dir() {
        return SURVEY_FILE_NAMES
            .iter()
            .map(|name| path.join(name))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| PreviewError::NotFound(path.to_path_buf()));
    }
    Err(PreviewError::NotFound(path.to_path_buf()))
}

/// Load a survey and check it. With `strict`, any validation issue is an
/// error; otherwise issues are logged and returned alongside the survey.
pub fn load_survey(path: &Path, strict: bool) -> Result<(Survey, Vec<ValidationIssue>)> {
    let path = resolve_survey_path(path)?;
    let content = read_file(&path)?;
    let survey = parse_survey(&content, Format::from_path(&path)?, &path)?;

    let issues = survey.validate();
    if strict && !issues.is_empty() {
        return Err(PreviewError::InvalidSurvey(issues));
    }
    for issue in &issues {
        tracing::warn!(survey = %survey.id, "{}", issue);
    }
    tracing::info!(
        survey = %survey.id,
        path = %path.display(),
        questions = survey.questions.len(),
        "survey loaded"
    );

    Ok((survey, issues))
}

/// Parse a survey document. The API's `{"data": {...}}` envelope is accepted
/// as well as a bare survey object.
pub fn parse_survey(content: &str, format: Format, path: &Path) -> Result<Survey> {
    let mut survey: Survey = match format {
        Format::Json => {
            let mut value: serde_json::Value =
                serde_json::from_str(content).map_err(|e| json_error(path, e))?;
            if let Some(inner) = value.get_mut("data").filter(|d| d.is_object()) {
                value = inner.take();
            }
            serde_json::from_value(value).map_err(|e| json_error(path, e))?
        }
        Format::Yaml => {
            let mut value: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| yaml_error(path, e))?;
            if let Some(inner) = value.get_mut("data").filter(|d| d.is_mapping()) {
                value = std::mem::take(inner);
            }
            serde_yaml::from_value(value).map_err(|e| yaml_error(path, e))?
        }
    };
    survey.assign_missing_ids();
    Ok(survey)
}

/// Load an answers file (question id to display text or list of display
/// texts) into a fresh store. Unknown question ids are skipped.
pub fn load_answers(path: &Path, survey: &Survey) -> Result<AnswerStore> {
    let content = read_file(path)?;
    let raw: BTreeMap<String, Option<ImportedAnswer>> = decode(&content, Format::from_path(path)?, path)?;

    let mut store = AnswerStore::new();
    for (question_id, imported) in raw {
        let Some(imported) = imported else {
            continue;
        };
        match survey.question(&question_id) {
            Some(question) => {
                store.set_answer(question_id, renderer::normalize_imported(question, &imported));
            }
            None => {
                tracing::warn!(question = %question_id, "answer for unknown question ignored");
            }
        }
    }
    Ok(store)
}

fn decode<T: DeserializeOwned>(content: &str, format: Format, path: &Path) -> Result<T> {
    match format {
        Format::Json => serde_json::from_str(content).map_err(|e| json_error(path, e)),
        Format::Yaml => serde_yaml::from_str(content).map_err(|e| yaml_error(path, e)),
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| PreviewError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn json_error(path: &Path, source: serde_json::Error) -> PreviewError {
    PreviewError::Json {
        path: path.to_path_buf(),
        source,
    }
}

fn yaml_error(path: &Path, source: serde_yaml::Error) -> PreviewError {
    PreviewError::Yaml {
        path: path.to_path_buf(),
        source,
    }
}
