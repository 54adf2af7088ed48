use std::fs;
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{PreviewError, Result};
use crate::loader::Format;
use crate::model::{Answer, Question, ScoringMode, ScoringSettings, Survey};
use crate::scoring::{ScoringResult, Verdict};
use crate::store::AnswerStore;

/// Which parts of a result the respondent would see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub score: bool,
    pub correct_answers: bool,
    pub breakdown: bool,
}

impl Visibility {
    pub fn from_settings(settings: &ScoringSettings, reveal: bool) -> Self {
        if reveal {
            return Self {
                score: true,
                correct_answers: true,
                breakdown: true,
            };
        }
        Self {
            score: settings.show_score,
            correct_answers: settings.show_correct_answers,
            breakdown: settings.show_score_breakdown,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveyInfo {
    pub id: String,
    pub title: String,
    pub source: String,
    pub fingerprint: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub started_at: String,
    pub submitted_at: String,
    pub duration: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewReport {
    pub preview: bool,
    pub survey: SurveyInfo,
    pub session: SessionInfo,
    pub result: ScoringResult,
}

impl PreviewReport {
    pub fn new(survey: SurveyInfo, session: SessionInfo, result: ScoringResult) -> Self {
        Self {
            preview: true,
            survey,
            session,
            result,
        }
    }
}

/// Assemble the report for one scored session.
pub fn session_report(
    survey: &Survey,
    source: &Path,
    fingerprint: &str,
    answers: &AnswerStore,
    result: ScoringResult,
    started_at: &str,
    submitted_at: &str,
) -> PreviewReport {
    PreviewReport::new(
        SurveyInfo {
            id: survey.id.clone(),
            title: survey.title.clone(),
            source: source.display().to_string(),
            fingerprint: fingerprint.to_string(),
        },
        SessionInfo {
            id: answers.session_id(),
            started_at: started_at.to_string(),
            submitted_at: submitted_at.to_string(),
            duration: compute_duration(started_at, submitted_at),
        },
        result,
    )
}

/// Write the report as JSON or YAML, chosen by the file extension.
pub fn export_report(report: &PreviewReport, path: &Path) -> Result<()> {
    let content = match Format::from_path(path)? {
        Format::Json => serde_json::to_string_pretty(report).map_err(|source| PreviewError::Json {
            path: path.to_path_buf(),
            source,
        })?,
        Format::Yaml => serde_yaml::to_string(report).map_err(|source| PreviewError::Yaml {
            path: path.to_path_buf(),
            source,
        })?,
    };
    atomic_write(path, &content)?;
    tracing::info!(path = %path.display(), "preview result exported");
    Ok(())
}

fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    let io_err = |source| PreviewError::Io {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&tmp, content).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

/// Plain text summary printed by headless scoring.
pub fn format_summary(
    survey: &Survey,
    answers: &AnswerStore,
    result: &ScoringResult,
    visibility: Visibility,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("Survey: {}\n", survey.title));
    out.push_str(&format!("Questions: {}\n", result.outcomes.len()));

    if visibility.score {
        out.push_str(&format!("Score: {}\n", score_line(result)));
        out.push_str(&format!(
            "  Correct: {}, Wrong: {}, Unanswered: {}\n",
            result.correct_answers,
            result.wrong_answers,
            result.unanswered()
        ));
        out.push_str(&format!("Result: {}\n", if result.passed { "PASSED" } else { "FAILED" }));
    } else {
        out.push_str("Result: submitted (score hidden from respondents)\n");
    }

    if visibility.breakdown || visibility.correct_answers {
        out.push_str("\nBreakdown:\n");
        for (i, outcome) in result.outcomes.iter().enumerate() {
            let question = survey.question(&outcome.question_id);
            let text = question.map(|q| q.text.as_str()).unwrap_or("?");
            out.push_str(&format!("  {:>2}. {} {}", i + 1, verdict_mark(&outcome.verdict), text));
            if visibility.breakdown {
                out.push_str(&format!(
                    " ({}/{})",
                    format_points(outcome.points_awarded),
                    format_points(outcome.max_points)
                ));
            }
            out.push('\n');
            if let Verdict::Invalid(reason) = &outcome.verdict {
                out.push_str(&format!("      ! {}\n", reason));
            }
            if visibility.correct_answers && !outcome.verdict.is_correct() {
                if let Some(q) = question {
                    out.push_str(&format!(
                        "      yours: {}\n",
                        answer_display(q, answers.get(&q.id))
                    ));
                    if let Some(expected) = q.correct_answer_display() {
                        out.push_str(&format!("      correct: {}\n", expected));
                    }
                }
            }
        }
    }

    out
}

pub fn score_line(result: &ScoringResult) -> String {
    match result.scoring_mode {
        ScoringMode::Percentage => format!(
            "{}% (pass at {}%)",
            format_points(result.display_score),
            format_points(result.passing_threshold)
        ),
        ScoringMode::Accumulated => format!(
            "{} / {} points (pass at {})",
            format_points(result.total_points),
            format_points(result.max_possible_points),
            format_points(result.passing_threshold)
        ),
    }
}

/// The respondent's answer as it would read on screen.
pub fn answer_display(question: &Question, answer: Option<&Answer>) -> String {
    let option = |index: usize| {
        question
            .option_text(index)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", index))
    };
    match answer {
        None => "(none)".to_string(),
        Some(answer) if answer.is_empty() => "(none)".to_string(),
        Some(Answer::Text(text)) => text.clone(),
        Some(Answer::Choice(r)) => option(r.option_index),
        Some(Answer::Choices(refs)) => refs
            .iter()
            .map(|r| option(r.option_index))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

pub fn verdict_mark(verdict: &Verdict) -> &'static str {
    match verdict {
        Verdict::Correct => "✓",
        Verdict::Incorrect => "✗",
        Verdict::Unanswered => "·",
        Verdict::Invalid(_) => "!",
    }
}

/// Whole numbers without a trailing `.0`.
pub fn format_points(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

pub fn compute_duration(started: &str, submitted: &str) -> String {
    if let (Ok(start), Ok(end)) = (
        chrono::DateTime::parse_from_rfc3339(started),
        chrono::DateTime::parse_from_rfc3339(submitted),
    ) {
        let secs = (end - start).num_seconds().max(0);
        return format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60);
    }
    "unknown".to_string()
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn compute_file_hash(path: &Path) -> Result<String> {
    let content = fs::read(path).map_err(|source| PreviewError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("sha256:{}", hex_encode(&hasher.finalize())))
}
