use std::fs;
use std::path::{Path, PathBuf};

use sigmaq_preview::error::PreviewError;
use sigmaq_preview::loader::{self, load_survey};
use sigmaq_preview::model::{Problem, QuestionSource, QuestionType, SurveyType};
use sigmaq_preview::navigation::{Navigator, PageLayout};
use sigmaq_preview::scoring::compute_score;
use sigmaq_preview::store::AnswerStore;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name)
}

#[test]
fn test_assessment_in_api_envelope() {
    let (survey, issues) = load_survey(&fixture("assessment.json"), true).unwrap();

    assert!(issues.is_empty());
    assert_eq!(survey.id, "665f1c2ab8e4a1d2c3f40001");
    assert_eq!(survey.survey_type, SurveyType::Assessment);
    assert_eq!(survey.time_limit, Some(10));
    assert_eq!(survey.questions.len(), 3);
    assert_eq!(survey.questions[1].question_type, QuestionType::MultipleChoice);
    assert_eq!(survey.scoring().passing_threshold, 60.0);

    // Stored as step-by-step, but assessments page one question at a time.
    let nav = Navigator::new(&survey);
    assert_eq!(nav.layout(), PageLayout::OnePerPage);
    assert_eq!(nav.page_count(), 3);
}

#[test]
fn test_yaml_survey_gets_positional_ids() {
    let (survey, issues) = load_survey(&fixture("feedback.yaml"), false).unwrap();

    assert!(issues.is_empty());
    let ids: Vec<&str> = survey.questions.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["q1", "q2"]);
    assert_eq!(
        survey.questions[0].options[0].image_url(),
        Some("https://cdn.example.com/tracker.png")
    );
    assert_eq!(survey.scoring().default_points(), 2.0);
    assert_eq!(Navigator::new(&survey).layout(), PageLayout::OnePerPage);
}

#[test]
fn test_directory_with_survey_json() {
    let dir = std::env::temp_dir().join(format!("sigmaq_dir_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::copy(fixture("bank_survey.json"), dir.join("survey.json")).unwrap();

    let resolved = loader::resolve_survey_path(&dir).unwrap();
    assert_eq!(resolved, dir.join("survey.json"));
    let (survey, _) = load_survey(&dir, false).unwrap();
    assert_eq!(survey.title, "Weekly pulse");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_missing_survey_is_not_found() {
    let dir = std::env::temp_dir().join(format!("sigmaq_empty_dir_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let err = load_survey(&dir, false).unwrap_err();
    assert!(matches!(err, PreviewError::NotFound(_)));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_bank_survey_has_nothing_to_score() {
    let (survey, _) = load_survey(&fixture("bank_survey.json"), true).unwrap();

    assert_eq!(survey.question_source, QuestionSource::QuestionBank);
    assert!(survey.questions.is_empty());
    assert!(compute_score(&survey, &survey.questions, &AnswerStore::new()).is_none());
}

#[test]
fn test_validation_issues_warn_or_fail() {
    let (survey, issues) = load_survey(&fixture("broken.json"), false).unwrap();
    assert_eq!(survey.questions.len(), 2);

    let problems: Vec<&Problem> = issues.iter().map(|i| &i.problem).collect();
    assert!(problems.contains(&&Problem::TooFewOptions { found: 1 }));
    assert!(problems.contains(&&Problem::EmptyOption { index: 1 }));
    assert!(problems.contains(&&Problem::AnswerOutOfRange { index: 4 }));
    assert!(problems.contains(&&Problem::DuplicateId));
    assert!(problems.contains(&&Problem::EmptyText));

    match load_survey(&fixture("broken.json"), true) {
        Err(PreviewError::InvalidSurvey(strict_issues)) => assert_eq!(strict_issues, issues),
        other => panic!("expected InvalidSurvey, got {:?}", other.map(|(s, _)| s.title)),
    }
}

#[test]
fn test_unsupported_extension() {
    let path = std::env::temp_dir().join(format!("sigmaq_survey_{}.txt", std::process::id()));
    fs::write(&path, "title: nope").unwrap();

    let err = load_survey(&path, false).unwrap_err();
    assert!(matches!(err, PreviewError::UnsupportedFormat(_)));

    let _ = fs::remove_file(&path);
}
