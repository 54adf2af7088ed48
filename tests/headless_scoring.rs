use std::fs;
use std::path::{Path, PathBuf};

use sigmaq_preview::loader::{load_answers, load_survey};
use sigmaq_preview::model::Answer;
use sigmaq_preview::report::{self, Visibility};
use sigmaq_preview::scoring::{compute_score, Verdict};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name)
}

#[test]
fn test_answers_file_scores_and_passes() {
    let (survey, _) = load_survey(&fixture("assessment.json"), true).unwrap();
    let store = load_answers(&fixture("answers.yaml"), &survey).unwrap();

    assert!(matches!(store.get("q-capital"), Some(Answer::Choice(r)) if r.option_index == 0));
    let result = compute_score(&survey, &survey.questions, &store).unwrap();

    assert_eq!(result.total_points, 5.0);
    assert_eq!(result.max_possible_points, 6.0);
    assert_eq!(result.percentage, 83.0);
    assert_eq!(result.correct_answers, 2);
    assert_eq!(result.wrong_answers, 1);
    assert!(result.passed);
    assert_eq!(result.outcome("q-symbol").unwrap().verdict, Verdict::Incorrect);
}

#[test]
fn test_unquoted_numeric_answers_match_options() {
    let (survey, _) = load_survey(&fixture("assessment.json"), true).unwrap();
    let dir = std::env::temp_dir().join(format!("sigmaq_numeric_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let yaml = dir.join("answers.yaml");
    fs::write(&yaml, "q-capital: Paris\nq-primes: [2, 3, 5]\nq-symbol: Fe\n").unwrap();
    let store = load_answers(&yaml, &survey).unwrap();
    assert!(matches!(store.get("q-primes"), Some(Answer::Choices(refs)) if refs.len() == 3));
    let result = compute_score(&survey, &survey.questions, &store).unwrap();
    assert_eq!(result.correct_answers, 3);
    assert_eq!(result.percentage, 100.0);

    let json = dir.join("answers.json");
    fs::write(&json, r#"{"q-capital": "Paris", "q-primes": 2, "q-symbol": "Fe"}"#).unwrap();
    let store = load_answers(&json, &survey).unwrap();
    assert!(matches!(store.get("q-primes"), Some(Answer::Choices(refs)) if refs.len() == 1));
    let result = compute_score(&survey, &survey.questions, &store).unwrap();
    assert_eq!(result.outcome("q-primes").unwrap().verdict, Verdict::Incorrect);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_summary_reveals_what_settings_allow() {
    let (survey, _) = load_survey(&fixture("assessment.json"), true).unwrap();
    let store = load_answers(&fixture("answers.yaml"), &survey).unwrap();
    let result = compute_score(&survey, &survey.questions, &store).unwrap();

    let visibility = Visibility::from_settings(&survey.scoring(), false);
    let summary = report::format_summary(&survey, &store, &result, visibility);

    assert!(summary.contains("Survey: Chemistry basics\n"));
    assert!(summary.contains("Score: 83% (pass at 60%)\n"));
    assert!(summary.contains("Result: PASSED\n"));
    assert!(summary.contains("✗ Chemical symbol for iron? (0/1)\n"));
    assert!(summary.contains("      yours: Au\n"));
    assert!(summary.contains("      correct: Fe\n"));
}

#[test]
fn test_wrong_and_missing_answers_fail() {
    let (survey, _) = load_survey(&fixture("assessment.json"), true).unwrap();
    let store = load_answers(&fixture("answers_wrong.json"), &survey).unwrap();

    // Unknown and null entries are skipped.
    assert_eq!(store.len(), 2);
    let result = compute_score(&survey, &survey.questions, &store).unwrap();

    assert_eq!(result.total_points, 0.0);
    assert_eq!(result.display_score, 0.0);
    assert!(!result.passed);
    assert_eq!(result.unanswered(), 1);
    // Partial scoring is configured, but a subset of the primes earns nothing.
    assert_eq!(result.outcome("q-primes").unwrap().points_awarded, 0.0);
}

#[test]
fn test_accumulated_mode_hides_score() {
    let (survey, _) = load_survey(&fixture("feedback.yaml"), false).unwrap();
    let path = std::env::temp_dir().join(format!("sigmaq_feedback_answers_{}.yaml", std::process::id()));
    fs::write(&path, "q1: Tracker\nq2: General\n").unwrap();

    let store = load_answers(&path, &survey).unwrap();
    let result = compute_score(&survey, &survey.questions, &store).unwrap();

    assert_eq!(result.total_points, 2.0);
    assert_eq!(result.max_possible_points, 4.0);
    assert_eq!(result.display_score, 2.0);
    assert!(result.passed);

    let hidden = report::format_summary(&survey, &store, &result, Visibility::from_settings(&survey.scoring(), false));
    assert!(!hidden.contains("Score:"));
    assert!(!hidden.contains("PASSED"));
    assert!(hidden.contains("Result: submitted (score hidden from respondents)\n"));

    let revealed = report::format_summary(&survey, &store, &result, Visibility::from_settings(&survey.scoring(), true));
    assert!(revealed.contains("Score: 2 / 4 points (pass at 2)"));
    assert!(revealed.contains("Result: PASSED\n"));
    assert!(revealed.contains("correct: general"));

    let _ = fs::remove_file(&path);
}

#[test]
fn test_export_report_json_and_yaml() {
    let survey_path = fixture("assessment.json");
    let (survey, _) = load_survey(&survey_path, true).unwrap();
    let store = load_answers(&fixture("answers.yaml"), &survey).unwrap();
    let result = compute_score(&survey, &survey.questions, &store).unwrap();
    let fingerprint = report::compute_file_hash(&survey_path).unwrap();

    let exported = report::session_report(
        &survey,
        &survey_path,
        &fingerprint,
        &store,
        result,
        "2025-03-01T09:00:00+00:00",
        "2025-03-01T09:04:05+00:00",
    );

    let json_path = std::env::temp_dir().join(format!("sigmaq_export_{}.json", std::process::id()));
    report::export_report(&exported, &json_path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();

    assert_eq!(value["preview"], true);
    assert_eq!(value["survey"]["id"], "665f1c2ab8e4a1d2c3f40001");
    assert!(value["survey"]["fingerprint"].as_str().unwrap().starts_with("sha256:"));
    assert_eq!(value["session"]["id"], store.session_id().to_string());
    assert_eq!(value["session"]["duration"], "00:04:05");
    assert_eq!(value["result"]["passed"], true);
    assert_eq!(value["result"]["outcomes"][2]["verdict"], "incorrect");

    let yaml_path = json_path.with_extension("yaml");
    report::export_report(&exported, &yaml_path).unwrap();
    let yaml = fs::read_to_string(&yaml_path).unwrap();
    assert!(yaml.contains("preview: true"));
    assert!(yaml.contains("display_score: 83.0"));

    let _ = fs::remove_file(&json_path);
    let _ = fs::remove_file(&yaml_path);
}

#[test]
fn test_each_import_is_a_new_session() {
    let (survey, _) = load_survey(&fixture("assessment.json"), true).unwrap();
    let first = load_answers(&fixture("answers.yaml"), &survey).unwrap();
    let second = load_answers(&fixture("answers.yaml"), &survey).unwrap();

    assert_ne!(first.session_id(), second.session_id());
    assert_eq!(
        compute_score(&survey, &survey.questions, &first),
        compute_score(&survey, &survey.questions, &second)
    );
}
