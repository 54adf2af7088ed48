//! Local scoring of a preview session.
//!
//! `compute_score` is pure: it reads the survey, its questions and the answer
//! store and never fails. Missing or malformed data lowers the score and is
//! reported through [`Verdict`] instead of an error.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::model::{Answer, CorrectAnswer, OptionRef, Question, QuestionType, ScoringMode, Survey};
use crate::store::AnswerStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum InvalidReason {
    MissingAnswerKey,
    OptionOutOfRange(usize),
    ForeignOption(String),
    UnresolvedOption(String),
    TypeMismatch,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::MissingAnswerKey => write!(f, "no correct answer configured"),
            InvalidReason::OptionOutOfRange(i) => write!(f, "option {} does not exist", i + 1),
            InvalidReason::ForeignOption(id) => write!(f, "option belongs to question {}", id),
            InvalidReason::UnresolvedOption(text) => write!(f, "\"{}\" matches no option", text),
            InvalidReason::TypeMismatch => write!(f, "answer does not fit the question type"),
        }
    }
}

/// How a single question was judged. Only `Correct` earns points.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
    Unanswered,
    Invalid(InvalidReason),
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub question_type: QuestionType,
    pub verdict: Verdict,
    pub points_awarded: f64,
    pub max_points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringResult {
    pub scoring_mode: ScoringMode,
    pub passing_threshold: f64,
    pub total_points: f64,
    pub max_possible_points: f64,
    pub correct_answers: usize,
    pub wrong_answers: usize,
    /// Rounded 0-100, zero when nothing could be earned.
    pub percentage: f64,
    /// Percentage or raw points, depending on the scoring mode.
    pub display_score: f64,
    pub passed: bool,
    pub outcomes: Vec<QuestionOutcome>,
}

impl ScoringResult {
    pub fn outcome(&self, question_id: &str) -> Option<&QuestionOutcome> {
        self.outcomes.iter().find(|o| o.question_id == question_id)
    }

    pub fn unanswered(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.verdict == Verdict::Unanswered)
            .count()
    }
}

/// Score `questions` against `answers` using the survey's scoring settings.
/// Returns `None` when there is nothing to score.
pub fn compute_score(
    survey: &Survey,
    questions: &[Question],
    answers: &AnswerStore,
) -> Option<ScoringResult> {
    if questions.is_empty() {
        return None;
    }

    let settings = survey.scoring();
    if settings.multiple_choice_scoring.enable_partial_scoring
        && questions
            .iter()
            .any(|q| q.question_type == QuestionType::MultipleChoice)
    {
        tracing::debug!(survey = %survey.id, "partial scoring flag set; multiple choice stays all-or-nothing");
    }

    let default_points = settings.default_points();
    let mut outcomes = Vec::with_capacity(questions.len());
    let mut total_points = 0.0;
    let mut max_possible_points = 0.0;

    for question in questions {
        let max_points = question.points.unwrap_or(default_points);
        let verdict = evaluate(question, answers.get(&question.id));
        let points_awarded = if verdict.is_correct() { max_points } else { 0.0 };

        total_points += points_awarded;
        max_possible_points += max_points;
        outcomes.push(QuestionOutcome {
            question_id: question.id.clone(),
            question_type: question.question_type,
            verdict,
            points_awarded,
            max_points,
        });
    }

    let correct_answers = outcomes.iter().filter(|o| o.verdict.is_correct()).count();
    let percentage = if max_possible_points > 0.0 {
        (100.0 * total_points / max_possible_points).round()
    } else {
        0.0
    };

    let (display_score, passed) = match settings.scoring_mode {
        ScoringMode::Percentage => (percentage, percentage >= settings.passing_threshold),
        ScoringMode::Accumulated => (total_points, total_points >= settings.passing_threshold),
    };

    Some(ScoringResult {
        scoring_mode: settings.scoring_mode,
        passing_threshold: settings.passing_threshold,
        total_points,
        max_possible_points,
        correct_answers,
        wrong_answers: questions.len() - correct_answers,
        percentage,
        display_score,
        passed,
        outcomes,
    })
}

/// Judge one answer against its question's key.
pub fn evaluate(question: &Question, answer: Option<&Answer>) -> Verdict {
    let Some(answer) = answer.filter(|a| !a.is_empty()) else {
        return Verdict::Unanswered;
    };
    let Some(key) = question.correct_answer.as_ref() else {
        return Verdict::Invalid(InvalidReason::MissingAnswerKey);
    };

    match question.question_type {
        QuestionType::ShortText => match (answer, key) {
            (Answer::Text(given), CorrectAnswer::Text(expected)) => matched(given == expected),
            _ => Verdict::Invalid(InvalidReason::TypeMismatch),
        },
        QuestionType::SingleChoice => evaluate_single(question, answer, key),
        QuestionType::MultipleChoice => evaluate_multiple(question, answer, key),
    }
}

fn evaluate_single(question: &Question, answer: &Answer, key: &CorrectAnswer) -> Verdict {
    let selected = match answer {
        Answer::Choice(r) => r,
        Answer::Choices(refs) if refs.len() == 1 => &refs[0],
        Answer::Choices(_) => return Verdict::Invalid(InvalidReason::TypeMismatch),
        Answer::Text(given) => {
            return match key {
                CorrectAnswer::Text(expected) => matched(given == expected),
                _ => Verdict::Invalid(InvalidReason::UnresolvedOption(given.clone())),
            };
        }
    };

    let index = match check_ref(question, selected) {
        Ok(index) => index,
        Err(reason) => return Verdict::Invalid(reason),
    };

    match key {
        CorrectAnswer::Index(expected) => matched(index as i64 == *expected),
        CorrectAnswer::Text(expected) => matched(question.option_text(index) == Some(expected.as_str())),
        CorrectAnswer::Indices(_) => Verdict::Invalid(InvalidReason::TypeMismatch),
    }
}

fn evaluate_multiple(question: &Question, answer: &Answer, key: &CorrectAnswer) -> Verdict {
    let refs: Vec<&OptionRef> = match answer {
        Answer::Choice(r) => vec![r],
        Answer::Choices(refs) => refs.iter().collect(),
        Answer::Text(given) => {
            return Verdict::Invalid(InvalidReason::UnresolvedOption(given.clone()));
        }
    };

    let mut selected = BTreeSet::new();
    for r in refs {
        match check_ref(question, r) {
            Ok(index) => {
                selected.insert(index as i64);
            }
            Err(reason) => return Verdict::Invalid(reason),
        }
    }

    let expected: BTreeSet<i64> = match key {
        CorrectAnswer::Indices(indices) => indices.iter().copied().collect(),
        CorrectAnswer::Index(index) => BTreeSet::from([*index]),
        CorrectAnswer::Text(_) => return Verdict::Invalid(InvalidReason::TypeMismatch),
    };

    matched(selected == expected)
}

fn check_ref(question: &Question, r: &OptionRef) -> Result<usize, InvalidReason> {
    if r.question_id != question.id {
        return Err(InvalidReason::ForeignOption(r.question_id.clone()));
    }
    if r.option_index >= question.options.len() {
        return Err(InvalidReason::OptionOutOfRange(r.option_index));
    }
    Ok(r.option_index)
}

fn matched(is_match: bool) -> Verdict {
    if is_match {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        MultipleChoiceScoring, NavigationMode, QuestionOption, QuestionSource, ScoringSettings,
        SurveyType,
    };
    use crate::renderer;

    fn question(
        id: &str,
        question_type: QuestionType,
        options: &[&str],
        key: Option<CorrectAnswer>,
    ) -> Question {
        Question {
            id: id.to_string(),
            text: format!("Question {}", id),
            description: None,
            description_image: None,
            question_type,
            options: options
                .iter()
                .map(|o| QuestionOption::Text(o.to_string()))
                .collect(),
            correct_answer: key,
            points: None,
            tags: Vec::new(),
            difficulty: None,
        }
    }

    fn survey(questions: Vec<Question>, settings: ScoringSettings) -> Survey {
        Survey {
            id: "s".to_string(),
            title: "Scoring".to_string(),
            description: None,
            survey_type: SurveyType::Assessment,
            navigation_mode: NavigationMode::StepByStep,
            questions,
            scoring_settings: Some(settings),
            time_limit: None,
            question_source: QuestionSource::Manual,
        }
    }

    fn abc_survey() -> Survey {
        survey(
            vec![question(
                "q1",
                QuestionType::SingleChoice,
                &["A", "B", "C"],
                Some(CorrectAnswer::Index(1)),
            )],
            ScoringSettings {
                passing_threshold: 60.0,
                ..ScoringSettings::default()
            },
        )
    }

    #[test]
    fn test_empty_question_list_has_no_result() {
        let s = survey(Vec::new(), ScoringSettings::default());
        assert!(compute_score(&s, &s.questions, &AnswerStore::new()).is_none());
    }

    #[test]
    fn test_correct_single_choice_passes() {
        let s = abc_survey();
        let mut store = AnswerStore::new();
        renderer::select_single(&mut store, &s.questions[0], 1);

        let result = compute_score(&s, &s.questions, &store).unwrap();
        assert_eq!(result.total_points, 1.0);
        assert_eq!(result.max_possible_points, 1.0);
        assert_eq!(result.display_score, 100.0);
        assert!(result.passed);
    }

    #[test]
    fn test_wrong_or_missing_single_choice_fails() {
        let s = abc_survey();

        let mut store = AnswerStore::new();
        renderer::select_single(&mut store, &s.questions[0], 0);
        let wrong = compute_score(&s, &s.questions, &store).unwrap();
        assert_eq!(wrong.display_score, 0.0);
        assert!(!wrong.passed);

        let unanswered = compute_score(&s, &s.questions, &AnswerStore::new()).unwrap();
        assert_eq!(unanswered.display_score, 0.0);
        assert!(!unanswered.passed);
        assert_eq!(unanswered.max_possible_points, 1.0);
        assert_eq!(unanswered.outcomes[0].verdict, Verdict::Unanswered);
        assert_eq!(unanswered.wrong_answers, 1);
    }

    #[test]
    fn test_single_choice_index_matches_only_key() {
        let s = survey(
            vec![question(
                "q1",
                QuestionType::SingleChoice,
                &["w", "x", "y", "z"],
                Some(CorrectAnswer::Index(2)),
            )],
            ScoringSettings::default(),
        );
        for i in 0..4 {
            let mut store = AnswerStore::new();
            renderer::select_single(&mut store, &s.questions[0], i);
            let result = compute_score(&s, &s.questions, &store).unwrap();
            assert_eq!(result.correct_answers == 1, i == 2, "option {}", i);
        }
    }

    #[test]
    fn test_duplicate_option_text_keeps_selection() {
        let s = survey(
            vec![question(
                "q1",
                QuestionType::SingleChoice,
                &["Same", "Same"],
                Some(CorrectAnswer::Index(1)),
            )],
            ScoringSettings::default(),
        );
        let mut store = AnswerStore::new();
        renderer::select_single(&mut store, &s.questions[0], 1);

        let result = compute_score(&s, &s.questions, &store).unwrap();
        assert!(result.outcomes[0].verdict.is_correct());
    }

    #[test]
    fn test_single_choice_text_key() {
        let q = question(
            "q1",
            QuestionType::SingleChoice,
            &["Red", "Blue"],
            Some(CorrectAnswer::Text("Blue".to_string())),
        );
        let pick = |i| Answer::Choice(OptionRef::new("q1", i));
        assert_eq!(evaluate(&q, Some(&pick(1))), Verdict::Correct);
        assert_eq!(evaluate(&q, Some(&pick(0))), Verdict::Incorrect);
        assert_eq!(
            evaluate(&q, Some(&Answer::Text("Blue".to_string()))),
            Verdict::Correct
        );
    }

    #[test]
    fn test_multiple_choice_is_all_or_nothing() {
        let settings = ScoringSettings {
            multiple_choice_scoring: MultipleChoiceScoring {
                enable_partial_scoring: true,
            },
            ..ScoringSettings::default()
        };
        let s = survey(
            vec![question(
                "m",
                QuestionType::MultipleChoice,
                &["a", "b", "c", "d"],
                Some(CorrectAnswer::Indices(vec![0, 2, 3])),
            )],
            settings,
        );
        let q = &s.questions[0];

        let mut subset = AnswerStore::new();
        renderer::toggle_multiple(&mut subset, q, 0);
        renderer::toggle_multiple(&mut subset, q, 2);
        let partial = compute_score(&s, &s.questions, &subset).unwrap();
        assert_eq!(partial.total_points, 0.0);

        let mut superset = subset.clone();
        renderer::toggle_multiple(&mut superset, q, 3);
        renderer::toggle_multiple(&mut superset, q, 1);
        assert_eq!(compute_score(&s, &s.questions, &superset).unwrap().total_points, 0.0);

        let mut exact = subset.clone();
        renderer::toggle_multiple(&mut exact, q, 3);
        assert_eq!(compute_score(&s, &s.questions, &exact).unwrap().total_points, 1.0);
    }

    #[test]
    fn test_multiple_choice_wraps_scalar_answer_and_key() {
        let q = question(
            "m",
            QuestionType::MultipleChoice,
            &["a", "b"],
            Some(CorrectAnswer::Index(1)),
        );
        assert_eq!(
            evaluate(&q, Some(&Answer::Choice(OptionRef::new("m", 1)))),
            Verdict::Correct
        );
    }

    #[test]
    fn test_short_text_is_exact() {
        let q = question(
            "t",
            QuestionType::ShortText,
            &[],
            Some(CorrectAnswer::Text("Paris".to_string())),
        );
        assert_eq!(evaluate(&q, Some(&Answer::Text("Paris".to_string()))), Verdict::Correct);
        assert_eq!(evaluate(&q, Some(&Answer::Text("paris".to_string()))), Verdict::Incorrect);
        assert_eq!(evaluate(&q, Some(&Answer::Text(String::new()))), Verdict::Unanswered);
    }

    #[test]
    fn test_invalid_inputs_degrade() {
        let no_key = question("n", QuestionType::SingleChoice, &["a", "b"], None);
        assert_eq!(
            evaluate(&no_key, Some(&Answer::Choice(OptionRef::new("n", 0)))),
            Verdict::Invalid(InvalidReason::MissingAnswerKey)
        );

        let q = question("q", QuestionType::SingleChoice, &["a", "b"], Some(CorrectAnswer::Index(0)));
        assert_eq!(
            evaluate(&q, Some(&Answer::Choice(OptionRef::new("q", 7)))),
            Verdict::Invalid(InvalidReason::OptionOutOfRange(7))
        );
        assert_eq!(
            evaluate(&q, Some(&Answer::Choice(OptionRef::new("other", 0)))),
            Verdict::Invalid(InvalidReason::ForeignOption("other".to_string()))
        );
        assert_eq!(
            evaluate(&q, Some(&Answer::Text("a".to_string()))),
            Verdict::Invalid(InvalidReason::UnresolvedOption("a".to_string()))
        );
    }

    #[test]
    fn test_zero_max_points_reports_zero_percent() {
        let mut q = question("q", QuestionType::SingleChoice, &["a", "b"], Some(CorrectAnswer::Index(0)));
        q.points = Some(0.0);
        let s = survey(vec![q], ScoringSettings::default());
        let mut store = AnswerStore::new();
        renderer::select_single(&mut store, &s.questions[0], 0);

        let result = compute_score(&s, &s.questions, &store).unwrap();
        assert_eq!(result.max_possible_points, 0.0);
        assert_eq!(result.percentage, 0.0);
        assert!(!result.percentage.is_nan());
    }

    #[test]
    fn test_accumulated_mode_uses_points() {
        let mut heavy = question("h", QuestionType::ShortText, &[], Some(CorrectAnswer::Text("x".to_string())));
        heavy.points = Some(3.0);
        let light = question("l", QuestionType::ShortText, &[], Some(CorrectAnswer::Text("y".to_string())));
        let s = survey(
            vec![heavy, light],
            ScoringSettings {
                scoring_mode: ScoringMode::Accumulated,
                passing_threshold: 3.0,
                ..ScoringSettings::default()
            },
        );
        let mut store = AnswerStore::new();
        renderer::set_text(&mut store, &s.questions[0], "x");

        let result = compute_score(&s, &s.questions, &store).unwrap();
        assert_eq!(result.display_score, 3.0);
        assert_eq!(result.max_possible_points, 4.0);
        assert_eq!(result.percentage, 75.0);
        assert!(result.passed);
    }

    #[test]
    fn test_custom_default_points() {
        let s = survey(
            vec![question("t", QuestionType::ShortText, &[], Some(CorrectAnswer::Text("x".to_string())))],
            ScoringSettings {
                custom_question_points: true,
                default_question_points: Some(4.0),
                ..ScoringSettings::default()
            },
        );
        let result = compute_score(&s, &s.questions, &AnswerStore::new()).unwrap();
        assert_eq!(result.max_possible_points, 4.0);
    }

    #[test]
    fn test_compute_score_is_idempotent() {
        let s = abc_survey();
        let mut store = AnswerStore::new();
        renderer::select_single(&mut store, &s.questions[0], 2);

        let first = compute_score(&s, &s.questions, &store);
        let second = compute_score(&s, &s.questions, &store);
        assert_eq!(first, second);
    }
}
