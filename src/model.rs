use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyType {
    #[default]
    Survey,
    Assessment,
    Onboarding,
    LiveQuiz,
}

impl SurveyType {
    pub fn label(self) -> &'static str {
        match self {
            SurveyType::Survey => "Survey",
            SurveyType::Assessment => "Assessment",
            SurveyType::Onboarding => "Onboarding",
            SurveyType::LiveQuiz => "Live quiz",
        }
    }
}

/// Stored navigation preference. `StepByStep` renders every question on one
/// scrollable page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationMode {
    #[default]
    StepByStep,
    OneQuestionPerPage,
}

/// Where a survey's questions come from. Bank-based surveys draw their
/// questions when a respondent starts, so an empty list is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    #[default]
    Manual,
    QuestionBank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    ShortText,
}

impl QuestionType {
    pub fn is_choice(self) -> bool {
        matches!(self, QuestionType::SingleChoice | QuestionType::MultipleChoice)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// An option is either plain text or text with an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionOption {
    Text(String),
    Rich {
        text: String,
        #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
        image_url: Option<String>,
    },
}

impl QuestionOption {
    pub fn text(&self) -> &str {
        match self {
            QuestionOption::Text(text) => text,
            QuestionOption::Rich { text, .. } => text,
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            QuestionOption::Text(_) => None,
            QuestionOption::Rich { image_url, .. } => image_url.as_deref(),
        }
    }
}

/// Answer key as stored by the authoring forms. Its shape depends on the
/// question type, but nothing enforces that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Index(i64),
    Indices(Vec<i64>),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default, alias = "_id")]
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_image: Option<String>,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub correct_answer: Option<CorrectAnswer>,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl Question {
    pub fn option_text(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(|o| o.text())
    }

    /// Human readable form of the answer key, used by the result view.
    pub fn correct_answer_display(&self) -> Option<String> {
        match self.correct_answer.as_ref()? {
            CorrectAnswer::Index(i) => Some(self.index_display(*i)),
            CorrectAnswer::Indices(indices) => Some(
                indices
                    .iter()
                    .map(|i| self.index_display(*i))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            CorrectAnswer::Text(text) => Some(text.clone()),
        }
    }

    fn index_display(&self, index: i64) -> String {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.option_text(i))
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", index))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    #[default]
    Percentage,
    Accumulated,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultipleChoiceScoring {
    pub enable_partial_scoring: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringSettings {
    pub scoring_mode: ScoringMode,
    pub passing_threshold: f64,
    pub show_score: bool,
    pub show_correct_answers: bool,
    pub show_score_breakdown: bool,
    pub custom_question_points: bool,
    pub default_question_points: Option<f64>,
    pub multiple_choice_scoring: MultipleChoiceScoring,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            scoring_mode: ScoringMode::Percentage,
            passing_threshold: 60.0,
            show_score: true,
            show_correct_answers: false,
            show_score_breakdown: false,
            custom_question_points: false,
            default_question_points: None,
            multiple_choice_scoring: MultipleChoiceScoring::default(),
        }
    }
}

impl ScoringSettings {
    /// Points for a question that doesn't carry its own value.
    pub fn default_points(&self) -> f64 {
        if self.custom_question_points {
            self.default_question_points.unwrap_or(1.0)
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    #[serde(default, alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub survey_type: SurveyType,
    #[serde(default)]
    pub navigation_mode: NavigationMode,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub scoring_settings: Option<ScoringSettings>,
    /// Minutes.
    #[serde(default)]
    pub time_limit: Option<u32>,
    #[serde(default)]
    pub question_source: QuestionSource,
}

impl Survey {
    pub fn scoring(&self) -> ScoringSettings {
        self.scoring_settings.clone().unwrap_or_default()
    }

    pub fn question_index(&self, question_id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.id == question_id)
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Questions exported without an id get a positional one (`q1`, `q2`, ...),
    /// suffixed when another question already uses it.
    pub fn assign_missing_ids(&mut self) {
        let mut taken: HashSet<String> = self
            .questions
            .iter()
            .filter(|q| !q.id.trim().is_empty())
            .map(|q| q.id.clone())
            .collect();
        for (i, q) in self.questions.iter_mut().enumerate() {
            if !q.id.trim().is_empty() {
                continue;
            }
            let base = format!("q{}", i + 1);
            let mut id = base.clone();
            let mut n = 2;
            while taken.contains(&id) {
                id = format!("{}-{}", base, n);
                n += 1;
            }
            taken.insert(id.clone());
            q.id = id;
        }
    }

    /// Check the authoring invariants. The preview still runs on an invalid
    /// survey; callers decide whether issues are fatal.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut seen: Vec<&str> = Vec::new();

        for (position, q) in self.questions.iter().enumerate() {
            let mut push = |problem: Problem| {
                issues.push(ValidationIssue {
                    question_id: q.id.clone(),
                    position,
                    problem,
                })
            };

            if seen.contains(&q.id.as_str()) {
                push(Problem::DuplicateId);
            }
            seen.push(&q.id);

            if q.text.trim().is_empty() {
                push(Problem::EmptyText);
            }

            if !q.question_type.is_choice() {
                if let Some(CorrectAnswer::Index(_) | CorrectAnswer::Indices(_)) = q.correct_answer {
                    push(Problem::AnswerKeyShape);
                }
                continue;
            }

            let filled = q.options.iter().filter(|o| !o.text().trim().is_empty()).count();
            if filled < 2 {
                push(Problem::TooFewOptions { found: filled });
            }
            for (index, option) in q.options.iter().enumerate() {
                if option.text().trim().is_empty() {
                    push(Problem::EmptyOption { index });
                } else if q.options[..index].iter().any(|o| o.text() == option.text()) {
                    push(Problem::DuplicateOption { index });
                }
            }

            let in_range = |i: i64| i >= 0 && (i as usize) < q.options.len();
            match &q.correct_answer {
                None => push(Problem::MissingAnswerKey),
                Some(CorrectAnswer::Index(i)) => {
                    if !in_range(*i) {
                        push(Problem::AnswerOutOfRange { index: *i });
                    }
                }
                Some(CorrectAnswer::Indices(indices)) => {
                    if q.question_type == QuestionType::SingleChoice {
                        push(Problem::AnswerKeyShape);
                    }
                    for i in indices.iter().filter(|i| !in_range(**i)) {
                        push(Problem::AnswerOutOfRange { index: *i });
                    }
                }
                Some(CorrectAnswer::Text(_)) => {
                    if q.question_type == QuestionType::MultipleChoice {
                        push(Problem::AnswerKeyShape);
                    }
                }
            }
        }

        issues
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub question_id: String,
    pub position: usize,
    pub problem: Problem,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Problem {
    DuplicateId,
    EmptyText,
    TooFewOptions { found: usize },
    EmptyOption { index: usize },
    DuplicateOption { index: usize },
    MissingAnswerKey,
    AnswerOutOfRange { index: i64 },
    AnswerKeyShape,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "question {} ({}): ", self.position + 1, self.question_id)?;
        match &self.problem {
            Problem::DuplicateId => write!(f, "duplicate question id"),
            Problem::EmptyText => write!(f, "question text is empty"),
            Problem::TooFewOptions { found } => {
                write!(f, "needs at least 2 non-empty options, found {}", found)
            }
            Problem::EmptyOption { index } => write!(f, "option {} is empty", index + 1),
            Problem::DuplicateOption { index } => {
                write!(f, "option {} repeats an earlier option's text", index + 1)
            }
            Problem::MissingAnswerKey => write!(f, "no correct answer set"),
            Problem::AnswerOutOfRange { index } => {
                write!(f, "correct answer index {} is out of range", index)
            }
            Problem::AnswerKeyShape => write!(f, "correct answer does not fit the question type"),
        }
    }
}

/// Stable reference to one option of one question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionRef {
    pub question_id: String,
    pub option_index: usize,
}

impl OptionRef {
    pub fn new(question_id: impl Into<String>, option_index: usize) -> Self {
        Self {
            question_id: question_id.into(),
            option_index,
        }
    }
}

/// A respondent's answer during a preview session. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    Text(String),
    Choice(OptionRef),
    Choices(Vec<OptionRef>),
}

impl Answer {
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Text(text) => text.is_empty(),
            Answer::Choice(_) => false,
            Answer::Choices(refs) => refs.is_empty(),
        }
    }

    pub fn contains_option(&self, index: usize) -> bool {
        match self {
            Answer::Text(_) => false,
            Answer::Choice(r) => r.option_index == index,
            Answer::Choices(refs) => refs.iter().any(|r| r.option_index == index),
        }
    }
}
