use std::collections::HashSet;
use std::path::PathBuf;

use crate::config::PreviewConfig;
use crate::model::{Question, QuestionType, Survey};
use crate::navigation::{FocusTarget, Navigator, PageLayout, Phase};
use crate::renderer::{self, InputKind};
use crate::report::{self, PreviewReport, Visibility};
use crate::scoring::ScoringResult;
use crate::store::AnswerStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// The survey has no questions to preview.
    Empty,
    Answering,
    Submitted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    ConfirmSubmit,
    ConfirmReset,
    ConfirmQuit,
    SubmitOnLastPage,
    TimeWarning,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Navigation,
    ChoiceSelect,
    TextInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePanel {
    Sidebar,
    Main,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub survey: Survey,
    pub survey_path: PathBuf,
    pub fingerprint: String,
    pub config: PreviewConfig,
    pub store: AnswerStore,
    pub nav: Navigator,
    pub result: Option<ScoringResult>,
    pub visited: HashSet<String>,
    pub input_mode: InputMode,
    pub dialog_stack: Vec<Dialog>,
    pub choice_cursor: usize,
    pub text_input: String,
    pub text_cursor: usize,
    pub remaining_seconds: Option<i64>,
    pub started_at: String,
    pub submitted_at: Option<String>,
    pub sidebar_scroll: usize,
    pub question_scroll: usize,
    pub result_scroll: usize,
    pub active_panel: ActivePanel,
    pub status_message: Option<String>,
    pub export_path: Option<PathBuf>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(survey: Survey, survey_path: PathBuf, fingerprint: String, config: PreviewConfig) -> Self {
        let nav = Navigator::new(&survey);
        let mut state = Self {
            survey,
            survey_path,
            fingerprint,
            config,
            store: AnswerStore::new(),
            nav,
            result: None,
            visited: HashSet::new(),
            input_mode: InputMode::Navigation,
            dialog_stack: Vec::new(),
            choice_cursor: 0,
            text_input: String::new(),
            text_cursor: 0,
            remaining_seconds: None,
            started_at: chrono::Utc::now().to_rfc3339(),
            submitted_at: None,
            sidebar_scroll: 0,
            question_scroll: 0,
            result_scroll: 0,
            active_panel: ActivePanel::Main,
            status_message: None,
            export_path: None,
            should_quit: false,
        };
        state.enter_current();
        state
    }

    pub fn screen(&self) -> Screen {
        if self.survey.questions.is_empty() {
            Screen::Empty
        } else if self.nav.phase() == Phase::Submitted {
            Screen::Submitted
        } else {
            Screen::Answering
        }
    }

    pub fn time_limit_secs(&self) -> Option<i64> {
        self.survey.time_limit.map(|minutes| i64::from(minutes) * 60)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.survey.questions.get(self.nav.current())
    }

    pub fn current_question_id(&self) -> Option<String> {
        self.current_question().map(|q| q.id.clone())
    }

    pub fn navigate_to(&mut self, idx: usize) {
        self.save_current_text_input();
        if self.nav.go_to(idx) {
            self.enter_current();
        }
    }

    pub fn navigate_prev(&mut self) {
        if let Some(idx) = self.nav.current().checked_sub(1) {
            self.navigate_to(idx);
        }
    }

    pub fn navigate_next(&mut self) {
        self.navigate_to(self.nav.current() + 1);
    }

    /// Focus a question from the sidebar. Returns the scroll anchor when the
    /// page holds every question.
    pub fn focus_question(&mut self, question_id: &str) -> Option<FocusTarget> {
        self.save_current_text_input();
        let target = self.nav.focus_question(&self.survey, question_id)?;
        self.enter_current();
        Some(target)
    }

    fn enter_current(&mut self) {
        if let Some(id) = self.current_question_id() {
            self.visited.insert(id);
        }
        self.load_text_input_for_current();
        self.choice_cursor = 0;
        if self.nav.layout() == PageLayout::OnePerPage {
            self.question_scroll = 0;
        }
        self.update_input_mode();
    }

    pub fn save_current_text_input(&mut self) {
        let Some(question) = self.current_question().cloned() else {
            return;
        };
        if question.question_type != QuestionType::ShortText || self.screen() != Screen::Answering {
            return;
        }
        if !self.text_input.is_empty() || self.store.get(&question.id).is_some() {
            renderer::set_text(&mut self.store, &question, &self.text_input);
        }
    }

    pub fn load_text_input_for_current(&mut self) {
        let text = self.current_question().and_then(|q| match self.store.get(&q.id) {
            Some(crate::model::Answer::Text(text)) => Some(text.clone()),
            _ => None,
        });
        self.text_input = text.unwrap_or_default();
        self.text_cursor = self.text_input.len();
    }

    pub fn update_input_mode(&mut self) {
        if self.screen() != Screen::Answering {
            self.input_mode = InputMode::Navigation;
            return;
        }
        if let Some(q) = self.current_question() {
            self.input_mode = match InputKind::for_question(q) {
                InputKind::Radio | InputKind::Checkbox => InputMode::ChoiceSelect,
                InputKind::FreeText => InputMode::TextInput,
            };
        }
    }

    /// Select or toggle option `idx` of the focused question.
    pub fn activate_choice(&mut self, idx: usize) -> bool {
        if self.screen() != Screen::Answering {
            return false;
        }
        let Some(question) = self.current_question().cloned() else {
            return false;
        };
        let changed = renderer::activate_option(&mut self.store, &question, idx);
        if changed {
            self.choice_cursor = idx;
        }
        changed
    }

    /// Select or toggle an option of any question, used by mouse clicks on
    /// the single-page layout.
    pub fn activate_choice_at(&mut self, question_idx: usize, option_idx: usize) -> bool {
        if question_idx != self.nav.current() {
            self.navigate_to(question_idx);
        }
        self.activate_choice(option_idx)
    }

    pub fn is_choice_selected(&self, question_id: &str, idx: usize) -> bool {
        self.store
            .get(question_id)
            .is_some_and(|a| a.contains_option(idx))
    }

    pub fn question_status(&self, question: &Question) -> QuestionStatus {
        if self.store.is_answered(&question.id) {
            QuestionStatus::Answered
        } else if self.visited.contains(&question.id) {
            QuestionStatus::Unanswered
        } else {
            QuestionStatus::Unread
        }
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for q in &self.survey.questions {
            match self.question_status(q) {
                QuestionStatus::Unread => counts.unread += 1,
                QuestionStatus::Unanswered => counts.unanswered += 1,
                QuestionStatus::Answered => counts.answered += 1,
            }
        }
        counts
    }

    pub fn visibility(&self) -> Visibility {
        Visibility::from_settings(&self.survey.scoring(), self.config.reveal_answers)
    }

    /// Score the session. Returns false when submitting isn't possible from
    /// the current page.
    pub fn submit(&mut self) -> bool {
        self.save_current_text_input();
        match self.nav.submit(&self.survey, &self.store) {
            Some(result) => {
                self.finish(result);
                true
            }
            None => false,
        }
    }

    /// Time ran out: submit from wherever the respondent is.
    pub fn expire(&mut self) {
        self.save_current_text_input();
        if let Some(result) = self.nav.submit_now(&self.survey, &self.store) {
            self.status_message = Some("Time is up. The preview was submitted.".to_string());
            self.finish(result);
        }
    }

    fn finish(&mut self, result: ScoringResult) {
        tracing::info!(
            survey = %self.survey.id,
            score = result.display_score,
            passed = result.passed,
            "preview scored"
        );
        self.submitted_at = Some(chrono::Utc::now().to_rfc3339());
        self.result = Some(result);
        self.result_scroll = 0;
        self.dialog_stack.clear();
        self.input_mode = InputMode::Navigation;
    }

    /// Start a fresh session: answers cleared, new session id, first page.
    pub fn reset(&mut self) {
        self.nav.reset(&mut self.store);
        self.result = None;
        self.visited.clear();
        self.text_input.clear();
        self.text_cursor = 0;
        self.dialog_stack.clear();
        self.question_scroll = 0;
        self.sidebar_scroll = 0;
        self.started_at = chrono::Utc::now().to_rfc3339();
        self.submitted_at = None;
        self.remaining_seconds = self.time_limit_secs();
        self.status_message = None;
        self.enter_current();
    }

    pub fn report(&self) -> Option<PreviewReport> {
        let result = self.result.clone()?;
        let submitted_at = self.submitted_at.as_deref().unwrap_or_default();
        Some(report::session_report(
            &self.survey,
            &self.survey_path,
            &self.fingerprint,
            &self.store,
            result,
            &self.started_at,
            submitted_at,
        ))
    }

    pub fn has_dialog(&self) -> bool {
        !self.dialog_stack.is_empty()
    }

    pub fn top_dialog(&self) -> Option<&Dialog> {
        self.dialog_stack.last()
    }

    pub fn push_dialog(&mut self, dialog: Dialog) {
        self.dialog_stack.push(dialog);
    }

    pub fn pop_dialog(&mut self) -> Option<Dialog> {
        self.dialog_stack.pop()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStatus {
    Unread,
    Unanswered,
    Answered,
}

#[derive(Debug, Default)]
pub struct StatusCounts {
    pub unread: usize,
    pub unanswered: usize,
    pub answered: usize,
}
