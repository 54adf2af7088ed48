use crate::model::{NavigationMode, Question, Survey, SurveyType};
use crate::scoring::{self, ScoringResult};
use crate::store::AnswerStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLayout {
    /// Every question on one scrollable page.
    AllOnOnePage,
    OnePerPage,
}

impl PageLayout {
    /// Assessments always show one question per page; other survey types
    /// follow their stored navigation mode.
    pub fn for_survey(survey: &Survey) -> Self {
        if survey.survey_type == SurveyType::Assessment {
            return PageLayout::OnePerPage;
        }
        match survey.navigation_mode {
            NavigationMode::StepByStep => PageLayout::AllOnOnePage,
            NavigationMode::OneQuestionPerPage => PageLayout::OnePerPage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Answering,
    /// Read-only result view. Only `reset` leaves it.
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusTarget {
    Page(usize),
    /// Scroll the single page to the element tagged with this question id.
    Anchor { question_id: String, index: usize },
}

#[derive(Debug, Clone)]
pub struct Navigator {
    layout: PageLayout,
    current: usize,
    total: usize,
    phase: Phase,
}

impl Navigator {
    pub fn new(survey: &Survey) -> Self {
        Self {
            layout: PageLayout::for_survey(survey),
            current: 0,
            total: survey.questions.len(),
            phase: Phase::Answering,
        }
    }

    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the focused question.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page(&self) -> usize {
        match self.layout {
            PageLayout::OnePerPage => self.current,
            PageLayout::AllOnOnePage => 0,
        }
    }

    pub fn page_count(&self) -> usize {
        match self.layout {
            PageLayout::OnePerPage => self.total,
            PageLayout::AllOnOnePage => usize::from(self.total > 0),
        }
    }

    /// Questions visible on the current page.
    pub fn page_questions<'a>(&self, survey: &'a Survey) -> &'a [Question] {
        match self.layout {
            PageLayout::AllOnOnePage => &survey.questions,
            PageLayout::OnePerPage => {
                let end = (self.current + 1).min(survey.questions.len());
                &survey.questions[self.current.min(end)..end]
            }
        }
    }

    pub fn is_last(&self) -> bool {
        self.total > 0 && self.current + 1 == self.total
    }

    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Answering
            && self.total > 0
            && (self.layout == PageLayout::AllOnOnePage || self.is_last())
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        if self.phase == Phase::Submitted || index >= self.total {
            return false;
        }
        self.current = index;
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current + 1)
    }

    pub fn prev(&mut self) -> bool {
        match self.current.checked_sub(1) {
            Some(index) => self.go_to(index),
            None => false,
        }
    }

    /// Bring `question_id` into view: a page change in one-per-page mode, a
    /// scroll anchor otherwise.
    pub fn focus_question(&mut self, survey: &Survey, question_id: &str) -> Option<FocusTarget> {
        let index = survey.question_index(question_id)?;
        if !self.go_to(index) {
            return None;
        }
        Some(match self.layout {
            PageLayout::OnePerPage => FocusTarget::Page(index),
            PageLayout::AllOnOnePage => FocusTarget::Anchor {
                question_id: question_id.to_string(),
                index,
            },
        })
    }

    /// Score the session and switch to the read-only result view. Nothing is
    /// sent anywhere.
    pub fn submit(&mut self, survey: &Survey, store: &AnswerStore) -> Option<ScoringResult> {
        if !self.can_submit() {
            return None;
        }
        let result = scoring::compute_score(survey, &survey.questions, store)?;
        tracing::debug!(
            survey = %survey.id,
            session = %store.session_id(),
            answered = store.answered_count(),
            "preview mode: response submission suppressed"
        );
        self.phase = Phase::Submitted;
        Some(result)
    }

    /// Submit from wherever the respondent is, used when time runs out.
    pub fn submit_now(&mut self, survey: &Survey, store: &AnswerStore) -> Option<ScoringResult> {
        if self.phase == Phase::Submitted || self.total == 0 {
            return None;
        }
        self.current = self.total - 1;
        self.submit(survey, store)
    }

    /// Clear the answers and start over on the first page.
    pub fn reset(&mut self, store: &mut AnswerStore) {
        store.clear();
        self.current = 0;
        self.phase = Phase::Answering;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CorrectAnswer, QuestionOption, QuestionSource, QuestionType};
    use crate::renderer;

    fn survey(survey_type: SurveyType, navigation_mode: NavigationMode, count: usize) -> Survey {
        let questions = (0..count)
            .map(|i| Question {
                id: format!("q{}", i + 1),
                text: format!("Question {}", i + 1),
                description: None,
                description_image: None,
                question_type: QuestionType::SingleChoice,
                options: vec![
                    QuestionOption::Text("yes".to_string()),
                    QuestionOption::Text("no".to_string()),
                ],
                correct_answer: Some(CorrectAnswer::Index(0)),
                points: None,
                tags: Vec::new(),
                difficulty: None,
            })
            .collect();
        Survey {
            id: "nav".to_string(),
            title: "Navigation".to_string(),
            description: None,
            survey_type,
            navigation_mode,
            questions,
            scoring_settings: None,
            time_limit: None,
            question_source: QuestionSource::Manual,
        }
    }

    #[test]
    fn test_assessment_forces_one_per_page() {
        let s = survey(SurveyType::Assessment, NavigationMode::StepByStep, 3);
        assert_eq!(PageLayout::for_survey(&s), PageLayout::OnePerPage);
    }

    #[test]
    fn test_other_types_follow_stored_mode() {
        let step = survey(SurveyType::Survey, NavigationMode::StepByStep, 3);
        let paged = survey(SurveyType::Onboarding, NavigationMode::OneQuestionPerPage, 3);
        assert_eq!(PageLayout::for_survey(&step), PageLayout::AllOnOnePage);
        assert_eq!(PageLayout::for_survey(&paged), PageLayout::OnePerPage);
    }

    #[test]
    fn test_focus_question_moves_page() {
        let s = survey(SurveyType::Assessment, NavigationMode::StepByStep, 4);
        let mut nav = Navigator::new(&s);

        assert_eq!(nav.focus_question(&s, "q3"), Some(FocusTarget::Page(2)));
        assert_eq!(nav.page(), 2);
        assert_eq!(nav.page_questions(&s)[0].id, "q3");
        assert_eq!(nav.focus_question(&s, "missing"), None);
    }

    #[test]
    fn test_focus_question_anchors_on_single_page() {
        let s = survey(SurveyType::Survey, NavigationMode::StepByStep, 4);
        let mut nav = Navigator::new(&s);

        assert_eq!(
            nav.focus_question(&s, "q2"),
            Some(FocusTarget::Anchor {
                question_id: "q2".to_string(),
                index: 1
            })
        );
        assert_eq!(nav.page(), 0);
        assert_eq!(nav.current(), 1);
        assert_eq!(nav.page_questions(&s).len(), 4);
    }

    #[test]
    fn test_submit_only_from_last_page() {
        let s = survey(SurveyType::Assessment, NavigationMode::StepByStep, 2);
        let mut nav = Navigator::new(&s);
        let store = AnswerStore::new();

        assert!(nav.submit(&s, &store).is_none());
        assert!(nav.next());
        assert!(nav.is_last());
        assert!(!nav.next());
        assert!(nav.submit(&s, &store).is_some());
        assert_eq!(nav.phase(), Phase::Submitted);
    }

    #[test]
    fn test_submitted_is_read_only_until_reset() {
        let s = survey(SurveyType::Survey, NavigationMode::StepByStep, 2);
        let mut nav = Navigator::new(&s);
        let mut store = AnswerStore::new();
        renderer::select_single(&mut store, &s.questions[0], 0);
        let session = store.session_id();

        let result = nav.submit(&s, &store).unwrap();
        assert_eq!(result.correct_answers, 1);
        assert!(!nav.go_to(1));
        assert!(nav.submit(&s, &store).is_none());

        nav.reset(&mut store);
        assert_eq!(nav.phase(), Phase::Answering);
        assert_eq!(nav.current(), 0);
        assert!(store.is_empty());
        assert_ne!(store.session_id(), session);
    }

    #[test]
    fn test_submit_now_jumps_to_end() {
        let s = survey(SurveyType::Assessment, NavigationMode::OneQuestionPerPage, 3);
        let mut nav = Navigator::new(&s);
        let store = AnswerStore::new();

        let result = nav.submit_now(&s, &store).unwrap();
        assert_eq!(result.wrong_answers, 3);
        assert_eq!(nav.current(), 2);
    }

    #[test]
    fn test_empty_survey_cannot_submit() {
        let s = survey(SurveyType::Survey, NavigationMode::StepByStep, 0);
        let mut nav = Navigator::new(&s);
        assert_eq!(nav.page_count(), 0);
        assert!(nav.submit_now(&s, &AnswerStore::new()).is_none());
        assert_eq!(nav.phase(), Phase::Answering);
    }
}
