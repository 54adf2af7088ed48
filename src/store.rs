use std::collections::HashMap;

use uuid::Uuid;

use crate::model::Answer;

/// Answers given during one preview session, keyed by question id.
///
/// Writes are never validated here; the scoring engine decides what an
/// answer is worth.
#[derive(Debug, Clone)]
pub struct AnswerStore {
    session_id: Uuid,
    answers: HashMap<String, Answer>,
}

impl Default for AnswerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AnswerStore {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            answers: HashMap::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn set_answer(&mut self, question_id: impl Into<String>, value: Answer) {
        self.answers.insert(question_id.into(), value);
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Answer)> {
        self.answers.iter()
    }

    /// Answers that count as given (non-empty text, at least one option).
    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|a| !a.is_empty()).count()
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.get(question_id).is_some_and(|a| !a.is_empty())
    }

    /// Drop every answer and start a new session.
    pub fn clear(&mut self) {
        let previous = self.session_id;
        self.answers.clear();
        self.session_id = Uuid::new_v4();
        tracing::debug!(%previous, session = %self.session_id, "preview session reset");
    }
}
