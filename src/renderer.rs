use serde::Deserialize;

use crate::model::{Answer, OptionRef, Question, QuestionType};
use crate::store::AnswerStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    FreeText,
    Radio,
    Checkbox,
}

impl InputKind {
    pub fn for_question(question: &Question) -> Self {
        match question.question_type {
            QuestionType::ShortText => InputKind::FreeText,
            QuestionType::SingleChoice => InputKind::Radio,
            QuestionType::MultipleChoice => InputKind::Checkbox,
        }
    }
}

/// Select option `index` of a single choice question. Out of range indices
/// and non single choice questions are ignored.
pub fn select_single(store: &mut AnswerStore, question: &Question, index: usize) -> bool {
    if question.question_type != QuestionType::SingleChoice || index >= question.options.len() {
        return false;
    }
    store.set_answer(
        question.id.clone(),
        Answer::Choice(OptionRef::new(question.id.clone(), index)),
    );
    true
}

/// Add or remove option `index` of a multiple choice question.
pub fn toggle_multiple(store: &mut AnswerStore, question: &Question, index: usize) -> bool {
    if question.question_type != QuestionType::MultipleChoice || index >= question.options.len() {
        return false;
    }

    let mut selected = match store.get(&question.id) {
        Some(Answer::Choices(refs)) => refs.clone(),
        Some(Answer::Choice(r)) => vec![r.clone()],
        _ => Vec::new(),
    };

    if let Some(pos) = selected.iter().position(|r| r.option_index == index) {
        selected.remove(pos);
    } else {
        selected.push(OptionRef::new(question.id.clone(), index));
    }

    store.set_answer(question.id.clone(), Answer::Choices(selected));
    true
}

/// Store the raw text of a short text answer.
pub fn set_text(store: &mut AnswerStore, question: &Question, text: &str) -> bool {
    if question.question_type != QuestionType::ShortText {
        return false;
    }
    store.set_answer(question.id.clone(), Answer::Text(text.to_string()));
    true
}

/// Dispatch an option activation (key press or click) by question type.
pub fn activate_option(store: &mut AnswerStore, question: &Question, index: usize) -> bool {
    match InputKind::for_question(question) {
        InputKind::Radio => select_single(store, question, index),
        InputKind::Checkbox => toggle_multiple(store, question, index),
        InputKind::FreeText => false,
    }
}

/// First option whose display text equals `display_text`.
pub fn resolve_option(question: &Question, display_text: &str) -> Option<usize> {
    question.options.iter().position(|o| o.text() == display_text)
}

/// Answer as written in an answers file: display text or a list of them.
/// Unquoted numbers and booleans are read as their display text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawImport")]
pub enum ImportedAnswer {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawImport {
    One(Scalar),
    Many(Vec<Scalar>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(text) => text,
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Flag(b) => b.to_string(),
        }
    }
}

impl From<RawImport> for ImportedAnswer {
    fn from(raw: RawImport) -> Self {
        match raw {
            RawImport::One(scalar) => ImportedAnswer::One(scalar.into()),
            RawImport::Many(scalars) => ImportedAnswer::Many(scalars.into_iter().map(String::from).collect()),
        }
    }
}

/// Convert an imported answer into the store's representation.
///
/// Text that matches no option is kept as `Answer::Text` so the scoring
/// engine can report it instead of the answer silently disappearing.
pub fn normalize_imported(question: &Question, imported: &ImportedAnswer) -> Answer {
    match question.question_type {
        QuestionType::ShortText => match imported {
            ImportedAnswer::One(text) => Answer::Text(text.clone()),
            ImportedAnswer::Many(parts) => Answer::Text(parts.join(", ")),
        },
        QuestionType::SingleChoice => {
            let text = match imported {
                ImportedAnswer::One(text) => text.as_str(),
                ImportedAnswer::Many(parts) => parts.first().map(String::as_str).unwrap_or(""),
            };
            match resolve_option(question, text) {
                Some(index) => Answer::Choice(OptionRef::new(question.id.clone(), index)),
                None => Answer::Text(text.to_string()),
            }
        }
        QuestionType::MultipleChoice => {
            let parts: Vec<&str> = match imported {
                ImportedAnswer::One(text) => vec![text.as_str()],
                ImportedAnswer::Many(parts) => parts.iter().map(String::as_str).collect(),
            };
            let mut refs = Vec::with_capacity(parts.len());
            for part in parts {
                match resolve_option(question, part) {
                    Some(index) => refs.push(OptionRef::new(question.id.clone(), index)),
                    None => {
                        tracing::warn!(question = %question.id, answer = part, "answer matches no option");
                        return Answer::Text(part.to_string());
                    }
                }
            }
            Answer::Choices(refs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionOption;

    fn question(id: &str, question_type: QuestionType, options: &[&str]) -> Question {
        Question {
            id: id.to_string(),
            text: "?".to_string(),
            description: None,
            description_image: None,
            question_type,
            options: options
                .iter()
                .map(|o| QuestionOption::Text(o.to_string()))
                .collect(),
            correct_answer: None,
            points: None,
            tags: Vec::new(),
            difficulty: None,
        }
    }

    #[test]
    fn test_select_single_stores_option_ref() {
        let q = question("q1", QuestionType::SingleChoice, &["A", "B"]);
        let mut store = AnswerStore::new();

        assert!(select_single(&mut store, &q, 1));
        assert_eq!(store.get("q1"), Some(&Answer::Choice(OptionRef::new("q1", 1))));

        assert!(!select_single(&mut store, &q, 2));
        assert_eq!(store.get("q1"), Some(&Answer::Choice(OptionRef::new("q1", 1))));
    }

    #[test]
    fn test_toggle_multiple_adds_and_removes() {
        let q = question("q2", QuestionType::MultipleChoice, &["A", "B", "C"]);
        let mut store = AnswerStore::new();

        toggle_multiple(&mut store, &q, 0);
        toggle_multiple(&mut store, &q, 2);
        toggle_multiple(&mut store, &q, 0);

        assert_eq!(
            store.get("q2"),
            Some(&Answer::Choices(vec![OptionRef::new("q2", 2)]))
        );
    }

    #[test]
    fn test_toggle_multiple_wraps_scalar() {
        let q = question("q2", QuestionType::MultipleChoice, &["A", "B"]);
        let mut store = AnswerStore::new();
        store.set_answer("q2", Answer::Choice(OptionRef::new("q2", 0)));

        toggle_multiple(&mut store, &q, 1);

        assert_eq!(
            store.get("q2"),
            Some(&Answer::Choices(vec![OptionRef::new("q2", 0), OptionRef::new("q2", 1)]))
        );
    }

    #[test]
    fn test_wrong_kind_is_ignored() {
        let q = question("q3", QuestionType::ShortText, &[]);
        let mut store = AnswerStore::new();

        assert!(!activate_option(&mut store, &q, 0));
        assert!(set_text(&mut store, &q, "  raw  "));
        assert_eq!(store.get("q3"), Some(&Answer::Text("  raw  ".to_string())));
    }

    #[test]
    fn test_resolve_option_takes_first_duplicate() {
        let q = question("q1", QuestionType::SingleChoice, &["Yes", "No", "Yes"]);
        assert_eq!(resolve_option(&q, "Yes"), Some(0));
        assert_eq!(resolve_option(&q, "Maybe"), None);
    }

    #[test]
    fn test_imported_scalars_become_text() {
        let one: ImportedAnswer = serde_json::from_str("5").unwrap();
        assert_eq!(one, ImportedAnswer::One("5".to_string()));
        let many: ImportedAnswer = serde_json::from_str(r#"[2, "three", 4.5, true]"#).unwrap();
        assert_eq!(
            many,
            ImportedAnswer::Many(vec!["2".into(), "three".into(), "4.5".into(), "true".into()])
        );
    }

    #[test]
    fn test_normalize_imported() {
        let single = question("s", QuestionType::SingleChoice, &["A", "B"]);
        let multi = question("m", QuestionType::MultipleChoice, &["A", "B", "C"]);

        assert_eq!(
            normalize_imported(&single, &ImportedAnswer::One("B".to_string())),
            Answer::Choice(OptionRef::new("s", 1))
        );
        assert_eq!(
            normalize_imported(&single, &ImportedAnswer::One("Z".to_string())),
            Answer::Text("Z".to_string())
        );
        assert_eq!(
            normalize_imported(&multi, &ImportedAnswer::One("C".to_string())),
            Answer::Choices(vec![OptionRef::new("m", 2)])
        );
        assert_eq!(
            normalize_imported(
                &multi,
                &ImportedAnswer::Many(vec!["A".to_string(), "nope".to_string()])
            ),
            Answer::Text("nope".to_string())
        );
    }
}
