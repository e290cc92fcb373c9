use std::collections::HashMap;

use crate::models::answer::AnswerValue;

/// Current answer per question id. Later writes replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct AnswerStore {
    answers: HashMap<String, AnswerValue>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_answer(&mut self, question_id: impl Into<String>, value: AnswerValue) {
        self.answers.insert(question_id.into(), value);
    }

    pub fn get_answer(&self, question_id: &str) -> Option<&AnswerValue> {
        self.answers.get(question_id)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut store = AnswerStore::new();
        assert!(store.get_answer("q1").is_none());

        store.set_answer("q1", AnswerValue::Choice(0));
        store.set_answer("q1", AnswerValue::Choice(2));
        assert_eq!(store.get_answer("q1"), Some(&AnswerValue::Choice(2)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn values_are_not_checked_against_question_kind() {
        let mut store = AnswerStore::new();
        store.set_answer("mcq", AnswerValue::Code("print('hi')".into()));
        assert_eq!(store.get_answer("mcq").and_then(AnswerValue::as_code), Some("print('hi')"));
    }
}
