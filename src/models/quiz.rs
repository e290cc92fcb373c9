use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::models::question::{Question, QuestionKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Allotted time in minutes.
    #[serde(rename = "timeLimit")]
    pub time_limit: u32,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn time_limit_seconds(&self) -> u32 {
        self.time_limit.saturating_mul(60)
    }

    pub fn total_points(&self) -> u32 {
        self.questions.iter().map(|q| q.points).sum()
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn mcq_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_multiple_choice()).count()
    }

    pub fn coding_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_coding()).count()
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Catalog("quiz with empty id".to_string()));
        }
        if self.time_limit == 0 {
            return Err(Error::Catalog(format!("quiz '{}' has no time limit", self.id)));
        }
        if self.questions.is_empty() {
            return Err(Error::Catalog(format!("quiz '{}' has no questions", self.id)));
        }

        self.questions
            .iter()
            .try_fold(0u32, |total, q| total.checked_add(q.points))
            .ok_or_else(|| {
                Error::Catalog(format!("quiz '{}' point total does not fit in u32", self.id))
            })?;

        let mut seen = HashSet::new();
        for question in &self.questions {
            if !seen.insert(question.id.as_str()) {
                return Err(Error::Catalog(format!(
                    "quiz '{}' repeats question id '{}'",
                    self.id, question.id
                )));
            }
            if let QuestionKind::MultipleChoice { options, correct_answer } = &question.kind {
                if *correct_answer >= options.len() {
                    return Err(Error::Catalog(format!(
                        "quiz '{}' question '{}' points at option {} of {}",
                        self.id,
                        question.id,
                        correct_answer,
                        options.len()
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mcq(id: &str, points: u32, correct: usize) -> Question {
        Question {
            id: id.to_string(),
            prompt: format!("prompt {}", id),
            points,
            kind: QuestionKind::MultipleChoice {
                options: vec!["a".into(), "b".into(), "c".into()],
                correct_answer: correct,
            },
        }
    }

    fn quiz(questions: Vec<Question>) -> Quiz {
        Quiz {
            id: "quiz".into(),
            title: "Quiz".into(),
            description: "desc".into(),
            time_limit: 2,
            questions,
        }
    }

    #[test]
    fn totals_and_counts() {
        let q = quiz(vec![mcq("q1", 2, 0), mcq("q2", 3, 1)]);
        assert_eq!(q.total_points(), 5);
        assert_eq!(q.time_limit_seconds(), 120);
        assert_eq!(q.mcq_count(), 2);
        assert_eq!(q.coding_count(), 0);
        assert!(q.validate().is_ok());
    }

    #[test]
    fn duplicate_question_ids_are_rejected() {
        let q = quiz(vec![mcq("q1", 2, 0), mcq("q1", 3, 1)]);
        let err = q.validate().unwrap_err();
        assert!(err.to_string().contains("repeats question id 'q1'"));
    }

    #[test]
    fn out_of_range_correct_answer_is_rejected() {
        let q = quiz(vec![mcq("q1", 2, 3)]);
        assert!(q.validate().is_err());
    }

    #[test]
    fn overflowing_point_total_is_rejected() {
        let q = quiz(vec![mcq("q1", 4_000_000_000, 0), mcq("q2", 4_000_000_000, 1)]);
        let err = q.validate().unwrap_err();
        assert!(err.to_string().contains("point total"));

        let q = quiz(vec![mcq("q1", u32::MAX - 1, 0), mcq("q2", 1, 1)]);
        assert!(q.validate().is_ok());
        assert_eq!(q.total_points(), u32::MAX);
    }

    #[test]
    fn empty_quiz_is_rejected() {
        assert!(quiz(vec![]).validate().is_err());
    }
}
