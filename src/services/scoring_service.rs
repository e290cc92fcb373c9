use chrono::{DateTime, Utc};

use crate::models::answer::AnswerValue;
use crate::models::question::{Question, QuestionKind};
use crate::models::quiz::Quiz;
use crate::models::quiz_result::{QuestionOutcome, QuizResult};
use crate::services::answer_store::AnswerStore;

pub struct ScoringService;

impl ScoringService {
    pub fn score(quiz: &Quiz, answers: &AnswerStore, elapsed_seconds: u32) -> QuizResult {
        Self::score_at(quiz, answers, elapsed_seconds, crate::utils::time::now())
    }

    pub fn score_at(
        quiz: &Quiz,
        answers: &AnswerStore,
        elapsed_seconds: u32,
        completed_at: DateTime<Utc>,
    ) -> QuizResult {
        let outcomes: Vec<QuestionOutcome> = quiz
            .questions
            .iter()
            .map(|q| Self::grade_question(q, answers.get_answer(&q.id)))
            .collect();

        let score = outcomes.iter().map(|o| o.points).sum();

        QuizResult {
            quiz_id: quiz.id.clone(),
            score,
            total_points: quiz.total_points(),
            elapsed_seconds: elapsed_seconds.min(quiz.time_limit_seconds()),
            answers: outcomes,
            completed_at,
        }
    }

    /// Seconds used out of the allotted time, within `[0, limit]`.
    pub fn elapsed_seconds(time_limit_seconds: u32, remaining_seconds: u32) -> u32 {
        time_limit_seconds.saturating_sub(remaining_seconds)
    }

    fn grade_question(question: &Question, given: Option<&AnswerValue>) -> QuestionOutcome {
        let is_correct = match &question.kind {
            QuestionKind::MultipleChoice { correct_answer, .. } => {
                given.and_then(AnswerValue::as_choice) == Some(*correct_answer)
            }
            // Coding answers are never executed against their test cases; any
            // submission, empty or missing included, earns full credit.
            QuestionKind::Coding { .. } => true,
        };

        QuestionOutcome {
            question_id: question.id.clone(),
            given_answer: given.cloned(),
            is_correct,
            points: if is_correct { question.points } else { 0 },
        }
    }
}
