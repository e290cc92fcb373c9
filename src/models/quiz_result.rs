use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::answer::AnswerValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub quiz_id: String,
    pub score: u32,
    pub total_points: u32,
    #[serde(rename = "timeTaken")]
    pub elapsed_seconds: u32,
    pub answers: Vec<QuestionOutcome>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOutcome {
    pub question_id: String,
    #[serde(rename = "userAnswer", default)]
    pub given_answer: Option<AnswerValue>,
    pub is_correct: bool,
    pub points: u32,
}

impl QuizResult {
    pub fn percentage(&self) -> f64 {
        if self.total_points == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.total_points) * 100.0
    }

    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_result_record_field_names() {
        let completed_at = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let result = QuizResult {
            quiz_id: "python-basics-1".into(),
            score: 7,
            total_points: 9,
            elapsed_seconds: 42,
            answers: vec![QuestionOutcome {
                question_id: "q1".into(),
                given_answer: Some(AnswerValue::Choice(1)),
                is_correct: true,
                points: 2,
            }],
            completed_at,
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["quizId"], "python-basics-1");
        assert_eq!(value["totalPoints"], 9);
        assert_eq!(value["timeTaken"], 42);
        assert_eq!(value["answers"][0], json!({
            "questionId": "q1",
            "userAnswer": 1,
            "isCorrect": true,
            "points": 2
        }));
        assert_eq!(value["completedAt"], "2026-01-02T03:04:05Z");
    }

    #[test]
    fn percentage_handles_zero_total() {
        let result = QuizResult {
            quiz_id: "q".into(),
            score: 0,
            total_points: 0,
            elapsed_seconds: 0,
            answers: vec![],
            completed_at: Utc::now(),
        };
        assert_eq!(result.percentage(), 0.0);
    }
}
