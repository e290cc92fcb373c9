use serde::{Deserialize, Serialize};

use crate::models::question::{Question, QuestionKind, TestCase};
use crate::models::quiz::Quiz;
use crate::models::quiz_result::QuizResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub time_limit: u32,
    pub total_questions: usize,
    pub mcq_count: usize,
    pub coding_count: usize,
    pub total_points: u32,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            time_limit: quiz.time_limit,
            total_questions: quiz.questions.len(),
            mcq_count: quiz.mcq_count(),
            coding_count: quiz.coding_count(),
            total_points: quiz.total_points(),
        }
    }
}

/// A question as shown to the learner, without the correct option.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub question: String,
    pub points: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_cases: Option<Vec<TestCase>>,
}

impl From<&Question> for PublicQuestion {
    fn from(question: &Question) -> Self {
        let (options, initial_code, test_cases) = match &question.kind {
            QuestionKind::MultipleChoice { options, .. } => (Some(options.clone()), None, None),
            QuestionKind::Coding {
                initial_code,
                test_cases,
            } => (None, Some(initial_code.clone()), Some(test_cases.clone())),
        };
        Self {
            id: question.id.clone(),
            kind: question.kind_label().to_string(),
            question: question.prompt.clone(),
            points: question.points,
            options,
            initial_code,
            test_cases,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDetail {
    #[serde(flatten)]
    pub summary: QuizSummary,
    pub questions: Vec<PublicQuestion>,
}

impl From<&Quiz> for QuizDetail {
    fn from(quiz: &Quiz) -> Self {
        Self {
            summary: QuizSummary::from(quiz),
            questions: quiz.questions.iter().map(PublicQuestion::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultResponse {
    pub title: String,
    #[serde(flatten)]
    pub result: QuizResult,
    pub percentage: f64,
    pub correct_count: usize,
    pub time_taken_display: String,
}

impl QuizResultResponse {
    pub fn new(quiz: Option<&Quiz>, result: QuizResult) -> Self {
        Self {
            title: quiz.map(|q| q.title.clone()).unwrap_or_else(|| result.quiz_id.clone()),
            percentage: result.percentage(),
            correct_count: result.correct_count(),
            time_taken_display: crate::utils::time::format_duration(result.elapsed_seconds),
            result,
        }
    }
}
