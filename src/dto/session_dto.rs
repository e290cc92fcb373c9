use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::quiz_dto::PublicQuestion;
use crate::models::answer::AnswerValue;
use crate::services::quiz_session::{QuizSession, SessionState};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveAnswerRequest {
    #[validate(length(min = 1, message = "questionId must not be empty"))]
    pub question_id: String,
    pub answer: AnswerValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub quiz_id: String,
    pub state: SessionState,
    pub current_index: usize,
    pub total_questions: usize,
    pub current_question: Option<PublicQuestion>,
    pub current_answer: Option<AnswerValue>,
    pub answered_count: usize,
    pub time_remaining_seconds: u32,
    pub time_remaining: String,
}

impl SessionSnapshot {
    pub fn of(session_id: Uuid, session: &QuizSession) -> Self {
        let current = session.current_question();
        Self {
            session_id,
            quiz_id: session.quiz().id.clone(),
            state: session.state(),
            current_index: session.current_index(),
            total_questions: session.quiz().questions.len(),
            current_question: current.map(PublicQuestion::from),
            current_answer: current.and_then(|q| session.answers().get_answer(&q.id).cloned()),
            answered_count: session.answers().len(),
            time_remaining_seconds: session.remaining_seconds(),
            time_remaining: crate::utils::time::format_clock(session.remaining_seconds()),
        }
    }
}
