use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
};

use crate::dto::quiz_dto::{QuizDetail, QuizResultResponse, QuizSummary};
use crate::error::Error;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_quizzes(State(state): State<AppState>) -> Json<Vec<QuizSummary>> {
    let summaries = state
        .catalog
        .list()
        .iter()
        .map(QuizSummary::from)
        .collect();
    Json(summaries)
}

#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<String>,
) -> crate::error::Result<Response> {
    let quiz = state
        .catalog
        .find(&quiz_id)
        .ok_or(Error::QuizNotFound(quiz_id))?;
    Ok(Json(QuizDetail::from(quiz)).into_response())
}

#[axum::debug_handler]
pub async fn get_result(
    State(state): State<AppState>,
    Path(quiz_id): Path<String>,
) -> crate::error::Result<Response> {
    let result = state.session_service.result(&quiz_id).await?;
    let response = QuizResultResponse::new(state.catalog.find(&quiz_id), result);
    Ok(Json(response).into_response())
}
