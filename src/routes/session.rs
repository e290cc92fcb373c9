use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::session_dto::SaveAnswerRequest;
use crate::error::Error;
use crate::services::session_service::StartOutcome;
use crate::AppState;

#[axum::debug_handler]
pub async fn start_session(
    State(state): State<AppState>,
    Path(quiz_id): Path<String>,
) -> crate::error::Result<Response> {
    match state.session_service.start(&quiz_id).await {
        StartOutcome::Started(snapshot) => Ok((StatusCode::CREATED, Json(snapshot)).into_response()),
        StartOutcome::RedirectToCatalog => Err(Error::QuizNotFound(quiz_id)),
    }
}

#[axum::debug_handler]
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let snapshot = state.session_service.snapshot(session_id).await?;
    Ok(Json(snapshot).into_response())
}

#[axum::debug_handler]
pub async fn save_answer(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<SaveAnswerRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let snapshot = state
        .session_service
        .answer(session_id, &req.question_id, req.answer)
        .await?;
    Ok(Json(snapshot).into_response())
}

#[axum::debug_handler]
pub async fn next_question(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let snapshot = state.session_service.next(session_id).await?;
    Ok(Json(snapshot).into_response())
}

#[axum::debug_handler]
pub async fn previous_question(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let snapshot = state.session_service.previous(session_id).await?;
    Ok(Json(snapshot).into_response())
}

#[axum::debug_handler]
pub async fn cancel_submit(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let snapshot = state.session_service.cancel_submit(session_id).await?;
    Ok(Json(snapshot).into_response())
}

#[axum::debug_handler]
pub async fn confirm_submit(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let result = state.session_service.confirm_submit(session_id).await?;
    Ok(Json(result).into_response())
}

#[axum::debug_handler]
pub async fn abandon_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    state.session_service.abandon(session_id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
