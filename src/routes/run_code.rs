use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};

use crate::dto::run_code_dto::RunCodeRequest;
use crate::AppState;

#[axum::debug_handler]
pub async fn run_code(
    State(state): State<AppState>,
    Json(req): Json<RunCodeRequest>,
) -> crate::error::Result<Response> {
    let code = req.code.unwrap_or_default();
    let resp = state.code_runner.run(&code).await?;
    Ok(Json(resp).into_response())
}
