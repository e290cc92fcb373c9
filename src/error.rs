use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

/// Route the learner is sent back to when a quiz or its result is missing.
pub const QUIZ_LIST_ROUTE: &str = "/quizzes";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Quiz not found: {0}")]
    QuizNotFound(String),

    #[error("No result stored for quiz: {0}")]
    ResultNotFound(String),

    #[error("Cannot {action} while session is {state}")]
    InvalidTransition { state: String, action: &'static str },

    #[error("{0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, redirect) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            Error::QuizNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Quiz '{}' does not exist", id),
                Some(QUIZ_LIST_ROUTE),
            ),
            Error::ResultNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("No result stored for quiz '{}'", id),
                Some(QUIZ_LIST_ROUTE),
            ),
            err @ Error::InvalidTransition { .. } => (StatusCode::CONFLICT, err.to_string(), None),
            Error::Upstream(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string(), None),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string(), None),
            Error::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None),
            Error::Reqwest(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("API request failed: {}", err),
                None,
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
                None,
            ),
        };

        let body = match redirect {
            Some(route) => Json(json!({ "error": error_message, "redirect": route })),
            None => Json(json!({ "error": error_message })),
        };
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value as JsonValue;

    async fn body_of(err: Error) -> (StatusCode, JsonValue) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_quiz_redirects_to_quiz_list() {
        let (status, body) = body_of(Error::QuizNotFound("nope".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["redirect"], "/quizzes");
    }

    #[tokio::test]
    async fn invalid_transition_is_a_conflict() {
        let err = Error::InvalidTransition {
            state: "submitted".into(),
            action: "answer",
        };
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Cannot answer while session is submitted");
        assert!(body.get("redirect").is_none());
    }
}
