pub mod health;
pub mod quiz;
pub mod run_code;
pub mod session;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::{cors::cors_layer, rate_limit};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let run_code_api = Router::new()
        .route("/run-code", post(run_code::run_code))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::RateLimiter::new(state.config.run_code_rps),
            rate_limit::rps_middleware,
        ));

    let quiz_api = Router::new()
        .route("/api/quizzes", get(quiz::list_quizzes))
        .route("/api/quizzes/:quiz_id", get(quiz::get_quiz))
        .route("/api/quizzes/:quiz_id/result", get(quiz::get_result))
        .route("/api/quizzes/:quiz_id/sessions", post(session::start_session))
        .route(
            "/api/sessions/:session_id",
            get(session::get_session).delete(session::abandon_session),
        )
        .route("/api/sessions/:session_id/answers", put(session::save_answer))
        .route("/api/sessions/:session_id/next", post(session::next_question))
        .route("/api/sessions/:session_id/previous", post(session::previous_question))
        .route("/api/sessions/:session_id/cancel", post(session::cancel_submit))
        .route("/api/sessions/:session_id/confirm", post(session::confirm_submit));

    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health::health))
        .merge(run_code_api)
        .merge(quiz_api)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
