//! HTTP gateway (axum) for the quizbyte Evaluation Core.

pub mod auth;
pub mod dto;
pub mod handlers;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health_handler))
        .route("/ready", get(handlers::ready_handler))
        .route(
            "/v1/quizzes/{quiz_id}/check-answer",
            post(handlers::check_answer_handler),
        )
        .route("/v1/quizzes/random", get(handlers::random_quiz_handler))
        .route("/v1/quizzes/bulk", get(handlers::bulk_quizzes_handler))
        .route(
            "/v1/sub-categories",
            get(handlers::sub_categories_handler),
        )
        .route(
            "/v1/quizzes/{quiz_id}/cache",
            axum::routing::delete(handlers::invalidate_quiz_cache_handler),
        )
        .route(
            "/v1/batch/generate",
            post(handlers::generate_batch_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
