//! Route handlers for the Evaluation Core's HTTP surface.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header::HeaderValue};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::auth::AuthenticatedUser;
use crate::http::dto::{
    BatchGenerationResponse, BulkQuizzesQuery, CheckAnswerRequest, CheckAnswerResponse,
    QuizSummaryResponse, RandomQuizQuery, SubCategoryListResponse, SubCategoryResultDto,
};
use crate::state::AppState;

const STATUS_HEADER: &str = "x-quizbyte-status";

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static("healthy"));
    (StatusCode::OK, headers, Json(HealthResponse { status: "ok" })).into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let ready = state.pipeline.get_category_list().await.is_ok();
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status_msg = if ready { "ready" } else { "pending" };

    let mut headers = HeaderMap::new();
    headers.insert(
        STATUS_HEADER,
        HeaderValue::from_str(status_msg).unwrap_or(HeaderValue::from_static("error")),
    );

    (status_code, headers, Json(HealthResponse { status: status_msg })).into_response()
}

/// `POST /v1/quizzes/:quiz_id/check-answer`. Requires a bearer token; the
/// authenticated subject is not threaded into the response but is available
/// for audit logging once [`quizbyte_core::eval::model::QuizAttempt`]
/// persistence is wired up by a caller.
#[tracing::instrument(skip(state, user, body), fields(user = %user.0.sub))]
pub async fn check_answer_handler(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
    user: AuthenticatedUser,
    Json(body): Json<CheckAnswerRequest>,
) -> Result<Json<CheckAnswerResponse>, ApiError> {
    let _ = user;
    let result = state
        .pipeline
        .check_answer(quiz_id, &body.user_answer)
        .await
        .map_err(ApiError::from)?;
    Ok(Json(result.into()))
}

#[tracing::instrument(skip(state))]
pub async fn random_quiz_handler(
    State(state): State<AppState>,
    Query(query): Query<RandomQuizQuery>,
) -> Result<Json<QuizSummaryResponse>, ApiError> {
    let summary = state
        .pipeline
        .get_random_quiz(query.sub_category.as_deref())
        .await
        .map_err(ApiError::from)?;
    Ok(Json(summary.into()))
}

#[tracing::instrument(skip(state))]
pub async fn bulk_quizzes_handler(
    State(state): State<AppState>,
    Query(query): Query<BulkQuizzesQuery>,
) -> Result<Json<Vec<QuizSummaryResponse>>, ApiError> {
    let summaries = state
        .pipeline
        .get_bulk_quizzes(&query.sub_category, query.count.unwrap_or(10))
        .await
        .map_err(ApiError::from)?;
    Ok(Json(summaries.into_iter().map(Into::into).collect()))
}

#[tracing::instrument(skip(state))]
pub async fn sub_categories_handler(
    State(state): State<AppState>,
) -> Result<Json<SubCategoryListResponse>, ApiError> {
    let sub_categories = state
        .pipeline
        .get_category_list()
        .await
        .map_err(ApiError::from)?;
    Ok(Json(SubCategoryListResponse { sub_categories }))
}

#[tracing::instrument(skip(state, _user))]
pub async fn invalidate_quiz_cache_handler(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
    _user: AuthenticatedUser,
) -> StatusCode {
    state.pipeline.invalidate_quiz_cache(quiz_id).await;
    StatusCode::NO_CONTENT
}

/// `POST /v1/batch/generate`. Kicks off one synchronous batch-generation
/// pass across every sub-category; not on the interactive request path, so
/// blocking the handler's task on it is acceptable.
#[tracing::instrument(skip(state, _user))]
pub async fn generate_batch_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Json<BatchGenerationResponse> {
    let report = state.batch_generator.generate().await;
    Json(BatchGenerationResponse {
        results: report
            .results
            .into_iter()
            .map(|r| SubCategoryResultDto {
                sub_category_id: r.sub_category_id,
                sub_category_name: r.sub_category_name,
                accepted: r.accepted,
                error: r.error,
            })
            .collect(),
    })
}
