//! Maps [`quizbyte_core::EvalError`] to HTTP responses.
//!
//! The same Core-error-to-HTTP-response translation boundary `reflex` draws
//! between its internal errors and
//! `reflex_server::gateway::error::GatewayError`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quizbyte_core::EvalError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

/// Newtype so this crate may implement the foreign [`IntoResponse`] trait
/// for the foreign [`EvalError`] type.
pub struct ApiError(pub EvalError);

impl From<EvalError> for ApiError {
    fn from(err: EvalError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            EvalError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            EvalError::InvalidCategory(_) => (StatusCode::BAD_REQUEST, "invalid_category"),
            EvalError::QuizNotFound(_) => (StatusCode::NOT_FOUND, "quiz_not_found"),
            EvalError::LlmServiceError(_) => (StatusCode::BAD_GATEWAY, "llm_service_error"),
            EvalError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            EvalError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
        };

        let body = Json(ErrorResponse {
            error: self.0.to_string(),
            code,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let err = ApiError(EvalError::InvalidInput("empty".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn quiz_not_found_maps_to_404() {
        let err = ApiError(EvalError::QuizNotFound("q1".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
