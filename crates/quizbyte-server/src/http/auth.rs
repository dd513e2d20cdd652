//! Bearer JWT verification.
//!
//! Full OAuth2 sign-in (authorization code exchange, refresh tokens) is out
//! of scope here; the HTTP surface still needs *something* gating
//! `checkAnswer`, so this module only verifies a bearer token already
//! issued elsewhere and extracts its subject, following the verify-only
//! half of `comfortablynumb-pmp-llm-gateway-api`'s
//! `infrastructure::auth::jwt::JwtService`.

use axum::extract::FromRequestParts;
use axum::http::{StatusCode, header, request::Parts};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::AppState;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing or malformed Authorization header")]
    MissingBearer,

    #[error("invalid bearer token: {0}")]
    InvalidToken(String),
}

impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
    }
}

/// Claims this service trusts from an externally issued bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated user id, used as [`Quiz Attempt`]'s
    /// `user_id` when logging an evaluation.
    pub sub: String,
    pub exp: i64,
}

/// Verifies bearer tokens against a single HMAC secret.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

fn extract_bearer(headers: &axum::http::HeaderMap) -> Result<&str, AuthError> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingBearer)?
        .to_str()
        .map_err(|_| AuthError::MissingBearer)?;
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::MissingBearer)
}

/// An axum extractor that rejects the request unless it carries a valid
/// bearer token, exposing the verified [`Claims`] to the handler.
pub struct AuthenticatedUser(pub Claims);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(&parts.headers)?;
        let claims = state.jwt_verifier.verify(token)?;
        Ok(AuthenticatedUser(claims))
    }
}
