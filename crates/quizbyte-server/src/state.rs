//! Axum shared state, the same shape `reflex_server::gateway::state::HandlerState`
//! plays: an `Arc`-wrapped bundle of collaborators, cheap to `Clone` into
//! every request.

use std::sync::Arc;

use quizbyte_core::{BatchGenerator, EvaluationPipeline};

use crate::http::auth::JwtVerifier;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<EvaluationPipeline>,
    pub batch_generator: Arc<BatchGenerator>,
    pub jwt_verifier: JwtVerifier,
}

impl AppState {
    pub fn new(
        pipeline: Arc<EvaluationPipeline>,
        batch_generator: Arc<BatchGenerator>,
        jwt_verifier: JwtVerifier,
    ) -> Self {
        Self {
            pipeline,
            batch_generator,
            jwt_verifier,
        }
    }
}
