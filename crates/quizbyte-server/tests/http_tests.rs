//! HTTP-level tests: routing, auth gating, and error-to-status mapping,
//! exercised against the axum `Router` directly via `tower::ServiceExt::oneshot`
//! so they run without a bound socket or any real Postgres/Redis dependency.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header as JwtHeader, encode};
use tower::ServiceExt;
use uuid::Uuid;

use quizbyte_core::cache::InMemoryCachePort;
use quizbyte_core::{
    AnswerCacheService, BatchGenerator, EmbeddingError, EmbeddingProvider, EvaluationPipeline,
    LlmEvaluator, LlmEvaluatorError, PipelineConfig, Quiz, QuizEvaluationBands, RequestCoalescer,
    Store, StoreError, SubCategory,
};
use quizbyte_server::http::auth::{Claims, JwtVerifier};
use quizbyte_server::http::create_router;
use quizbyte_server::state::AppState;

const JWT_SECRET: &str = "test-secret";

struct FakeStore {
    quiz: Quiz,
    sub_category: SubCategory,
}

#[async_trait]
impl Store for FakeStore {
    async fn get_quiz_by_id(&self, id: Uuid) -> Result<Quiz, StoreError> {
        if id == self.quiz.id {
            Ok(self.quiz.clone())
        } else {
            Err(StoreError::NotFound(id.to_string()))
        }
    }

    async fn get_random_quiz(&self, _sub_category_id: Option<Uuid>) -> Result<Quiz, StoreError> {
        Ok(self.quiz.clone())
    }

    async fn get_quizzes_by_criteria(
        &self,
        _sub_category_id: Uuid,
        _count: u32,
    ) -> Result<Vec<Quiz>, StoreError> {
        Ok(vec![self.quiz.clone()])
    }

    async fn get_sub_category_id_by_name(&self, name: &str) -> Result<Uuid, StoreError> {
        if name.eq_ignore_ascii_case(&self.sub_category.name) {
            Ok(self.sub_category.id)
        } else {
            Err(StoreError::NotFound(name.to_string()))
        }
    }

    async fn get_all_sub_categories(&self) -> Result<Vec<SubCategory>, StoreError> {
        Ok(vec![self.sub_category.clone()])
    }

    async fn get_quiz_evaluation_bands(
        &self,
        _quiz_id: Uuid,
    ) -> Result<Option<QuizEvaluationBands>, StoreError> {
        Ok(None)
    }

    async fn save_quiz(&self, _quiz: &Quiz) -> Result<(), StoreError> {
        Ok(())
    }

    async fn save_quizzes(&self, _quizzes: &[Quiz]) -> Result<(), StoreError> {
        Ok(())
    }
}

struct StubEmbedder;

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput);
        }
        Ok(vec![1.0, 0.0, 0.0])
    }

    fn provider_id(&self) -> &str {
        "stub"
    }

    fn dimension(&self) -> usize {
        3
    }
}

struct FixedLlm;

#[async_trait]
impl LlmEvaluator for FixedLlm {
    async fn call(&self, _prompt: &str) -> Result<String, LlmEvaluatorError> {
        Ok(r#"{"score":0.9,"explanation":"great job","keyword_matches":["paris"],"completeness":0.9,"relevance":0.9,"accuracy":0.9}"#.to_string())
    }
}

fn sample_quiz() -> Quiz {
    Quiz {
        id: Uuid::new_v4(),
        question: "What is the capital of France?".to_string(),
        model_answers: vec!["Paris".to_string()],
        keywords: vec!["paris".to_string()],
        difficulty: 2,
        sub_category_id: Uuid::new_v4(),
    }
}

fn build_state(quiz: Quiz) -> AppState {
    let store: Arc<dyn Store> = Arc::new(FakeStore {
        quiz,
        sub_category: SubCategory {
            id: Uuid::new_v4(),
            name: "geography".to_string(),
            category_name: "world".to_string(),
        },
    });
    let cache = Arc::new(InMemoryCachePort::new());
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(StubEmbedder);
    let llm: Arc<dyn LlmEvaluator> = Arc::new(FixedLlm);
    let answer_cache = AnswerCacheService::new(cache.clone(), 0.95, Duration::from_secs(3600));
    let coalescer = Arc::new(RequestCoalescer::new());

    let pipeline = Arc::new(EvaluationPipeline::new(
        store.clone(),
        cache,
        embedder.clone(),
        llm.clone(),
        answer_cache,
        coalescer,
        PipelineConfig::default(),
    ));

    let batch_generator = Arc::new(BatchGenerator::new(
        store,
        llm,
        embedder,
        Arc::new(tokio::sync::Semaphore::new(1)),
        3,
        0.95,
    ));

    AppState::new(pipeline, batch_generator, JwtVerifier::new(JWT_SECRET))
}

fn bearer_token(sub: &str) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
    };
    encode(
        &JwtHeader::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn healthz_does_not_require_auth() {
    let state = build_state(sample_quiz());
    let app = create_router(state);

    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn check_answer_without_bearer_token_is_rejected() {
    let quiz = sample_quiz();
    let state = build_state(quiz.clone());
    let app = create_router(state);

    let request = Request::builder()
        .method("POST")
        .uri(format!("/v1/quizzes/{}/check-answer", quiz.id))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"quiz_id":"00000000-0000-0000-0000-000000000000","user_answer":"Paris"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn check_answer_with_valid_bearer_token_returns_evaluation() {
    let quiz = sample_quiz();
    let state = build_state(quiz.clone());
    let app = create_router(state);

    let body = format!(r#"{{"quiz_id":"{}","user_answer":"Paris"}}"#, quiz.id);
    let request = Request::builder()
        .method("POST")
        .uri(format!("/v1/quizzes/{}/check-answer", quiz.id))
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", bearer_token("user-1")))
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["score"], 0.9);
    assert_eq!(json["explanation"], "great job");
}

#[tokio::test]
async fn check_answer_for_unknown_quiz_returns_404() {
    let quiz = sample_quiz();
    let state = build_state(quiz);
    let app = create_router(state);

    let unknown_id = Uuid::new_v4();
    let body = format!(r#"{{"quiz_id":"{unknown_id}","user_answer":"Paris"}}"#);
    let request = Request::builder()
        .method("POST")
        .uri(format!("/v1/quizzes/{unknown_id}/check-answer"))
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", bearer_token("user-1")))
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn random_quiz_endpoint_returns_summary() {
    let quiz = sample_quiz();
    let state = build_state(quiz.clone());
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/quizzes/random")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["id"], quiz.id.to_string());
}

#[tokio::test]
async fn invalidate_quiz_cache_requires_auth_and_succeeds_with_it() {
    let quiz = sample_quiz();
    let state = build_state(quiz.clone());
    let app = create_router(state.clone());

    let unauthenticated = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/quizzes/{}/cache", quiz.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(unauthenticated.status(), StatusCode::UNAUTHORIZED);

    let authenticated = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/quizzes/{}/cache", quiz.id))
                .header(header::AUTHORIZATION, format!("Bearer {}", bearer_token("user-1")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(authenticated.status(), StatusCode::NO_CONTENT);
}
