//! quizbyte HTTP server entrypoint.

use std::sync::Arc;

use genai::Client;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::Semaphore;

use quizbyte_core::{
    AnswerCacheService, CoreConfig, EvaluationPipeline, GenAiEvaluator, PipelineConfig,
    RedisCachePort, RequestCoalescer,
};
use quizbyte_core::{BatchGenerator, CachedEmbeddingProvider, OpenAiEmbeddingProvider};
use quizbyte_server::config::ServerConfig;
use quizbyte_server::http::auth::JwtVerifier;
use quizbyte_server::http::create_router;
use quizbyte_server::state::AppState;
use quizbyte_server::store::PostgresStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let server_config = ServerConfig::from_env()?;
    let core_config = CoreConfig::from_env()?;
    core_config.validate()?;

    tracing::info!(
        addr = %server_config.socket_addr(),
        "quizbyte starting"
    );

    let store: Arc<dyn quizbyte_core::Store> =
        Arc::new(PostgresStore::connect(&server_config.database_url).await?);

    let cache: Arc<dyn quizbyte_core::CachePort> =
        Arc::new(RedisCachePort::connect(&server_config.redis_url).await?);

    let coalescer = Arc::new(RequestCoalescer::new());

    let openai_api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
    let raw_embedder = OpenAiEmbeddingProvider::new(
        "https://api.openai.com/v1",
        openai_api_key,
        "text-embedding-3-small",
        1536,
    );
    let embedder: Arc<dyn quizbyte_core::EmbeddingProvider> = Arc::new(CachedEmbeddingProvider::new(
        raw_embedder,
        cache.clone(),
        coalescer.clone(),
        core_config.cache_ttl.embedding,
    ));

    let genai_client = Client::default();
    let llm: Arc<dyn quizbyte_core::LlmEvaluator> = Arc::new(GenAiEvaluator::new(
        genai_client,
        server_config.llm_model.clone(),
        core_config.llm_timeout,
    ));

    let answer_cache = AnswerCacheService::new(
        cache.clone(),
        core_config.similarity_threshold,
        core_config.cache_ttl.answer_evaluation,
    );

    let pipeline = Arc::new(EvaluationPipeline::new(
        store.clone(),
        cache.clone(),
        embedder.clone(),
        llm.clone(),
        answer_cache,
        coalescer.clone(),
        PipelineConfig::from(&core_config.cache_ttl),
    ));

    let batch_generator = Arc::new(BatchGenerator::new(
        store.clone(),
        llm.clone(),
        embedder.clone(),
        Arc::new(Semaphore::new(4)),
        core_config.num_questions_per_subcategory,
        core_config.similarity_threshold,
    ));

    let jwt_verifier = JwtVerifier::new(&server_config.jwt_secret);

    let state = AppState::new(pipeline, batch_generator, jwt_verifier);
    let app = create_router(state);

    let listener = TcpListener::bind(server_config.socket_addr()).await?;
    tracing::info!(addr = %server_config.socket_addr(), "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("quizbyte shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
