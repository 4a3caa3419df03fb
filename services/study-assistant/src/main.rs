//! Learning Buddy Study Assistant
//!
//! Upload study materials, then chat with them and generate summaries,
//! flashcards, quizzes and mind maps from a local Ollama model.

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::get,
    serve, Router,
};
use buddy_database::{initialize_store, NoteStore};
use buddy_utils::{init_logging, AppConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

mod assistant;
mod chunker;
mod handlers;
mod middleware;
mod ollama_client;
mod prompts;
mod retrieval;
mod routes;
mod text_extractor;

use assistant::StudyAssistant;
use middleware::*;
use ollama_client::OllamaClient;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        AppConfig::default()
    });

    init_logging(&config.logging)?;
    info!("Starting Learning Buddy study assistant");

    let notes = initialize_store(&config.storage.state_path()).await?;

    let ollama = Arc::new(OllamaClient::new(config.ollama.clone())?);
    let assistant = StudyAssistant::new(&config, ollama.clone(), ollama)?;
    info!(model = %config.ollama.model, base_url = %config.ollama.base_url, "Model client ready");

    let app = create_app(AppState {
        assistant,
        notes,
        config: config.clone(),
    });

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server host/port")?;
    let listener = TcpListener::bind(&addr).await?;
    info!("Study assistant listening on {}", addr);

    serve(listener, app).await?;

    Ok(())
}

pub fn create_app(state: AppState) -> Router {
    let max_request_size = state.config.server.max_request_size;
    let timeout = Duration::from_secs(state.config.server.timeout_seconds);

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::create_api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST, Method::PATCH])
                        .allow_headers([header::CONTENT_TYPE]),
                )
                .layer(DefaultBodyLimit::max(max_request_size))
                .layer(tower_http::timeout::TimeoutLayer::new(timeout))
                .layer(axum::middleware::from_fn(request_id_middleware)),
        )
        .with_state(state)
}

#[derive(Clone)]
pub struct AppState {
    pub assistant: StudyAssistant,
    pub notes: NoteStore,
    pub config: AppConfig,
}
