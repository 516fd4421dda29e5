// ABOUTME: Server binary assembling configuration, agents, and the HTTP/WS surface
// ABOUTME: Production entry point with environment configuration and graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! # Souschef Server Binary
//!
//! Starts the combined REST + WebSocket surface: batch generation at
//! `POST /api/recipes/generate` and streaming sessions at `GET /ws`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use souschef::agents::{ExpiryAgent, Orchestrator, ProfileAgent};
use souschef::config::ServerConfig;
use souschef::llm::GeminiProvider;
use souschef::logging;
use souschef::routes::recipes::RecipesState;
use souschef::routes::{HealthRoutes, RecipeRoutes};
use souschef::stores::{InMemoryPantryStore, InMemoryPreferenceStore};
use souschef::streaming::routes::StreamingRoutes;
use souschef::streaming::{SessionContext, SessionRegistry, StreamState};

#[derive(Parser)]
#[command(name = "souschef-server")]
#[command(about = "Souschef - pantry-aware recipe generation server")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Souschef server");
    info!("{}", config.summary());

    let model = Arc::new(
        GeminiProvider::from_env()?
            .with_model(config.llm.model.clone())
            .with_temperature(config.llm.temperature),
    );

    let orchestrator = Arc::new(Orchestrator::new(
        Arc::clone(&model) as Arc<dyn souschef::llm::TextGenerator>,
        config.generation.clone(),
    ));
    let profile_agent = Arc::new(ProfileAgent::new(
        Arc::clone(&model) as Arc<dyn souschef::llm::TextGenerator>
    ));
    let expiry_agent = Arc::new(ExpiryAgent::new(
        model as Arc<dyn souschef::llm::TextGenerator>
    ));
    let pantry = Arc::new(InMemoryPantryStore::new());
    let preferences = Arc::new(InMemoryPreferenceStore::new());
    let registry = Arc::new(SessionRegistry::new());

    let session_context = Arc::new(SessionContext {
        orchestrator: Arc::clone(&orchestrator),
        pantry,
        preferences,
        streaming: config.streaming.clone(),
        generation_timeout: Duration::from_secs(config.generation.stream_timeout_secs),
    });

    let app = Router::new()
        .merge(RecipeRoutes::routes(RecipesState {
            orchestrator,
            profile_agent,
            expiry_agent,
            batch_timeout: Duration::from_secs(config.generation.batch_timeout_secs),
        }))
        .merge(HealthRoutes::routes(Arc::clone(&registry)))
        .merge(StreamingRoutes::routes(StreamState {
            context: session_context,
            registry,
        }))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins));

    let addr = format!("0.0.0.0:{}", config.http_port);
    info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let parsed = origins
            .iter()
            .filter_map(|o| o.parse::<axum::http::HeaderValue>().ok())
            .collect::<Vec<_>>();
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
