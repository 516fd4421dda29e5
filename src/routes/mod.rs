// ABOUTME: HTTP route handlers for the batch generation surface
// ABOUTME: Axum routers with shared application state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! # HTTP Routes
//!
//! The batch surface exposes one operation: `POST /api/recipes/generate`,
//! returning the full generation result or a structured error. A small
//! health endpoint reports liveness and the number of active streaming
//! sessions.

pub mod recipes;

pub use recipes::RecipeRoutes;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{extract::State, routing::get, Json, Router};
use serde_json::json;

use crate::errors::{AppError, ErrorResponse};
use crate::streaming::SessionRegistry;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from(self))).into_response()
    }
}

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health endpoint with an injected session registry
    pub fn routes(registry: Arc<SessionRegistry>) -> Router {
        Router::new()
            .route("/api/health", get(health))
            .with_state(registry)
    }
}

async fn health(State(registry): State<Arc<SessionRegistry>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "active_sessions": registry.active_count().await,
    }))
}
