// ABOUTME: Batch recipe generation endpoints delegating to the orchestrator and agents
// ABOUTME: One-shot request/response surface with a bounded generation timeout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! Batch generation endpoints.
//!
//! `POST /api/recipes/generate` accepts a full [`GenerateRequest`] (pantry
//! snapshot inline) and returns the complete [`GenerationResult`] in one
//! response; the all-filtered error case still carries the result payload in
//! the error details so clients can display the filtered count.
//!
//! Two direct-agent endpoints cover the strategies outside the
//! orchestrator's mode set: `POST /api/recipes/discover` (profile-driven
//! discovery, no pantry needed) and `POST /api/recipes/use-it-up`
//! (expiry-prioritized). Both pass their output through the allergen gate;
//! no generation path bypasses it.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::timeout;
use tracing::info;

use crate::agents::filter::filter_recipes;
use crate::agents::{
    ExpiryAgent, GenerateRequest, GenerationResult, Orchestrator, ProfileAgent, RecipeAgent,
    RecipeRequest,
};
use crate::errors::{AppError, AppResult};
use crate::models::Recipe;

/// Shared state for the batch recipe routes
#[derive(Clone)]
pub struct RecipesState {
    pub orchestrator: Arc<Orchestrator>,
    pub profile_agent: Arc<ProfileAgent>,
    pub expiry_agent: Arc<ExpiryAgent>,
    /// Wall-clock budget for one-shot generation calls
    pub batch_timeout: Duration,
}

/// Response shape for the direct-agent endpoints
#[derive(Debug, Serialize)]
pub struct AgentGenerationResponse {
    pub recipes: Vec<Recipe>,
    pub total_count: usize,
    pub filtered_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// Batch recipe routes implementation
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create the batch generation routes with injected state
    pub fn routes(state: RecipesState) -> Router {
        Router::new()
            .route("/api/recipes/generate", post(generate_recipes))
            .route("/api/recipes/discover", post(discover_recipes))
            .route("/api/recipes/use-it-up", post(use_it_up_recipes))
            .with_state(state)
    }
}

/// Generate recipes in one shot via the orchestrator.
///
/// # Errors
///
/// Propagates orchestrator classification errors; a timeout surfaces as
/// [`GenerationTimeout`](crate::errors::ErrorCode::GenerationTimeout).
async fn generate_recipes(
    State(state): State<RecipesState>,
    Json(request): Json<GenerateRequest>,
) -> AppResult<Json<GenerationResult>> {
    info!(
        mode = %request.mode,
        pantry_items = request.request.pantry_items.len(),
        "batch generation request"
    );

    let budget_secs = state.batch_timeout.as_secs();
    let result = timeout(state.batch_timeout, state.orchestrator.generate(request))
        .await
        .map_err(|_| AppError::generation_timeout(budget_secs))??;

    Ok(Json(result))
}

/// Profile-driven discovery recipes; the pantry snapshot is ignored.
async fn discover_recipes(
    State(state): State<RecipesState>,
    Json(request): Json<RecipeRequest>,
) -> AppResult<Json<AgentGenerationResponse>> {
    run_agent(&state, state.profile_agent.as_ref(), request).await
}

/// Expiry-prioritized recipes built around soon-to-expire pantry items.
async fn use_it_up_recipes(
    State(state): State<RecipesState>,
    Json(request): Json<RecipeRequest>,
) -> AppResult<Json<AgentGenerationResponse>> {
    if request.pantry_items.is_empty() {
        return Err(AppError::empty_pantry());
    }
    run_agent(&state, state.expiry_agent.as_ref(), request).await
}

/// Run one agent directly and apply the allergen gate to its output
async fn run_agent(
    state: &RecipesState,
    agent: &dyn RecipeAgent,
    mut request: RecipeRequest,
) -> AppResult<Json<AgentGenerationResponse>> {
    request.recipe_count = state.orchestrator.clamp_recipe_count(request.recipe_count);

    info!(
        agent = agent.name(),
        recipe_count = request.recipe_count,
        "direct agent generation request"
    );

    let budget_secs = state.batch_timeout.as_secs();
    let recipes = timeout(state.batch_timeout, agent.generate(&request))
        .await
        .map_err(|_| AppError::generation_timeout(budget_secs))??;

    let total_generated = recipes.len();
    let recipes = filter_recipes(recipes, &request.preferences.allergens);
    let filtered_count = total_generated - recipes.len();

    if recipes.is_empty() {
        if filtered_count > 0 {
            return Err(AppError::all_recipes_filtered(serde_json::json!({
                "filtered_count": filtered_count,
                "total_count": 0,
            })));
        }
        return Err(AppError::no_recipes_generated());
    }

    Ok(Json(AgentGenerationResponse {
        total_count: recipes.len(),
        filtered_count,
        recipes,
        generated_at: Utc::now(),
    }))
}
