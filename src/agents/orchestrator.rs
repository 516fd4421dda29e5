// ABOUTME: Orchestrator coordinating strategy selection, concurrent fan-out, and filtering
// ABOUTME: Merges agent output, applies the allergen gate, and classifies the outcome
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! # Generation Orchestrator
//!
//! State machine over a single request: validate, select strategies, run
//! them (concurrently when both are requested), merge, filter, classify.
//!
//! The concurrent-pair path is a fan-out/fan-in join: both agents are
//! spawned against the same request and the orchestrator waits for both to
//! report before merging. A single failing agent is logged and treated as
//! empty; only both failing fails the request. Merge order is structural
//! (pantry-only before flexible), never completion-order dependent.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tokio::sync::mpsc;
use tracing::{error, info};

use super::filter;
use super::{FlexibleAgent, PantryOnlyAgent, RecipeAgent, RecipeRequest};
use crate::config::GenerationLimits;
use crate::errors::{AppError, AppResult};
use crate::llm::TextGenerator;
use crate::models::Recipe;

/// Which strategy set the orchestrator runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrchestratorMode {
    /// Run the pantry-only agent alone (the default)
    #[default]
    PantryOnly,
    /// Run the flexible agent alone
    Flexible,
    /// Run pantry-only and flexible concurrently
    Both,
}

impl OrchestratorMode {
    /// Stable identifier used on the wire
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PantryOnly => "pantry_only",
            Self::Flexible => "flexible",
            Self::Both => "both",
        }
    }

    /// Parse from string; unrecognized values fall back to pantry-only
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s {
            "flexible" => Self::Flexible,
            "both" => Self::Both,
            _ => Self::PantryOnly,
        }
    }
}

impl std::fmt::Display for OrchestratorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrchestratorMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Lenient by design: clients sending an unknown mode get pantry-only
// instead of a rejected request.
impl<'de> Deserialize<'de> for OrchestratorMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_str_or_default(&s))
    }
}

/// Request for the orchestrator: the agent request plus a mode selector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub request: RecipeRequest,
    #[serde(default)]
    pub mode: OrchestratorMode,
}

/// Combined result across the strategies that ran
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pantry_only_recipes: Vec<Recipe>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flexible_recipes: Vec<Recipe>,
    /// Merged, allergen-filtered recipes in strategy-invocation order
    pub all_recipes: Vec<Recipe>,
    pub generated_at: DateTime<Utc>,
    /// Surviving recipe count after the allergen filter
    pub total_count: usize,
    /// How many recipes the allergen filter removed
    pub filtered_count: usize,
}

/// Coordinates the recipe generation agents for one request at a time
pub struct Orchestrator {
    pantry_agent: Arc<PantryOnlyAgent>,
    flexible_agent: Arc<FlexibleAgent>,
    limits: GenerationLimits,
}

impl Orchestrator {
    /// Create an orchestrator with both agents bound to the same collaborator
    #[must_use]
    pub fn new(model: Arc<dyn TextGenerator>, limits: GenerationLimits) -> Self {
        Self {
            pantry_agent: Arc::new(PantryOnlyAgent::new(Arc::clone(&model))),
            flexible_agent: Arc::new(
                FlexibleAgent::new(model).with_max_missing_items(limits.max_missing_items),
            ),
            limits,
        }
    }

    /// Clamp a requested recipe count into the configured bounds.
    ///
    /// Zero/unset falls back to the default; anything above the maximum is
    /// capped.
    #[must_use]
    pub fn clamp_recipe_count(&self, requested: u32) -> u32 {
        if requested == 0 {
            self.limits.default_recipe_count
        } else {
            requested.min(self.limits.max_recipe_count)
        }
    }

    /// Orchestrate recipe generation across agents.
    ///
    /// # Errors
    ///
    /// - [`InvalidRequest`](crate::errors::ErrorCode::InvalidRequest) when
    ///   the pantry snapshot is empty (no agent runs).
    /// - The collaborator error unchanged when a single requested strategy
    ///   fails.
    /// - [`StrategyFailure`](crate::errors::ErrorCode::StrategyFailure) when
    ///   both strategies of the concurrent pair fail.
    /// - [`AllRecipesFiltered`](crate::errors::ErrorCode::AllRecipesFiltered)
    ///   when recipes were generated but none survived the allergen filter;
    ///   the error details carry the result so callers can still show the
    ///   filtered count.
    /// - [`NoRecipesGenerated`](crate::errors::ErrorCode::NoRecipesGenerated)
    ///   when zero recipes came back and nothing was filtered.
    pub async fn generate(&self, req: GenerateRequest) -> AppResult<GenerationResult> {
        if req.request.pantry_items.is_empty() {
            return Err(AppError::invalid_request("pantry item list is empty"));
        }

        let mut request = req.request;
        request.recipe_count = self.clamp_recipe_count(request.recipe_count);

        info!(
            mode = %req.mode,
            pantry_items = request.pantry_items.len(),
            recipe_count = request.recipe_count,
            "Orchestrator: starting recipe generation"
        );

        let (pantry_recipes, flexible_recipes) = match req.mode {
            OrchestratorMode::PantryOnly => {
                (self.pantry_agent.generate(&request).await?, Vec::new())
            }
            OrchestratorMode::Flexible => {
                (Vec::new(), self.flexible_agent.generate(&request).await?)
            }
            OrchestratorMode::Both => self.generate_both(&request).await?,
        };

        let total_generated = pantry_recipes.len() + flexible_recipes.len();

        // Merge order is structural: pantry-only before flexible.
        let mut merged = Vec::with_capacity(total_generated);
        merged.extend(pantry_recipes.iter().cloned());
        merged.extend(flexible_recipes.iter().cloned());

        let allergens = &request.preferences.allergens;
        let all_recipes = filter::filter_recipes(merged, allergens);
        let filtered_count = total_generated - all_recipes.len();

        let result = GenerationResult {
            pantry_only_recipes: filter::filter_recipes(pantry_recipes, allergens),
            flexible_recipes: filter::filter_recipes(flexible_recipes, allergens),
            total_count: all_recipes.len(),
            all_recipes,
            generated_at: Utc::now(),
            filtered_count,
        };

        if result.total_count == 0 {
            if result.filtered_count > 0 {
                let details = serde_json::to_value(&result)
                    .unwrap_or(serde_json::Value::Null);
                return Err(AppError::all_recipes_filtered(details));
            }
            return Err(AppError::no_recipes_generated());
        }

        info!(
            total = result.total_count,
            filtered = result.filtered_count,
            "Orchestrator: generated recipes"
        );

        Ok(result)
    }

    /// Run both agents concurrently against the same request.
    ///
    /// Fan-out/fan-in: two spawned tasks report into a two-slot channel and
    /// the orchestrator waits for both before classifying failures. There is
    /// no cancellation of the sibling on first success.
    async fn generate_both(
        &self,
        request: &RecipeRequest,
    ) -> AppResult<(Vec<Recipe>, Vec<Recipe>)> {
        type AgentReport = (&'static str, AppResult<Vec<Recipe>>);
        let (tx, mut rx) = mpsc::channel::<AgentReport>(2);

        let pantry_agent = Arc::clone(&self.pantry_agent);
        let pantry_req = request.clone();
        let pantry_tx = tx.clone();
        tokio::spawn(async move {
            let result = pantry_agent.generate(&pantry_req).await;
            let _ = pantry_tx.send((pantry_agent.name(), result)).await;
        });

        let flexible_agent = Arc::clone(&self.flexible_agent);
        let flexible_req = request.clone();
        tokio::spawn(async move {
            let result = flexible_agent.generate(&flexible_req).await;
            let _ = tx.send((flexible_agent.name(), result)).await;
        });

        let mut pantry_recipes: Option<Vec<Recipe>> = None;
        let mut flexible_recipes: Option<Vec<Recipe>> = None;
        let mut last_err: Option<AppError> = None;

        for _ in 0..2 {
            let Some((agent, result)) = rx.recv().await else {
                break;
            };
            match result {
                Ok(recipes) => {
                    if agent == "pantry_only" {
                        pantry_recipes = Some(recipes);
                    } else {
                        flexible_recipes = Some(recipes);
                    }
                }
                Err(e) => {
                    error!(agent, error = %e, "Orchestrator: agent failed");
                    last_err = Some(e);
                }
            }
        }

        if pantry_recipes.is_none() && flexible_recipes.is_none() {
            let err = last_err
                .unwrap_or_else(|| AppError::internal("agents finished without reporting"));
            return Err(AppError::strategy_failure(err.message.clone()).with_source(err));
        }

        Ok((
            pantry_recipes.unwrap_or_default(),
            flexible_recipes.unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing_falls_back_to_pantry_only() {
        assert_eq!(
            OrchestratorMode::from_str_or_default("flexible"),
            OrchestratorMode::Flexible
        );
        assert_eq!(
            OrchestratorMode::from_str_or_default("both"),
            OrchestratorMode::Both
        );
        assert_eq!(
            OrchestratorMode::from_str_or_default("surprise_me"),
            OrchestratorMode::PantryOnly
        );
    }

    #[test]
    fn test_mode_deserialize_is_lenient() {
        let mode: OrchestratorMode = serde_json::from_str("\"nonsense\"").unwrap();
        assert_eq!(mode, OrchestratorMode::PantryOnly);
    }
}
