// ABOUTME: Pantry-only generation agent that forbids any non-pantry ingredient
// ABOUTME: Strictest sourcing constraint with zero missing items permitted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! Pantry-only agent: recipes built exclusively from what the user already has.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use super::prompts::{build_recipe_prompt, PromptShape};
use super::{convert_model_recipes, RecipeAgent, RecipeRequest};
use crate::errors::AppResult;
use crate::llm::{parse_recipe_payload, TextGenerator};
use crate::models::{Recipe, RecipeSource};

/// Generates recipes using ONLY items from the user's pantry.
///
/// No additional ingredients will be suggested.
pub struct PantryOnlyAgent {
    model: Arc<dyn TextGenerator>,
}

impl PantryOnlyAgent {
    /// Create a new pantry-only agent
    #[must_use]
    pub fn new(model: Arc<dyn TextGenerator>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl RecipeAgent for PantryOnlyAgent {
    fn name(&self) -> &'static str {
        "pantry_only"
    }

    async fn generate(&self, req: &RecipeRequest) -> AppResult<Vec<Recipe>> {
        info!(
            recipe_count = req.recipe_count,
            pantry_items = req.pantry_items.len(),
            "PantryOnlyAgent: generating recipes"
        );

        let prompt = build_recipe_prompt(
            req,
            PromptShape {
                pantry_only: true,
                max_missing: 0,
            },
        );

        let raw = self.model.generate(&prompt).await.inspect_err(|e| {
            error!(error = %e, "PantryOnlyAgent: generation failed");
        })?;
        let recipes = parse_recipe_payload(&raw)?;

        info!(
            generated = recipes.len(),
            "PantryOnlyAgent: generated recipes"
        );

        Ok(convert_model_recipes(recipes, RecipeSource::PantryOnly))
    }
}
