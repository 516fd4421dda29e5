// ABOUTME: Flexible generation agent permitting a capped number of extra ingredients
// ABOUTME: Pantry-first recipes that may add up to max_missing shopping items
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! Flexible agent: pantry items plus a limited number of additional ingredients.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use super::prompts::{build_recipe_prompt, PromptShape};
use super::{convert_model_recipes, RecipeAgent, RecipeRequest};
use crate::errors::AppResult;
use crate::llm::{parse_recipe_payload, TextGenerator};
use crate::models::{Recipe, RecipeSource};

/// Default cap on additional non-pantry ingredients
pub const DEFAULT_MAX_MISSING_ITEMS: u32 = 3;

/// Generates recipes using pantry items plus up to a configurable number of
/// additional ingredients.
pub struct FlexibleAgent {
    model: Arc<dyn TextGenerator>,
    max_missing_items: u32,
}

impl FlexibleAgent {
    /// Create a new flexible agent with the default missing-item cap
    #[must_use]
    pub fn new(model: Arc<dyn TextGenerator>) -> Self {
        Self {
            model,
            max_missing_items: DEFAULT_MAX_MISSING_ITEMS,
        }
    }

    /// Set the maximum number of additional ingredients
    #[must_use]
    pub const fn with_max_missing_items(mut self, max: u32) -> Self {
        self.max_missing_items = max;
        self
    }
}

#[async_trait]
impl RecipeAgent for FlexibleAgent {
    fn name(&self) -> &'static str {
        "flexible"
    }

    async fn generate(&self, req: &RecipeRequest) -> AppResult<Vec<Recipe>> {
        info!(
            recipe_count = req.recipe_count,
            pantry_items = req.pantry_items.len(),
            max_missing = self.max_missing_items,
            "FlexibleAgent: generating recipes"
        );

        let prompt = build_recipe_prompt(
            req,
            PromptShape {
                pantry_only: false,
                max_missing: self.max_missing_items,
            },
        );

        let raw = self.model.generate(&prompt).await.inspect_err(|e| {
            error!(error = %e, "FlexibleAgent: generation failed");
        })?;
        let recipes = parse_recipe_payload(&raw)?;

        info!(generated = recipes.len(), "FlexibleAgent: generated recipes");

        Ok(convert_model_recipes(recipes, RecipeSource::Flexible))
    }
}
