// ABOUTME: Profile-driven discovery agent that ignores the pantry entirely
// ABOUTME: Every suggested ingredient is marked to-buy for general discovery recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! Profile agent: discovery recipes generated purely from the user's stored
//! profile (allergens, dietary preferences, nutritional goals, cooking
//! skill, cuisines). No pantry is required; all ingredients are "to buy".

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use super::prompts::build_profile_prompt;
use super::{convert_model_recipes, RecipeAgent, RecipeRequest};
use crate::errors::AppResult;
use crate::llm::{parse_recipe_payload, TextGenerator};
use crate::models::{Recipe, RecipeSource};

/// Generates recipes purely from the user's stored profile
pub struct ProfileAgent {
    model: Arc<dyn TextGenerator>,
}

impl ProfileAgent {
    /// Create a new profile agent
    #[must_use]
    pub fn new(model: Arc<dyn TextGenerator>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl RecipeAgent for ProfileAgent {
    fn name(&self) -> &'static str {
        "profile"
    }

    async fn generate(&self, req: &RecipeRequest) -> AppResult<Vec<Recipe>> {
        info!(
            recipe_count = req.recipe_count,
            "ProfileAgent: generating recipes from user profile"
        );

        let prompt = build_profile_prompt(req);

        let raw = self.model.generate(&prompt).await.inspect_err(|e| {
            error!(error = %e, "ProfileAgent: generation failed");
        })?;
        let recipes = parse_recipe_payload(&raw)?;

        info!(generated = recipes.len(), "ProfileAgent: generated recipes");

        let mut recipes = convert_model_recipes(recipes, RecipeSource::Profile);
        // Nothing comes from a pantry here, whatever the model claimed.
        for recipe in &mut recipes {
            for ingredient in &mut recipe.ingredients {
                ingredient.from_pantry = false;
            }
        }

        Ok(recipes)
    }
}
