// ABOUTME: Recipe generation agent contract and shared request/conversion types
// ABOUTME: Four fixed agents shape constraints differently over one collaborator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! # Recipe Generation Agents
//!
//! Each agent is one fixed algorithm for turning a pantry + preferences
//! snapshot into recipes via the text-generation collaborator. The set is
//! closed: pantry-only, flexible, profile, and expiry. Their constraint
//! shaping is the behavior, not an extension point.
//!
//! Agents propagate the user's allergen list into their prompts as a soft
//! instruction; the [`filter`] module is the only mandatory safety gate.

pub mod expiry;
pub mod filter;
pub mod flexible;
pub mod orchestrator;
pub mod pantry_only;
pub mod profile;
pub mod prompts;

pub use expiry::ExpiryAgent;
pub use flexible::FlexibleAgent;
pub use orchestrator::{GenerateRequest, GenerationResult, Orchestrator, OrchestratorMode};
pub use pantry_only::PantryOnlyAgent;
pub use profile::ProfileAgent;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;
use crate::llm::ModelRecipe;
use crate::models::{Difficulty, Ingredient, PantryItem, Recipe, RecipeSource, UserPreferences};

/// All the information an agent needs to generate recipes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeRequest {
    /// User's pantry snapshot
    pub pantry_items: Vec<PantryItem>,
    /// User's preferences and restrictions
    #[serde(default)]
    pub preferences: UserPreferences,
    /// How many recipes to generate (clamped to 1-3 by the orchestrator)
    #[serde(default)]
    pub recipe_count: u32,
    /// Optional free-text hint forwarded into the prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_prompt: Option<String>,
}

/// Contract implemented by every recipe generation agent
#[async_trait]
pub trait RecipeAgent: Send + Sync {
    /// The agent's stable identifier
    fn name(&self) -> &'static str;

    /// Generate recipes for the request.
    ///
    /// Collaborator errors are returned unchanged; no retry at this layer.
    async fn generate(&self, req: &RecipeRequest) -> AppResult<Vec<Recipe>>;
}

/// Parse a model-reported difficulty with fallback to medium
fn parse_difficulty(s: &str) -> Difficulty {
    match s.to_lowercase().as_str() {
        "easy" => Difficulty::Easy,
        "hard" => Difficulty::Hard,
        _ => Difficulty::Medium,
    }
}

/// Convert model-shaped recipes into domain recipes, tagging the source.
///
/// Missing items are never `from_pantry` regardless of what the model
/// claimed, and the total time is derived here rather than trusted.
#[must_use]
pub fn convert_model_recipes(recipes: Vec<ModelRecipe>, source: RecipeSource) -> Vec<Recipe> {
    recipes
        .into_iter()
        .map(|r| {
            let ingredients = r
                .ingredients
                .into_iter()
                .map(|i| Ingredient {
                    name: i.name,
                    amount: i.amount,
                    unit: i.unit,
                    from_pantry: i.from_pantry,
                })
                .collect();

            let missing_ingredients = r
                .missing_items
                .into_iter()
                .map(|i| Ingredient {
                    name: i.name,
                    amount: i.amount,
                    unit: i.unit,
                    from_pantry: false,
                })
                .collect();

            Recipe {
                title: r.title,
                description: r.description,
                cuisine: r.cuisine,
                prep_time_minutes: r.prep_time_minutes,
                cook_time_minutes: r.cook_time_minutes,
                total_time_minutes: r.prep_time_minutes + r.cook_time_minutes,
                servings: r.servings,
                difficulty: parse_difficulty(&r.difficulty),
                ingredients,
                instructions: r.instructions,
                missing_ingredients,
                calories_per_serving: r.calories_per_serving,
                protein_g: r.protein_g,
                carbs_g: r.carbs_g,
                fat_g: r.fat_g,
                tags: r.tags,
                source,
            }
        })
        .collect()
}
