// ABOUTME: Text-generation collaborator abstraction for pluggable model backends
// ABOUTME: Defines the TextGenerator contract and the structured recipe payload parser
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! # Text-Generation Service Provider Interface
//!
//! This module defines the contract the recipe agents use to talk to a
//! text-generation backend. Agents build a prompt, call
//! [`TextGenerator::generate`], and parse the returned text with
//! [`parse_recipe_payload`].
//!
//! The accepted response shape is a JSON object `{"recipes": [...]}` with
//! fallback acceptance of a bare recipe array. Anything else surfaces as an
//! invalid-response error; retry policy, if any, belongs to the backend.
//!
//! ## Example
//!
//! ```rust,no_run
//! use souschef::llm::{GeminiProvider, TextGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), souschef::errors::AppError> {
//!     let provider = GeminiProvider::from_env()?;
//!     let raw = provider.generate("Suggest a soup recipe as JSON").await?;
//!     println!("{raw}");
//!     Ok(())
//! }
//! ```

mod gemini;

pub use gemini::GeminiProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Text-generation backend contract.
///
/// Implementations receive a fully rendered prompt and return the model's
/// raw text output. Structural validation of that output happens in
/// [`parse_recipe_payload`], not in the provider.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Unique backend identifier (e.g. "gemini")
    fn name(&self) -> &'static str;

    /// Generate text for the given prompt
    async fn generate(&self, prompt: &str) -> Result<String, AppError>;
}

/// Recipe shape as emitted by the generation model.
///
/// Field names follow the response format the prompts request; the agents
/// convert this into the domain [`Recipe`](crate::models::Recipe) with a
/// source tag and derived totals attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRecipe {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub prep_time_minutes: u32,
    #[serde(default)]
    pub cook_time_minutes: u32,
    #[serde(default)]
    pub servings: u32,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub ingredients: Vec<ModelIngredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub missing_items: Vec<ModelIngredient>,
    #[serde(default)]
    pub calories_per_serving: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fat_g: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Ingredient shape as emitted by the generation model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelIngredient {
    pub name: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub from_pantry: bool,
}

/// Envelope shape for the primary `{"recipes": [...]}` response format
#[derive(Debug, Deserialize)]
struct RecipeEnvelope {
    recipes: Vec<ModelRecipe>,
}

/// Parse a model response into structured recipes.
///
/// Accepts a JSON object with a `recipes` array, falling back to a bare
/// array of recipes.
///
/// # Errors
///
/// Returns [`ErrorCode::InvalidResponse`](crate::errors::ErrorCode) when the
/// text parses as neither shape.
pub fn parse_recipe_payload(raw: &str) -> Result<Vec<ModelRecipe>, AppError> {
    if let Ok(envelope) = serde_json::from_str::<RecipeEnvelope>(raw) {
        return Ok(envelope.recipes);
    }

    serde_json::from_str::<Vec<ModelRecipe>>(raw).map_err(|e| {
        AppError::invalid_response(format!("failed to parse recipes payload: {e}"))
    })
}
