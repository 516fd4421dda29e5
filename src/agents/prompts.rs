// ABOUTME: Prompt construction for the recipe generation agents
// ABOUTME: Renders pantry snapshots and preferences into strategy-specific prompts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! # Generation Prompts
//!
//! Every agent renders its constraint set into a prompt here. The response
//! format section is shared so all strategies produce the same recipe shape,
//! and the allergen warning is embedded in every prompt as a soft
//! instruction. The allergen filter remains the hard guarantee.

use chrono::Utc;
use serde::Serialize;

use super::RecipeRequest;
use crate::models::{PantryItem, UserPreferences};

/// Pantry item shape presented to the generation model
#[derive(Debug, Serialize)]
pub struct PromptItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: String,
    pub is_expiring_soon: bool,
    pub days_until_expiry: i64,
}

/// Project pantry items into the prompt shape, stamping days-until-expiry
#[must_use]
pub fn prompt_items(items: &[PantryItem]) -> Vec<PromptItem> {
    let now = Utc::now();
    items
        .iter()
        .map(|item| PromptItem {
            name: item.name.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            category: item.category.clone(),
            is_expiring_soon: item.is_expiring_soon,
            days_until_expiry: item.days_until_expiry(now),
        })
        .collect()
}

/// Ingredient-sourcing constraints for the standard recipe prompt
#[derive(Debug, Clone, Copy)]
pub struct PromptShape {
    /// Forbid any ingredient not already in the pantry
    pub pantry_only: bool,
    /// Additional non-pantry ingredients permitted (0 when `pantry_only`)
    pub max_missing: u32,
}

fn allergen_warning(preferences: &UserPreferences) -> String {
    if preferences.allergens.is_empty() {
        return String::new();
    }
    format!(
        "\nCRITICAL: User has the following allergens. NEVER include these or any derivatives: {:?}",
        preferences.allergens
    )
}

fn user_hint(req: &RecipeRequest) -> String {
    match req.user_prompt.as_deref() {
        Some(hint) if !hint.trim().is_empty() => format!("\n## Additional Request:\n{hint}\n"),
        _ => String::new(),
    }
}

fn response_format(count: u32, missing_note: &str) -> String {
    format!(
        r#"## Response Format:
Return a JSON object with a "recipes" array containing exactly {count} recipes. Each recipe must have:
- title: Creative, appetizing name
- description: 1-2 sentence description
- cuisine: The cuisine type (Italian, Asian, Mexican, etc.)
- prep_time_minutes: Realistic prep time
- cook_time_minutes: Realistic cook time
- servings: Number of servings (2-4 typical)
- difficulty: "easy", "medium", or "hard"
- ingredients: Array of {{name, amount, unit, from_pantry}}
- instructions: Array of step-by-step instructions (clear, numbered)
- missing_items: {missing_note}
- calories_per_serving: Estimated calories
- protein_g, carbs_g, fat_g: Estimated macros
- tags: Array of relevant tags (e.g., "quick", "healthy", "comfort-food")

Generate recipes now:"#
    )
}

/// Build the standard recipe prompt used by the pantry-only and flexible
/// agents, differing only in the sourcing constraint.
#[must_use]
pub fn build_recipe_prompt(req: &RecipeRequest, shape: PromptShape) -> String {
    let pantry_json = serde_json::to_string_pretty(&prompt_items(&req.pantry_items))
        .unwrap_or_else(|_| "[]".to_owned());
    let prefs_json =
        serde_json::to_string_pretty(&req.preferences).unwrap_or_else(|_| "{}".to_owned());

    let (recipe_type, sourcing_rule, missing_note) = if shape.pantry_only {
        (
            "pantry-only",
            "Use ONLY ingredients from the pantry. Do not suggest any additional ingredients."
                .to_owned(),
            "[] (always empty - pantry only)".to_owned(),
        )
    } else {
        (
            "flexible",
            format!(
                "You may suggest up to {} additional ingredients not in the pantry.",
                shape.max_missing
            ),
            "Array of {name, amount, unit} for items not in pantry".to_owned(),
        )
    };

    format!(
        r#"You are a professional chef and recipe recommendation engine. Generate {count} recipes based on the user's pantry items and preferences.

## Recipe Type: {recipe_type}
{sourcing_rule}

## User's Pantry Items:
{pantry_json}

## User's Preferences:
{prefs_json}
{hint}
## Instructions:
1. Prioritize items that are expiring soon (is_expiring_soon: true)
2. Create recipes that match the user's cooking skill level
3. Respect ALL allergens - never include any ingredient the user is allergic to
4. Consider dietary preferences and nutritional goals
5. If cuisine preferences are specified, favor those cuisines
{allergens}

{format}"#,
        count = req.recipe_count,
        hint = user_hint(req),
        allergens = allergen_warning(&req.preferences),
        format = response_format(req.recipe_count, &missing_note),
    )
}

/// Build the expiry-prioritized prompt.
///
/// `sorted_items` must already be ascending by days-until-expiry and
/// `urgent_names` is the subset expiring within the urgency window.
#[must_use]
pub fn build_expiry_prompt(
    req: &RecipeRequest,
    sorted_items: &[PantryItem],
    urgent_names: &[String],
) -> String {
    let pantry_json = serde_json::to_string_pretty(&prompt_items(sorted_items))
        .unwrap_or_else(|_| "[]".to_owned());
    let prefs_json =
        serde_json::to_string_pretty(&req.preferences).unwrap_or_else(|_| "{}".to_owned());
    let urgent_json = serde_json::to_string(urgent_names).unwrap_or_else(|_| "[]".to_owned());

    format!(
        r#"You are a professional chef specializing in REDUCING FOOD WASTE.
Your #1 goal is to create delicious recipes that USE UP ingredients that are about to expire.

## URGENT - These ingredients are expiring within 3 days and MUST be used:
{urgent_json}

Every recipe you generate MUST prominently feature at least one of the urgent ingredients above.
Build each recipe AROUND these expiring items. They should be the star of the dish, not a garnish.

## Full Pantry (sorted by urgency - items expiring soonest listed first):
{pantry_json}

## User Preferences:
{prefs_json}
{allergens}
{hint}
## Rules:
1. EVERY recipe MUST use at least one of the urgent expiring ingredients as a PRIMARY ingredient
2. Use ONLY ingredients from the pantry - do not suggest any additional purchases
3. Prioritize recipes that use MULTIPLE expiring items together
4. Respect the user's allergens, dietary preferences, and cooking skill level
5. Make the recipes practical and quick - the user needs to cook these soon
6. Mark all ingredients with from_pantry: true
7. Always include the tag "use-it-up"

{format}"#,
        allergens = allergen_warning(&req.preferences),
        hint = user_hint(req),
        format = response_format(req.recipe_count, "[] (always empty - pantry only)"),
    )
}

/// Build the profile-driven discovery prompt.
///
/// The pantry is deliberately absent: every ingredient is something the
/// user would buy, so all ingredients belong in `missing_items`.
#[must_use]
pub fn build_profile_prompt(req: &RecipeRequest) -> String {
    let prefs_json =
        serde_json::to_string_pretty(&req.preferences).unwrap_or_else(|_| "{}".to_owned());

    format!(
        r#"You are a professional chef helping a user discover new recipes that fit their tastes.
There is no pantry to draw from: the user will shop for everything, so suggest whatever fits their profile best.

## User's Profile:
{prefs_json}
{allergens}
{hint}
## Instructions:
1. Match the user's cooking skill level
2. Respect ALL allergens - never include any ingredient the user is allergic to
3. Favor the user's preferred cuisines and dietary preferences
4. Support the user's nutritional goals
5. Mark every ingredient with from_pantry: false and list every ingredient in missing_items as well

{format}"#,
        allergens = allergen_warning(&req.preferences),
        hint = user_hint(req),
        format = response_format(
            req.recipe_count,
            "Array of {name, amount, unit} - every ingredient, since nothing comes from a pantry"
        ),
    )
}
