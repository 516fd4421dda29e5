// ABOUTME: Core domain model for pantry items, user preferences, and generated recipes
// ABOUTME: Immutable snapshot types passed through the generation pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! # Domain Model
//!
//! Data structures shared across the generation pipeline. Pantry items and
//! preferences are read-only snapshots supplied by external stores; recipes
//! are generation artifacts created fresh per request and never persisted by
//! this crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Days-until-expiry sentinel for pantry items without an expiration date.
///
/// Large enough to sort after any realistic expiration horizon.
pub const NO_EXPIRY_SENTINEL_DAYS: i64 = 999;

/// An item in the user's pantry.
///
/// Immutable snapshot passed into generation; the pipeline never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PantryItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_expiring_soon: bool,
    #[serde(default)]
    pub is_expired: bool,
}

impl PantryItem {
    /// Days until this item expires, relative to `now`.
    ///
    /// Items without an expiration date report [`NO_EXPIRY_SENTINEL_DAYS`]
    /// so they sort after everything with a real date. Already-expired items
    /// clamp to zero.
    #[must_use]
    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        match self.expiration_date {
            Some(expires) => (expires - now).num_days().max(0),
            None => NO_EXPIRY_SENTINEL_DAYS,
        }
    }
}

/// User dietary preferences and restrictions.
///
/// Allergens are matched case-insensitively by the allergen filter; the rest
/// are soft constraints shaped into generation prompts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
    #[serde(default)]
    pub nutritional_goals: Vec<String>,
    #[serde(default)]
    pub cooking_skill: String,
    #[serde(default)]
    pub cuisine_preferences: Vec<String>,
}

/// Recipe difficulty rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

/// Which generation strategy produced a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeSource {
    PantryOnly,
    Flexible,
    Profile,
    Expiry,
}

impl RecipeSource {
    /// Stable identifier matching the producing agent's name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PantryOnly => "pantry_only",
            Self::Flexible => "flexible",
            Self::Profile => "profile",
            Self::Expiry => "expiry",
        }
    }
}

impl std::fmt::Display for RecipeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recipe ingredient.
///
/// `amount` is free text as returned by the generation model ("2 cups",
/// "a pinch"), not a structured quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub from_pantry: bool,
}

/// A generated recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub prep_time_minutes: u32,
    #[serde(default)]
    pub cook_time_minutes: u32,
    /// Derived: prep + cook
    #[serde(default)]
    pub total_time_minutes: u32,
    #[serde(default)]
    pub servings: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    /// Ingredients not present in the pantry (empty for pantry-only output)
    #[serde(default)]
    pub missing_ingredients: Vec<Ingredient>,
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
    pub source: RecipeSource,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn item_expiring_in(days: i64) -> PantryItem {
        PantryItem {
            id: "1".into(),
            name: "milk".into(),
            category: "DAIRY".into(),
            quantity: 1.0,
            unit: "gallon".into(),
            expiration_date: Some(Utc::now() + Duration::days(days)),
            is_expiring_soon: days <= 3,
            is_expired: days < 0,
        }
    }

    #[test]
    fn test_days_until_expiry_clamps_negative_to_zero() {
        let item = item_expiring_in(-5);
        assert_eq!(item.days_until_expiry(Utc::now()), 0);
    }

    #[test]
    fn test_days_until_expiry_sentinel_without_date() {
        let item = PantryItem {
            expiration_date: None,
            ..item_expiring_in(1)
        };
        assert_eq!(item.days_until_expiry(Utc::now()), NO_EXPIRY_SENTINEL_DAYS);
    }

    #[test]
    fn test_recipe_source_round_trip() {
        let json = serde_json::to_string(&RecipeSource::PantryOnly).unwrap();
        assert_eq!(json, "\"pantry_only\"");
        let back: RecipeSource = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RecipeSource::PantryOnly);
    }
}
