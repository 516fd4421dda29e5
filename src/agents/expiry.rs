// ABOUTME: Expiry-prioritized agent that builds recipes around soon-to-expire items
// ABOUTME: Sorts the pantry by urgency and requires urgent items as primary ingredients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! Expiry agent: recipes that prioritize ingredients close to expiring.
//!
//! The pantry is re-sorted ascending by days-until-expiry (items without an
//! expiration date sort last via the sentinel value) and the subset expiring
//! within [`URGENT_WINDOW_DAYS`] is presented to the model as mandatory
//! primary ingredients. Zero missing items are permitted.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info};

use super::prompts::build_expiry_prompt;
use super::{convert_model_recipes, RecipeAgent, RecipeRequest};
use crate::errors::AppResult;
use crate::llm::{parse_recipe_payload, TextGenerator};
use crate::models::{PantryItem, Recipe, RecipeSource};

/// Items expiring within this many days are treated as urgent
pub const URGENT_WINDOW_DAYS: i64 = 3;

/// Generates recipes that use up ingredients before they spoil
pub struct ExpiryAgent {
    model: Arc<dyn TextGenerator>,
}

impl ExpiryAgent {
    /// Create a new expiry agent
    #[must_use]
    pub fn new(model: Arc<dyn TextGenerator>) -> Self {
        Self { model }
    }

    /// Sort pantry items ascending by days until expiry.
    ///
    /// Items without an expiration date report the sentinel value and land
    /// at the end; already-expired items clamp to zero and sort first.
    #[must_use]
    pub fn sort_by_urgency(items: &[PantryItem]) -> Vec<PantryItem> {
        let now = Utc::now();
        let mut sorted = items.to_vec();
        sorted.sort_by_key(|item| item.days_until_expiry(now));
        sorted
    }

    /// Names of items expiring within the urgency window
    #[must_use]
    pub fn urgent_names(items: &[PantryItem]) -> Vec<String> {
        let now = Utc::now();
        items
            .iter()
            .filter(|item| item.days_until_expiry(now) <= URGENT_WINDOW_DAYS)
            .map(|item| item.name.clone())
            .collect()
    }
}

#[async_trait]
impl RecipeAgent for ExpiryAgent {
    fn name(&self) -> &'static str {
        "expiry"
    }

    async fn generate(&self, req: &RecipeRequest) -> AppResult<Vec<Recipe>> {
        let sorted = Self::sort_by_urgency(&req.pantry_items);
        let urgent = Self::urgent_names(&sorted);

        info!(
            recipe_count = req.recipe_count,
            pantry_items = req.pantry_items.len(),
            expiring_soon = urgent.len(),
            "ExpiryAgent: generating recipes"
        );

        let prompt = build_expiry_prompt(req, &sorted, &urgent);

        let raw = self.model.generate(&prompt).await.inspect_err(|e| {
            error!(error = %e, "ExpiryAgent: generation failed");
        })?;
        let recipes = parse_recipe_payload(&raw)?;

        info!(generated = recipes.len(), "ExpiryAgent: generated recipes");

        Ok(convert_model_recipes(recipes, RecipeSource::Expiry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn item(name: &str, expires_in_days: Option<i64>) -> PantryItem {
        PantryItem {
            id: name.to_owned(),
            name: name.to_owned(),
            category: String::new(),
            quantity: 1.0,
            unit: "item".into(),
            expiration_date: expires_in_days.map(|d| Utc::now() + Duration::days(d)),
            is_expiring_soon: false,
            is_expired: false,
        }
    }

    #[test]
    fn test_sort_puts_no_expiry_last() {
        let items = vec![item("rice", None), item("milk", Some(1)), item("eggs", Some(5))];
        let sorted = ExpiryAgent::sort_by_urgency(&items);
        let names: Vec<&str> = sorted.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["milk", "eggs", "rice"]);
    }

    #[test]
    fn test_urgent_subset_is_three_day_window() {
        let items = vec![item("milk", Some(1)), item("eggs", Some(5)), item("rice", None)];
        let urgent = ExpiryAgent::urgent_names(&items);
        assert_eq!(urgent, vec!["milk"]);
    }

    #[test]
    fn test_expired_items_sort_first() {
        let items = vec![item("eggs", Some(4)), item("yogurt", Some(-2))];
        let sorted = ExpiryAgent::sort_by_urgency(&items);
        assert_eq!(sorted[0].name, "yogurt");
        assert!(ExpiryAgent::urgent_names(&sorted).contains(&"yogurt".to_owned()));
    }
}
