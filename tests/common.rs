// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Scripted text-generation doubles and domain object builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs
#![allow(dead_code)]

//! Shared test utilities for `souschef`
//!
//! Provides a scripted [`TextGenerator`] double with call counting and
//! prompt capture, plus builders for pantry items and recipe payloads.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};

use souschef::errors::AppError;
use souschef::llm::TextGenerator;
use souschef::models::{PantryItem, UserPreferences};

/// Scripted text-generation double.
///
/// Responses are selected by prompt markers so concurrent strategies get
/// deterministic answers regardless of completion order; prompts and call
/// counts are recorded for assertions.
struct Rule {
    marker: String,
    response: Result<String, String>,
    delay: Duration,
}

pub struct StubModel {
    rules: Vec<Rule>,
    fallback: Result<String, String>,
    delay: Duration,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubModel {
    /// Answer every call with the given payload
    pub fn answering(payload: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            fallback: Ok(payload.into()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Fail every call with the given message
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            fallback: Err(message.into()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Route prompts containing `marker` to the given payload
    #[must_use]
    pub fn with_response(mut self, marker: &str, payload: impl Into<String>) -> Self {
        self.rules.push(Rule {
            marker: marker.to_owned(),
            response: Ok(payload.into()),
            delay: Duration::ZERO,
        });
        self
    }

    /// Route prompts containing `marker` to the given payload after a delay
    #[must_use]
    pub fn with_response_delayed(
        mut self,
        marker: &str,
        payload: impl Into<String>,
        delay: Duration,
    ) -> Self {
        self.rules.push(Rule {
            marker: marker.to_owned(),
            response: Ok(payload.into()),
            delay,
        });
        self
    }

    /// Route prompts containing `marker` to a failure
    #[must_use]
    pub fn with_failure(mut self, marker: &str, message: impl Into<String>) -> Self {
        self.rules.push(Rule {
            marker: marker.to_owned(),
            response: Err(message.into()),
            delay: Duration::ZERO,
        });
        self
    }

    /// Delay every response, simulating a slow collaborator
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of generate calls received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// All prompts received, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StubModel {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_owned());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let rule = self.rules.iter().find(|rule| prompt.contains(&rule.marker));
        let response = rule.map_or(&self.fallback, |rule| {
            &rule.response
        });
        if let Some(rule) = rule {
            if !rule.delay.is_zero() {
                tokio::time::sleep(rule.delay).await;
            }
        }

        match response {
            Ok(payload) => Ok(payload.clone()),
            Err(message) => Err(AppError::external_service("stub", message.clone())),
        }
    }
}

/// Prompt marker unique to the pantry-only prompt
pub const PANTRY_ONLY_MARKER: &str = "## Recipe Type: pantry-only";
/// Prompt marker unique to the flexible prompt
pub const FLEXIBLE_MARKER: &str = "## Recipe Type: flexible";
/// Prompt marker unique to the expiry prompt
pub const EXPIRY_MARKER: &str = "REDUCING FOOD WASTE";
/// Prompt marker unique to the profile prompt
pub const PROFILE_MARKER: &str = "no pantry to draw from";

/// Build a pantry item expiring in `days` (None = no expiration date)
pub fn pantry_item(name: &str, expires_in_days: Option<i64>) -> PantryItem {
    PantryItem {
        id: format!("item-{name}"),
        name: name.to_owned(),
        category: "PANTRY".into(),
        quantity: 1.0,
        unit: "item".into(),
        expiration_date: expires_in_days.map(|d| Utc::now() + ChronoDuration::days(d)),
        is_expiring_soon: expires_in_days.is_some_and(|d| (0..=3).contains(&d)),
        is_expired: expires_in_days.is_some_and(|d| d < 0),
    }
}

/// A small default pantry
pub fn sample_pantry() -> Vec<PantryItem> {
    vec![
        pantry_item("rice", None),
        pantry_item("chicken breast", Some(2)),
        pantry_item("broccoli", Some(4)),
    ]
}

/// Preferences with the given allergens and defaults elsewhere
pub fn preferences_with_allergens(allergens: &[&str]) -> UserPreferences {
    UserPreferences {
        allergens: allergens.iter().map(|s| (*s).to_owned()).collect(),
        dietary_preferences: vec![],
        nutritional_goals: vec![],
        cooking_skill: "intermediate".into(),
        cuisine_preferences: vec![],
    }
}

/// One recipe as JSON, titled and with the given ingredient names
pub fn recipe_json(title: &str, ingredients: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "description": format!("{title} description"),
        "cuisine": "Fusion",
        "prep_time_minutes": 10,
        "cook_time_minutes": 20,
        "servings": 2,
        "difficulty": "easy",
        "ingredients": ingredients
            .iter()
            .map(|name| serde_json::json!({
                "name": name,
                "amount": "1",
                "unit": "cup",
                "from_pantry": true,
            }))
            .collect::<Vec<_>>(),
        "instructions": ["Combine everything.", "Cook until done."],
        "missing_items": [],
        "calories_per_serving": 400.0,
        "protein_g": 20.0,
        "carbs_g": 40.0,
        "fat_g": 12.0,
        "tags": ["quick"],
    })
}

/// A `{"recipes": [...]}` payload string
pub fn recipes_payload(recipes: &[serde_json::Value]) -> String {
    serde_json::json!({ "recipes": recipes }).to_string()
}
