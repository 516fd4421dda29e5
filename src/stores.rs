// ABOUTME: External collaborator contracts for pantry and preference lookup
// ABOUTME: Trait seams with in-memory implementations for tests and demo mode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! # Pantry and Preference Stores
//!
//! The generation core does not own persistence. These traits are the only
//! contracts it needs from whatever stores pantry inventories and user
//! preferences; the streaming session and batch surface fetch snapshots
//! through them at request time.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::AppResult;
use crate::models::{PantryItem, UserPreferences};

/// Read access to a user's pantry inventory
#[async_trait]
pub trait PantryStore: Send + Sync {
    /// Current pantry snapshot for the user (empty if unknown)
    async fn list_items(&self, user_id: &str) -> AppResult<Vec<PantryItem>>;
}

/// Read access to a user's stored preferences
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Current preferences for the user (defaults if unknown)
    async fn get_preferences(&self, user_id: &str) -> AppResult<UserPreferences>;
}

/// In-memory pantry store for tests and demo deployments
#[derive(Default)]
pub struct InMemoryPantryStore {
    items: RwLock<HashMap<String, Vec<PantryItem>>>,
}

impl InMemoryPantryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a user's pantry snapshot
    pub async fn set_items(&self, user_id: impl Into<String>, items: Vec<PantryItem>) {
        self.items.write().await.insert(user_id.into(), items);
    }
}

#[async_trait]
impl PantryStore for InMemoryPantryStore {
    async fn list_items(&self, user_id: &str) -> AppResult<Vec<PantryItem>> {
        Ok(self
            .items
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// In-memory preference store for tests and demo deployments
#[derive(Default)]
pub struct InMemoryPreferenceStore {
    preferences: RwLock<HashMap<String, UserPreferences>>,
}

impl InMemoryPreferenceStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a user's stored preferences
    pub async fn set_preferences(&self, user_id: impl Into<String>, prefs: UserPreferences) {
        self.preferences.write().await.insert(user_id.into(), prefs);
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn get_preferences(&self, user_id: &str) -> AppResult<UserPreferences> {
        Ok(self
            .preferences
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}
