// ABOUTME: Streaming wire protocol for live recipe generation over WebSocket
// ABOUTME: Tagged message envelope shared by inbound commands and outbound events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! # Streaming Protocol
//!
//! Messages are JSON text frames with the envelope
//! `{"type": <tag>, "payload": <tag-specific JSON>}`. For one `generate`
//! command the session emits exactly one `recipe_start`, then one
//! `recipe_progress` per surviving recipe with 1-based ascending indices,
//! then exactly one `recipe_complete`. An `error` short-circuits the
//! sequence; no further progress messages follow until the next `generate`.

pub mod registry;
pub mod routes;
pub mod session;

pub use registry::SessionRegistry;
pub use routes::StreamState;
pub use session::{SessionContext, StreamingSession};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agents::OrchestratorMode;
use crate::errors::AppError;
use crate::models::Recipe;

/// One streaming protocol message, inbound or outbound
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum StreamMessage {
    /// Server -> client connection confirmation
    Connect { session_id: Uuid, status: String },
    /// Client -> server generation command
    Generate {
        user_id: String,
        #[serde(default)]
        mode: OrchestratorMode,
        #[serde(default)]
        recipe_count: u32,
    },
    /// Generation has started; `total_recipes` is the requested count
    RecipeStart {
        total_recipes: u32,
        mode: OrchestratorMode,
    },
    /// One generated recipe; indices are 1-based and strictly ascending
    RecipeProgress {
        recipe_index: usize,
        total_count: usize,
        recipe: Recipe,
    },
    /// Generation finished; carries the full surviving recipe list
    RecipeComplete {
        total_generated: usize,
        filtered_count: usize,
        recipes: Vec<Recipe>,
    },
    /// Error event; the session remains usable afterwards
    Error { code: String, message: String },
    /// Client keep-alive probe
    Ping,
    /// Immediate reply to `Ping`, independent of generation state
    Pong,
}

impl StreamMessage {
    /// Build an error message with an explicit wire code
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Build an error message from an application error
    #[must_use]
    pub fn from_app_error(err: &AppError) -> Self {
        Self::Error {
            code: err.code.wire_code().to_owned(),
            message: err.message.clone(),
        }
    }
}
