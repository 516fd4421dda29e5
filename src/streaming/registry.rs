// ABOUTME: Connection registry tracking live streaming sessions by id
// ABOUTME: Single-writer discipline over the only mutable shared state in the core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! # Session Registry
//!
//! Maps session ids to their outbound senders. This is the only mutable
//! state shared across sessions; all mutation goes through the registry's
//! own methods behind one lock, and no session touches another session's
//! entry.

use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};
use tracing::info;
use uuid::Uuid;

use super::StreamMessage;

/// Handle to a registered session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    /// Sender side of the session's bounded outbound queue
    pub outbound: mpsc::Sender<StreamMessage>,
}

/// Registry of active streaming sessions
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl SessionRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session on connect
    pub async fn register(&self, id: Uuid, handle: SessionHandle) {
        self.sessions.write().await.insert(id, handle);
        info!(session_id = %id, "streaming session connected");
    }

    /// Unregister a session on teardown, releasing its outbound queue
    pub async fn unregister(&self, id: Uuid) {
        if self.sessions.write().await.remove(&id).is_some() {
            info!(session_id = %id, "streaming session disconnected");
        }
    }

    /// Number of currently registered sessions
    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
