// ABOUTME: Per-connection streaming session actor running the generate-stream protocol
// ABOUTME: Serializes generations per session while answering pings immediately
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! # Streaming Session
//!
//! One actor per live connection. The session accepts inbound protocol
//! messages, dispatches generation work asynchronously, and emits events
//! through a bounded outbound queue. Sends never block: when the queue is
//! full the message is dropped (drop-newest) rather than stalling the actor.
//!
//! Overlapping `generate` commands are serialized: a second command received
//! mid-generation is queued and starts only after the current generation
//! completes. Pings are answered immediately regardless of generation state.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::registry::SessionHandle;
use super::StreamMessage;
use crate::agents::{GenerateRequest, Orchestrator, OrchestratorMode, RecipeRequest};
use crate::config::StreamingConfig;
use crate::errors::AppError;
use crate::stores::{PantryStore, PreferenceStore};

/// Shared dependencies for every streaming session
pub struct SessionContext {
    pub orchestrator: Arc<Orchestrator>,
    pub pantry: Arc<dyn PantryStore>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub streaming: StreamingConfig,
    /// Wall-clock budget for one generation dispatched from this session
    pub generation_timeout: Duration,
}

/// Non-blocking sender over a session's bounded outbound queue
#[derive(Clone)]
pub struct SessionSender {
    session_id: Uuid,
    tx: mpsc::Sender<StreamMessage>,
}

impl SessionSender {
    /// Queue a message for delivery.
    ///
    /// Drops the message when the queue is full; the actor never stalls on
    /// a slow client.
    pub fn send(&self, message: StreamMessage) {
        match self.tx.try_send(message) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(
                    session_id = %self.session_id,
                    "outbound queue full, dropping message"
                );
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(
                    session_id = %self.session_id,
                    "outbound queue closed, dropping message"
                );
            }
        }
    }

    /// Raw sender for registry handles
    #[must_use]
    pub fn raw(&self) -> mpsc::Sender<StreamMessage> {
        self.tx.clone()
    }
}

/// One live connection's actor
pub struct StreamingSession {
    id: Uuid,
    ctx: Arc<SessionContext>,
    sender: SessionSender,
}

/// A queued generation command
struct GenerateCommand {
    user_id: String,
    mode: OrchestratorMode,
    recipe_count: u32,
}

impl StreamingSession {
    /// Create a session and its outbound queue receiver.
    ///
    /// The receiver side belongs to the connection's write pump.
    #[must_use]
    pub fn new(ctx: Arc<SessionContext>) -> (Self, mpsc::Receiver<StreamMessage>) {
        let (tx, rx) = mpsc::channel(ctx.streaming.outbound_queue_size);
        let id = Uuid::new_v4();
        let session = Self {
            id,
            sender: SessionSender { session_id: id, tx },
            ctx,
        };
        (session, rx)
    }

    /// Unique session id assigned at connect time
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Sender handle for the read pump and registry
    #[must_use]
    pub fn sender(&self) -> SessionSender {
        self.sender.clone()
    }

    /// Registry handle for this session
    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            outbound: self.sender.raw(),
        }
    }

    /// Run the session actor until the inbound side closes.
    ///
    /// Emits the `connect` confirmation, then services inbound messages.
    /// At most one generation runs at a time; further `generate` commands
    /// queue behind it. Pings are answered from this loop and are therefore
    /// never blocked by a generation in flight.
    pub async fn run(self, mut inbound: mpsc::Receiver<StreamMessage>) {
        self.sender.send(StreamMessage::Connect {
            session_id: self.id,
            status: "connected".to_owned(),
        });

        let mut active: Option<JoinHandle<()>> = None;
        let mut pending: VecDeque<GenerateCommand> = VecDeque::new();

        loop {
            tokio::select! {
                msg = inbound.recv() => {
                    let Some(msg) = msg else { break };
                    match msg {
                        StreamMessage::Ping => self.sender.send(StreamMessage::Pong),
                        StreamMessage::Generate { user_id, mode, recipe_count } => {
                            if user_id.trim().is_empty() {
                                self.sender
                                    .send(StreamMessage::from_app_error(&AppError::invalid_user_id()));
                                continue;
                            }
                            let command = GenerateCommand { user_id, mode, recipe_count };
                            if active.is_some() {
                                debug!(
                                    session_id = %self.id,
                                    queued = pending.len() + 1,
                                    "generation in flight, queueing generate command"
                                );
                                pending.push_back(command);
                            } else {
                                active = Some(self.spawn_generation(command));
                            }
                        }
                        other => {
                            debug!(session_id = %self.id, message = ?other, "unexpected inbound message");
                            self.sender.send(StreamMessage::error(
                                "unknown_type",
                                "unknown message type",
                            ));
                        }
                    }
                }
                () = async {
                    match active.as_mut() {
                        Some(handle) => { let _ = handle.await; }
                        None => std::future::pending().await,
                    }
                } => {
                    active = pending.pop_front().map(|command| self.spawn_generation(command));
                }
            }
        }

        // Connection gone; a generation still in flight has nowhere to
        // deliver, so stop it.
        if let Some(handle) = active {
            handle.abort();
        }

        info!(session_id = %self.id, "streaming session closed");
    }

    /// Dispatch one generation as its own task
    fn spawn_generation(&self, command: GenerateCommand) -> JoinHandle<()> {
        let ctx = Arc::clone(&self.ctx);
        let sender = self.sender.clone();
        let session_id = self.id;
        tokio::spawn(async move {
            run_generation(session_id, &ctx, &sender, command).await;
        })
    }
}

/// Execute one generation command and stream its results.
///
/// Emits `recipe_start` / `recipe_progress` / `recipe_complete` only when the
/// orchestrator succeeds; any failure surfaces as a single `error` message
/// with no partial progress.
async fn run_generation(
    session_id: Uuid,
    ctx: &SessionContext,
    sender: &SessionSender,
    command: GenerateCommand,
) {
    let GenerateCommand {
        user_id,
        mode,
        recipe_count,
    } = command;

    let pantry_items = match ctx.pantry.list_items(&user_id).await {
        Ok(items) => items,
        Err(e) => {
            warn!(session_id = %session_id, error = %e, "failed to load pantry");
            sender.send(StreamMessage::error(
                "pantry_error",
                "failed to get pantry items",
            ));
            return;
        }
    };

    if pantry_items.is_empty() {
        sender.send(StreamMessage::from_app_error(&AppError::empty_pantry()));
        return;
    }

    let preferences = match ctx.preferences.get_preferences(&user_id).await {
        Ok(prefs) => prefs,
        Err(e) => {
            warn!(session_id = %session_id, error = %e, "failed to load preferences");
            sender.send(StreamMessage::error(
                "preference_error",
                "failed to get user preferences",
            ));
            return;
        }
    };

    let recipe_count = ctx.orchestrator.clamp_recipe_count(recipe_count);

    info!(
        session_id = %session_id,
        user_id = %user_id,
        mode = %mode,
        recipe_count,
        "session dispatching generation"
    );

    let request = GenerateRequest {
        request: RecipeRequest {
            pantry_items,
            preferences,
            recipe_count,
            user_prompt: None,
        },
        mode,
    };

    let outcome = timeout(ctx.generation_timeout, ctx.orchestrator.generate(request)).await;

    let result = match outcome {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            sender.send(StreamMessage::error("generation_error", e.to_string()));
            return;
        }
        Err(_) => {
            sender.send(StreamMessage::error(
                "generation_error",
                format!(
                    "generation exceeded the {}s budget",
                    ctx.generation_timeout.as_secs()
                ),
            ));
            return;
        }
    };

    sender.send(StreamMessage::RecipeStart {
        total_recipes: recipe_count,
        mode,
    });

    let total = result.all_recipes.len();
    let pacing = Duration::from_millis(ctx.streaming.pacing_delay_ms);
    for (index, recipe) in result.all_recipes.iter().enumerate() {
        sender.send(StreamMessage::RecipeProgress {
            recipe_index: index + 1,
            total_count: total,
            recipe: recipe.clone(),
        });
        // Pacing is a UX affordance, not a correctness requirement.
        if !pacing.is_zero() {
            sleep(pacing).await;
        }
    }

    sender.send(StreamMessage::RecipeComplete {
        total_generated: result.total_count,
        filtered_count: result.filtered_count,
        recipes: result.all_recipes,
    });
}
