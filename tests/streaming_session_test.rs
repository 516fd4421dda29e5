// ABOUTME: Integration tests for the streaming session actor and its protocol
// ABOUTME: Validates message ordering, ping independence, and per-session serialization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use souschef::agents::{Orchestrator, OrchestratorMode};
use souschef::config::{GenerationLimits, StreamingConfig};
use souschef::models::{PantryItem, UserPreferences};
use souschef::stores::{InMemoryPantryStore, InMemoryPreferenceStore, PantryStore, PreferenceStore};
use souschef::streaming::{SessionContext, StreamMessage, StreamingSession};

use common::{
    preferences_with_allergens, recipe_json, recipes_payload, sample_pantry, StubModel,
};

const USER: &str = "user-1";

struct Harness {
    inbound: mpsc::Sender<StreamMessage>,
    outbound: mpsc::Receiver<StreamMessage>,
}

async fn spawn_session(model: Arc<StubModel>, items: Vec<PantryItem>) -> Harness {
    spawn_session_with(model, items, preferences_with_allergens(&[]), 64).await
}

async fn spawn_session_with(
    model: Arc<StubModel>,
    items: Vec<PantryItem>,
    prefs: UserPreferences,
    outbound_queue_size: usize,
) -> Harness {
    let pantry = Arc::new(InMemoryPantryStore::new());
    pantry.set_items(USER, items).await;
    let preferences = Arc::new(InMemoryPreferenceStore::new());
    preferences.set_preferences(USER, prefs).await;

    let ctx = Arc::new(SessionContext {
        orchestrator: Arc::new(Orchestrator::new(model, GenerationLimits::default())),
        pantry: pantry as Arc<dyn PantryStore>,
        preferences: preferences as Arc<dyn PreferenceStore>,
        streaming: StreamingConfig {
            pacing_delay_ms: 0,
            outbound_queue_size,
            ..StreamingConfig::default()
        },
        generation_timeout: Duration::from_secs(5),
    });

    let (session, outbound) = StreamingSession::new(ctx);
    let (inbound_tx, inbound_rx) = mpsc::channel(16);
    tokio::spawn(session.run(inbound_rx));

    Harness {
        inbound: inbound_tx,
        outbound,
    }
}

async fn next_msg(harness: &mut Harness) -> StreamMessage {
    timeout(Duration::from_secs(2), harness.outbound.recv())
        .await
        .expect("timed out waiting for message")
        .expect("outbound channel closed")
}

fn generate(user_id: &str, count: u32) -> StreamMessage {
    StreamMessage::Generate {
        user_id: user_id.to_owned(),
        mode: OrchestratorMode::PantryOnly,
        recipe_count: count,
    }
}

async fn expect_connect(harness: &mut Harness) {
    match next_msg(harness).await {
        StreamMessage::Connect { status, .. } => assert_eq!(status, "connected"),
        other => panic!("expected connect, got {other:?}"),
    }
}

fn two_recipe_payload() -> String {
    recipes_payload(&[
        recipe_json("First Dish", &["rice"]),
        recipe_json("Second Dish", &["broccoli"]),
    ])
}

#[tokio::test]
async fn test_connect_confirmation_is_first_message() {
    let model = Arc::new(StubModel::answering(two_recipe_payload()));
    let mut harness = spawn_session(model, sample_pantry()).await;
    expect_connect(&mut harness).await;
}

#[tokio::test]
async fn test_generate_streams_ordered_messages() {
    let model = Arc::new(StubModel::answering(two_recipe_payload()));
    let mut harness = spawn_session(model, sample_pantry()).await;
    expect_connect(&mut harness).await;

    harness.inbound.send(generate(USER, 2)).await.unwrap();

    match next_msg(&mut harness).await {
        StreamMessage::RecipeStart {
            total_recipes,
            mode,
        } => {
            assert_eq!(total_recipes, 2);
            assert_eq!(mode, OrchestratorMode::PantryOnly);
        }
        other => panic!("expected recipe_start, got {other:?}"),
    }

    for expected_index in 1..=2 {
        match next_msg(&mut harness).await {
            StreamMessage::RecipeProgress {
                recipe_index,
                total_count,
                ..
            } => {
                assert_eq!(recipe_index, expected_index);
                assert_eq!(total_count, 2);
            }
            other => panic!("expected recipe_progress, got {other:?}"),
        }
    }

    match next_msg(&mut harness).await {
        StreamMessage::RecipeComplete {
            total_generated,
            filtered_count,
            recipes,
        } => {
            assert_eq!(total_generated, 2);
            assert_eq!(filtered_count, 0);
            assert_eq!(recipes.len(), 2);
        }
        other => panic!("expected recipe_complete, got {other:?}"),
    }
}

#[tokio::test]
async fn test_ping_yields_immediate_pong() {
    let model = Arc::new(StubModel::answering(two_recipe_payload()));
    let mut harness = spawn_session(model, sample_pantry()).await;
    expect_connect(&mut harness).await;

    harness.inbound.send(StreamMessage::Ping).await.unwrap();
    assert!(matches!(next_msg(&mut harness).await, StreamMessage::Pong));
}

#[tokio::test]
async fn test_ping_answered_while_generating() {
    let model = Arc::new(
        StubModel::answering(two_recipe_payload()).with_delay(Duration::from_millis(300)),
    );
    let mut harness = spawn_session(model, sample_pantry()).await;
    expect_connect(&mut harness).await;

    harness.inbound.send(generate(USER, 2)).await.unwrap();
    harness.inbound.send(StreamMessage::Ping).await.unwrap();

    // The pong must arrive before any generation output because the model
    // is still sleeping.
    assert!(matches!(next_msg(&mut harness).await, StreamMessage::Pong));
    assert!(matches!(
        next_msg(&mut harness).await,
        StreamMessage::RecipeStart { .. }
    ));
}

#[tokio::test]
async fn test_empty_user_id_is_rejected_in_place() {
    let model = Arc::new(StubModel::answering(two_recipe_payload()));
    let mut harness = spawn_session(Arc::clone(&model), sample_pantry()).await;
    expect_connect(&mut harness).await;

    harness.inbound.send(generate("  ", 2)).await.unwrap();

    match next_msg(&mut harness).await {
        StreamMessage::Error { code, .. } => assert_eq!(code, "invalid_user_id"),
        other => panic!("expected error, got {other:?}"),
    }
    assert_eq!(model.calls(), 0);

    // The session stays usable afterwards.
    harness.inbound.send(generate(USER, 1)).await.unwrap();
    assert!(matches!(
        next_msg(&mut harness).await,
        StreamMessage::RecipeStart { .. }
    ));
}

#[tokio::test]
async fn test_empty_pantry_error_without_invoking_orchestrator() {
    let model = Arc::new(StubModel::answering(two_recipe_payload()));
    let mut harness = spawn_session(Arc::clone(&model), Vec::new()).await;
    expect_connect(&mut harness).await;

    harness.inbound.send(generate(USER, 2)).await.unwrap();

    match next_msg(&mut harness).await {
        StreamMessage::Error { code, .. } => assert_eq!(code, "empty_pantry"),
        other => panic!("expected error, got {other:?}"),
    }
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_generation_failure_emits_error_without_partial_progress() {
    let model = Arc::new(StubModel::failing("model offline"));
    let mut harness = spawn_session(model, sample_pantry()).await;
    expect_connect(&mut harness).await;

    harness.inbound.send(generate(USER, 2)).await.unwrap();

    match next_msg(&mut harness).await {
        StreamMessage::Error { code, message } => {
            assert_eq!(code, "generation_error");
            assert!(message.contains("model offline"));
        }
        other => panic!("expected error, got {other:?}"),
    }

    // No recipe_start or progress preceded or follows the error.
    harness.inbound.send(StreamMessage::Ping).await.unwrap();
    assert!(matches!(next_msg(&mut harness).await, StreamMessage::Pong));
}

#[tokio::test]
async fn test_all_filtered_surfaces_as_generation_error() {
    let model = Arc::new(StubModel::answering(recipes_payload(&[recipe_json(
        "Peanut Satay",
        &["peanut sauce"],
    )])));
    let mut harness = spawn_session_with(
        model,
        sample_pantry(),
        preferences_with_allergens(&["peanuts"]),
        64,
    )
    .await;
    expect_connect(&mut harness).await;

    harness.inbound.send(generate(USER, 1)).await.unwrap();

    match next_msg(&mut harness).await {
        StreamMessage::Error { code, message } => {
            assert_eq!(code, "generation_error");
            assert!(message.contains("filtered"));
        }
        other => panic!("expected error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_overlapping_generates_are_serialized() {
    let model = Arc::new(
        StubModel::answering(two_recipe_payload()).with_delay(Duration::from_millis(100)),
    );
    let mut harness = spawn_session(model, sample_pantry()).await;
    expect_connect(&mut harness).await;

    harness.inbound.send(generate(USER, 2)).await.unwrap();
    harness.inbound.send(generate(USER, 2)).await.unwrap();

    // Two complete, non-interleaved sequences.
    for _ in 0..2 {
        assert!(matches!(
            next_msg(&mut harness).await,
            StreamMessage::RecipeStart { .. }
        ));
        assert!(matches!(
            next_msg(&mut harness).await,
            StreamMessage::RecipeProgress { recipe_index: 1, .. }
        ));
        assert!(matches!(
            next_msg(&mut harness).await,
            StreamMessage::RecipeProgress { recipe_index: 2, .. }
        ));
        assert!(matches!(
            next_msg(&mut harness).await,
            StreamMessage::RecipeComplete { .. }
        ));
    }
}

#[tokio::test]
async fn test_unexpected_inbound_type_reports_unknown() {
    let model = Arc::new(StubModel::answering(two_recipe_payload()));
    let mut harness = spawn_session(model, sample_pantry()).await;
    expect_connect(&mut harness).await;

    harness
        .inbound
        .send(StreamMessage::RecipeComplete {
            total_generated: 0,
            filtered_count: 0,
            recipes: vec![],
        })
        .await
        .unwrap();

    match next_msg(&mut harness).await {
        StreamMessage::Error { code, .. } => assert_eq!(code, "unknown_type"),
        other => panic!("expected error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_full_outbound_queue_drops_newest() {
    let model = Arc::new(StubModel::answering(two_recipe_payload()));
    // Queue of 2: connect occupies one slot, one pong fits, the rest drop.
    let mut harness = spawn_session_with(
        model,
        sample_pantry(),
        preferences_with_allergens(&[]),
        2,
    )
    .await;

    for _ in 0..5 {
        harness.inbound.send(StreamMessage::Ping).await.unwrap();
    }
    // Give the session a moment to process all pings without draining.
    tokio::time::sleep(Duration::from_millis(100)).await;

    expect_connect(&mut harness).await;
    assert!(matches!(next_msg(&mut harness).await, StreamMessage::Pong));

    // Everything beyond the queue capacity was dropped, not delivered late.
    let extra = timeout(Duration::from_millis(100), harness.outbound.recv()).await;
    assert!(extra.is_err(), "expected no further messages, got {extra:?}");
}
