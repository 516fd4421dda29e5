// ABOUTME: Main library entry point for the Souschef recipe generation platform
// ABOUTME: Wires agents, orchestration, streaming, and the HTTP surface together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

#![deny(unsafe_code)]

//! # Souschef
//!
//! A pantry-aware recipe generation server. Souschef recommends recipes
//! from a user's pantry inventory under hard safety constraints (allergens)
//! and soft preference constraints (diet, skill, cuisine), using multiple
//! independent generation agents that may run concurrently, and can stream
//! results incrementally to a live client instead of only returning a
//! single batched response.
//!
//! ## Architecture
//!
//! - **Agents** ([`agents`]): four fixed strategies (pantry-only, flexible,
//!   profile, expiry-prioritized) behind one contract, each shaping
//!   constraints differently over the text-generation collaborator
//! - **Orchestrator** ([`agents::orchestrator`]): selects, runs, merges, and
//!   classifies strategy output for one request, fanning out concurrently
//!   when both pantry strategies are requested
//! - **Allergen filter** ([`agents::filter`]): non-bypassable post-processing
//!   gate expanding allergens to derivative ingredient terms
//! - **Streaming** ([`streaming`]): per-connection session actors streaming
//!   progressively generated recipes over WebSocket
//! - **LLM** ([`llm`]): pluggable text-generation backends (Gemini)
//!
//! Pantry data, preferences, and persistence live behind trait seams
//! ([`stores`]); the generation core never owns them.

pub mod agents;
pub mod config;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod models;
pub mod routes;
pub mod stores;
pub mod streaming;
