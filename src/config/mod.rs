// ABOUTME: Configuration module exposing environment-based server configuration
// ABOUTME: All runtime settings are threaded explicitly into constructors, no globals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! Configuration management.
//!
//! All configuration is sourced from the environment at startup and passed
//! explicitly into the components that need it. The generation core holds no
//! ambient global state.

pub mod environment;

pub use environment::{
    GenerationLimits, LlmConfig, ServerConfig, StreamingConfig,
};
