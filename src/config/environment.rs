// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! Environment-based configuration management for production deployment

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Complete server configuration loaded from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP port for the combined REST + WebSocket surface
    pub http_port: u16,
    /// Allowed CORS origins (`*` for any)
    pub cors_origins: Vec<String>,
    /// Text-generation collaborator settings
    pub llm: LlmConfig,
    /// Generation pipeline limits and timeouts
    pub generation: GenerationLimits,
    /// Streaming session tuning
    pub streaming: StreamingConfig,
}

/// Text-generation collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name passed to the Gemini API
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
}

/// Limits and timeouts for the generation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationLimits {
    /// Default recipe count when the request leaves it unset
    pub default_recipe_count: u32,
    /// Upper clamp for requested recipe counts
    pub max_recipe_count: u32,
    /// Additional non-pantry ingredients the flexible agent may introduce
    pub max_missing_items: u32,
    /// Wall-clock budget for one-shot batch generation
    pub batch_timeout_secs: u64,
    /// Wall-clock budget for generation dispatched from a streaming session
    pub stream_timeout_secs: u64,
}

/// Streaming session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingConfig {
    /// Delay between successive `recipe_progress` messages (milliseconds).
    /// A UX affordance, not a correctness requirement; set to 0 in tests.
    pub pacing_delay_ms: u64,
    /// Interval between keep-alive pings from the writer task
    pub heartbeat_secs: u64,
    /// Session teardown threshold for an idle inbound side
    pub read_timeout_secs: u64,
    /// Bounded outbound queue depth; overflow drops the newest message
    pub outbound_queue_size: usize,
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self {
            default_recipe_count: 2,
            max_recipe_count: 3,
            max_missing_items: 3,
            batch_timeout_secs: 60,
            stream_timeout_secs: 90,
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            pacing_delay_ms: 100,
            heartbeat_secs: 30,
            read_timeout_secs: 60,
            outbound_queue_size: 64,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".into(),
            temperature: 0.7,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Every setting has a production-sensible default; only values that are
    /// present and unparseable produce an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a provided environment variable fails to parse.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            http_port: env_var_or("HTTP_PORT", "8081")?
                .parse()
                .context("Invalid HTTP_PORT")?,
            cors_origins: parse_origins(&env_var_or("CORS_ORIGINS", "*")?),
            llm: LlmConfig {
                model: env_var_or("GEMINI_MODEL", "gemini-1.5-flash")?,
                temperature: env_var_or("GEMINI_TEMPERATURE", "0.7")?
                    .parse()
                    .context("Invalid GEMINI_TEMPERATURE")?,
            },
            generation: GenerationLimits {
                default_recipe_count: env_var_or("DEFAULT_RECIPE_COUNT", "2")?
                    .parse()
                    .context("Invalid DEFAULT_RECIPE_COUNT")?,
                max_recipe_count: env_var_or("MAX_RECIPE_COUNT", "3")?
                    .parse()
                    .context("Invalid MAX_RECIPE_COUNT")?,
                max_missing_items: env_var_or("MAX_MISSING_ITEMS", "3")?
                    .parse()
                    .context("Invalid MAX_MISSING_ITEMS")?,
                batch_timeout_secs: env_var_or("BATCH_TIMEOUT_SECS", "60")?
                    .parse()
                    .context("Invalid BATCH_TIMEOUT_SECS")?,
                stream_timeout_secs: env_var_or("STREAM_TIMEOUT_SECS", "90")?
                    .parse()
                    .context("Invalid STREAM_TIMEOUT_SECS")?,
            },
            streaming: StreamingConfig {
                pacing_delay_ms: env_var_or("STREAM_PACING_DELAY_MS", "100")?
                    .parse()
                    .context("Invalid STREAM_PACING_DELAY_MS")?,
                heartbeat_secs: env_var_or("STREAM_HEARTBEAT_SECS", "30")?
                    .parse()
                    .context("Invalid STREAM_HEARTBEAT_SECS")?,
                read_timeout_secs: env_var_or("STREAM_READ_TIMEOUT_SECS", "60")?
                    .parse()
                    .context("Invalid STREAM_READ_TIMEOUT_SECS")?,
                outbound_queue_size: env_var_or("STREAM_OUTBOUND_QUEUE_SIZE", "64")?
                    .parse()
                    .context("Invalid STREAM_OUTBOUND_QUEUE_SIZE")?,
            },
        })
    }

    /// One-line startup summary for the server log
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} model={} batch_timeout={}s stream_timeout={}s pacing={}ms",
            self.http_port,
            self.llm.model,
            self.generation.batch_timeout_secs,
            self.generation.stream_timeout_secs,
            self.streaming.pacing_delay_ms,
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8081,
            cors_origins: vec!["*".into()],
            llm: LlmConfig::default(),
            generation: GenerationLimits::default(),
            streaming: StreamingConfig::default(),
        }
    }
}

/// Read an environment variable with a fallback default
fn env_var_or(key: &str, default: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) => Ok(value),
        Err(env::VarError::NotPresent) => Ok(default.to_owned()),
        Err(e) => Err(e).context(format!("Failed to read {key}")),
    }
}

/// Split a comma-separated origin list
fn parse_origins(origins_str: &str) -> Vec<String> {
    origins_str
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
