// ABOUTME: Google Gemini text-generation backend via the Generative Language API
// ABOUTME: JSON-mode completion requests with rate-limit aware error mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! # Gemini Provider
//!
//! Implementation of the [`TextGenerator`] trait for Google's Gemini models.
//!
//! ## Configuration
//!
//! Set the `GEMINI_API_KEY` environment variable with an API key from
//! Google AI Studio. The model defaults to `gemini-1.5-flash` and can be
//! overridden with [`GeminiProvider::with_model`].
//!
//! Requests ask for a JSON response MIME type so that recipe payloads come
//! back as parseable JSON rather than prose.

use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::TextGenerator;
use crate::errors::{AppError, ErrorCode};

/// Environment variable for the Gemini API key
const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default model to use
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Base URL for the Gemini API
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<ContentPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ContentPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Google Gemini text-generation backend
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    model: String,
    temperature: f32,
}

impl GeminiProvider {
    /// Create a new Gemini provider with an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            model: DEFAULT_MODEL.to_owned(),
            temperature: 0.7,
        }
    }

    /// Create a provider from the `GEMINI_API_KEY` environment variable
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = env::var(GEMINI_API_KEY_ENV).map_err(|_| {
            AppError::config(format!("{GEMINI_API_KEY_ENV} environment variable not set"))
        })?;
        Ok(Self::new(api_key))
    }

    /// Set a custom model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Build the API URL for the configured model
    fn build_url(&self) -> String {
        format!(
            "{API_BASE_URL}/models/{}:generateContent?key={}",
            self.model, self.api_key
        )
    }

    /// Extract the first candidate's text from a Gemini response
    fn extract_content(response: &GeminiResponse) -> Result<String, AppError> {
        let part = response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .ok_or_else(|| AppError::invalid_response("no content in Gemini response"))?;

        Ok(part.text.clone())
    }

    /// Map API error status to an appropriate error type.
    ///
    /// Rate limit (429) responses expose the actual message from Gemini so
    /// callers can relay quota information.
    fn map_api_error(status: u16, response_text: &str) -> AppError {
        let message = serde_json::from_str::<GeminiResponse>(response_text)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| response_text.to_owned(), |e| e.message);

        match status {
            429 => AppError::new(ErrorCode::ExternalRateLimited, message),
            _ => AppError::external_service("gemini", format!("API error ({status}): {message}")),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_owned()),
                parts: vec![ContentPart {
                    text: prompt.to_owned(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(self.temperature),
                top_k: 40,
                top_p: 0.95,
                response_mime_type: "application/json",
            }),
        };

        debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Sending generation request to Gemini API"
        );

        let response = self
            .client
            .post(self.build_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::external_service("gemini", format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| AppError::external_service("gemini", format!("failed to read response: {e}")))?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status.as_u16(), &response_text));
        }

        let gemini_response: GeminiResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                error!(error = %e, "Failed to parse Gemini response envelope");
                AppError::invalid_response(format!("failed to parse Gemini response: {e}"))
            })?;

        if let Some(api_error) = gemini_response.error {
            return Err(AppError::external_service("gemini", api_error.message));
        }

        Self::extract_content(&gemini_response)
    }
}
