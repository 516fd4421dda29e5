// ABOUTME: Unified error handling for the Souschef recipe generation server
// ABOUTME: Defines error codes, HTTP status mapping, and structured error responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! # Unified Error Handling System
//!
//! Centralized error handling for the server. Defines standard error types,
//! error codes, and HTTP response formatting so that every module and API
//! surface reports failures the same way.
//!
//! The generation pipeline distinguishes two zero-result outcomes that look
//! identical from a recipe count but call for different remediation:
//! [`ErrorCode::NoRecipesGenerated`] (retry generation) and
//! [`ErrorCode::AllRecipesFiltered`] (relax the allergen list or accept no
//! results). The latter carries the partial generation result in the error
//! details so clients can display the filtered count.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Request validation (1000-1999)
    #[serde(rename = "INVALID_REQUEST")]
    InvalidRequest = 1000,
    #[serde(rename = "EMPTY_PANTRY")]
    EmptyPantry = 1001,
    #[serde(rename = "INVALID_USER_ID")]
    InvalidUserId = 1002,

    // Generation outcomes (2000-2999)
    #[serde(rename = "NO_RECIPES_GENERATED")]
    NoRecipesGenerated = 2000,
    #[serde(rename = "ALL_RECIPES_FILTERED")]
    AllRecipesFiltered = 2001,
    #[serde(rename = "STRATEGY_FAILURE")]
    StrategyFailure = 2002,
    #[serde(rename = "GENERATION_TIMEOUT")]
    GenerationTimeout = 2003,

    // External services (5000-5999)
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited = 5001,
    #[serde(rename = "INVALID_RESPONSE")]
    InvalidResponse = 5002,

    // Configuration (6000-6999)
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal errors (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9001,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidRequest | Self::EmptyPantry | Self::InvalidUserId => 400,

            // 422 Unprocessable Entity - the request was well formed but
            // generation produced nothing usable
            Self::NoRecipesGenerated | Self::AllRecipesFiltered => 422,

            // 502 Bad Gateway
            Self::StrategyFailure | Self::ExternalServiceError | Self::InvalidResponse => 502,

            // 503 Service Unavailable
            Self::ExternalRateLimited => 503,

            // 504 Gateway Timeout
            Self::GenerationTimeout => 504,

            // 500 Internal Server Error
            Self::ConfigError | Self::InternalError | Self::SerializationError => 500,
        }
    }

    /// Short wire identifier used in streaming error payloads
    #[must_use]
    pub const fn wire_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::EmptyPantry => "empty_pantry",
            Self::InvalidUserId => "invalid_user_id",
            Self::NoRecipesGenerated => "no_recipes_generated",
            Self::AllRecipesFiltered => "all_recipes_filtered",
            Self::StrategyFailure => "strategy_failure",
            Self::GenerationTimeout => "generation_timeout",
            Self::ExternalServiceError => "external_service_error",
            Self::ExternalRateLimited => "external_rate_limited",
            Self::InvalidResponse => "invalid_response",
            Self::ConfigError => "config_error",
            Self::InternalError => "internal_error",
            Self::SerializationError => "serialization_error",
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "The provided generation request is invalid",
            Self::EmptyPantry => "The pantry is empty - add some items first",
            Self::InvalidUserId => "A valid user identifier is required",
            Self::NoRecipesGenerated => "No recipes could be generated",
            Self::AllRecipesFiltered => "All generated recipes were removed by the allergen filter",
            Self::StrategyFailure => "Every requested generation strategy failed",
            Self::GenerationTimeout => "Recipe generation did not complete in time",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalRateLimited => "External service rate limit exceeded",
            Self::InvalidResponse => "The generation service returned unparseable output",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal server error occurred",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// User ID if available
    pub user_id: Option<String>,
    /// Streaming session ID if the error surfaced in a session
    pub session_id: Option<uuid::Uuid>,
    /// Additional key-value context
    pub details: serde_json::Value,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            user_id: None,
            session_id: None,
            details: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a user ID to the error context
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.context.user_id = Some(user_id.into());
        self
    }

    /// Add a session ID to the error context
    #[must_use]
    pub const fn with_session_id(mut self, session_id: uuid::Uuid) -> Self {
        self.context.session_id = Some(session_id);
        self
    }

    /// Add details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorResponseDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                details: error.context.details,
            },
        }
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// Invalid generation request
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Empty pantry rejection
    #[must_use]
    pub fn empty_pantry() -> Self {
        Self::new(
            ErrorCode::EmptyPantry,
            "pantry is empty - add some items first",
        )
    }

    /// Missing or blank user identifier
    #[must_use]
    pub fn invalid_user_id() -> Self {
        Self::new(ErrorCode::InvalidUserId, "missing user ID")
    }

    /// Zero recipes produced without any being filtered
    #[must_use]
    pub fn no_recipes_generated() -> Self {
        Self::new(
            ErrorCode::NoRecipesGenerated,
            "no recipes could be generated",
        )
    }

    /// Every generated recipe was removed by the allergen filter.
    ///
    /// The partial result is attached to the error details so callers can
    /// still display the filtered count.
    #[must_use]
    pub fn all_recipes_filtered(result_details: serde_json::Value) -> Self {
        Self::new(
            ErrorCode::AllRecipesFiltered,
            "all recipes were filtered due to allergens",
        )
        .with_details(result_details)
    }

    /// All requested strategies failed
    pub fn strategy_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StrategyFailure, message)
    }

    /// Generation exceeded its wall-clock budget
    #[must_use]
    pub fn generation_timeout(budget_secs: u64) -> Self {
        Self::new(
            ErrorCode::GenerationTimeout,
            format!("generation exceeded the {budget_secs}s budget"),
        )
    }

    /// Collaborator returned unparseable output
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidResponse, message)
    }

    /// External service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

/// Conversion from anyhow::Error to `AppError`
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        match error.source() {
            Some(source) => Self::new(ErrorCode::InternalError, error.to_string()).with_details(
                serde_json::json!({
                    "source": source.to_string()
                }),
            ),
            None => Self::new(ErrorCode::InternalError, error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::InvalidRequest.http_status(), 400);
        assert_eq!(ErrorCode::EmptyPantry.http_status(), 400);
        assert_eq!(ErrorCode::AllRecipesFiltered.http_status(), 422);
        assert_eq!(ErrorCode::NoRecipesGenerated.http_status(), 422);
        assert_eq!(ErrorCode::StrategyFailure.http_status(), 502);
        assert_eq!(ErrorCode::GenerationTimeout.http_status(), 504);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_app_error_creation() {
        let error = AppError::empty_pantry().with_user_id("user-123");

        assert_eq!(error.code, ErrorCode::EmptyPantry);
        assert_eq!(error.context.user_id.as_deref(), Some("user-123"));
    }

    #[test]
    fn test_all_recipes_filtered_carries_details() {
        let error = AppError::all_recipes_filtered(serde_json::json!({"filtered_count": 3}));
        let response = ErrorResponse::from(error);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("ALL_RECIPES_FILTERED"));
        assert!(json.contains("filtered_count"));
    }

    #[test]
    fn test_wire_codes_are_snake_case() {
        assert_eq!(ErrorCode::InvalidUserId.wire_code(), "invalid_user_id");
        assert_eq!(ErrorCode::EmptyPantry.wire_code(), "empty_pantry");
        assert_eq!(
            ErrorCode::GenerationTimeout.wire_code(),
            "generation_timeout"
        );
    }
}
