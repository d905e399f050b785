//! Error types for Infergate operations.
//!
//! Two layers live here. [`InferenceError`] is the typed failure raised inside
//! the core and its adapters. [`ProcessingError`] is the only error a caller
//! ever sees: a classified, user-facing wrapper that keeps the original
//! failure as its source.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::admission::AdmissionBlocker;

/// Typed failure raised by the routing core, its adapters and the validator.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// Provider returned a non-success status
    #[error("Provider error ({provider}, status {status}): {message}")]
    Provider {
        provider: String,
        status: u16,
        message: String,
    },

    /// Transport-level failure talking to a provider
    #[error("Network error ({provider}): {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body was not the JSON envelope we expected
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Model output failed its structural contract
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Provider answered but the text path was missing or blank
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// Shared cloud endpoint rejected the request
    #[error("Cloud endpoint error (status {status}): {}", .message.as_deref().unwrap_or("no error message"))]
    CloudEndpoint { status: u16, message: Option<String> },

    /// Admission control refused the request
    #[error("Admission rejected: {reason}")]
    Admission {
        blocker: AdmissionBlocker,
        reason: String,
    },

    /// Request shape is not acceptable for the chosen operation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown or disabled provider key
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// No usable path is configured for the request
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Untyped failure coming out of an on-device engine binding
    #[error(transparent)]
    Engine(#[from] anyhow::Error),
}

impl InferenceError {
    /// Create a provider status error
    pub fn provider(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a network error. The request URL is dropped since it may carry
    /// a query-string API key.
    pub fn network(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.into(),
            source: source.without_url(),
        }
    }

    /// Create an empty response error
    pub fn empty_response(provider: impl Into<String>) -> Self {
        Self::EmptyResponse(provider.into())
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create an unsupported provider error
    pub fn unsupported_provider(msg: impl Into<String>) -> Self {
        Self::UnsupportedProvider(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Name of the provider involved, when the failure came from one
    pub fn provider_name(&self) -> Option<&str> {
        match self {
            Self::Provider { provider, .. }
            | Self::Network { provider, .. }
            | Self::EmptyResponse(provider) => Some(provider),
            _ => None,
        }
    }
}

/// Structural contract violations found by the response validator.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("no JSON object found in model output")]
    NoJsonObject,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object at the top level")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(String),

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("expected exactly 3 drafts, got {0}")]
    DraftCount(usize),

    #[error("field `{0}` must not be empty")]
    EmptyField(String),

    #[error("field `{field}` exceeds {limit} characters")]
    TooLong { field: String, limit: usize },
}

impl ValidationError {
    pub(crate) fn wrong_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            field: field.into(),
            expected,
        }
    }
}

/// Flat set of actionable error kinds surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unavailable,
    TokenLimit,
    NetworkError,
    InvalidJson,
    InvalidKey,
    RateLimit,
    UnsupportedProvider,
    HybridFallback,
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unavailable => "UNAVAILABLE",
            ErrorCode::TokenLimit => "TOKEN_LIMIT",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::InvalidJson => "INVALID_JSON",
            ErrorCode::InvalidKey => "INVALID_KEY",
            ErrorCode::RateLimit => "RATE_LIMIT",
            ErrorCode::UnsupportedProvider => "UNSUPPORTED_PROVIDER",
            ErrorCode::HybridFallback => "HYBRID_FALLBACK",
            ErrorCode::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified error returned to callers.
///
/// `user_message` always names a remedy. `cause` is for diagnostics only and
/// should not be shown to end users.
#[derive(Debug, thiserror::Error)]
#[error("{user_message}")]
pub struct ProcessingError {
    pub code: ErrorCode,
    pub user_message: String,
    #[source]
    pub cause: Box<InferenceError>,
}

impl ProcessingError {
    pub fn new(code: ErrorCode, user_message: impl Into<String>, cause: InferenceError) -> Self {
        Self {
            code,
            user_message: user_message.into(),
            cause: Box::new(cause),
        }
    }

    /// Whether the caller may retry the same request through `process_remote`
    pub fn can_fallback(&self) -> bool {
        self.code == ErrorCode::HybridFallback
    }
}
