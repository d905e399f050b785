//! Error classification into the flat, user-facing taxonomy.
//!
//! Typed failures are mapped by variant and status code. Only untyped engine
//! errors fall through to message matching.

use crate::admission::AdmissionBlocker;
use crate::error::{ErrorCode, InferenceError, ProcessingError};
use crate::types::Operation;

const GENERIC_PROVIDER: &str = "the cloud service";
const CLOUD_ENDPOINT_FALLBACK_MESSAGE: &str = "Cloud processing failed. Please try again later.";

/// Classify a failure raised while serving `operation`.
pub fn classify(error: InferenceError, operation: Operation) -> ProcessingError {
    if let InferenceError::CloudEndpoint { status, message } = &error {
        let code = match *status {
            429 => ErrorCode::RateLimit,
            413 => ErrorCode::TokenLimit,
            _ => ErrorCode::Unknown,
        };
        let user_message = message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(CLOUD_ENDPOINT_FALLBACK_MESSAGE)
            .to_string();
        return ProcessingError::new(code, user_message, error);
    }

    let code = code_for(&error);
    let provider = error.provider_name().unwrap_or(GENERIC_PROVIDER).to_string();
    let message = match (&error, code) {
        (InferenceError::Provider { .. }, ErrorCode::TokenLimit) => remote_token_limit(&provider),
        _ => user_message(code, &provider, operation),
    };
    ProcessingError::new(code, message, error)
}

/// Token limit reported by a cloud provider, where hybrid mode is already in use
fn remote_token_limit(provider: &str) -> String {
    format!(
        "{} rejected the request as too long. Shorten the text and try again.",
        provider
    )
}

/// Wrap a failed local attempt that may be retried through the cloud path.
pub fn hybrid_fallback(cause: InferenceError, operation: Operation) -> ProcessingError {
    let code = ErrorCode::HybridFallback;
    ProcessingError::new(code, user_message(code, GENERIC_PROVIDER, operation), cause)
}

/// Fixed template for each error kind
pub fn user_message(code: ErrorCode, provider: &str, operation: Operation) -> String {
    match code {
        ErrorCode::Unavailable => "On-device AI is not available on this device. Enable hybrid mode \
            to use cloud processing, or download the on-device model."
            .to_string(),
        ErrorCode::TokenLimit => format!(
            "This content is too long to {} on device. Shorten the text or enable hybrid mode.",
            operation.action()
        ),
        ErrorCode::NetworkError => format!(
            "Could not reach {}. Check your internet connection and try again.",
            provider
        ),
        ErrorCode::InvalidJson => {
            "The AI returned a response in an unexpected format. Try again.".to_string()
        }
        ErrorCode::InvalidKey => format!(
            "{} rejected the API key. Check your API key in settings.",
            provider
        ),
        ErrorCode::RateLimit => format!(
            "{} rate limit reached. Wait a moment and try again, or use a different provider in settings.",
            provider
        ),
        ErrorCode::UnsupportedProvider => {
            "This AI provider is not supported. Choose a supported provider in settings.".to_string()
        }
        ErrorCode::HybridFallback => {
            "On-device processing failed. Try again to use cloud processing instead.".to_string()
        }
        ErrorCode::Unknown => format!(
            "Something went wrong while trying to {}. Try again.",
            operation.action()
        ),
    }
}

fn code_for(error: &InferenceError) -> ErrorCode {
    match error {
        InferenceError::Provider {
            status, message, ..
        } => match *status {
            401 | 403 => ErrorCode::InvalidKey,
            // Gemini reports a bad key as 400 INVALID_ARGUMENT
            400 if message.to_lowercase().contains("api key") => ErrorCode::InvalidKey,
            429 => ErrorCode::RateLimit,
            400 | 413 if mentions_length(&message.to_lowercase()) => ErrorCode::TokenLimit,
            500..=599 => ErrorCode::NetworkError,
            _ => ErrorCode::Unknown,
        },
        InferenceError::Network { .. } => ErrorCode::NetworkError,
        InferenceError::Serialization(_)
        | InferenceError::Validation(_)
        | InferenceError::EmptyResponse(_) => ErrorCode::InvalidJson,
        InferenceError::CloudEndpoint { .. } => ErrorCode::Unknown,
        InferenceError::Admission { blocker, .. } => match blocker {
            AdmissionBlocker::ContentTooLarge => ErrorCode::TokenLimit,
            AdmissionBlocker::ModelUnavailable | AdmissionBlocker::Both => ErrorCode::Unavailable,
        },
        InferenceError::UnsupportedProvider(_) => ErrorCode::UnsupportedProvider,
        InferenceError::Configuration(_) => ErrorCode::Unavailable,
        InferenceError::InvalidRequest(_) => ErrorCode::Unknown,
        InferenceError::Engine(e) => code_from_message(&format!("{:#}", e)),
    }
}

fn mentions_length(lower: &str) -> bool {
    lower.contains("token") || lower.contains("context") || lower.contains("too long")
}

/// Last-resort mapping for untyped engine failures
fn code_from_message(message: &str) -> ErrorCode {
    let lower = message.to_lowercase();

    if lower.contains("api key") || lower.contains("401") || lower.contains("unauthorized") {
        ErrorCode::InvalidKey
    } else if lower.contains("429") || lower.contains("rate limit") {
        ErrorCode::RateLimit
    } else if lower.contains("token") || lower.contains("too long") {
        ErrorCode::TokenLimit
    } else if ["network", "fetch", "connection", "timeout"]
        .iter()
        .any(|needle| lower.contains(needle))
    {
        ErrorCode::NetworkError
    } else if lower.contains("json") || lower.contains("parse") {
        ErrorCode::InvalidJson
    } else if lower.contains("unsupported provider") {
        ErrorCode::UnsupportedProvider
    } else if ["unavailable", "not available", "not supported"]
        .iter()
        .any(|needle| lower.contains(needle))
    {
        ErrorCode::Unavailable
    } else {
        ErrorCode::Unknown
    }
}
