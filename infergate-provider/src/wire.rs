//! Wire-format adapter trait shared by every cloud provider.

use infergate_core::config::GenerationProfile;
use infergate_core::types::{Operation, ProviderKind};
use serde_json::Value;
use std::fmt::Debug;

/// Where the API key goes on the outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// `?{name}={key}` on the URL
    QueryParam(&'static str),
    /// `Authorization: Bearer {key}`
    Bearer,
    /// `{name}: {key}` plus fixed extra headers
    Header {
        name: &'static str,
        extra: &'static [(&'static str, &'static str)],
    },
}

/// Request and response shape of one provider API.
///
/// Adapters are pure: they build JSON and read JSON. Sending, status
/// handling and empty-text checks live in [`HttpProvider`](crate::HttpProvider).
pub trait WireFormat: Send + Sync + Debug {
    fn kind(&self) -> ProviderKind;

    /// Base URL used when the registry has no override
    fn default_base_url(&self) -> &'static str;

    /// Model used for `operation`: a cheaper one for summaries, a larger one for drafts
    fn model(&self, operation: Operation) -> &'static str;

    fn endpoint(&self, base_url: &str, operation: Operation) -> String;

    fn build_request(&self, prompt: &str, profile: &GenerationProfile, operation: Operation) -> Value;

    /// First text fragment of a success body, `""` when the path is missing
    fn extract_text(&self, body: &Value) -> String;

    /// Structured error message of a failure body
    fn extract_error(&self, body: &Value) -> Option<String> {
        body.pointer("/error/message")
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn auth(&self) -> AuthStrategy;
}

/// Read a string at a JSON pointer, `""` when absent
pub(crate) fn text_at(body: &Value, pointer: &str) -> String {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
