//! # Infergate Providers
//!
//! Cloud provider adapters for Infergate.
//!
//! Each provider is a [`WireFormat`] describing its endpoint, request body,
//! response path and authentication. A [`ProviderRegistry`] maps provider
//! keys to formats, and [`HttpConnector`] turns user credentials into
//! ready-to-call providers.

pub mod anthropic;
pub mod gemini;
pub mod http;
pub mod openai;
pub mod registry;
pub mod shared;
pub mod wire;

// Re-exports
pub use anthropic::AnthropicFormat;
pub use gemini::GeminiFormat;
pub use http::{HttpConnector, HttpProvider, HttpProviderBuilder, Stack};
pub use openai::OpenAiFormat;
pub use registry::{ProviderRegistry, ProviderRegistryBuilder};
pub use shared::SharedCloudEndpoint;
pub use wire::{AuthStrategy, WireFormat};

use infergate_core::error::InferenceError;
use infergate_core::types::{ProviderCredential, ProviderKind};

/// Create a Gemini provider
///
/// # Example
///
/// ```ignore
/// use infergate_provider::gemini;
///
/// let provider = gemini("your-api-key")?;
/// ```
pub fn gemini(api_key: impl Into<String>) -> Result<HttpProvider, InferenceError> {
    HttpProvider::builder(ProviderKind::Gemini).api_key(api_key).build()
}

/// Create an OpenAI provider
pub fn openai(api_key: impl Into<String>) -> Result<HttpProvider, InferenceError> {
    HttpProvider::builder(ProviderKind::OpenAi).api_key(api_key).build()
}

/// Create an Anthropic provider
pub fn anthropic(api_key: impl Into<String>) -> Result<HttpProvider, InferenceError> {
    HttpProvider::builder(ProviderKind::Anthropic).api_key(api_key).build()
}

/// Check a credential against the real provider API
pub async fn test_credential(credential: &ProviderCredential) -> bool {
    infergate_core::provider::test_credential(&HttpConnector::new(), credential).await
}
