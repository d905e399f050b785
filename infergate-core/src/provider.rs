//! Cloud provider trait and core abstractions.

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::error::InferenceError;
use crate::types::{Operation, ProcessingRequest, ProviderCredential, ProviderInfo};

/// Core trait for a cloud model bound to one credential.
///
/// Implementations only turn a prompt into raw model text. Prompt building,
/// validation and classification happen in the runtime.
#[async_trait]
pub trait CloudProvider: Send + Sync + Debug + 'static {
    /// Get provider information
    fn info(&self) -> Arc<ProviderInfo>;

    /// Model used for `operation`
    fn model(&self, operation: Operation) -> &str;

    /// Send a single-message prompt and return the first text fragment
    async fn generate(&self, prompt: &str, operation: Operation) -> Result<String, InferenceError>;
}

/// Builds a [`CloudProvider`] for a user credential.
pub trait ProviderConnector: Send + Sync + Debug {
    fn connect(
        &self,
        credential: &ProviderCredential,
    ) -> Result<Arc<dyn CloudProvider>, InferenceError>;
}

/// Shared cloud endpoint used when the user has no enabled credential.
///
/// Returns the success body as-is; the runtime validates it.
#[async_trait]
pub trait FallbackEndpoint: Send + Sync + Debug {
    async fn process(&self, request: &ProcessingRequest) -> Result<serde_json::Value, InferenceError>;
}

/// Check a credential with a minimal real summarise call. Never errors.
pub async fn test_credential(
    connector: &dyn ProviderConnector,
    credential: &ProviderCredential,
) -> bool {
    let provider = match connector.connect(credential) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::warn!("[provider] cannot connect {}: {}", credential.provider, e);
            return false;
        }
    };

    match provider
        .generate(crate::prompt::probe_prompt(), Operation::Summarise)
        .await
    {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("[provider] credential check failed for {}: {}", credential.provider, e);
            false
        }
    }
}
