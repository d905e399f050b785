//! Layer trait and abstractions.
//!
//! Layers wrap a cloud provider with cross-cutting behavior such as logging.
//! Each layer takes an inner provider and returns a new one.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::InferenceError;
use crate::provider::CloudProvider;
use crate::types::{Operation, ProviderInfo};

/// Layer trait for wrapping providers.
pub trait Layer<P: CloudProvider> {
    /// The type of the layered provider
    type LayeredProvider: CloudProvider;

    /// Wrap the inner provider with this layer
    fn layer(&self, inner: P) -> Self::LayeredProvider;
}

/// Forwarding helper for layered providers.
///
/// Implementers override only the methods they intercept and use
/// [`impl_layered_provider!`](crate::impl_layered_provider) for the rest.
#[async_trait]
pub trait LayeredProvider: Sized + CloudProvider {
    /// The inner provider type
    type Inner: CloudProvider;

    /// Get a reference to the inner provider
    fn inner(&self) -> &Self::Inner;

    fn layered_info(&self) -> Arc<ProviderInfo> {
        self.inner().info()
    }

    fn layered_model(&self, operation: Operation) -> &str {
        self.inner().model(operation)
    }

    async fn layered_generate(
        &self,
        prompt: &str,
        operation: Operation,
    ) -> Result<String, InferenceError> {
        self.inner().generate(prompt, operation).await
    }
}

/// Implement [`CloudProvider`] by forwarding to [`LayeredProvider`] methods.
#[macro_export]
macro_rules! impl_layered_provider {
    ($type:ty) => {
        #[async_trait::async_trait]
        impl $crate::provider::CloudProvider for $type {
            fn info(&self) -> std::sync::Arc<$crate::types::ProviderInfo> {
                $crate::layer::LayeredProvider::layered_info(self)
            }

            fn model(&self, operation: $crate::types::Operation) -> &str {
                $crate::layer::LayeredProvider::layered_model(self, operation)
            }

            async fn generate(
                &self,
                prompt: &str,
                operation: $crate::types::Operation,
            ) -> Result<String, $crate::error::InferenceError> {
                $crate::layer::LayeredProvider::layered_generate(self, prompt, operation).await
            }
        }
    };
}

/// Layer that leaves the provider unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<P: CloudProvider> Layer<P> for Identity {
    type LayeredProvider = P;

    fn layer(&self, inner: P) -> P {
        inner
    }
}
