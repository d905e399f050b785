//! Logging layer for cloud provider calls.

use async_trait::async_trait;
use infergate_core::error::InferenceError;
use infergate_core::layer::{Layer, LayeredProvider};
use infergate_core::provider::CloudProvider;
use infergate_core::types::{Operation, ProviderInfo};
use std::sync::Arc;

/// Logs provider id, model, operation and elapsed time of every call.
///
/// Prompts and API keys are never logged.
#[derive(Debug, Clone)]
pub struct LoggingLayer {
    prefix: String,
}

impl LoggingLayer {
    /// Create a new logging layer
    pub fn new() -> Self {
        Self {
            prefix: "[provider]".to_string(),
        }
    }

    /// Create a logging layer with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: CloudProvider> Layer<P> for LoggingLayer {
    type LayeredProvider = LoggingProvider<P>;

    fn layer(&self, inner: P) -> Self::LayeredProvider {
        LoggingProvider {
            inner,
            prefix: self.prefix.clone(),
        }
    }
}

/// Provider wrapped with logging
#[derive(Debug)]
pub struct LoggingProvider<P> {
    inner: P,
    prefix: String,
}

#[async_trait]
impl<P: CloudProvider> LayeredProvider for LoggingProvider<P> {
    type Inner = P;

    fn inner(&self) -> &Self::Inner {
        &self.inner
    }

    async fn layered_generate(
        &self,
        prompt: &str,
        operation: Operation,
    ) -> Result<String, InferenceError> {
        let info = self.inner.info();
        let model = self.inner.model(operation);
        tracing::debug!(
            "{} {} request: model={}, operation={}, prompt_chars={}",
            self.prefix,
            info.id,
            model,
            operation,
            prompt.chars().count()
        );

        let start = std::time::Instant::now();
        let result = self.inner.generate(prompt, operation).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(text) => {
                tracing::debug!(
                    "{} {} success: model={}, operation={}, chars={}, elapsed={:?}",
                    self.prefix,
                    info.id,
                    model,
                    operation,
                    text.chars().count(),
                    elapsed
                );
            }
            Err(e) => {
                tracing::error!(
                    "{} {} error: model={}, operation={}, {}, elapsed={:?}",
                    self.prefix,
                    info.id,
                    model,
                    operation,
                    e,
                    elapsed
                );
            }
        }

        result
    }
}

#[async_trait]
impl<P: CloudProvider> CloudProvider for LoggingProvider<P> {
    fn info(&self) -> Arc<ProviderInfo> {
        LayeredProvider::layered_info(self)
    }

    fn model(&self, operation: Operation) -> &str {
        LayeredProvider::layered_model(self, operation)
    }

    async fn generate(&self, prompt: &str, operation: Operation) -> Result<String, InferenceError> {
        LayeredProvider::layered_generate(self, prompt, operation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Fixed(Result<&'static str, u16>);

    #[async_trait]
    impl CloudProvider for Fixed {
        fn info(&self) -> Arc<ProviderInfo> {
            Arc::new(ProviderInfo {
                id: "fixed".to_string(),
                name: "Fixed".to_string(),
            })
        }

        fn model(&self, _operation: Operation) -> &str {
            "fixed-large"
        }

        async fn generate(&self, _prompt: &str, _operation: Operation) -> Result<String, InferenceError> {
            match self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(status) => Err(InferenceError::provider("Fixed", status, "nope")),
            }
        }
    }

    #[tokio::test]
    async fn test_logging_layer_is_transparent() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let provider = LoggingLayer::new().layer(Fixed(Ok("hello")));
        assert_eq!(provider.info().id, "fixed");
        assert_eq!(provider.model(Operation::Draft), "fixed-large");
        assert_eq!(
            provider.generate("secret prompt", Operation::Draft).await.unwrap(),
            "hello"
        );

        let failing = LoggingLayer::with_prefix("[test]").layer(Fixed(Err(401)));
        assert!(matches!(
            failing.generate("secret prompt", Operation::Summarise).await,
            Err(InferenceError::Provider { status: 401, .. })
        ));
    }
}
