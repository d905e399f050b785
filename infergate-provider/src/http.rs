//! HTTP transport for cloud providers.
//!
//! [`HttpProvider`] binds one wire format to one API key. [`HttpConnector`]
//! builds providers from user credentials and wraps them in a layer.

use async_trait::async_trait;
use infergate_core::config::{GenerationConfig, InferenceConfig};
use infergate_core::error::InferenceError;
use infergate_core::layer::{Identity, Layer};
use infergate_core::provider::{CloudProvider, ProviderConnector};
use infergate_core::types::{Operation, ProviderCredential, ProviderInfo, ProviderKind};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::registry::ProviderRegistry;
use crate::wire::{AuthStrategy, WireFormat};

/// Cloud provider speaking one wire format over HTTP
#[derive(Clone)]
pub struct HttpProvider {
    client: reqwest::Client,
    format: Arc<dyn WireFormat>,
    base_url: String,
    api_key: String,
    generation: GenerationConfig,
    info: Arc<ProviderInfo>,
}

impl Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("info", &self.info)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpProvider {
    /// Create a builder for `kind`
    pub fn builder(kind: ProviderKind) -> HttpProviderBuilder {
        HttpProviderBuilder::new(kind)
    }

    fn name(&self) -> &str {
        &self.info.name
    }

    /// Send `prompt` and return the extracted text, which may be empty
    pub async fn call_provider(&self, prompt: &str, operation: Operation) -> Result<String, InferenceError> {
        let url = self.format.endpoint(&self.base_url, operation);
        let profile = self.generation.profile(operation);
        let body = self.format.build_request(prompt, profile, operation);

        let mut request = self.client.post(url).json(&body);
        request = match self.format.auth() {
            AuthStrategy::QueryParam(name) => request.query(&[(name, self.api_key.as_str())]),
            AuthStrategy::Bearer => request.bearer_auth(&self.api_key),
            AuthStrategy::Header { name, extra } => {
                let mut request = request.header(name, &self.api_key);
                for (header, value) in extra {
                    request = request.header(*header, *value);
                }
                request
            }
        };

        let response = request
            .send()
            .await
            .map_err(|e| InferenceError::network(self.name(), e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| InferenceError::network(self.name(), e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| self.format.extract_error(&body))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
            return Err(InferenceError::provider(self.name(), status.as_u16(), message));
        }

        let body: Value = serde_json::from_str(&text)?;
        Ok(self.format.extract_text(&body))
    }
}

#[async_trait]
impl CloudProvider for HttpProvider {
    fn info(&self) -> Arc<ProviderInfo> {
        self.info.clone()
    }

    fn model(&self, operation: Operation) -> &str {
        self.format.model(operation)
    }

    async fn generate(&self, prompt: &str, operation: Operation) -> Result<String, InferenceError> {
        let text = self.call_provider(prompt, operation).await?;
        if text.trim().is_empty() {
            return Err(InferenceError::empty_response(self.name()));
        }
        Ok(text)
    }
}

/// Builder for [`HttpProvider`]
#[derive(Debug)]
pub struct HttpProviderBuilder {
    kind: ProviderKind,
    api_key: Option<String>,
    api_base: Option<String>,
    registry: Option<Arc<ProviderRegistry>>,
    generation: GenerationConfig,
    timeout: Option<Duration>,
}

impl HttpProviderBuilder {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            api_key: None,
            api_base: None,
            registry: None,
            generation: GenerationConfig::default(),
            timeout: None,
        }
    }

    /// Set the API key
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set a custom API base URL
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn registry(mut self, registry: Arc<ProviderRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the provider
    pub fn build(self) -> Result<HttpProvider, InferenceError> {
        let api_key = self
            .api_key
            .ok_or_else(|| InferenceError::configuration("API key is required"))?;
        let registry = self.registry.unwrap_or_default();
        let format = registry.format(self.kind)?;
        let base_url = match self.api_base {
            Some(base) => base,
            None => registry.base_url(self.kind)?,
        };

        Ok(HttpProvider {
            client: build_client(self.timeout)?,
            format,
            base_url,
            api_key,
            generation: self.generation,
            info: provider_info(self.kind),
        })
    }
}

fn provider_info(kind: ProviderKind) -> Arc<ProviderInfo> {
    Arc::new(ProviderInfo {
        id: kind.id().to_string(),
        name: kind.display_name().to_string(),
    })
}

fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, InferenceError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| InferenceError::configuration(format!("failed to build HTTP client: {}", e)))
}

/// Builds [`HttpProvider`]s from user credentials, wrapped in layer `L`.
#[derive(Debug, Clone)]
pub struct HttpConnector<L = Identity> {
    client: reqwest::Client,
    registry: Arc<ProviderRegistry>,
    generation: GenerationConfig,
    layer: L,
}

impl HttpConnector {
    /// Connector with the built-in registry and default settings
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            registry: Arc::new(ProviderRegistry::default()),
            generation: GenerationConfig::default(),
            layer: Identity,
        }
    }

    /// Connector honoring the generation profiles and HTTP timeout of `config`
    pub fn from_config(config: &InferenceConfig) -> Result<Self, InferenceError> {
        Ok(Self {
            client: build_client(Some(Duration::from_secs(config.http_timeout_secs)))?,
            registry: Arc::new(ProviderRegistry::default()),
            generation: config.generation,
            layer: Identity,
        })
    }
}

impl Default for HttpConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> HttpConnector<L> {
    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// Wrap every connected provider with `layer`
    ///
    /// Calling this again stacks the new layer outside the previous one.
    pub fn layer<M>(self, layer: M) -> HttpConnector<Stack<L, M>> {
        HttpConnector {
            client: self.client,
            registry: self.registry,
            generation: self.generation,
            layer: Stack {
                inner: self.layer,
                outer: layer,
            },
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    fn provider(&self, credential: &ProviderCredential) -> Result<HttpProvider, InferenceError> {
        Ok(HttpProvider {
            client: self.client.clone(),
            format: self.registry.format(credential.provider)?,
            base_url: self.registry.base_url(credential.provider)?,
            api_key: credential.api_key.clone(),
            generation: self.generation,
            info: provider_info(credential.provider),
        })
    }
}

impl<L> ProviderConnector for HttpConnector<L>
where
    L: Layer<HttpProvider> + Send + Sync + Debug,
{
    fn connect(
        &self,
        credential: &ProviderCredential,
    ) -> Result<Arc<dyn CloudProvider>, InferenceError> {
        let provider = self.provider(credential)?;
        Ok(Arc::new(self.layer.layer(provider)))
    }
}

/// Two layers applied in order, `inner` first
#[derive(Debug, Clone)]
pub struct Stack<Inner, Outer> {
    inner: Inner,
    outer: Outer,
}

impl<P, Inner, Outer> Layer<P> for Stack<Inner, Outer>
where
    P: CloudProvider,
    Inner: Layer<P>,
    Outer: Layer<Inner::LayeredProvider>,
{
    type LayeredProvider = Outer::LayeredProvider;

    fn layer(&self, provider: P) -> Self::LayeredProvider {
        self.outer.layer(self.inner.layer(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infergate_core::classifier::classify;
    use infergate_core::error::ErrorCode;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn connector_for(kind: ProviderKind, url: &str) -> HttpConnector {
        HttpConnector::new().with_registry(ProviderRegistry::builder().base_url(kind, url).build())
    }

    #[tokio::test]
    async fn test_gemini_key_in_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock(
                "POST",
                Matcher::Regex(r"^/v1beta/models/gemini-1\.5-flash:generateContent".to_string()),
            )
            .match_query(Matcher::UrlEncoded("key".into(), "g-key".into()))
            .match_body(Matcher::PartialJson(json!({"contents": [{"parts": [{"text": "ping"}]}]})))
            .with_status(200)
            .with_body(json!({"candidates": [{"content": {"parts": [{"text": "pong"}]}}]}).to_string())
            .create_async()
            .await;

        let provider = connector_for(ProviderKind::Gemini, &server.url())
            .connect(&ProviderCredential::new(ProviderKind::Gemini, "g-key"))
            .unwrap();
        let text = provider.generate("ping", Operation::Summarise).await.unwrap();

        assert_eq!(text, "pong");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_gemini_401_is_invalid_key() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Regex(r"^/v1beta/models/".to_string()))
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(
                json!({"error": {"code": 401, "message": "API key not valid", "status": "UNAUTHENTICATED"}})
                    .to_string(),
            )
            .create_async()
            .await;

        let provider = connector_for(ProviderKind::Gemini, &server.url())
            .connect(&ProviderCredential::new(ProviderKind::Gemini, "bad"))
            .unwrap();
        let err = provider.generate("ping", Operation::Summarise).await.unwrap_err();

        assert!(matches!(
            err,
            InferenceError::Provider { status: 401, ref message, .. } if message == "API key not valid"
        ));
        let classified = classify(err, Operation::Summarise);
        assert_eq!(classified.code, ErrorCode::InvalidKey);
        assert!(classified.user_message.contains("Gemini"));
    }

    #[tokio::test]
    async fn test_connection_error_hides_query_key() {
        let key = "SUPERSECRETKEY123";
        let provider = connector_for(ProviderKind::Gemini, "http://127.0.0.1:1")
            .connect(&ProviderCredential::new(ProviderKind::Gemini, key))
            .unwrap();
        let err = provider.generate("ping", Operation::Summarise).await.unwrap_err();

        assert!(matches!(err, InferenceError::Network { .. }));
        assert!(!err.to_string().contains(key), "{}", err);
        assert!(!format!("{:?}", err).contains(key));

        let classified = classify(err, Operation::Summarise);
        assert_eq!(classified.code, ErrorCode::NetworkError);
        assert!(!classified.cause.to_string().contains(key));
    }

    #[tokio::test]
    async fn test_openai_bearer_and_rate_limit() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(429)
            .with_body(json!({"error": {"message": "Rate limit reached for gpt-4o"}}).to_string())
            .create_async()
            .await;

        let provider = connector_for(ProviderKind::OpenAi, &server.url())
            .connect(&ProviderCredential::new(ProviderKind::OpenAi, "sk-test"))
            .unwrap();
        let err = provider.generate("ping", Operation::Draft).await.unwrap_err();

        let classified = classify(err, Operation::Draft);
        assert_eq!(classified.code, ErrorCode::RateLimit);
        assert!(classified.user_message.starts_with("OpenAI"));
    }

    #[tokio::test]
    async fn test_anthropic_headers() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "sk-ant")
            .match_header("anthropic-version", "2023-06-01")
            .match_body(Matcher::PartialJson(json!({"model": "claude-3-5-sonnet-20241022"})))
            .with_status(200)
            .with_body(json!({"content": [{"type": "text", "text": "drafts"}]}).to_string())
            .create_async()
            .await;

        let provider = connector_for(ProviderKind::Anthropic, &server.url())
            .connect(&ProviderCredential::new(ProviderKind::Anthropic, "sk-ant"))
            .unwrap();
        assert_eq!(provider.generate("hi", Operation::Draft).await.unwrap(), "drafts");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unparseable_error_uses_status_text() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(503)
            .with_body("<html>upstream down</html>")
            .create_async()
            .await;

        let provider = connector_for(ProviderKind::Anthropic, &server.url())
            .connect(&ProviderCredential::new(ProviderKind::Anthropic, "sk-ant"))
            .unwrap();
        let err = provider.generate("hi", Operation::Summarise).await.unwrap_err();

        assert!(matches!(
            err,
            InferenceError::Provider { status: 503, ref message, .. } if message == "Service Unavailable"
        ));
    }

    #[tokio::test]
    async fn test_missing_text_is_empty_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(json!({"choices": []}).to_string())
            .create_async()
            .await;

        let provider = HttpProvider::builder(ProviderKind::OpenAi)
            .api_key("sk")
            .api_base(server.url())
            .build()
            .unwrap();

        assert_eq!(provider.call_provider("hi", Operation::Summarise).await.unwrap(), "");
        assert!(matches!(
            provider.generate("hi", Operation::Summarise).await,
            Err(InferenceError::EmptyResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_credential_check_reports_without_error() {
        let mut server = Server::new_async().await;
        let _ok = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer good")
            .with_status(200)
            .with_body(json!({"choices": [{"message": {"content": "ok"}}]}).to_string())
            .create_async()
            .await;
        let _bad = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer bad")
            .with_status(401)
            .with_body(json!({"error": {"message": "Incorrect API key provided"}}).to_string())
            .create_async()
            .await;

        let connector = connector_for(ProviderKind::OpenAi, &server.url());
        let good = ProviderCredential::new(ProviderKind::OpenAi, "good");
        let bad = ProviderCredential::new(ProviderKind::OpenAi, "bad");

        assert!(infergate_core::provider::test_credential(&connector, &good).await);
        assert!(!infergate_core::provider::test_credential(&connector, &bad).await);
    }

    #[test]
    fn test_builder_requires_key() {
        assert!(matches!(
            HttpProvider::builder(ProviderKind::Gemini).build(),
            Err(InferenceError::Configuration(_))
        ));
    }
}
