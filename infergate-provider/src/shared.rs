//! Shared cloud endpoint used when the user has no enabled credential.

use async_trait::async_trait;
use infergate_core::config::InferenceConfig;
use infergate_core::error::InferenceError;
use infergate_core::provider::FallbackEndpoint;
use infergate_core::types::{Operation, ProcessingRequest};
use serde_json::{json, Value};
use std::time::Duration;

const ENDPOINT_NAME: &str = "the cloud service";

#[derive(Debug, Clone)]
pub struct SharedCloudEndpoint {
    client: reqwest::Client,
    url: String,
}

impl SharedCloudEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Endpoint from `config.cloud_endpoint`, if one is configured
    pub fn from_config(config: &InferenceConfig) -> Result<Option<Self>, InferenceError> {
        let Some(url) = config.cloud_endpoint.as_deref() else {
            return Ok(None);
        };
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| InferenceError::configuration(format!("failed to build HTTP client: {}", e)))?;
        Ok(Some(Self {
            client,
            url: url.to_string(),
        }))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn request_body(request: &ProcessingRequest) -> Result<Value, InferenceError> {
        let options = match request.operation {
            Operation::Summarise => serde_json::to_value(request.summary)?,
            Operation::Draft => serde_json::to_value(&request.draft)?,
            Operation::Multimodal => {
                return Err(InferenceError::configuration(
                    "the shared endpoint does not describe images",
                ))
            }
        };
        Ok(json!({
            "type": request.operation.as_str(),
            "text": request.text,
            "options": options,
        }))
    }
}

#[async_trait]
impl FallbackEndpoint for SharedCloudEndpoint {
    async fn process(&self, request: &ProcessingRequest) -> Result<Value, InferenceError> {
        let body = Self::request_body(request)?;

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::network(ENDPOINT_NAME, e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| InferenceError::network(ENDPOINT_NAME, e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text).ok().and_then(|body| {
                body.get("error")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });
            tracing::warn!("[shared] endpoint returned {}", status);
            return Err(InferenceError::CloudEndpoint {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infergate_core::classifier::classify;
    use infergate_core::types::Tone;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_posts_type_text_options() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/process")
            .match_body(Matcher::Json(json!({
                "type": "draft",
                "text": "Lunch?",
                "options": {"tone": "friendly", "guidance": "say yes"}
            })))
            .with_status(200)
            .with_body(r#"{"drafts": []}"#)
            .create_async()
            .await;

        let endpoint = SharedCloudEndpoint::new(format!("{}/process", server.url()));
        let request = ProcessingRequest::draft("Lunch?")
            .with_tone(Tone::Friendly)
            .with_guidance("say yes");
        let body = endpoint.process(&request).await.unwrap();

        assert_eq!(body, json!({"drafts": []}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_field_surfaces_verbatim() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/process")
            .with_status(503)
            .with_body(r#"{"error": "Cloud processing is paused for maintenance."}"#)
            .create_async()
            .await;

        let endpoint = SharedCloudEndpoint::new(format!("{}/process", server.url()));
        let err = endpoint
            .process(&ProcessingRequest::summarise("thread"))
            .await
            .unwrap_err();
        let classified = classify(err, Operation::Summarise);

        assert_eq!(classified.user_message, "Cloud processing is paused for maintenance.");
    }

    #[tokio::test]
    async fn test_error_without_body_uses_default_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/process")
            .with_status(500)
            .create_async()
            .await;

        let endpoint = SharedCloudEndpoint::new(format!("{}/process", server.url()));
        let err = endpoint
            .process(&ProcessingRequest::summarise("thread"))
            .await
            .unwrap_err();

        assert!(matches!(err, InferenceError::CloudEndpoint { status: 500, message: None }));
        assert_eq!(
            classify(err, Operation::Summarise).user_message,
            "Cloud processing failed. Please try again later."
        );
    }

    #[test]
    fn test_from_config() {
        assert!(SharedCloudEndpoint::from_config(&InferenceConfig::default())
            .unwrap()
            .is_none());

        let config = InferenceConfig {
            cloud_endpoint: Some("https://ai.example.com/process".to_string()),
            ..Default::default()
        };
        let endpoint = SharedCloudEndpoint::from_config(&config).unwrap().unwrap();
        assert_eq!(endpoint.url(), "https://ai.example.com/process");
    }
}
