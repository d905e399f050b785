//! OpenAI chat completions wire format.
//!
//! Any OpenAI-compatible service can reuse this format by overriding the
//! base URL in the registry.

use infergate_core::config::GenerationProfile;
use infergate_core::types::{Operation, ProviderKind};
use serde_json::{json, Value};

use crate::wire::{join_url, text_at, AuthStrategy, WireFormat};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com";

#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiFormat;

impl WireFormat for OpenAiFormat {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn default_base_url(&self) -> &'static str {
        OPENAI_BASE_URL
    }

    fn model(&self, operation: Operation) -> &'static str {
        match operation {
            Operation::Draft => "gpt-4o",
            Operation::Summarise | Operation::Multimodal => "gpt-4o-mini",
        }
    }

    fn endpoint(&self, base_url: &str, _operation: Operation) -> String {
        join_url(base_url, "/v1/chat/completions")
    }

    fn build_request(&self, prompt: &str, profile: &GenerationProfile, operation: Operation) -> Value {
        json!({
            "model": self.model(operation),
            "messages": [{"role": "user", "content": prompt}],
            "temperature": profile.temperature,
            "max_tokens": profile.max_output_tokens,
        })
    }

    fn extract_text(&self, body: &Value) -> String {
        text_at(body, "/choices/0/message/content")
    }

    fn auth(&self) -> AuthStrategy {
        AuthStrategy::Bearer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infergate_core::config::GenerationConfig;

    #[test]
    fn test_request_shape() {
        let config = GenerationConfig::default();
        let body = OpenAiFormat.build_request(
            "hello",
            config.profile(Operation::Summarise),
            Operation::Summarise,
        );

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
        assert_eq!(body["max_tokens"], 1024);
    }

    #[test]
    fn test_drafts_sample_warmer_than_summaries() {
        let config = GenerationConfig::default();
        let temperature = |operation: Operation| {
            let body = OpenAiFormat.build_request("hi", config.profile(operation), operation);
            body["temperature"].as_f64().unwrap()
        };

        let summarise = temperature(Operation::Summarise);
        let draft = temperature(Operation::Draft);
        assert!((summarise - 0.3).abs() < 1e-6);
        assert!((draft - 0.7).abs() < 1e-6);
        assert!(draft > summarise);
    }

    #[test]
    fn test_extract_text_and_error() {
        let ok = json!({"choices": [{"message": {"role": "assistant", "content": "hi"}}]});
        assert_eq!(OpenAiFormat.extract_text(&ok), "hi");
        assert_eq!(OpenAiFormat.extract_text(&json!({"choices": [{}]})), "");

        let err = json!({"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}});
        assert_eq!(
            OpenAiFormat.extract_error(&err).as_deref(),
            Some("Incorrect API key provided")
        );
    }
}
