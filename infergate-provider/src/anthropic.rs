//! Anthropic messages wire format.

use infergate_core::config::GenerationProfile;
use infergate_core::types::{Operation, ProviderKind};
use serde_json::{json, Value};

use crate::wire::{join_url, text_at, AuthStrategy, WireFormat};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicFormat;

impl WireFormat for AnthropicFormat {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn default_base_url(&self) -> &'static str {
        ANTHROPIC_BASE_URL
    }

    fn model(&self, operation: Operation) -> &'static str {
        match operation {
            Operation::Draft => "claude-3-5-sonnet-20241022",
            Operation::Summarise | Operation::Multimodal => "claude-3-5-haiku-20241022",
        }
    }

    fn endpoint(&self, base_url: &str, _operation: Operation) -> String {
        join_url(base_url, "/v1/messages")
    }

    fn build_request(&self, prompt: &str, profile: &GenerationProfile, operation: Operation) -> Value {
        json!({
            "model": self.model(operation),
            "max_tokens": profile.max_output_tokens,
            "temperature": profile.temperature,
            "messages": [{"role": "user", "content": prompt}],
        })
    }

    fn extract_text(&self, body: &Value) -> String {
        text_at(body, "/content/0/text")
    }

    fn auth(&self) -> AuthStrategy {
        AuthStrategy::Header {
            name: "x-api-key",
            extra: &[("anthropic-version", ANTHROPIC_VERSION)],
        }
    }
}
