//! Google Gemini `generateContent` wire format.

use infergate_core::config::GenerationProfile;
use infergate_core::types::{Operation, ProviderKind};
use serde_json::{json, Value};

use crate::wire::{join_url, text_at, AuthStrategy, WireFormat};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiFormat;

impl WireFormat for GeminiFormat {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn default_base_url(&self) -> &'static str {
        GEMINI_BASE_URL
    }

    fn model(&self, operation: Operation) -> &'static str {
        match operation {
            Operation::Draft => "gemini-1.5-pro",
            Operation::Summarise | Operation::Multimodal => "gemini-1.5-flash",
        }
    }

    fn endpoint(&self, base_url: &str, operation: Operation) -> String {
        join_url(
            base_url,
            &format!("/v1beta/models/{}:generateContent", self.model(operation)),
        )
    }

    fn build_request(&self, prompt: &str, profile: &GenerationProfile, _operation: Operation) -> Value {
        let safety: Vec<Value> = SAFETY_CATEGORIES
            .iter()
            .map(|category| json!({"category": category, "threshold": "BLOCK_MEDIUM_AND_ABOVE"}))
            .collect();

        json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {
                "temperature": profile.temperature,
                "topK": profile.top_k,
                "topP": profile.top_p,
                "maxOutputTokens": profile.max_output_tokens,
            },
            "safetySettings": safety,
        })
    }

    fn extract_text(&self, body: &Value) -> String {
        text_at(body, "/candidates/0/content/parts/0/text")
    }

    fn auth(&self) -> AuthStrategy {
        AuthStrategy::QueryParam("key")
    }
}
