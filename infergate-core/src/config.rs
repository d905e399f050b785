//! Policy and generation configuration.
//!
//! Every struct here deserialises with `#[serde(default)]`, so a settings
//! layer can supply a partial document and inherit the rest.

use serde::{Deserialize, Serialize};

use crate::types::Operation;

/// Token ceilings for on-device admission.
///
/// The estimate is `ceil(chars / chars_per_token)`, a conservative proxy and
/// not a tokenizer count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionPolicy {
    pub chars_per_token: usize,
    pub summarise_ceiling: usize,
    pub draft_ceiling: usize,
    pub multimodal_ceiling: usize,
}

impl AdmissionPolicy {
    /// Ceiling for an operation, in estimated tokens
    pub fn ceiling(&self, operation: Operation) -> usize {
        match operation {
            Operation::Summarise => self.summarise_ceiling,
            Operation::Draft => self.draft_ceiling,
            Operation::Multimodal => self.multimodal_ceiling,
        }
    }

    /// Estimate tokens from character count
    pub fn estimate_tokens(&self, text: &str) -> usize {
        let chars = text.chars().count();
        let divisor = self.chars_per_token.max(1);
        chars.div_ceil(divisor)
    }
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            chars_per_token: 4,
            summarise_ceiling: 1_000,
            draft_ceiling: 2_000,
            multimodal_ceiling: 1_500,
        }
    }
}

/// Sampling settings for one kind of cloud request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationProfile {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_k: u32,
    pub top_p: f32,
}

/// Sampling settings per operation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub summarise: GenerationProfile,
    pub draft: GenerationProfile,
}

impl GenerationConfig {
    pub fn profile(&self, operation: Operation) -> &GenerationProfile {
        match operation {
            Operation::Draft => &self.draft,
            Operation::Summarise | Operation::Multimodal => &self.summarise,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            summarise: GenerationProfile {
                temperature: 0.3,
                max_output_tokens: 1024,
                top_k: 40,
                top_p: 0.95,
            },
            draft: GenerationProfile {
                temperature: 0.7,
                max_output_tokens: 2048,
                top_k: 40,
                top_p: 0.95,
            },
        }
    }
}

/// Top-level configuration for a processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub admission: AdmissionPolicy,
    pub generation: GenerationConfig,
    /// Shared cloud endpoint used when no credential is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_endpoint: Option<String>,
    /// Timeout applied by the HTTP client itself
    pub http_timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            admission: AdmissionPolicy::default(),
            generation: GenerationConfig::default(),
            cloud_endpoint: None,
            http_timeout_secs: 60,
        }
    }
}

impl InferenceConfig {
    /// Parse configuration from a JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ceilings_keep_ratios() {
        let policy = AdmissionPolicy::default();
        assert_eq!(policy.draft_ceiling, policy.summarise_ceiling * 2);
        assert_eq!(policy.multimodal_ceiling * 2, policy.summarise_ceiling * 3);
    }

    #[test]
    fn test_estimate_rounds_up() {
        let policy = AdmissionPolicy::default();
        assert_eq!(policy.estimate_tokens(""), 0);
        assert_eq!(policy.estimate_tokens("abc"), 1);
        assert_eq!(policy.estimate_tokens(&"a".repeat(8_000)), 2_000);
        assert_eq!(policy.estimate_tokens(&"a".repeat(8_001)), 2_001);
    }

    #[test]
    fn test_partial_config() {
        let config = InferenceConfig::from_json(
            r#"{"admission": {"draft_ceiling": 500}, "cloud_endpoint": "https://example.test/ai"}"#,
        )
        .unwrap();
        assert_eq!(config.admission.draft_ceiling, 500);
        assert_eq!(config.admission.summarise_ceiling, 1_000);
        assert_eq!(config.generation, GenerationConfig::default());
        assert_eq!(config.cloud_endpoint.as_deref(), Some("https://example.test/ai"));
        assert_eq!(config.http_timeout_secs, 60);
    }
}
