//! Registry mapping a provider key to its wire format and base URL.

use infergate_core::error::InferenceError;
use infergate_core::types::ProviderKind;
use std::collections::HashMap;
use std::sync::Arc;

use crate::anthropic::AnthropicFormat;
use crate::gemini::GeminiFormat;
use crate::openai::OpenAiFormat;
use crate::wire::WireFormat;

#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    formats: HashMap<ProviderKind, Arc<dyn WireFormat>>,
    base_urls: HashMap<ProviderKind, String>,
}

impl ProviderRegistry {
    pub fn builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder::default()
    }

    /// Wire format for `kind`
    pub fn format(&self, kind: ProviderKind) -> Result<Arc<dyn WireFormat>, InferenceError> {
        self.formats
            .get(&kind)
            .cloned()
            .ok_or_else(|| InferenceError::unsupported_provider(kind.id()))
    }

    /// Base URL for `kind`, honoring overrides
    pub fn base_url(&self, kind: ProviderKind) -> Result<String, InferenceError> {
        if let Some(url) = self.base_urls.get(&kind) {
            return Ok(url.clone());
        }
        Ok(self.format(kind)?.default_base_url().to_string())
    }

    pub fn kinds(&self) -> impl Iterator<Item = ProviderKind> + '_ {
        self.formats.keys().copied()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ProviderRegistry`], preloaded with the built-in formats
pub struct ProviderRegistryBuilder {
    formats: HashMap<ProviderKind, Arc<dyn WireFormat>>,
    base_urls: HashMap<ProviderKind, String>,
}

impl Default for ProviderRegistryBuilder {
    fn default() -> Self {
        let builtin: [Arc<dyn WireFormat>; 3] = [
            Arc::new(GeminiFormat),
            Arc::new(OpenAiFormat),
            Arc::new(AnthropicFormat),
        ];
        Self {
            formats: builtin.into_iter().map(|f| (f.kind(), f)).collect(),
            base_urls: HashMap::new(),
        }
    }
}

impl ProviderRegistryBuilder {
    /// Start without any format registered
    pub fn empty() -> Self {
        Self {
            formats: HashMap::new(),
            base_urls: HashMap::new(),
        }
    }

    /// Register or replace the wire format for its kind
    pub fn format(mut self, format: Arc<dyn WireFormat>) -> Self {
        self.formats.insert(format.kind(), format);
        self
    }

    /// Override the base URL for one provider
    pub fn base_url(mut self, kind: ProviderKind, url: impl Into<String>) -> Self {
        self.base_urls.insert(kind, url.into());
        self
    }

    pub fn build(self) -> ProviderRegistry {
        ProviderRegistry {
            formats: self.formats,
            base_urls: self.base_urls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_all_providers() {
        let registry = ProviderRegistry::default();
        for kind in ProviderKind::ALL {
            assert_eq!(registry.format(kind).unwrap().kind(), kind);
        }
        assert_eq!(
            registry.base_url(ProviderKind::OpenAi).unwrap(),
            "https://api.openai.com"
        );
    }

    #[test]
    fn test_base_url_override() {
        let registry = ProviderRegistry::builder()
            .base_url(ProviderKind::Anthropic, "http://127.0.0.1:1234")
            .build();
        assert_eq!(
            registry.base_url(ProviderKind::Anthropic).unwrap(),
            "http://127.0.0.1:1234"
        );
    }

    #[test]
    fn test_missing_format_is_unsupported() {
        let registry = ProviderRegistryBuilder::empty().format(Arc::new(GeminiFormat)).build();
        assert!(matches!(
            registry.format(ProviderKind::OpenAi),
            Err(InferenceError::UnsupportedProvider(_))
        ));
        assert_eq!(registry.kinds().count(), 1);
    }
}
