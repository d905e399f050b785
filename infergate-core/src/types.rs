//! Core types for hybrid inference requests and results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::admission::Decision;
use crate::error::InferenceError;

/// Kind of AI processing requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Summarise,
    Draft,
    Multimodal,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Summarise => "summarise",
            Operation::Draft => "draft",
            Operation::Multimodal => "multimodal",
        }
    }

    /// Verb phrase used inside user-facing messages
    pub fn action(&self) -> &'static str {
        match self {
            Operation::Summarise => "summarise this thread",
            Operation::Draft => "generate reply drafts",
            Operation::Multimodal => "describe this image",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User preference for where processing may happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    /// Only the on-device engine may be used
    OnDevice,
    /// On-device preferred, cloud allowed
    #[default]
    Hybrid,
}

/// Readiness of the on-device engine for one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityState {
    Ready,
    NeedsDownload,
    Unavailable,
}

impl CapabilityState {
    pub fn is_ready(&self) -> bool {
        matches!(self, CapabilityState::Ready)
    }
}

/// Tone requested for reply drafts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Formal,
    Casual,
    Concise,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Friendly => "friendly",
            Tone::Formal => "formal",
            Tone::Casual => "casual",
            Tone::Concise => "concise",
        }
    }

    /// Style instruction injected into draft prompts
    pub fn instruction(&self) -> &'static str {
        match self {
            Tone::Professional => "Write in a clear, professional tone.",
            Tone::Friendly => "Write in a warm, friendly tone.",
            Tone::Formal => "Write in a formal, courteous tone.",
            Tone::Casual => "Write in a relaxed, casual tone.",
            Tone::Concise => "Keep every sentence short and to the point.",
        }
    }
}

/// Options for reply-draft generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftOptions {
    pub tone: Tone,
    /// Free-form guidance from the user ("decline politely", ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
}

/// Shape of summary requested from the on-device summariser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryKind {
    #[default]
    KeyPoints,
    Tldr,
    Teaser,
    Headline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryFormat {
    #[default]
    PlainText,
    Markdown,
}

/// Options for thread summarisation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryOptions {
    pub kind: SummaryKind,
    pub length: SummaryLength,
    pub format: SummaryFormat,
}

/// Opaque image blob handed over by the extraction layer
#[derive(Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageInput {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

impl fmt::Debug for ImageInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageInput")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One processing request
#[derive(Debug, Clone)]
pub struct ProcessingRequest {
    pub operation: Operation,
    /// Previously extracted plain text; caption/context for images
    pub text: String,
    pub image: Option<ImageInput>,
    pub draft: DraftOptions,
    pub summary: SummaryOptions,
}

impl ProcessingRequest {
    fn new(operation: Operation, text: impl Into<String>) -> Self {
        Self {
            operation,
            text: text.into(),
            image: None,
            draft: DraftOptions::default(),
            summary: SummaryOptions::default(),
        }
    }

    /// Create a summarisation request
    pub fn summarise(text: impl Into<String>) -> Self {
        Self::new(Operation::Summarise, text)
    }

    /// Create a reply-draft request
    pub fn draft(text: impl Into<String>) -> Self {
        Self::new(Operation::Draft, text)
    }

    /// Create an image description request
    pub fn describe_image(image: ImageInput, caption: impl Into<String>) -> Self {
        let mut req = Self::new(Operation::Multimodal, caption);
        req.image = Some(image);
        req
    }

    /// Set draft tone
    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.draft.tone = tone;
        self
    }

    /// Set draft guidance
    pub fn with_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.draft.guidance = Some(guidance.into());
        self
    }

    /// Set summary options
    pub fn with_summary_options(mut self, options: SummaryOptions) -> Self {
        self.summary = options;
        self
    }

    /// Check the request invariants before any path is chosen
    pub fn validate(&self) -> Result<(), InferenceError> {
        match self.operation {
            Operation::Summarise | Operation::Draft if self.text.trim().is_empty() => Err(
                InferenceError::invalid_request(format!("{} requires non-empty text", self.operation)),
            ),
            Operation::Multimodal if self.image.is_none() => Err(InferenceError::invalid_request(
                "multimodal requests require an image",
            )),
            _ => Ok(()),
        }
    }
}

/// Normalised summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub tldr: String,
    #[serde(rename = "keyPoints")]
    pub key_points: Vec<String>,
}

/// One reply draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub subject: String,
    pub body: String,
}

/// Exactly three drafts, short to comprehensive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSet([Draft; 3]);

impl DraftSet {
    pub fn new(short: Draft, medium: Draft, comprehensive: Draft) -> Self {
        Self([short, medium, comprehensive])
    }

    pub fn short(&self) -> &Draft {
        &self.0[0]
    }

    pub fn medium(&self) -> &Draft {
        &self.0[1]
    }

    pub fn comprehensive(&self) -> &Draft {
        &self.0[2]
    }

    pub fn as_slice(&self) -> &[Draft] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Draft> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Draft> {
        self.0.into()
    }
}

/// Typed output of a successful request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ProcessingOutput {
    Summary(SummaryResult),
    Drafts(DraftSet),
    Description(String),
}

/// Path that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Local,
    CustomProvider(ProviderKind),
    SharedCloud,
}

/// Result handed back to the caller
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub output: ProcessingOutput,
    pub route: Route,
    /// Admission decision, for explaining why cloud was used
    pub decision: Decision,
}

/// Supported cloud providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::Gemini,
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "Gemini",
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Anthropic => "Anthropic",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ProviderKind {
    type Err = InferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            other => Err(InferenceError::unsupported_provider(other)),
        }
    }
}

/// User-supplied API credential, owned by the settings layer
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCredential {
    pub provider: ProviderKind,
    #[serde(rename = "apiKey")]
    pub api_key: String,
    pub name: String,
    pub enabled: bool,
}

impl ProviderCredential {
    pub fn new(provider: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            name: provider.display_name().to_string(),
            enabled: true,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl fmt::Debug for ProviderCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredential")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Provider information
#[derive(Debug, Clone)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
}

/// Per-request context attached to log lines
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub operation: Operation,
    pub mode: ProcessingMode,
}

impl RequestContext {
    pub fn new(operation: Operation, mode: ProcessingMode) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            operation,
            mode,
        }
    }
}
