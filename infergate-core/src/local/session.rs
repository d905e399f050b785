//! On-device engine seam and scoped session handling.

use async_trait::async_trait;

use crate::capability::CapabilityProvider;
use crate::types::{ImageInput, Operation, SummaryOptions};

/// Options used to create a local-model session
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// System instructions for the session
    pub system_prompt: Option<String>,
    /// Summariser configuration, for summarise sessions
    pub summary: Option<SummaryOptions>,
    /// Whether the session will receive image input
    pub accepts_images: bool,
}

/// One prompt sent through a session
#[derive(Debug, Clone, Default)]
pub struct PromptInput {
    pub text: String,
    pub image: Option<ImageInput>,
    /// Structured-output constraint for engines that accept one natively
    pub response_constraint: Option<serde_json::Value>,
}

/// Everything needed for one local call: how to open the session and what to
/// send through it.
#[derive(Debug, Clone, Default)]
pub struct LocalPlan {
    pub options: SessionOptions,
    pub input: PromptInput,
}

/// On-device inference backend.
///
/// Errors are untyped: bindings report whatever their runtime raised, and
/// the classifier makes sense of the message.
#[async_trait]
pub trait LocalEngine: CapabilityProvider {
    /// Whether prompts may carry a native `response_constraint`
    fn supports_response_constraint(&self) -> bool {
        true
    }

    /// Create a session configured for `operation`
    async fn create_session(
        &self,
        operation: Operation,
        options: &SessionOptions,
    ) -> anyhow::Result<Box<dyn LocalSession>>;
}

/// A live local-model session. Must be destroyed exactly once.
#[async_trait]
pub trait LocalSession: Send {
    async fn prompt(&mut self, input: &PromptInput) -> anyhow::Result<String>;

    /// Release engine resources held by this session
    fn destroy(&mut self);
}

/// Owns a session and destroys it when dropped, on every exit path.
pub struct SessionGuard {
    session: Box<dyn LocalSession>,
    operation: Operation,
}

impl SessionGuard {
    pub fn new(session: Box<dyn LocalSession>, operation: Operation) -> Self {
        Self { session, operation }
    }

    pub async fn prompt(&mut self, input: &PromptInput) -> anyhow::Result<String> {
        self.session.prompt(input).await
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.session.destroy();
        tracing::debug!("[local] {} session destroyed", self.operation);
    }
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard")
            .field("operation", &self.operation)
            .finish()
    }
}
