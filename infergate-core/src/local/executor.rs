use std::sync::Arc;

use crate::classifier::classify;
use crate::error::{InferenceError, ProcessingError};
use crate::local::session::{LocalEngine, LocalPlan, PromptInput, SessionGuard, SessionOptions};
use crate::prompt::local_system_prompt;
use crate::schema::{draft_schema, summary_schema};
use crate::strategy::{detect_structured_strategy, StructuredOutputStrategy};
use crate::types::{Operation, ProcessingOutput, ProcessingRequest};
use crate::validator::validate_output;

/// Runs admitted requests against an on-device engine.
pub struct LocalExecutor {
    engine: Arc<dyn LocalEngine>,
    strategy: Box<dyn StructuredOutputStrategy>,
}

impl LocalExecutor {
    /// Create an executor, choosing the structured-output strategy from the engine
    pub fn new(engine: Arc<dyn LocalEngine>) -> Self {
        let strategy = detect_structured_strategy(engine.supports_response_constraint());
        Self { engine, strategy }
    }

    /// Override the structured-output strategy
    pub fn with_strategy(mut self, strategy: Box<dyn StructuredOutputStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn engine(&self) -> &Arc<dyn LocalEngine> {
        &self.engine
    }

    /// Run `request` on device and return validated output
    pub async fn run_local(
        &self,
        request: &ProcessingRequest,
    ) -> Result<ProcessingOutput, ProcessingError> {
        self.execute(request).await.map_err(|e| {
            tracing::warn!("[local] {} failed: {}", request.operation, e);
            classify(e, request.operation)
        })
    }

    /// Unclassified variant of [`run_local`](Self::run_local), used by the
    /// processor to decide between a plain error and a hybrid fallback.
    pub(crate) async fn execute(
        &self,
        request: &ProcessingRequest,
    ) -> Result<ProcessingOutput, InferenceError> {
        request.validate()?;

        let plan = self.plan(request)?;
        let session = self
            .engine
            .create_session(request.operation, &plan.options)
            .await?;
        let mut guard = SessionGuard::new(session, request.operation);
        tracing::debug!(
            "[local] {} session created ({})",
            request.operation,
            self.strategy.name()
        );

        let raw = guard.prompt(&plan.input).await?;
        drop(guard);

        Ok(validate_output(request.operation, raw.trim())?)
    }

    fn plan(&self, request: &ProcessingRequest) -> Result<LocalPlan, InferenceError> {
        let mut plan = LocalPlan {
            options: SessionOptions {
                system_prompt: Some(local_system_prompt(request)),
                summary: None,
                accepts_images: false,
            },
            input: PromptInput {
                text: request.text.clone(),
                image: None,
                response_constraint: None,
            },
        };

        match request.operation {
            Operation::Summarise => {
                plan.options.summary = Some(request.summary);
                self.strategy.apply(&mut plan, summary_schema())?;
            }
            Operation::Draft => {
                self.strategy.apply(&mut plan, draft_schema())?;
            }
            Operation::Multimodal => {
                plan.options.accepts_images = true;
                plan.input.image = request.image.clone();
            }
        }

        Ok(plan)
    }
}

impl std::fmt::Debug for LocalExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalExecutor")
            .field("engine", &self.engine)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}
