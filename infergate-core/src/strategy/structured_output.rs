//! Structured-output strategies for on-device engines.
//!
//! Engines differ in how they accept an output shape:
//! - NativeConstraintStrategy: the engine takes a JSON Schema as a response constraint
//! - PromptInjectionStrategy: the engine only follows instructions, so the schema goes into the prompt

use crate::error::InferenceError;
use crate::local::LocalPlan;

/// Strategy for asking a local engine for directly parseable JSON.
pub trait StructuredOutputStrategy: Send + Sync {
    /// Get the strategy name for debugging
    fn name(&self) -> &str;

    /// Attach `schema` to the plan in whatever way the engine understands
    fn apply(&self, plan: &mut LocalPlan, schema: &serde_json::Value) -> Result<(), InferenceError>;
}

/// Passes the schema as a native response constraint on the prompt.
#[derive(Debug, Clone, Default)]
pub struct NativeConstraintStrategy;

impl NativeConstraintStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl StructuredOutputStrategy for NativeConstraintStrategy {
    fn name(&self) -> &str {
        "NativeConstraintStrategy"
    }

    fn apply(&self, plan: &mut LocalPlan, schema: &serde_json::Value) -> Result<(), InferenceError> {
        plan.input.response_constraint = Some(schema.clone());
        Ok(())
    }
}

/// Injects the schema as instructions, for engines without constraint support.
#[derive(Debug, Clone)]
pub struct PromptInjectionStrategy {
    /// Inject into the system prompt (true) or append to the user prompt (false)
    pub use_system_prompt: bool,
}

impl PromptInjectionStrategy {
    pub fn new() -> Self {
        Self {
            use_system_prompt: true,
        }
    }

    pub fn with_system_prompt(use_system_prompt: bool) -> Self {
        Self { use_system_prompt }
    }

    fn build_json_instruction(schema: &serde_json::Value) -> Result<String, InferenceError> {
        let schema_str = serde_json::to_string_pretty(schema)?;
        Ok(format!(
            "Respond with a single JSON object that matches this schema:\n```json\n{}\n```\n\
            Return only the JSON object, with every required field present.",
            schema_str
        ))
    }
}

impl Default for PromptInjectionStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuredOutputStrategy for PromptInjectionStrategy {
    fn name(&self) -> &str {
        "PromptInjectionStrategy"
    }

    fn apply(&self, plan: &mut LocalPlan, schema: &serde_json::Value) -> Result<(), InferenceError> {
        let instruction = Self::build_json_instruction(schema)?;
        plan.input.response_constraint = None;

        if self.use_system_prompt {
            plan.options.system_prompt = Some(match plan.options.system_prompt.take() {
                Some(existing) => format!("{}\n\n{}", existing, instruction),
                None => instruction,
            });
        } else {
            plan.input.text.push_str("\n\n");
            plan.input.text.push_str(&instruction);
        }

        Ok(())
    }
}

/// Pick the strategy matching an engine's capabilities.
pub fn detect_structured_strategy(supports_constraint: bool) -> Box<dyn StructuredOutputStrategy> {
    if supports_constraint {
        Box::new(NativeConstraintStrategy::new())
    } else {
        Box::new(PromptInjectionStrategy::new())
    }
}
