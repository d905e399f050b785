//! # Infergate Core
//!
//! Core abstractions and runtime for hybrid on-device / cloud inference.
//!
//! A [`HybridProcessor`] decides per request whether the on-device engine
//! can serve it, runs it there or through a cloud provider, validates the
//! structured output and classifies failures into a flat, user-facing
//! [`ErrorCode`] taxonomy.

pub mod admission;
pub mod capability;
pub mod classifier;
pub mod config;
pub mod error;
pub mod layer;
pub mod local;
pub mod prompt;
pub mod provider;
pub mod runtime;
pub mod schema;
pub mod strategy;
pub mod types;
pub mod validator;

// Re-exports
pub use admission::{AdmissionBlocker, AdmissionController, Decision};
pub use capability::{CapabilityProber, CapabilityProvider};
pub use classifier::classify;
pub use config::{AdmissionPolicy, GenerationConfig, GenerationProfile, InferenceConfig};
pub use error::{ErrorCode, InferenceError, ProcessingError, ValidationError};
pub use layer::{Layer, LayeredProvider};
pub use local::{LocalEngine, LocalExecutor, LocalSession, PromptInput, SessionOptions};
pub use provider::{test_credential, CloudProvider, FallbackEndpoint, ProviderConnector};
pub use runtime::{HybridProcessor, HybridProcessorBuilder};
pub use strategy::{NativeConstraintStrategy, PromptInjectionStrategy, StructuredOutputStrategy};
pub use types::*;
pub use validator::{validate_drafts, validate_output, validate_summary, RawOutput};

/// Result type alias for processing operations
pub type Result<T> = std::result::Result<T, ProcessingError>;
