//! # Infergate
//!
//! Hybrid on-device / cloud inference routing for email assistants.
//!
//! Infergate decides, per request, whether an on-device model can serve it.
//! It runs the request locally when it can and otherwise sends it to the
//! user's own cloud provider or a shared fallback endpoint. Model output is
//! validated, and failures surface as one flat set of actionable errors.
//!
//! ## Features
//!
//! - **Admission control**: capability probing plus configurable token ceilings
//! - **Scoped local sessions**: every on-device session is released on every exit path
//! - **Provider registry**: Gemini, OpenAI and Anthropic behind one wire-format trait
//! - **Strict validation**: exactly three drafts, at most five key points
//! - **Composable layers**: wrap cloud providers with logging
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! infergate = { version = "0.1", features = ["full"] }
//! ```
//!
//! ```ignore
//! use infergate::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example(engine: Arc<impl LocalEngine + 'static>) -> Result<()> {
//! let processor = HybridProcessor::builder()
//!     .engine(engine)
//!     .connector(HttpConnector::new().layer(LoggingLayer::new()))
//!     .credentials(vec![ProviderCredential::new(ProviderKind::Gemini, "your-api-key")])
//!     .finish();
//!
//! let request = ProcessingRequest::draft("Can we move the meeting to Thursday?")
//!     .with_tone(Tone::Friendly);
//! let result = processor.process(&request, ProcessingMode::Hybrid).await?;
//! println!("{:?} via {:?}", result.output, result.route);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Includes `providers` and `layers`
//! - `providers`: HTTP adapters for Gemini, OpenAI, Anthropic and the shared endpoint
//! - `layers`: Built-in provider layers (logging)
//! - `full`: All features enabled

// Re-export core types and traits
pub use infergate_core::*;

// Re-export providers under `providers` module
#[cfg(feature = "infergate-provider")]
pub mod providers {
    //! Cloud provider implementations.
    pub use infergate_provider::*;
}

// Re-export layers under `layers` module
#[cfg(feature = "infergate-layer")]
pub mod layers {
    //! Built-in provider layers.
    pub use infergate_layer::*;
}

/// Prelude module for convenient imports
pub mod prelude {
    //! Prelude module containing the most commonly used types and traits.
    //!
    //! ```
    //! use infergate::prelude::*;
    //! ```

    pub use crate::{
        CapabilityProvider, CapabilityState, CloudProvider, Decision, ErrorCode, HybridProcessor,
        InferenceConfig, Layer, LocalEngine, LocalSession, Operation, ProcessingError,
        ProcessingMode, ProcessingOutput, ProcessingRequest, ProcessingResult, PromptInput,
        ProviderCredential, ProviderKind, Result, Route, SessionOptions, Tone,
    };

    #[cfg(feature = "infergate-provider")]
    pub use crate::providers::{HttpConnector, ProviderRegistry, SharedCloudEndpoint};

    #[cfg(feature = "infergate-layer")]
    pub use crate::layers::LoggingLayer;
}
