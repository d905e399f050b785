//! # Infergate Layers
//!
//! Built-in layers for Infergate cloud providers.
//!
//! Currently implemented layers:
//! - `LoggingLayer`: Logs every provider call with model, operation and timing
//!
//! ## Usage
//!
//! ```ignore
//! use infergate_layer::LoggingLayer;
//! use infergate_provider::HttpConnector;
//!
//! let connector = HttpConnector::new().layer(LoggingLayer::new());
//! ```

pub mod logging;

// Re-exports
pub use logging::{LoggingLayer, LoggingProvider};
