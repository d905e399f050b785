//! Runtime layer for Infergate.
//!
//! The runtime sits between callers and the execution paths. It asks
//! admission control where a request may run, dispatches it to the local
//! executor or a cloud path, and classifies whatever goes wrong.

pub mod executor;

pub use executor::{HybridProcessor, HybridProcessorBuilder};
