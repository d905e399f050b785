//! Strategy layer for engine-specific behaviors.
//!
//! Strategies absorb differences between on-device engines, such as whether
//! a structured-output constraint can be passed natively.

pub mod structured_output;

pub use structured_output::{
    detect_structured_strategy, NativeConstraintStrategy, PromptInjectionStrategy,
    StructuredOutputStrategy,
};
