//! typeshim compiler: binding generation from origin type signatures.
//!
//! This crate provides the generation pipeline:
//! - `input` - serde schema of the JSON type-signature document
//! - `model` - type representation model and lowering (name resolution, validation)
//! - `analyze` - declaration dependencies, generic instantiation, conversion needs
//! - `plan` - conversion planner
//! - `naming` - module namer
//! - `emit` - declaration and shim emitters
//! - `diagnostics` - error reporting

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyze;
pub mod diagnostics;
pub mod emit;
pub mod input;
pub mod model;
pub mod naming;
pub mod plan;

mod generate;

#[cfg(test)]
mod generate_tests;
#[cfg(test)]
pub mod test_utils;

/// Result type for passes that produce both output and diagnostics.
///
/// Each pass returns its typed output alongside any diagnostics it collected.
/// Fatal errors (like malformed input) use the outer `Result`.
pub type PassResult<T> = std::result::Result<(T, Diagnostics), Error>;

pub use diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};
pub use emit::{Config, ModuleFormat};
pub use generate::{GeneratedModule, GenerationOutput, Generator, lower_json};

/// Errors that can occur during generation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input is not a valid type-signature document.
    #[error("invalid input document: {0}")]
    InvalidInput(#[from] serde_json::Error),

    #[error("generation failed with {} errors", .0.error_count())]
    GenerationFailed(Diagnostics),
}

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, Error>;
