#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the typeshim crates.
//!
//! - `interner`: origin identifiers (type names, fields, tags) as cheap `Symbol` handles
//! - `colors`: ANSI palette for terminal rendering of declarations and diagnostics
//! - `utils`: identifier helpers for the JavaScript/TypeScript host

pub mod colors;
pub mod interner;
pub mod utils;


pub use colors::Colors;
pub use interner::{Interner, Symbol};
