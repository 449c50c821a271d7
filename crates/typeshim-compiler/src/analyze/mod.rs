//! Analysis passes over the lowered model.
//!
//! - Declaration dependencies, recursion, and regularity (dependencies)
//! - On-demand generic instantiation (view)
//! - Conversion need as a least fixed point over the type graph (needs)

pub mod dependencies;
pub mod needs;
pub mod view;

#[cfg(test)]
mod needs_tests;

pub use dependencies::{DependencyAnalysis, analyze_dependencies, collect_refs};
pub use needs::{ConversionNeeds, analyze_needs};
pub use view::{TypeView, Unfolded};
