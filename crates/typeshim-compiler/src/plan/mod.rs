//! Conversion Planner.
//!
//! Decides, per type, whether values cross the boundary unchanged and, if
//! not, builds a converter pair (origin to host, host to origin).
//!
//! - `converter`: plan and converter data types
//! - `planner`: memoized, cycle-safe plan construction per module
//! - `hash`: polymorphic variant tag hashing
//! - `dump`: text rendering of a plan table

pub mod converter;
mod dump;
mod hash;
mod planner;

#[cfg(test)]
mod hash_tests;
#[cfg(test)]
mod planner_tests;

pub use converter::{
    ArgSlot, CallAdapter, CasePlan, ConversionPlan, Convention, Converter, EnumEntry, EnumTable,
    FieldPlan, FunctionPlan, NamedPlan, OriginTag, PlanId, VariantPlan,
};
pub use hash::variant_hash;
pub use planner::{ModulePlans, PlanTable, plan_module};
