//! Runtime interpreter for typeshim conversion plans.
//!
//! This crate executes the same `PlanTable` the shim emitter renders, over a
//! dynamic model of JavaScript values in the origin's runtime representation.
//! It is the harness for the conversion laws: round trips, variant
//! bijection, argument order, and recursion termination.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod engine;

pub use engine::{
    Direction, Function, ModuleRuntime, NoopTracer, Object, RecordingTracer, Runtime, RuntimeError,
    TraceEvent, Tracer, Value, curry,
};
