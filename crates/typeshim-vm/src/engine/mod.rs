//! Conversion engine.
//!
//! Values cross the boundary through `Runtime::to_host` and
//! `Runtime::to_origin`; functions are wrapped in adapters that convert
//! arguments and results on every call.

pub mod curry;
mod error;
mod module;
mod runtime;
mod trace;
mod value;


pub use error::RuntimeError;
pub use module::ModuleRuntime;
pub use runtime::{Direction, Runtime};
pub use trace::{NoopTracer, RecordingTracer, TraceEvent, Tracer};
pub use value::{Function, Object, Value};
