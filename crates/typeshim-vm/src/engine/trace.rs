//! Observation hooks for conversions.

use std::cell::RefCell;

use typeshim_compiler::plan::PlanId;

use super::runtime::Direction;
use super::value::Value;

/// Receives an event before every non-identity conversion.
///
/// Methods take `&self`: adapters outlive the call that created them, so
/// tracers are shared and keep their state behind interior mutability.
pub trait Tracer {
    fn trace_convert(&self, direction: Direction, plan: PlanId, value: &Value);

    fn trace_call(&self, _arity: usize) {}
}

/// Ignores every event.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_convert(&self, _direction: Direction, _plan: PlanId, _value: &Value) {}
}

#[derive(Clone, Debug, PartialEq)]
pub struct TraceEvent {
    pub direction: Direction,
    pub plan: PlanId,
    /// The input value, rendered.
    pub value: String,
}

/// Collects conversion events in order.
#[derive(Default)]
pub struct RecordingTracer {
    events: RefCell<Vec<TraceEvent>>,
    calls: RefCell<usize>,
}

impl RecordingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.borrow().clone()
    }

    /// Adapter calls observed so far.
    pub fn calls(&self) -> usize {
        *self.calls.borrow()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
        *self.calls.borrow_mut() = 0;
    }
}

impl Tracer for RecordingTracer {
    fn trace_convert(&self, direction: Direction, plan: PlanId, value: &Value) {
        // Rendering may run accessors that trace themselves
        let value = value.to_string();
        self.events.borrow_mut().push(TraceEvent {
            direction,
            plan,
            value,
        });
    }

    fn trace_call(&self, _arity: usize) {
        *self.calls.borrow_mut() += 1;
    }
}
