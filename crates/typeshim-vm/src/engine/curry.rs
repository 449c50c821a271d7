//! Currying runtime: application of origin functions to any number of
//! arguments, as done by `Curry._N` and `Curry.app` in emitted shims.

use super::error::RuntimeError;
use super::value::{Function, Value};

/// Apply `f` to `args` one logical application at a time.
///
/// Exact arity calls directly. Fewer arguments build a partial application;
/// more arguments call with the first `arity` and apply the rest to the
/// result.
pub fn apply(f: &Function, mut args: Vec<Value>) -> Result<Value, RuntimeError> {
    let arity = f.arity();
    if arity == 0 || args.len() == arity {
        return f.call(args);
    }

    if args.len() < arity {
        let f = f.clone();
        return Ok(Value::function(arity - args.len(), move |rest| {
            let mut all = args.clone();
            all.extend(rest);
            apply(&f, all)
        }));
    }

    let rest = args.split_off(arity);
    match f.call(args)? {
        Value::Function(next) => apply(&next, rest),
        other => Err(RuntimeError::NotCallable(other.to_string())),
    }
}

/// Apply any callable value.
pub fn apply_value(f: &Value, args: Vec<Value>) -> Result<Value, RuntimeError> {
    match f {
        Value::Function(func) => apply(func, args),
        other => Err(RuntimeError::NotCallable(other.to_string())),
    }
}
