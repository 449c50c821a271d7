//! Plan interpreter.

use std::rc::Rc;

use typeshim_compiler::plan::{
    ArgSlot, Convention, Converter, EnumTable, FieldPlan, FunctionPlan, ModulePlans, OriginTag,
    PlanId, PlanTable, VariantPlan,
};

use super::curry;
use super::error::RuntimeError;
use super::trace::{NoopTracer, Tracer};
use super::value::{Function, Object, Value};

/// Which way a value crosses the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    ToHost,
    ToOrigin,
}

impl Direction {
    pub fn flip(self) -> Self {
        match self {
            Direction::ToHost => Direction::ToOrigin,
            Direction::ToOrigin => Direction::ToHost,
        }
    }
}

/// Executes conversion plans of one module.
///
/// Cheap to clone: function adapters and record accessors keep a clone so
/// they can convert long after the conversion that created them returned.
#[derive(Clone)]
pub struct Runtime {
    plans: Rc<PlanTable>,
    tracer: Rc<dyn Tracer>,
}

impl Runtime {
    pub fn new(plans: PlanTable) -> Self {
        Self {
            plans: Rc::new(plans),
            tracer: Rc::new(NoopTracer),
        }
    }

    pub fn for_module(plans: &ModulePlans) -> Self {
        Self::new(plans.table.clone())
    }

    pub fn with_tracer(mut self, tracer: Rc<dyn Tracer>) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn plans(&self) -> &PlanTable {
        &self.plans
    }

    pub fn to_host(&self, plan: PlanId, value: Value) -> Result<Value, RuntimeError> {
        self.convert(Direction::ToHost, plan, value)
    }

    pub fn to_origin(&self, plan: PlanId, value: Value) -> Result<Value, RuntimeError> {
        self.convert(Direction::ToOrigin, plan, value)
    }

    pub fn convert(
        &self,
        direction: Direction,
        plan: PlanId,
        value: Value,
    ) -> Result<Value, RuntimeError> {
        if plan.is_identity() {
            return Ok(value);
        }
        self.tracer.trace_convert(direction, plan, &value);
        tracing::trace!(?direction, %plan, kind = value.kind(), "convert");

        match self.plans.converter(plan) {
            Converter::Identity | Converter::Pending => Ok(value),
            Converter::Option { inner, nested } => self.option(direction, *inner, *nested, value),
            Converter::Array(inner) => match value {
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| self.convert(direction, *inner, item))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                other => Err(RuntimeError::mismatch("array", &other)),
            },
            Converter::Tuple(elements) => match value {
                Value::Array(items) if items.len() == elements.len() => items
                    .into_iter()
                    .zip(elements)
                    .map(|(item, &p)| self.convert(direction, p, item))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                other => Err(RuntimeError::mismatch("tuple", &other)),
            },
            Converter::Record(fields) => self.record(direction, fields, value),
            Converter::Enum(table) => self.enumeration(direction, table, value),
            Converter::Variant(variant) => match direction {
                Direction::ToHost => self.variant_to_host(variant, value),
                Direction::ToOrigin => self.variant_to_origin(variant, value),
            },
            Converter::Function(func) => match value {
                Value::Function(f) => Ok(match direction {
                    Direction::ToHost => self.host_callable(func, f),
                    Direction::ToOrigin => self.origin_callable(func, f),
                }),
                other => Err(RuntimeError::mismatch("function", &other)),
            },
        }
    }

    fn option(
        &self,
        direction: Direction,
        inner: PlanId,
        nested: bool,
        value: Value,
    ) -> Result<Value, RuntimeError> {
        match (direction, nested, value) {
            (_, _, Value::Undefined) => Ok(Value::Undefined),
            (Direction::ToOrigin, false, Value::Null) => Ok(Value::Undefined),
            (Direction::ToHost, true, Value::NestedNone) => Ok(Value::Null),
            (Direction::ToOrigin, true, Value::Null) => Ok(Value::NestedNone),
            (_, _, present) => self.convert(direction, inner, present),
        }
    }

    /// A fresh object with every field converted. Mutable fields are
    /// accessors over the source object.
    fn record(
        &self,
        direction: Direction,
        fields: &[FieldPlan],
        value: Value,
    ) -> Result<Value, RuntimeError> {
        let Value::Object(source) = value else {
            return Err(RuntimeError::mismatch("object", &value));
        };

        let target = Object::new();
        for field in fields {
            let (from, to) = match direction {
                Direction::ToHost => (&field.name, &field.host_name),
                Direction::ToOrigin => (&field.host_name, &field.name),
            };
            if field.mutable {
                let plan = field.plan;
                let (runtime, object, key) = (self.clone(), source.clone(), from.clone());
                let get = move || runtime.convert(direction, plan, object.get(&key)?);
                let (runtime, object, key) = (self.clone(), source.clone(), from.clone());
                let set = move |v: Value| {
                    let converted = runtime.convert(direction.flip(), plan, v)?;
                    object.set(&key, converted)
                };
                target.define_accessor(to.clone(), get, set);
            } else {
                let converted = self.convert(direction, field.plan, source.get(from)?)?;
                target.define(to.clone(), converted);
            }
        }
        Ok(Value::Object(target))
    }

    fn enumeration(
        &self,
        direction: Direction,
        table: &EnumTable,
        value: Value,
    ) -> Result<Value, RuntimeError> {
        match (direction, &value) {
            (Direction::ToHost, Value::Int(n)) => table
                .to_host(*n)
                .map(Value::str)
                .ok_or_else(|| RuntimeError::UnknownTag(n.to_string())),
            (Direction::ToOrigin, Value::String(s)) => table
                .to_origin(s)
                .map(|tag| Value::Int(tag.discriminant()))
                .ok_or_else(|| RuntimeError::UnknownTag(value.to_string())),
            (Direction::ToHost, _) => Err(RuntimeError::mismatch("number", &value)),
            (Direction::ToOrigin, _) => Err(RuntimeError::mismatch("string", &value)),
        }
    }

    fn variant_to_host(&self, variant: &VariantPlan, value: Value) -> Result<Value, RuntimeError> {
        let (case, payload) = match value {
            Value::Int(n) => {
                let case = variant
                    .constant(n)
                    .ok_or_else(|| RuntimeError::UnknownTag(n.to_string()))?;
                (case, Vec::new())
            }
            Value::Block { tag, fields } if !variant.polymorphic => {
                let case = variant
                    .block(i64::from(tag))
                    .ok_or_else(|| RuntimeError::UnknownTag(format!("block {tag}")))?;
                (case, fields)
            }
            Value::Poly { hash, value } if variant.polymorphic => {
                let case = variant
                    .block(i64::from(hash))
                    .ok_or_else(|| RuntimeError::UnknownTag(hash.to_string()))?;
                let payload = match (case.payload.len(), *value) {
                    (1, single) => vec![single],
                    (_, Value::Array(items)) => items,
                    (_, other) => return Err(RuntimeError::mismatch("array", &other)),
                };
                (case, payload)
            }
            other => return Err(RuntimeError::mismatch("variant", &other)),
        };

        if payload.len() != case.payload.len() {
            return Err(RuntimeError::TypeMismatch {
                expected: "payload of the declared arity",
                found: format!("{} values", payload.len()),
            });
        }

        let host = Object::new();
        host.define("tag", Value::str(&case.host_tag));
        let mut values = payload
            .into_iter()
            .zip(&case.payload)
            .map(|(v, &p)| self.to_host(p, v))
            .collect::<Result<Vec<_>, _>>()?;
        match values.len() {
            0 => {}
            1 => host.define("value", values.remove(0)),
            _ => host.define("value", Value::Array(values)),
        }
        Ok(Value::Object(host))
    }

    fn variant_to_origin(
        &self,
        variant: &VariantPlan,
        value: Value,
    ) -> Result<Value, RuntimeError> {
        let Value::Object(host) = &value else {
            return Err(RuntimeError::mismatch("object", &value));
        };
        let tag = host.get("tag")?;
        let Value::String(tag_name) = &tag else {
            return Err(RuntimeError::UnknownTag(tag.to_string()));
        };
        let case = variant
            .by_host_tag(tag_name)
            .ok_or_else(|| RuntimeError::UnknownTag(tag.to_string()))?;

        let raw = host.get("value")?;
        let payload = match case.payload.len() {
            0 => Vec::new(),
            1 => vec![raw],
            n => match raw {
                Value::Array(items) if items.len() == n => items,
                other => return Err(RuntimeError::mismatch("tuple", &other)),
            },
        };
        let mut values = payload
            .into_iter()
            .zip(&case.payload)
            .map(|(v, &p)| self.to_origin(p, v))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(match case.origin {
            OriginTag::Constant(n) => Value::Int(i64::from(n)),
            OriginTag::Block(n) => Value::Block {
                tag: n,
                fields: values,
            },
            OriginTag::Hash(h) if values.is_empty() => Value::Int(i64::from(h)),
            OriginTag::Hash(h) => {
                let value = if values.len() == 1 {
                    values.remove(0)
                } else {
                    Value::Array(values)
                };
                Value::Poly {
                    hash: h,
                    value: Box::new(value),
                }
            }
        })
    }

    /// Wrap an origin function for host callers.
    fn host_callable(&self, func: &FunctionPlan, origin: Function) -> Value {
        let runtime = self.clone();
        let func = func.clone();
        Value::function(func.adapter.host_arity(), move |args| {
            runtime.call_origin(&func, &origin, args)
        })
    }

    /// Wrap a host function so the origin can call it.
    fn origin_callable(&self, func: &FunctionPlan, host: Function) -> Value {
        let runtime = self.clone();
        let func = func.clone();
        let arity = match func.adapter.convention {
            Convention::Component => 1,
            _ => func.adapter.slots.len(),
        };
        Value::function(arity, move |args| runtime.call_host(&func, &host, args))
    }

    fn call_origin(
        &self,
        func: &FunctionPlan,
        origin: &Function,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        self.tracer.trace_call(args.len());
        let adapter = &func.adapter;
        let options_index = match adapter.convention {
            Convention::Component => 0,
            _ => adapter.positional_count(),
        };
        let options = args.get(options_index).cloned().unwrap_or(Value::Undefined);

        let props = Object::new();
        let mut origin_args = Vec::with_capacity(adapter.slots.len());
        for (slot, &plan) in adapter.slots.iter().zip(&func.params) {
            match slot {
                ArgSlot::Positional(k) => {
                    let arg = args.get(*k).cloned().unwrap_or(Value::Undefined);
                    origin_args.push(self.to_origin(plan, arg)?);
                }
                ArgSlot::Labeled { name, optional } => {
                    let raw = match &options {
                        Value::Object(obj) => obj.get(name)?,
                        _ => Value::Undefined,
                    };
                    let value = if *optional && raw.is_nullish() {
                        Value::Undefined
                    } else {
                        self.to_origin(plan, raw)?
                    };
                    props.define(name.clone(), value.clone());
                    origin_args.push(value);
                }
                ArgSlot::Unit => origin_args.push(Value::Undefined),
            }
        }

        let result = match adapter.convention {
            Convention::Component if adapter.has_labels() || adapter.positional_count() == 0 => {
                origin.call(vec![Value::Object(props)])?
            }
            Convention::Component => {
                origin_args.truncate(1);
                origin.call(origin_args)?
            }
            Convention::Uncurried => origin.call(origin_args)?,
            Convention::Curried => curry::apply(origin, origin_args)?,
        };
        self.to_host(func.result, result)
    }

    fn call_host(
        &self,
        func: &FunctionPlan,
        host: &Function,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        self.tracer.trace_call(args.len());
        let adapter = &func.adapter;
        if adapter.convention == Convention::Component {
            return self.render_host(func, host, args);
        }
        let options = Object::new();
        let mut host_args = Vec::new();

        for (i, (slot, &plan)) in adapter.slots.iter().zip(&func.params).enumerate() {
            let arg = args.get(i).cloned().unwrap_or(Value::Undefined);
            match slot {
                ArgSlot::Positional(_) => host_args.push(self.to_host(plan, arg)?),
                ArgSlot::Labeled { name, optional } => {
                    let value = if *optional && matches!(arg, Value::Undefined) {
                        Value::Undefined
                    } else {
                        self.to_host(plan, arg)?
                    };
                    options.define(name.clone(), value);
                }
                ArgSlot::Unit => {}
            }
        }
        if adapter.has_labels() {
            host_args.push(Value::Object(options));
        }

        let result = host.call(host_args)?;
        self.to_origin(func.result, result)
    }

    /// Render a host component with the props object the origin passed.
    fn render_host(
        &self,
        func: &FunctionPlan,
        host: &Function,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let adapter = &func.adapter;
        let arg = args.into_iter().next().unwrap_or(Value::Undefined);
        let slots = adapter.slots.iter().zip(&func.params);

        let props = if adapter.has_labels() || adapter.positional_count() == 0 {
            let props = Object::new();
            for (slot, &plan) in slots {
                let ArgSlot::Labeled { name, optional } = slot else {
                    continue;
                };
                let raw = match &arg {
                    Value::Object(obj) => obj.get(name)?,
                    _ => Value::Undefined,
                };
                let value = if *optional && matches!(raw, Value::Undefined) {
                    Value::Undefined
                } else {
                    self.to_host(plan, raw)?
                };
                props.define(name.clone(), value);
            }
            Value::Object(props)
        } else {
            let plan = slots
                .filter(|(slot, _)| matches!(slot, ArgSlot::Positional(_)))
                .map(|(_, &plan)| plan)
                .next()
                .unwrap_or(PlanId::IDENTITY);
            self.to_host(plan, arg)?
        };

        let result = host.call(vec![props])?;
        self.to_origin(func.result, result)
    }
}
