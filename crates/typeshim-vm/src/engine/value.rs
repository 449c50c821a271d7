//! Dynamic JavaScript values.
//!
//! One model serves both sides of the boundary: origin values use `Block`,
//! `Poly`, and `NestedNone` for the compiled representation of variants and
//! nested options, host values use plain objects and strings.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use typeshim_core::utils::{property_key, quote_string};

use super::error::RuntimeError;

type NativeFn = dyn Fn(Vec<Value>) -> Result<Value, RuntimeError>;
type Getter = dyn Fn() -> Result<Value, RuntimeError>;
type Setter = dyn Fn(Value) -> Result<(), RuntimeError>;

#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(Object),
    /// Payload case of an ordinary variant: `{TAG: tag, _0, _1, ...}`.
    Block { tag: u32, fields: Vec<Value> },
    /// Payload case of a polymorphic variant: `{NAME: hash, VAL: value}`.
    Poly { hash: i32, value: Box<Value> },
    /// The origin's `Some(None)` marker.
    NestedNone,
    Function(Function),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Object(Object::from_fields(fields))
    }

    pub fn function(
        arity: usize,
        f: impl Fn(Vec<Value>) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        Value::Function(Function::new(arity, f))
    }

    /// `undefined` or `null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Runtime kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::Float(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Block { .. } => "variant block",
            Value::Poly { .. } => "polymorphic variant",
            Value::NestedNone => "nested none marker",
            Value::Function(_) => "function",
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    /// Structural equality. Objects compare by their current field values,
    /// functions by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined)
            | (Value::Null, Value::Null)
            | (Value::NestedNone, Value::NestedNone) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.same_fields(b),
            (
                Value::Block { tag: t1, fields: f1 },
                Value::Block { tag: t2, fields: f2 },
            ) => t1 == t2 && f1 == f2,
            (Value::Poly { hash: h1, value: v1 }, Value::Poly { hash: h2, value: v2 }) => {
                h1 == h2 && v1 == v2
            }
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{}", quote_string(s)),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Object(obj) => {
                let keys = obj.keys();
                if keys.is_empty() {
                    return write!(f, "{{}}");
                }
                write!(f, "{{")?;
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    match obj.get(key) {
                        Ok(value) => write!(f, " {}: {value}", property_key(key))?,
                        Err(err) => write!(f, " {}: <{err}>", property_key(key))?,
                    }
                }
                write!(f, " }}")
            }
            Value::Block { tag, fields } => {
                write!(f, "{{TAG: {tag}")?;
                for (i, field) in fields.iter().enumerate() {
                    write!(f, ", _{i}: {field}")?;
                }
                write!(f, "}}")
            }
            Value::Poly { hash, value } => write!(f, "{{NAME: {hash}, VAL: {value}}}"),
            Value::NestedNone => write!(f, "{{BS_PRIVATE_NESTED_SOME_NONE: 0}}"),
            Value::Function(func) => write!(f, "[Function/{}]", func.arity()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                let keys = obj.keys();
                let mut map = serializer.serialize_map(Some(keys.len()))?;
                for key in &keys {
                    let value = obj.get(key).map_err(S::Error::custom)?;
                    map.serialize_entry(key, &value)?;
                }
                map.end()
            }
            Value::Block { tag, fields } => {
                let mut map = serializer.serialize_map(Some(fields.len() + 1))?;
                map.serialize_entry("TAG", tag)?;
                for (i, field) in fields.iter().enumerate() {
                    map.serialize_entry(&format!("_{i}"), field)?;
                }
                map.end()
            }
            Value::Poly { hash, value } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("NAME", hash)?;
                map.serialize_entry("VAL", value)?;
                map.end()
            }
            Value::NestedNone => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("BS_PRIVATE_NESTED_SOME_NONE", &0)?;
                map.end()
            }
            Value::Function(_) => Err(S::Error::custom("functions cannot be serialized")),
        }
    }
}

/// Callable value with a declared arity (JavaScript's `length`).
#[derive(Clone)]
pub struct Function {
    arity: usize,
    call: Rc<NativeFn>,
}

impl Function {
    pub fn new(
        arity: usize,
        f: impl Fn(Vec<Value>) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        Self {
            arity,
            call: Rc::new(f),
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Call with exactly the given arguments, like `f(...args)`.
    pub fn call(&self, args: Vec<Value>) -> Result<Value, RuntimeError> {
        (self.call)(args)
    }

    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.call, &other.call)
    }
}

#[derive(Clone)]
enum Slot {
    Data(Value),
    Accessor { get: Rc<Getter>, set: Rc<Setter> },
}

/// Shared, ordered property bag. Clones alias the same object.
#[derive(Clone, Default)]
pub struct Object(Rc<RefCell<Vec<(String, Slot)>>>);

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        let obj = Self::new();
        for (key, value) in fields {
            obj.define(key, value);
        }
        obj
    }

    /// Define or replace a data property.
    pub fn define(&self, key: impl Into<String>, value: Value) {
        self.insert(key.into(), Slot::Data(value));
    }

    /// Define a property whose reads and writes run the given functions.
    pub fn define_accessor(
        &self,
        key: impl Into<String>,
        get: impl Fn() -> Result<Value, RuntimeError> + 'static,
        set: impl Fn(Value) -> Result<(), RuntimeError> + 'static,
    ) {
        self.insert(
            key.into(),
            Slot::Accessor {
                get: Rc::new(get),
                set: Rc::new(set),
            },
        );
    }

    fn insert(&self, key: String, slot: Slot) {
        let mut entries = self.0.borrow_mut();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = slot,
            None => entries.push((key, slot)),
        }
    }

    fn slot(&self, key: &str) -> Option<Slot> {
        self.0
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, slot)| slot.clone())
    }

    /// Read a property. Missing properties read as `undefined`.
    pub fn get(&self, key: &str) -> Result<Value, RuntimeError> {
        match self.slot(key) {
            None => Ok(Value::Undefined),
            Some(Slot::Data(value)) => Ok(value),
            Some(Slot::Accessor { get, .. }) => get(),
        }
    }

    /// Write a property, running its setter if it has one.
    pub fn set(&self, key: &str, value: Value) -> Result<(), RuntimeError> {
        match self.slot(key) {
            Some(Slot::Accessor { set, .. }) => set(value),
            _ => {
                self.define(key, value);
                Ok(())
            }
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.borrow().iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn same_fields(&self, other: &Object) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let keys = self.keys();
        if keys != other.keys() {
            return false;
        }
        keys.iter()
            .all(|k| matches!((self.get(k), other.get(k)), (Ok(a), Ok(b)) if a == b))
    }
}
