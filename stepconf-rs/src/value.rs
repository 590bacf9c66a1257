//! Value model shared by the parser and the serializer.
//!
//! Every datum in a configuration file is one of six shapes.  Arrays and
//! dictionaries own their children; dictionaries (and the top-level
//! [`Document`]) keep keys in first-insertion order so output is stable.

use indexmap::IndexMap;

/// Ordered string-keyed mapping used for `begin … end` dictionaries.
pub type Dict = IndexMap<String, Value>;

/// A parsed configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<Value>),
    Dict(Dict),
    /// A bare identifier that did not name a constant.  Treated as a string.
    Ident(String),
}

impl Value {
    /// Name of the variant, as shown in operand errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Dict(_) => "dictionary",
            Value::Ident(_) => "identifier",
        }
    }

    /// Numeric view: integers widen to `f64`, everything else is `None`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    // ── Arithmetic helpers ────────────────────────────────────────────────────

    /// Integer op when both sides are integers, float op when both are
    /// numeric, `None` otherwise.
    fn numeric_op(
        &self,
        rhs: &Value,
        int_op: fn(i64, i64) -> i64,
        float_op: fn(f64, f64) -> f64,
    ) -> Option<Value> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Some(Value::Int(int_op(*a, *b))),
            _ => Some(Value::Float(float_op(self.as_float()?, rhs.as_float()?))),
        }
    }

    /// `self + rhs`.  Integer addition wraps on overflow.
    pub fn try_add(&self, rhs: &Value) -> Option<Value> {
        self.numeric_op(rhs, i64::wrapping_add, |a, b| a + b)
    }

    /// `self * rhs`.  Integer multiplication wraps on overflow.
    pub fn try_mul(&self, rhs: &Value) -> Option<Value> {
        self.numeric_op(rhs, i64::wrapping_mul, |a, b| a * b)
    }
}

// ── Document ──────────────────────────────────────────────────────────────────

/// The result of one parse: top-level bindings in source order.
///
/// Rebinding a key replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: Dict,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or overwrite) a binding.  Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
