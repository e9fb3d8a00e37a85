//! Runtime values for the Quill render core.
//!
//! # Construction
//!
//! Heap-backed variants (strings, bytes, arrays, maps, present optionals)
//! are built through factory methods on `Value`; `Heap::new` is private to
//! this module.
//!
//! ```text
//! let s = Value::string("hello");
//! let list = Value::array(vec![Value::Int(1), Value::Int(2)]);
//! let none = Value::nil(ValueType::Int);
//! let later = Value::lazy(ValueType::Int, true, || Value::Int(42));
//! ```
//!
//! # Equality
//!
//! Equality is strict-typed and never runs a non-invariant computation.
//! See the `PartialEq` impl.

mod heap;
mod lazy;
mod value_type;

use std::fmt;

use rustc_hash::FxHashMap;

pub use heap::Heap;
pub use lazy::{LazyFn, LazyValue};
pub use value_type::ValueType;

/// Runtime value visible to templates.
#[derive(Clone)]
pub enum Value {
    // Scalars (inline)
    Bool(bool),
    Int(i64),
    Double(f64),

    // Heap scalars
    Str(Heap<String>),
    Bytes(Heap<Vec<u8>>),

    // Containers
    Array(Heap<Vec<Value>>),
    Map(Heap<FxHashMap<String, Value>>),

    /// Explicitly present-or-absent slot. `inner: None` is nil, which is
    /// distinct from a key that was never set.
    Optional {
        inner: Option<Heap<Value>>,
        declared: ValueType,
    },

    /// Deferred computation.
    Lazy(LazyValue),
}

// Factory Methods

impl Value {
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    #[inline]
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(Heap::new(data.into()))
    }

    #[inline]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Heap::new(items))
    }

    #[inline]
    pub fn map(entries: FxHashMap<String, Value>) -> Self {
        Value::Map(Heap::new(entries))
    }

    /// Absent value of the given declared type.
    #[inline]
    pub fn nil(declared: ValueType) -> Self {
        Value::Optional {
            inner: None,
            declared,
        }
    }

    /// Nil with no known type.
    #[inline]
    pub fn true_nil() -> Self {
        Value::nil(ValueType::Void)
    }

    /// Optional slot, present or absent.
    ///
    /// A present value keeps `declared` as its reported type; callers are
    /// expected to pass the inner value's concrete type.
    #[inline]
    pub fn optional(inner: Option<Value>, declared: ValueType) -> Self {
        Value::Optional {
            inner: inner.map(Heap::new),
            declared,
        }
    }

    /// Deferred computation with a declared result type.
    ///
    /// `invariant` must only be `true` for pure computations.
    #[inline]
    pub fn lazy(
        returns: ValueType,
        invariant: bool,
        compute: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Self {
        Value::Lazy(LazyValue::new(returns, invariant, compute))
    }
}

// Inspection

impl Value {
    /// The concrete type, without running any computation.
    pub fn concrete_type(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Double(_) => ValueType::Double,
            Value::Str(_) => ValueType::String,
            Value::Bytes(_) => ValueType::Bytes,
            Value::Array(_) => ValueType::Array,
            Value::Map(_) => ValueType::Map,
            Value::Optional { declared, .. } => *declared,
            Value::Lazy(lazy) => lazy.returns(),
        }
    }

    /// Type name for error messages.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.concrete_type().as_str()
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Optional { inner: None, .. })
    }

    /// A lazy value or a present optional.
    #[inline]
    fn is_wrapped(&self) -> bool {
        matches!(
            self,
            Value::Lazy(_)
                | Value::Optional {
                    inner: Some(_),
                    ..
                }
        )
    }

    #[inline]
    pub fn is_lazy(&self) -> bool {
        matches!(self, Value::Lazy(_))
    }

    /// Whether every computation reachable from this value is pure.
    ///
    /// Containers and present optionals are invariant iff everything they
    /// hold is.
    pub fn is_invariant(&self) -> bool {
        match self {
            Value::Lazy(lazy) => lazy.is_invariant(),
            Value::Array(items) => items.iter().all(Value::is_invariant),
            Value::Map(entries) => entries.values().all(Value::is_invariant),
            Value::Optional {
                inner: Some(inner), ..
            } => inner.is_invariant(),
            _ => true,
        }
    }

    /// Get as bool, if this is a `Bool`. Does not look through laziness.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&FxHashMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(&**entries),
            _ => None,
        }
    }

    /// Take the array storage, if this is an `Array`.
    pub fn into_array(self) -> Option<Heap<Vec<Value>>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Take the map storage, if this is a `Map`.
    pub fn into_map(self) -> Option<Heap<FxHashMap<String, Value>>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

// Resolution

impl Value {
    /// Force invariant computations.
    ///
    /// Non-invariant values are returned unchanged. Otherwise a lazy value
    /// runs and its result is resolved, a present optional is unwrapped one
    /// level, and containers are rebuilt with each element resolved.
    #[must_use]
    pub fn resolve(&self) -> Value {
        if !self.is_invariant() {
            return self.clone();
        }
        match self {
            Value::Lazy(lazy) => lazy.call().resolve(),
            Value::Optional {
                inner: Some(inner), ..
            } => Value::clone(inner),
            Value::Array(items) => Value::array(items.iter().map(Value::resolve).collect()),
            Value::Map(entries) => Value::map(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.resolve()))
                    .collect(),
            ),
            _ => self.clone(),
        }
    }

    /// The value as observed by output: computations run regardless of
    /// invariance and present optionals are unwrapped, until a concrete
    /// value or nil remains.
    ///
    /// Used by conditions and path lookups. Never used by equality.
    #[must_use]
    pub fn forced(&self) -> Value {
        let mut current = self.clone();
        loop {
            current = match current {
                Value::Lazy(lazy) => lazy.call(),
                Value::Optional {
                    inner: Some(inner), ..
                } => Value::clone(&inner),
                settled => return settled,
            };
        }
    }

    /// Condition truthiness: `true`, or any non-nil non-bool value.
    pub fn is_truthy(&self) -> bool {
        match self.forced() {
            Value::Bool(b) => b,
            other => !other.is_nil(),
        }
    }

    /// Wrap in an optional carrying this value's concrete type.
    /// Optionals are returned unchanged.
    #[must_use]
    pub fn wrap_optional(self) -> Value {
        match self {
            optional @ Value::Optional { .. } => optional,
            other => {
                let declared = other.concrete_type();
                Value::Optional {
                    inner: Some(Heap::new(other)),
                    declared,
                }
            }
        }
    }

    /// The wrapped value of an optional (nil stays nil); anything else is
    /// returned unchanged.
    #[must_use]
    pub fn unwrap_optional(self) -> Value {
        match self {
            Value::Optional {
                inner: Some(inner), ..
            } => Value::clone(&inner),
            other => other,
        }
    }
}

// Trait Implementations

impl PartialEq for Value {
    /// Strict-typed equality.
    ///
    /// - a side holding a non-invariant computation is unequal to
    ///   everything, and the computation is not run
    /// - lazy values and present optionals are resolved first, so an
    ///   invariant computation producing nil equals nil; when both sides
    ///   are wrapped their declared types must also match
    /// - nil equals nil whatever the declared types, and nothing else
    /// - differing concrete types are unequal
    /// - containers compare element by element
    fn eq(&self, other: &Self) -> bool {
        if self.is_wrapped() || other.is_wrapped() {
            if !self.is_invariant() || !other.is_invariant() {
                return false;
            }
            if self.is_wrapped()
                && other.is_wrapped()
                && self.concrete_type() != other.concrete_type()
            {
                return false;
            }
            // Each resolve removes one layer.
            return self.resolve() == other.resolve();
        }
        if self.is_nil() || other.is_nil() {
            return self.is_nil() && other.is_nil();
        }
        if self.concrete_type() != other.concrete_type() {
            return false;
        }
        if !self.is_invariant() || !other.is_invariant() {
            return false;
        }
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len() && a.iter().all(|(k, v)| b.get(k).is_some_and(|bv| v == bv))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Double(d) => write!(f, "Double({d:?})"),
            Value::Str(s) => write!(f, "Str({:?})", &**s),
            Value::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            Value::Array(items) => write!(f, "Array({:?})", &**items),
            Value::Map(entries) => {
                let mut sorted: Vec<_> = entries.iter().collect();
                sorted.sort_unstable_by_key(|&(key, _)| key);
                write!(f, "Map(")?;
                f.debug_map().entries(sorted).finish()?;
                write!(f, ")")
            }
            Value::Optional {
                inner: Some(inner),
                declared,
            } => write!(f, "Optional({declared}, {:?})", &**inner),
            Value::Optional {
                inner: None,
                declared,
            } => write!(f, "Nil({declared})"),
            Value::Lazy(lazy) => write!(f, "Lazy({lazy:?})"),
        }
    }
}

impl fmt::Display for Value {
    /// Debug-oriented rendering. Never runs computations; template output
    /// goes through `serialize_to_text` instead.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Double(d) => write!(f, "{d:?}"),
            Value::Str(s) => write!(f, "\"{}\"", &**s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
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
            Value::Map(entries) => {
                let mut sorted: Vec<_> = entries.iter().collect();
                sorted.sort_unstable_by_key(|&(key, _)| key);
                write!(f, "[")?;
                for (i, (key, value)) in sorted.into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "]")
            }
            Value::Optional {
                inner: Some(inner), ..
            } => write!(f, "{}", &**inner),
            Value::Optional { inner: None, .. } => write!(f, "nil"),
            Value::Lazy(lazy) => write!(f, "<lazy {}>", lazy.returns()),
        }
    }
}

// Conversions

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<usize> for Value {
    /// Saturates at `i64::MAX`.
    fn from(n: usize) -> Self {
        Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(data: Vec<u8>) -> Self {
        Value::bytes(data)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl From<FxHashMap<String, Value>> for Value {
    fn from(entries: FxHashMap<String, Value>) -> Self {
        Value::map(entries)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    /// `None` becomes a true nil since no type is known for it.
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into().wrap_optional(),
            None => Value::true_nil(),
        }
    }
}
