//! Deferred computations.

use std::fmt;
use std::sync::Arc;

use super::{Value, ValueType};

/// Signature of a lazy computation.
pub type LazyFn = dyn Fn() -> Value + Send + Sync;

/// A computation producing a `Value` on demand.
///
/// `invariant` marks the computation as pure: it may run any number of
/// times and take part in equality. A non-invariant computation is opaque;
/// comparison and resolution leave it untouched so its side effects only
/// happen when output is produced.
#[derive(Clone)]
pub struct LazyValue {
    compute: Arc<LazyFn>,
    returns: ValueType,
    invariant: bool,
}

impl LazyValue {
    pub fn new(
        returns: ValueType,
        invariant: bool,
        compute: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Self {
        LazyValue {
            compute: Arc::new(compute),
            returns,
            invariant,
        }
    }

    /// Declared result type.
    #[inline]
    pub fn returns(&self) -> ValueType {
        self.returns
    }

    #[inline]
    pub fn is_invariant(&self) -> bool {
        self.invariant
    }

    /// Run the computation. Callers are responsible for checking
    /// `is_invariant` where determinism matters.
    #[inline]
    pub fn call(&self) -> Value {
        (self.compute)()
    }
}

impl fmt::Debug for LazyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, invariant: {}", self.returns, self.invariant)
    }
}
