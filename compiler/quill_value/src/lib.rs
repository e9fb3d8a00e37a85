#![allow(
    clippy::result_large_err,
    reason = "EvalError is returned everywhere; boxing it would spread through every signature"
)]
//! Quill Value - runtime values for the Quill render core.
//!
//! This crate provides:
//! - Runtime value types (`Value`, `ValueType`, `LazyValue`, `Heap`)
//! - Evaluation error types (`EvalError`, `EvalErrorKind`, `EvalResult`)
//! - Output formatting configuration (`FormatConfig`, `Formatters`, `TextEncoding`)
//!
//! # Laziness and Invariance
//!
//! A `Value::Lazy` defers a computation. Its `invariant` flag states whether
//! the computation is pure. Comparison and resolution never invoke a
//! non-invariant computation; output paths (`serialize_to_text`, `forced`)
//! always do, since emitting text is the point of rendering.

mod errors;
mod format;
mod value;

pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use format::{FormatConfig, Formatters, TextEncoding};
pub use value::{Heap, LazyFn, LazyValue, Value, ValueType};

// Re-export error constructors for use by other crates
pub use errors::{
    // Resolution contract errors
    empty_parameter_statement,
    expected_array,
    expected_dictionary,
    // Tag contract errors
    missing_body,
    multiple_values,
    // Serialization errors
    serialization_failed,
    unexpected_body,
    unresolved_directive,
    wrong_parameter_count,
};
