//! Error types for rendering.
//!
//! # Structured Error Categories
//!
//! `EvalErrorKind` carries the typed category; factory functions
//! (e.g. `expected_array()`) are the public API and fill both `kind` and
//! `message`.

use crate::value::Value;
use std::fmt;

/// Result of evaluating something down to a single value.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Resolution contract
    /// An import/extend/export directive reached the render stage.
    UnresolvedDirective {
        directive: String,
    },
    ExpectedDictionary {
        path: String,
    },
    ExpectedArray {
        path: String,
    },
    EmptyParameterStatement,
    MultipleValues {
        count: usize,
    },

    // Serialization
    SerializationFailed {
        type_name: String,
    },

    // Tag contract, raised by tag helpers on behalf of tag implementations
    ArityMismatch {
        tag: String,
        expected: usize,
        got: usize,
    },
    MissingBody {
        tag: String,
    },
    UnexpectedBody {
        tag: String,
    },

    /// Free-form error, mostly from tag implementations.
    Custom {
        message: String,
    },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedDirective { directive } => {
                write!(f, "{directive} should have been resolved before rendering")
            }
            Self::ExpectedDictionary { path } => write!(f, "expected dictionary at key: {path}"),
            Self::ExpectedArray { path } => write!(f, "expected array at key: {path}"),
            Self::EmptyParameterStatement => write!(f, "parameter statement can't be empty"),
            Self::MultipleValues { count } => {
                write!(f, "expression must hold a single value, got {count}")
            }
            Self::SerializationFailed { type_name } => {
                write!(f, "unable to serialize {type_name} value")
            }
            Self::ArityMismatch {
                tag,
                expected,
                got,
            } => {
                let param_word = if *expected == 1 {
                    "parameter"
                } else {
                    "parameters"
                };
                write!(f, "#{tag} expects {expected} {param_word}, got {got}")
            }
            Self::MissingBody { tag } => write!(f, "#{tag} requires a body"),
            Self::UnexpectedBody { tag } => write!(f, "#{tag} does not accept a body"),
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// Render error.
#[derive(Clone, Debug)]
pub struct EvalError {
    /// Structured error category. `EvalError::new(msg)` uses `Custom`.
    pub kind: EvalErrorKind,
    /// Human-readable message; equals `kind.to_string()`.
    pub message: String,
}

impl EvalError {
    /// Create an error with just a message.
    ///
    /// Uses `Custom` kind. Prefer specific factory functions when a
    /// structured kind is available.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
        }
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }

    /// Whether this error came from value serialization.
    #[inline]
    pub fn is_serialization_failure(&self) -> bool {
        matches!(self.kind, EvalErrorKind::SerializationFailed { .. })
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

// Resolution Contract Errors

/// A composition directive survived until rendering.
#[cold]
pub fn unresolved_directive(directive: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnresolvedDirective {
        directive: directive.to_string(),
    })
}

/// A loop path prefix did not name a dictionary.
#[cold]
pub fn expected_dictionary(path: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ExpectedDictionary {
        path: path.to_string(),
    })
}

/// A loop path did not name an array.
#[cold]
pub fn expected_array(path: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ExpectedArray {
        path: path.to_string(),
    })
}

/// A single-value expression resolved to nothing.
#[cold]
pub fn empty_parameter_statement() -> EvalError {
    EvalError::from_kind(EvalErrorKind::EmptyParameterStatement)
}

/// A single-value expression resolved to several values.
#[cold]
pub fn multiple_values(count: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MultipleValues { count })
}

// Serialization Errors

#[cold]
pub fn serialization_failed(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::SerializationFailed {
        type_name: type_name.to_string(),
    })
}

// Tag Contract Errors

#[cold]
pub fn wrong_parameter_count(tag: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        tag: tag.to_string(),
        expected,
        got,
    })
}

#[cold]
pub fn missing_body(tag: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingBody {
        tag: tag.to_string(),
    })
}

#[cold]
pub fn unexpected_body(tag: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnexpectedBody {
        tag: tag.to_string(),
    })
}
