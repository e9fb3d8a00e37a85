//! Concrete type tags.

use std::fmt;

/// The concrete type of a `Value`.
///
/// Always determinable without running a lazy computation: optional and
/// lazy values report the type they declare.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    String,
    Int,
    Double,
    Bytes,
    Array,
    Map,
    /// Declared type of a nil with no known type.
    Void,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::String => "string",
            ValueType::Int => "int",
            ValueType::Double => "double",
            ValueType::Bytes => "bytes",
            ValueType::Array => "array",
            ValueType::Map => "dictionary",
            ValueType::Void => "void",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
