//! Expression parameters attached to syntax nodes.
//!
//! The grammar that produces these lives in the parser. The render core
//! never inspects them itself; it hands them to a `ParameterResolver`.

use std::fmt;

use crate::syntax::TagDeclaration;

/// Numeric literal.
///
/// Doubles are stored as `u64` bits so the type stays `Eq + Hash`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Constant {
    Int(i64),
    Double(u64),
}

impl Constant {
    /// Create a double constant from an `f64`.
    #[inline]
    pub fn double(value: f64) -> Self {
        Constant::Double(value.to_bits())
    }

    /// The constant as an `f64`, converting integers.
    #[expect(
        clippy::cast_precision_loss,
        reason = "integer literals above 2^53 lose precision like any f64 conversion"
    )]
    pub fn as_f64(self) -> f64 {
        match self {
            Constant::Int(n) => n as f64,
            Constant::Double(bits) => f64::from_bits(bits),
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(n) => write!(f, "{n}"),
            Constant::Double(bits) => write!(f, "{:?}", f64::from_bits(*bits)),
        }
    }
}

/// Reserved words usable as parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    True,
    False,
    Nil,
    /// The whole current context.
    SelfContext,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Nil => "nil",
            Keyword::SelfContext => "self",
        }
    }
}

/// A single atomic parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Parameter {
    Constant(Constant),
    StringLiteral(String),
    Keyword(Keyword),
    /// Dotted path into the context, e.g. `user.name`.
    Variable(String),
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Constant(c) => write!(f, "{c}"),
            Parameter::StringLiteral(s) => write!(f, "{s:?}"),
            Parameter::Keyword(k) => f.write_str(k.as_str()),
            Parameter::Variable(path) => f.write_str(path),
        }
    }
}

/// One entry of a parameter list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParameterDeclaration {
    Parameter(Parameter),
    /// Parenthesized group.
    Expression(Vec<ParameterDeclaration>),
    /// Nested tag invocation, e.g. `lowercased(name)`.
    Tag(TagDeclaration),
}

impl ParameterDeclaration {
    /// Variable reference by dotted path.
    pub fn variable(path: impl Into<String>) -> Self {
        ParameterDeclaration::Parameter(Parameter::Variable(path.into()))
    }

    /// String literal.
    pub fn string(value: impl Into<String>) -> Self {
        ParameterDeclaration::Parameter(Parameter::StringLiteral(value.into()))
    }

    /// Integer literal.
    pub fn int(value: i64) -> Self {
        ParameterDeclaration::Parameter(Parameter::Constant(Constant::Int(value)))
    }

    /// Double literal.
    pub fn double(value: f64) -> Self {
        ParameterDeclaration::Parameter(Parameter::Constant(Constant::double(value)))
    }

    /// Keyword literal.
    pub fn keyword(keyword: Keyword) -> Self {
        ParameterDeclaration::Parameter(Parameter::Keyword(keyword))
    }

    /// Parenthesized group.
    pub fn group(inner: Vec<ParameterDeclaration>) -> Self {
        ParameterDeclaration::Expression(inner)
    }

    /// Nested tag invocation without a body.
    pub fn tag(name: impl Into<String>, params: Vec<ParameterDeclaration>) -> Self {
        ParameterDeclaration::Tag(TagDeclaration::new(name, params))
    }
}

impl fmt::Display for ParameterDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterDeclaration::Parameter(p) => write!(f, "{p}"),
            ParameterDeclaration::Expression(inner) => {
                write!(f, "(")?;
                for (i, param) in inner.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ")")
            }
            ParameterDeclaration::Tag(tag) => write!(f, "{tag}"),
        }
    }
}
