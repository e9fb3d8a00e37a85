//! Template body nodes.

use std::fmt;

use crate::parameter::ParameterDeclaration;

/// One node of a parsed template body.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Syntax {
    /// Literal text, emitted verbatim.
    Raw(String),
    /// Interpolated expression, e.g. `#(user.name)`.
    Expression(Vec<ParameterDeclaration>),
    /// `if` / `elseif` / `else` chain.
    Conditional(Conditional),
    /// `for item in path` loop.
    Loop(Loop),
    /// Invocation of a registered custom tag.
    Custom(TagDeclaration),

    // Composition directives. These are eliminated by the resolution pass
    // that runs before rendering.
    Import(Import),
    Extend(Extend),
    Export(Export),
}

impl Syntax {
    /// Raw text node.
    pub fn raw(text: impl Into<String>) -> Self {
        Syntax::Raw(text.into())
    }

    /// Interpolation of a single parameter.
    pub fn expr(param: ParameterDeclaration) -> Self {
        Syntax::Expression(vec![param])
    }

    /// Interpolation of a variable path.
    pub fn variable(path: impl Into<String>) -> Self {
        Syntax::expr(ParameterDeclaration::variable(path))
    }

    /// Whether this node is an import/extend/export directive.
    pub fn is_composition_directive(&self) -> bool {
        matches!(self, Syntax::Import(_) | Syntax::Extend(_) | Syntax::Export(_))
    }

    /// Short node-kind name, used in traces.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Syntax::Raw(_) => "raw",
            Syntax::Expression(_) => "expression",
            Syntax::Conditional(_) => "conditional",
            Syntax::Loop(_) => "loop",
            Syntax::Custom(_) => "custom",
            Syntax::Import(_) => "import",
            Syntax::Extend(_) => "extend",
            Syntax::Export(_) => "export",
        }
    }
}

/// A custom tag invocation: name, parameters, and an optional body.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TagDeclaration {
    pub name: String,
    pub params: Vec<ParameterDeclaration>,
    /// `None` for inline tags, `Some` for tags with a `:` ... `#end` body.
    pub body: Option<Vec<Syntax>>,
}

impl TagDeclaration {
    /// Tag without a body.
    pub fn new(name: impl Into<String>, params: Vec<ParameterDeclaration>) -> Self {
        TagDeclaration {
            name: name.into(),
            params,
            body: None,
        }
    }

    /// Attach a body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<Syntax>) -> Self {
        self.body = Some(body);
        self
    }
}

impl fmt::Display for TagDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, ")")
    }
}

/// A conditional chain. Clauses are tried in order; the first whose
/// condition holds renders its body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Conditional {
    pub chain: Vec<ConditionalClause>,
}

impl Conditional {
    pub fn new(chain: Vec<ConditionalClause>) -> Self {
        Conditional { chain }
    }
}

/// One `(condition, body)` alternative.
///
/// An `else` clause is represented with a literal `true` condition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConditionalClause {
    pub condition: Vec<ParameterDeclaration>,
    pub body: Vec<Syntax>,
}

impl ConditionalClause {
    pub fn new(condition: Vec<ParameterDeclaration>, body: Vec<Syntax>) -> Self {
        ConditionalClause { condition, body }
    }
}

/// `for item in array` loop.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Loop {
    /// Name the current element is bound to inside the body.
    pub item: String,
    /// Dotted context path of the array, e.g. `a.b.items`.
    pub array: String,
    pub body: Vec<Syntax>,
}

impl Loop {
    pub fn new(item: impl Into<String>, array: impl Into<String>, body: Vec<Syntax>) -> Self {
        Loop {
            item: item.into(),
            array: array.into(),
            body,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Import {
    pub key: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Extend {
    pub key: String,
    pub exports: Vec<Export>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Export {
    pub key: String,
    pub body: Vec<Syntax>,
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "import({:?})", self.key)
    }
}

impl fmt::Display for Extend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "extend({:?})", self.key)
    }
}

impl fmt::Display for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "export({:?})", self.key)
    }
}
