//! Quill IR - syntax nodes handed to the render core.
//!
//! This crate contains the data produced by the template parser and
//! consumed by `quill_eval`:
//! - `Syntax`: one node of a template body (raw text, interpolation,
//!   conditional chain, loop, custom tag, composition directive)
//! - `ParameterDeclaration`: the expression parameters attached to a node
//!
//! # Design Philosophy
//!
//! - **Plain data**: no behavior beyond construction and display; the
//!   parser and the parameter grammar live elsewhere.
//! - **Hashable**: every type derives `Eq + Hash`, so floating-point
//!   constants are stored as `u64` bits.

mod parameter;
mod syntax;

pub use parameter::{Constant, Keyword, Parameter, ParameterDeclaration};
pub use syntax::{
    Conditional, ConditionalClause, Export, Extend, Import, Loop, Syntax, TagDeclaration,
};
