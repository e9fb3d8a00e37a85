//! Parameter resolution.
//!
//! Nodes carry `ParameterDeclaration`s; a `ParameterResolver` turns them
//! into values. The evaluator treats the resolver as a black box and only
//! checks how many values came back.

use quill_ir::{Constant, Keyword, Parameter, ParameterDeclaration};
use quill_value::{empty_parameter_statement, multiple_values, EvalError, EvalResult, Value};

use crate::evaluator::RenderEnv;
use crate::stack::with_stack_headroom;
use crate::tags::invoke_declaration;
use crate::Context;

/// Turns node parameters into values against a data context.
pub trait ParameterResolver: Send + Sync {
    fn resolve(
        &self,
        params: &[ParameterDeclaration],
        data: &Context,
        env: RenderEnv<'_>,
    ) -> Result<Vec<Value>, EvalError>;
}

/// Resolver over plain context lookups. It knows no operators.
///
/// Produces one value per top-level declaration:
///
/// | declaration      | value                                     |
/// |------------------|-------------------------------------------|
/// | constant         | `Int` or `Double`                         |
/// | string literal   | `Str`                                     |
/// | `true`/`false`   | `Bool`                                    |
/// | `nil`            | nil                                       |
/// | `self`           | the whole context as a map                |
/// | variable         | `lookup_path`; missing keys give nil      |
/// | group            | its single inner value                    |
/// | tag              | result of invoking the registered tag     |
#[derive(Copy, Clone, Debug, Default)]
pub struct ContextResolver;

impl ParameterResolver for ContextResolver {
    fn resolve(
        &self,
        params: &[ParameterDeclaration],
        data: &Context,
        env: RenderEnv<'_>,
    ) -> Result<Vec<Value>, EvalError> {
        params
            .iter()
            .map(|param| self.resolve_declaration(param, data, env))
            .collect()
    }
}

impl ContextResolver {
    fn resolve_declaration(
        &self,
        param: &ParameterDeclaration,
        data: &Context,
        env: RenderEnv<'_>,
    ) -> EvalResult {
        match param {
            ParameterDeclaration::Parameter(parameter) => Ok(resolve_parameter(parameter, data)),
            ParameterDeclaration::Expression(group) => {
                let mut values = with_stack_headroom(|| self.resolve(group, data, env))?;
                if values.len() > 1 {
                    return Err(multiple_values(values.len()));
                }
                values.pop().ok_or_else(empty_parameter_statement)
            }
            ParameterDeclaration::Tag(decl) => {
                with_stack_headroom(|| invoke_declaration(decl, data, env))
            }
        }
    }
}

fn resolve_parameter(parameter: &Parameter, data: &Context) -> Value {
    match parameter {
        Parameter::Constant(Constant::Int(n)) => Value::Int(*n),
        Parameter::Constant(constant @ Constant::Double(_)) => Value::Double(constant.as_f64()),
        Parameter::StringLiteral(text) => Value::string(text.as_str()),
        Parameter::Keyword(Keyword::True) => Value::Bool(true),
        Parameter::Keyword(Keyword::False) => Value::Bool(false),
        Parameter::Keyword(Keyword::Nil) => Value::true_nil(),
        Parameter::Keyword(Keyword::SelfContext) => Value::map(data.clone()),
        Parameter::Variable(path) => lookup_path(data, path),
    }
}

/// Look up a dotted path such as `user.address.city`.
///
/// Intermediate values are forced before descending into them; the final
/// value is returned as stored, so lazy leaves stay lazy until output.
/// Any missing key, or a step that is not a map, gives nil.
pub fn lookup_path(data: &Context, path: &str) -> Value {
    let mut segments = path.split('.');
    let Some(mut current) = segments.next().and_then(|first| data.get(first).cloned()) else {
        return Value::true_nil();
    };
    for segment in segments {
        let next = current
            .forced()
            .as_map()
            .and_then(|entries| entries.get(segment).cloned());
        match next {
            Some(value) => current = value,
            None => return Value::true_nil(),
        }
    }
    current
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
