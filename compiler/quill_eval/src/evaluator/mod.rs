//! The render pass.
//!
//! An `Evaluator` owns one data context and walks one node slice, front to
//! back, appending text to its buffer:
//!
//! - raw text is copied
//! - interpolations resolve to exactly one value, which is serialized
//! - conditionals render the body of the first clause whose condition is
//!   truthy
//! - custom tags are invoked through the tag registry
//! - loops render their body once per array element with a child
//!   evaluator over a copy of the context
//!
//! Composition directives must be gone by the time a body is rendered;
//! meeting one is an error.
//!
//! # Output Policy
//!
//! Under `OutputPolicy::BestEffort` a value that cannot be serialized at an
//! interpolation or tag site is logged and dropped. `OutputPolicy::Strict`
//! fails the render instead. Resolution errors always propagate.

mod renderer;

pub use renderer::{OutputPolicy, RenderEnv, Renderer, RendererBuilder};

use quill_ir::{Conditional, Loop, ParameterDeclaration, Syntax};
use quill_value::{
    empty_parameter_statement, expected_array, expected_dictionary, multiple_values,
    unresolved_directive, EvalError, EvalResult, Heap, Value,
};
use rustc_hash::FxHashMap;

use crate::stack::with_stack_headroom;
use crate::tags::invoke_declaration;
use crate::Context;

/// Names bound in every loop iteration besides the loop variable.
const IS_FIRST: &str = "isFirst";
const IS_LAST: &str = "isLast";
const INDEX: &str = "index";

/// One render pass over a node slice.
pub struct Evaluator<'a> {
    ast: &'a [Syntax],
    offset: usize,
    buffer: String,
    data: Context,
    env: RenderEnv<'a>,
}

impl<'a> Evaluator<'a> {
    pub fn new(ast: &'a [Syntax], data: Context, env: RenderEnv<'a>) -> Self {
        Evaluator {
            ast,
            offset: 0,
            buffer: String::new(),
            data,
            env,
        }
    }

    /// The context this evaluator renders against.
    pub fn data(&self) -> &Context {
        &self.data
    }

    /// Walk every node once, in order, and return the produced text.
    ///
    /// Each call starts over from the first node with an empty buffer.
    #[tracing::instrument(level = "debug", skip_all, fields(nodes = self.ast.len()))]
    pub fn render(&mut self) -> Result<String, EvalError> {
        self.offset = 0;
        self.buffer.clear();
        let ast = self.ast;
        while let Some(node) = ast.get(self.offset) {
            self.offset += 1;
            self.eval_node(node)?;
        }
        Ok(std::mem::take(&mut self.buffer))
    }

    fn eval_node(&mut self, node: &'a Syntax) -> Result<(), EvalError> {
        tracing::trace!(kind = node.kind_name(), offset = self.offset, "node");
        match node {
            Syntax::Raw(text) => {
                self.buffer.push_str(text);
                Ok(())
            }
            Syntax::Expression(params) => {
                let value = self.resolve_atomic(params)?;
                self.append_value(&value)
            }
            Syntax::Conditional(conditional) => self.eval_conditional(conditional),
            Syntax::Loop(lp) => self.eval_loop(lp),
            Syntax::Custom(decl) => {
                let value = invoke_declaration(decl, &self.data, self.env)?;
                self.append_value(&value)
            }
            Syntax::Import(directive) => Err(unresolved_directive(&directive.to_string())),
            Syntax::Extend(directive) => Err(unresolved_directive(&directive.to_string())),
            Syntax::Export(directive) => Err(unresolved_directive(&directive.to_string())),
        }
    }

    /// Nodes of a nested body, rendered into this evaluator's buffer.
    fn eval_body(&mut self, body: &'a [Syntax]) -> Result<(), EvalError> {
        for node in body {
            self.eval_node(node)?;
        }
        Ok(())
    }

    /// Resolve a parameter list that must produce exactly one value.
    fn resolve_atomic(&self, params: &[ParameterDeclaration]) -> EvalResult {
        let mut values = self.env.resolver().resolve(params, &self.data, self.env)?;
        if values.len() > 1 {
            return Err(multiple_values(values.len()));
        }
        values.pop().ok_or_else(empty_parameter_statement)
    }

    fn append_value(&mut self, value: &Value) -> Result<(), EvalError> {
        match value.append_serialized(&mut self.buffer, self.env.format()) {
            Err(err) if self.env.policy() == OutputPolicy::BestEffort => {
                tracing::warn!(error = %err, "dropping value that has no text form");
                Ok(())
            }
            result => result,
        }
    }

    fn eval_conditional(&mut self, conditional: &'a Conditional) -> Result<(), EvalError> {
        for clause in &conditional.chain {
            if self.resolve_atomic(&clause.condition)?.is_truthy() {
                return with_stack_headroom(|| self.eval_body(&clause.body));
            }
        }
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(item = %lp.item, array = %lp.array))]
    fn eval_loop(&mut self, lp: &'a Loop) -> Result<(), EvalError> {
        let items = self.loop_items(&lp.array)?;
        let count = items.len();
        for (index, item) in items.iter().enumerate() {
            tracing::trace!(index, count, "loop iteration");
            let mut scope = self.data.clone();
            scope.insert(lp.item.clone(), item.clone());
            scope.insert(IS_FIRST.to_string(), Value::Bool(index == 0));
            scope.insert(IS_LAST.to_string(), Value::Bool(index + 1 == count));
            scope.insert(INDEX.to_string(), Value::from(index));

            let mut child = Evaluator::new(&lp.body, scope, self.env);
            let text = with_stack_headroom(|| child.render())?;
            self.buffer.push_str(&text);
        }
        Ok(())
    }

    /// Follow a dotted path to the array a loop iterates.
    ///
    /// Every segment but the last must lead to a dictionary and the last
    /// to an array. Lazy and optional values are forced along the way; a
    /// missing key counts as the wrong shape.
    fn loop_items(&self, path: &str) -> Result<Heap<Vec<Value>>, EvalError> {
        let segments: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return Err(expected_array(path));
        };

        let mut nested: Option<Heap<FxHashMap<String, Value>>> = None;
        for (depth, segment) in parents.iter().enumerate() {
            let scope = nested.as_deref().unwrap_or(&self.data);
            let next = scope
                .get(*segment)
                .map(Value::forced)
                .and_then(Value::into_map);
            match next {
                Some(map) => nested = Some(map),
                None => return Err(expected_dictionary(&segments[..=depth].join("."))),
            }
        }

        let scope = nested.as_deref().unwrap_or(&self.data);
        scope
            .get(*last)
            .map(Value::forced)
            .and_then(Value::into_array)
            .ok_or_else(|| expected_array(path))
    }
}
