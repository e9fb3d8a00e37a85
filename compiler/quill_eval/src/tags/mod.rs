//! Custom tag capabilities.
//!
//! A custom tag node names a capability registered in the `TagRegistry`.
//! The evaluator resolves the node's parameters, packages them with the
//! current data and the tag body in a `TagContext`, and appends whatever
//! value the tag returns. Looking up a name nobody registered yields nil.

use std::fmt;
use std::sync::Arc;

use quill_ir::{Syntax, TagDeclaration};
use quill_value::{
    missing_body, unexpected_body, wrong_parameter_count, EvalError, EvalResult, Value,
};
use rustc_hash::FxHashMap;

use crate::evaluator::{Evaluator, RenderEnv};
use crate::stack::with_stack_headroom;
use crate::user_info::UserInfo;
use crate::Context;

/// A registered rendering capability.
pub trait Tag: Send + Sync {
    fn render(&self, ctx: &TagContext<'_>) -> EvalResult;
}

/// Adapter that lets plain closures act as tags.
struct FnTag<F>(F);

impl<F> Tag for FnTag<F>
where
    F: Fn(&TagContext<'_>) -> EvalResult + Send + Sync,
{
    fn render(&self, ctx: &TagContext<'_>) -> EvalResult {
        (self.0)(ctx)
    }
}

/// Name to capability table.
#[derive(Clone, Default)]
pub struct TagRegistry {
    tags: FxHashMap<String, Arc<dyn Tag>>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `tag` under `name`, replacing any previous registration.
    pub fn register(&mut self, name: impl Into<String>, tag: impl Tag + 'static) {
        self.tags.insert(name.into(), Arc::new(tag));
    }

    /// Register a closure as a tag.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&TagContext<'_>) -> EvalResult + Send + Sync + 'static,
    {
        self.register(name, FnTag(f));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tag>> {
        self.tags.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tags.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Run the tag registered under `name`.
    ///
    /// Unknown names are not an error: they render as nil.
    pub fn invoke(&self, name: &str, ctx: &TagContext<'_>) -> EvalResult {
        match self.tags.get(name) {
            Some(tag) => tag.render(ctx),
            None => {
                tracing::debug!(tag = name, "no tag registered under this name; rendering nil");
                Ok(Value::true_nil())
            }
        }
    }
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Everything a tag sees when it is invoked.
pub struct TagContext<'a> {
    name: &'a str,
    /// Resolved parameters, in declaration order.
    pub parameters: Vec<Value>,
    /// Data context at the invocation site.
    pub data: &'a Context,
    /// The tag's body, if the invocation has one.
    pub body: Option<&'a [Syntax]>,
    env: RenderEnv<'a>,
}

impl<'a> TagContext<'a> {
    pub fn new(
        name: &'a str,
        parameters: Vec<Value>,
        data: &'a Context,
        body: Option<&'a [Syntax]>,
        env: RenderEnv<'a>,
    ) -> Self {
        TagContext {
            name,
            parameters,
            data,
            body,
            env,
        }
    }

    /// Name the tag was invoked under.
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn user_info(&self) -> &'a UserInfo {
        self.env.user_info()
    }

    pub fn env(&self) -> RenderEnv<'a> {
        self.env
    }

    pub fn require_parameter_count(&self, expected: usize) -> Result<(), EvalError> {
        if self.parameters.len() == expected {
            Ok(())
        } else {
            Err(wrong_parameter_count(
                self.name,
                expected,
                self.parameters.len(),
            ))
        }
    }

    pub fn require_body(&self) -> Result<&'a [Syntax], EvalError> {
        self.body.ok_or_else(|| missing_body(self.name))
    }

    pub fn require_no_body(&self) -> Result<(), EvalError> {
        match self.body {
            Some(_) => Err(unexpected_body(self.name)),
            None => Ok(()),
        }
    }

    /// Render the tag body against the invocation-site data, with the same
    /// tags, resolver, and formatting as the enclosing render.
    pub fn render_body(&self) -> Result<String, EvalError> {
        let body = self.require_body()?;
        with_stack_headroom(|| Evaluator::new(body, self.data.clone(), self.env).render())
    }
}

/// Resolve a tag declaration's parameters and invoke it.
///
/// Shared by custom-tag nodes and tags nested inside parameters.
pub(crate) fn invoke_declaration(
    decl: &TagDeclaration,
    data: &Context,
    env: RenderEnv<'_>,
) -> EvalResult {
    let parameters = env.resolver().resolve(&decl.params, data, env)?;
    let ctx = TagContext::new(&decl.name, parameters, data, decl.body.as_deref(), env);
    env.tags().invoke(&decl.name, &ctx)
}
