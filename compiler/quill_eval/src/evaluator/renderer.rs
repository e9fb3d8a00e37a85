//! `Renderer` and `RendererBuilder`: the configuration shared by renders.

use std::fmt;
use std::sync::Arc;

use quill_ir::Syntax;
use quill_value::{EvalError, FormatConfig, Formatters, TextEncoding};

use super::Evaluator;
use crate::resolver::{ContextResolver, ParameterResolver};
use crate::tags::TagRegistry;
use crate::user_info::UserInfo;
use crate::Context;

/// What to do when a value cannot be turned into text at an
/// interpolation or tag site.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputPolicy {
    /// Log a warning and emit nothing for that value.
    #[default]
    BestEffort,
    /// Fail the render.
    Strict,
}

/// Collaborators shared by every render: tags, parameter resolver,
/// formatting, and output policy.
///
/// All of them are read-only during a render, so one `Renderer` can serve
/// concurrent renders from several threads.
pub struct Renderer {
    tags: TagRegistry,
    resolver: Arc<dyn ParameterResolver>,
    format: FormatConfig,
    policy: OutputPolicy,
}

impl Renderer {
    /// Renderer with no tags, the context resolver, default formatting, and
    /// best-effort output.
    pub fn new() -> Self {
        RendererBuilder::new().build()
    }

    pub fn builder() -> RendererBuilder {
        RendererBuilder::new()
    }

    pub fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    pub fn resolver(&self) -> &dyn ParameterResolver {
        &*self.resolver
    }

    pub fn format_config(&self) -> &FormatConfig {
        &self.format
    }

    pub fn policy(&self) -> OutputPolicy {
        self.policy
    }

    /// Evaluator for one render of `ast` with `data`.
    pub fn evaluator<'a>(
        &'a self,
        ast: &'a [Syntax],
        data: Context,
        user_info: &'a UserInfo,
    ) -> Evaluator<'a> {
        Evaluator::new(ast, data, RenderEnv::new(self, user_info))
    }

    /// Render `ast` once.
    pub fn render(
        &self,
        ast: &[Syntax],
        data: Context,
        user_info: &UserInfo,
    ) -> Result<String, EvalError> {
        self.evaluator(ast, data, user_info).render()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("tags", &self.tags)
            .field("format", &self.format)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Builder for `Renderer`.
#[must_use]
pub struct RendererBuilder {
    tags: TagRegistry,
    resolver: Option<Arc<dyn ParameterResolver>>,
    format: FormatConfig,
    policy: OutputPolicy,
}

impl RendererBuilder {
    pub fn new() -> Self {
        RendererBuilder {
            tags: TagRegistry::new(),
            resolver: None,
            format: FormatConfig::default(),
            policy: OutputPolicy::default(),
        }
    }

    /// Set the tag registry.
    pub fn tags(mut self, tags: TagRegistry) -> Self {
        self.tags = tags;
        self
    }

    /// Set the parameter resolver. Defaults to `ContextResolver`.
    pub fn resolver(mut self, resolver: impl ParameterResolver + 'static) -> Self {
        let resolver: Arc<dyn ParameterResolver> = Arc::new(resolver);
        self.resolver = Some(resolver);
        self
    }

    /// Set formatters and encoding together.
    pub fn format_config(mut self, format: FormatConfig) -> Self {
        self.format = format;
        self
    }

    pub fn formatters(mut self, formatters: Formatters) -> Self {
        self.format.formatters = formatters;
        self
    }

    /// Encoding used to turn byte values into text.
    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.format.encoding = encoding;
        self
    }

    pub fn policy(mut self, policy: OutputPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> Renderer {
        let resolver: Arc<dyn ParameterResolver> = match self.resolver {
            Some(resolver) => resolver,
            None => Arc::new(ContextResolver),
        };
        Renderer {
            tags: self.tags,
            resolver,
            format: self.format,
            policy: self.policy,
        }
    }
}

impl Default for RendererBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of the render configuration plus the caller's user info.
///
/// Handed to resolvers and tags so nested lookups and tag bodies render
/// with the same collaborators as the enclosing pass.
#[derive(Copy, Clone)]
pub struct RenderEnv<'a> {
    renderer: &'a Renderer,
    user_info: &'a UserInfo,
}

impl<'a> RenderEnv<'a> {
    pub fn new(renderer: &'a Renderer, user_info: &'a UserInfo) -> Self {
        RenderEnv {
            renderer,
            user_info,
        }
    }

    pub fn tags(self) -> &'a TagRegistry {
        &self.renderer.tags
    }

    pub fn resolver(self) -> &'a dyn ParameterResolver {
        &*self.renderer.resolver
    }

    pub fn format(self) -> &'a FormatConfig {
        &self.renderer.format
    }

    pub fn policy(self) -> OutputPolicy {
        self.renderer.policy
    }

    pub fn user_info(self) -> &'a UserInfo {
        self.user_info
    }
}

impl fmt::Debug for RenderEnv<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderEnv")
            .field("renderer", self.renderer)
            .field("user_info", self.user_info)
            .finish()
    }
}
