#![allow(
    clippy::result_large_err,
    reason = "EvalError is returned everywhere; boxing it would spread through every signature"
)]
//! Quill Eval - the render pass of the Quill template core.
//!
//! Given a resolved template body (`&[Syntax]`) and a data context, an
//! `Evaluator` walks the nodes once, in order, and produces the output
//! text.
//!
//! # Architecture
//!
//! - `Renderer`: owns the collaborators shared by every render (tag
//!   registry, parameter resolver, format config, output policy); built
//!   with `Renderer::builder()`
//! - `Evaluator`: one render pass over one node slice with one context;
//!   loops and tag bodies spawn child evaluators with a copied context
//! - `ParameterResolver`: turns node parameters into values;
//!   `ContextResolver` is the built-in implementation
//! - `TagRegistry`: name to `Tag` capability table, with a nil fallback for
//!   unknown names
//! - `UserInfo`: opaque data forwarded untouched to every tag
//!
//! # Re-exports
//!
//! Value and error types come from `quill_value`:
//! - `Value`, `ValueType`, `Heap`, `LazyValue`
//! - `EvalError`, `EvalErrorKind`, `EvalResult`
//! - `FormatConfig`, `Formatters`, `TextEncoding`

mod evaluator;
mod resolver;
mod stack;
mod tags;
mod user_info;

use std::sync::Once;

use rustc_hash::FxHashMap;

pub use quill_value::{
    EvalError, EvalErrorKind, EvalResult, FormatConfig, Formatters, Heap, LazyValue, TextEncoding,
    Value, ValueType,
};

pub use evaluator::{Evaluator, OutputPolicy, RenderEnv, Renderer, RendererBuilder};
pub use resolver::{lookup_path, ContextResolver, ParameterResolver};
pub use stack::with_stack_headroom;
pub use tags::{Tag, TagContext, TagRegistry};
pub use user_info::UserInfo;

/// Identifier to value mapping visible during one render pass.
pub type Context = FxHashMap<String, Value>;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set,
/// e.g. `RUST_LOG=quill_eval=debug` or `RUST_LOG=quill_eval=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
