//! End-to-end renders through the public `quill_eval` API.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;
use quill_eval::{
    init_tracing, Context, EvalError, FormatConfig, Formatters, OutputPolicy, ParameterResolver,
    RenderEnv, Renderer, TagRegistry, TextEncoding, UserInfo, Value, ValueType,
};
use quill_ir::{
    Conditional, ConditionalClause, Keyword, Loop, Parameter, ParameterDeclaration, Syntax,
    TagDeclaration,
};
use rustc_hash::FxHashMap;

fn order_context() -> Context {
    let line = |name: &str, qty: i64| {
        let mut entries = FxHashMap::default();
        entries.insert("name".to_string(), Value::string(name));
        entries.insert("qty".to_string(), Value::Int(qty));
        Value::map(entries)
    };
    let mut order = FxHashMap::default();
    order.insert(
        "lines".to_string(),
        Value::array(vec![line("pen", 2), line("ink", 1)]),
    );
    order.insert("paid".to_string(), Value::Bool(false));

    let mut data = Context::default();
    data.insert("customer".to_string(), Value::string("Ada"));
    data.insert("order".to_string(), Value::map(order));
    data
}

fn order_template() -> Vec<Syntax> {
    let line_body = vec![
        Syntax::variable("line.qty"),
        Syntax::raw("x "),
        Syntax::variable("line.name"),
        Syntax::Conditional(Conditional::new(vec![ConditionalClause::new(
            vec![ParameterDeclaration::group(vec![ParameterDeclaration::tag(
                "not",
                vec![ParameterDeclaration::variable("isLast")],
            )])],
            vec![Syntax::raw(", ")],
        )])),
    ];
    vec![
        Syntax::raw("Dear "),
        Syntax::variable("customer"),
        Syntax::raw(": "),
        Syntax::Loop(Loop::new("line", "order.lines", line_body)),
        Syntax::Conditional(Conditional::new(vec![
            ConditionalClause::new(
                vec![ParameterDeclaration::variable("order.paid")],
                vec![Syntax::raw(" (paid)")],
            ),
            ConditionalClause::new(
                vec![ParameterDeclaration::keyword(Keyword::True)],
                vec![Syntax::raw(" (due)")],
            ),
        ])),
    ]
}

fn standard_tags() -> TagRegistry {
    let mut tags = TagRegistry::new();
    tags.register_fn("not", |ctx| {
        ctx.require_parameter_count(1)?;
        Ok(Value::Bool(!ctx.parameters[0].is_truthy()))
    });
    tags
}

#[test]
fn renders_a_complete_template() {
    init_tracing();
    let renderer = Renderer::builder().tags(standard_tags()).build();
    let out = renderer
        .render(&order_template(), order_context(), &UserInfo::new())
        .unwrap();
    assert_eq!(out, "Dear Ada: 2x pen, 1x ink (due)");
}

#[test]
fn one_renderer_serves_many_threads() {
    let renderer = Arc::new(Renderer::builder().tags(standard_tags()).build());
    let template = Arc::new(order_template());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let renderer = Arc::clone(&renderer);
            let template = Arc::clone(&template);
            thread::spawn(move || {
                let mut data = order_context();
                data.insert("customer".to_string(), Value::string(format!("c{i}")));
                renderer.render(&template, data, &UserInfo::new())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let out = handle.join().unwrap().unwrap();
        assert_eq!(out, format!("Dear c{i}: 2x pen, 1x ink (due)"));
    }
}

/// Resolver that upper-cases every string it resolves.
struct Shouting;

impl ParameterResolver for Shouting {
    fn resolve(
        &self,
        params: &[ParameterDeclaration],
        data: &Context,
        _env: RenderEnv<'_>,
    ) -> Result<Vec<Value>, EvalError> {
        Ok(params
            .iter()
            .map(|param| match param {
                ParameterDeclaration::Parameter(Parameter::Variable(path)) => {
                    let value = quill_eval::lookup_path(data, path).forced();
                    match value.as_str() {
                        Some(text) => Value::string(text.to_uppercase()),
                        None => value,
                    }
                }
                _ => Value::true_nil(),
            })
            .collect())
    }
}

#[test]
fn custom_resolver_replaces_the_default() {
    let renderer = Renderer::builder().resolver(Shouting).build();
    let mut data = Context::default();
    data.insert("word".to_string(), Value::string("quiet"));
    let out = renderer
        .render(&[Syntax::variable("word")], data, &UserInfo::new())
        .unwrap();
    assert_eq!(out, "QUIET");
}

#[test]
fn custom_formatters_shape_output() {
    let formatters = Formatters {
        boolean: |b| if b { "yes".into() } else { "no".into() },
        nil: || "-".into(),
        ..Formatters::default()
    };
    let renderer = Renderer::builder()
        .format_config(FormatConfig::new(formatters, TextEncoding::Utf8))
        .build();
    let mut data = Context::default();
    data.insert("flag".to_string(), Value::Bool(true));
    data.insert("gap".to_string(), Value::nil(ValueType::String));

    let ast = vec![
        Syntax::variable("flag"),
        Syntax::raw(" "),
        Syntax::variable("gap"),
        Syntax::raw(" "),
        Syntax::variable("missing"),
    ];
    let out = renderer.render(&ast, data, &UserInfo::new()).unwrap();
    assert_eq!(out, "yes - -");
    assert_eq!(renderer.policy(), OutputPolicy::BestEffort);
}

#[test]
fn tag_output_respects_policy() {
    let mut tags = TagRegistry::new();
    tags.register_fn("blob", |_| Ok(Value::bytes(vec![0xff])));
    let ast = vec![Syntax::Custom(TagDeclaration::new("blob", Vec::new()))];

    let lenient = Renderer::builder().tags(tags.clone()).build();
    assert_eq!(
        lenient
            .render(&ast, Context::default(), &UserInfo::new())
            .unwrap(),
        ""
    );

    let strict = Renderer::builder()
        .tags(tags)
        .policy(OutputPolicy::Strict)
        .build();
    let err = strict
        .render(&ast, Context::default(), &UserInfo::new())
        .unwrap_err();
    assert_eq!(err.to_string(), "unable to serialize bytes value");
}

#[test]
fn deep_nesting_renders_on_a_small_thread_stack() {
    let mut body = vec![Syntax::variable("leaf")];
    for _ in 0..2_000 {
        body = vec![Syntax::Conditional(Conditional::new(vec![
            ConditionalClause::new(
                vec![ParameterDeclaration::group(vec![
                    ParameterDeclaration::keyword(Keyword::True),
                ])],
                body,
            ),
        ]))];
    }
    let mut data = Context::default();
    data.insert("leaf".to_string(), Value::string("bottom"));
    let renderer = Renderer::builder().build();

    let out = thread::scope(|scope| {
        thread::Builder::new()
            .stack_size(512 * 1024)
            .spawn_scoped(scope, || renderer.render(&body, data, &UserInfo::new()))
            .unwrap()
            .join()
            .unwrap()
    })
    .unwrap();
    assert_eq!(out, "bottom");
}
