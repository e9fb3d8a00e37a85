use pretty_assertions::assert_eq;
use quill_ir::TagDeclaration;
use quill_value::{EvalErrorKind, ValueType};
use rustc_hash::FxHashMap;

use super::*;
use crate::evaluator::Renderer;
use crate::tags::TagRegistry;
use crate::user_info::UserInfo;

fn sample_context() -> Context {
    let mut address = FxHashMap::default();
    address.insert("city".to_string(), Value::string("Lyon"));
    let mut user = FxHashMap::default();
    user.insert("name".to_string(), Value::string("Ada"));
    user.insert("address".to_string(), Value::map(address));

    let mut data = Context::default();
    data.insert("user".to_string(), Value::map(user));
    data.insert("count".to_string(), Value::Int(3));
    data
}

fn resolve_with(renderer: &Renderer, params: &[ParameterDeclaration], data: &Context) -> Vec<Value> {
    let info = UserInfo::new();
    ContextResolver
        .resolve(params, data, RenderEnv::new(renderer, &info))
        .unwrap()
}

#[test]
fn literals_and_keywords() {
    let renderer = Renderer::new();
    let values = resolve_with(
        &renderer,
        &[
            ParameterDeclaration::int(4),
            ParameterDeclaration::double(0.5),
            ParameterDeclaration::string("txt"),
            ParameterDeclaration::keyword(Keyword::True),
            ParameterDeclaration::keyword(Keyword::False),
            ParameterDeclaration::keyword(Keyword::Nil),
        ],
        &Context::default(),
    );
    assert_eq!(
        values,
        vec![
            Value::Int(4),
            Value::Double(0.5),
            Value::string("txt"),
            Value::Bool(true),
            Value::Bool(false),
            Value::true_nil(),
        ]
    );
}

#[test]
fn self_keyword_yields_whole_context() {
    let renderer = Renderer::new();
    let data = sample_context();
    let values = resolve_with(
        &renderer,
        &[ParameterDeclaration::keyword(Keyword::SelfContext)],
        &data,
    );
    assert_eq!(values, vec![Value::map(data.clone())]);
}

#[test]
fn variables_follow_dotted_paths() {
    let data = sample_context();
    assert_eq!(lookup_path(&data, "count"), Value::Int(3));
    assert_eq!(lookup_path(&data, "user.name"), Value::string("Ada"));
    assert_eq!(lookup_path(&data, "user.address.city"), Value::string("Lyon"));
}

#[test]
fn missing_or_non_map_steps_give_nil() {
    let data = sample_context();
    assert!(lookup_path(&data, "nobody").is_nil());
    assert!(lookup_path(&data, "user.age").is_nil());
    assert!(lookup_path(&data, "count.value").is_nil());
    assert!(lookup_path(&data, "").is_nil());
}

#[test]
fn path_steps_are_forced_but_leaves_stay_lazy() {
    let mut inner = FxHashMap::default();
    inner.insert(
        "leaf".to_string(),
        Value::lazy(ValueType::Int, false, || Value::Int(1)),
    );
    let shared = Value::map(inner);
    let mut data = Context::default();
    data.insert(
        "outer".to_string(),
        Value::lazy(ValueType::Map, false, move || shared.clone()),
    );

    let leaf = lookup_path(&data, "outer.leaf");
    assert!(leaf.is_lazy());
    assert_eq!(leaf.forced(), Value::Int(1));
}

#[test]
fn group_must_hold_one_value() {
    let renderer = Renderer::new();
    let info = UserInfo::new();
    let env = RenderEnv::new(&renderer, &info);
    let data = Context::default();

    let single = ParameterDeclaration::group(vec![ParameterDeclaration::int(1)]);
    assert_eq!(
        ContextResolver.resolve(&[single], &data, env).unwrap(),
        vec![Value::Int(1)]
    );

    let empty = ParameterDeclaration::group(Vec::new());
    let err = ContextResolver.resolve(&[empty], &data, env).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::EmptyParameterStatement);

    let pair = ParameterDeclaration::group(vec![
        ParameterDeclaration::int(1),
        ParameterDeclaration::int(2),
    ]);
    let err = ContextResolver.resolve(&[pair], &data, env).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::MultipleValues { count: 2 });
}

#[test]
fn nested_tags_go_through_the_registry() {
    let mut tags = TagRegistry::new();
    tags.register_fn("double", |ctx| {
        ctx.require_parameter_count(1)?;
        Ok(Value::Int(ctx.parameters[0].as_int().unwrap_or(0) * 2))
    });
    let renderer = Renderer::builder().tags(tags).build();
    let data = sample_context();

    let values = resolve_with(
        &renderer,
        &[ParameterDeclaration::tag(
            "double",
            vec![ParameterDeclaration::variable("count")],
        )],
        &data,
    );
    assert_eq!(values, vec![Value::Int(6)]);

    let unknown = ParameterDeclaration::Tag(TagDeclaration::new("unknown", Vec::new()));
    assert!(resolve_with(&renderer, &[unknown], &data)[0].is_nil());
}

#[test]
fn one_value_per_declaration() {
    let renderer = Renderer::new();
    let data = sample_context();
    let values = resolve_with(
        &renderer,
        &[
            ParameterDeclaration::variable("count"),
            ParameterDeclaration::variable("user.name"),
        ],
        &data,
    );
    assert_eq!(values.len(), 2);
}
