use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;

use super::*;
use crate::value::ValueType;

fn text(value: &Value) -> Option<String> {
    value.serialize_to_text(&FormatConfig::default())
}

#[test]
fn scalars_use_default_formatters() {
    assert_eq!(text(&Value::Bool(true)).as_deref(), Some("true"));
    assert_eq!(text(&Value::Int(-12)).as_deref(), Some("-12"));
    assert_eq!(text(&Value::Double(2.0)).as_deref(), Some("2.0"));
    assert_eq!(text(&Value::Double(0.25)).as_deref(), Some("0.25"));
    assert_eq!(text(&Value::string("hi")).as_deref(), Some("hi"));
    assert_eq!(text(&Value::bytes(b"abc".to_vec())).as_deref(), Some("abc"));
}

#[test]
fn nil_renders_as_empty_text() {
    assert_eq!(text(&Value::nil(ValueType::Int)).as_deref(), Some(""));
    assert_eq!(text(&Value::true_nil()).as_deref(), Some(""));
}

#[test]
fn present_optional_renders_inner_value() {
    assert_eq!(text(&Value::Int(3).wrap_optional()).as_deref(), Some("3"));
}

#[test]
fn arrays_quote_their_elements() {
    let array = Value::array(vec![
        Value::Int(1),
        Value::string("b"),
        Value::nil(ValueType::String),
    ]);
    assert_eq!(text(&array).as_deref(), Some(r#"["1", "b", ""]"#));
    assert_eq!(text(&Value::array(Vec::new())).as_deref(), Some("[]"));
}

#[test]
fn maps_render_sorted_by_key() {
    let mut entries = FxHashMap::default();
    entries.insert("zeta".to_string(), Value::Int(2));
    entries.insert("alpha".to_string(), Value::Bool(false));
    assert_eq!(
        text(&Value::map(entries)).as_deref(),
        Some(r#"[alpha: "false", zeta: "2"]"#)
    );
}

#[test]
fn lazy_values_always_run_for_output() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let lazy = Value::lazy(ValueType::String, false, move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Value::string("late")
    });

    assert_eq!(text(&lazy).as_deref(), Some("late"));
    assert_eq!(text(&lazy).as_deref(), Some("late"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn invariant_lazy_is_not_cached_between_serializations() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let lazy = Value::lazy(ValueType::Int, true, move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Value::Int(1)
    });

    let _ = text(&lazy);
    let _ = text(&lazy);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn lazy_producing_lazy_renders_nil_text() {
    let lazy = Value::lazy(ValueType::Int, true, || {
        Value::lazy(ValueType::Int, true, || Value::Int(1))
    });
    assert_eq!(text(&lazy).as_deref(), Some(""));
}

#[test]
fn undecodable_bytes_have_no_text() {
    assert_eq!(text(&Value::bytes(vec![0xff, 0xfe, 0x00])), None);
}

#[test]
fn undecodable_bytes_inside_array_render_as_nil() {
    let array = Value::array(vec![Value::bytes(vec![0xff]), Value::Int(1)]);
    assert_eq!(text(&array).as_deref(), Some(r#"["", "1"]"#));
}

#[test]
fn append_serialized_appends_to_buffer() {
    let mut buffer = String::from("x=");
    let result = Value::Int(5).append_serialized(&mut buffer, &FormatConfig::default());
    assert!(result.is_ok());
    assert_eq!(buffer, "x=5");
}

#[test]
fn append_serialized_fails_for_undecodable_bytes() {
    let mut buffer = String::from("keep");
    let result = Value::bytes(vec![0xc3]).append_serialized(&mut buffer, &FormatConfig::default());
    let err = result.err();
    assert!(err.as_ref().is_some_and(EvalError::is_serialization_failure));
    assert_eq!(
        err.map(|e| e.message).as_deref(),
        Some("unable to serialize bytes value")
    );
    assert_eq!(buffer, "keep");
}

#[test]
fn byte_encoding_is_configurable() {
    let latin1 = FormatConfig::with_encoding(TextEncoding::Latin1);
    let mut buffer = String::new();
    let result = Value::bytes(vec![0x63, 0x61, 0x66, 0xe9]).append_serialized(&mut buffer, &latin1);
    assert!(result.is_ok());
    assert_eq!(buffer, "café");
}

#[test]
fn custom_formatters_replace_defaults() {
    let formatters = Formatters {
        boolean: |b| if b { "yes".into() } else { "no".into() },
        nil: || "NULL".into(),
        ..Formatters::default()
    };
    let config = FormatConfig::new(formatters, TextEncoding::Utf8);
    assert_eq!(
        Value::Bool(false).serialize_to_text(&config).as_deref(),
        Some("no")
    );
    assert_eq!(
        Value::true_nil().serialize_to_text(&config).as_deref(),
        Some("NULL")
    );
    assert_eq!(Value::Int(7).serialize_to_text(&config).as_deref(), Some("7"));
}

#[test]
fn encodings_decode_or_refuse() {
    assert_eq!(TextEncoding::Ascii.decode(b"ok").as_deref(), Some("ok"));
    assert_eq!(TextEncoding::Ascii.decode(&[0x80]), None);
    assert_eq!(
        TextEncoding::Utf16Le.decode(&[0x68, 0x00, 0x69, 0x00]).as_deref(),
        Some("hi")
    );
    assert_eq!(
        TextEncoding::Utf16Be.decode(&[0x00, 0x68, 0x00, 0x69]).as_deref(),
        Some("hi")
    );
    assert_eq!(TextEncoding::Utf16Le.decode(&[0x68]), None);
    assert_eq!(TextEncoding::Utf16Be.decode(&[0x00, 0x68, 0x00]), None);
    assert_eq!(TextEncoding::default(), TextEncoding::Utf8);
    assert_eq!(TextEncoding::Latin1.to_string(), "iso-8859-1");
}
