//! Turning values into output text.
//!
//! Formatting is injectable: `Formatters` holds one plain function per
//! value kind, and `FormatConfig` pairs it with the `TextEncoding` used for
//! byte data. Both are `Copy` and free of interior state, so a single
//! configuration can serve any number of concurrent renders.

mod encoding;

use std::fmt;

use crate::errors::{serialization_failed, EvalError};
use crate::value::Value;

pub use encoding::TextEncoding;

/// Per-kind formatting functions.
#[derive(Copy, Clone)]
pub struct Formatters {
    pub boolean: fn(bool) -> String,
    pub integer: fn(i64) -> String,
    pub double: fn(f64) -> String,
    pub string: fn(&str) -> String,
    /// Returns `None` when the bytes cannot be represented as text.
    pub bytes: fn(&[u8], TextEncoding) -> Option<String>,
    /// Receives the already-serialized elements.
    pub array: fn(&[String]) -> String,
    /// Receives `(key, serialized value)` pairs sorted by key.
    pub map: fn(&[(String, String)]) -> String,
    pub nil: fn() -> String,
}

impl Default for Formatters {
    fn default() -> Self {
        Formatters {
            boolean: |b| b.to_string(),
            integer: |n| n.to_string(),
            double: format_double,
            string: str::to_owned,
            bytes: |bytes, encoding| encoding.decode(bytes),
            array: format_array,
            map: format_map,
            nil: String::new,
        }
    }
}

impl fmt::Debug for Formatters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatters").finish_non_exhaustive()
    }
}

/// Integral doubles keep a trailing `.0` so they stay distinguishable from
/// ints in output.
fn format_double(d: f64) -> String {
    if d.is_finite() && d.fract() == 0.0 && d.abs() < 1e15 {
        format!("{d:.1}")
    } else {
        d.to_string()
    }
}

fn format_array(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("\"{item}\"")).collect();
    format!("[{}]", quoted.join(", "))
}

fn format_map(entries: &[(String, String)]) -> String {
    let pairs: Vec<String> = entries
        .iter()
        .map(|(key, value)| format!("{key}: \"{value}\""))
        .collect();
    format!("[{}]", pairs.join(", "))
}

/// Formatting configuration shared by every render.
#[derive(Copy, Clone, Debug, Default)]
pub struct FormatConfig {
    pub formatters: Formatters,
    pub encoding: TextEncoding,
}

impl FormatConfig {
    pub fn new(formatters: Formatters, encoding: TextEncoding) -> Self {
        FormatConfig {
            formatters,
            encoding,
        }
    }

    /// Default formatters with a different byte encoding.
    pub fn with_encoding(encoding: TextEncoding) -> Self {
        FormatConfig {
            formatters: Formatters::default(),
            encoding,
        }
    }

    #[inline]
    fn nil_text(&self) -> String {
        (self.formatters.nil)()
    }
}

impl Value {
    /// Text form of this value, or `None` if it has none.
    ///
    /// Lazy values run unconditionally; invariance is irrelevant for
    /// output. A lazy value whose result is itself lazy renders as nil
    /// text. Array and map elements without a text form render as nil text.
    pub fn serialize_to_text(&self, config: &FormatConfig) -> Option<String> {
        let formatters = &config.formatters;
        match self {
            Value::Bool(b) => Some((formatters.boolean)(*b)),
            Value::Int(n) => Some((formatters.integer)(*n)),
            Value::Double(d) => Some((formatters.double)(*d)),
            Value::Str(s) => Some((formatters.string)(s)),
            Value::Bytes(bytes) => (formatters.bytes)(bytes, config.encoding),
            Value::Array(items) => {
                let texts: Vec<String> = items
                    .iter()
                    .map(|item| {
                        item.serialize_to_text(config)
                            .unwrap_or_else(|| config.nil_text())
                    })
                    .collect();
                Some((formatters.array)(&texts))
            }
            Value::Map(entries) => {
                let mut texts: Vec<(String, String)> = entries
                    .iter()
                    .map(|(key, value)| {
                        let text = value
                            .serialize_to_text(config)
                            .unwrap_or_else(|| config.nil_text());
                        (key.clone(), text)
                    })
                    .collect();
                texts.sort_unstable();
                Some((formatters.map)(&texts))
            }
            Value::Optional {
                inner: Some(inner), ..
            } => inner.serialize_to_text(config),
            Value::Optional { inner: None, .. } => Some(config.nil_text()),
            Value::Lazy(lazy) => {
                let produced = lazy.call();
                if produced.is_lazy() {
                    tracing::trace!(
                        returns = %lazy.returns(),
                        "lazy value produced another lazy value; rendering nil"
                    );
                    return Some(config.nil_text());
                }
                produced.serialize_to_text(config)
            }
        }
    }

    /// Append the text form of this value to `buffer`.
    ///
    /// Byte data is decoded with the configured encoding directly; every
    /// other kind goes through `serialize_to_text`. Fails only when no text
    /// can be produced.
    pub fn append_serialized(
        &self,
        buffer: &mut String,
        config: &FormatConfig,
    ) -> Result<(), EvalError> {
        let text = match self {
            Value::Bytes(bytes) => config.encoding.decode(bytes),
            _ => self.serialize_to_text(config),
        };
        let text = text.ok_or_else(|| serialization_failed(self.type_name()))?;
        buffer.push_str(&text);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
