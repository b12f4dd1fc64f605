//! Compact, ASCII-only JSON emitter shared by CanonJSON and pack digests.
//!
//! No insignificant whitespace, object keys in code point order, and every
//! character outside U+0020..U+007E escaped (`\uXXXX`, surrogate pairs for
//! astral characters).

use serde_json::{Map, Number, Value};
use std::fmt::Write as _;

/// Emits `value` compactly. Arrays are written in their current order.
pub fn to_ascii_string(value: &Value) -> String {
    let mut output = String::new();
    emit_value(value, &mut output);
    output
}

fn emit_value(value: &Value, output: &mut String) {
    match value {
        Value::Null => output.push_str("null"),
        Value::Bool(b) => output.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => emit_number(n, output),
        Value::String(s) => emit_string(s, output),
        Value::Array(arr) => emit_array(arr, output),
        Value::Object(obj) => emit_object(obj, output),
    }
}

fn emit_number(n: &Number, output: &mut String) {
    if let Some(i) = n.as_i64() {
        let _ = write!(output, "{i}");
    } else if let Some(u) = n.as_u64() {
        let _ = write!(output, "{u}");
    } else {
        // Integers beyond 64 bits print as their decimal token. Floats only
        // reach here from pack digests; CanonJSON rejects them earlier.
        output.push_str(&n.to_string());
    }
}

/// Writes a JSON string literal with `ensure_ascii` escaping.
fn emit_string(s: &str, output: &mut String) {
    output.push('"');
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\u{0008}' => output.push_str("\\b"),
            '\u{000C}' => output.push_str("\\f"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            ' '..='~' => output.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(output, "\\u{:04x}", unit);
                }
            }
        }
    }
    output.push('"');
}

fn emit_array(arr: &[Value], output: &mut String) {
    output.push('[');
    for (i, item) in arr.iter().enumerate() {
        if i > 0 {
            output.push(',');
        }
        emit_value(item, output);
    }
    output.push(']');
}

fn emit_object(obj: &Map<String, Value>, output: &mut String) {
    let mut sorted_keys: Vec<&String> = obj.keys().collect();
    sorted_keys.sort();

    output.push('{');
    for (i, key) in sorted_keys.iter().enumerate() {
        if i > 0 {
            output.push(',');
        }
        emit_string(key, output);
        output.push(':');
        emit_value(&obj[key.as_str()], output);
    }
    output.push('}');
}
