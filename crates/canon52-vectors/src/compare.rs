//! Loose field comparison for decision records.
//!
//! Vector packs written by other implementations may spell flags as `true`
//! or `1`; numbers and booleans therefore compare by numeric value, and
//! containers compare element-wise with the same rule.

use serde_json::Value;

#[derive(Debug, Clone, Copy)]
enum Numeric {
    Int(i128),
    Float(f64),
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Numeric::Int(a), Numeric::Int(b)) => a == b,
            (Numeric::Float(a), Numeric::Float(b)) => a == b,
            (Numeric::Int(i), Numeric::Float(f)) | (Numeric::Float(f), Numeric::Int(i)) => {
                f.fract() == 0.0 && (i as f64) == f
            }
        }
    }
}

fn numeric(value: &Value) -> Option<Numeric> {
    match value {
        Value::Bool(b) => Some(Numeric::Int(i128::from(*b))),
        Value::Number(n) => n
            .as_i64()
            .map(|i| Numeric::Int(i128::from(i)))
            .or_else(|| n.as_u64().map(|u| Numeric::Int(i128::from(u))))
            .or_else(|| n.as_f64().map(Numeric::Float)),
        _ => None,
    }
}

/// Equality where `true == 1`, `false == 0` and `1 == 1.0`.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| loose_eq(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(key, l)| y.get(key).is_some_and(|r| loose_eq(l, r)))
        }
        _ => match (numeric(a), numeric(b)) {
            (Some(l), Some(r)) => l == r,
            _ => a == b,
        },
    }
}
