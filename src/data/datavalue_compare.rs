use crate::data::datatable::{DataType, DataValue};

/// Hashable identity of a cell value, used for distinct counts.
/// Floats are keyed by bit pattern with `-0.0` folded into `0.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Null,
    Integer(i64),
    Float(u64),
    String(String),
}

impl From<&DataValue> for ValueKey {
    fn from(value: &DataValue) -> Self {
        match value {
            DataValue::Null => ValueKey::Null,
            DataValue::Integer(i) => ValueKey::Integer(*i),
            DataValue::Float(f) if *f == 0.0 => ValueKey::Float(0.0f64.to_bits()),
            DataValue::Float(f) => ValueKey::Float(f.to_bits()),
            DataValue::String(s) => ValueKey::String(s.clone()),
        }
    }
}

/// A filter token coerced to a column's type
#[derive(Debug, Clone, PartialEq)]
enum Needle<'a> {
    Integer(i64),
    Number(f64),
    Text(&'a str),
    Unmatchable,
}

fn coerce_token(token: &str, data_type: DataType) -> Needle<'_> {
    match data_type {
        DataType::Integer | DataType::Float => {
            let trimmed = token.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                Needle::Integer(i)
            } else if let Ok(f) = trimmed.parse::<f64>() {
                Needle::Number(f)
            } else {
                Needle::Unmatchable
            }
        }
        DataType::String | DataType::Null => Needle::Text(token),
    }
}

/// `f` as an `i64` when it is a whole number inside the `i64` range
fn exact_integer(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Whether `cell` equals the user-supplied `token` when the token is read
/// as `data_type`. Null cells never match.
pub fn matches_token(cell: &DataValue, token: &str, data_type: DataType) -> bool {
    let needle = coerce_token(token, data_type);
    match (cell, needle) {
        (DataValue::Null, _) | (_, Needle::Unmatchable) => false,
        (DataValue::Integer(a), Needle::Integer(b)) => *a == b,
        // compared as integers so values past 2^53 don't collide after rounding
        (DataValue::Integer(a), Needle::Number(b)) => exact_integer(b) == Some(*a),
        (DataValue::Float(a), Needle::Integer(b)) => exact_integer(*a) == Some(b),
        (DataValue::Float(a), Needle::Number(b)) => *a == b,
        (DataValue::String(s), Needle::Text(t)) => s == t,
        // numeric column holding an unparseable cell, or a text column
        // built by hand with numeric cells
        (DataValue::String(s), Needle::Integer(_) | Needle::Number(_)) => s == token.trim(),
        (other, Needle::Text(t)) => other.to_string() == t,
    }
}
