//! Numeric coercion for user-entered and loaded values.
//!
//! Every numeric field in the dataset passes through [`ToNumber`] before it is
//! stored. Coercion is total: anything that is not a finite number becomes `0.0`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Total conversion of a raw input into a finite `f64`.
pub trait ToNumber {
    fn to_number(&self) -> f64;
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

impl ToNumber for f64 {
    fn to_number(&self) -> f64 {
        finite_or_zero(*self)
    }
}

impl ToNumber for i64 {
    fn to_number(&self) -> f64 {
        *self as f64
    }
}

impl ToNumber for str {
    fn to_number(&self) -> f64 {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            return 0.0;
        }
        trimmed.parse::<f64>().map(finite_or_zero).unwrap_or(0.0)
    }
}

impl ToNumber for String {
    fn to_number(&self) -> f64 {
        self.as_str().to_number()
    }
}

impl ToNumber for bool {
    fn to_number(&self) -> f64 {
        if *self { 1.0 } else { 0.0 }
    }
}

impl ToNumber for Value {
    fn to_number(&self) -> f64 {
        match self {
            Value::Number(n) => n.as_f64().map(finite_or_zero).unwrap_or(0.0),
            Value::String(s) => s.to_number(),
            Value::Bool(b) => b.to_number(),
            Value::Null | Value::Array(_) | Value::Object(_) => 0.0,
        }
    }
}

impl<T: ToNumber + ?Sized> ToNumber for &T {
    fn to_number(&self) -> f64 {
        (**self).to_number()
    }
}

impl<T: ToNumber> ToNumber for Option<T> {
    fn to_number(&self) -> f64 {
        self.as_ref().map(ToNumber::to_number).unwrap_or(0.0)
    }
}

/// `deserialize_with` helper: accepts any JSON value and coerces it.
pub fn deserialize_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(raw.to_number())
}
