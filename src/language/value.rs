//! Runtime values and the variable store.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Variable name bound to the most recent `MEASURE` outcome.
pub const MEASUREMENT_VARIABLE: &str = "QRESULT";

/// Variable store for one run. Names are case-sensitive.
pub type Variables = HashMap<String, Value>;

/// A BASIC value: untyped, either a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Numeric reading of the value. Text counts when it is a complete
    /// numeric literal, so `"5"` compares equal to `5`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(t) => parse_number(t),
        }
    }

    /// Integral reading, for qubit indices and line numbers. Whole numbers
    /// beyond the `i64` range saturate to `i64::MIN` / `i64::MAX`.
    pub fn as_integer(&self) -> Option<i64> {
        let n = self.as_number()?;
        // `as` saturates for finite floats
        (n.is_finite() && n.fract() == 0.0).then_some(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(t) => f.write_str(t),
            Self::Number(n) if n.is_nan() => f.write_str("NaN"),
            Self::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            // -0 prints as 0
            Self::Number(n) if *n == 0.0 => f.write_str("0"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Parse a complete numeric literal: optional sign, then digits with an
/// optional fraction and exponent (`12`, `-3.5`, `.5`, `1e3`).
///
/// Words that `f64::from_str` would accept, like `inf` or `NaN`, are not
/// literals here; they remain available as variable names.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let mut chars = unsigned.chars();
    let starts_numeric = match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    };
    if !starts_numeric {
        return None;
    }
    text.parse::<f64>().ok()
}

/// True for `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
