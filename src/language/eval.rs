//! Expression and condition evaluation against a variable store.
//!
//! Evaluation is best-effort: text that cannot be read as a literal, a
//! variable, or an arithmetic expression evaluates to itself. `PRINT FOO`
//! with `FOO` unbound prints `FOO`; nothing here ever fails a run.

use super::expr::eval_str;
use super::value::{parse_number, Value, Variables};
use std::cmp::Ordering;
use std::fmt;
use tracing::trace;

/// Comparison operators usable in `IF` conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Comparison {
    fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
        }
    }

    fn holds(self, ordering: Option<Ordering>) -> bool {
        match self {
            Self::Eq => ordering == Some(Ordering::Equal),
            Self::Ne => ordering != Some(Ordering::Equal),
            Self::Lt => ordering == Some(Ordering::Less),
            Self::Gt => ordering == Some(Ordering::Greater),
            Self::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
            Self::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Split a condition at its comparison operator.
///
/// The operator is the one starting at the earliest position outside a
/// string literal; when two operators start there, the longer wins, so
/// `A <= 3` splits on `<=` rather than on `<` or `=`. Returns `None` when
/// the text holds no operator.
pub fn split_condition(cond: &str) -> Option<(&str, Comparison, &str)> {
    let bytes = cond.as_bytes();
    let mut in_string = false;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'"' => in_string = !in_string,
            b'<' | b'>' | b'=' if !in_string => {
                let next = bytes.get(i + 1).copied();
                let (op, len) = match (b, next) {
                    (b'<', Some(b'>')) => (Comparison::Ne, 2),
                    (b'<', Some(b'=')) => (Comparison::Le, 2),
                    (b'>', Some(b'=')) => (Comparison::Ge, 2),
                    (b'<', _) => (Comparison::Lt, 1),
                    (b'>', _) => (Comparison::Gt, 1),
                    _ => (Comparison::Eq, 1),
                };
                return Some((&cond[..i], op, &cond[i + len..]));
            }
            _ => {}
        }
    }
    None
}

/// Loose comparison: numeric when both sides read as numbers, otherwise by
/// text.
pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        _ => Some(left.to_string().cmp(&right.to_string())),
    }
}

/// Evaluator bound to one run's variable store.
pub struct Evaluator<'a> {
    vars: &'a Variables,
}

impl<'a> Evaluator<'a> {
    pub fn new(vars: &'a Variables) -> Self {
        Self { vars }
    }

    /// Evaluate `expr`, in order: string literal, bound variable, numeric
    /// literal, arithmetic expression, and finally the text itself.
    pub fn evaluate(&self, expr: &str) -> Value {
        let expr = expr.trim();

        if expr.len() >= 2 && expr.starts_with('"') && expr.ends_with('"') {
            return Value::Text(expr[1..expr.len() - 1].to_string());
        }
        if let Some(value) = self.vars.get(expr) {
            return value.clone();
        }
        if let Some(n) = parse_number(expr) {
            return Value::Number(n);
        }
        match eval_str(expr, self.vars) {
            Ok(value) => value,
            Err(err) => {
                trace!(expr, %err, "expression fell back to literal text");
                Value::Text(expr.to_string())
            }
        }
    }

    /// Evaluate an `IF` condition. Text without a comparison operator is
    /// false.
    pub fn evaluate_condition(&self, cond: &str) -> bool {
        let Some((lhs, op, rhs)) = split_condition(cond) else {
            trace!(cond, "condition has no comparison operator");
            return false;
        };
        let left = self.evaluate(lhs);
        let right = self.evaluate(rhs);
        op.holds(compare(&left, &right))
    }
}
