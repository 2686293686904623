/// Statement decoding: turn one line's text into a typed `Statement`.
///
/// Decoding is purely syntactic. Operands stay as expression text and are
/// evaluated by the executor against the variable store at the moment the
/// statement runs, so `HADAMARD Q` sees whatever `Q` holds at that point.
///
/// Keywords are matched case-insensitively on the first whitespace-delimited
/// word. `THEN` is matched the same way, outside string literals.
use super::value::is_identifier;
use crate::error::{Result, RunError};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `PRINT a; b; ...`: items concatenated into one output line.
    Print(Vec<String>),
    Let { name: String, expr: String },
    QInit(String),
    Hadamard(String),
    QNot(String),
    Cnot { control: String, target: String },
    Measure(String),
    If { condition: String, then: Box<Statement> },
    Goto(String),
    End,
    Rem(String),
}

impl Statement {
    pub fn parse(text: &str) -> Result<Statement> {
        let text = text.trim();
        let (keyword, rest) = match text.split_once(char::is_whitespace) {
            Some((kw, rest)) => (kw, rest.trim()),
            None => (text, ""),
        };

        match keyword.to_ascii_uppercase().as_str() {
            "PRINT" => Ok(Statement::Print(
                split_outside_quotes(rest, ';')
                    .into_iter()
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(String::from)
                    .collect(),
            )),
            "LET" => {
                let (name, expr) = rest
                    .split_once('=')
                    .ok_or_else(|| RunError::malformed(text, "expected LET <name> = <expr>"))?;
                let (name, expr) = (name.trim(), expr.trim());
                if !is_identifier(name) {
                    return Err(RunError::malformed(text, format!("invalid variable name '{name}'")));
                }
                if expr.is_empty() {
                    return Err(RunError::malformed(text, "missing expression"));
                }
                Ok(Statement::Let { name: name.to_string(), expr: expr.to_string() })
            }
            "QINIT" => operand(text, rest).map(Statement::QInit),
            "HADAMARD" => operand(text, rest).map(Statement::Hadamard),
            "QNOT" => operand(text, rest).map(Statement::QNot),
            "MEASURE" => operand(text, rest).map(Statement::Measure),
            "CNOT" => {
                let (control, target) = rest
                    .split_once(',')
                    .ok_or_else(|| RunError::malformed(text, "expected CNOT <control>,<target>"))?;
                Ok(Statement::Cnot {
                    control: operand(text, control.trim())?,
                    target: operand(text, target.trim())?,
                })
            }
            "IF" => parse_if(text, rest),
            "GOTO" => operand(text, rest).map(Statement::Goto),
            "END" if rest.is_empty() => Ok(Statement::End),
            "END" => Err(RunError::malformed(text, "END takes no operands")),
            "REM" => Ok(Statement::Rem(rest.to_string())),
            _ => Err(RunError::UnknownStatement { statement: text.to_string() }),
        }
    }

    /// True for the statements that need a quantum engine.
    pub fn is_quantum(&self) -> bool {
        matches!(
            self,
            Statement::QInit(_)
                | Statement::Hadamard(_)
                | Statement::QNot(_)
                | Statement::Cnot { .. }
                | Statement::Measure(_)
        )
    }
}

fn operand(statement: &str, text: &str) -> Result<String> {
    if text.is_empty() {
        return Err(RunError::malformed(statement, "missing operand"));
    }
    Ok(text.to_string())
}

fn parse_if(text: &str, rest: &str) -> Result<Statement> {
    let (condition, then) = split_then(rest).ok_or_else(|| RunError::MissingThen {
        statement: text.to_string(),
    })?;
    let then = then.trim();
    if then.is_empty() {
        return Err(RunError::malformed(text, "nothing after THEN"));
    }

    // `THEN 40` means `THEN GOTO 40`
    let then = if then.bytes().all(|b| b.is_ascii_digit()) {
        Statement::Goto(then.to_string())
    } else {
        Statement::parse(then)?
    };
    if matches!(then, Statement::If { .. }) {
        return Err(RunError::malformed(text, "nested IF is not supported"));
    }

    Ok(Statement::If {
        condition: condition.trim().to_string(),
        then: Box::new(then),
    })
}

/// Split at the first whitespace-delimited `THEN` outside string literals.
fn split_then(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    let mut in_string = false;
    for i in 0..bytes.len() {
        if bytes[i] == b'"' {
            in_string = !in_string;
            continue;
        }
        if in_string || !bytes[i..].get(..4)?.eq_ignore_ascii_case(b"THEN") {
            continue;
        }
        let before_ok = i == 0 || bytes[i - 1].is_ascii_whitespace();
        let after_ok = bytes.get(i + 4).map_or(true, u8::is_ascii_whitespace);
        if before_ok && after_ok {
            return Some((&text[..i], &text[i + 4..]));
        }
    }
    None
}

/// Split on `sep` wherever it appears outside a string literal.
fn split_outside_quotes(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_string = false;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if c == '"' {
            in_string = !in_string;
        } else if c == sep && !in_string {
            parts.push(&text[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&text[start..]);
    parts
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Print(items) if items.is_empty() => f.write_str("PRINT"),
            Statement::Print(items) => write!(f, "PRINT {}", items.join("; ")),
            Statement::Let { name, expr } => write!(f, "LET {name} = {expr}"),
            Statement::QInit(n) => write!(f, "QINIT {n}"),
            Statement::Hadamard(q) => write!(f, "HADAMARD {q}"),
            Statement::QNot(q) => write!(f, "QNOT {q}"),
            Statement::Cnot { control, target } => write!(f, "CNOT {control},{target}"),
            Statement::Measure(q) => write!(f, "MEASURE {q}"),
            Statement::If { condition, then } => write!(f, "IF {condition} THEN {then}"),
            Statement::Goto(target) => write!(f, "GOTO {target}"),
            Statement::End => f.write_str("END"),
            Statement::Rem(text) if text.is_empty() => f.write_str("REM"),
            Statement::Rem(text) => write!(f, "REM {text}"),
        }
    }
}
