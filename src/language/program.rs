//! Line table: parse numbered source lines and sort them for execution.

use crate::error::{Result, RunError};
use serde::{Deserialize, Serialize};

/// What to do when two lines share a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateLinePolicy {
    /// Keep both, in source order. `GOTO` lands on the first.
    #[default]
    Keep,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramLine {
    pub line_number: u64,
    /// Statement text, trimmed and not yet decoded.
    pub statement: String,
}

impl ProgramLine {
    /// Split `<integer> <statement>`. Returns `None` for anything else.
    fn parse(line: &str) -> Option<Self> {
        let (number, rest) = line.split_once(char::is_whitespace)?;
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let statement = rest.trim();
        if statement.is_empty() {
            return None;
        }
        Some(Self {
            line_number: number.parse().ok()?,
            statement: statement.to_string(),
        })
    }
}

/// A parsed program: lines sorted ascending by number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    lines: Vec<ProgramLine>,
}

impl Program {
    pub fn parse(source: &str) -> Result<Self> {
        Self::parse_with(source, DuplicateLinePolicy::Keep)
    }

    /// Parse every non-blank line, then stable-sort by line number.
    ///
    /// The first malformed line fails the whole program; nothing is
    /// executed.
    pub fn parse_with(source: &str, duplicates: DuplicateLinePolicy) -> Result<Self> {
        let mut lines = Vec::new();
        for raw in source.lines() {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let line = ProgramLine::parse(raw).ok_or_else(|| RunError::InvalidLineFormat {
                line: raw.to_string(),
            })?;
            lines.push(line);
        }

        lines.sort_by_key(|l| l.line_number);

        if duplicates == DuplicateLinePolicy::Reject {
            if let Some(pair) = lines.windows(2).find(|w| w[0].line_number == w[1].line_number) {
                return Err(RunError::DuplicateLineNumber {
                    line_number: pair[0].line_number,
                });
            }
        }

        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[ProgramLine] {
        &self.lines
    }

    pub fn get(&self, index: usize) -> Option<&ProgramLine> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index of the first line numbered `line_number`.
    pub fn index_of(&self, line_number: u64) -> Option<usize> {
        let idx = self.lines.partition_point(|l| l.line_number < line_number);
        (self.lines.get(idx)?.line_number == line_number).then_some(idx)
    }
}
