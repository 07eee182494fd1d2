//! # Parse Error Definitions
//!
//! Two kinds of errors leave the engine:
//!
//! - [`ParseError`] - the input did not match. Built only by the top-level
//!   entry points from the furthest failure seen during the whole parse.
//! - [`UsageError`] - the grammar itself was misused (a forward declaration
//!   defined twice or used too early, an offset outside the input).
//!
//! ## Error Messages
//!
//! ```text
//! expected 'EOF' at 0:3
//! expected one of ',', ']' at 2:14
//! ```

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use super::state::Position;

/// The input did not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Everything that would have been accepted at the failure point.
    pub expected: BTreeSet<String>,
    /// Byte offset of the furthest failure.
    pub index: usize,
    /// Line and column of `index`.
    pub position: Position,
}

impl ParseError {
    pub fn new(expected: BTreeSet<String>, input: &str, index: usize) -> Self {
        Self {
            expected,
            index,
            position: Position::locate(input, index),
        }
    }

    /// The failure location rendered as `line:column`.
    pub fn line_info(&self) -> String {
        self.position.to_string()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted = self
            .expected
            .iter()
            .map(|e| format!("'{}'", e.escape_debug()))
            .collect::<Vec<_>>();

        if quoted.len() == 1 {
            write!(f, "expected {} at {}", quoted[0], self.position)
        } else {
            write!(
                f,
                "expected one of {} at {}",
                quoted.join(", "),
                self.position
            )
        }
    }
}

impl std::error::Error for ParseError {}

/// A regular expression parser could not be built.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error(transparent)]
    Regex(#[from] regex_automata::meta::BuildError),

    #[error("pattern {pattern:?} has no capture group {group}")]
    NoSuchGroup { pattern: String, group: String },
}

/// A programming error in how the grammar was built or invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("forward declaration has already been defined")]
    AlreadyDefined,

    #[error("forward declaration must be defined before it is used")]
    Undefined,

    #[error("offset {index} is not a character boundary within input of length {len}")]
    OffsetOutOfRange { index: usize, len: usize },
}
