use std::collections::BTreeSet;

use super::error::UsageError;

/// A zero-based line/column location in the input.
///
/// Positions are computed on demand from byte offsets; the column counts
/// characters, not bytes, since the last newline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Locate `index` in `input`, clamping offsets past the end.
    pub(crate) fn locate(input: &str, index: usize) -> Self {
        let mut end = index.min(input.len());
        while !input.is_char_boundary(end) {
            end -= 1;
        }
        Self::count(&input[..end])
    }

    fn count(prefix: &str) -> Self {
        let line = prefix.matches('\n').count();
        let line_start = prefix.rfind('\n').map_or(0, |nl| nl + 1);
        let column = prefix[line_start..].chars().count();
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Convert an absolute byte offset into a [`Position`].
pub fn line_info_at(input: &str, index: usize) -> Result<Position, UsageError> {
    match input.get(..index) {
        Some(prefix) => Ok(Position::count(prefix)),
        None => Err(UsageError::OffsetOutOfRange {
            index,
            len: input.len(),
        }),
    }
}

/// The deepest failure seen so far and what was expected there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Offset of the furthest failure; `None` sorts below every offset.
    pub furthest: Option<usize>,
    pub expected: BTreeSet<String>,
}

impl Diagnostics {
    pub fn at(index: usize, expected: impl Into<String>) -> Self {
        Self {
            furthest: Some(index),
            expected: BTreeSet::from([expected.into()]),
        }
    }

    /// Keep whichever side failed further along, uniting expectations on a tie.
    pub fn merge(self, prior: Option<&Diagnostics>) -> Self {
        let Some(prior) = prior else {
            return self;
        };

        match self.furthest.cmp(&prior.furthest) {
            std::cmp::Ordering::Greater => self,
            std::cmp::Ordering::Equal => {
                let mut expected = self.expected;
                expected.extend(prior.expected.iter().cloned());
                Self {
                    furthest: self.furthest,
                    expected,
                }
            }
            std::cmp::Ordering::Less => prior.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success { index: usize, value: T },
    Failure,
}

/// The outcome of one parse attempt at one offset.
///
/// Diagnostics are tracked independently of the outcome: a success still
/// remembers the deepest failure among the alternatives it rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult<T> {
    pub outcome: Outcome<T>,
    pub diagnostics: Diagnostics,
}

impl<T> ParseResult<T> {
    pub fn success(index: usize, value: T) -> Self {
        Self {
            outcome: Outcome::Success { index, value },
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn failure(index: usize, expected: impl Into<String>) -> Self {
        Self::failed(Diagnostics::at(index, expected))
    }

    /// A failure carrying already-collected diagnostics.
    pub fn failed(diagnostics: Diagnostics) -> Self {
        Self {
            outcome: Outcome::Failure,
            diagnostics,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }

    /// The offset parsing continues from, if this is a success.
    pub fn index(&self) -> Option<usize> {
        match self.outcome {
            Outcome::Success { index, .. } => Some(index),
            Outcome::Failure => None,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match &self.outcome {
            Outcome::Success { value, .. } => Some(value),
            Outcome::Failure => None,
        }
    }

    pub fn furthest(&self) -> Option<usize> {
        self.diagnostics.furthest
    }

    pub fn expected(&self) -> &BTreeSet<String> {
        &self.diagnostics.expected
    }

    /// Merge the diagnostics of a prior attempt into this result.
    pub fn aggregate(self, prior: Option<&Diagnostics>) -> Self {
        Self {
            outcome: self.outcome,
            diagnostics: self.diagnostics.merge(prior),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseResult<U> {
        let outcome = match self.outcome {
            Outcome::Success { index, value } => Outcome::Success {
                index,
                value: f(value),
            },
            Outcome::Failure => Outcome::Failure,
        };
        ParseResult {
            outcome,
            diagnostics: self.diagnostics,
        }
    }
}

/// Anything that can consume a prefix of `input` starting at `index`.
pub trait Parser<T> {
    fn run(&self, input: &str, index: usize) -> ParseResult<T>;
}

// Allow closures to be parsers
impl<T, F: Fn(&str, usize) -> ParseResult<T>> Parser<T> for F {
    fn run(&self, input: &str, index: usize) -> ParseResult<T> {
        self(input, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_clamps_past_the_end() {
        assert_eq!(Position::locate("ab\ncd", 99), Position::new(1, 2));
    }

    #[test]
    fn locate_counts_characters_not_bytes() {
        assert_eq!(Position::locate("é\nüx", 5), Position::new(1, 1));
    }

    #[test]
    fn merge_prefers_the_further_failure() {
        let near = Diagnostics::at(1, "a");
        let far = Diagnostics::at(4, "b");
        assert_eq!(near.clone().merge(Some(&far)), far);
        assert_eq!(far.clone().merge(Some(&near)), far);
    }

    #[test]
    fn merge_unites_expectations_on_a_tie() {
        let merged = Diagnostics::at(2, "a").merge(Some(&Diagnostics::at(2, "b")));
        assert_eq!(merged.furthest, Some(2));
        assert_eq!(
            merged.expected.into_iter().collect::<Vec<_>>(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn success_keeps_value_when_taking_prior_diagnostics() {
        let result = ParseResult::success(3, 'x').aggregate(Some(&Diagnostics::at(5, "y")));
        assert_eq!(result.index(), Some(3));
        assert_eq!(result.value(), Some(&'x'));
        assert_eq!(result.furthest(), Some(5));
    }
}
