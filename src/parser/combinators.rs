use std::ops::{Add, BitAnd, BitOr, Mul, Range, RangeFrom, RangeInclusive, Shl, Shr};
use std::sync::Arc;

use super::error::ParseError;
use super::generate::generate;
use super::primitives::{eof, line_info};
use super::state::{Diagnostics, Outcome, ParseResult, Parser, Position};

type ParserFn<T> = Arc<dyn Fn(&str, usize) -> ParseResult<T> + Send + Sync>;

// === Boxed Parser for type erasure ===

pub struct BoxedParser<T> {
    parser: ParserFn<T>,
}

impl<T> Clone for BoxedParser<T> {
    fn clone(&self) -> Self {
        BoxedParser {
            parser: Arc::clone(&self.parser),
        }
    }
}

impl<T> std::fmt::Debug for BoxedParser<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxedParser").finish_non_exhaustive()
    }
}

impl<T: 'static> BoxedParser<T> {
    pub fn new<P: Parser<T> + Send + Sync + 'static>(parser: P) -> Self {
        BoxedParser {
            parser: Arc::new(move |input: &str, index: usize| parser.run(input, index)),
        }
    }
}

impl<T> Parser<T> for BoxedParser<T> {
    fn run(&self, input: &str, index: usize) -> ParseResult<T> {
        (self.parser)(input, index)
    }
}

/// A value together with the span of input it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marked<T> {
    pub start: Position,
    pub value: T,
    pub end: Position,
}

// === Entry points ===

impl<T: 'static> BoxedParser<T> {
    /// Parse the whole of `input`.
    pub fn parse(&self, input: &str) -> Result<T, ParseError> {
        let (value, _) = self.clone().skip(eof()).parse_partial(input)?;
        Ok(value)
    }

    /// Parse the longest prefix of `input` this parser accepts, returning the
    /// value and the unconsumed rest.
    pub fn parse_partial<'a>(&self, input: &'a str) -> Result<(T, &'a str), ParseError> {
        let ParseResult {
            outcome,
            diagnostics,
        } = self.run(input, 0);

        match outcome {
            Outcome::Success { index, value } => {
                log::trace!("parsed {index} of {} bytes", input.len());
                Ok((value, input.get(index..).unwrap_or_default()))
            }
            Outcome::Failure => {
                let index = diagnostics.furthest.unwrap_or(0);
                let err = ParseError::new(diagnostics.expected, input, index);
                log::trace!("parse failed: {err}");
                Err(err)
            }
        }
    }
}

// === Combinators as methods ===

impl<T: 'static> BoxedParser<T> {
    /// Run self, then the parser `f` builds from its value.
    pub fn bind<U: 'static, F>(self, f: F) -> BoxedParser<U>
    where
        F: Fn(T) -> BoxedParser<U> + Send + Sync + 'static,
    {
        BoxedParser::new(move |input: &str, index: usize| {
            let ParseResult {
                outcome,
                diagnostics,
            } = self.run(input, index);
            match outcome {
                Outcome::Success { index, value } => {
                    f(value).run(input, index).aggregate(Some(&diagnostics))
                }
                Outcome::Failure => ParseResult::failed(diagnostics),
            }
        })
    }

    /// Map: transform result
    pub fn map<U: 'static, F>(self, f: F) -> BoxedParser<U>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        BoxedParser::new(move |input: &str, index: usize| self.run(input, index).map(&f))
    }

    /// Replace the produced value with `value`.
    pub fn result<U>(self, value: U) -> BoxedParser<U>
    where
        U: Clone + Send + Sync + 'static,
    {
        self.map(move |_| value.clone())
    }

    /// Sequence: parse self then other, return (T, U)
    pub fn and<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<(T, U)> {
        BoxedParser::new(move |input: &str, index: usize| {
            let first = self.run(input, index);
            let (index, left) = match first.outcome {
                Outcome::Success { index, value } => (index, value),
                Outcome::Failure => return ParseResult::failed(first.diagnostics),
            };

            let second = other.run(input, index).aggregate(Some(&first.diagnostics));
            match second.outcome {
                Outcome::Success { index, value } => {
                    ParseResult::success(index, (left, value)).aggregate(Some(&second.diagnostics))
                }
                Outcome::Failure => ParseResult::failed(second.diagnostics),
            }
        })
    }

    /// Keep right: parse self then other, discard self's result
    pub fn then<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<U> {
        self.and(other).map(|(_, right)| right)
    }

    /// Keep left: parse self then other, discard other's result
    pub fn skip<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<T> {
        self.and(other).map(|(left, _)| left)
    }

    /// Choice: try self, if it fails try other from the same offset
    pub fn or(self, other: BoxedParser<T>) -> BoxedParser<T> {
        BoxedParser::new(move |input: &str, index: usize| {
            let first = self.run(input, index);
            if first.is_success() {
                return first;
            }
            other.run(input, index).aggregate(Some(&first.diagnostics))
        })
    }

    /// Repeat between `min` and `max` times; `None` means no upper bound.
    ///
    /// Repetition is greedy and never backtracks into fewer matches. A `max`
    /// below `min` caps the count, lowering `min` to it.
    pub fn times(self, min: usize, max: Option<usize>) -> BoxedParser<Vec<T>> {
        let min = max.map_or(min, |max| min.min(max));
        BoxedParser::new(move |input: &str, index: usize| {
            let mut index = index;
            let mut values = Vec::new();
            let mut context: Option<Diagnostics> = None;

            while max.is_none_or(|max| values.len() < max) {
                let ParseResult {
                    outcome,
                    diagnostics,
                } = self.run(input, index);
                let merged = diagnostics.merge(context.as_ref());

                match outcome {
                    Outcome::Success { index: next, value } => {
                        values.push(value);
                        index = next;
                        context = Some(merged);
                    }
                    Outcome::Failure if values.len() >= min => {
                        context = Some(merged);
                        break;
                    }
                    Outcome::Failure => return ParseResult::failed(merged),
                }
            }

            ParseResult::success(index, values).aggregate(context.as_ref())
        })
    }

    pub fn exactly(self, n: usize) -> BoxedParser<Vec<T>> {
        self.times(n, Some(n))
    }

    /// Parse zero or more occurrences
    pub fn many(self) -> BoxedParser<Vec<T>> {
        self.times(0, None)
    }

    pub fn at_least(self, n: usize) -> BoxedParser<Vec<T>> {
        self.times(n, None)
    }

    pub fn at_most(self, n: usize) -> BoxedParser<Vec<T>> {
        self.times(0, Some(n))
    }

    /// Optional: parse zero or one
    pub fn optional(self) -> BoxedParser<Option<T>> {
        self.times(0, Some(1)).map(|mut values| values.pop())
    }

    pub fn optional_or(self, default: T) -> BoxedParser<T>
    where
        T: Clone + Send + Sync,
    {
        self.optional()
            .map(move |value| value.unwrap_or_else(|| default.clone()))
    }

    /// Repeat self until `terminator` matches, leaving the terminator unconsumed.
    pub fn until<U: 'static>(
        self,
        terminator: BoxedParser<U>,
        min: usize,
        max: Option<usize>,
    ) -> BoxedParser<Vec<T>> {
        repeat_until(self, terminator, min, max, None)
    }

    /// Like [`until`](Self::until), but the terminator is consumed and its
    /// value appended to the result.
    pub fn until_consuming(
        self,
        terminator: BoxedParser<T>,
        min: usize,
        max: Option<usize>,
    ) -> BoxedParser<Vec<T>> {
        repeat_until(self, terminator, min, max, Some(std::convert::identity))
    }

    /// Occurrences of self separated by `separator`, bounded like
    /// [`times`](Self::times).
    pub fn sep_by<U: 'static>(
        self,
        separator: BoxedParser<U>,
        min: usize,
        max: Option<usize>,
    ) -> BoxedParser<Vec<T>> {
        let min = max.map_or(min, |max| min.min(max));
        let nothing = BoxedParser::new(|_: &str, index: usize| ParseResult::success(index, Vec::new()));
        if max == Some(0) {
            return nothing;
        }

        let rest = separator
            .then(self.clone())
            .times(min.saturating_sub(1), max.map(|max| max - 1));
        let items = self.and(rest).map(|(first, rest)| {
            let mut items = Vec::with_capacity(rest.len() + 1);
            items.push(first);
            items.extend(rest);
            items
        });

        if min == 0 { items.or(nothing) } else { items }
    }

    /// Run self without consuming any input.
    pub fn peek(self) -> BoxedParser<T> {
        BoxedParser::new(move |input: &str, index: usize| {
            let result = self.run(input, index);
            match result.outcome {
                Outcome::Success { value, .. } => ParseResult::success(index, value),
                Outcome::Failure => ParseResult::failed(result.diagnostics),
            }
        })
    }

    /// Negative lookahead: succeed, consuming nothing, only where self fails.
    ///
    /// The produced value is self's failed result.
    pub fn should_fail(self, description: impl Into<String>) -> BoxedParser<ParseResult<T>> {
        let description = description.into();
        BoxedParser::new(move |input: &str, index: usize| {
            let result = self.run(input, index);
            if result.is_success() {
                ParseResult::failure(index, description.clone())
            } else {
                ParseResult::success(index, result)
            }
        })
    }

    /// Report failures as expecting `description` at the starting offset.
    pub fn desc(self, description: impl Into<String>) -> BoxedParser<T> {
        let description = description.into();
        BoxedParser::new(move |input: &str, index: usize| {
            let result = self.run(input, index);
            if result.is_success() {
                result
            } else {
                ParseResult::failure(index, description.clone())
            }
        })
    }

    /// Wrap the value with the positions where its match starts and ends.
    pub fn mark(self) -> BoxedParser<Marked<T>> {
        let position = line_info();
        generate(move |g| {
            let start = g.step(&position)?;
            let value = g.step(&self)?;
            let end = g.step(&position)?;
            Ok(Marked { start, value, end })
        })
    }

    pub fn tag(self, name: impl Into<String>) -> BoxedParser<(String, T)> {
        let name = name.into();
        self.map(move |value| (name.clone(), value))
    }
}

impl<S: 'static> BoxedParser<Vec<S>> {
    /// Join the collected pieces into one string.
    pub fn concat(self) -> BoxedParser<String>
    where
        String: FromIterator<S>,
    {
        self.map(|pieces| pieces.into_iter().collect())
    }
}

fn repeat_until<T: 'static, U: 'static>(
    item: BoxedParser<T>,
    terminator: BoxedParser<U>,
    min: usize,
    max: Option<usize>,
    consume: Option<fn(U) -> T>,
) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |input: &str, index: usize| {
        let mut index = index;
        let mut values = Vec::new();

        loop {
            let end = terminator.run(input, index);
            if values.len() >= min {
                if let Outcome::Success { index: after, value } = end.outcome {
                    if let Some(convert) = consume {
                        values.push(convert(value));
                        index = after;
                    }
                    return ParseResult::success(index, values);
                }
            }

            if let Some(max) = max {
                if values.len() >= max {
                    return ParseResult::failure(index, format!("at most {max} items"));
                }
            }

            match item.run(input, index).outcome {
                Outcome::Success { index: next, value } => {
                    values.push(value);
                    index = next;
                }
                Outcome::Failure if values.len() >= min => {
                    return ParseResult::failure(index, "did not find terminator");
                }
                Outcome::Failure => {
                    return ParseResult::failure(
                        index,
                        format!("at least {min} items; got {} item(s)", values.len()),
                    );
                }
            }
        }
    })
}

/// Run `parser` without consuming any input.
pub fn peek<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<T> {
    parser.peek()
}

/// Build a flat tuple parser from up to six parsers run in sequence.
#[macro_export]
macro_rules! seq {
    ($a:expr $(,)?) => {
        $a.map(|a| (a,))
    };
    ($a:expr, $b:expr $(,)?) => {
        $a.and($b)
    };
    ($a:expr, $b:expr, $c:expr $(,)?) => {
        $a.and($b).and($c).map(|((a, b), c)| (a, b, c))
    };
    ($a:expr, $b:expr, $c:expr, $d:expr $(,)?) => {
        $a.and($b)
            .and($c)
            .and($d)
            .map(|(((a, b), c), d)| (a, b, c, d))
    };
    ($a:expr, $b:expr, $c:expr, $d:expr, $e:expr $(,)?) => {
        $a.and($b)
            .and($c)
            .and($d)
            .and($e)
            .map(|((((a, b), c), d), e)| (a, b, c, d, e))
    };
    ($a:expr, $b:expr, $c:expr, $d:expr, $e:expr, $f:expr $(,)?) => {
        $a.and($b)
            .and($c)
            .and($d)
            .and($e)
            .and($f)
            .map(|(((((a, b), c), d), e), f)| (a, b, c, d, e, f))
    };
}

// === Operator Overloading ===

/// `|` for choice: A | B -> A or B
impl<T: 'static> BitOr<BoxedParser<T>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn bitor(self, rhs: BoxedParser<T>) -> Self::Output {
        self.or(rhs)
    }
}

/// `&` for sequence: A & B -> (A, B)
impl<T: 'static, U: 'static> BitAnd<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<(T, U)>;

    fn bitand(self, rhs: BoxedParser<U>) -> Self::Output {
        self.and(rhs)
    }
}

/// `>>` for keep right: A >> B -> B
impl<T: 'static, U: 'static> Shr<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn shr(self, rhs: BoxedParser<U>) -> Self::Output {
        self.then(rhs)
    }
}

/// `<<` for keep left: A << B -> A
impl<T: 'static, U: 'static> Shl<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn shl(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip(rhs)
    }
}

/// `+` for concatenation of string results
impl Add for BoxedParser<String> {
    type Output = BoxedParser<String>;

    fn add(self, rhs: BoxedParser<String>) -> Self::Output {
        self.and(rhs).map(|(mut left, right)| {
            left.push_str(&right);
            left
        })
    }
}

/// `+` for concatenation of list results
impl<T: 'static> Add for BoxedParser<Vec<T>> {
    type Output = BoxedParser<Vec<T>>;

    fn add(self, rhs: BoxedParser<Vec<T>>) -> Self::Output {
        self.and(rhs).map(|(mut left, right)| {
            left.extend(right);
            left
        })
    }
}

/// `*` with a count: exactly n repetitions
impl<T: 'static> Mul<usize> for BoxedParser<T> {
    type Output = BoxedParser<Vec<T>>;

    fn mul(self, n: usize) -> Self::Output {
        self.exactly(n)
    }
}

/// `*` with a half-open range of repetition counts
impl<T: 'static> Mul<Range<usize>> for BoxedParser<T> {
    type Output = BoxedParser<Vec<T>>;

    fn mul(self, range: Range<usize>) -> Self::Output {
        self.times(range.start, Some(range.end.saturating_sub(1)))
    }
}

impl<T: 'static> Mul<RangeInclusive<usize>> for BoxedParser<T> {
    type Output = BoxedParser<Vec<T>>;

    fn mul(self, range: RangeInclusive<usize>) -> Self::Output {
        self.times(*range.start(), Some(*range.end()))
    }
}

impl<T: 'static> Mul<RangeFrom<usize>> for BoxedParser<T> {
    type Output = BoxedParser<Vec<T>>;

    fn mul(self, range: RangeFrom<usize>) -> Self::Output {
        self.at_least(range.start)
    }
}
