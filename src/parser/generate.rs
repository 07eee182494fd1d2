//! # Sequential Composition
//!
//! Some grammars choose their next rule from a value parsed earlier: a
//! length prefix, a tag selecting a body format, an opening delimiter that
//! must be closed by its mirror. [`generate`] expresses these as a plain
//! block of steps instead of nested [`bind`](super::BoxedParser::bind)
//! closures:
//!
//! ```
//! use parcomb::parser::{generate, literal, pattern};
//!
//! let digits = pattern("[0-9]+").unwrap();
//! let sized = generate(move |g| {
//!     let count: usize = g.step(&digits)?.parse().unwrap_or(0);
//!     let _ = g.step(&literal(":"))?;
//!     g.step(&literal("x").exactly(count))
//! });
//!
//! assert_eq!(sized.parse("2:xx").unwrap().len(), 2);
//! assert!(sized.parse("3:xx").is_err());
//! ```
//!
//! ## Driver States
//!
//! Each run of a generated parser owns a [`Generator`] that starts out
//! running at the caller's offset. Every [`step`](Generator::step) runs one
//! parser there and merges its diagnostics into the running context:
//!
//! ```text
//! Running(index, context) --step ok--> Running(next index, merged context)
//! Running(index, context) --step fails--> Halted(merged context)
//! ```
//!
//! Once halted, the whole generated parser fails with the merged context,
//! whatever the body does afterwards.

use super::combinators::BoxedParser;
use super::state::{Diagnostics, Outcome, ParseResult, Parser};

/// Returned by a step whose parser failed. Propagate it with `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Halt(());

enum DriverState {
    Running {
        index: usize,
        context: Option<Diagnostics>,
    },
    Halted(Diagnostics),
}

/// The step driver handed to a [`generate`] body.
pub struct Generator<'a> {
    input: &'a str,
    state: DriverState,
}

impl<'a> Generator<'a> {
    fn start(input: &'a str, index: usize) -> Self {
        Self {
            input,
            state: DriverState::Running {
                index,
                context: None,
            },
        }
    }

    /// Run `parser` at the current offset and return its value.
    pub fn step<U, P>(&mut self, parser: &P) -> Result<U, Halt>
    where
        P: Parser<U> + ?Sized,
    {
        let (index, context) = match &mut self.state {
            DriverState::Running { index, context } => (*index, context.take()),
            DriverState::Halted(_) => return Err(Halt(())),
        };

        let ParseResult {
            outcome,
            diagnostics,
        } = parser.run(self.input, index);
        let merged = diagnostics.merge(context.as_ref());

        match outcome {
            Outcome::Success { index: next, value } => {
                log::trace!("generate step {index}..{next}");
                self.state = DriverState::Running {
                    index: next,
                    context: Some(merged),
                };
                Ok(value)
            }
            Outcome::Failure => {
                log::trace!("generate step failed at {index}");
                self.state = DriverState::Halted(merged);
                Err(Halt(()))
            }
        }
    }

    /// The offset the next step will start from.
    pub fn index(&self) -> Option<usize> {
        match self.state {
            DriverState::Running { index, .. } => Some(index),
            DriverState::Halted(_) => None,
        }
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.state, DriverState::Halted(_))
    }

    fn finish<T>(self, body: Result<T, Halt>) -> ParseResult<T> {
        match (self.state, body) {
            (DriverState::Running { index, context }, Ok(value)) => {
                ParseResult::success(index, value).aggregate(context.as_ref())
            }
            (DriverState::Running { context, .. }, Err(Halt(()))) => {
                ParseResult::failed(context.unwrap_or_default())
            }
            (DriverState::Halted(diagnostics), _) => ParseResult::failed(diagnostics),
        }
    }
}

/// Build a parser from a body that drives its sub-parsers step by step.
///
/// The body runs once per parse attempt. Each call to
/// [`Generator::step`] consumes input; returning `Ok(value)` ends the
/// sequence successfully with `value`.
pub fn generate<T: 'static, F>(body: F) -> BoxedParser<T>
where
    F: Fn(&mut Generator<'_>) -> Result<T, Halt> + Send + Sync + 'static,
{
    BoxedParser::new(move |input: &str, index: usize| {
        let mut generator = Generator::start(input, index);
        let outcome = body(&mut generator);
        generator.finish(outcome)
    })
}
