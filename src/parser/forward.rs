//! Forward declarations for recursive grammars.
//!
//! A grammar rule that refers to itself cannot be built bottom-up. Declare it
//! first, hand out references to the declaration while building the rule,
//! then [`define`](ForwardDeclaration::define) it:
//!
//! ```
//! use parcomb::parser::{ForwardDeclaration, literal};
//!
//! let nested = ForwardDeclaration::<String>::new();
//! let rule = (literal("[") >> nested.parser() << literal("]")) | literal("x");
//! nested.define(rule).unwrap();
//!
//! assert_eq!(nested.parser().parse("[[x]]").unwrap(), "x");
//! ```

use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::combinators::BoxedParser;
use super::error::UsageError;
use super::state::{ParseResult, Parser};

/// A placeholder parser that is defined exactly once, after the parsers
/// referring to it have been built.
///
/// Every clone and every parser obtained from [`parser`](Self::parser) shares
/// the same cell, so defining any of them defines all of them.
///
/// A recursive grammar holds a reference to its own declaration, so the
/// grammar and everything it captures stay alive until the process exits,
/// even after every handle to it is dropped. Build such grammars once and
/// clone the resulting parser rather than rebuilding them per input.
pub struct ForwardDeclaration<T> {
    cell: Arc<OnceCell<BoxedParser<T>>>,
}

impl<T> Clone for ForwardDeclaration<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> Default for ForwardDeclaration<T> {
    fn default() -> Self {
        Self {
            cell: Arc::new(OnceCell::new()),
        }
    }
}

impl<T> ForwardDeclaration<T> {
    pub fn is_defined(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> std::fmt::Debug for ForwardDeclaration<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForwardDeclaration")
            .field("defined", &self.is_defined())
            .finish()
    }
}

impl<T: 'static> ForwardDeclaration<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the declaration to `parser`.
    pub fn define(&self, parser: BoxedParser<T>) -> Result<(), UsageError> {
        match self.cell.set(parser) {
            Ok(()) => {
                log::debug!("forward declaration defined");
                Ok(())
            }
            Err(_) => {
                log::debug!("rejected second definition of a forward declaration");
                Err(UsageError::AlreadyDefined)
            }
        }
    }

    /// A parser that defers to the declaration each time it runs.
    ///
    /// Running it before [`define`](Self::define) panics: that is a bug in the
    /// grammar, not a property of the input.
    pub fn parser(&self) -> BoxedParser<T> {
        BoxedParser::new(self.clone())
    }

    /// The defined parser itself, or [`UsageError::Undefined`].
    pub fn try_parser(&self) -> Result<BoxedParser<T>, UsageError> {
        self.cell.get().cloned().ok_or(UsageError::Undefined)
    }
}

impl<T> Parser<T> for ForwardDeclaration<T> {
    fn run(&self, input: &str, index: usize) -> ParseResult<T> {
        match self.cell.get() {
            Some(parser) => parser.run(input, index),
            None => panic!("{}", UsageError::Undefined),
        }
    }
}
