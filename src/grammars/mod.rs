//! Example grammars built on the combinator engine
//!
//! These are ordinary users of the public API and double as acceptance tests
//! for it:
//! - `json`: JSON documents, with string escapes and nested containers
//! - `sexpr`: S-expressions with comments, booleans and quoting

pub mod json;
pub mod sexpr;

use thiserror::Error;

use crate::parser::{BoxedParser, PatternError, UsageError};

/// A grammar could not be assembled.
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Usage(#[from] UsageError),
}

/// Run `parser`, then skip whatever `trailing` matches.
fn lexeme<T: 'static>(parser: BoxedParser<T>, trailing: &BoxedParser<String>) -> BoxedParser<T> {
    parser << trailing.clone()
}
