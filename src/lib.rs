//! # parcomb - Parser Combinators over Text
//!
//! parcomb builds parsers out of small, immutable pieces. A parser is a
//! function from an input string and a byte offset to a [`ParseResult`]:
//! either a success carrying the next offset and a value, or a failure.
//! Bigger parsers are made by combining smaller ones.
//!
//! ## Execution Model
//!
//! - **Ordered choice**: `a | b` tries `a`, and only if it fails tries `b`
//!   from the same offset. The first success wins for good; there is no
//!   ambiguity detection and no memoization.
//! - **Greedy repetition**: `many`, `times`, `sep_by` and friends take as
//!   many matches as they can and never give any back.
//! - **Furthest failure**: every result remembers the deepest offset at
//!   which any attempted alternative failed, and what was expected there.
//!   Successful results keep this too, so a later failure can still report
//!   the most informative point of the whole parse.
//!
//! ```text
//! literal("a") | literal("b")   on "c"   =>  expected one of 'a', 'b' at 0:0
//! ```
//!
//! ## Recursive and Data-Dependent Grammars
//!
//! - [`ForwardDeclaration`] is a placeholder that can be referenced while a
//!   recursive rule is being built and defined once the rule exists.
//! - [`generate`] drives a sequence of parsers step by step, so the next
//!   parser can depend on values produced earlier.
//!
//! ## Example
//!
//! ```
//! use parcomb::parser::{literal, pattern};
//!
//! let number = pattern("[0-9]+").unwrap().map(|digits| digits.parse::<u32>().unwrap_or(0));
//! let list = literal("[") >> number.sep_by(literal(","), 0, None) << literal("]");
//!
//! assert_eq!(list.parse("[1,2,3]").unwrap(), vec![1, 2, 3]);
//! assert_eq!(
//!     list.parse("[1,2").unwrap_err().to_string(),
//!     "expected one of ',', ']' at 0:4"
//! );
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] - the engine: results, combinators, primitives, forward
//!   declarations and the step driver
//! - [`grammars`] - example grammars (JSON, S-expressions) built on the engine
//!
//! [`ParseResult`]: parser::ParseResult
//! [`ForwardDeclaration`]: parser::ForwardDeclaration
//! [`generate`]: parser::generate

pub mod grammars;
pub mod parser;
