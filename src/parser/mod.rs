mod combinators;
mod error;
mod forward;
mod generate;
mod primitives;
mod state;

pub use combinators::*;
pub use error::{ParseError, PatternError, UsageError};
pub use forward::ForwardDeclaration;
pub use generate::{Generator, Halt, generate};
pub use primitives::*;
pub use state::{Diagnostics, Outcome, ParseResult, Parser, Position, line_info_at};
