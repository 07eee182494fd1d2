//! S-expressions

use crate::parser::{BoxedParser, ForwardDeclaration, fail, literal, pattern, success};

use super::{GrammarError, lexeme};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sexp {
    Bool(bool),
    Number(i64),
    Symbol(String),
    List(Vec<Sexp>),
}

impl Sexp {
    fn quoted(self) -> Self {
        Sexp::List(vec![Sexp::Symbol("quote".to_string()), self])
    }
}

/// program := ignore expr*
///
/// The grammar is recursive and is never freed; build it once and clone it.
pub fn program() -> Result<BoxedParser<Vec<Sexp>>, GrammarError> {
    // ignore := (whitespace | comment)*
    let ignore = (pattern(r"\s+")? | pattern(r";.*")?).many().concat();
    let expr = ForwardDeclaration::<Sexp>::new();

    let number = lexeme(pattern(r"[0-9]+")?, &ignore).bind(|digits| match digits.parse() {
        Ok(n) => success(Sexp::Number(n)),
        Err(_) => fail("a number that fits in 64 bits"),
    });
    let symbol = lexeme(pattern(r"[\w-]+")?, &ignore).map(Sexp::Symbol);
    let boolean = lexeme(literal("#t"), &ignore).result(Sexp::Bool(true))
        | lexeme(literal("#f"), &ignore).result(Sexp::Bool(false));

    // atom := boolean | number | symbol
    let atom = boolean | number | symbol;

    // form := "(" expr* ")"
    let form = (lexeme(literal("("), &ignore) >> expr.parser().many()
        << lexeme(literal(")"), &ignore))
    .map(Sexp::List);

    // quote := "'" expr
    let quote = literal("'") >> expr.parser().map(Sexp::quoted);

    expr.define(form | quote | atom)?;

    Ok(ignore >> expr.parser().many())
}
