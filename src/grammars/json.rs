//! JSON documents

use std::collections::BTreeMap;

use crate::parser::{
    BoxedParser, ForwardDeclaration, fail, literal, pattern, pattern_group, success,
};

use super::{GrammarError, lexeme};

#[derive(Debug, Clone, PartialEq)]
pub enum Json {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Json>),
    Object(BTreeMap<String, Json>),
}

/// document := whitespace value
///
/// The grammar is recursive and is never freed; build it once and clone it.
pub fn json() -> Result<BoxedParser<Json>, GrammarError> {
    let ws = pattern(r"\s*")?;
    let token = |text: &str| lexeme(literal(text), &ws);
    let value = ForwardDeclaration::<Json>::new();

    let quoted = lexeme(string()?, &ws);
    let number = lexeme(number()?, &ws);

    // pair := string ":" value
    let pair = (quoted.clone() << token(":")) & value.parser();

    // object := "{" (pair ("," pair)*)? "}"
    let object = (token("{") >> pair.sep_by(token(","), 0, None) << token("}"))
        .map(|pairs| Json::Object(pairs.into_iter().collect()));

    // array := "[" (value ("," value)*)? "]"
    let array =
        (token("[") >> value.parser().sep_by(token(","), 0, None) << token("]")).map(Json::Array);

    value.define(
        quoted.map(Json::String)
            | number
            | object
            | array
            | token("true").result(Json::Bool(true))
            | token("false").result(Json::Bool(false))
            | token("null").result(Json::Null),
    )?;

    Ok(ws.clone() >> value.parser())
}

/// number := "-"? int frac? exp?
fn number() -> Result<BoxedParser<Json>, GrammarError> {
    let text = pattern(r"-?(0|[1-9][0-9]*)([.][0-9]+)?([eE][+-]?[0-9]+)?")?;
    Ok(text
        .bind(|text| match text.parse::<f64>() {
            Ok(number) => success(Json::Number(number)),
            Err(_) => fail("a number"),
        })
        .desc("a number"))
}

/// string := '"' (unescaped | "\" escape)* '"'
fn string() -> Result<BoxedParser<String>, GrammarError> {
    let unescaped = pattern(r#"[^"\\]+"#)?;

    let unicode = pattern_group(r"u([0-9a-fA-F]{4})", 1usize)?.bind(|hex| {
        match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
            Some(c) => success(c.to_string()),
            None => fail("a unicode scalar value"),
        }
    });

    let escape = literal("\\")
        >> (literal("\\")
            | literal("/")
            | literal("\"")
            | literal("b").result("\u{8}".to_string())
            | literal("f").result("\u{c}".to_string())
            | literal("n").result("\n".to_string())
            | literal("r").result("\r".to_string())
            | literal("t").result("\t".to_string())
            | unicode);

    Ok(literal("\"") >> (unescaped | escape).many().concat() << literal("\""))
}
