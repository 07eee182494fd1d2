use std::collections::BTreeMap;

use parcomb::grammars::json::{Json, json};
use parcomb::grammars::sexpr::{Sexp, program};

fn symbol(name: &str) -> Sexp {
    Sexp::Symbol(name.to_string())
}

fn object(pairs: Vec<(&str, Json)>) -> Json {
    Json::Object(
        pairs
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect::<BTreeMap<_, _>>(),
    )
}

#[test]
fn json_document() {
    let parser = json().unwrap();
    let source = r#"
    {
        "int": 1,
        "string": "hello",
        "a list": [1, 2, 3],
        "escapes": "\n \u24D2",
        "nested": {"x": "y"},
        "other": [true, false, null]
    }
    "#;

    assert_eq!(
        parser.parse(source).unwrap(),
        object(vec![
            ("int", Json::Number(1.0)),
            ("string", Json::String("hello".to_string())),
            (
                "a list",
                Json::Array(vec![Json::Number(1.0), Json::Number(2.0), Json::Number(3.0)])
            ),
            ("escapes", Json::String("\n \u{24D2}".to_string())),
            ("nested", object(vec![("x", Json::String("y".to_string()))])),
            (
                "other",
                Json::Array(vec![Json::Bool(true), Json::Bool(false), Json::Null])
            ),
        ])
    );
}

#[test]
fn json_scalars() {
    let parser = json().unwrap();
    assert_eq!(parser.parse("null").unwrap(), Json::Null);
    assert_eq!(parser.parse(" -12.5e1 ").unwrap(), Json::Number(-125.0));
    assert_eq!(
        parser.parse(r#""a\"b\\c\/d""#).unwrap(),
        Json::String("a\"b\\c/d".to_string())
    );
    assert_eq!(parser.parse("[]").unwrap(), Json::Array(vec![]));
    assert_eq!(parser.parse("{}").unwrap(), object(vec![]));
}

#[test]
fn json_reports_furthest_failure() {
    let parser = json().unwrap();

    let err = parser.parse("[1, 2").unwrap_err();
    assert_eq!(err.to_string(), "expected one of ',', ']' at 0:5");

    let err = parser.parse("{\n  \"a\" 1}").unwrap_err();
    assert_eq!(err.to_string(), "expected ':' at 1:6");

    assert!(parser.parse("[1,]").is_err());
    assert!(parser.parse("tru").is_err());
}

#[test]
fn sexpr_atoms() {
    let parser = program().unwrap();
    assert_eq!(parser.parse("1").unwrap(), vec![Sexp::Number(1)]);
    assert_eq!(parser.parse("x").unwrap(), vec![symbol("x")]);
    assert_eq!(parser.parse("x-y").unwrap(), vec![symbol("x-y")]);
    assert_eq!(
        parser.parse("#t #f").unwrap(),
        vec![Sexp::Bool(true), Sexp::Bool(false)]
    );
    assert_eq!(parser.parse("").unwrap(), Vec::<Sexp>::new());
}

#[test]
fn sexpr_forms() {
    let parser = program().unwrap();
    assert_eq!(
        parser.parse("(1 2 3)").unwrap(),
        vec![Sexp::List(vec![Sexp::Number(1), Sexp::Number(2), Sexp::Number(3)])]
    );
    assert_eq!(
        parser.parse("(define (f x) (g x))").unwrap(),
        vec![Sexp::List(vec![
            symbol("define"),
            Sexp::List(vec![symbol("f"), symbol("x")]),
            Sexp::List(vec![symbol("g"), symbol("x")]),
        ])]
    );
    assert_eq!(parser.parse("()").unwrap(), vec![Sexp::List(vec![])]);
}

#[test]
fn sexpr_quote() {
    let parser = program().unwrap();
    assert_eq!(
        parser.parse("'foo").unwrap(),
        vec![Sexp::List(vec![symbol("quote"), symbol("foo")])]
    );
    assert_eq!(
        parser.parse("''foo").unwrap(),
        vec![Sexp::List(vec![
            symbol("quote"),
            Sexp::List(vec![symbol("quote"), symbol("foo")]),
        ])]
    );
    assert_eq!(
        parser.parse("'(1 2)").unwrap(),
        vec![Sexp::List(vec![
            symbol("quote"),
            Sexp::List(vec![Sexp::Number(1), Sexp::Number(2)]),
        ])]
    );
}

#[test]
fn sexpr_comments_and_whitespace() {
    let parser = program().unwrap();
    let source = "; leading comment\n(1 ; one\n 2)\n  ; trailing\n";
    assert_eq!(
        parser.parse(source).unwrap(),
        vec![Sexp::List(vec![Sexp::Number(1), Sexp::Number(2)])]
    );
}

#[test]
fn sexpr_rejects_unbalanced_forms() {
    let parser = program().unwrap();
    assert!(parser.parse("(1 2").is_err());
    assert!(parser.parse("1 2)").is_err());
}

#[test]
fn grammar_is_built_once_and_reused() {
    let parser = json().unwrap();
    for (source, expected) in [
        ("1", Json::Number(1.0)),
        ("[true]", Json::Array(vec![Json::Bool(true)])),
        (r#"{"k": null}"#, object(vec![("k", Json::Null)])),
    ] {
        assert_eq!(parser.clone().parse(source).unwrap(), expected);
    }
}
