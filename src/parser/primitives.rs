//! Primitive parsers: the leaves every grammar is built from.

use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;

use regex_automata::meta::Regex;
use regex_automata::util::captures::Captures;
use regex_automata::{Anchored, Input, PatternID};

use super::combinators::BoxedParser;
use super::error::PatternError;
use super::state::{ParseResult, Position};

type Transform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Always succeed with `value`, consuming nothing.
pub fn success<T: Clone + Send + Sync + 'static>(value: T) -> BoxedParser<T> {
    BoxedParser::new(move |_: &str, index: usize| ParseResult::success(index, value.clone()))
}

/// Always fail, expecting `expected`.
pub fn fail<T: 'static>(expected: impl Into<String>) -> BoxedParser<T> {
    let expected = expected.into();
    BoxedParser::new(move |_: &str, index: usize| ParseResult::failure(index, expected.clone()))
}

/// The current byte offset.
pub fn index() -> BoxedParser<usize> {
    BoxedParser::new(|_: &str, index: usize| ParseResult::success(index, index))
}

/// The current line and column.
pub fn line_info() -> BoxedParser<Position> {
    BoxedParser::new(|input: &str, index: usize| {
        ParseResult::success(index, Position::locate(input, index))
    })
}

/// Succeed only at the end of the input.
pub fn eof() -> BoxedParser<()> {
    BoxedParser::new(|input: &str, index: usize| {
        if index >= input.len() {
            ParseResult::success(index, ())
        } else {
            ParseResult::failure(index, "EOF")
        }
    })
}

// === Literals ===

/// Match `text` exactly.
pub fn literal(text: impl Into<String>) -> BoxedParser<String> {
    build_literal(text.into(), None)
}

/// Match `text` after passing both it and the input through `transform`,
/// e.g. `str::to_lowercase` for case-insensitive keywords.
///
/// The produced value is always `text` itself.
pub fn literal_with<F>(text: impl Into<String>, transform: F) -> BoxedParser<String>
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    build_literal(text.into(), Some(Arc::new(transform)))
}

fn build_literal(text: String, transform: Option<Transform>) -> BoxedParser<String> {
    let Some(transform) = transform else {
        return BoxedParser::new(move |input: &str, index: usize| {
            match input.get(index..) {
                Some(rest) if rest.starts_with(text.as_str()) => {
                    ParseResult::success(index + text.len(), text.clone())
                }
                _ => ParseResult::failure(index, text.clone()),
            }
        });
    };

    let target = transform(&text);
    let width = text.chars().count();
    BoxedParser::new(move |input: &str, index: usize| {
        let rest = input.get(index..).unwrap_or_default();
        let end = rest.char_indices().nth(width).map_or(rest.len(), |(end, _)| end);
        if transform(&rest[..end]) == target {
            ParseResult::success(index + end, text.clone())
        } else {
            ParseResult::failure(index, text.clone())
        }
    })
}

/// Ordered choice over `texts`, longest first so that no literal is shadowed
/// by a shorter one sharing its prefix.
pub fn one_of_literals<I, S>(texts: I) -> BoxedParser<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    literal_choice(keyed(texts), None)
}

pub fn one_of_literals_with<I, S, F>(texts: I, transform: F) -> BoxedParser<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    literal_choice(keyed(texts), Some(Arc::new(transform)))
}

fn keyed<I, S>(texts: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    texts
        .into_iter()
        .map(|text| {
            let text = text.into();
            (text.clone(), text)
        })
        .collect()
}

fn literal_choice<T>(mut items: Vec<(String, T)>, transform: Option<Transform>) -> BoxedParser<T>
where
    T: Clone + Send + Sync + 'static,
{
    items.sort_by_key(|(text, _)| Reverse(text.chars().count()));
    items
        .into_iter()
        .map(|(text, value)| build_literal(text, transform.clone()).result(value))
        .reduce(BoxedParser::or)
        .unwrap_or_else(|| fail("no alternatives"))
}

/// A closed set of values that each have a literal spelling.
pub trait Enumerated: Sized + Clone + Send + Sync + 'static {
    fn members() -> Vec<Self>;

    fn literal(&self) -> String;
}

/// Parse the literal spelling of any member of `E`.
pub fn from_enum<E: Enumerated>() -> BoxedParser<E> {
    literal_choice(spellings::<E>(), None)
}

pub fn from_enum_with<E, F>(transform: F) -> BoxedParser<E>
where
    E: Enumerated,
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    literal_choice(spellings::<E>(), Some(Arc::new(transform)))
}

fn spellings<E: Enumerated>() -> Vec<(String, E)> {
    E::members()
        .into_iter()
        .map(|member| (member.literal(), member))
        .collect()
}

// === Regular expressions ===

/// A capture group, by number or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Group {
    Index(usize),
    Name(String),
}

impl From<usize> for Group {
    fn from(index: usize) -> Self {
        Group::Index(index)
    }
}

impl From<&str> for Group {
    fn from(name: &str) -> Self {
        Group::Name(name.to_string())
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Index(index) => write!(f, "{index}"),
            Group::Name(name) => write!(f, "{name:?}"),
        }
    }
}

impl Group {
    fn exists_in(&self, regex: &Regex) -> bool {
        let info = regex.group_info();
        match self {
            Group::Index(index) => *index < info.group_len(PatternID::ZERO),
            Group::Name(name) => info.to_index(PatternID::ZERO, name).is_some(),
        }
    }

    /// Unmatched optional groups read as the empty string.
    fn extract(&self, input: &str, captures: &Captures) -> String {
        let span = match self {
            Group::Index(index) => captures.get_group(*index),
            Group::Name(name) => captures.get_group_by_name(name),
        };
        span.and_then(|span| input.get(span.range()))
            .unwrap_or_default()
            .to_string()
    }
}

/// Match a regular expression anchored at the current offset, producing the
/// whole match.
///
/// The expression sees the whole input: `^` only matches at its start and
/// `\b` looks at the character before the offset.
pub fn pattern(expr: &str) -> Result<BoxedParser<String>, PatternError> {
    pattern_group(expr, Group::Index(0))
}

/// Match a regular expression, producing one capture group.
pub fn pattern_group(expr: &str, group: impl Into<Group>) -> Result<BoxedParser<String>, PatternError> {
    let group = group.into();
    let regex = compile(expr, std::slice::from_ref(&group))?;
    let expected = expr.to_string();

    Ok(BoxedParser::new(move |input: &str, index: usize| {
        match search_at(&regex, input, index) {
            Some((end, captures)) => ParseResult::success(end, group.extract(input, &captures)),
            None => ParseResult::failure(index, expected.clone()),
        }
    }))
}

/// Match a regular expression, producing several capture groups in order.
pub fn pattern_groups<I, G>(expr: &str, groups: I) -> Result<BoxedParser<Vec<String>>, PatternError>
where
    I: IntoIterator<Item = G>,
    G: Into<Group>,
{
    let groups = groups.into_iter().map(Into::into).collect::<Vec<Group>>();
    let regex = compile(expr, &groups)?;
    let expected = expr.to_string();

    Ok(BoxedParser::new(move |input: &str, index: usize| {
        match search_at(&regex, input, index) {
            Some((end, captures)) => {
                let values: Vec<String> = groups
                    .iter()
                    .map(|group| group.extract(input, &captures))
                    .collect();
                ParseResult::success(end, values)
            }
            None => ParseResult::failure(index, expected.clone()),
        }
    }))
}

fn compile(expr: &str, groups: &[Group]) -> Result<Regex, PatternError> {
    let regex = Regex::new(expr)?;
    if let Some(missing) = groups.iter().find(|group| !group.exists_in(&regex)) {
        return Err(PatternError::NoSuchGroup {
            pattern: expr.to_string(),
            group: missing.to_string(),
        });
    }
    Ok(regex)
}

/// Run `regex` anchored at `index`, returning the end of the match and its
/// groups.
fn search_at(regex: &Regex, input: &str, index: usize) -> Option<(usize, Captures)> {
    if index > input.len() {
        return None;
    }
    let search = Input::new(input)
        .span(index..input.len())
        .anchored(Anchored::Yes);
    let mut captures = regex.create_captures();
    regex.search_captures(&search, &mut captures);
    let end = captures.get_match()?.end();
    Some((end, captures))
}

// === Single characters ===

/// Consume one character satisfying `predicate`.
pub fn test_char<F>(predicate: F, description: impl Into<String>) -> BoxedParser<char>
where
    F: Fn(char) -> bool + Send + Sync + 'static,
{
    let description = description.into();
    BoxedParser::new(move |input: &str, index: usize| {
        match input.get(index..).and_then(|rest| rest.chars().next()) {
            Some(c) if predicate(c) => ParseResult::success(index + c.len_utf8(), c),
            _ => ParseResult::failure(index, description.clone()),
        }
    })
}

pub fn match_char(expected: char) -> BoxedParser<char> {
    test_char(move |c| c == expected, expected.to_string())
}

/// Any one of the characters in `chars`.
pub fn char_from(chars: &str) -> BoxedParser<char> {
    let set = chars.to_string();
    test_char(move |c| set.contains(c), format!("[{chars}]"))
}

pub fn any_char() -> BoxedParser<char> {
    test_char(|_| true, "any character")
}

pub fn letter() -> BoxedParser<char> {
    test_char(char::is_alphabetic, "a letter")
}

/// Any character with a Unicode numeric value, as [`char::is_numeric`]
/// defines it. That includes fractions and letter numerals such as `½` and
/// `Ⅷ`, not only digits; use [`decimal_digit`] for `0-9` only.
pub fn digit() -> BoxedParser<char> {
    test_char(char::is_numeric, "a digit")
}

pub fn decimal_digit() -> BoxedParser<char> {
    char_from("0123456789")
}

/// One or more whitespace characters.
pub fn whitespace() -> BoxedParser<String> {
    test_char(char::is_whitespace, "whitespace")
        .at_least(1)
        .concat()
}
