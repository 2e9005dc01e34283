//! Token-level parsers shared by the selector grammar.
//!
//! These are plain nom parsers over `&str`. They know nothing about offsets or
//! error kinds; the recursive driver in `parser::selectors` turns
//! their failures into positioned [`ParseError`](crate::ParseError)s.

use crate::parser::selector::{AttributeOperator, CaseSensitivity, Combinator};
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while, take_while_m_n},
    character::complete::{char, satisfy},
    combinator::{map, map_opt, opt, value},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{pair, preceded, terminated},
};

/// Whitespace as CSS defines it: space, tab, line feed, carriage return and
/// form feed. Other Unicode spaces are ordinary characters.
pub fn is_css_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

/// Characters that may start an identifier after an optional leading `-`.
pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Characters that may continue an identifier.
pub fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == '-'
}

/// Parses one escape: `\` plus 1-6 hex digits and an optional whitespace
/// character, or `\` plus any character other than a newline.
///
/// A zero, surrogate or out-of-range code point becomes U+FFFD.
pub fn parse_escape(input: &str) -> IResult<&str, char> {
    preceded(
        char('\\'),
        alt((
            map(
                terminated(
                    take_while_m_n(1, 6, |c: char| c.is_ascii_hexdigit()),
                    opt(satisfy(is_css_whitespace)),
                ),
                |hex: &str| {
                    u32::from_str_radix(hex, 16)
                        .ok()
                        .filter(|&code| code != 0)
                        .and_then(char::from_u32)
                        .unwrap_or(char::REPLACEMENT_CHARACTER)
                },
            ),
            satisfy(|c| !matches!(c, '\n' | '\r' | '\x0C')),
        )),
    )(input)
}

fn ident_start(input: &str) -> IResult<&str, char> {
    alt((satisfy(is_ident_start), parse_escape))(input)
}

fn ident_char(input: &str) -> IResult<&str, char> {
    alt((satisfy(is_ident_char), parse_escape))(input)
}

/// Parses a CSS identifier: `foo`, `-foo`, `--foo`, `_x1`, `Ünïcode`,
/// `md\:flex`. Escapes are resolved in the returned name.
///
/// A digit, or `-` followed by a digit, never starts an identifier unless it
/// is escaped (`\31 23`).
pub fn parse_ident(input: &str) -> IResult<&str, String> {
    let (rest, mut name) = alt((
        map(tag("--"), str::to_string),
        map(pair(opt(char('-')), ident_start), |(dash, first)| {
            dash.into_iter().chain([first]).collect::<String>()
        }),
    ))(input)?;
    let (rest, tail) = many0(ident_char)(rest)?;
    name.extend(tail);
    Ok((rest, name))
}

/// Optional whitespace.
pub fn ws(input: &str) -> (&str, &str) {
    match take_while::<_, &str, Error<&str>>(is_css_whitespace)(input) {
        Ok((rest, spaces)) => (rest, spaces),
        Err(_) => (input, ""),
    }
}

/// Parses one of `>`, `+`, `~`, `||`.
pub fn parse_combinator(input: &str) -> IResult<&str, Combinator> {
    alt((
        value(Combinator::Column, tag("||")),
        value(Combinator::Child, char('>')),
        value(Combinator::NextSibling, char('+')),
        value(Combinator::SubsequentSibling, char('~')),
    ))(input)
}

/// Parses one of the six attribute operators.
pub fn parse_attribute_operator(input: &str) -> IResult<&str, AttributeOperator> {
    alt((
        value(AttributeOperator::Equals, char('=')),
        value(AttributeOperator::Includes, tag("~=")),
        value(AttributeOperator::DashMatch, tag("|=")),
        value(AttributeOperator::Prefix, tag("^=")),
        value(AttributeOperator::Suffix, tag("$=")),
        value(AttributeOperator::Substring, tag("*=")),
    ))(input)
}

/// Parses the `i` / `s` flag before an attribute selector's closing bracket.
pub fn parse_case_flag(input: &str) -> IResult<&str, CaseSensitivity> {
    map_opt(parse_ident, |flag| match flag.as_str() {
        "i" | "I" => Some(CaseSensitivity::AsciiInsensitive),
        "s" | "S" => Some(CaseSensitivity::Sensitive),
        _ => None,
    })(input)
}

/// Parses a single- or double-quoted string, resolving escapes.
///
/// An escaped newline is a line continuation and adds nothing. Returns
/// `Err::Error` when the input does not start with a quote and `Err::Failure`
/// when the closing quote is missing.
pub fn parse_string(input: &str) -> IResult<&str, String> {
    let (mut rest, quote) = alt((char('"'), char('\'')))(input)?;
    let mut value = String::new();

    while let Some(c) = rest.chars().next() {
        if c == quote {
            return Ok((&rest[1..], value));
        }
        if c == '\\' {
            if let Some(newline @ ('\n' | '\r' | '\x0C')) = rest[1..].chars().next() {
                rest = &rest[1 + newline.len_utf8()..];
                continue;
            }
            if let Ok((after, escaped)) = parse_escape(rest) {
                value.push(escaped);
                rest = after;
                continue;
            }
        }
        value.push(c);
        rest = &rest[c.len_utf8()..];
    }

    Err(nom::Err::Failure(Error::new(input, ErrorKind::Char)))
}

/// Why [`scan_raw_argument`] could not find the closing parenthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawScanError {
    /// Input ended before the argument closed.
    Unterminated,
    /// A quote opened at this byte offset (relative to the scanned input) never closed.
    UnterminatedQuote(usize),
    /// A `)` or `]` at this byte offset does not close the innermost open group.
    Mismatched(usize),
}

/// Scans an opaque functional argument up to its closing `)`.
///
/// `input` starts just after the opening parenthesis. Nested `()`/`[]` groups
/// and quoted strings are skipped as units. Returns the argument text and the
/// input following the closing parenthesis.
pub fn scan_raw_argument(input: &str) -> Result<(&str, &str), RawScanError> {
    let mut open: Vec<char> = Vec::new();
    let mut pos = 0;

    while let Some(c) = input[pos..].chars().next() {
        match c {
            '(' => open.push(')'),
            '[' => open.push(']'),
            ')' if open.is_empty() => return Ok((&input[..pos], &input[pos + 1..])),
            ')' | ']' => {
                if open.pop() != Some(c) {
                    return Err(RawScanError::Mismatched(pos));
                }
            }
            '\\' => {
                // An escaped `)` or quote is an ordinary character.
                pos = match parse_escape(&input[pos..]) {
                    Ok((rest, _)) => input.len() - rest.len(),
                    Err(_) => pos + 1,
                };
                continue;
            }
            '"' | '\'' => {
                let (rest, _) =
                    parse_string(&input[pos..]).map_err(|_| RawScanError::UnterminatedQuote(pos))?;
                pos = input.len() - rest.len();
                continue;
            }
            _ => {}
        }
        pos += c.len_utf8();
    }

    Err(RawScanError::Unterminated)
}
