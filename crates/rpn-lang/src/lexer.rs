pub mod token;

use std::sync::LazyLock;

use nom::{
    IResult, Parser,
    bytes::complete::is_not,
    character::complete::multispace0,
    combinator::map,
    multi::many0,
    sequence::{preceded, terminated},
};
use regex_lite::Regex;
use smol_str::SmolStr;
use token::{Token, TokenKind};

use crate::range::Span;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("number pattern is valid"));

/// Splits `input` into whitespace-delimited tokens, each carrying its source
/// range, followed by an `Eof` token. Whitespace is a pure delimiter, so
/// blank input yields just `Eof`. Tokenization is total.
pub fn tokenize(input: &str) -> Vec<Token> {
    match chunks(Span::new(input)) {
        Ok((rest, mut tokens)) => {
            tokens.push(Token {
                range: rest.into(),
                kind: TokenKind::Eof,
            });
            tokens
        }
        // `many0` over non-empty chunks cannot fail
        Err(_) => unreachable!(),
    }
}

fn chunks(input: Span) -> IResult<Span, Vec<Token>> {
    terminated(many0(preceded(multispace0, chunk)), multispace0).parse(input)
}

fn chunk(input: Span) -> IResult<Span, Token> {
    map(is_not(" \t\r\n"), |span: Span| {
        let kind = classify(span.fragment());
        Token {
            range: span.into(),
            kind,
        }
    })
    .parse(input)
}

fn classify(fragment: &str) -> TokenKind {
    if NUMBER.is_match(fragment) {
        TokenKind::NumberLiteral(parse_wrapping(fragment))
    } else {
        TokenKind::Ident(SmolStr::new(fragment))
    }
}

/// Parses a chunk matching `[-+]?[0-9]+`, wrapping modulo 2^32 so that
/// literal parsing is total and consistent with the wrapping arithmetic of
/// the evaluator.
fn parse_wrapping(fragment: &str) -> i32 {
    let (negative, digits) = match fragment.as_bytes().first() {
        Some(b'-') => (true, &fragment[1..]),
        Some(b'+') => (false, &fragment[1..]),
        _ => (false, fragment),
    };

    // accumulate negative so that i32::MIN parses without overflow
    let mut value: i32 = 0;
    for byte in digits.bytes() {
        value = value.wrapping_mul(10).wrapping_sub((byte - b'0') as i32);
    }

    if negative { value } else { value.wrapping_neg() }
}
