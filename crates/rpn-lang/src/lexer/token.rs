use std::fmt::{self, Display, Formatter};

use smol_str::SmolStr;

use crate::range::Range;

#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone)]
pub struct Token {
    pub range: Range,
    pub kind: TokenKind,
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone)]
pub enum TokenKind {
    Eof,
    /// A chunk that fully matches the integer grammar `[-+]?[0-9]+`.
    NumberLiteral(i32),
    /// Any other run of non-whitespace characters, operators included.
    Ident(SmolStr),
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.kind)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match &self {
            TokenKind::Eof => write!(f, ""),
            TokenKind::NumberLiteral(n) => write!(f, "{}", n),
            TokenKind::Ident(ident) => write!(f, "{}", ident),
        }
    }
}
