use thiserror::Error;

use crate::lexer::token::Token;

type ErrorToken = Token;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EvalError {
    #[error("Stack underflow: `{0}` needs {1} value(s) but the stack holds {2}")]
    StackUnderflow(ErrorToken, u32, usize),
    #[error("Divided by 0")]
    ZeroDivision(ErrorToken),
    #[error("Input exhausted")]
    InputExhausted(ErrorToken),
    #[error("Invalid input `{1}`, expected an integer")]
    InvalidInput(ErrorToken, String),
    #[error("I/O error while reading input: {1}")]
    Io(ErrorToken, String),
}

impl EvalError {
    pub fn token(&self) -> &Token {
        match self {
            EvalError::StackUnderflow(token, _, _) => token,
            EvalError::ZeroDivision(token) => token,
            EvalError::InputExhausted(token) => token,
            EvalError::InvalidInput(token, _) => token,
            EvalError::Io(token, _) => token,
        }
    }
}
