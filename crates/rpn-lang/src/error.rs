use miette::{Diagnostic, SourceOffset, SourceSpan};

use crate::eval::error::EvalError;

/// An evaluation failure annotated with the source code it came from, for
/// user-facing diagnostics.
#[derive(PartialEq, Debug, thiserror::Error)]
#[error("{cause}")]
pub struct Error {
    /// The underlying cause of the error.
    pub cause: EvalError,
    /// The source code related to the error.
    pub source_code: String,
    /// The location in the source code for diagnostics.
    pub location: SourceSpan,
}

impl Error {
    pub fn from_eval(source_code: impl Into<String>, cause: EvalError) -> Self {
        let source_code = source_code.into();
        let token = cause.token();

        let start = SourceOffset::from_location(
            &source_code,
            token.range.start.line as usize,
            token.range.start.column,
        );
        let end = SourceOffset::from_location(
            &source_code,
            token.range.end.line as usize,
            token.range.end.column,
        );
        let location = SourceSpan::new(
            start,
            std::cmp::max(end.offset().saturating_sub(start.offset()), 1),
        );

        Self {
            cause,
            source_code,
            location,
        }
    }
}

impl Diagnostic for Error {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let c = match self.cause {
            EvalError::StackUnderflow(_, _, _) => "EvalError::StackUnderflow",
            EvalError::ZeroDivision(_) => "EvalError::ZeroDivision",
            EvalError::InputExhausted(_) => "EvalError::InputExhausted",
            EvalError::InvalidInput(_, _) => "EvalError::InvalidInput",
            EvalError::Io(_, _) => "EvalError::Io",
        };

        Some(Box::new(c))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let msg = match &self.cause {
            EvalError::StackUnderflow(_, needed, _) => {
                format!(
                    "This operation pops {needed} value(s). Push more values before it, or run it on a deeper stack."
                )
            }
            EvalError::ZeroDivision(_) => "Division by zero is not allowed.".to_string(),
            EvalError::InputExhausted(_) => {
                "`input` was evaluated but the input source has no more data.".to_string()
            }
            EvalError::InvalidInput(_, _) => {
                "`input` expects whitespace-delimited integers.".to_string()
            }
            EvalError::Io(_, _) => "Reading from the input source failed.".to_string(),
        };

        Some(Box::new(msg))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(
            miette::LabeledSpan::new_with_span(Some(format!("{}", self.cause)), self.location),
        )))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.source_code)
    }
}
