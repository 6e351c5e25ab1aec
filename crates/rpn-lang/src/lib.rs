//! `rpn-lang` is a compiler and evaluator for a small postfix arithmetic
//! language over a 32-bit integer stack.
//!
//! Source text is tokenized into whitespace-delimited tokens, compiled into
//! an immutable, reference-counted operation tree, optionally
//! constant-folded, and applied to a stack. Compilation is total: unknown
//! tokens are skipped and blank input compiles to the identity operation.
//!
//! ## Examples
//!
//! ```
//! let op = rpn_lang::compile("2 3 +");
//! assert_eq!(op.apply(vec![]).unwrap(), vec![5]);
//! assert!(op.is_pure());
//!
//! // `input` reads from the evaluator's input source
//! use std::io::Cursor;
//! let mut evaluator = rpn_lang::Evaluator::new(Cursor::new("20 22"));
//! let op = rpn_lang::compile("input input +");
//! assert_eq!(evaluator.eval(&op, vec![]).unwrap(), vec![42]);
//!
//! // constant folding collapses pure subtrees into literals
//! let folded = rpn_lang::Optimizer::new().optimize(&rpn_lang::compile("7 dup *"));
//! assert_eq!(folded.apply(vec![]).unwrap(), vec![49]);
//! ```
mod compiler;
mod engine;
mod error;
mod eval;
mod ir;
mod lexer;
mod optimizer;
mod range;

use std::rc::Rc;

pub use engine::{Engine, Options as EngineOptions};
pub use error::Error;
pub use eval::Evaluator;
pub use eval::error::EvalError;
pub use ir::{BinaryOp, Node, Op, Program, Sequence};
pub use lexer::token::{Token, TokenKind};
pub use optimizer::Optimizer;
pub use range::{Position, Range};

/// Compiles `code` into a single operation node. Total: any input produces
/// a valid operation, possibly `Identity`.
pub fn compile(code: &str) -> Rc<Node> {
    compiler::compile(lexer::tokenize(code))
}

/// Splits `code` into tokens. Total; blank input yields just `Eof`.
pub fn tokenize(code: &str) -> Vec<Token> {
    lexer::tokenize(code)
}
