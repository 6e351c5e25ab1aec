// Executes a compiled operation tree against an integer stack. Every
// operation is a pure stack-to-stack transformer except `input`, which pulls
// one whitespace-delimited integer from the evaluator's input source.
pub mod error;

use std::io::{self, BufRead};

use error::EvalError;

use crate::ir::node::{BinaryOp, Node, Op};
use crate::lexer::token::Token;

/// Evaluates operation nodes against a stack.
///
/// The evaluator holds the input source backing the `input` operation; a
/// read blocks until the source yields a value or closes. Arithmetic is
/// wrapping 32-bit, with truncating division and modulo.
#[derive(Debug)]
pub struct Evaluator<R> {
    input: R,
}

impl<R: BufRead> Evaluator<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// Applies `node` to `stack` and returns the resulting stack.
    ///
    /// Underflow policy: popping from a too-shallow stack fails with
    /// [`EvalError::StackUnderflow`] and aborts the remaining sequence.
    pub fn eval(&mut self, node: &Node, mut stack: Vec<i32>) -> Result<Vec<i32>, EvalError> {
        match &*node.op {
            Op::Literal(value) => {
                stack.push(*value);
                Ok(stack)
            }
            Op::Binary(op) => {
                let depth = stack.len();
                match (stack.pop(), stack.pop()) {
                    // `b` is the more recently pushed value
                    (Some(b), Some(a)) => {
                        stack.push(Self::binary(node, *op, a, b)?);
                        Ok(stack)
                    }
                    _ => Err(EvalError::StackUnderflow(error_token(node), 2, depth)),
                }
            }
            Op::Abs => match stack.pop() {
                Some(value) => {
                    stack.push(value.wrapping_abs());
                    Ok(stack)
                }
                None => Err(EvalError::StackUnderflow(error_token(node), 1, 0)),
            },
            Op::Dup => match stack.last().copied() {
                Some(top) => {
                    stack.push(top);
                    Ok(stack)
                }
                None => Err(EvalError::StackUnderflow(error_token(node), 1, 0)),
            },
            Op::Input => {
                stack.push(self.read_int(node)?);
                Ok(stack)
            }
            Op::Identity => Ok(stack),
            Op::Sequence(seq) => {
                let stack = self.eval(&seq.left, stack)?;
                self.eval(&seq.right, stack)
            }
        }
    }

    fn binary(node: &Node, op: BinaryOp, a: i32, b: i32) -> Result<i32, EvalError> {
        match op {
            BinaryOp::Add => Ok(a.wrapping_add(b)),
            BinaryOp::Sub => Ok(a.wrapping_sub(b)),
            BinaryOp::Mul => Ok(a.wrapping_mul(b)),
            BinaryOp::Div | BinaryOp::Mod if b == 0 => {
                Err(EvalError::ZeroDivision(error_token(node)))
            }
            // wrapping keeps i32::MIN / -1 defined
            BinaryOp::Div => Ok(a.wrapping_div(b)),
            BinaryOp::Mod => Ok(a.wrapping_rem(b)),
        }
    }

    /// Reads one whitespace-delimited integer, byte by byte so that reads
    /// past the requested value are never consumed from the source.
    fn read_int(&mut self, node: &Node) -> Result<i32, EvalError> {
        let mut bytes: Vec<u8> = Vec::new();

        loop {
            let buffer = self
                .input
                .fill_buf()
                .map_err(|e| EvalError::Io(error_token(node), e.to_string()))?;
            if buffer.is_empty() {
                // source closed
                break;
            }

            let mut consumed = 0;
            let mut delimited = false;
            for &byte in buffer {
                consumed += 1;
                if byte.is_ascii_whitespace() {
                    if bytes.is_empty() {
                        // skip leading whitespace
                        continue;
                    }
                    delimited = true;
                    break;
                }
                bytes.push(byte);
            }
            self.input.consume(consumed);

            if delimited {
                break;
            }
        }

        if bytes.is_empty() {
            return Err(EvalError::InputExhausted(error_token(node)));
        }

        let text = String::from_utf8_lossy(&bytes);
        text.parse()
            .map_err(|_| EvalError::InvalidInput(error_token(node), text.into_owned()))
    }
}

fn error_token(node: &Node) -> Token {
    (*node.token).clone()
}

impl Node {
    /// Applies this operation to `stack`, reading `input` values from the
    /// process's standard input.
    pub fn apply(&self, stack: Vec<i32>) -> Result<Vec<i32>, EvalError> {
        Evaluator::new(io::stdin().lock()).eval(self, stack)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rstest::rstest;

    use super::*;
    use crate::compile;

    fn eval(code: &str, stack: Vec<i32>) -> Result<Vec<i32>, EvalError> {
        Evaluator::new(io::empty()).eval(&compile(code), stack)
    }

    fn eval_with_input(code: &str, stack: Vec<i32>, input: &str) -> Result<Vec<i32>, EvalError> {
        Evaluator::new(Cursor::new(input.to_string())).eval(&compile(code), stack)
    }

    #[rstest]
    #[case::empty("", vec![], vec![])]
    #[case::identity_keeps_stack("", vec![1, 2], vec![1, 2])]
    #[case::add("2 3 +", vec![], vec![5])]
    #[case::sub("5 3 -", vec![], vec![2])]
    #[case::mul("6 7 *", vec![], vec![42])]
    #[case::div("7 2 /", vec![], vec![3])]
    #[case::div_negative("-7 2 /", vec![], vec![-3])]
    #[case::modulo("10 3 %", vec![], vec![1])]
    #[case::modulo_negative("-10 3 %", vec![], vec![-1])]
    #[case::abs("-5 abs", vec![], vec![5])]
    #[case::abs_positive("5 abs", vec![], vec![5])]
    #[case::dup("7 dup", vec![], vec![7, 7])]
    #[case::dup_add("7 dup +", vec![], vec![14])]
    #[case::deep_stack_untouched("1 2 3 + -111 - * 10 %", vec![1, 2, 3], vec![1, 2, 3, 6])]
    #[case::consumes_initial_stack("+", vec![2, 3], vec![5])]
    #[case::overflow_wraps("2147483647 1 +", vec![], vec![-2147483648])]
    #[case::abs_min_wraps("-2147483648 abs", vec![], vec![-2147483648])]
    #[case::min_div_minus_one_wraps("-2147483648 -1 /", vec![], vec![-2147483648])]
    fn test_eval(#[case] code: &str, #[case] stack: Vec<i32>, #[case] expected: Vec<i32>) {
        assert_eq!(eval(code, stack).unwrap(), expected);
    }

    #[rstest]
    #[case::add_on_empty("+", vec![], 2, 0)]
    #[case::add_on_one("1 +", vec![], 2, 1)]
    #[case::abs_on_empty("abs", vec![], 1, 0)]
    #[case::dup_on_empty("dup", vec![], 1, 0)]
    fn test_stack_underflow(
        #[case] code: &str,
        #[case] stack: Vec<i32>,
        #[case] needed: u32,
        #[case] depth: usize,
    ) {
        match eval(code, stack) {
            Err(EvalError::StackUnderflow(_, n, d)) => {
                assert_eq!(n, needed);
                assert_eq!(d, depth);
            }
            other => panic!("expected StackUnderflow, got {:?}", other),
        }
    }

    #[rstest]
    #[case("1 0 /")]
    #[case("1 0 %")]
    fn test_zero_division(#[case] code: &str) {
        assert!(matches!(
            eval(code, vec![]),
            Err(EvalError::ZeroDivision(_))
        ));
    }

    #[rstest]
    #[case::single("input", "42", vec![42])]
    #[case::two_reads("input input +", "1 2", vec![3])]
    #[case::leading_whitespace("input", "  \n\t 7", vec![7])]
    #[case::negative("input abs", "-9", vec![9])]
    fn test_input(#[case] code: &str, #[case] input: &str, #[case] expected: Vec<i32>) {
        assert_eq!(eval_with_input(code, vec![], input).unwrap(), expected);
    }

    #[test]
    fn test_input_exhausted() {
        assert!(matches!(
            eval_with_input("input input", vec![], "1"),
            Err(EvalError::InputExhausted(_))
        ));
    }

    #[test]
    fn test_input_invalid() {
        match eval_with_input("input", vec![], "abc") {
            Err(EvalError::InvalidInput(_, text)) => assert_eq!(text, "abc"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_underflow_aborts_remaining_sequence() {
        // the literal after the failing `+` must not run
        let result = eval("1 + 9", vec![]);
        assert!(matches!(result, Err(EvalError::StackUnderflow(_, 2, 1))));
    }

    #[test]
    fn test_underflow_error_points_at_operator() {
        let Err(err) = eval("1 2 + +", vec![]) else {
            panic!("expected an error");
        };
        // second `+` is at column 7
        assert_eq!(err.token().range.start.column, 7);
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let node = compile("dup *");
        let mut evaluator = Evaluator::new(io::empty());
        assert_eq!(evaluator.eval(&node, vec![3]).unwrap(), vec![9]);
        assert_eq!(evaluator.eval(&node, vec![4]).unwrap(), vec![16]);
    }
}
