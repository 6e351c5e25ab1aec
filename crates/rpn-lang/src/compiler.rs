use std::cell::LazyCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::ir::node::{BinaryOp, Node, Op};
use crate::lexer::token::{Token, TokenKind};
use crate::range::Range;

thread_local! {
    /// Operator keyword table, built on first use and read-only thereafter.
    static OPERATORS: LazyCell<FxHashMap<&'static str, Op>> = LazyCell::new(|| {
        FxHashMap::from_iter([
            ("+", Op::Binary(BinaryOp::Add)),
            ("-", Op::Binary(BinaryOp::Sub)),
            ("*", Op::Binary(BinaryOp::Mul)),
            ("/", Op::Binary(BinaryOp::Div)),
            ("%", Op::Binary(BinaryOp::Mod)),
            ("abs", Op::Abs),
            ("dup", Op::Dup),
            ("input", Op::Input),
        ])
    });
}

/// Maps each token to an operation and folds the result left-to-right into
/// a single composite node. Compilation is total: tokens that are neither
/// integer literals nor known operators are skipped, and an empty program
/// compiles to `Identity`.
pub fn compile(tokens: Vec<Token>) -> Rc<Node> {
    let mut eof: Option<Rc<Token>> = None;
    let mut program: Option<Rc<Node>> = None;

    for token in tokens {
        let token = Rc::new(token);
        let op = match &token.kind {
            TokenKind::NumberLiteral(value) => Some(Op::Literal(*value)),
            TokenKind::Ident(name) => OPERATORS.with(|ops| ops.get(name.as_str()).cloned()),
            TokenKind::Eof => {
                eof = Some(Rc::clone(&token));
                None
            }
        };

        let Some(op) = op else {
            continue;
        };

        let node = Rc::new(Node::new(token, op));
        program = Some(match program.take() {
            Some(acc) => Rc::new(Node::sequence(acc, node)),
            None => node,
        });
    }

    program.unwrap_or_else(|| {
        let token = eof.unwrap_or_else(|| {
            Rc::new(Token {
                range: Range::default(),
                kind: TokenKind::Eof,
            })
        });
        Rc::new(Node::new(token, Op::Identity))
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::lexer::tokenize;

    fn compiled(code: &str) -> Rc<Node> {
        compile(tokenize(code))
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("   ")]
    #[case::only_unknown_tokens("foo bar1 ++")]
    fn test_compiles_to_identity(#[case] code: &str) {
        let node = compiled(code);
        assert_eq!(*node.op, Op::Identity);
        assert_eq!(node.arguments(), 0);
        assert_eq!(node.results(), 0);
        assert!(node.is_pure());
    }

    #[rstest]
    #[case::literal("42", Op::Literal(42))]
    #[case::add("+", Op::Binary(BinaryOp::Add))]
    #[case::sub("-", Op::Binary(BinaryOp::Sub))]
    #[case::mul("*", Op::Binary(BinaryOp::Mul))]
    #[case::div("/", Op::Binary(BinaryOp::Div))]
    #[case::modulo("%", Op::Binary(BinaryOp::Mod))]
    #[case::abs("abs", Op::Abs)]
    #[case::dup("dup", Op::Dup)]
    #[case::input("input", Op::Input)]
    fn test_single_token(#[case] code: &str, #[case] expected: Op) {
        assert_eq!(*compiled(code).op, expected);
    }

    #[test]
    fn test_folds_left_to_right() {
        let node = compiled("2 3 +");
        let Op::Sequence(outer) = &*node.op else {
            panic!("expected a sequence, got {:?}", node.op);
        };
        assert_eq!(*outer.right.op, Op::Binary(BinaryOp::Add));

        let Op::Sequence(inner) = &*outer.left.op else {
            panic!("expected a sequence, got {:?}", outer.left.op);
        };
        assert_eq!(*inner.left.op, Op::Literal(2));
        assert_eq!(*inner.right.op, Op::Literal(3));
    }

    #[test]
    fn test_unknown_tokens_are_skipped() {
        let plain = compiled("2 3 +");
        let noisy = compiled("2 oops 3 ?? +");

        // structurally identical apart from token ranges
        assert_eq!(noisy.arguments(), plain.arguments());
        assert_eq!(noisy.results(), plain.results());
        let Op::Sequence(seq) = &*noisy.op else {
            panic!("expected a sequence, got {:?}", noisy.op);
        };
        assert_eq!(*seq.right.op, Op::Binary(BinaryOp::Add));
    }

    #[rstest]
    #[case("2 3 +", 0, 1, true)]
    #[case("dup +", 1, 1, true)]
    #[case("abs +", 2, 1, true)]
    #[case("+ +", 3, 1, true)]
    #[case("input 2 *", 0, 1, false)]
    #[case("1 2 3 + -111 - * 10 %", 0, 1, true)]
    fn test_compiled_arity(
        #[case] code: &str,
        #[case] arguments: u32,
        #[case] results: u32,
        #[case] pure: bool,
    ) {
        let node = compiled(code);
        assert_eq!(node.arguments(), arguments);
        assert_eq!(node.results(), results);
        assert_eq!(node.is_pure(), pure);
    }

    #[test]
    fn test_literal_tokens_carry_their_range() {
        let node = compiled("10 3 %");
        let Op::Sequence(seq) = &*node.op else {
            panic!("expected a sequence, got {:?}", node.op);
        };
        // the composite reports the position of the rightmost operation
        assert_eq!(node.token.range, seq.right.token.range);
        assert_eq!(seq.right.token.range.start.column, 6);
    }
}
