use std::{
    fmt::{self, Display, Formatter},
    rc::Rc,
};

use crate::lexer::token::Token;

/// One step of stack transformation, annotated with the token it was
/// compiled from. Nodes are immutable once constructed and shared by
/// reference, so a compiled subtree may appear in several compositions
/// without being copied.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Node {
    pub token: Rc<Token>,
    pub op: Rc<Op>,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Op {
    /// Pushes a constant.
    Literal(i32),
    /// Pops two values and pushes the result.
    Binary(BinaryOp),
    /// Replaces the top value with its absolute value.
    Abs,
    /// Duplicates the top value.
    Dup,
    /// Reads one integer from the evaluator's input source and pushes it.
    Input,
    /// Leaves the stack unchanged; the compilation of blank input.
    Identity,
    /// Applies `left`, then `right`, threading the stack through both.
    Sequence(Sequence),
}

/// A binary composition node. Arity and purity are derived from the
/// children once, at construction, and never recomputed from runtime
/// stacks.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Sequence {
    pub left: Rc<Node>,
    pub right: Rc<Node>,
    arguments: u32,
    results: u32,
    pure: bool,
}

impl Node {
    pub fn new(token: Rc<Token>, op: Op) -> Self {
        Self {
            token,
            op: Rc::new(op),
        }
    }

    /// Chains `left` then `right`. The composite needs whatever `left`
    /// needs, plus the inputs of `right` that `left`'s outputs do not
    /// cover; it produces `right`'s outputs plus whatever `left` produced
    /// beyond `right`'s appetite.
    pub fn sequence(left: Rc<Node>, right: Rc<Node>) -> Self {
        let arguments = left.arguments() + right.arguments().saturating_sub(left.results());
        let results = right.results() + left.results().saturating_sub(right.arguments());
        let pure = left.is_pure() && right.is_pure();
        let token = Rc::clone(&right.token);

        Self {
            token,
            op: Rc::new(Op::Sequence(Sequence {
                left,
                right,
                arguments,
                results,
                pure,
            })),
        }
    }

    /// Minimum stack depth required before applying this operation.
    pub fn arguments(&self) -> u32 {
        match &*self.op {
            Op::Literal(_) | Op::Input | Op::Identity => 0,
            Op::Abs | Op::Dup => 1,
            Op::Binary(_) => 2,
            Op::Sequence(seq) => seq.arguments,
        }
    }

    /// Number of values left on top once the declared arguments have been
    /// consumed.
    pub fn results(&self) -> u32 {
        match &*self.op {
            Op::Identity => 0,
            Op::Literal(_) | Op::Input | Op::Binary(_) | Op::Abs => 1,
            Op::Dup => 2,
            Op::Sequence(seq) => seq.results,
        }
    }

    /// `true` if the output depends only on the input stack.
    pub fn is_pure(&self) -> bool {
        match &*self.op {
            Op::Input => false,
            Op::Sequence(seq) => seq.pure,
            _ => true,
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Sub => write!(f, "-"),
            BinaryOp::Mul => write!(f, "*"),
            BinaryOp::Div => write!(f, "/"),
            BinaryOp::Mod => write!(f, "%"),
        }
    }
}
