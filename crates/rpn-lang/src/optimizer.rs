use std::rc::Rc;

use crate::eval::Evaluator;
use crate::ir::node::{Node, Op};

/// Constant folding over compiled operation trees.
///
/// The pass is non-destructive: it allocates replacement nodes and shares
/// untouched subtrees with the input, which is never mutated.
#[derive(Debug, Default)]
pub struct Optimizer;

impl Optimizer {
    pub fn new() -> Self {
        Self
    }

    /// Returns an equivalent tree with constant subtrees collapsed into
    /// single literals. Idempotent: optimizing an optimized tree yields a
    /// structurally equal tree.
    pub fn optimize(&self, node: &Rc<Node>) -> Rc<Node> {
        match &*node.op {
            Op::Sequence(seq) => {
                let left = self.optimize(&seq.left);
                let right = self.optimize(&seq.right);

                let optimized = if Rc::ptr_eq(&left, &seq.left) && Rc::ptr_eq(&right, &seq.right)
                {
                    Rc::clone(node)
                } else {
                    Rc::new(Node::sequence(left, right))
                };

                self.fold(&optimized).unwrap_or(optimized)
            }
            _ => Rc::clone(node),
        }
    }

    /// A subtree folds when it takes nothing from the surrounding stack, is
    /// pure and leaves exactly one value; its replacement literal is the
    /// result of evaluating it against an empty stack. A subtree that still
    /// needs outer stack values, produces more than one value, or reads
    /// input is left alone, so folding never changes observable results.
    ///
    /// A fold-time evaluation error (division by zero inside a constant
    /// subtree) cancels the fold; the error then surfaces at apply time.
    fn fold(&self, node: &Rc<Node>) -> Option<Rc<Node>> {
        if node.arguments() != 0 || node.results() != 1 || !node.is_pure() {
            return None;
        }

        let stack = Evaluator::new(std::io::empty())
            .eval(node, Vec::new())
            .ok()?;
        stack
            .last()
            .map(|value| Rc::new(Node::new(Rc::clone(&node.token), Op::Literal(*value))))
    }
}
