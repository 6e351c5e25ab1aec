use std::rc::Rc;

pub mod node;

/// A compiled program is a single operation node; composition makes larger
/// programs out of smaller ones.
pub type Program = Rc<node::Node>;

pub use node::{BinaryOp, Node, Op, Sequence};
