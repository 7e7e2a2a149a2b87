//! Deferred expressions handed to higher-order functions

use std::fmt;

use serde_json::Value;

use super::error::EvaluationResult;
use super::interpreter::TreeInterpreter;
use crate::ast::ExpressionNode;

/// An unevaluated sub-tree captured by an `expref` node.
///
/// Holds borrows of both the node and the interpreter that produced it, so it
/// lives no longer than the function call that received it and never keeps
/// the interpreter alive on its own.
#[derive(Clone, Copy)]
pub struct DeferredExpression<'a> {
    node: &'a ExpressionNode,
    interpreter: &'a TreeInterpreter,
}

impl<'a> DeferredExpression<'a> {
    pub(crate) fn new(node: &'a ExpressionNode, interpreter: &'a TreeInterpreter) -> Self {
        Self { node, interpreter }
    }

    /// The captured expression
    pub fn node(&self) -> &'a ExpressionNode {
        self.node
    }

    /// Evaluate the captured expression against `value`
    pub fn evaluate(&self, value: &Value) -> EvaluationResult<Value> {
        self.interpreter.visit(self.node, value)
    }
}

impl fmt::Debug for DeferredExpression<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredExpression")
            .field("node", self.node)
            .finish_non_exhaustive()
    }
}
