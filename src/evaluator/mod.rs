//! Expression tree evaluator
//!
//! Walks an [`ExpressionNode`](crate::ast::ExpressionNode) against a JSON
//! document. Shape mismatches resolve to `null`; malformed trees and function
//! failures surface as [`EvaluationError`].

#![warn(missing_docs)]

mod comparator;
mod deferred;
mod error;
mod interpreter;

pub use deferred::DeferredExpression;
pub use error::{EvaluationError, EvaluationResult};
pub use interpreter::TreeInterpreter;
