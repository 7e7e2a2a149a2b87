// Error types for expression evaluation

use thiserror::Error;

use crate::registry::FunctionError;

/// Result type for evaluation operations
pub type EvaluationResult<T> = Result<T, EvaluationError>;

/// Errors that can occur while loading or evaluating an expression tree.
///
/// Shape mismatches in the document are never errors; they evaluate to
/// `null`. Only malformed trees and function failures surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// The tree contains a node that cannot be evaluated
    #[error("Invalid node '{tag}': {reason}")]
    InvalidNode {
        /// Tag of the offending node
        tag: String,
        /// What is wrong with it
        reason: String,
    },

    /// Serialized tree text could not be decoded
    #[error("Tree decode error: {0}")]
    TreeDecode(String),

    /// Function dispatch or execution failed
    #[error("Function error: {0}")]
    Function(#[from] FunctionError),
}

impl EvaluationError {
    /// Create an invalid node error
    pub fn invalid_node(tag: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNode {
            tag: tag.into(),
            reason: reason.into(),
        }
    }

    /// True when the error comes from the function library
    pub fn is_function_error(&self) -> bool {
        matches!(self, EvaluationError::Function(_))
    }
}
