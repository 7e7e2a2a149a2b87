//! JMESPath expression tree evaluator
//!
//! Evaluates already-parsed JMESPath expression trees against JSON documents.
//! Trees are built with the builders in [`ast`] or loaded from their tagged
//! JSON form; documents are plain [`serde_json::Value`]s.
//!
//! ```rust
//! use jmes_eval::ast::{comparator, field, filter_projection, literal};
//! use jmes_eval::{Comparator, evaluate};
//! use serde_json::json;
//!
//! // people[?age > `30`].name
//! let tree = filter_projection(
//!     field("people"),
//!     field("name"),
//!     comparator(Comparator::Gt, field("age"), literal(json!(30))),
//! );
//! let doc = json!({"people": [{"name": "a", "age": 20}, {"name": "b", "age": 40}]});
//! assert_eq!(evaluate(&tree, &doc).unwrap(), json!(["b"]));
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;

pub mod ast;
pub mod config;
pub mod engine;
pub mod evaluator;
pub mod model;
pub mod registry;

// Re-export main types
pub use ast::{Comparator, ExpressionNode, NodeKind, RawNode};
pub use config::EngineConfig;
pub use engine::{CacheStats, QueryEngine};
pub use evaluator::{DeferredExpression, EvaluationError, EvaluationResult, TreeInterpreter};
pub use registry::{FunctionError, FunctionRegistry, QueryFunction, create_standard_registry};

static DEFAULT_INTERPRETER: Lazy<TreeInterpreter> = Lazy::new(TreeInterpreter::new);

/// Evaluate `tree` against `document` with the standard function library
pub fn evaluate(tree: &ExpressionNode, document: &Value) -> EvaluationResult<Value> {
    DEFAULT_INTERPRETER.visit(tree, document)
}
