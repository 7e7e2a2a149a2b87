//! Function registry and the function-call contract

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde_json::Value;
use smallvec::SmallVec;
use thiserror::Error;

use super::signature::FunctionSignature;
use crate::evaluator::{DeferredExpression, EvaluationResult};
use crate::model::TypeInfo;

/// Result type for function operations
pub type FunctionResult<T> = Result<T, FunctionError>;

/// Function dispatch and evaluation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FunctionError {
    /// No function is registered under this name
    #[error("Unknown function '{name}'")]
    UnknownFunction {
        /// Function name
        name: String,
    },

    /// Invalid number of arguments
    #[error("Function '{name}' expects {min}-{} arguments, got {actual}", max.map_or("∞".to_string(), |n| n.to_string()))]
    InvalidArity {
        /// Function name
        name: String,
        /// Minimum arguments
        min: usize,
        /// Maximum arguments (None for unlimited)
        max: Option<usize>,
        /// Actual arguments provided
        actual: usize,
    },

    /// Invalid argument type
    #[error("Function '{name}' argument {index} expects {expected}, got {actual}")]
    InvalidArgumentType {
        /// Function name
        name: String,
        /// Argument index
        index: usize,
        /// Expected type
        expected: String,
        /// Actual type
        actual: String,
    },

    /// Runtime evaluation error
    #[error("Function '{name}' evaluation error: {message}")]
    EvaluationError {
        /// Function name
        name: String,
        /// Error message
        message: String,
    },
}

/// A resolved function argument.
///
/// `expref` arguments arrive unevaluated so higher-order functions can apply
/// them to values of their choosing.
#[derive(Debug, Clone)]
pub enum FunctionArg<'a> {
    /// An evaluated document value
    Value(Value),
    /// A deferred expression from `&expr`
    Expression(DeferredExpression<'a>),
}

/// Argument list passed to [`QueryFunction::evaluate`]
pub type FunctionArgs<'a> = SmallVec<[FunctionArg<'a>; 4]>;

impl<'a> FunctionArg<'a> {
    /// Type of this argument
    pub fn type_info(&self) -> TypeInfo {
        match self {
            FunctionArg::Value(value) => TypeInfo::of(value),
            FunctionArg::Expression(_) => TypeInfo::Expref,
        }
    }

    /// The value, if this is a value argument
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            FunctionArg::Value(value) => Some(value),
            FunctionArg::Expression(_) => None,
        }
    }

    /// The deferred expression, if this is an `expref` argument
    pub fn as_expression(&self) -> Option<&DeferredExpression<'a>> {
        match self {
            FunctionArg::Expression(expr) => Some(expr),
            FunctionArg::Value(_) => None,
        }
    }
}

/// A function callable from `function_expression` nodes.
///
/// Arguments have already been checked against [`QueryFunction::signature`]
/// when `evaluate` runs.
pub trait QueryFunction: Send + Sync {
    /// Get the function name
    fn name(&self) -> &str;

    /// Get the function signature
    fn signature(&self) -> &FunctionSignature;

    /// Evaluate the function with validated arguments
    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value>;

    /// Get function documentation
    fn documentation(&self) -> &str {
        ""
    }

    /// Shorthand for a runtime error raised by this function
    fn error(&self, message: impl Into<String>) -> FunctionError
    where
        Self: Sized,
    {
        FunctionError::EvaluationError {
            name: self.name().to_string(),
            message: message.into(),
        }
    }
}

/// Registry of callable functions, keyed by name
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: FxHashMap<String, Arc<dyn QueryFunction>>,
}

impl FunctionRegistry {
    /// Create a new empty function registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function, replacing any function with the same name
    pub fn register<F: QueryFunction + 'static>(&mut self, function: F) {
        self.register_arc(Arc::new(function));
    }

    /// Register a shared function instance
    pub fn register_arc(&mut self, function: Arc<dyn QueryFunction>) {
        let name = function.name().to_string();
        log::debug!("registering function {}", function.signature());
        if self.functions.insert(name.clone(), function).is_some() {
            log::debug!("function '{name}' replaced an earlier registration");
        }
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn QueryFunction>> {
        self.functions.get(name)
    }

    /// Check whether a function is registered
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// True when no function is registered
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered function names, sorted
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Dispatch a call: resolve the name, validate the arguments, evaluate.
    ///
    /// Failures are returned unchanged to the caller.
    pub fn call_function(&self, name: &str, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        let function = self.get(name).ok_or_else(|| FunctionError::UnknownFunction {
            name: name.to_string(),
        })?;
        function.signature().validate(args)?;
        function.evaluate(args)
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.function_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::EvaluationError;
    use crate::registry::signature::ParameterInfo;
    use serde_json::json;
    use std::sync::LazyLock;

    struct DoubleFunction;

    impl QueryFunction for DoubleFunction {
        fn name(&self) -> &str {
            "double"
        }
        fn signature(&self) -> &FunctionSignature {
            static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
                FunctionSignature::new(
                    "double",
                    vec![ParameterInfo::required("n", TypeInfo::Number)],
                    TypeInfo::Number,
                )
            });
            &SIG
        }
        fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
            let n = args[0].as_value().and_then(Value::as_f64).unwrap_or_default();
            Ok(json!(n * 2.0))
        }
    }

    #[test]
    fn test_register_and_call() {
        let mut registry = FunctionRegistry::new();
        registry.register(DoubleFunction);
        assert!(registry.contains("double"));
        assert_eq!(registry.function_names(), ["double"]);

        let result = registry
            .call_function("double", &[FunctionArg::Value(json!(2))])
            .unwrap();
        assert_eq!(result, json!(4.0));
    }

    #[test]
    fn test_unknown_function() {
        let registry = FunctionRegistry::new();
        let err = registry.call_function("missing", &[]).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::Function(FunctionError::UnknownFunction {
                name: "missing".to_string()
            })
        );
    }

    #[test]
    fn test_signature_checked_before_evaluation() {
        let mut registry = FunctionRegistry::new();
        registry.register(DoubleFunction);
        let err = registry
            .call_function("double", &[FunctionArg::Value(json!("two"))])
            .unwrap_err();
        assert!(matches!(
            err,
            EvaluationError::Function(FunctionError::InvalidArgumentType { index: 0, .. })
        ));
    }

    #[test]
    fn test_arity_error_message() {
        let err = FunctionError::InvalidArity {
            name: "f".to_string(),
            min: 1,
            max: None,
            actual: 0,
        };
        assert_eq!(err.to_string(), "Function 'f' expects 1-∞ arguments, got 0");
    }
}
