//! Function registry
//!
//! Implements the function-call contract used by `function_expression` nodes:
//! a name-keyed registry of [`QueryFunction`]s with signature checking, plus
//! the built-in function library.

#![warn(missing_docs)]

pub mod function;
pub mod functions;
pub mod signature;

pub use function::{
    FunctionArg, FunctionArgs, FunctionError, FunctionRegistry, FunctionResult, QueryFunction,
};
pub use signature::{FunctionSignature, ParameterInfo};

/// Create a registry with every built-in function
pub fn create_standard_registry() -> FunctionRegistry {
    let mut functions = FunctionRegistry::new();
    functions::register_builtin_functions(&mut functions);
    functions
}
