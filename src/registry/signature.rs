//! Function signatures for argument checking

use serde::{Deserialize, Serialize};
use std::fmt;

use super::function::{FunctionArg, FunctionError, FunctionResult};
use crate::model::TypeInfo;

/// Function signature used to validate arguments before dispatch
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionSignature {
    /// Function name
    pub name: String,
    /// Parameter types
    pub parameters: Vec<ParameterInfo>,
    /// Return type
    pub return_type: TypeInfo,
    /// Minimum number of arguments
    pub min_arity: usize,
    /// Maximum number of arguments (None for variadic)
    pub max_arity: Option<usize>,
}

/// Parameter information for functions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterInfo {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub param_type: TypeInfo,
    /// Whether this parameter is optional
    pub optional: bool,
}

impl FunctionSignature {
    /// Create a new function signature
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<ParameterInfo>,
        return_type: TypeInfo,
    ) -> Self {
        let required_params = parameters.iter().filter(|p| !p.optional).count();
        let max_arity = Some(parameters.len());

        Self {
            name: name.into(),
            parameters,
            return_type,
            min_arity: required_params,
            max_arity,
        }
    }

    /// Create a variadic function signature.
    ///
    /// The last parameter repeats for every argument past the fixed ones.
    pub fn variadic(
        name: impl Into<String>,
        parameters: Vec<ParameterInfo>,
        return_type: TypeInfo,
    ) -> Self {
        let required_params = parameters.iter().filter(|p| !p.optional).count();

        Self {
            name: name.into(),
            parameters,
            return_type,
            min_arity: required_params,
            max_arity: None,
        }
    }

    fn parameter_for(&self, position: usize) -> Option<&ParameterInfo> {
        match self.parameters.get(position) {
            Some(param) => Some(param),
            None if self.max_arity.is_none() => self.parameters.last(),
            None => None,
        }
    }

    /// Check arity, then the type of every argument
    pub fn validate(&self, args: &[FunctionArg<'_>]) -> FunctionResult<()> {
        let too_few = args.len() < self.min_arity;
        let too_many = self.max_arity.is_some_and(|max| args.len() > max);
        if too_few || too_many {
            return Err(FunctionError::InvalidArity {
                name: self.name.clone(),
                min: self.min_arity,
                max: self.max_arity,
                actual: args.len(),
            });
        }

        for (position, arg) in args.iter().enumerate() {
            let Some(param) = self.parameter_for(position) else {
                continue;
            };
            let accepted = match arg {
                FunctionArg::Value(value) => param.param_type.accepts(value),
                FunctionArg::Expression(_) => param.param_type.accepts_expref(),
            };
            if !accepted {
                return Err(FunctionError::InvalidArgumentType {
                    name: self.name.clone(),
                    index: position,
                    expected: param.param_type.type_name(),
                    actual: arg.type_info().type_name(),
                });
            }
        }

        Ok(())
    }
}

impl ParameterInfo {
    /// Create a required parameter
    pub fn required(name: impl Into<String>, param_type: TypeInfo) -> Self {
        Self {
            name: name.into(),
            param_type,
            optional: false,
        }
    }

    /// Create an optional parameter
    pub fn optional(name: impl Into<String>, param_type: TypeInfo) -> Self {
        Self {
            name: name.into(),
            param_type,
            optional: true,
        }
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", param.name, param.param_type)?;
            if param.optional {
                write!(f, "?")?;
            }
        }
        if self.max_arity.is_none() {
            write!(f, "...")?;
        }
        write!(f, ") -> {}", self.return_type)
    }
}
