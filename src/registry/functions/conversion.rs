//! Conversion functions: to_array, to_number, to_string, type

use std::sync::LazyLock;

use serde_json::Value;

use super::value_arg;
use crate::evaluator::EvaluationResult;
use crate::model::{TypeInfo, number_from_f64};
use crate::registry::function::{FunctionArg, QueryFunction};
use crate::registry::signature::{FunctionSignature, ParameterInfo};

fn any_signature(name: &str, return_type: TypeInfo) -> FunctionSignature {
    FunctionSignature::new(
        name,
        vec![ParameterInfo::required("arg", TypeInfo::Any)],
        return_type,
    )
}

/// to_array() function - wrap non-arrays in a single element array
pub struct ToArrayFunction;

impl QueryFunction for ToArrayFunction {
    fn name(&self) -> &str {
        "to_array"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> =
            LazyLock::new(|| any_signature("to_array", TypeInfo::Array));
        &SIG
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        Ok(match value_arg(args, 0) {
            array @ Value::Array(_) => array.clone(),
            other => Value::Array(vec![other.clone()]),
        })
    }
}

/// to_number() function - numbers pass through, numeric strings are parsed
pub struct ToNumberFunction;

impl QueryFunction for ToNumberFunction {
    fn name(&self) -> &str {
        "to_number"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            any_signature(
                "to_number",
                TypeInfo::Union(vec![TypeInfo::Number, TypeInfo::Null]),
            )
        });
        &SIG
    }

    fn documentation(&self) -> &str {
        "Returns numbers unchanged and parses strings as numbers. Everything else, including unparsable strings, produces null."
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        Ok(match value_arg(args, 0) {
            number @ Value::Number(_) => number.clone(),
            Value::String(s) => {
                let trimmed = s.trim();
                if let Ok(n) = trimmed.parse::<i64>() {
                    Value::from(n)
                } else {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|n| n.is_finite())
                        .map_or(Value::Null, number_from_f64)
                }
            }
            _ => Value::Null,
        })
    }
}

/// to_string() function - strings pass through, other values are serialized as JSON
pub struct ToStringFunction;

impl QueryFunction for ToStringFunction {
    fn name(&self) -> &str {
        "to_string"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> =
            LazyLock::new(|| any_signature("to_string", TypeInfo::String));
        &SIG
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        match value_arg(args, 0) {
            string @ Value::String(_) => Ok(string.clone()),
            other => {
                let text = serde_json::to_string(other).map_err(|e| self.error(e.to_string()))?;
                Ok(Value::String(text))
            }
        }
    }
}

/// type() function - name of the argument's type
pub struct TypeFunction;

impl QueryFunction for TypeFunction {
    fn name(&self) -> &str {
        "type"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> =
            LazyLock::new(|| any_signature("type", TypeInfo::String));
        &SIG
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        let type_info = args
            .first()
            .map(FunctionArg::type_info)
            .unwrap_or(TypeInfo::Null);
        Ok(Value::String(type_info.type_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(function: &dyn QueryFunction, arg: Value) -> Value {
        function.evaluate(&[FunctionArg::Value(arg)]).unwrap()
    }

    #[test]
    fn test_to_array() {
        assert_eq!(call(&ToArrayFunction, json!([1])), json!([1]));
        assert_eq!(call(&ToArrayFunction, json!({"a": 1})), json!([{"a": 1}]));
    }

    #[test]
    fn test_to_number() {
        assert_eq!(call(&ToNumberFunction, json!("42")), json!(42));
        assert_eq!(call(&ToNumberFunction, json!("1.5")), json!(1.5));
        assert_eq!(call(&ToNumberFunction, json!("abc")), json!(null));
        assert_eq!(call(&ToNumberFunction, json!(true)), json!(null));
        assert_eq!(call(&ToNumberFunction, json!(7)), json!(7));
    }

    #[test]
    fn test_to_string() {
        assert_eq!(call(&ToStringFunction, json!("x")), json!("x"));
        assert_eq!(call(&ToStringFunction, json!([1, "a"])), json!("[1,\"a\"]"));
        assert_eq!(call(&ToStringFunction, json!(null)), json!("null"));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(call(&TypeFunction, json!(1)), json!("number"));
        assert_eq!(call(&TypeFunction, json!(false)), json!("boolean"));
        assert_eq!(call(&TypeFunction, json!({})), json!("object"));
    }
}
