//! String functions: contains, ends_with, join, starts_with

use std::sync::LazyLock;

use serde_json::Value;

use super::{array_arg, str_arg, value_arg};
use crate::evaluator::EvaluationResult;
use crate::model::{TypeInfo, values_equal};
use crate::registry::function::{FunctionArg, QueryFunction};
use crate::registry::signature::{FunctionSignature, ParameterInfo};

fn string_predicate_signature(name: &str, parameter: &str) -> FunctionSignature {
    FunctionSignature::new(
        name,
        vec![
            ParameterInfo::required("subject", TypeInfo::String),
            ParameterInfo::required(parameter, TypeInfo::String),
        ],
        TypeInfo::Boolean,
    )
}

/// contains() function - membership test on arrays and substring test on strings
pub struct ContainsFunction;

impl QueryFunction for ContainsFunction {
    fn name(&self) -> &str {
        "contains"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new(
                "contains",
                vec![
                    ParameterInfo::required(
                        "subject",
                        TypeInfo::Union(vec![TypeInfo::Array, TypeInfo::String]),
                    ),
                    ParameterInfo::required("search", TypeInfo::Any),
                ],
                TypeInfo::Boolean,
            )
        });
        &SIG
    }

    fn documentation(&self) -> &str {
        "Returns true if the array contains an element equal to search, or if the string contains search as a substring."
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        let search = value_arg(args, 1);
        let found = match value_arg(args, 0) {
            Value::Array(items) => items.iter().any(|item| values_equal(item, search)),
            Value::String(subject) => search.as_str().is_some_and(|s| subject.contains(s)),
            _ => false,
        };
        Ok(Value::Bool(found))
    }
}

/// ends_with() function - suffix test
pub struct EndsWithFunction;

impl QueryFunction for EndsWithFunction {
    fn name(&self) -> &str {
        "ends_with"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> =
            LazyLock::new(|| string_predicate_signature("ends_with", "suffix"));
        &SIG
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        Ok(Value::Bool(str_arg(args, 0).ends_with(str_arg(args, 1))))
    }
}

/// starts_with() function - prefix test
pub struct StartsWithFunction;

impl QueryFunction for StartsWithFunction {
    fn name(&self) -> &str {
        "starts_with"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> =
            LazyLock::new(|| string_predicate_signature("starts_with", "prefix"));
        &SIG
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        Ok(Value::Bool(str_arg(args, 0).starts_with(str_arg(args, 1))))
    }
}

/// join() function - concatenate strings with a separator
pub struct JoinFunction;

impl QueryFunction for JoinFunction {
    fn name(&self) -> &str {
        "join"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new(
                "join",
                vec![
                    ParameterInfo::required("glue", TypeInfo::String),
                    ParameterInfo::required("stringsarray", TypeInfo::array_of(TypeInfo::String)),
                ],
                TypeInfo::String,
            )
        });
        &SIG
    }

    fn documentation(&self) -> &str {
        "Returns all of the elements of stringsarray joined together with glue between each element."
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        let parts: Vec<&str> = array_arg(args, 1).iter().filter_map(Value::as_str).collect();
        Ok(Value::String(parts.join(str_arg(args, 0))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(function: &dyn QueryFunction, args: &[Value]) -> Value {
        let args: Vec<FunctionArg<'_>> = args.iter().cloned().map(FunctionArg::Value).collect();
        function.evaluate(&args).unwrap()
    }

    #[test]
    fn test_contains() {
        assert_eq!(call(&ContainsFunction, &[json!([1, "a"]), json!("a")]), json!(true));
        assert_eq!(call(&ContainsFunction, &[json!([1, 2]), json!(true)]), json!(false));
        assert_eq!(call(&ContainsFunction, &[json!("foobar"), json!("oba")]), json!(true));
        assert_eq!(call(&ContainsFunction, &[json!("foo1"), json!(1)]), json!(false));
    }

    #[test]
    fn test_prefix_suffix() {
        assert_eq!(call(&StartsWithFunction, &[json!("jmespath"), json!("jmes")]), json!(true));
        assert_eq!(call(&EndsWithFunction, &[json!("jmespath"), json!("jmes")]), json!(false));
    }

    #[test]
    fn test_join() {
        assert_eq!(call(&JoinFunction, &[json!(", "), json!(["a", "b"])]), json!("a, b"));
        assert_eq!(call(&JoinFunction, &[json!("-"), json!([])]), json!(""));
    }
}
