//! Collection functions: keys, length, merge, not_null, reverse, sort, values

use std::cmp::Ordering;
use std::sync::LazyLock;

use serde_json::{Map, Value};

use super::{array_arg, value_arg};
use crate::evaluator::EvaluationResult;
use crate::model::{TypeInfo, compare_values};
use crate::registry::function::{FunctionArg, QueryFunction};
use crate::registry::signature::{FunctionSignature, ParameterInfo};

/// keys() function - keys of an object
pub struct KeysFunction;

impl QueryFunction for KeysFunction {
    fn name(&self) -> &str {
        "keys"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new(
                "keys",
                vec![ParameterInfo::required("obj", TypeInfo::Object)],
                TypeInfo::array_of(TypeInfo::String),
            )
        });
        &SIG
    }

    fn documentation(&self) -> &str {
        "Returns an array containing the keys of the provided object."
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        let keys = value_arg(args, 0)
            .as_object()
            .map(|map| map.keys().cloned().map(Value::String).collect())
            .unwrap_or_default();
        Ok(Value::Array(keys))
    }
}

/// values() function - values of an object
pub struct ValuesFunction;

impl QueryFunction for ValuesFunction {
    fn name(&self) -> &str {
        "values"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new(
                "values",
                vec![ParameterInfo::required("obj", TypeInfo::Object)],
                TypeInfo::Array,
            )
        });
        &SIG
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        let values = value_arg(args, 0)
            .as_object()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default();
        Ok(Value::Array(values))
    }
}

/// length() function - characters of a string, elements of an array, or keys of an object
pub struct LengthFunction;

impl QueryFunction for LengthFunction {
    fn name(&self) -> &str {
        "length"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new(
                "length",
                vec![ParameterInfo::required(
                    "subject",
                    TypeInfo::Union(vec![TypeInfo::String, TypeInfo::Array, TypeInfo::Object]),
                )],
                TypeInfo::Number,
            )
        });
        &SIG
    }

    fn documentation(&self) -> &str {
        "Returns the length of the given argument: code points of a string, elements of an array, keys of an object."
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        let length = match value_arg(args, 0) {
            Value::String(s) => s.chars().count(),
            Value::Array(items) => items.len(),
            Value::Object(map) => map.len(),
            _ => 0,
        };
        Ok(Value::from(length))
    }
}

/// merge() function - combine objects left to right
pub struct MergeFunction;

impl QueryFunction for MergeFunction {
    fn name(&self) -> &str {
        "merge"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::variadic(
                "merge",
                vec![ParameterInfo::required("object", TypeInfo::Object)],
                TypeInfo::Object,
            )
        });
        &SIG
    }

    fn documentation(&self) -> &str {
        "Merges the provided objects. Keys of later objects override keys of earlier ones."
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        let mut merged = Map::new();
        for arg in args {
            if let Some(Value::Object(map)) = arg.as_value() {
                merged.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        Ok(Value::Object(merged))
    }
}

/// not_null() function - first argument that is not null
pub struct NotNullFunction;

impl QueryFunction for NotNullFunction {
    fn name(&self) -> &str {
        "not_null"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::variadic(
                "not_null",
                vec![ParameterInfo::required("argument", TypeInfo::Any)],
                TypeInfo::Any,
            )
        });
        &SIG
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        Ok(args
            .iter()
            .filter_map(FunctionArg::as_value)
            .find(|value| !value.is_null())
            .cloned()
            .unwrap_or(Value::Null))
    }
}

/// reverse() function - reverse a string or an array
pub struct ReverseFunction;

impl QueryFunction for ReverseFunction {
    fn name(&self) -> &str {
        "reverse"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new(
                "reverse",
                vec![ParameterInfo::required(
                    "argument",
                    TypeInfo::Union(vec![TypeInfo::String, TypeInfo::Array]),
                )],
                TypeInfo::Union(vec![TypeInfo::String, TypeInfo::Array]),
            )
        });
        &SIG
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        Ok(match value_arg(args, 0) {
            Value::String(s) => Value::String(s.chars().rev().collect()),
            Value::Array(items) => Value::Array(items.iter().rev().cloned().collect()),
            other => other.clone(),
        })
    }
}

/// sort() function - sort numbers or strings in natural order
pub struct SortFunction;

impl QueryFunction for SortFunction {
    fn name(&self) -> &str {
        "sort"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new(
                "sort",
                vec![ParameterInfo::required(
                    "list",
                    TypeInfo::Union(vec![
                        TypeInfo::array_of(TypeInfo::Number),
                        TypeInfo::array_of(TypeInfo::String),
                    ]),
                )],
                TypeInfo::Array,
            )
        });
        &SIG
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        let mut items = array_arg(args, 0).to_vec();
        items.sort_by(|a, b| compare_values(a, b).unwrap_or(Ordering::Equal));
        Ok(Value::Array(items))
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
    fn test_keys_and_values_keep_document_order() {
        let obj = json!({"z": 1, "a": 2});
        assert_eq!(call(&KeysFunction, &[obj.clone()]), json!(["z", "a"]));
        assert_eq!(call(&ValuesFunction, &[obj]), json!([1, 2]));
    }

    #[test]
    fn test_length_counts_code_points() {
        assert_eq!(call(&LengthFunction, &[json!("héllo")]), json!(5));
        assert_eq!(call(&LengthFunction, &[json!([1, 2])]), json!(2));
        assert_eq!(call(&LengthFunction, &[json!({"a": 1})]), json!(1));
    }

    #[test]
    fn test_merge_later_wins() {
        assert_eq!(
            call(&MergeFunction, &[json!({"a": 1, "b": 1}), json!({"b": 2})]),
            json!({"a": 1, "b": 2})
        );
    }

    #[test]
    fn test_not_null() {
        assert_eq!(call(&NotNullFunction, &[json!(null), json!(0), json!(1)]), json!(0));
        assert_eq!(call(&NotNullFunction, &[json!(null)]), json!(null));
    }

    #[test]
    fn test_reverse_and_sort() {
        assert_eq!(call(&ReverseFunction, &[json!("abc")]), json!("cba"));
        assert_eq!(call(&ReverseFunction, &[json!([1, 2, 3])]), json!([3, 2, 1]));
        assert_eq!(call(&SortFunction, &[json!([3, 1.5, 2])]), json!([1.5, 2, 3]));
        assert_eq!(call(&SortFunction, &[json!(["b", "a"])]), json!(["a", "b"]));
    }
}
