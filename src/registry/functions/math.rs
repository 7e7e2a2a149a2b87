//! Numeric functions: abs, avg, ceil, floor, max, min, sum

use std::cmp::Ordering;
use std::sync::LazyLock;

use serde_json::Value;

use super::{array_arg, value_arg};
use crate::evaluator::EvaluationResult;
use crate::model::{TypeInfo, compare_values, number_from_f64};
use crate::registry::function::{FunctionArg, QueryFunction};
use crate::registry::signature::{FunctionSignature, ParameterInfo};

fn unary_number_signature(name: &str) -> FunctionSignature {
    FunctionSignature::new(
        name,
        vec![ParameterInfo::required("value", TypeInfo::Number)],
        TypeInfo::Number,
    )
}

fn sortable_array() -> TypeInfo {
    TypeInfo::Union(vec![
        TypeInfo::array_of(TypeInfo::Number),
        TypeInfo::array_of(TypeInfo::String),
    ])
}

/// Largest (or smallest) element of a homogeneous array of numbers or strings
fn extreme(items: &[Value], wanted: Ordering) -> Value {
    let mut best: Option<&Value> = None;
    for item in items {
        best = match best {
            Some(current) if compare_values(item, current) != Some(wanted) => Some(current),
            _ => Some(item),
        };
    }
    best.cloned().unwrap_or(Value::Null)
}

/// abs() function - absolute value of a number
pub struct AbsFunction;

impl QueryFunction for AbsFunction {
    fn name(&self) -> &str {
        "abs"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| unary_number_signature("abs"));
        &SIG
    }

    fn documentation(&self) -> &str {
        "Returns the absolute value of the provided number."
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        let value = value_arg(args, 0);
        // unsigned so `i64::MIN` keeps its magnitude
        if let Some(n) = value.as_i64() {
            return Ok(Value::from(n.unsigned_abs()));
        }
        if let Some(n) = value.as_u64() {
            return Ok(Value::from(n));
        }
        Ok(number_from_f64(value.as_f64().unwrap_or_default().abs()))
    }
}

/// avg() function - arithmetic mean of an array of numbers
pub struct AvgFunction;

impl QueryFunction for AvgFunction {
    fn name(&self) -> &str {
        "avg"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new(
                "avg",
                vec![ParameterInfo::required(
                    "elements",
                    TypeInfo::array_of(TypeInfo::Number),
                )],
                TypeInfo::Number,
            )
        });
        &SIG
    }

    fn documentation(&self) -> &str {
        "Returns the average of the elements in the provided array. An empty array produces null."
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        let items = array_arg(args, 0);
        if items.is_empty() {
            return Ok(Value::Null);
        }
        let total: f64 = items.iter().filter_map(Value::as_f64).sum();
        Ok(number_from_f64(total / items.len() as f64))
    }
}

/// ceil() function - smallest integer not less than the argument
pub struct CeilFunction;

impl QueryFunction for CeilFunction {
    fn name(&self) -> &str {
        "ceil"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| unary_number_signature("ceil"));
        &SIG
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        let value = value_arg(args, 0);
        if value.is_i64() || value.is_u64() {
            return Ok(value.clone());
        }
        Ok(number_from_f64(value.as_f64().unwrap_or_default().ceil()))
    }
}

/// floor() function - largest integer not greater than the argument
pub struct FloorFunction;

impl QueryFunction for FloorFunction {
    fn name(&self) -> &str {
        "floor"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| unary_number_signature("floor"));
        &SIG
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        let value = value_arg(args, 0);
        if value.is_i64() || value.is_u64() {
            return Ok(value.clone());
        }
        Ok(number_from_f64(value.as_f64().unwrap_or_default().floor()))
    }
}

/// max() function - largest number or string in an array
pub struct MaxFunction;

impl QueryFunction for MaxFunction {
    fn name(&self) -> &str {
        "max"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new(
                "max",
                vec![ParameterInfo::required("collection", sortable_array())],
                TypeInfo::Union(vec![TypeInfo::Number, TypeInfo::String, TypeInfo::Null]),
            )
        });
        &SIG
    }

    fn documentation(&self) -> &str {
        "Returns the highest number or string found in the array. An empty array produces null."
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        Ok(extreme(array_arg(args, 0), Ordering::Greater))
    }
}

/// min() function - smallest number or string in an array
pub struct MinFunction;

impl QueryFunction for MinFunction {
    fn name(&self) -> &str {
        "min"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new(
                "min",
                vec![ParameterInfo::required("collection", sortable_array())],
                TypeInfo::Union(vec![TypeInfo::Number, TypeInfo::String, TypeInfo::Null]),
            )
        });
        &SIG
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        Ok(extreme(array_arg(args, 0), Ordering::Less))
    }
}

/// sum() function - total of an array of numbers
pub struct SumFunction;

impl QueryFunction for SumFunction {
    fn name(&self) -> &str {
        "sum"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new(
                "sum",
                vec![ParameterInfo::required(
                    "collection",
                    TypeInfo::array_of(TypeInfo::Number),
                )],
                TypeInfo::Number,
            )
        });
        &SIG
    }

    fn documentation(&self) -> &str {
        "Returns the sum of the provided array of numbers. An empty array sums to 0."
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        let items = array_arg(args, 0);
        let integral = items
            .iter()
            .try_fold(0i64, |acc, item| acc.checked_add(item.as_i64()?));
        if let Some(total) = integral {
            return Ok(Value::from(total));
        }
        let total: f64 = items.iter().filter_map(Value::as_f64).sum();
        Ok(number_from_f64(total))
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
    fn test_abs_keeps_integers() {
        assert_eq!(call(&AbsFunction, &[json!(-3)]), json!(3));
        assert_eq!(call(&AbsFunction, &[json!(-2.5)]), json!(2.5));
        assert_eq!(call(&AbsFunction, &[json!(i64::MIN)]), json!(1u64 << 63));
        assert_eq!(call(&AbsFunction, &[json!(u64::MAX)]), json!(u64::MAX));
    }

    #[test]
    fn test_sum_past_i64_range_stays_exact() {
        assert_eq!(
            call(&SumFunction, &[json!([i64::MAX, 1])]),
            json!(9_223_372_036_854_775_808u64)
        );
    }

    #[test]
    fn test_avg_and_sum() {
        assert_eq!(call(&AvgFunction, &[json!([1, 2])]), json!(1.5));
        assert_eq!(call(&AvgFunction, &[json!([])]), json!(null));
        assert_eq!(call(&SumFunction, &[json!([1, 2, 3])]), json!(6));
        assert_eq!(call(&SumFunction, &[json!([1, 0.5])]), json!(1.5));
        assert_eq!(call(&SumFunction, &[json!([])]), json!(0));
    }

    #[test]
    fn test_ceil_floor() {
        assert_eq!(call(&CeilFunction, &[json!(1.2)]), json!(2));
        assert_eq!(call(&FloorFunction, &[json!(-1.2)]), json!(-2));
        assert_eq!(call(&FloorFunction, &[json!(4)]), json!(4));
    }

    #[test]
    fn test_max_min() {
        assert_eq!(call(&MaxFunction, &[json!([3, 9, 1])]), json!(9));
        assert_eq!(call(&MinFunction, &[json!(["b", "a", "c"])]), json!("a"));
        assert_eq!(call(&MaxFunction, &[json!([])]), json!(null));
    }
}
