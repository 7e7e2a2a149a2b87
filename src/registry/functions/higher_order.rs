//! Higher-order functions: map, max_by, min_by, sort_by
//!
//! These take an `&expr` argument and re-enter the interpreter through
//! [`DeferredExpression::evaluate`] once per element.

use std::cmp::Ordering;
use std::sync::LazyLock;

use serde_json::Value;

use super::{array_arg, expression_arg};
use crate::evaluator::{DeferredExpression, EvaluationResult};
use crate::model::{TypeInfo, compare_values};
use crate::registry::function::{FunctionArg, FunctionError, QueryFunction};
use crate::registry::signature::{FunctionSignature, ParameterInfo};

fn by_signature(name: &str, return_type: TypeInfo) -> FunctionSignature {
    FunctionSignature::new(
        name,
        vec![
            ParameterInfo::required("elements", TypeInfo::Array),
            ParameterInfo::required("expr", TypeInfo::Expref),
        ],
        return_type,
    )
}

fn required_expression<'v, 'a>(
    function: &impl QueryFunction,
    args: &'v [FunctionArg<'a>],
    position: usize,
) -> Result<&'v DeferredExpression<'a>, FunctionError> {
    expression_arg(args, position).ok_or_else(|| function.error("missing expression argument"))
}

/// Evaluate `expr` against every element and check the keys are all numbers
/// or all strings.
fn sort_keys(
    function: &impl QueryFunction,
    expr: &DeferredExpression<'_>,
    items: &[Value],
) -> EvaluationResult<Vec<Value>> {
    let mut keys = Vec::with_capacity(items.len());
    let mut key_type: Option<TypeInfo> = None;
    for item in items {
        let key = expr.evaluate(item)?;
        let current = TypeInfo::of(&key);
        let consistent = match &key_type {
            None => matches!(current, TypeInfo::Number | TypeInfo::String),
            Some(expected) => *expected == current,
        };
        if !consistent {
            return Err(FunctionError::InvalidArgumentType {
                name: function.name().to_string(),
                index: 1,
                expected: key_type
                    .map(|t| format!("expref->{t}"))
                    .unwrap_or_else(|| "expref->number|expref->string".to_string()),
                actual: format!("expref->{current}"),
            }
            .into());
        }
        key_type.get_or_insert(current);
        keys.push(key);
    }
    Ok(keys)
}

fn extreme_by(
    function: &impl QueryFunction,
    args: &[FunctionArg<'_>],
    wanted: Ordering,
) -> EvaluationResult<Value> {
    let items = array_arg(args, 0);
    let expr = required_expression(function, args, 1)?;
    let keys = sort_keys(function, expr, items)?;

    let mut best: Option<usize> = None;
    for (position, key) in keys.iter().enumerate() {
        best = match best {
            Some(current) if compare_values(key, &keys[current]) != Some(wanted) => Some(current),
            _ => Some(position),
        };
    }
    Ok(best.map_or(Value::Null, |position| items[position].clone()))
}

/// map() function - apply an expression to every element, keeping nulls
pub struct MapFunction;

impl QueryFunction for MapFunction {
    fn name(&self) -> &str {
        "map"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> = LazyLock::new(|| {
            FunctionSignature::new(
                "map",
                vec![
                    ParameterInfo::required("expr", TypeInfo::Expref),
                    ParameterInfo::required("elements", TypeInfo::Array),
                ],
                TypeInfo::Array,
            )
        });
        &SIG
    }

    fn documentation(&self) -> &str {
        "Applies expr to every element of elements. Unlike a projection, null results are kept."
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        let expr = required_expression(self, args, 0)?;
        let mapped = array_arg(args, 1)
            .iter()
            .map(|item| expr.evaluate(item))
            .collect::<EvaluationResult<Vec<_>>>()?;
        Ok(Value::Array(mapped))
    }
}

/// max_by() function - element with the largest key
pub struct MaxByFunction;

impl QueryFunction for MaxByFunction {
    fn name(&self) -> &str {
        "max_by"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> =
            LazyLock::new(|| by_signature("max_by", TypeInfo::Any));
        &SIG
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        extreme_by(self, args, Ordering::Greater)
    }
}

/// min_by() function - element with the smallest key
pub struct MinByFunction;

impl QueryFunction for MinByFunction {
    fn name(&self) -> &str {
        "min_by"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> =
            LazyLock::new(|| by_signature("min_by", TypeInfo::Any));
        &SIG
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        extreme_by(self, args, Ordering::Less)
    }
}

/// sort_by() function - stable sort by a computed key
pub struct SortByFunction;

impl QueryFunction for SortByFunction {
    fn name(&self) -> &str {
        "sort_by"
    }

    fn signature(&self) -> &FunctionSignature {
        static SIG: LazyLock<FunctionSignature> =
            LazyLock::new(|| by_signature("sort_by", TypeInfo::Array));
        &SIG
    }

    fn documentation(&self) -> &str {
        "Sorts elements by the value expr produces for each one. Keys must be all numbers or all strings; equal keys keep their input order."
    }

    fn evaluate(&self, args: &[FunctionArg<'_>]) -> EvaluationResult<Value> {
        let items = array_arg(args, 0);
        let expr = required_expression(self, args, 1)?;
        let keys = sort_keys(self, expr, items)?;

        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by(|&a, &b| compare_values(&keys[a], &keys[b]).unwrap_or(Ordering::Equal));
        Ok(Value::Array(
            order.into_iter().map(|i| items[i].clone()).collect(),
        ))
    }
}
