//! Built-in function library
//!
//! Functions are grouped by what they operate on. Every function validates its
//! arguments through its signature before `evaluate` runs, so the accessors in
//! this module only fall back to defaults for arguments a signature marks as
//! optional.

pub mod collection;
pub mod conversion;
pub mod higher_order;
pub mod math;
pub mod string;

use serde_json::Value;

use super::function::{FunctionArg, FunctionRegistry};
use crate::evaluator::DeferredExpression;

pub use collection::*;
pub use conversion::*;
pub use higher_order::*;
pub use math::*;
pub use string::*;

static NULL: Value = Value::Null;

/// Register every built-in function
pub fn register_builtin_functions(registry: &mut FunctionRegistry) {
    // math
    registry.register(AbsFunction);
    registry.register(AvgFunction);
    registry.register(CeilFunction);
    registry.register(FloorFunction);
    registry.register(MaxFunction);
    registry.register(MinFunction);
    registry.register(SumFunction);

    // string
    registry.register(ContainsFunction);
    registry.register(EndsWithFunction);
    registry.register(JoinFunction);
    registry.register(StartsWithFunction);

    // collection
    registry.register(KeysFunction);
    registry.register(LengthFunction);
    registry.register(MergeFunction);
    registry.register(NotNullFunction);
    registry.register(ReverseFunction);
    registry.register(SortFunction);
    registry.register(ValuesFunction);

    // conversion
    registry.register(ToArrayFunction);
    registry.register(ToNumberFunction);
    registry.register(ToStringFunction);
    registry.register(TypeFunction);

    // higher order
    registry.register(MapFunction);
    registry.register(MaxByFunction);
    registry.register(MinByFunction);
    registry.register(SortByFunction);
}

/// Value argument at `position`, `null` when absent
pub(crate) fn value_arg<'v>(args: &'v [FunctionArg<'_>], position: usize) -> &'v Value {
    args.get(position)
        .and_then(FunctionArg::as_value)
        .unwrap_or(&NULL)
}

/// Array argument at `position`, empty when absent
pub(crate) fn array_arg<'v>(args: &'v [FunctionArg<'_>], position: usize) -> &'v [Value] {
    value_arg(args, position)
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// String argument at `position`, empty when absent
pub(crate) fn str_arg<'v>(args: &'v [FunctionArg<'_>], position: usize) -> &'v str {
    value_arg(args, position).as_str().unwrap_or_default()
}

/// Expression argument at `position`
pub(crate) fn expression_arg<'v, 'a>(
    args: &'v [FunctionArg<'a>],
    position: usize,
) -> Option<&'v DeferredExpression<'a>> {
    args.get(position).and_then(FunctionArg::as_expression)
}
