//! Tree interpreter
//!
//! Evaluates an [`ExpressionNode`] against a document value. Each node kind is
//! handled by one `visit_*` method; [`TreeInterpreter::visit`] dispatches on
//! the node with an exhaustive match.

use std::sync::Arc;

use serde_json::{Map, Value};
use smallvec::SmallVec;

use super::deferred::DeferredExpression;
use super::error::EvaluationResult;
use crate::ast::{Comparator, ExpressionNode, KeyValuePair};
use crate::model::{is_falsy, is_filter_match};
use crate::registry::{FunctionArg, FunctionArgs, FunctionRegistry, create_standard_registry};

/// Tree-walking evaluator for expression trees.
///
/// The interpreter is immutable once built and is `Send + Sync`, so a single
/// instance can evaluate the same tree against many documents concurrently.
#[derive(Clone)]
pub struct TreeInterpreter {
    /// Functions reachable from `function_expression` nodes
    functions: Arc<FunctionRegistry>,
}

impl Default for TreeInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeInterpreter {
    /// Create an interpreter with the standard function library
    pub fn new() -> Self {
        Self::with_registry(Arc::new(create_standard_registry()))
    }

    /// Create an interpreter dispatching function calls to `functions`
    pub fn with_registry(functions: Arc<FunctionRegistry>) -> Self {
        Self { functions }
    }

    /// Get the function registry
    pub fn function_registry(&self) -> &Arc<FunctionRegistry> {
        &self.functions
    }

    /// Evaluate `node` against `value`
    pub fn visit(&self, node: &ExpressionNode, value: &Value) -> EvaluationResult<Value> {
        match node {
            ExpressionNode::Identity | ExpressionNode::Current => Ok(value.clone()),
            ExpressionNode::Field(name) => Ok(self.visit_field(name, value)),
            ExpressionNode::Index(position) => Ok(self.visit_index(*position, value)),
            ExpressionNode::Literal(literal) => Ok(literal.clone()),
            ExpressionNode::SubExpression(children)
            | ExpressionNode::IndexExpression(children)
            | ExpressionNode::Pipe(children) => self.visit_chain(children, value),
            ExpressionNode::OrExpression { left, right } => {
                self.visit_or_expression(left, right, value)
            }
            ExpressionNode::Flatten(child) => self.visit_flatten(child, value),
            ExpressionNode::Projection { base, projection } => {
                self.visit_projection(base, projection, value)
            }
            ExpressionNode::FilterProjection {
                base,
                projection,
                predicate,
            } => self.visit_filter_projection(base, projection, predicate, value),
            ExpressionNode::ValueProjection { base, projection } => {
                self.visit_value_projection(base, projection, value)
            }
            ExpressionNode::MultiSelectList(children) => {
                self.visit_multi_select_list(children, value)
            }
            ExpressionNode::MultiSelectDict(pairs) => self.visit_multi_select_dict(pairs, value),
            ExpressionNode::Comparator { op, left, right } => {
                self.visit_comparator(*op, left, right, value)
            }
            // Only meaningful as a function argument; see visit_function_expression.
            ExpressionNode::ExpRef(_) => Ok(Value::Null),
            ExpressionNode::FunctionExpression { name, args } => {
                self.visit_function_expression(name, args, value)
            }
        }
    }

    fn visit_field(&self, name: &str, value: &Value) -> Value {
        match value {
            Value::Object(map) => map.get(name).cloned().unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }

    fn visit_index(&self, position: i64, value: &Value) -> Value {
        let Value::Array(items) = value else {
            return Value::Null;
        };
        let len = items.len() as i64;
        let resolved = if position < 0 { len + position } else { position };
        if (0..len).contains(&resolved) {
            items[resolved as usize].clone()
        } else {
            Value::Null
        }
    }

    fn visit_chain(&self, children: &[ExpressionNode], value: &Value) -> EvaluationResult<Value> {
        let mut result = value.clone();
        for child in children {
            result = self.visit(child, &result)?;
        }
        Ok(result)
    }

    fn visit_or_expression(
        &self,
        left: &ExpressionNode,
        right: &ExpressionNode,
        value: &Value,
    ) -> EvaluationResult<Value> {
        let matched = self.visit(left, value)?;
        if is_falsy(&matched) {
            return self.visit(right, value);
        }
        Ok(matched)
    }

    fn visit_flatten(&self, child: &ExpressionNode, value: &Value) -> EvaluationResult<Value> {
        let Value::Array(items) = self.visit(child, value)? else {
            return Ok(Value::Null);
        };
        let mut merged = Vec::with_capacity(items.len());
        for element in items {
            match element {
                Value::Array(inner) => merged.extend(inner),
                other => merged.push(other),
            }
        }
        Ok(Value::Array(merged))
    }

    fn visit_projection(
        &self,
        base: &ExpressionNode,
        projection: &ExpressionNode,
        value: &Value,
    ) -> EvaluationResult<Value> {
        let Value::Array(items) = self.visit(base, value)? else {
            return Ok(Value::Null);
        };
        self.project(items.iter(), projection)
    }

    fn visit_filter_projection(
        &self,
        base: &ExpressionNode,
        projection: &ExpressionNode,
        predicate: &ExpressionNode,
        value: &Value,
    ) -> EvaluationResult<Value> {
        let Value::Array(items) = self.visit(base, value)? else {
            return Ok(Value::Null);
        };
        let mut collected = Vec::new();
        for element in &items {
            if !is_filter_match(&self.visit(predicate, element)?) {
                continue;
            }
            let current = self.visit(projection, element)?;
            if !current.is_null() {
                collected.push(current);
            }
        }
        Ok(Value::Array(collected))
    }

    fn visit_value_projection(
        &self,
        base: &ExpressionNode,
        projection: &ExpressionNode,
        value: &Value,
    ) -> EvaluationResult<Value> {
        let Value::Object(map) = self.visit(base, value)? else {
            return Ok(Value::Null);
        };
        self.project(map.values(), projection)
    }

    /// Apply `projection` to every element, dropping null results
    fn project<'v>(
        &self,
        elements: impl Iterator<Item = &'v Value>,
        projection: &ExpressionNode,
    ) -> EvaluationResult<Value> {
        let mut collected = Vec::new();
        for element in elements {
            let current = self.visit(projection, element)?;
            if !current.is_null() {
                collected.push(current);
            }
        }
        Ok(Value::Array(collected))
    }

    fn visit_multi_select_list(
        &self,
        children: &[ExpressionNode],
        value: &Value,
    ) -> EvaluationResult<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let collected = children
            .iter()
            .map(|child| self.visit(child, value))
            .collect::<EvaluationResult<Vec<_>>>()?;
        Ok(Value::Array(collected))
    }

    fn visit_multi_select_dict(
        &self,
        pairs: &[KeyValuePair],
        value: &Value,
    ) -> EvaluationResult<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let mut collected = Map::with_capacity(pairs.len());
        for pair in pairs {
            let evaluated = self.visit_key_val_pair(pair, value)?;
            collected.insert(pair.key.clone(), evaluated);
        }
        Ok(Value::Object(collected))
    }

    fn visit_key_val_pair(&self, pair: &KeyValuePair, value: &Value) -> EvaluationResult<Value> {
        self.visit(&pair.value, value)
    }

    fn visit_comparator(
        &self,
        op: Comparator,
        left: &ExpressionNode,
        right: &ExpressionNode,
        value: &Value,
    ) -> EvaluationResult<Value> {
        let left = self.visit(left, value)?;
        let right = self.visit(right, value)?;
        Ok(Value::Bool(op.apply(&left, &right)))
    }

    fn visit_function_expression(
        &self,
        name: &str,
        args: &[ExpressionNode],
        value: &Value,
    ) -> EvaluationResult<Value> {
        let mut resolved: FunctionArgs<'_> = SmallVec::with_capacity(args.len());
        for arg in args {
            resolved.push(match arg {
                ExpressionNode::ExpRef(child) => {
                    FunctionArg::Expression(DeferredExpression::new(child, self))
                }
                other => FunctionArg::Value(self.visit(other, value)?),
            });
        }
        self.functions.call_function(name, &resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use crate::evaluator::EvaluationError;
    use crate::registry::FunctionError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn eval(node: &ExpressionNode, value: Value) -> Value {
        TreeInterpreter::new().visit(node, &value).unwrap()
    }

    #[test]
    fn test_identity_and_current() {
        let doc = json!({"a": [1, 2, {"b": null}]});
        assert_eq!(eval(&identity(), doc.clone()), doc);
        assert_eq!(eval(&current(), doc.clone()), doc);
    }

    #[test]
    fn test_field_lookup() {
        assert_eq!(eval(&field("a"), json!({"a": 1, "b": 2})), json!(1));
        assert_eq!(eval(&field("a"), json!(5)), json!(null));
        assert_eq!(eval(&field("a"), json!({"b": 2})), json!(null));
        assert_eq!(eval(&field("0"), json!(["x"])), json!(null));
    }

    #[test]
    fn test_index_lookup() {
        assert_eq!(eval(&index(1), json!([10, 20, 30])), json!(20));
        assert_eq!(eval(&index(-1), json!([10, 20, 30])), json!(30));
        assert_eq!(eval(&index(-3), json!([10, 20, 30])), json!(10));
        assert_eq!(eval(&index(-4), json!([10, 20, 30])), json!(null));
        assert_eq!(eval(&index(5), json!([10, 20, 30])), json!(null));
        assert_eq!(eval(&index(0), json!("not-a-list")), json!(null));
    }

    #[test]
    fn test_literal_ignores_current_value() {
        assert_eq!(eval(&literal(json!({"k": [1]})), json!(null)), json!({"k": [1]}));
    }

    #[test]
    fn test_chains() {
        let doc = json!({"a": {"b": [{"c": 7}]}});
        let tree = sub_expression([
            field("a"),
            index_expression([field("b"), index(0)]),
            field("c"),
        ]);
        assert_eq!(eval(&tree, doc.clone()), json!(7));
        assert_eq!(eval(&pipe([field("a"), field("b")]), doc), json!([{"c": 7}]));
    }

    #[test]
    fn test_or_expression_short_circuits() {
        let fallback = literal(json!("fallback"));
        assert_eq!(
            eval(&or_expression(literal(json!("")), fallback.clone()), json!(null)),
            json!("fallback")
        );
        assert_eq!(
            eval(&or_expression(literal(json!(0)), fallback.clone()), json!(null)),
            json!(0)
        );
        // The right side would fail if evaluated.
        let failing = function("no_such_function", []);
        assert_eq!(
            eval(&or_expression(literal(json!("x")), failing), json!(null)),
            json!("x")
        );
    }

    #[test]
    fn test_flatten_one_level() {
        assert_eq!(
            eval(&flatten(identity()), json!([[1, 2], [3], 4])),
            json!([1, 2, 3, 4])
        );
        assert_eq!(
            eval(&flatten(identity()), json!([[1, [2]], []])),
            json!([1, [2]])
        );
        assert_eq!(eval(&flatten(identity()), json!({"a": 1})), json!(null));
    }

    #[test]
    fn test_projection_drops_nulls() {
        let doc = json!([{"a": 1}, {"b": 2}, {"a": 3}]);
        assert_eq!(eval(&projection(identity(), field("a")), doc), json!([1, 3]));
        assert_eq!(
            eval(&projection(identity(), field("a")), json!({"a": 1})),
            json!(null)
        );
    }

    #[test]
    fn test_filter_projection() {
        let base = json!([{"a": 1}, {"a": 2}, {"a": 3}]);
        let tree = filter_projection(
            identity(),
            field("a"),
            comparator(Comparator::Gt, field("a"), literal(json!(1))),
        );
        assert_eq!(eval(&tree, base), json!([2, 3]));
        assert_eq!(eval(&tree, json!("nope")), json!(null));
    }

    #[test]
    fn test_filter_predicate_rejects_zero_and_falsy_values() {
        let doc = json!([{"v": 0}, {"v": 1}, {"v": ""}, {"v": [1]}, {"v": false}, {"v": 0.0}]);
        let tree = filter_projection(identity(), field("v"), field("v"));
        assert_eq!(eval(&tree, doc), json!([1, [1]]));
    }

    #[test]
    fn test_value_projection() {
        let doc = json!({"x": {"n": 1}, "y": {"m": 2}, "z": {"n": 3}});
        assert_eq!(
            eval(&value_projection(identity(), field("n")), doc),
            json!([1, 3])
        );
        assert_eq!(
            eval(&value_projection(identity(), identity()), json!([1, 2])),
            json!(null)
        );
    }

    #[test]
    fn test_multi_select_null_short_circuit() {
        let list = multi_select_list([field("a"), function("no_such_function", [])]);
        assert_eq!(eval(&list, json!(null)), json!(null));
        let dict = multi_select_dict([("k", function("no_such_function", []))]);
        assert_eq!(eval(&dict, json!(null)), json!(null));
    }

    #[test]
    fn test_multi_select_dict_order_and_overwrite() {
        let dict = multi_select_dict([
            ("second", field("b")),
            ("first", field("a")),
            ("second", field("a")),
        ]);
        let result = eval(&dict, json!({"a": 1, "b": 2}));
        let keys: Vec<&String> = result.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["second", "first"]);
        assert_eq!(result, json!({"second": 1, "first": 1}));
    }

    #[test]
    fn test_expref_outside_arguments_is_null() {
        assert_eq!(eval(&expref(field("a")), json!({"a": 1})), json!(null));
    }

    #[test]
    fn test_unknown_function_propagates() {
        let err = TreeInterpreter::new()
            .visit(&function("nope", [identity()]), &json!(1))
            .unwrap_err();
        assert_eq!(
            err,
            EvaluationError::Function(FunctionError::UnknownFunction {
                name: "nope".to_string()
            })
        );
    }

    #[test]
    fn test_higher_order_function_receives_deferred_expression() {
        let tree = function("map", [expref(field("a")), identity()]);
        assert_eq!(
            eval(&tree, json!([{"a": 1}, {"b": 2}, {"a": 3}])),
            json!([1, null, 3])
        );
    }
}
