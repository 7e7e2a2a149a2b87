//! Loading expression trees from their tagged JSON form
//!
//! Parsers that run outside this crate hand over trees as nested objects of the
//! shape `{"type": "<tag>", "value": <payload>, "children": [...]}`. This module
//! is the trust boundary: tags are resolved once through the tag table in
//! [`NodeKind::from_tag`], payloads and arities are checked, and the result is
//! a well-formed [`ExpressionNode`]. Anything malformed becomes
//! [`EvaluationError::InvalidNode`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::expression::{ExpressionNode, KeyValuePair};
use super::kind::NodeKind;
use super::operator::Comparator;
use crate::evaluator::{EvaluationError, EvaluationResult};

/// A tree node exactly as it appears in serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    /// Node tag
    #[serde(rename = "type")]
    pub node_type: String,
    /// Tag-dependent payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Child nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawNode>,
}

impl RawNode {
    /// Create a raw node without payload or children
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            value: None,
            children: Vec::new(),
        }
    }

    /// Attach a payload
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attach children
    pub fn with_children(mut self, children: Vec<RawNode>) -> Self {
        self.children = children;
        self
    }
}

impl ExpressionNode {
    /// Build a tree from its tagged JSON form
    pub fn from_json(tree: &Value) -> EvaluationResult<ExpressionNode> {
        let raw = RawNode::deserialize(tree)
            .map_err(|e| EvaluationError::TreeDecode(e.to_string()))?;
        ExpressionNode::try_from(raw)
    }

    /// Build a tree from tagged JSON text
    pub fn from_json_str(text: &str) -> EvaluationResult<ExpressionNode> {
        let raw: RawNode =
            serde_json::from_str(text).map_err(|e| EvaluationError::TreeDecode(e.to_string()))?;
        ExpressionNode::try_from(raw)
    }

    /// Convert back to the tagged JSON form
    pub fn to_raw(&self) -> RawNode {
        let node = RawNode::new(self.kind().as_str());
        match self {
            ExpressionNode::Identity | ExpressionNode::Current => node,
            ExpressionNode::Field(name) => node.with_value(name.as_str()),
            ExpressionNode::Index(position) => node.with_value(*position),
            ExpressionNode::Literal(value) => node.with_value(value.clone()),
            ExpressionNode::SubExpression(children)
            | ExpressionNode::IndexExpression(children)
            | ExpressionNode::Pipe(children)
            | ExpressionNode::MultiSelectList(children) => {
                node.with_children(children.iter().map(ExpressionNode::to_raw).collect())
            }
            ExpressionNode::OrExpression { left, right } => {
                node.with_children(vec![left.to_raw(), right.to_raw()])
            }
            ExpressionNode::Flatten(child) | ExpressionNode::ExpRef(child) => {
                node.with_children(vec![child.to_raw()])
            }
            ExpressionNode::Projection { base, projection }
            | ExpressionNode::ValueProjection { base, projection } => {
                node.with_children(vec![base.to_raw(), projection.to_raw()])
            }
            ExpressionNode::FilterProjection {
                base,
                projection,
                predicate,
            } => node.with_children(vec![base.to_raw(), projection.to_raw(), predicate.to_raw()]),
            ExpressionNode::MultiSelectDict(pairs) => node.with_children(
                pairs
                    .iter()
                    .map(|pair| {
                        RawNode::new(NodeKind::KeyValPair.as_str())
                            .with_value(pair.key.as_str())
                            .with_children(vec![pair.value.to_raw()])
                    })
                    .collect(),
            ),
            ExpressionNode::Comparator { op, left, right } => node
                .with_value(op.as_str())
                .with_children(vec![left.to_raw(), right.to_raw()]),
            ExpressionNode::FunctionExpression { name, args } => node
                .with_value(name.as_str())
                .with_children(args.iter().map(ExpressionNode::to_raw).collect()),
        }
    }

    /// Convert back to tagged JSON
    pub fn to_json(&self) -> Value {
        // RawNode only holds strings, numbers and JSON values
        serde_json::to_value(self.to_raw()).unwrap_or(Value::Null)
    }
}

impl TryFrom<RawNode> for ExpressionNode {
    type Error = EvaluationError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let kind = NodeKind::from_tag(&raw.node_type).ok_or_else(|| {
            log::debug!("rejecting tree with unknown node tag '{}'", raw.node_type);
            EvaluationError::invalid_node(&raw.node_type, "unknown node type")
        })?;
        let RawNode {
            value, children, ..
        } = raw;
        let loader = NodeLoader { kind, value };

        Ok(match kind {
            NodeKind::Identity => {
                loader.expect_children(&children, 0)?;
                ExpressionNode::Identity
            }
            NodeKind::Current => {
                loader.expect_children(&children, 0)?;
                ExpressionNode::Current
            }
            NodeKind::Field => {
                loader.expect_children(&children, 0)?;
                ExpressionNode::Field(loader.string_payload()?)
            }
            NodeKind::Index => {
                loader.expect_children(&children, 0)?;
                ExpressionNode::Index(loader.integer_payload()?)
            }
            NodeKind::Literal => {
                loader.expect_children(&children, 0)?;
                ExpressionNode::Literal(loader.literal_payload())
            }
            NodeKind::SubExpression => {
                ExpressionNode::SubExpression(loader.chain(children)?)
            }
            NodeKind::IndexExpression => {
                ExpressionNode::IndexExpression(loader.chain(children)?)
            }
            NodeKind::Pipe => ExpressionNode::Pipe(loader.chain(children)?),
            NodeKind::OrExpression => {
                let [left, right] = loader.fixed::<2>(children)?;
                ExpressionNode::OrExpression {
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }
            NodeKind::Flatten => {
                let [child] = loader.fixed::<1>(children)?;
                ExpressionNode::Flatten(Box::new(child))
            }
            NodeKind::Projection => {
                let [base, projection] = loader.fixed::<2>(children)?;
                ExpressionNode::Projection {
                    base: Box::new(base),
                    projection: Box::new(projection),
                }
            }
            NodeKind::FilterProjection => {
                let [base, projection, predicate] = loader.fixed::<3>(children)?;
                ExpressionNode::FilterProjection {
                    base: Box::new(base),
                    projection: Box::new(projection),
                    predicate: Box::new(predicate),
                }
            }
            NodeKind::ValueProjection => {
                let [base, projection] = loader.fixed::<2>(children)?;
                ExpressionNode::ValueProjection {
                    base: Box::new(base),
                    projection: Box::new(projection),
                }
            }
            NodeKind::MultiSelectList => ExpressionNode::MultiSelectList(
                children
                    .into_iter()
                    .map(ExpressionNode::try_from)
                    .collect::<EvaluationResult<_>>()?,
            ),
            NodeKind::MultiSelectDict => ExpressionNode::MultiSelectDict(
                children
                    .into_iter()
                    .map(load_key_value_pair)
                    .collect::<EvaluationResult<_>>()?,
            ),
            NodeKind::KeyValPair => {
                return Err(EvaluationError::invalid_node(
                    kind.as_str(),
                    "key_val_pair is only valid as a child of multi_select_dict",
                ));
            }
            NodeKind::Comparator => {
                let name = loader.string_payload()?;
                let op = name
                    .parse::<Comparator>()
                    .map_err(|e| EvaluationError::invalid_node(kind.as_str(), e.to_string()))?;
                let [left, right] = loader.fixed::<2>(children)?;
                ExpressionNode::Comparator {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }
            NodeKind::ExpRef => {
                let [child] = loader.fixed::<1>(children)?;
                ExpressionNode::ExpRef(Box::new(child))
            }
            NodeKind::FunctionExpression => ExpressionNode::FunctionExpression {
                name: loader.string_payload()?,
                args: children
                    .into_iter()
                    .map(ExpressionNode::try_from)
                    .collect::<EvaluationResult<_>>()?,
            },
        })
    }
}

fn load_key_value_pair(raw: RawNode) -> EvaluationResult<KeyValuePair> {
    if NodeKind::from_tag(&raw.node_type) != Some(NodeKind::KeyValPair) {
        return Err(EvaluationError::invalid_node(
            NodeKind::MultiSelectDict.as_str(),
            format!("expected key_val_pair child, found '{}'", raw.node_type),
        ));
    }
    let loader = NodeLoader {
        kind: NodeKind::KeyValPair,
        value: raw.value,
    };
    let key = loader.string_payload()?;
    let [value] = loader.fixed::<1>(raw.children)?;
    Ok(KeyValuePair { key, value })
}

struct NodeLoader {
    kind: NodeKind,
    value: Option<Value>,
}

impl NodeLoader {
    fn error(&self, reason: impl Into<String>) -> EvaluationError {
        EvaluationError::invalid_node(self.kind.as_str(), reason)
    }

    fn expect_children(&self, children: &[RawNode], expected: usize) -> EvaluationResult<()> {
        if children.len() != expected {
            return Err(self.error(format!(
                "expected {expected} children, found {}",
                children.len()
            )));
        }
        Ok(())
    }

    fn fixed<const N: usize>(&self, children: Vec<RawNode>) -> EvaluationResult<[ExpressionNode; N]> {
        self.expect_children(&children, N)?;
        let nodes = children
            .into_iter()
            .map(ExpressionNode::try_from)
            .collect::<EvaluationResult<Vec<_>>>()?;
        nodes
            .try_into()
            .map_err(|_| self.error(format!("expected {N} children")))
    }

    fn chain(&self, children: Vec<RawNode>) -> EvaluationResult<Vec<ExpressionNode>> {
        if children.is_empty() {
            return Err(self.error("expected at least one child"));
        }
        children.into_iter().map(ExpressionNode::try_from).collect()
    }

    // `"value": null` deserializes to `None`
    fn literal_payload(&self) -> Value {
        self.value.clone().unwrap_or(Value::Null)
    }

    fn string_payload(&self) -> EvaluationResult<String> {
        match &self.value {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(self.error(format!("expected string value, found {other}"))),
            None => Err(self.error("missing value")),
        }
    }

    fn integer_payload(&self) -> EvaluationResult<i64> {
        match &self.value {
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| self.error(format!("expected integer value, found {n}"))),
            Some(other) => Err(self.error(format!("expected integer value, found {other}"))),
            None => Err(self.error("missing value")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{comparator, field, filter_projection, literal, multi_select_dict};
    use serde_json::json;

    #[test]
    fn test_load_field() {
        let node = ExpressionNode::from_json(&json!({"type": "field", "value": "a"})).unwrap();
        assert_eq!(node, field("a"));
    }

    #[test]
    fn test_unknown_tag_is_invalid_node() {
        let err = ExpressionNode::from_json(&json!({"type": "slice", "children": []})).unwrap_err();
        assert!(matches!(err, EvaluationError::InvalidNode { ref tag, .. } if tag == "slice"));
    }

    #[test]
    fn test_wrong_arity_is_invalid_node() {
        let tree = json!({"type": "flatten", "children": []});
        let err = ExpressionNode::from_json(&tree).unwrap_err();
        assert!(matches!(err, EvaluationError::InvalidNode { ref tag, .. } if tag == "flatten"));
    }

    #[test]
    fn test_index_payload_must_be_integer() {
        let tree = json!({"type": "index", "value": "0"});
        assert!(matches!(
            ExpressionNode::from_json(&tree),
            Err(EvaluationError::InvalidNode { .. })
        ));
    }

    #[test]
    fn test_dict_children_must_be_pairs() {
        let tree = json!({
            "type": "multi_select_dict",
            "children": [{"type": "field", "value": "a"}]
        });
        assert!(matches!(
            ExpressionNode::from_json(&tree),
            Err(EvaluationError::InvalidNode { .. })
        ));
    }

    #[test]
    fn test_bare_key_val_pair_rejected() {
        let tree = json!({
            "type": "key_val_pair",
            "value": "k",
            "children": [{"type": "field", "value": "a"}]
        });
        assert!(ExpressionNode::from_json(&tree).is_err());
    }

    #[test]
    fn test_not_json_is_decode_error() {
        assert!(matches!(
            ExpressionNode::from_json_str("{type: field"),
            Err(EvaluationError::TreeDecode(_))
        ));
    }

    #[test]
    fn test_to_json_reloads_to_same_tree() {
        let tree = filter_projection(
            field("people"),
            multi_select_dict([("who", field("name"))]),
            comparator(Comparator::Lte, field("age"), literal(json!(30))),
        );
        let reloaded = ExpressionNode::from_json(&tree.to_json()).unwrap();
        assert_eq!(reloaded, tree);
    }
}
