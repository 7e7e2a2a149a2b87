//! Expression tree node definitions

use serde_json::Value;

use super::kind::NodeKind;
use super::operator::Comparator;

/// A node of an immutable JMESPath expression tree.
///
/// Every variant carries exactly the payload and children its tag needs, so an
/// `ExpressionNode` value is always structurally well formed. Trees that
/// arrive from outside the process go through [`ExpressionNode::try_from`]
/// (see [`crate::ast::raw`]), which is where malformed input is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionNode {
    /// `@` at the top of an expression: returns the current value.
    Identity,
    /// `@` inside an expression: returns the current value.
    Current,
    /// Object key lookup (`foo`).
    Field(String),
    /// List element lookup (`[1]`, `[-1]`).
    Index(i64),
    /// A literal JSON value (`` `[1, 2]` ``, `'raw'`).
    Literal(Value),
    /// `a.b.c`: children chained left to right.
    SubExpression(Vec<ExpressionNode>),
    /// `a[0]`: children chained left to right.
    IndexExpression(Vec<ExpressionNode>),
    /// `a | b`: children chained left to right.
    Pipe(Vec<ExpressionNode>),
    /// `a || b`
    OrExpression {
        /// Evaluated first
        left: Box<ExpressionNode>,
        /// Evaluated only when `left` is falsy
        right: Box<ExpressionNode>,
    },
    /// `a[]`
    Flatten(Box<ExpressionNode>),
    /// `a[*].b`
    Projection {
        /// Produces the list being projected
        base: Box<ExpressionNode>,
        /// Applied to each element
        projection: Box<ExpressionNode>,
    },
    /// `a[?cond].b`
    FilterProjection {
        /// Produces the list being filtered
        base: Box<ExpressionNode>,
        /// Applied to each element that passed the predicate
        projection: Box<ExpressionNode>,
        /// Evaluated against each element
        predicate: Box<ExpressionNode>,
    },
    /// `a.*.b`
    ValueProjection {
        /// Produces the object whose values are projected
        base: Box<ExpressionNode>,
        /// Applied to each value
        projection: Box<ExpressionNode>,
    },
    /// `[a, b]`
    MultiSelectList(Vec<ExpressionNode>),
    /// `{x: a, y: b}`
    MultiSelectDict(Vec<KeyValuePair>),
    /// `a < b`, `a == b`, ...
    Comparator {
        /// Comparison to apply
        op: Comparator,
        /// Left operand
        left: Box<ExpressionNode>,
        /// Right operand
        right: Box<ExpressionNode>,
    },
    /// `&expr`: an unevaluated expression handed to a function.
    ///
    /// Only captured when it is a direct argument of a
    /// [`FunctionExpression`](ExpressionNode::FunctionExpression). Anywhere
    /// else, including nested inside a pipe or sub-expression argument, it
    /// evaluates to `null`.
    ExpRef(Box<ExpressionNode>),
    /// `name(arg, ...)`
    FunctionExpression {
        /// Function name as registered in the function registry
        name: String,
        /// Argument expressions
        args: Vec<ExpressionNode>,
    },
}

/// One `key: expression` entry of a multi-select dict.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValuePair {
    /// Output key
    pub key: String,
    /// Expression producing the value
    pub value: ExpressionNode,
}

impl KeyValuePair {
    /// Create a new key/value pair
    pub fn new(key: impl Into<String>, value: ExpressionNode) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

impl ExpressionNode {
    /// The tag of this node
    pub fn kind(&self) -> NodeKind {
        match self {
            ExpressionNode::Identity => NodeKind::Identity,
            ExpressionNode::Current => NodeKind::Current,
            ExpressionNode::Field(_) => NodeKind::Field,
            ExpressionNode::Index(_) => NodeKind::Index,
            ExpressionNode::Literal(_) => NodeKind::Literal,
            ExpressionNode::SubExpression(_) => NodeKind::SubExpression,
            ExpressionNode::IndexExpression(_) => NodeKind::IndexExpression,
            ExpressionNode::Pipe(_) => NodeKind::Pipe,
            ExpressionNode::OrExpression { .. } => NodeKind::OrExpression,
            ExpressionNode::Flatten(_) => NodeKind::Flatten,
            ExpressionNode::Projection { .. } => NodeKind::Projection,
            ExpressionNode::FilterProjection { .. } => NodeKind::FilterProjection,
            ExpressionNode::ValueProjection { .. } => NodeKind::ValueProjection,
            ExpressionNode::MultiSelectList(_) => NodeKind::MultiSelectList,
            ExpressionNode::MultiSelectDict(_) => NodeKind::MultiSelectDict,
            ExpressionNode::Comparator { .. } => NodeKind::Comparator,
            ExpressionNode::ExpRef(_) => NodeKind::ExpRef,
            ExpressionNode::FunctionExpression { .. } => NodeKind::FunctionExpression,
        }
    }

    /// Number of nodes in this tree, counting key/value pairs as nodes
    pub fn node_count(&self) -> usize {
        1 + match self {
            ExpressionNode::Identity
            | ExpressionNode::Current
            | ExpressionNode::Field(_)
            | ExpressionNode::Index(_)
            | ExpressionNode::Literal(_) => 0,
            ExpressionNode::SubExpression(children)
            | ExpressionNode::IndexExpression(children)
            | ExpressionNode::Pipe(children)
            | ExpressionNode::MultiSelectList(children)
            | ExpressionNode::FunctionExpression { args: children, .. } => {
                children.iter().map(ExpressionNode::node_count).sum()
            }
            ExpressionNode::MultiSelectDict(pairs) => {
                pairs.iter().map(|pair| 1 + pair.value.node_count()).sum()
            }
            ExpressionNode::OrExpression { left, right }
            | ExpressionNode::Comparator { left, right, .. } => {
                left.node_count() + right.node_count()
            }
            ExpressionNode::Projection { base, projection }
            | ExpressionNode::ValueProjection { base, projection } => {
                base.node_count() + projection.node_count()
            }
            ExpressionNode::FilterProjection {
                base,
                projection,
                predicate,
            } => base.node_count() + projection.node_count() + predicate.node_count(),
            ExpressionNode::Flatten(child) | ExpressionNode::ExpRef(child) => child.node_count(),
        }
    }
}

// Builders used by host code that assembles trees without a parser.

/// `@`
pub fn identity() -> ExpressionNode {
    ExpressionNode::Identity
}

/// `@` in a nested position
pub fn current() -> ExpressionNode {
    ExpressionNode::Current
}

/// Key lookup
pub fn field(name: impl Into<String>) -> ExpressionNode {
    ExpressionNode::Field(name.into())
}

/// List index lookup
pub fn index(position: i64) -> ExpressionNode {
    ExpressionNode::Index(position)
}

/// Literal value
pub fn literal(value: impl Into<Value>) -> ExpressionNode {
    ExpressionNode::Literal(value.into())
}

/// `a.b.c`
pub fn sub_expression(children: impl IntoIterator<Item = ExpressionNode>) -> ExpressionNode {
    ExpressionNode::SubExpression(children.into_iter().collect())
}

/// `a[0]`
pub fn index_expression(children: impl IntoIterator<Item = ExpressionNode>) -> ExpressionNode {
    ExpressionNode::IndexExpression(children.into_iter().collect())
}

/// `a | b`
pub fn pipe(children: impl IntoIterator<Item = ExpressionNode>) -> ExpressionNode {
    ExpressionNode::Pipe(children.into_iter().collect())
}

/// `left || right`
pub fn or_expression(left: ExpressionNode, right: ExpressionNode) -> ExpressionNode {
    ExpressionNode::OrExpression {
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// `child[]`
pub fn flatten(child: ExpressionNode) -> ExpressionNode {
    ExpressionNode::Flatten(Box::new(child))
}

/// `base[*].projection`
pub fn projection(base: ExpressionNode, projection: ExpressionNode) -> ExpressionNode {
    ExpressionNode::Projection {
        base: Box::new(base),
        projection: Box::new(projection),
    }
}

/// `base[?predicate].projection`
pub fn filter_projection(
    base: ExpressionNode,
    projection: ExpressionNode,
    predicate: ExpressionNode,
) -> ExpressionNode {
    ExpressionNode::FilterProjection {
        base: Box::new(base),
        projection: Box::new(projection),
        predicate: Box::new(predicate),
    }
}

/// `base.*.projection`
pub fn value_projection(base: ExpressionNode, projection: ExpressionNode) -> ExpressionNode {
    ExpressionNode::ValueProjection {
        base: Box::new(base),
        projection: Box::new(projection),
    }
}

/// `[a, b, ...]`
pub fn multi_select_list(children: impl IntoIterator<Item = ExpressionNode>) -> ExpressionNode {
    ExpressionNode::MultiSelectList(children.into_iter().collect())
}

/// `{key: expr, ...}`
pub fn multi_select_dict<K: Into<String>>(
    pairs: impl IntoIterator<Item = (K, ExpressionNode)>,
) -> ExpressionNode {
    ExpressionNode::MultiSelectDict(
        pairs
            .into_iter()
            .map(|(key, value)| KeyValuePair::new(key, value))
            .collect(),
    )
}

/// `left <op> right`
pub fn comparator(op: Comparator, left: ExpressionNode, right: ExpressionNode) -> ExpressionNode {
    ExpressionNode::Comparator {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// `&child`, meaningful only as a direct function argument
pub fn expref(child: ExpressionNode) -> ExpressionNode {
    ExpressionNode::ExpRef(Box::new(child))
}

/// `name(args...)`
pub fn function(
    name: impl Into<String>,
    args: impl IntoIterator<Item = ExpressionNode>,
) -> ExpressionNode {
    ExpressionNode::FunctionExpression {
        name: name.into(),
        args: args.into_iter().collect(),
    }
}
