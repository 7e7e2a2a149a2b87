//! Node tags and the tag resolution table

use std::fmt;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// Tag of an expression tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// `identity`
    Identity,
    /// `current`
    Current,
    /// `field`
    Field,
    /// `index`
    Index,
    /// `literal`
    Literal,
    /// `subexpression`
    SubExpression,
    /// `index_expression`
    IndexExpression,
    /// `pipe`
    Pipe,
    /// `or_expression`
    OrExpression,
    /// `flatten`
    Flatten,
    /// `projection`
    Projection,
    /// `filter_projection`
    FilterProjection,
    /// `value_projection`
    ValueProjection,
    /// `multi_select_list`
    MultiSelectList,
    /// `multi_select_dict`
    MultiSelectDict,
    /// `key_val_pair`
    KeyValPair,
    /// `comparator`
    Comparator,
    /// `expref`
    ExpRef,
    /// `function_expression`
    FunctionExpression,
}

impl NodeKind {
    /// Every tag, in declaration order
    pub const ALL: [NodeKind; 19] = [
        NodeKind::Identity,
        NodeKind::Current,
        NodeKind::Field,
        NodeKind::Index,
        NodeKind::Literal,
        NodeKind::SubExpression,
        NodeKind::IndexExpression,
        NodeKind::Pipe,
        NodeKind::OrExpression,
        NodeKind::Flatten,
        NodeKind::Projection,
        NodeKind::FilterProjection,
        NodeKind::ValueProjection,
        NodeKind::MultiSelectList,
        NodeKind::MultiSelectDict,
        NodeKind::KeyValPair,
        NodeKind::Comparator,
        NodeKind::ExpRef,
        NodeKind::FunctionExpression,
    ];

    /// The tag string used in serialized trees
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Identity => "identity",
            NodeKind::Current => "current",
            NodeKind::Field => "field",
            NodeKind::Index => "index",
            NodeKind::Literal => "literal",
            NodeKind::SubExpression => "subexpression",
            NodeKind::IndexExpression => "index_expression",
            NodeKind::Pipe => "pipe",
            NodeKind::OrExpression => "or_expression",
            NodeKind::Flatten => "flatten",
            NodeKind::Projection => "projection",
            NodeKind::FilterProjection => "filter_projection",
            NodeKind::ValueProjection => "value_projection",
            NodeKind::MultiSelectList => "multi_select_list",
            NodeKind::MultiSelectDict => "multi_select_dict",
            NodeKind::KeyValPair => "key_val_pair",
            NodeKind::Comparator => "comparator",
            NodeKind::ExpRef => "expref",
            NodeKind::FunctionExpression => "function_expression",
        }
    }

    /// Resolve a serialized tag. Returns `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<NodeKind> {
        TAG_TABLE.get(tag).copied()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Built once, read-only afterwards. `sub_expression` is an alias of
// `subexpression`.
static TAG_TABLE: Lazy<FxHashMap<&'static str, NodeKind>> = Lazy::new(|| {
    let mut table: FxHashMap<&'static str, NodeKind> = NodeKind::ALL
        .iter()
        .map(|kind| (kind.as_str(), *kind))
        .collect();
    table.insert("sub_expression", NodeKind::SubExpression);
    table
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tag_round_trips() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_tag(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_aliases_and_unknown_tags() {
        assert_eq!(
            NodeKind::from_tag("sub_expression"),
            Some(NodeKind::SubExpression)
        );
        assert_eq!(NodeKind::from_tag("slice"), None);
        assert_eq!(NodeKind::from_tag("Field"), None);
    }
}
