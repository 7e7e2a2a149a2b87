//! Comparator table

use std::cmp::Ordering;

use serde_json::Value;

use crate::ast::Comparator;
use crate::model::{compare_values, values_equal};

impl Comparator {
    /// Apply the comparison to two evaluated operands.
    ///
    /// `eq`/`ne` use type-aware equality. Ordering comparators return false
    /// when the operands are not mutually comparable.
    pub fn apply(&self, left: &Value, right: &Value) -> bool {
        match self {
            Comparator::Eq => values_equal(left, right),
            Comparator::Ne => !values_equal(left, right),
            Comparator::Lt => compare_values(left, right) == Some(Ordering::Less),
            Comparator::Lte => matches!(
                compare_values(left, right),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Comparator::Gt => compare_values(left, right) == Some(Ordering::Greater),
            Comparator::Gte => matches!(
                compare_values(left, right),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_eq_is_type_aware() {
        assert!(!Comparator::Eq.apply(&json!(true), &json!(1)));
        assert!(!Comparator::Eq.apply(&json!(false), &json!(0)));
        assert!(Comparator::Ne.apply(&json!(true), &json!(1)));
        assert!(Comparator::Eq.apply(&json!(1), &json!(1)));
        assert!(Comparator::Eq.apply(&json!(null), &json!(null)));
    }

    #[test]
    fn test_ordering_preserves_operand_order() {
        assert!(Comparator::Lt.apply(&json!(1), &json!(2)));
        assert!(!Comparator::Lt.apply(&json!(2), &json!(1)));
        assert!(Comparator::Gte.apply(&json!(2), &json!(2)));
        assert!(Comparator::Lte.apply(&json!("a"), &json!("b")));
    }

    #[test]
    fn test_incomparable_operands_are_false() {
        for op in [Comparator::Lt, Comparator::Lte, Comparator::Gt, Comparator::Gte] {
            assert!(!op.apply(&json!(1), &json!("1")));
            assert!(!op.apply(&json!(null), &json!(1)));
            assert!(!op.apply(&json!([1]), &json!([1])));
        }
    }
}
