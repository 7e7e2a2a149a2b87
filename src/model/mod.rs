//! Document value model
//!
//! Documents are plain [`serde_json::Value`]s. This module adds the pieces of
//! value semantics the evaluator needs on top: a type lattice for function
//! signatures, truthiness, type-aware equality and ordering.

pub mod types;
pub mod value;

pub use types::TypeInfo;
pub use value::{compare_values, is_falsy, is_filter_match, number_from_f64, values_equal};
