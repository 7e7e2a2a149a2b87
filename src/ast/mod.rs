//! Expression tree definitions
//!
//! The evaluator consumes trees built either directly with the builder
//! functions re-exported here, or loaded from tagged JSON through [`raw`].

#![warn(missing_docs)]

mod expression;
mod kind;
mod operator;
pub mod raw;

pub use expression::*;
pub use kind::NodeKind;
pub use operator::{Comparator, UnknownComparator};
pub use raw::RawNode;
