//! Comparator operators

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Comparison applied by a `comparator` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparator {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    #[serde(alias = "le")]
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,
}

impl Comparator {
    /// Canonical tree name of the comparator
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Eq => "eq",
            Comparator::Ne => "ne",
            Comparator::Lt => "lt",
            Comparator::Lte => "lte",
            Comparator::Gt => "gt",
            Comparator::Gte => "gte",
        }
    }

    /// Expression-language symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::Eq => "==",
            Comparator::Ne => "!=",
            Comparator::Lt => "<",
            Comparator::Lte => "<=",
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
        }
    }

    /// True for `lt`, `lte`, `gt` and `gte`
    pub fn is_ordering(&self) -> bool {
        !matches!(self, Comparator::Eq | Comparator::Ne)
    }
}

/// Error returned when a comparator name is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownComparator(pub String);

impl fmt::Display for UnknownComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown comparator '{}'", self.0)
    }
}

impl std::error::Error for UnknownComparator {}

impl FromStr for Comparator {
    type Err = UnknownComparator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Comparator::Eq),
            "ne" => Ok(Comparator::Ne),
            "lt" => Ok(Comparator::Lt),
            "lte" | "le" => Ok(Comparator::Lte),
            "gt" => Ok(Comparator::Gt),
            "gte" => Ok(Comparator::Gte),
            other => Err(UnknownComparator(other.to_string())),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
