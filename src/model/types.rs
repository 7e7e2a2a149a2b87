//! Type system definitions for document values

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Type information for values flowing through the evaluator.
///
/// Used by function signatures to describe what each parameter accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeInfo {
    /// Any value, including expression references
    Any,
    /// `null`
    Null,
    /// `true` / `false`
    Boolean,
    /// Integer or floating point number
    Number,
    /// String value
    String,
    /// Array with arbitrary elements
    Array,
    /// Object (map from string keys to values)
    Object,
    /// Expression reference created by `&expr`
    Expref,
    /// Array whose elements all have the given type
    ArrayOf(Box<TypeInfo>),
    /// Any one of the listed types
    Union(Vec<TypeInfo>),
}

impl TypeInfo {
    /// The type of a concrete document value
    pub fn of(value: &Value) -> TypeInfo {
        match value {
            Value::Null => TypeInfo::Null,
            Value::Bool(_) => TypeInfo::Boolean,
            Value::Number(_) => TypeInfo::Number,
            Value::String(_) => TypeInfo::String,
            Value::Array(_) => TypeInfo::Array,
            Value::Object(_) => TypeInfo::Object,
        }
    }

    /// Shorthand for `ArrayOf(element)`
    pub fn array_of(element: TypeInfo) -> TypeInfo {
        TypeInfo::ArrayOf(Box::new(element))
    }

    /// Check whether a document value conforms to this type
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            TypeInfo::Any => true,
            TypeInfo::Expref => false,
            TypeInfo::ArrayOf(element) => match value {
                Value::Array(items) => items.iter().all(|item| element.accepts(item)),
                _ => false,
            },
            TypeInfo::Union(types) => types.iter().any(|t| t.accepts(value)),
            other => *other == TypeInfo::of(value),
        }
    }

    /// Check whether this type admits expression references
    pub fn accepts_expref(&self) -> bool {
        match self {
            TypeInfo::Any | TypeInfo::Expref => true,
            TypeInfo::Union(types) => types.iter().any(TypeInfo::accepts_expref),
            _ => false,
        }
    }

    /// Name of the type as reported by the `type()` function
    pub fn type_name(&self) -> String {
        match self {
            TypeInfo::Any => "any".to_string(),
            TypeInfo::Null => "null".to_string(),
            TypeInfo::Boolean => "boolean".to_string(),
            TypeInfo::Number => "number".to_string(),
            TypeInfo::String => "string".to_string(),
            TypeInfo::Array => "array".to_string(),
            TypeInfo::Object => "object".to_string(),
            TypeInfo::Expref => "expref".to_string(),
            TypeInfo::ArrayOf(element) => format!("array[{}]", element.type_name()),
            TypeInfo::Union(types) => {
                let type_names: Vec<String> = types.iter().map(|t| t.type_name()).collect();
                type_names.join("|")
            }
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}
