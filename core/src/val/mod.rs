//! Typed constant values produced from literal tokens.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{registry::StdType, scope::StructId};


/// Runtime type a `TypeRef` node resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeDescriptor {
    Std(StdType),
    Struct(StructId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstValue {
    Nil,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String {
        value: String,
        /// Bare word from a text-argument call (`ls -la`)
        #[serde(default)]
        is_text_argument: bool,
    },
    Type(TypeDescriptor),
}

impl ConstValue {
    pub fn string(value: impl Into<String>) -> Self {
        ConstValue::String {
            value: value.into(),
            is_text_argument: false,
        }
    }

    pub fn text_argument(value: impl Into<String>) -> Self {
        ConstValue::String {
            value: value.into(),
            is_text_argument: true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstValue::String { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ConstValue::Nil => "Nil",
            ConstValue::Boolean(_) => "Boolean",
            ConstValue::Integer(_) => "Integer",
            ConstValue::Float(_) => "Float",
            ConstValue::String { .. } => "String",
            ConstValue::Type(_) => "Type",
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Nil => write!(f, "nil"),
            ConstValue::Boolean(b) => write!(f, "{b}"),
            ConstValue::Integer(i) => write!(f, "{i}"),
            ConstValue::Float(x) if x.fract() == 0.0 && x.is_finite() => write!(f, "{x:.1}"),
            ConstValue::Float(x) => write!(f, "{x}"),
            ConstValue::String { value, .. } => write!(f, "{value}"),
            ConstValue::Type(TypeDescriptor::Std(ty)) => write!(f, "{}", ty.name),
            ConstValue::Type(TypeDescriptor::Struct(id)) => write!(f, "struct#{}", id.0),
        }
    }
}
