//! Typed runtime values and their text conversion.

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur when converting text into a typed value.
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("invalid integer value: {0}")]
    InvalidInteger(#[from] std::num::ParseIntError),

    #[error("invalid float value: {0}")]
    InvalidFloat(#[from] std::num::ParseFloatError),

    /// Never produced; string conversion is total.
    #[error("invalid string value")]
    InvalidString,

    #[error("invalid boolean value '{0}': expected 'true' or 'false'")]
    InvalidBoolean(String),

    #[error("array values cannot be parsed from text")]
    UnsupportedArray,

    #[error("object values cannot be parsed from text")]
    UnsupportedObject,
}

/// The type of value an argument accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit float.
    Float,
    /// Any string value (the default).
    #[default]
    String,
    /// Strict "true" or "false" only.
    Boolean,
    /// Sequence of values. Not constructible from text.
    Array,
    /// Name-keyed mapping of values. Not constructible from text.
    Object,
}

/// A parsed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Array(Vec<Value>),
    Object(HashMap<String, Value>),
}

impl Value {
    /// Convert raw text into a value of the requested kind.
    ///
    /// String conversion always succeeds and takes the text verbatim.
    /// Array and object conversion always fails: there is no text syntax
    /// for container values.
    pub fn parse(kind: ValueKind, text: &str) -> Result<Value, ValueError> {
        match kind {
            ValueKind::Integer => Ok(Value::Integer(text.parse::<i64>()?)),
            ValueKind::Float => Ok(Value::Float(text.parse::<f64>()?)),
            ValueKind::String => Ok(Value::String(text.to_string())),
            ValueKind::Boolean => match text {
                "true" => Ok(Value::Boolean(true)),
                "false" => Ok(Value::Boolean(false)),
                other => Err(ValueError::InvalidBoolean(other.to_string())),
            },
            ValueKind::Array => Err(ValueError::UnsupportedArray),
            ValueKind::Object => Err(ValueError::UnsupportedObject),
        }
    }

    /// The kind tag matching this value's active variant.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The element sequence, for array values only.
    pub fn items(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a field by name, for object values only.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields.get(key),
            _ => None,
        }
    }
}
