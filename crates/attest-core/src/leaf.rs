//! # Leaf Kinds and Stringification
//!
//! A leaf is a scalar at the bottom of a document tree. Only three scalar
//! kinds can be committed to; `null` has no content and is never a leaf.
//!
//! The committed text of a leaf is its stringified value: strings verbatim,
//! numbers in their JSON rendering, booleans as `true`/`false`. Because
//! `"true"` and `true` stringify identically, the kind is recorded next to
//! every salt and checked on verification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::UnknownLeafKind;

/// The scalar type of a document leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafKind {
    /// A JSON string.
    String,
    /// A JSON number (integer or float).
    Number,
    /// A JSON boolean.
    Boolean,
}

impl LeafKind {
    /// Classify a value; returns `None` for null and containers.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::String(_) => Some(Self::String),
            Value::Number(_) => Some(Self::Number),
            Value::Bool(_) => Some(Self::Boolean),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Returns the tag string used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    /// Rebuild a typed value from its stringified text.
    ///
    /// Returns `None` if the text is not a valid rendering for this kind.
    pub fn parse_value(&self, text: &str) -> Option<Value> {
        match self {
            Self::String => Some(Value::String(text.to_string())),
            Self::Number => serde_json::from_str::<Number>(text).ok().map(Value::Number),
            Self::Boolean => match text {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
        }
    }
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeafKind {
    type Err = UnknownLeafKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            other => Err(UnknownLeafKind(other.to_string())),
        }
    }
}

/// Stringify a scalar leaf; `None` for null and containers.
pub fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Describe a value's JSON type for error messages.
pub fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify_scalars() {
        assert_eq!(LeafKind::of(&json!("a")), Some(LeafKind::String));
        assert_eq!(LeafKind::of(&json!(3.5)), Some(LeafKind::Number));
        assert_eq!(LeafKind::of(&json!(false)), Some(LeafKind::Boolean));
        assert_eq!(LeafKind::of(&Value::Null), None);
        assert_eq!(LeafKind::of(&json!([1])), None);
    }

    #[test]
    fn stringify_matches_json_rendering() {
        assert_eq!(stringify(&json!("value1")).as_deref(), Some("value1"));
        assert_eq!(stringify(&json!(42)).as_deref(), Some("42"));
        assert_eq!(stringify(&json!(3.14159)).as_deref(), Some("3.14159"));
        assert_eq!(stringify(&json!(true)).as_deref(), Some("true"));
        assert_eq!(stringify(&Value::Null), None);
    }

    #[test]
    fn parse_value_inverts_stringify() {
        for v in [json!("x:y"), json!(-7), json!(2.5), json!(true)] {
            let kind = LeafKind::of(&v).unwrap();
            let text = stringify(&v).unwrap();
            assert_eq!(kind.parse_value(&text), Some(v));
        }
    }

    #[test]
    fn parse_value_rejects_mismatched_text() {
        assert_eq!(LeafKind::Number.parse_value("abc"), None);
        assert_eq!(LeafKind::Boolean.parse_value("yes"), None);
    }

    #[test]
    fn kind_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&LeafKind::Boolean).unwrap(), r#""boolean""#);
        let back: LeafKind = serde_json::from_str(r#""number""#).unwrap();
        assert_eq!(back, LeafKind::Number);
        assert_eq!("string".parse::<LeafKind>(), Ok(LeafKind::String));
        assert_eq!(
            "null".parse::<LeafKind>(),
            Err(UnknownLeafKind("null".to_string()))
        );
    }
}
