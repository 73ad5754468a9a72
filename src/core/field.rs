//! Field values held by block instances
//!
//! Fields are the inline scalars of a block (names, sizes, dropdown choices).
//! Values are stored untyped-ish and rendered to text at emission time.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::socket::FieldKind;

/// Scalar value of one field socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Integer number
    Integer(i64),
    /// Floating point number
    Number(f64),
    /// Free text
    Text(String),
    /// Selected dropdown value
    Enum(EnumTag),
}

/// Dropdown selection, kept distinct from free text for persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumTag {
    pub tag: String,
}

impl FieldValue {
    pub fn enum_tag(tag: impl Into<String>) -> Self {
        FieldValue::Enum(EnumTag { tag: tag.into() })
    }

    /// Default value for a freshly placed block
    pub fn default_for(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Text { default } => FieldValue::Text(default.clone()),
            FieldKind::Number { default } => FieldValue::Number(*default),
            FieldKind::Dropdown { options } => FieldValue::enum_tag(
                options
                    .first()
                    .map(|(_, value)| value.clone())
                    .unwrap_or_default(),
            ),
        }
    }

    /// Try to view as text (free text or dropdown tag)
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Enum(e) => Some(&e.tag),
            _ => None,
        }
    }

    /// Try to convert to number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Enum(_) => None,
        }
    }

    /// Whether this value fits the given field kind
    pub fn fits(&self, kind: &FieldKind) -> bool {
        match (kind, self) {
            (FieldKind::Text { .. }, FieldValue::Text(_)) => true,
            (FieldKind::Number { .. }, FieldValue::Number(_) | FieldValue::Integer(_)) => true,
            (FieldKind::Dropdown { options }, value) => match value.as_str() {
                Some(tag) => options.iter().any(|(_, v)| v == tag),
                None => false,
            },
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(i) => write!(f, "{}", i),
            // f64 Display never uses exponent notation; Solidity has no
            // non-finite literals and `-0` reads as a unary minus
            FieldValue::Number(n) if !n.is_finite() || *n == 0.0 => f.write_str("0"),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Enum(e) => f.write_str(&e.tag),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}
