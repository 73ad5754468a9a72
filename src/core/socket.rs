//! Socket system for block connections
//!
//! A socket is one connection point on a block kind: an inline field, a typed
//! value input that accepts another block's output, or a statement input that
//! holds a chain of statement blocks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type a block exposes when plugged into a value input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputType {
    /// Numeric expression
    Number,
    /// String-like expression (addresses, bytes, identifiers)
    String,
    /// Boolean expression
    Boolean,
    /// Array or mapping
    Array,
    /// Void; the block produces no value
    None,
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputType::Number => "Number",
            OutputType::String => "String",
            OutputType::Boolean => "Boolean",
            OutputType::Array => "Array",
            OutputType::None => "None",
        };
        f.write_str(name)
    }
}

/// Inline field flavours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text input
    Text {
        #[serde(default)]
        default: String,
    },
    /// Numeric input
    Number {
        #[serde(default)]
        default: f64,
    },
    /// Dropdown; options are `(label, value)` pairs and the first is the default
    Dropdown { options: Vec<(String, String)> },
}

/// What a socket connects to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "socket", rename_all = "snake_case")]
pub enum SocketKind {
    /// Inline scalar value
    Field(FieldKind),
    /// Typed value input. An empty `accepts` list accepts any non-void output.
    ValueInput {
        #[serde(default)]
        accepts: Vec<OutputType>,
    },
    /// Body made of a statement chain
    StatementInput,
}

/// Socket definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Socket {
    /// Socket name, unique within its kind (e.g. `NAME`, `BODY`)
    pub name: String,
    /// Socket shape
    #[serde(flatten)]
    pub kind: SocketKind,
}

impl Socket {
    pub fn text(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SocketKind::Field(FieldKind::Text {
                default: default.into(),
            }),
        }
    }

    pub fn number(name: impl Into<String>, default: f64) -> Self {
        Self {
            name: name.into(),
            kind: SocketKind::Field(FieldKind::Number { default }),
        }
    }

    /// Dropdown whose labels equal their values
    pub fn dropdown(name: impl Into<String>, options: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind: SocketKind::Field(FieldKind::Dropdown {
                options: options
                    .iter()
                    .map(|o| (o.to_string(), o.to_string()))
                    .collect(),
            }),
        }
    }

    /// Dropdown with distinct labels and values
    pub fn dropdown_labeled(name: impl Into<String>, options: &[(&str, &str)]) -> Self {
        Self {
            name: name.into(),
            kind: SocketKind::Field(FieldKind::Dropdown {
                options: options
                    .iter()
                    .map(|(label, value)| (label.to_string(), value.to_string()))
                    .collect(),
            }),
        }
    }

    pub fn value(name: impl Into<String>, accepts: &[OutputType]) -> Self {
        Self {
            name: name.into(),
            kind: SocketKind::ValueInput {
                accepts: accepts.to_vec(),
            },
        }
    }

    pub fn statement(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SocketKind::StatementInput,
        }
    }

    pub fn is_field(&self) -> bool {
        matches!(self.kind, SocketKind::Field(_))
    }

    pub fn is_value_input(&self) -> bool {
        matches!(self.kind, SocketKind::ValueInput { .. })
    }

    pub fn is_statement_input(&self) -> bool {
        matches!(self.kind, SocketKind::StatementInput)
    }

    /// Whether a producer with the given output type may plug into this socket.
    ///
    /// Only value inputs accept producers, and void producers are never accepted.
    pub fn accepts(&self, output: OutputType) -> bool {
        match &self.kind {
            SocketKind::ValueInput { accepts } => {
                output != OutputType::None && (accepts.is_empty() || accepts.contains(&output))
            }
            _ => false,
        }
    }
}
