//! Block instances placed on the canvas

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::{BlockId, BlockKind, FieldValue};

/// Where an instance is plugged in.
///
/// This is the non-owning back-reference of the graph. It is used for
/// structural checks and detaching, never for traversal during generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "via", rename_all = "snake_case")]
pub enum Attachment {
    /// Producer for a value input
    Value { parent: BlockId, socket: String },
    /// First block of a statement body
    Statement { parent: BlockId, socket: String },
    /// Follows another statement
    Next { previous: BlockId },
}

impl Attachment {
    /// The block this instance hangs off
    pub fn owner(&self) -> BlockId {
        match self {
            Attachment::Value { parent, .. } | Attachment::Statement { parent, .. } => *parent,
            Attachment::Next { previous } => *previous,
        }
    }
}

fn enabled_default() -> bool {
    true
}

/// A concrete placed occurrence of a block kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockInstance {
    pub id: BlockId,
    /// Kind id; may name a kind the registry no longer knows
    pub kind: String,
    /// Field socket values
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    /// Value input name -> producer
    #[serde(default)]
    pub values: BTreeMap<String, BlockId>,
    /// Statement input name -> first block of the chain
    #[serde(default)]
    pub statements: BTreeMap<String, BlockId>,
    /// Next block in this instance's own chain
    #[serde(default)]
    pub next: Option<BlockId>,
    #[serde(default)]
    pub attachment: Option<Attachment>,
    /// Disabled blocks emit nothing
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

impl BlockInstance {
    /// Create an instance of `kind` with every field at its default value
    pub fn new(kind: &BlockKind) -> Self {
        let fields = kind
            .sockets
            .iter()
            .filter_map(|s| match &s.kind {
                crate::core::SocketKind::Field(field) => {
                    Some((s.name.clone(), FieldValue::default_for(field)))
                }
                _ => None,
            })
            .collect();

        Self {
            id: BlockId::new(),
            kind: kind.id.clone(),
            fields,
            values: BTreeMap::new(),
            statements: BTreeMap::new(),
            next: None,
            attachment: None,
            enabled: true,
        }
    }

    /// Field value by socket name
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Field rendered as text; missing fields render as the empty string
    pub fn field_text(&self, name: &str) -> String {
        self.fields
            .get(name)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    /// Producer connected to a value input
    pub fn value_input(&self, socket: &str) -> Option<BlockId> {
        self.values.get(socket).copied()
    }

    /// First block of a statement input
    pub fn statement_input(&self, socket: &str) -> Option<BlockId> {
        self.statements.get(socket).copied()
    }

    /// Every block directly owned by this one, in socket order then `next`
    pub fn children(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.values
            .values()
            .chain(self.statements.values())
            .chain(self.next.iter())
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Socket;

    #[test]
    fn new_instance_takes_field_defaults() {
        let kind = BlockKind::builder("solidity_uint")
            .socket(Socket::dropdown("SIZE", &["8", "256"]))
            .socket(Socket::text("NAME", "value"))
            .socket(Socket::value("INIT", &[]))
            .build();

        let instance = BlockInstance::new(&kind);
        assert_eq!(instance.field_text("SIZE"), "8");
        assert_eq!(instance.field_text("NAME"), "value");
        assert!(instance.field("INIT").is_none());
        assert!(instance.enabled);
    }

    #[test]
    fn missing_fields_render_empty() {
        let kind = BlockKind::builder("k").build();
        let instance = BlockInstance::new(&kind);
        assert_eq!(instance.field_text("NAME"), "");
    }
}
