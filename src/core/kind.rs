//! Block kinds
//!
//! A `BlockKind` is the immutable template behind every placed block: its id,
//! ordered sockets, optional output type and chain capabilities. Kinds are
//! owned by the [`KindRegistry`](super::registry::KindRegistry).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::socket::{OutputType, Socket, SocketKind};

/// Block categories, mirroring the editor toolbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockCategory {
    /// Variable declarations and references
    Variables,
    /// Typed declarations (`uint256 x`, mappings, arrays)
    DataTypes,
    /// Functions and modifiers
    Functions,
    /// Contracts, interfaces, structs, enums
    ContractStructure,
    /// Events and emits
    Events,
    /// Ether transfers and token templates
    EtherAndTokens,
    /// require / revert / assert / try
    ErrorHandling,
    /// Conditionals and loops
    ControlFlow,
    /// Literals, operators and builtin hashing
    MathAndLogic,
    /// Anything registered from outside the builtin catalogue
    Custom,
}

impl BlockCategory {
    /// Get a human-readable name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            BlockCategory::Variables => "Variables",
            BlockCategory::DataTypes => "Data Types",
            BlockCategory::Functions => "Functions",
            BlockCategory::ContractStructure => "Contract Structure",
            BlockCategory::Events => "Events & Logging",
            BlockCategory::EtherAndTokens => "Ether & Tokens",
            BlockCategory::ErrorHandling => "Error Handling",
            BlockCategory::ControlFlow => "Control Flow",
            BlockCategory::MathAndLogic => "Math & Logic",
            BlockCategory::Custom => "Custom",
        }
    }
}

impl fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

fn default_category() -> BlockCategory {
    BlockCategory::Custom
}

/// Block kind definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockKind {
    /// Kind identifier (e.g. `solidity_contract`)
    pub id: String,
    /// Ordered sockets
    #[serde(default)]
    pub sockets: Vec<Socket>,
    /// Output type when used as a value; `None` means the block cannot be
    /// plugged into a value input
    #[serde(default)]
    pub output: Option<OutputType>,
    /// Can follow another statement
    #[serde(default)]
    pub previous_statement: bool,
    /// Can be followed by another statement
    #[serde(default)]
    pub next_statement: bool,
    /// Toolbox category
    #[serde(default = "default_category")]
    pub category: BlockCategory,
    /// Render-only display template; ignored by the generator
    #[serde(default)]
    pub display: String,
    /// Hover text
    #[serde(default)]
    pub tooltip: String,
    /// Hue for the editor
    #[serde(default)]
    pub colour: u16,
}

impl BlockKind {
    /// Start building a kind with the given id
    pub fn builder(id: impl Into<String>) -> BlockKindBuilder {
        BlockKindBuilder::new(id)
    }

    /// Look up a socket by name
    pub fn socket(&self, name: &str) -> Option<&Socket> {
        self.sockets.iter().find(|s| s.name == name)
    }

    /// Whether this kind can be connected into a value input
    pub fn is_value(&self) -> bool {
        matches!(self.output, Some(t) if t != OutputType::None)
    }

    /// Whether this kind may sit in a statement body
    pub fn is_statement(&self) -> bool {
        self.previous_statement
    }

    /// Iterate over field sockets
    pub fn fields(&self) -> impl Iterator<Item = &Socket> {
        self.sockets.iter().filter(|s| s.is_field())
    }

    /// Check the definition is internally consistent.
    ///
    /// The id must be non-empty, socket names unique and non-empty, dropdowns
    /// non-empty, and a kind cannot both produce a value and chain as a statement.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Block kind id cannot be empty".into());
        }

        let mut seen = HashSet::new();
        for socket in &self.sockets {
            if socket.name.is_empty() {
                return Err(format!("Kind '{}' has a socket with an empty name", self.id));
            }
            if !seen.insert(socket.name.as_str()) {
                return Err(format!(
                    "Kind '{}' declares socket '{}' more than once",
                    self.id, socket.name
                ));
            }
            if let SocketKind::Field(super::socket::FieldKind::Dropdown { options }) = &socket.kind {
                if options.is_empty() {
                    return Err(format!(
                        "Dropdown '{}' on kind '{}' has no options",
                        socket.name, self.id
                    ));
                }
            }
        }

        if self.is_value() && (self.previous_statement || self.next_statement) {
            return Err(format!(
                "Kind '{}' cannot both output a value and chain as a statement",
                self.id
            ));
        }

        Ok(())
    }
}

/// Fluent builder for [`BlockKind`]
#[derive(Debug, Clone)]
pub struct BlockKindBuilder {
    kind: BlockKind,
}

impl BlockKindBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            kind: BlockKind {
                id: id.into(),
                sockets: Vec::new(),
                output: None,
                previous_statement: false,
                next_statement: false,
                category: BlockCategory::Custom,
                display: String::new(),
                tooltip: String::new(),
                colour: 0,
            },
        }
    }

    pub fn socket(mut self, socket: Socket) -> Self {
        self.kind.sockets.push(socket);
        self
    }

    pub fn output(mut self, output: OutputType) -> Self {
        self.kind.output = Some(output);
        self
    }

    /// Chainable statement: both previous and next connections
    pub fn statement(mut self) -> Self {
        self.kind.previous_statement = true;
        self.kind.next_statement = true;
        self
    }

    pub fn category(mut self, category: BlockCategory) -> Self {
        self.kind.category = category;
        self
    }

    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.kind.display = display.into();
        self
    }

    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.kind.tooltip = tooltip.into();
        self
    }

    pub fn colour(mut self, colour: u16) -> Self {
        self.kind.colour = colour;
        self
    }

    pub fn build(self) -> BlockKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_chain_flags() {
        let kind = BlockKind::builder("solidity_break").statement().build();
        assert!(kind.previous_statement);
        assert!(kind.next_statement);
        assert!(!kind.is_value());
        assert!(kind.validate().is_ok());
    }

    #[test]
    fn duplicate_socket_names_are_rejected() {
        let kind = BlockKind::builder("dup")
            .socket(Socket::text("NAME", "a"))
            .socket(Socket::text("NAME", "b"))
            .build();
        assert!(kind.validate().unwrap_err().contains("more than once"));
    }

    #[test]
    fn value_statement_hybrid_is_rejected() {
        let kind = BlockKind::builder("hybrid")
            .output(OutputType::Number)
            .statement()
            .build();
        assert!(kind.validate().is_err());
    }

    #[test]
    fn void_output_is_not_a_value() {
        let kind = BlockKind::builder("void").output(OutputType::None).build();
        assert!(!kind.is_value());
    }

    #[test]
    fn kind_definition_loads_from_json() {
        let json = r#"{
            "id": "my_kind",
            "sockets": [
                {"name": "NAME", "socket": "field", "type": "text", "default": "x"},
                {"name": "VALUE", "socket": "value_input", "accepts": ["Number"]},
                {"name": "BODY", "socket": "statement_input"}
            ],
            "previous_statement": true,
            "next_statement": true
        }"#;
        let kind: BlockKind = serde_json::from_str(json).unwrap();
        assert_eq!(kind.sockets.len(), 3);
        assert!(kind.socket("VALUE").unwrap().accepts(OutputType::Number));
        assert!(kind.socket("BODY").unwrap().is_statement_input());
        assert_eq!(kind.category, BlockCategory::Custom);
    }
}
