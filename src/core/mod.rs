//! Core block abstractions and types
//!
//! This module defines block kinds (the static catalogue), their sockets and
//! field values, and the registry that owns them.

pub mod field;
pub mod kind;
pub mod registry;
pub mod socket;

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub use field::FieldValue;
pub use kind::{BlockCategory, BlockKind, BlockKindBuilder};
pub use registry::{KindRegistry, RegistryError};
pub use socket::{FieldKind, OutputType, Socket, SocketKind};

/// Unique identifier for a placed block instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub Uuid);

impl BlockId {
    /// Generate a new random block ID
    pub fn new() -> Self {
        BlockId(Uuid::new_v4())
    }

    /// Parse an id previously produced by `to_string`
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(BlockId)
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
