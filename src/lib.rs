//! Block Codegen - visual smart-contract blocks to Solidity source
//!
//! This crate provides the block kind registry, the workspace graph the editor
//! mutates, and the generator that turns that graph into Solidity text.

pub mod core;
pub mod workspace;
pub mod codegen;
pub mod services;
mod tests;

#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

// Re-export commonly used types
pub use core::{BlockId, BlockKind, KindRegistry};
pub use workspace::{Workspace, WorkspaceError};
pub use codegen::{GenerationContext, Generator, RunConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
