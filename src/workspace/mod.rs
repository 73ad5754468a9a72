//! Workspace graph
//!
//! The in-memory structure the editor mutates: block instances, their field
//! values and connections, plus ordered top-level roots.

pub mod chain;
pub mod graph;
pub mod instance;
pub mod validation;

pub use chain::Chain;
pub use graph::{Workspace, WorkspaceError};
pub use instance::{Attachment, BlockInstance};
pub use validation::{ValidationIssue, ValidationReport, WorkspaceValidator};
