//! Source generation
//!
//! Turns a workspace into Solidity text: the generator walks top-level
//! chains through a rule table, values are parenthesized by precedence, and
//! the assembler adds the license/pragma header and import section.

pub mod assembler;
pub mod context;
pub mod generator;
pub mod precedence;
pub mod rules;

pub use assembler::OutputAssembler;
pub use context::{GenerationContext, ImportDescriptor, NameDb, RunConfig};
pub use generator::{EmitRule, EmittableChain, Emitter, Fragment, Generator, RuleTable};
pub use precedence::Precedence;
