//! Builtin Solidity block catalogue
//!
//! Each category module pairs block kinds with their emission rules. The
//! pairs are installed together so a registered kind always has a rule.

use log::debug;

use crate::core::{BlockKind, KindRegistry};
use crate::workspace::BlockInstance;

use super::generator::{EmitRule, Emitter, RuleTable};

pub mod control;
pub mod errors;
pub mod ether;
pub mod events;
pub mod functions;
pub mod math;
pub mod structure;
pub mod types;
pub mod variables;

/// Every builtin kind with its rule, grouped by category
pub fn catalogue() -> Vec<(BlockKind, EmitRule)> {
    let mut all = Vec::new();
    all.extend(types::blocks());
    all.extend(variables::blocks());
    all.extend(functions::blocks());
    all.extend(structure::blocks());
    all.extend(events::blocks());
    all.extend(ether::blocks());
    all.extend(errors::blocks());
    all.extend(control::blocks());
    all.extend(math::blocks());
    all
}

/// Install the builtin catalogue into a registry and a dispatch table
pub fn register_solidity_blocks(registry: &KindRegistry, rules: &mut RuleTable) {
    let mut kinds = Vec::new();
    for (kind, rule) in catalogue() {
        rules.register(kind.id.clone(), rule);
        kinds.push(kind);
    }
    let count = kinds.len();
    registry.register(kinds);
    debug!("registered {} builtin Solidity block kinds", count);
}

/// Value input in argument position: never parenthesized, `""` when empty
pub(crate) fn argument(instance: &BlockInstance, e: &mut Emitter<'_>, socket: &str) -> String {
    e.resolve_value(instance, socket, super::Precedence::None)
}

/// Warn when a declaration reuses a name already declared in this run
pub(crate) fn declare(e: &mut Emitter<'_>, name: &str) {
    if !name.is_empty() && !e.context().names.reserve(name) {
        debug!("'{}' declared more than once", name);
    }
}
