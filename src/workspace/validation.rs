//! Workspace validation
//!
//! Mutations through [`Workspace`] keep the graph well formed, but a restored
//! workspace is taken verbatim. `WorkspaceValidator` re-checks a whole graph:
//! unknown kinds, dangling references, socket shapes, type compatibility,
//! back-reference consistency and loops. Generation never requires a clean
//! report; it is meant for the editor's problem list.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::core::{BlockId, KindRegistry, SocketKind};

use super::graph::Workspace;
use super::instance::{Attachment, BlockInstance};

// ── Result types ────────────────────────────────────────────────────────────

/// A single validation problem with optional location and suggestion.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    /// Block where the problem was found (if applicable).
    pub block_id: Option<BlockId>,
    /// Human-readable description.
    pub message: String,
    /// Optional suggestion for how to fix it.
    pub suggestion: Option<String>,
}

/// Overall validation result.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn add_error(&mut self, block_id: Option<BlockId>, message: impl Into<String>, suggestion: Option<&str>) {
        self.valid = false;
        self.errors.push(ValidationIssue {
            block_id,
            message: message.into(),
            suggestion: suggestion.map(|s| s.to_string()),
        });
    }

    fn add_warning(&mut self, block_id: Option<BlockId>, message: impl Into<String>, suggestion: Option<&str>) {
        self.warnings.push(ValidationIssue {
            block_id,
            message: message.into(),
            suggestion: suggestion.map(|s| s.to_string()),
        });
    }

    /// Merge another result into this one.
    fn merge(&mut self, other: ValidationReport) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

// ── Validator ───────────────────────────────────────────────────────────────

/// Validates a workspace graph against a kind registry.
pub struct WorkspaceValidator;

impl WorkspaceValidator {
    /// Run every check against the workspace.
    pub fn validate(workspace: &Workspace, registry: &KindRegistry) -> ValidationReport {
        let mut blocks: Vec<&BlockInstance> = workspace.instances().collect();
        blocks.sort_by_key(|b| b.id);

        let mut result = ValidationReport::ok();
        result.merge(Self::check_kinds_known(&blocks, registry));
        result.merge(Self::check_dangling_references(workspace, &blocks));
        result.merge(Self::check_socket_shapes(workspace, &blocks, registry));
        result.merge(Self::check_back_references(workspace, &blocks));
        result.merge(Self::check_cycles(workspace, &blocks));
        result.merge(Self::check_fields(&blocks, registry));
        result.merge(Self::check_unconnected_inputs(workspace, &blocks, registry));
        result
    }

    // ── Individual checks ───────────────────────────────────────────────

    /// Unknown kinds are inert at generation time, so only warn.
    fn check_kinds_known(blocks: &[&BlockInstance], registry: &KindRegistry) -> ValidationReport {
        let mut result = ValidationReport::ok();
        for block in blocks {
            if !registry.contains(&block.kind) {
                result.add_warning(
                    Some(block.id),
                    format!("Block {} uses unknown kind '{}' and will emit nothing", block.id, block.kind),
                    Some("Register the kind or remove the block"),
                );
            }
        }
        result
    }

    /// References to removed blocks read as unconnected.
    fn check_dangling_references(workspace: &Workspace, blocks: &[&BlockInstance]) -> ValidationReport {
        let mut result = ValidationReport::ok();
        for block in blocks {
            for target in block.children() {
                if !workspace.contains(target) {
                    result.add_warning(
                        Some(block.id),
                        format!("Block {} references removed block {}", block.id, target),
                        Some("Reconnect the socket"),
                    );
                }
            }
        }
        result
    }

    /// Connections must use sockets of the right shape with compatible types.
    fn check_socket_shapes(
        workspace: &Workspace,
        blocks: &[&BlockInstance],
        registry: &KindRegistry,
    ) -> ValidationReport {
        let mut result = ValidationReport::ok();
        for block in blocks {
            let Some(kind) = registry.lookup(&block.kind) else {
                continue;
            };

            for (socket_name, producer_id) in &block.values {
                let socket = match kind.socket(socket_name) {
                    Some(socket) if socket.is_value_input() => socket,
                    _ => {
                        result.add_error(
                            Some(block.id),
                            format!("Kind '{}' has no value input '{}'", kind.id, socket_name),
                            Some("Check socket names match the kind definition"),
                        );
                        continue;
                    }
                };
                let producer_kind = workspace
                    .get(*producer_id)
                    .and_then(|p| registry.lookup(&p.kind));
                if let Some(producer_kind) = producer_kind {
                    if !producer_kind.output.map_or(false, |t| socket.accepts(t)) {
                        result.add_error(
                            Some(block.id),
                            format!(
                                "Value input '{}' on block {} holds incompatible '{}' ({:?})",
                                socket_name, block.id, producer_kind.id, producer_kind.output
                            ),
                            Some("Connect a block whose output type the socket accepts"),
                        );
                    }
                }
            }

            for (socket_name, head) in &block.statements {
                if !matches!(kind.socket(socket_name).map(|s| &s.kind), Some(SocketKind::StatementInput)) {
                    result.add_error(
                        Some(block.id),
                        format!("Kind '{}' has no statement input '{}'", kind.id, socket_name),
                        Some("Check socket names match the kind definition"),
                    );
                }
                Self::check_chain_member(workspace, registry, *head, &mut result);
            }

            if let Some(next) = block.next {
                if !kind.next_statement {
                    result.add_error(
                        Some(block.id),
                        format!("Kind '{}' cannot be followed by another statement", kind.id),
                        None,
                    );
                }
                Self::check_chain_member(workspace, registry, next, &mut result);
            }
        }
        result
    }

    fn check_chain_member(
        workspace: &Workspace,
        registry: &KindRegistry,
        id: BlockId,
        result: &mut ValidationReport,
    ) {
        let Some(member) = workspace.get(id) else {
            return;
        };
        if let Some(kind) = registry.lookup(&member.kind) {
            if !kind.previous_statement {
                result.add_error(
                    Some(id),
                    format!("Kind '{}' cannot appear in a statement chain", kind.id),
                    Some("Only statement blocks can be stacked"),
                );
            }
        }
    }

    /// The back-reference of every owned block must name its owner.
    fn check_back_references(workspace: &Workspace, blocks: &[&BlockInstance]) -> ValidationReport {
        let mut result = ValidationReport::ok();
        let roots: HashSet<BlockId> = workspace.root_ids().iter().copied().collect();

        for block in blocks {
            let expected: Vec<(BlockId, Attachment)> = block
                .values
                .iter()
                .map(|(s, c)| (*c, Attachment::Value { parent: block.id, socket: s.clone() }))
                .chain(block.statements.iter().map(|(s, c)| {
                    (*c, Attachment::Statement { parent: block.id, socket: s.clone() })
                }))
                .chain(block.next.map(|n| (n, Attachment::Next { previous: block.id })))
                .collect();

            for (child, attachment) in expected {
                let Some(child_block) = workspace.get(child) else {
                    continue;
                };
                if child_block.attachment.as_ref() != Some(&attachment) {
                    result.add_error(
                        Some(child),
                        format!("Block {} is owned by {} but does not point back to it", child, block.id),
                        Some("Re-save the workspace from the editor"),
                    );
                }
                if roots.contains(&child) {
                    result.add_error(
                        Some(child),
                        format!("Block {} is both nested and a top-level root", child),
                        None,
                    );
                }
            }
        }
        result
    }

    /// Owned connections must form a forest.
    fn check_cycles(workspace: &Workspace, blocks: &[&BlockInstance]) -> ValidationReport {
        let mut result = ValidationReport::ok();

        // 0 = unvisited, 1 = on stack, 2 = done
        let mut state: HashMap<BlockId, u8> = HashMap::new();
        let mut in_cycle: Vec<BlockId> = Vec::new();

        for start in blocks {
            if state.contains_key(&start.id) {
                continue;
            }
            let mut stack: Vec<(BlockId, Vec<BlockId>)> = vec![(start.id, Self::children_of(workspace, start.id))];
            state.insert(start.id, 1);

            loop {
                let next = match stack.last_mut() {
                    Some((_, pending)) => pending.pop(),
                    None => break,
                };
                match next {
                    Some(child) => match state.get(&child).copied() {
                        None => {
                            state.insert(child, 1);
                            stack.push((child, Self::children_of(workspace, child)));
                        }
                        Some(1) => in_cycle.push(child),
                        _ => {}
                    },
                    None => {
                        if let Some((node, _)) = stack.pop() {
                            state.insert(node, 2);
                        }
                    }
                }
            }
        }

        if !in_cycle.is_empty() {
            in_cycle.sort();
            in_cycle.dedup();
            let ids: Vec<String> = in_cycle.iter().map(|id| id.to_string()).collect();
            result.add_error(
                in_cycle.first().copied(),
                format!("Workspace contains a cycle through: {}", ids.join(", ")),
                Some("Break the loop by disconnecting one of these blocks"),
            );
        }
        result
    }

    fn children_of(workspace: &Workspace, id: BlockId) -> Vec<BlockId> {
        workspace
            .get(id)
            .map(|b| b.children().filter(|c| workspace.contains(*c)).collect())
            .unwrap_or_default()
    }

    /// Field values must exist on the kind and fit it.
    fn check_fields(blocks: &[&BlockInstance], registry: &KindRegistry) -> ValidationReport {
        let mut result = ValidationReport::ok();
        for block in blocks {
            let Some(kind) = registry.lookup(&block.kind) else {
                continue;
            };
            for (name, value) in &block.fields {
                match kind.socket(name).map(|s| &s.kind) {
                    Some(SocketKind::Field(field)) if value.fits(field) => {}
                    Some(SocketKind::Field(_)) => result.add_warning(
                        Some(block.id),
                        format!("Field '{}' on block {} has unexpected value '{}'", name, block.id, value),
                        None,
                    ),
                    _ => result.add_warning(
                        Some(block.id),
                        format!("Kind '{}' has no field '{}'", kind.id, name),
                        None,
                    ),
                }
            }
        }
        result
    }

    /// Unconnected value inputs emit default literals; worth a warning.
    fn check_unconnected_inputs(
        workspace: &Workspace,
        blocks: &[&BlockInstance],
        registry: &KindRegistry,
    ) -> ValidationReport {
        let mut result = ValidationReport::ok();
        for block in blocks {
            let Some(kind) = registry.lookup(&block.kind) else {
                continue;
            };
            for socket in kind.sockets.iter().filter(|s| s.is_value_input()) {
                let connected = block
                    .value_input(&socket.name)
                    .map_or(false, |id| workspace.contains(id));
                if !connected {
                    result.add_warning(
                        Some(block.id),
                        format!("Value input '{}' on '{}' is not connected", socket.name, kind.id),
                        Some("Connect a value or accept the default"),
                    );
                }
            }
        }
        result
    }
}
