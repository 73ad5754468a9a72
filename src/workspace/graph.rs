//! Workspace graph
//!
//! Holds every placed block instance, their field values and connections, and
//! the ordered list of top-level roots. Mutations check type compatibility
//! and chain capability at connection time and refuse anything that would make
//! a block reachable from itself.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::core::{BlockId, BlockKind, FieldValue, KindRegistry, OutputType, SocketKind};

use super::chain::Chain;
use super::instance::{Attachment, BlockInstance};

/// Current persisted format version
pub const FORMAT_VERSION: u32 = 1;

/// Mutable graph of block instances
#[derive(Clone)]
pub struct Workspace {
    registry: KindRegistry,
    instances: HashMap<BlockId, BlockInstance>,
    /// Top-level blocks in insertion order
    roots: Vec<BlockId>,
}

/// On-disk shape of a workspace
#[derive(Debug, Serialize, Deserialize)]
struct PersistedWorkspace {
    version: u32,
    roots: Vec<BlockId>,
    blocks: Vec<BlockInstance>,
}

impl Workspace {
    /// Create an empty workspace whose connection checks use `registry`
    pub fn new(registry: KindRegistry) -> Self {
        Self {
            registry,
            instances: HashMap::new(),
            roots: Vec::new(),
        }
    }

    /// Registry used for connection checks
    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn get(&self, id: BlockId) -> Option<&BlockInstance> {
        self.instances.get(&id)
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.instances.contains_key(&id)
    }

    /// Number of instances, reachable or not
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// All instances in unspecified order
    pub fn instances(&self) -> impl Iterator<Item = &BlockInstance> {
        self.instances.values()
    }

    /// Top-level root ids in insertion order
    pub fn root_ids(&self) -> &[BlockId] {
        &self.roots
    }

    /// Top-level roots in insertion order
    pub fn top_level_roots(&self) -> impl Iterator<Item = &BlockInstance> + '_ {
        self.roots.iter().filter_map(move |id| self.instances.get(id))
    }

    /// Walk the chain that starts at `start`
    pub fn chain(&self, start: BlockId) -> Chain<'_> {
        Chain::new(self, Some(start))
    }

    /// Walk the body connected to a statement input; empty if unconnected
    pub fn statement_chain(&self, parent: BlockId, socket: &str) -> Chain<'_> {
        let start = self
            .instances
            .get(&parent)
            .and_then(|p| p.statement_input(socket));
        Chain::new(self, start)
    }

    // ── Structural mutations ────────────────────────────────────────────

    /// Place a new block of the given kind as the last top-level root
    pub fn add_instance(&mut self, kind_id: &str) -> Result<BlockId, WorkspaceError> {
        let kind = self.kind(kind_id)?;
        let instance = BlockInstance::new(&kind);
        let id = instance.id;
        self.instances.insert(id, instance);
        self.roots.push(id);
        debug!("added '{}' block {}", kind_id, id);
        Ok(id)
    }

    /// Remove an instance from the workspace
    ///
    /// References to it from other blocks are left dangling and read as
    /// unconnected. Blocks it owned are not deleted; they become top-level
    /// roots.
    pub fn remove_instance(&mut self, id: BlockId) -> Result<BlockInstance, WorkspaceError> {
        let mut removed = self
            .instances
            .remove(&id)
            .ok_or(WorkspaceError::UnknownInstance(id))?;
        self.roots.retain(|r| *r != id);

        let children: Vec<BlockId> = removed.children().collect();
        for child in children {
            if let Some(instance) = self.instances.get_mut(&child) {
                if instance.attachment.as_ref().map(Attachment::owner) == Some(id) {
                    instance.attachment = None;
                    self.roots.push(child);
                }
            }
        }
        removed.values.clear();
        removed.statements.clear();
        removed.next = None;
        debug!("removed block {}", id);
        Ok(removed)
    }

    /// Set a field value
    pub fn set_field(
        &mut self,
        id: BlockId,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), WorkspaceError> {
        let value = value.into();
        let kind = self.kind_of(id)?;
        let socket = kind.socket(name).ok_or_else(|| WorkspaceError::UnknownSocket {
            kind: kind.id.clone(),
            socket: name.to_string(),
        })?;
        let field = match &socket.kind {
            SocketKind::Field(field) => field,
            _ => {
                return Err(WorkspaceError::WrongSocket {
                    socket: name.to_string(),
                    expected: "field",
                })
            }
        };

        // Dropdowns store their selection as a tag even when given plain text.
        let value = match (field, value) {
            (crate::core::FieldKind::Dropdown { .. }, FieldValue::Text(tag)) => {
                FieldValue::enum_tag(tag)
            }
            (_, value) => value,
        };
        if !value.fits(field) {
            return Err(WorkspaceError::InvalidFieldValue {
                socket: name.to_string(),
                value: value.to_string(),
            });
        }

        self.instance_mut(id)?.fields.insert(name.to_string(), value);
        Ok(())
    }

    /// Enable or disable a block; disabled blocks emit nothing
    pub fn set_enabled(&mut self, id: BlockId, enabled: bool) -> Result<(), WorkspaceError> {
        self.instance_mut(id)?.enabled = enabled;
        Ok(())
    }

    /// Plug `child` into the value input `socket` of `parent`
    ///
    /// Any producer already in that socket is bumped to the top level.
    pub fn connect_value(
        &mut self,
        parent: BlockId,
        socket: &str,
        child: BlockId,
    ) -> Result<(), WorkspaceError> {
        let parent_kind = self.kind_of(parent)?;
        let child_kind = self.kind_of(child)?;
        let target = self.socket_of(&parent_kind, socket, "value input")?;

        let output = child_kind.output;
        if !output.map_or(false, |t| target.accepts(t)) {
            let accepts = match &target.kind {
                SocketKind::ValueInput { accepts } => accepts.clone(),
                _ => Vec::new(),
            };
            debug!(
                "refused '{}' into {}:{}",
                child_kind.id, parent_kind.id, socket
            );
            return Err(WorkspaceError::InvalidConnection {
                producer: child_kind.id.clone(),
                output,
                socket: socket.to_string(),
                accepts,
            });
        }
        self.check_acyclic(parent, child)?;

        self.detach(child);
        let displaced = self
            .instance_mut(parent)?
            .values
            .insert(socket.to_string(), child);
        self.instance_mut(child)?.attachment = Some(Attachment::Value {
            parent,
            socket: socket.to_string(),
        });
        if let Some(old) = displaced {
            self.make_root(old);
        }
        Ok(())
    }

    /// Unplug whatever producer sits in a value input
    ///
    /// # Returns
    /// The detached producer, now a top-level root
    pub fn disconnect_value(
        &mut self,
        parent: BlockId,
        socket: &str,
    ) -> Result<Option<BlockId>, WorkspaceError> {
        let child = self.instance_mut(parent)?.values.remove(socket);
        if let Some(child) = child {
            self.make_root(child);
        }
        Ok(child)
    }

    /// Connect the chain starting at `child` as the body of a statement input
    ///
    /// A body already present is re-attached after the tail of the new chain
    /// when the tail allows it, otherwise it is bumped to the top level.
    pub fn connect_statement(
        &mut self,
        parent: BlockId,
        socket: &str,
        child: BlockId,
    ) -> Result<(), WorkspaceError> {
        let parent_kind = self.kind_of(parent)?;
        let child_kind = self.kind_of(child)?;
        self.socket_of(&parent_kind, socket, "statement input")?;
        if !child_kind.previous_statement {
            return Err(WorkspaceError::NotChainable {
                kind: child_kind.id.clone(),
                reason: "it has no previous connection",
            });
        }
        self.check_acyclic(parent, child)?;

        self.detach(child);
        let displaced = self
            .instance_mut(parent)?
            .statements
            .insert(socket.to_string(), child);
        self.instance_mut(child)?.attachment = Some(Attachment::Statement {
            parent,
            socket: socket.to_string(),
        });
        if let Some(old) = displaced {
            self.splice_after_tail(child, old);
        }
        Ok(())
    }

    /// Detach the body of a statement input
    ///
    /// # Returns
    /// The head of the detached chain, now a top-level root
    pub fn disconnect_statement(
        &mut self,
        parent: BlockId,
        socket: &str,
    ) -> Result<Option<BlockId>, WorkspaceError> {
        let child = self.instance_mut(parent)?.statements.remove(socket);
        if let Some(child) = child {
            self.make_root(child);
        }
        Ok(child)
    }

    /// Make the chain starting at `child` follow `previous`
    ///
    /// Whatever followed `previous` before is re-attached after the tail of
    /// the inserted chain when possible, otherwise bumped to the top level.
    pub fn link_next(&mut self, previous: BlockId, child: BlockId) -> Result<(), WorkspaceError> {
        let previous_kind = self.kind_of(previous)?;
        let child_kind = self.kind_of(child)?;
        if !previous_kind.next_statement {
            return Err(WorkspaceError::NotChainable {
                kind: previous_kind.id.clone(),
                reason: "it has no next connection",
            });
        }
        if !child_kind.previous_statement {
            return Err(WorkspaceError::NotChainable {
                kind: child_kind.id.clone(),
                reason: "it has no previous connection",
            });
        }
        self.check_acyclic(previous, child)?;

        self.detach(child);
        let displaced = self.instance_mut(previous)?.next.replace(child);
        self.instance_mut(child)?.attachment = Some(Attachment::Next { previous });
        if let Some(old) = displaced {
            self.splice_after_tail(child, old);
        }
        Ok(())
    }

    /// Cut the chain after `previous`
    ///
    /// # Returns
    /// The head of the detached remainder, now a top-level root
    pub fn unlink_next(&mut self, previous: BlockId) -> Result<Option<BlockId>, WorkspaceError> {
        let child = self.instance_mut(previous)?.next.take();
        if let Some(child) = child {
            self.make_root(child);
        }
        Ok(child)
    }

    // ── Persistence ─────────────────────────────────────────────────────

    /// Serialize the workspace to the persisted JSON format
    ///
    /// Blocks are written sorted by id so equal graphs produce equal text.
    pub fn to_json(&self) -> Result<String, WorkspaceError> {
        let mut blocks: Vec<BlockInstance> = self.instances.values().cloned().collect();
        blocks.sort_by_key(|b| b.id);
        let persisted = PersistedWorkspace {
            version: FORMAT_VERSION,
            roots: self.roots.clone(),
            blocks,
        };
        Ok(serde_json::to_string_pretty(&persisted)?)
    }

    /// Restore a workspace saved with [`to_json`](Self::to_json)
    ///
    /// The data is taken verbatim; run
    /// [`WorkspaceValidator`](super::validation::WorkspaceValidator) to find
    /// unknown kinds, bad connections or loops.
    pub fn from_json(json: &str, registry: KindRegistry) -> Result<Self, WorkspaceError> {
        let persisted: PersistedWorkspace = serde_json::from_str(json)?;
        if persisted.version > FORMAT_VERSION {
            return Err(WorkspaceError::UnsupportedVersion(persisted.version));
        }
        let instances: HashMap<BlockId, BlockInstance> = persisted
            .blocks
            .into_iter()
            .map(|b| (b.id, b))
            .collect();
        let mut seen = HashSet::new();
        let roots = persisted
            .roots
            .into_iter()
            .filter(|id| instances.contains_key(id) && seen.insert(*id))
            .collect();
        Ok(Self {
            registry,
            instances,
            roots,
        })
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn kind(&self, kind_id: &str) -> Result<Arc<BlockKind>, WorkspaceError> {
        self.registry
            .lookup(kind_id)
            .ok_or_else(|| WorkspaceError::UnknownKind(kind_id.to_string()))
    }

    fn kind_of(&self, id: BlockId) -> Result<Arc<BlockKind>, WorkspaceError> {
        let instance = self
            .instances
            .get(&id)
            .ok_or(WorkspaceError::UnknownInstance(id))?;
        self.kind(&instance.kind)
    }

    fn socket_of<'k>(
        &self,
        kind: &'k BlockKind,
        socket: &str,
        expected: &'static str,
    ) -> Result<&'k crate::core::Socket, WorkspaceError> {
        let found = kind.socket(socket).ok_or_else(|| WorkspaceError::UnknownSocket {
            kind: kind.id.clone(),
            socket: socket.to_string(),
        })?;
        let matches = match expected {
            "value input" => found.is_value_input(),
            _ => found.is_statement_input(),
        };
        if !matches {
            return Err(WorkspaceError::WrongSocket {
                socket: socket.to_string(),
                expected,
            });
        }
        Ok(found)
    }

    fn instance_mut(&mut self, id: BlockId) -> Result<&mut BlockInstance, WorkspaceError> {
        self.instances
            .get_mut(&id)
            .ok_or(WorkspaceError::UnknownInstance(id))
    }

    /// Refuse a connection that would make `parent` reachable from `child`
    fn check_acyclic(&self, parent: BlockId, child: BlockId) -> Result<(), WorkspaceError> {
        if parent == child || self.reaches(child, parent) {
            debug!("refused cyclic connection {} -> {}", parent, child);
            return Err(WorkspaceError::Cycle { parent, child });
        }
        Ok(())
    }

    /// Depth-first search over owned connections
    fn reaches(&self, from: BlockId, target: BlockId) -> bool {
        let mut stack = vec![from];
        let mut visited = HashSet::new();
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if !visited.insert(id) {
                continue;
            }
            if let Some(instance) = self.instances.get(&id) {
                stack.extend(instance.children());
            }
        }
        false
    }

    /// Remove `id` from wherever it currently sits (a socket, a chain or the roots)
    fn detach(&mut self, id: BlockId) {
        self.roots.retain(|r| *r != id);
        let attachment = match self.instances.get_mut(&id) {
            Some(instance) => instance.attachment.take(),
            None => return,
        };
        match attachment {
            Some(Attachment::Value { parent, socket }) => {
                if let Some(p) = self.instances.get_mut(&parent) {
                    if p.values.get(&socket) == Some(&id) {
                        p.values.remove(&socket);
                    }
                }
            }
            Some(Attachment::Statement { parent, socket }) => {
                if let Some(p) = self.instances.get_mut(&parent) {
                    if p.statements.get(&socket) == Some(&id) {
                        p.statements.remove(&socket);
                    }
                }
            }
            Some(Attachment::Next { previous }) => {
                if let Some(p) = self.instances.get_mut(&previous) {
                    if p.next == Some(id) {
                        p.next = None;
                    }
                }
            }
            None => {}
        }
    }

    /// Turn `id` into the last top-level root
    fn make_root(&mut self, id: BlockId) {
        if let Some(instance) = self.instances.get_mut(&id) {
            instance.attachment = None;
            if !self.roots.contains(&id) {
                self.roots.push(id);
            }
        }
    }

    /// Attach `orphan` after the last block of the chain starting at `head`
    fn splice_after_tail(&mut self, head: BlockId, orphan: BlockId) {
        let tail = match self.chain(head).last() {
            Some(tail) => tail.id,
            None => return self.make_root(orphan),
        };
        let tail_chains = self.kind_of(tail).map_or(false, |k| k.next_statement);
        let orphan_chains = self.kind_of(orphan).map_or(false, |k| k.previous_statement);
        if tail_chains && orphan_chains {
            if let Some(t) = self.instances.get_mut(&tail) {
                t.next = Some(orphan);
            }
            if let Some(o) = self.instances.get_mut(&orphan) {
                o.attachment = Some(Attachment::Next { previous: tail });
            }
        } else {
            self.make_root(orphan);
        }
    }
}

/// Rejected workspace mutations
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    /// No instance with this id
    #[error("Unknown block instance: {0}")]
    UnknownInstance(BlockId),

    /// Kind id not in the registry
    #[error("Unknown block kind: {0}")]
    UnknownKind(String),

    /// Kind has no socket with this name
    #[error("Block kind '{kind}' has no socket '{socket}'")]
    UnknownSocket { kind: String, socket: String },

    /// Socket exists but is of another shape
    #[error("Socket '{socket}' is not a {expected}")]
    WrongSocket {
        socket: String,
        expected: &'static str,
    },

    /// Producer's output type is not accepted by the value input
    #[error("Invalid connection: '{producer}' outputs {output:?}, socket '{socket}' accepts {accepts:?}")]
    InvalidConnection {
        producer: String,
        output: Option<OutputType>,
        socket: String,
        accepts: Vec<OutputType>,
    },

    /// Block cannot take part in a statement chain
    #[error("Block kind '{kind}' cannot be chained: {reason}")]
    NotChainable { kind: String, reason: &'static str },

    /// Connection would make a block reachable from itself
    #[error("Connecting {child} under {parent} would create a cycle")]
    Cycle { parent: BlockId, child: BlockId },

    /// Field value does not fit the field
    #[error("Value '{value}' is not valid for field '{socket}'")]
    InvalidFieldValue { socket: String, value: String },

    /// Persisted data is newer than this crate understands
    #[error("Unsupported workspace format version {0}")]
    UnsupportedVersion(u32),

    /// Persisted data could not be (de)serialized
    #[error("Workspace serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Socket;

    fn registry() -> KindRegistry {
        let registry = KindRegistry::new();
        registry.register(vec![
            BlockKind::builder("stmt")
                .socket(Socket::text("NAME", "x"))
                .socket(Socket::statement("BODY"))
                .socket(Socket::value("COND", &[OutputType::Boolean]))
                .statement()
                .build(),
            BlockKind::builder("bool").output(OutputType::Boolean).build(),
            BlockKind::builder("num").output(OutputType::Number).build(),
            BlockKind::builder("not")
                .socket(Socket::value("BOOL", &[OutputType::Boolean]))
                .output(OutputType::Boolean)
                .build(),
            BlockKind::builder("terminal")
                .socket(Socket::dropdown("MODE", &["a", "b"]))
                .build(),
        ]);
        registry
    }

    #[test]
    fn roots_keep_insertion_order() {
        let mut ws = Workspace::new(registry());
        let a = ws.add_instance("stmt").unwrap();
        let b = ws.add_instance("stmt").unwrap();
        assert_eq!(ws.root_ids(), &[a, b]);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let mut ws = Workspace::new(registry());
        assert!(matches!(
            ws.add_instance("nope"),
            Err(WorkspaceError::UnknownKind(_))
        ));
    }

    #[test]
    fn value_connection_checks_types() {
        let mut ws = Workspace::new(registry());
        let s = ws.add_instance("stmt").unwrap();
        let n = ws.add_instance("num").unwrap();
        let b = ws.add_instance("bool").unwrap();

        let err = ws.connect_value(s, "COND", n).unwrap_err();
        assert!(matches!(err, WorkspaceError::InvalidConnection { .. }));
        assert!(ws.get(s).unwrap().value_input("COND").is_none());

        ws.connect_value(s, "COND", b).unwrap();
        assert_eq!(ws.get(s).unwrap().value_input("COND"), Some(b));
        assert_eq!(ws.root_ids(), &[s, n]);
    }

    #[test]
    fn statement_blocks_cannot_be_values() {
        let mut ws = Workspace::new(registry());
        let s = ws.add_instance("stmt").unwrap();
        let t = ws.add_instance("stmt").unwrap();
        assert!(ws.connect_value(s, "COND", t).is_err());
    }

    #[test]
    fn wrong_socket_shapes_are_rejected() {
        let mut ws = Workspace::new(registry());
        let s = ws.add_instance("stmt").unwrap();
        let b = ws.add_instance("bool").unwrap();
        assert!(matches!(
            ws.connect_value(s, "BODY", b),
            Err(WorkspaceError::WrongSocket { .. })
        ));
        assert!(matches!(
            ws.connect_value(s, "MISSING", b),
            Err(WorkspaceError::UnknownSocket { .. })
        ));
    }

    #[test]
    fn value_blocks_cannot_chain() {
        let mut ws = Workspace::new(registry());
        let s = ws.add_instance("stmt").unwrap();
        let b = ws.add_instance("bool").unwrap();
        assert!(matches!(
            ws.connect_statement(s, "BODY", b),
            Err(WorkspaceError::NotChainable { .. })
        ));
        assert!(matches!(
            ws.link_next(s, b),
            Err(WorkspaceError::NotChainable { .. })
        ));
    }

    #[test]
    fn cycles_are_refused() {
        let mut ws = Workspace::new(registry());
        let a = ws.add_instance("stmt").unwrap();
        let b = ws.add_instance("stmt").unwrap();
        ws.connect_statement(a, "BODY", b).unwrap();

        assert!(matches!(
            ws.connect_statement(b, "BODY", a),
            Err(WorkspaceError::Cycle { .. })
        ));
        assert!(matches!(ws.link_next(b, a), Err(WorkspaceError::Cycle { .. })));
        assert!(matches!(ws.link_next(a, a), Err(WorkspaceError::Cycle { .. })));

        let x = ws.add_instance("not").unwrap();
        let y = ws.add_instance("not").unwrap();
        ws.connect_value(x, "BOOL", y).unwrap();
        assert!(ws.connect_value(y, "BOOL", x).is_err());
    }

    #[test]
    fn displaced_producer_becomes_root() {
        let mut ws = Workspace::new(registry());
        let s = ws.add_instance("stmt").unwrap();
        let b1 = ws.add_instance("bool").unwrap();
        let b2 = ws.add_instance("bool").unwrap();
        ws.connect_value(s, "COND", b1).unwrap();
        ws.connect_value(s, "COND", b2).unwrap();

        assert_eq!(ws.get(s).unwrap().value_input("COND"), Some(b2));
        assert_eq!(ws.root_ids(), &[s, b1]);
        assert!(ws.get(b1).unwrap().attachment.is_none());
    }

    #[test]
    fn link_next_splices_existing_follower() {
        let mut ws = Workspace::new(registry());
        let a = ws.add_instance("stmt").unwrap();
        let c = ws.add_instance("stmt").unwrap();
        let b = ws.add_instance("stmt").unwrap();
        ws.link_next(a, c).unwrap();
        ws.link_next(a, b).unwrap();

        let order: Vec<_> = ws.chain(a).map(|i| i.id).collect();
        assert_eq!(order, vec![a, b, c]);
        assert_eq!(ws.root_ids(), &[a]);
    }

    #[test]
    fn statement_body_is_replaced_and_spliced() {
        let mut ws = Workspace::new(registry());
        let parent = ws.add_instance("stmt").unwrap();
        let old = ws.add_instance("stmt").unwrap();
        let new = ws.add_instance("stmt").unwrap();
        ws.connect_statement(parent, "BODY", old).unwrap();
        ws.connect_statement(parent, "BODY", new).unwrap();

        let body: Vec<_> = ws.statement_chain(parent, "BODY").map(|i| i.id).collect();
        assert_eq!(body, vec![new, old]);
    }

    #[test]
    fn moving_a_block_detaches_it_first() {
        let mut ws = Workspace::new(registry());
        let p1 = ws.add_instance("stmt").unwrap();
        let p2 = ws.add_instance("stmt").unwrap();
        let child = ws.add_instance("stmt").unwrap();
        ws.connect_statement(p1, "BODY", child).unwrap();
        ws.connect_statement(p2, "BODY", child).unwrap();

        assert!(ws.get(p1).unwrap().statement_input("BODY").is_none());
        assert_eq!(ws.get(p2).unwrap().statement_input("BODY"), Some(child));
    }

    #[test]
    fn disconnect_returns_chain_to_top_level() {
        let mut ws = Workspace::new(registry());
        let parent = ws.add_instance("stmt").unwrap();
        let a = ws.add_instance("stmt").unwrap();
        let b = ws.add_instance("stmt").unwrap();
        ws.link_next(a, b).unwrap();
        ws.connect_statement(parent, "BODY", a).unwrap();
        assert_eq!(ws.root_ids(), &[parent]);

        assert_eq!(ws.disconnect_statement(parent, "BODY").unwrap(), Some(a));
        assert_eq!(ws.root_ids(), &[parent, a]);
        assert_eq!(ws.chain(a).count(), 2);

        assert_eq!(ws.unlink_next(a).unwrap(), Some(b));
        assert_eq!(ws.root_ids(), &[parent, a, b]);
    }

    #[test]
    fn removal_leaves_dangling_references() {
        let mut ws = Workspace::new(registry());
        let s = ws.add_instance("stmt").unwrap();
        let b = ws.add_instance("bool").unwrap();
        ws.connect_value(s, "COND", b).unwrap();
        ws.remove_instance(b).unwrap();

        assert_eq!(ws.get(s).unwrap().value_input("COND"), Some(b));
        assert!(ws.get(b).is_none());
    }

    #[test]
    fn removal_promotes_owned_blocks() {
        let mut ws = Workspace::new(registry());
        let s = ws.add_instance("stmt").unwrap();
        let body = ws.add_instance("stmt").unwrap();
        let cond = ws.add_instance("bool").unwrap();
        ws.connect_statement(s, "BODY", body).unwrap();
        ws.connect_value(s, "COND", cond).unwrap();

        ws.remove_instance(s).unwrap();
        assert_eq!(ws.root_ids(), &[cond, body]);
    }

    #[test]
    fn set_field_validates() {
        let mut ws = Workspace::new(registry());
        let s = ws.add_instance("stmt").unwrap();
        let t = ws.add_instance("terminal").unwrap();

        ws.set_field(s, "NAME", "hello").unwrap();
        assert_eq!(ws.get(s).unwrap().field_text("NAME"), "hello");

        ws.set_field(t, "MODE", "b").unwrap();
        assert_eq!(ws.get(t).unwrap().field("MODE"), Some(&FieldValue::enum_tag("b")));
        assert!(matches!(
            ws.set_field(t, "MODE", "z"),
            Err(WorkspaceError::InvalidFieldValue { .. })
        ));
        assert!(matches!(
            ws.set_field(s, "BODY", "x"),
            Err(WorkspaceError::WrongSocket { .. })
        ));
    }

    #[test]
    fn json_roundtrip_preserves_graph() {
        let reg = registry();
        let mut ws = Workspace::new(reg.clone());
        let a = ws.add_instance("stmt").unwrap();
        let b = ws.add_instance("stmt").unwrap();
        let c = ws.add_instance("bool").unwrap();
        ws.connect_statement(a, "BODY", b).unwrap();
        ws.connect_value(b, "COND", c).unwrap();
        ws.set_enabled(b, false).unwrap();

        let json = ws.to_json().unwrap();
        let restored = Workspace::from_json(&json, reg).unwrap();
        assert_eq!(restored.root_ids(), ws.root_ids());
        assert_eq!(restored.get(b), ws.get(b));
        assert_eq!(restored.to_json().unwrap(), json);
    }

    #[test]
    fn newer_format_is_rejected() {
        let json = r#"{"version": 99, "roots": [], "blocks": []}"#;
        assert!(matches!(
            Workspace::from_json(json, registry()),
            Err(WorkspaceError::UnsupportedVersion(99))
        ));
    }
}
