//! Chain traversal
//!
//! A chain is the singly linked sequence formed by `next` pointers. `Chain`
//! walks it lazily and can be restarted by cloning. It stops at the first
//! missing `next` and at dangling references.

use crate::core::BlockId;

use super::graph::Workspace;
use super::instance::BlockInstance;

/// Lazy iterator over a statement chain
#[derive(Clone)]
pub struct Chain<'a> {
    workspace: &'a Workspace,
    cursor: Option<BlockId>,
    /// Upper bound on steps; a restored workspace may contain a loop
    remaining: usize,
}

impl<'a> Chain<'a> {
    pub(crate) fn new(workspace: &'a Workspace, start: Option<BlockId>) -> Self {
        Self {
            workspace,
            cursor: start,
            remaining: workspace.len(),
        }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a BlockInstance;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            if self.cursor.is_some() {
                log::warn!("chain traversal stopped: next-pointer loop");
                self.cursor = None;
            }
            return None;
        }
        let id = self.cursor.take()?;
        let instance = self.workspace.get(id)?;
        self.remaining -= 1;
        self.cursor = instance.next;
        Some(instance)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{BlockKind, KindRegistry};
    use crate::workspace::Workspace;

    fn workspace() -> Workspace {
        let registry = KindRegistry::new();
        registry.register(vec![BlockKind::builder("stmt").statement().build()]);
        Workspace::new(registry)
    }

    #[test]
    fn chain_follows_next_pointers() {
        let mut ws = workspace();
        let a = ws.add_instance("stmt").unwrap();
        let b = ws.add_instance("stmt").unwrap();
        let c = ws.add_instance("stmt").unwrap();
        ws.link_next(b, c).unwrap();
        ws.link_next(a, b).unwrap();

        let ids: Vec<_> = ws.chain(a).map(|i| i.id).collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn chain_is_restartable() {
        let mut ws = workspace();
        let a = ws.add_instance("stmt").unwrap();
        let b = ws.add_instance("stmt").unwrap();
        ws.link_next(a, b).unwrap();

        let chain = ws.chain(a);
        assert_eq!(chain.clone().count(), 2);
        assert_eq!(chain.count(), 2);
    }

    #[test]
    fn chain_stops_at_dangling_reference() {
        let mut ws = workspace();
        let a = ws.add_instance("stmt").unwrap();
        let b = ws.add_instance("stmt").unwrap();
        let c = ws.add_instance("stmt").unwrap();
        ws.link_next(a, b).unwrap();
        ws.link_next(b, c).unwrap();
        ws.remove_instance(b).unwrap();

        let ids: Vec<_> = ws.chain(a).map(|i| i.id).collect();
        assert_eq!(ids, vec![a]);
    }
}
