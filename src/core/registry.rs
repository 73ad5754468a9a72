//! Kind Registry - central catalogue of block kinds
//!
//! This module provides a thread-safe registry for block kinds. It supports:
//! - Kind registration (re-registering an id overwrites it)
//! - Lookup by id, which yields absence rather than an error for unknown ids
//! - Discovery by category or search query
//! - Loading kind definitions from JSON

use log::{debug, warn};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::kind::{BlockCategory, BlockKind};

/// Registry of block kinds
///
/// The registry uses `Arc<RwLock<HashMap>>` so the editor and the generator can
/// share one catalogue. It supports concurrent reads and exclusive writes using
/// parking_lot's RwLock.
#[derive(Clone, Default)]
pub struct KindRegistry {
    kinds: Arc<RwLock<HashMap<String, Arc<BlockKind>>>>,
}

impl KindRegistry {
    /// Create a new empty registry
    ///
    /// # Example
    /// ```
    /// use block_codegen::core::registry::KindRegistry;
    ///
    /// let registry = KindRegistry::new();
    /// assert_eq!(registry.count(), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            kinds: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a batch of kind definitions
    ///
    /// Registration is idempotent per id: registering an existing id replaces
    /// the previous definition. Definitions that fail validation are skipped
    /// with a warning.
    pub fn register(&self, kinds: impl IntoIterator<Item = BlockKind>) {
        for kind in kinds {
            if let Err(e) = self.try_register(kind) {
                warn!("skipping block kind: {}", e);
            }
        }
    }

    /// Register a single kind, reporting validation failures
    ///
    /// # Returns
    /// * `Ok(())` if the kind was stored
    /// * `Err(RegistryError::InvalidDefinition)` if the definition is inconsistent
    pub fn try_register(&self, kind: BlockKind) -> Result<(), RegistryError> {
        kind.validate().map_err(RegistryError::InvalidDefinition)?;

        let mut kinds = self.kinds.write();
        if kinds.contains_key(&kind.id) {
            debug!("re-registering block kind '{}'", kind.id);
        }
        kinds.insert(kind.id.clone(), Arc::new(kind));
        Ok(())
    }

    /// Register kinds from a JSON array of definitions
    ///
    /// # Returns
    /// The number of kinds registered
    pub fn register_json(&self, json: &str) -> Result<usize, RegistryError> {
        let kinds: Vec<BlockKind> = serde_json::from_str(json)?;
        let count = kinds.len();
        for kind in kinds {
            self.try_register(kind)?;
        }
        Ok(count)
    }

    /// Look up a kind by id
    ///
    /// Unknown ids yield `None`; callers treat such blocks as inert.
    pub fn lookup(&self, id: &str) -> Option<Arc<BlockKind>> {
        self.kinds.read().get(id).cloned()
    }

    /// Remove a kind from the registry
    ///
    /// # Returns
    /// The removed definition, if it was registered
    pub fn unregister(&self, id: &str) -> Option<Arc<BlockKind>> {
        self.kinds.write().remove(id)
    }

    /// Get all registered kinds, sorted by id
    pub fn kinds(&self) -> Vec<Arc<BlockKind>> {
        let mut all: Vec<_> = self.kinds.read().values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Get kinds in a toolbox category, sorted by id
    pub fn kinds_in_category(&self, category: BlockCategory) -> Vec<Arc<BlockKind>> {
        let mut found: Vec<_> = self
            .kinds
            .read()
            .values()
            .filter(|k| k.category == category)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found
    }

    /// Search kinds by query string
    ///
    /// Searches in id, tooltip and display template (case-insensitive).
    pub fn search(&self, query: &str) -> Vec<Arc<BlockKind>> {
        let query = query.to_lowercase();
        let mut found: Vec<_> = self
            .kinds
            .read()
            .values()
            .filter(|k| {
                k.id.to_lowercase().contains(&query)
                    || k.tooltip.to_lowercase().contains(&query)
                    || k.display.to_lowercase().contains(&query)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found
    }

    /// Get the number of registered kinds
    pub fn count(&self) -> usize {
        self.kinds.read().len()
    }

    /// Check if a kind with the given id exists
    pub fn contains(&self, id: &str) -> bool {
        self.kinds.read().contains_key(id)
    }

    /// Clear all registered kinds
    pub fn clear(&self) {
        self.kinds.write().clear();
    }
}

/// Registry error types
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Kind definition is inconsistent
    #[error("Invalid block kind: {0}")]
    InvalidDefinition(String),

    /// Kind definitions could not be parsed
    #[error("Malformed kind definitions: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::socket::{OutputType, Socket};

    fn statement_kind(id: &str) -> BlockKind {
        BlockKind::builder(id)
            .socket(Socket::text("NAME", "x"))
            .statement()
            .category(BlockCategory::Functions)
            .tooltip(format!("{} tooltip", id))
            .build()
    }

    #[test]
    fn test_registry_creation() {
        let registry = KindRegistry::new();
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_kind_registration() {
        let registry = KindRegistry::new();
        registry.register(vec![statement_kind("a"), statement_kind("b")]);
        assert_eq!(registry.count(), 2);
        assert!(registry.lookup("a").is_some());
    }

    #[test]
    fn test_reregistration_overwrites() {
        let registry = KindRegistry::new();
        registry.register(vec![statement_kind("a")]);

        let replacement = BlockKind::builder("a").output(OutputType::Number).build();
        registry.register(vec![replacement]);

        assert_eq!(registry.count(), 1);
        let kind = registry.lookup("a").unwrap();
        assert_eq!(kind.output, Some(OutputType::Number));
        assert!(!kind.previous_statement);
    }

    #[test]
    fn test_unknown_lookup_is_absent() {
        let registry = KindRegistry::new();
        assert!(registry.lookup("nope").is_none());
        assert!(!registry.contains("nope"));
    }

    #[test]
    fn test_invalid_kind_is_skipped() {
        let registry = KindRegistry::new();
        registry.register(vec![BlockKind::builder("").build(), statement_kind("ok")]);
        assert_eq!(registry.count(), 1);

        let err = registry.try_register(BlockKind::builder(" ").build());
        assert!(matches!(err, Err(RegistryError::InvalidDefinition(_))));
    }

    #[test]
    fn test_unregister() {
        let registry = KindRegistry::new();
        registry.register(vec![statement_kind("a")]);
        assert!(registry.unregister("a").is_some());
        assert!(registry.unregister("a").is_none());
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_search_and_category() {
        let registry = KindRegistry::new();
        registry.register(vec![
            statement_kind("solidity_function"),
            statement_kind("solidity_modifier"),
            BlockKind::builder("math_number")
                .output(OutputType::Number)
                .category(BlockCategory::MathAndLogic)
                .build(),
        ]);

        let found = registry.search("MODIFIER");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "solidity_modifier");

        let functions = registry.kinds_in_category(BlockCategory::Functions);
        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].id, "solidity_function");
    }

    #[test]
    fn test_register_json() {
        let registry = KindRegistry::new();
        let n = registry
            .register_json(r#"[{"id": "x", "output": "Boolean"}, {"id": "y"}]"#)
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(registry.lookup("x").unwrap().output, Some(OutputType::Boolean));

        assert!(matches!(
            registry.register_json("not json"),
            Err(RegistryError::Parse(_))
        ));
    }

    #[test]
    fn test_clones_share_state() {
        let registry = KindRegistry::new();
        let clone = registry.clone();
        clone.register(vec![statement_kind("shared")]);
        assert!(registry.contains("shared"));
        registry.clear();
        assert_eq!(clone.count(), 0);
    }
}
