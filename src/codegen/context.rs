//! Run configuration and per-generation context
//!
//! `RunConfig` is what a settings panel edits and keeps between runs.
//! `GenerationContext` is built fresh for each call to
//! [`Generator::generate`](super::generator::Generator::generate) and is
//! consumed by it, so nothing from one run can reach the next.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default SPDX license identifier
pub const DEFAULT_LICENSE: &str = "MIT";
/// Default compiler version constraint
pub const DEFAULT_VERSION: &str = "^0.8.20";
/// Default indentation unit for statement bodies
pub const DEFAULT_INDENT: &str = "    ";

/// One import line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDescriptor {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl ImportDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
        }
    }

    pub fn aliased(path: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: Some(alias.into()),
        }
    }
}

/// Persistent run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    license: String,
    version: String,
    indent: String,
    imports: Vec<ImportDescriptor>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            license: DEFAULT_LICENSE.to_string(),
            version: DEFAULT_VERSION.to_string(),
            indent: DEFAULT_INDENT.to_string(),
            imports: Vec::new(),
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn license(&self) -> &str {
        &self.license
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn indent(&self) -> &str {
        &self.indent
    }

    pub fn imports(&self) -> &[ImportDescriptor] {
        &self.imports
    }

    pub fn set_license(&mut self, license: impl Into<String>) {
        self.license = license.into();
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    pub fn set_indent(&mut self, indent: impl Into<String>) {
        self.indent = indent.into();
    }

    /// Imports for the next generation only
    pub fn set_imports(&mut self, imports: Vec<ImportDescriptor>) {
        self.imports = imports;
    }

    /// Build the context for one run.
    ///
    /// Imports are one-shot: they move into the context and the config is
    /// left with none. License, version and indent persist.
    pub fn take_context(&mut self) -> GenerationContext {
        GenerationContext {
            license: self.license.clone(),
            version: self.version.clone(),
            indent: self.indent.clone(),
            imports: std::mem::take(&mut self.imports),
            names: NameDb::default(),
        }
    }
}

/// State for a single generation run
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub license: String,
    pub version: String,
    pub indent: String,
    pub imports: Vec<ImportDescriptor>,
    pub names: NameDb,
}

impl Default for GenerationContext {
    fn default() -> Self {
        RunConfig::default().take_context()
    }
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = license.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_imports(mut self, imports: Vec<ImportDescriptor>) -> Self {
        self.imports = imports;
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }
}

/// Names handed out during one run
#[derive(Debug, Clone, Default)]
pub struct NameDb {
    used: HashSet<String>,
}

impl NameDb {
    /// Reserve `base`, or the first free `base_2`, `base_3`, ...
    pub fn distinct(&mut self, base: &str) -> String {
        let base = if base.is_empty() { "unnamed" } else { base };
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}_{}", base, n);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Record `name` as taken; false when it already was
    pub fn reserve(&mut self, name: &str) -> bool {
        self.used.insert(name.to_string())
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }
}
