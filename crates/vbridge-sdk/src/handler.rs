//! Method table — name-addressable foreign-callable functions
//!
//! Holds the wrappers a component exposes under its `methods` slot. One
//! entry per name: registering a name again replaces the previous wrapper.

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::context::ForeignFn;

/// Table of foreign-callable functions indexed by method name.
#[derive(Default, Clone)]
pub struct MethodTable {
    handlers: FxHashMap<String, ForeignFn>,
}

impl MethodTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function under `name`, replacing any previous entry
    pub fn register(&mut self, name: &str, handler: ForeignFn) {
        if self.handlers.insert(name.to_string(), handler).is_some() {
            warn!(method = name, "replaced existing method table entry");
        }
    }

    /// Get a handler by name
    pub fn get(&self, name: &str) -> Option<ForeignFn> {
        self.handlers.get(name).cloned()
    }

    /// Check if a handler is registered
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Iterate over entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ForeignFn)> {
        let mut entries: Vec<(&str, &ForeignFn)> =
            self.handlers.iter().map(|(name, f)| (name.as_str(), f)).collect();
        entries.sort_unstable_by_key(|(name, _)| *name);
        entries.into_iter()
    }

    /// Get the number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodTable")
            .field("names", &self.names())
            .finish()
    }
}
