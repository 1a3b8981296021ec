//! Lookup tables filled while documents are built.

use std::collections::HashMap;

use crate::types::{NodeId, NodeRef};

/// Per-document map from canonical path to the node built at that path.
///
/// Append-only while the document is built, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct RefPool {
    refs: HashMap<String, NodeId>,
}

impl RefPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a path. `None` is an ordinary outcome, not an error.
    pub fn get(&self, path: &str) -> Option<NodeId> {
        self.refs.get(path).copied()
    }

    pub(crate) fn set(&mut self, path: impl Into<String>, node: NodeId) {
        self.refs.insert(path.into(), node);
    }

    /// Registered paths, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.refs.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

/// Session-wide map from declared document id to the node declaring it.
///
/// Ids are not required to be unique: the last registration wins.
#[derive(Debug, Clone, Default)]
pub struct DocumentRegistry {
    ids: HashMap<String, NodeRef>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<NodeRef> {
        self.ids.get(id).copied()
    }

    /// Register `id`, returning the node it previously pointed at.
    pub(crate) fn register(&mut self, id: impl Into<String>, node: NodeRef) -> Option<NodeRef> {
        self.ids.insert(id.into(), node)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
