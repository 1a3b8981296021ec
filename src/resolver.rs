//! Reference resolution - follows `$ref` strings within and across documents.
//!
//! Supported reference forms:
//!
//! | Reference | Target |
//! |-----------|--------|
//! | `#` | root of the owning document |
//! | `#/definitions/age` | node built at that path in the owning document |
//! | `user.json` | root of the document registered as `user` |
//! | `user.json#/definitions/age` | node built at that path in document `user` |
//!
//! Failing lookups yield `None` (or an empty string for the derived
//! accessors); they never raise.

use tracing::debug;

use crate::schema::Schema;
use crate::session::Session;
use crate::types::{DocId, NodeRef, ROOT_REF};

/// Split a reference into target document id and local pointer.
///
/// A reference names another document when a `.` occurs before the first
/// `#` (and not at position 0): the text before that `.` is the document id
/// (usually a file stem) and the pointer is everything from the first `#`,
/// or `#` when there is none. Otherwise the whole reference is a pointer into
/// the owning document and `owning_id` is returned unchanged.
pub fn parse_reference<'a>(owning_id: &'a str, reference: &'a str) -> (&'a str, &'a str) {
    let hash = reference.find('#');
    let dot = reference.find('.').filter(|&n| n > 0);

    match (dot, hash) {
        (Some(dot), Some(hash)) if dot < hash => (&reference[..dot], &reference[hash..]),
        (Some(dot), None) => (&reference[..dot], ROOT_REF),
        _ => (owning_id, reference),
    }
}

impl Session {
    /// Resolve `reference` as seen from document `doc`.
    ///
    /// A reference to another registered document is looked up in that
    /// document's pool; anything else (including an unknown document id) is
    /// looked up in the pool of `doc`.
    pub fn resolve(&self, doc: DocId, reference: &str) -> Option<Schema<'_>> {
        let owning = self.document(doc)?;
        let (target_id, pointer) = parse_reference(owning.id(), reference);

        let pool_doc = match self.registry().get(target_id) {
            Some(at) if target_id != owning.id() => at.doc,
            _ => doc,
        };

        let found = self
            .document(pool_doc)
            .and_then(|d| d.pool().get(pointer))
            .map(|node| self.schema(NodeRef { doc: pool_doc, node }));
        if found.is_none() {
            debug!(reference, doc = doc.index(), "reference not found");
        }
        found
    }
}

impl<'s> Schema<'s> {
    /// Resolve `reference` from this node's document.
    pub fn resolve(&self, reference: &str) -> Option<Schema<'s>> {
        self.session().resolve(self.doc_id(), reference)
    }

    /// The node this one designates: itself without a `$ref`, the
    /// resolved target otherwise.
    pub fn alias(&self) -> Option<Schema<'s>> {
        match self.reference() {
            None => Some(*self),
            Some(reference) => self.resolve(reference),
        }
    }

    /// `type` of the aliased node, empty if resolution fails.
    pub fn resolve_type(&self) -> &'s str {
        self.alias().map(|s| s.schema_type()).unwrap_or_default()
    }

    /// `format` of the aliased node, empty if resolution fails.
    pub fn resolve_format(&self) -> &'s str {
        self.alias().map(|s| s.format()).unwrap_or_default()
    }

    /// `description` of the aliased node, empty if resolution fails.
    pub fn resolve_description(&self) -> &'s str {
        self.alias().map(|s| s.description()).unwrap_or_default()
    }
}
