//! Borrowed views over nodes of a [`Session`].

use std::fmt;

use serde_json::Value;

use crate::session::{Document, Session};
use crate::types::{DocId, Link, NodeId, NodeRef, SchemaNode};

/// A schema node seen through the session that owns it.
///
/// Cheap to copy. Two handles are equal when they designate the same node of
/// the same session.
#[derive(Clone, Copy)]
pub struct Schema<'s> {
    session: &'s Session,
    at: NodeRef,
}

impl<'s> Schema<'s> {
    pub(crate) fn new(session: &'s Session, at: NodeRef) -> Self {
        Self { session, at }
    }

    /// Handle on another node of the same document.
    fn sibling(&self, node: NodeId) -> Schema<'s> {
        Schema::new(
            self.session,
            NodeRef {
                doc: self.at.doc,
                node,
            },
        )
    }

    pub fn session(&self) -> &'s Session {
        self.session
    }

    pub fn node_ref(&self) -> NodeRef {
        self.at
    }

    pub fn doc_id(&self) -> DocId {
        self.at.doc
    }

    /// The document this node was built in.
    pub fn document(&self) -> &'s Document {
        self.session.doc(self.at.doc)
    }

    pub fn node(&self) -> &'s SchemaNode {
        self.session.node(self.at)
    }

    pub fn id(&self) -> &'s str {
        &self.node().id
    }

    pub fn title(&self) -> &'s str {
        &self.node().title
    }

    pub fn description(&self) -> &'s str {
        &self.node().description
    }

    pub fn schema_type(&self) -> &'s str {
        &self.node().schema_type
    }

    pub fn format(&self) -> &'s str {
        &self.node().format
    }

    /// Literal example as declared, possibly blank.
    pub fn example(&self) -> &'s Value {
        &self.node().example
    }

    /// The `$ref` string, if any.
    pub fn reference(&self) -> Option<&'s str> {
        self.node().reference.as_deref()
    }

    pub fn current_ref(&self) -> &'s str {
        &self.node().current_ref
    }

    /// `current_ref` prefixed with the document id, for messages.
    pub fn location(&self) -> String {
        format!("{}{}", self.document().id(), self.current_ref())
    }

    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    /// Enclosing node. Only meant for diagnostics.
    pub fn parent(&self) -> Option<Schema<'s>> {
        self.node().parent.map(|p| self.sibling(p))
    }

    pub fn properties(&self) -> impl Iterator<Item = (&'s str, Schema<'s>)> + 's {
        let this = *self;
        self.node()
            .properties
            .iter()
            .map(move |(name, id)| (name.as_str(), this.sibling(*id)))
    }

    pub fn property(&self, name: &str) -> Option<Schema<'s>> {
        self.node().properties.get(name).map(|id| self.sibling(*id))
    }

    pub fn definitions(&self) -> impl Iterator<Item = (&'s str, Schema<'s>)> + 's {
        let this = *self;
        self.node()
            .definitions
            .iter()
            .map(move |(name, id)| (name.as_str(), this.sibling(*id)))
    }

    pub fn definition(&self, name: &str) -> Option<Schema<'s>> {
        self.node().definitions.get(name).map(|id| self.sibling(*id))
    }

    pub fn items(&self) -> impl Iterator<Item = Schema<'s>> + 's {
        let this = *self;
        self.node().items.iter().map(move |id| this.sibling(*id))
    }

    pub fn links(&self) -> impl Iterator<Item = LinkDescription<'s>> + 's {
        let owner = *self;
        self.node()
            .links
            .iter()
            .map(move |link| LinkDescription { owner, link })
    }
}

impl PartialEq for Schema<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.session, other.session) && self.at == other.at
    }
}

impl Eq for Schema<'_> {}

impl fmt::Debug for Schema<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("doc", &self.at.doc.index())
            .field("current_ref", &self.current_ref())
            .field("id", &self.id())
            .finish()
    }
}

/// A link of a schema, with its request and response schemas resolved to
/// handles.
#[derive(Clone, Copy)]
pub struct LinkDescription<'s> {
    owner: Schema<'s>,
    link: &'s Link,
}

impl<'s> LinkDescription<'s> {
    /// The schema declaring this link.
    pub fn owner(&self) -> Schema<'s> {
        self.owner
    }

    pub fn title(&self) -> &'s str {
        &self.link.title
    }

    pub fn description(&self) -> &'s str {
        &self.link.description
    }

    pub fn href(&self) -> &'s str {
        &self.link.href
    }

    pub fn method(&self) -> &'s str {
        &self.link.method
    }

    pub fn rel(&self) -> &'s str {
        &self.link.rel
    }

    pub fn enc_type(&self) -> &'s str {
        &self.link.enc_type
    }

    /// Request schema; the owner when the link declares none.
    pub fn schema(&self) -> Schema<'s> {
        self.owner.sibling(self.link.schema)
    }

    /// Response schema; the owner when the link declares none.
    pub fn target_schema(&self) -> Schema<'s> {
        self.owner.sibling(self.link.target_schema)
    }
}

impl fmt::Debug for LinkDescription<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkDescription")
            .field("method", &self.method())
            .field("href", &self.href())
            .field("rel", &self.rel())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> (Session, DocId) {
        let mut session = Session::new();
        let doc = session
            .load_value(json!({
                "id": "user",
                "definitions": { "age": { "type": "integer" } },
                "properties": {
                    "age": { "$ref": "#/definitions/age" },
                    "tags": { "type": "array", "items": { "type": "string" } }
                },
                "links": [
                    { "title": "List", "href": "/users", "method": "GET" },
                    { "title": "Create", "method": "POST", "schema": { "properties": {} } }
                ]
            }))
            .unwrap();
        (session, doc)
    }

    #[test]
    fn navigate_children() {
        let (session, doc) = session();
        let root = session.root(doc).unwrap();

        let names: Vec<_> = root.properties().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["age", "tags"]);

        let age = root.property("age").unwrap();
        assert_eq!(age.reference(), Some("#/definitions/age"));
        assert_eq!(age.parent(), Some(root));
        assert!(!age.is_root());
        assert!(root.is_root());

        let tags = root.property("tags").unwrap();
        let item = tags.items().next().unwrap();
        assert_eq!(item.schema_type(), "string");
        assert_eq!(item.current_ref(), "#/properties/tags/items");
        assert_eq!(item.location(), "user#/properties/tags/items");

        assert_eq!(root.definition("age").unwrap().schema_type(), "integer");
        assert!(root.definition("name").is_none());
    }

    #[test]
    fn links_resolve_schemas() {
        let (session, doc) = session();
        let root = session.root(doc).unwrap();
        let links: Vec<_> = root.links().collect();

        assert_eq!(links[0].title(), "List");
        assert_eq!(links[0].schema(), root);
        assert_eq!(links[0].target_schema(), root);
        assert_eq!(links[0].owner(), root);

        assert_ne!(links[1].schema(), root);
        assert_eq!(links[1].schema().current_ref(), "#/links[1]/schema");
        assert_eq!(links[1].target_schema(), root);
    }

    #[test]
    fn equality_is_identity() {
        let (session, doc) = session();
        let a = session.root(doc).unwrap();
        let b = session.get_pool(doc, "#").unwrap();
        assert_eq!(a, b);

        let (other, other_doc) = self::session();
        assert_ne!(a, other.root(other_doc).unwrap());
    }
}
