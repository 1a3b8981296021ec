//! Core types of the schema graph.

use indexmap::IndexMap;
use serde_json::Value;

/// Canonical path of a document root.
pub const ROOT_REF: &str = "#";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Index of a loaded document inside a [`Session`](crate::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocId(pub(crate) usize);

impl DocId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a node inside its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Session-wide address of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub doc: DocId,
    pub node: NodeId,
}

/// One parsed unit of the schema graph.
///
/// Children are addressed by [`NodeId`] into the owning document's arena, so a
/// node owns its `properties`, `definitions` and `items` without holding
/// pointers. The `$ref` target is never stored; it is looked up on demand.
#[derive(Debug, Clone, Default)]
pub struct SchemaNode {
    pub id: String,
    pub title: String,
    pub description: String,
    pub schema_type: String,
    pub format: String,
    pub example: Value,
    pub definitions: IndexMap<String, NodeId>,
    pub properties: IndexMap<String, NodeId>,
    pub items: Vec<NodeId>,
    pub links: Vec<Link>,
    pub reference: Option<String>,
    /// Path at which the node was built, `#` for the root.
    pub current_ref: String,
    /// Enclosing node. Diagnostic only.
    pub parent: Option<NodeId>,
}

impl SchemaNode {
    /// True when `example` carries something worth returning verbatim.
    ///
    /// Absent examples are stored as `null` or as the empty string, so both
    /// count as blank.
    pub fn has_example(&self) -> bool {
        match &self.example {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }
}

/// An operation attached to a schema (hyper-schema link description).
#[derive(Debug, Clone)]
pub struct Link {
    pub title: String,
    pub description: String,
    pub href: String,
    pub method: String,
    pub rel: String,
    pub enc_type: String,
    /// Request schema. The enclosing node when the link declares none.
    pub schema: NodeId,
    /// Response schema. The enclosing node when the link declares none.
    pub target_schema: NodeId,
}

/// HTTP verbs a link may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    /// Parse a link method, ignoring case.
    ///
    /// Returns `None` for verbs without a documented mapping.
    pub fn parse(s: &str) -> Option<Self> {
        [
            Method::Get,
            Method::Post,
            Method::Put,
            Method::Delete,
            Method::Patch,
        ]
        .into_iter()
        .find(|m| m.as_str().eq_ignore_ascii_case(s))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }

    /// Whether request parameters travel in the body rather than the query.
    pub fn has_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_type_names() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!([1])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }

    #[test]
    fn method_parse_ignores_case() {
        assert_eq!(Method::parse("GET"), Some(Method::Get));
        assert_eq!(Method::parse("Patch"), Some(Method::Patch));
        assert_eq!(Method::parse("delete"), Some(Method::Delete));
        assert_eq!(Method::parse("OPTIONS"), None);
        assert_eq!(Method::parse(""), None);
    }

    #[test]
    fn method_body() {
        assert!(Method::Post.has_body());
        assert!(Method::Patch.has_body());
        assert!(!Method::Get.has_body());
        assert!(!Method::Delete.has_body());
    }

    #[test]
    fn blank_examples() {
        let mut node = SchemaNode::default();
        assert!(!node.has_example());

        node.example = json!("");
        assert!(!node.has_example());

        node.example = json!(0);
        assert!(node.has_example());

        node.example = json!([]);
        assert!(node.has_example());

        node.example = json!(false);
        assert!(node.has_example());
    }
}
