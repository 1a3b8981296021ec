//! Graph building - turns a parsed tree into an arena of schema nodes.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::SchemaError;
use crate::extract;
use crate::pool::{DocumentRegistry, RefPool};
use crate::types::{json_type_name, DocId, Link, NodeId, NodeRef, SchemaNode, ROOT_REF};

/// Output of one document build.
#[derive(Debug)]
pub(crate) struct BuiltGraph {
    pub nodes: Vec<SchemaNode>,
    pub pool: RefPool,
    pub root: NodeId,
}

/// Build the graph of one document.
///
/// Declared ids are written to `registry` as they are met. Only a root that
/// is not an object is fatal; malformed nested containers are dropped with a
/// warning and the rest of the document still builds.
pub(crate) fn build_document(
    doc: DocId,
    data: &Value,
    registry: &mut DocumentRegistry,
) -> Result<BuiltGraph, SchemaError> {
    if !data.is_object() {
        return Err(SchemaError::MalformedRoot {
            actual: json_type_name(data).to_string(),
        });
    }

    let mut builder = GraphBuilder {
        doc,
        nodes: Vec::new(),
        pool: RefPool::new(),
        registry,
    };
    let root = builder.build(data, ROOT_REF.to_string(), None);
    debug!(
        doc = doc.index(),
        nodes = builder.nodes.len(),
        "built schema document"
    );

    Ok(BuiltGraph {
        nodes: builder.nodes,
        pool: builder.pool,
        root,
    })
}

struct GraphBuilder<'r> {
    doc: DocId,
    nodes: Vec<SchemaNode>,
    pool: RefPool,
    registry: &'r mut DocumentRegistry,
}

impl GraphBuilder<'_> {
    /// Build one node and its subtree. `data` must be an object.
    fn build(&mut self, data: &Value, current_ref: String, parent: Option<NodeId>) -> NodeId {
        // Reserve the slot first so children can name their parent.
        let id = NodeId(self.nodes.len());
        self.nodes.push(SchemaNode::default());

        let schema_type = extract::string(data, "type");
        let mut node = SchemaNode {
            id: extract::string(data, "id"),
            title: extract::string(data, "title"),
            description: extract::string(data, "description"),
            format: extract::string(data, "format"),
            example: extract::value(data, "example", &schema_type),
            reference: Some(extract::string(data, "$ref")).filter(|r| !r.is_empty()),
            schema_type,
            current_ref,
            parent,
            ..SchemaNode::default()
        };

        if !node.id.is_empty() {
            let at = NodeRef { doc: self.doc, node: id };
            if let Some(previous) = self.registry.register(node.id.clone(), at) {
                warn!(
                    id = %node.id,
                    previous_doc = previous.doc.index(),
                    "document id declared twice, last one wins"
                );
            }
            debug!(id = %node.id, path = %node.current_ref, "registered document id");
        }

        let path = node.current_ref.clone();
        node.properties = self.build_members(data.get("properties"), id, &path, "properties");
        node.definitions = self.build_members(data.get("definitions"), id, &path, "definitions");
        node.links = self.build_links(data.get("links"), id, &path);
        node.items = self.build_items(data.get("items"), id, &path);

        // Register last: every descendant is already in the pool.
        self.nodes[id.0] = node;
        self.pool.set(path, id);
        id
    }

    /// Build a child node, skipping values that are not objects.
    fn build_child(&mut self, data: &Value, path: String, parent: NodeId) -> Option<NodeId> {
        if !data.is_object() {
            warn!(
                path = %path,
                actual = json_type_name(data),
                "skipping schema that is not an object"
            );
            return None;
        }
        Some(self.build(data, path, Some(parent)))
    }

    fn build_members(
        &mut self,
        data: Option<&Value>,
        parent: NodeId,
        parent_ref: &str,
        keyword: &str,
    ) -> IndexMap<String, NodeId> {
        let mut members = IndexMap::new();
        let Some(data) = data else {
            return members;
        };
        let Some(map) = data.as_object() else {
            warn!(
                path = %parent_ref,
                keyword,
                actual = json_type_name(data),
                "skipping malformed container: expected object"
            );
            return members;
        };

        for (name, member) in map {
            let path = format!("{}/{}/{}", parent_ref, keyword, name);
            if let Some(child) = self.build_child(member, path, parent) {
                members.insert(name.clone(), child);
            }
        }
        members
    }

    fn build_items(
        &mut self,
        data: Option<&Value>,
        parent: NodeId,
        parent_ref: &str,
    ) -> Vec<NodeId> {
        let Some(data) = data else {
            return Vec::new();
        };
        let path = format!("{}/items", parent_ref);
        self.build_child(data, path, parent).into_iter().collect()
    }

    fn build_links(&mut self, data: Option<&Value>, owner: NodeId, owner_ref: &str) -> Vec<Link> {
        let Some(data) = data else {
            return Vec::new();
        };
        let Some(entries) = data.as_array() else {
            warn!(
                path = %owner_ref,
                actual = json_type_name(data),
                "skipping malformed links: expected array"
            );
            return Vec::new();
        };

        let mut links = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if !entry.is_object() {
                warn!(
                    path = %owner_ref,
                    index = i,
                    actual = json_type_name(entry),
                    "skipping malformed link: expected object"
                );
                continue;
            }

            let schema = self.build_link_schema(entry, "schema", i, owner, owner_ref);
            let target_schema = self.build_link_schema(entry, "targetSchema", i, owner, owner_ref);

            links.push(Link {
                title: extract::string(entry, "title"),
                description: extract::string(entry, "description"),
                href: extract::string(entry, "href"),
                method: extract::string(entry, "method"),
                rel: extract::string(entry, "rel"),
                enc_type: extract::string(entry, "encType"),
                schema,
                target_schema,
            });
        }
        links
    }

    /// A link without its own schema points back at the enclosing node.
    fn build_link_schema(
        &mut self,
        link: &Value,
        keyword: &str,
        index: usize,
        owner: NodeId,
        owner_ref: &str,
    ) -> NodeId {
        match link.get(keyword) {
            Some(data) => {
                let path = format!("{}/links[{}]/{}", owner_ref, index, keyword);
                self.build_child(data, path, owner).unwrap_or(owner)
            }
            None => owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(data: Value) -> (BuiltGraph, DocumentRegistry) {
        let mut registry = DocumentRegistry::new();
        let graph = build_document(DocId(0), &data, &mut registry).unwrap();
        (graph, registry)
    }

    fn node_at<'g>(graph: &'g BuiltGraph, path: &str) -> &'g SchemaNode {
        let id = graph.pool.get(path).unwrap();
        &graph.nodes[id.0]
    }

    #[test]
    fn root_must_be_object() {
        let mut registry = DocumentRegistry::new();
        let result = build_document(DocId(0), &json!(["not", "a", "map"]), &mut registry);
        assert!(matches!(
            result,
            Err(SchemaError::MalformedRoot { actual }) if actual == "array"
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn scalar_metadata() {
        let (graph, _) = build(json!({
            "title": "user",
            "description": "a user",
            "type": ["object"],
            "format": "custom",
            "$ref": "other.json"
        }));
        let root = &graph.nodes[graph.root.0];
        assert_eq!(root.title, "user");
        assert_eq!(root.description, "a user");
        assert_eq!(root.schema_type, "object");
        assert_eq!(root.format, "custom");
        assert_eq!(root.reference.as_deref(), Some("other.json"));
        assert_eq!(root.current_ref, "#");
        assert!(root.parent.is_none());
    }

    #[test]
    fn empty_ref_is_no_ref() {
        let (graph, _) = build(json!({ "$ref": "" }));
        assert!(graph.nodes[graph.root.0].reference.is_none());
    }

    #[test]
    fn every_node_lands_in_pool() {
        let (graph, _) = build(json!({
            "definitions": {
                "age": { "type": "integer", "example": 16 }
            },
            "properties": {
                "age": { "$ref": "#/definitions/age" },
                "tags": { "type": "array", "items": { "type": "string" } }
            },
            "links": [
                { "href": "/users", "schema": { "properties": {} } },
                { "href": "/users/{id}", "targetSchema": { "type": "object" } }
            ]
        }));

        assert_eq!(
            graph.pool.keys(),
            vec![
                "#",
                "#/definitions/age",
                "#/links[0]/schema",
                "#/links[1]/targetSchema",
                "#/properties/age",
                "#/properties/tags",
                "#/properties/tags/items",
            ]
        );
        assert_eq!(graph.pool.len(), graph.nodes.len());
        assert_eq!(graph.pool.get("#"), Some(graph.root));
    }

    #[test]
    fn children_know_parent_and_path() {
        let (graph, _) = build(json!({
            "properties": { "name": { "type": "string" } }
        }));
        let name = node_at(&graph, "#/properties/name");
        assert_eq!(name.parent, Some(graph.root));
        assert_eq!(name.current_ref, "#/properties/name");
        assert_eq!(
            graph.nodes[graph.root.0].properties["name"],
            graph.pool.get("#/properties/name").unwrap()
        );
    }

    #[test]
    fn example_typed_by_own_type() {
        let (graph, _) = build(json!({
            "definitions": {
                "id": { "type": "string", "example": 1 },
                "age": { "type": "integer", "example": 16 },
                "none": { "type": "integer" }
            }
        }));
        assert_eq!(node_at(&graph, "#/definitions/id").example, json!("1"));
        assert_eq!(node_at(&graph, "#/definitions/age").example, json!(16));
        assert_eq!(node_at(&graph, "#/definitions/none").example, json!(""));
    }

    #[test]
    fn ids_are_registered() {
        let (graph, registry) = build(json!({
            "id": "user",
            "definitions": { "inner": { "id": "inner-doc" } }
        }));
        assert_eq!(
            registry.get("user"),
            Some(NodeRef {
                doc: DocId(0),
                node: graph.root
            })
        );
        assert_eq!(
            registry.get("inner-doc").map(|r| r.node),
            graph.pool.get("#/definitions/inner")
        );
    }

    #[test]
    fn links_default_to_enclosing_node() {
        let (graph, _) = build(json!({
            "links": [
                {
                    "title": "List",
                    "href": "/users",
                    "method": "GET",
                    "rel": "instances",
                    "encType": "application/x-www-form-urlencoded"
                },
                {
                    "title": "Create",
                    "method": "POST",
                    "schema": { "properties": {} }
                }
            ]
        }));
        let root = &graph.nodes[graph.root.0];
        assert_eq!(root.links.len(), 2);

        let list = &root.links[0];
        assert_eq!(list.title, "List");
        assert_eq!(list.href, "/users");
        assert_eq!(list.rel, "instances");
        assert_eq!(list.enc_type, "application/x-www-form-urlencoded");
        assert_eq!(list.schema, graph.root);
        assert_eq!(list.target_schema, graph.root);

        let create = &root.links[1];
        assert_eq!(create.schema, graph.pool.get("#/links[1]/schema").unwrap());
        assert_eq!(create.target_schema, graph.root);
    }

    #[test]
    fn malformed_links_do_not_abort() {
        let (graph, _) = build(json!({
            "links": { "not": "a list" },
            "definitions": { "age": { "example": 16 } },
            "properties": { "age": { "$ref": "#/definitions/age" } }
        }));
        let root = &graph.nodes[graph.root.0];
        assert!(root.links.is_empty());
        assert_eq!(root.properties.len(), 1);
        assert_eq!(root.definitions.len(), 1);
    }

    #[test]
    fn malformed_link_entry_is_skipped() {
        let (graph, _) = build(json!({
            "links": ["oops", { "title": "Info" }]
        }));
        let root = &graph.nodes[graph.root.0];
        assert_eq!(root.links.len(), 1);
        assert_eq!(root.links[0].title, "Info");
    }

    #[test]
    fn malformed_members_are_dropped() {
        let (graph, _) = build(json!({
            "properties": ["id", "name"],
            "definitions": { "ok": { "type": "string" }, "bad": 42 },
            "items": "string"
        }));
        let root = &graph.nodes[graph.root.0];
        assert!(root.properties.is_empty());
        assert_eq!(root.definitions.keys().collect::<Vec<_>>(), vec!["ok"]);
        assert!(root.items.is_empty());
    }

    #[test]
    fn properties_keep_document_order() {
        let (graph, _) = build(json!({
            "properties": { "zeta": {}, "alpha": {}, "mid": {} }
        }));
        let names: Vec<_> = graph.nodes[graph.root.0].properties.keys().cloned().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }
}
