//! Load sessions - the owner of every document loaded in one run.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::builder::build_document;
use crate::error::{LoadError, SchemaError};
use crate::loader::{self, Format};
use crate::pool::{DocumentRegistry, RefPool};
use crate::schema::Schema;
use crate::types::{DocId, NodeId, NodeRef, SchemaNode};

/// One built document: its raw tree, node arena and reference pool.
#[derive(Debug)]
pub struct Document {
    source: Option<PathBuf>,
    raw: Value,
    nodes: Vec<SchemaNode>,
    pool: RefPool,
    root: NodeId,
}

impl Document {
    /// File the document was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The parsed tree the graph was built from.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Id declared by the root node, empty when none.
    pub fn id(&self) -> &str {
        &self.nodes[self.root.0].id
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn pool(&self) -> &RefPool {
        &self.pool
    }

    pub fn nodes(&self) -> &[SchemaNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&SchemaNode> {
        self.nodes.get(id.0)
    }

    /// Pretty-printed JSON rendering of the raw tree.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.raw)
    }
}

/// Outcome of loading a directory.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<(PathBuf, DocId)>,
    /// Files that could not be loaded, with the reason. They do not stop the walk.
    pub skipped: Vec<(PathBuf, LoadError)>,
}

/// Every document of one run together with the document registry.
///
/// Loading takes `&mut self` and resolution borrows the session immutably,
/// so a reference can only be resolved once every document it may point
/// into has been registered.
#[derive(Debug, Default)]
pub struct Session {
    documents: Vec<Document>,
    registry: DocumentRegistry,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from an already parsed tree.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::MalformedRoot` if `raw` is not an object.
    pub fn load_value(&mut self, raw: Value) -> Result<DocId, SchemaError> {
        self.insert(raw, None)
    }

    /// Parse and build a document from a string.
    pub fn load_str(&mut self, content: &str, format: Format) -> Result<DocId, LoadError> {
        let raw = loader::parse_str(content, format)?;
        Ok(self.insert(raw, None)?)
    }

    /// Read, parse and build a document from a file. The format follows the
    /// file extension.
    pub fn load_file(&mut self, path: &Path) -> Result<DocId, LoadError> {
        let raw = loader::load_tree(path)?;
        Ok(self.insert(raw, Some(path.to_path_buf()))?)
    }

    /// Load every file under `dir`, in file name order.
    ///
    /// Per-file failures (unsupported extension, parse errors, malformed
    /// roots) are collected in the report instead of aborting the walk.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::NotADirectory` if `dir` is not a directory.
    pub fn load_dir(&mut self, dir: &Path) -> Result<LoadReport, LoadError> {
        let mut report = LoadReport::default();
        for path in loader::collect_files(dir)? {
            match self.load_file(&path) {
                Ok(doc) => report.loaded.push((path, doc)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping file");
                    report.skipped.push((path, e));
                }
            }
        }
        Ok(report)
    }

    fn insert(&mut self, raw: Value, source: Option<PathBuf>) -> Result<DocId, SchemaError> {
        let doc = DocId(self.documents.len());
        let graph = build_document(doc, &raw, &mut self.registry)?;
        debug!(
            doc = doc.index(),
            source = ?source,
            refs = graph.pool.len(),
            "loaded document"
        );
        self.documents.push(Document {
            source,
            raw,
            nodes: graph.nodes,
            pool: graph.pool,
            root: graph.root,
        });
        Ok(doc)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn document(&self, doc: DocId) -> Option<&Document> {
        self.documents.get(doc.0)
    }

    pub fn documents(&self) -> impl Iterator<Item = (DocId, &Document)> {
        self.documents.iter().enumerate().map(|(i, d)| (DocId(i), d))
    }

    pub fn registry(&self) -> &DocumentRegistry {
        &self.registry
    }

    /// Root node of a document.
    pub fn root(&self, doc: DocId) -> Option<Schema<'_>> {
        let document = self.document(doc)?;
        Some(self.schema(NodeRef {
            doc,
            node: document.root,
        }))
    }

    /// Root nodes of all documents, in load order.
    pub fn roots(&self) -> impl Iterator<Item = Schema<'_>> {
        self.documents().map(move |(doc, document)| {
            self.schema(NodeRef {
                doc,
                node: document.root,
            })
        })
    }

    /// Node registered at `path` in the reference pool of `doc`.
    pub fn get_pool(&self, doc: DocId, path: &str) -> Option<Schema<'_>> {
        let node = self.document(doc)?.pool.get(path)?;
        Some(self.schema(NodeRef { doc, node }))
    }

    /// Node that declared the document id `id`.
    pub fn lookup_id(&self, id: &str) -> Option<Schema<'_>> {
        self.registry.get(id).map(|at| self.schema(at))
    }

    pub(crate) fn schema(&self, at: NodeRef) -> Schema<'_> {
        Schema::new(self, at)
    }

    /// Document behind an id minted by this session.
    pub(crate) fn doc(&self, doc: DocId) -> &Document {
        &self.documents[doc.0]
    }

    /// Node behind a reference minted by this session.
    pub(crate) fn node(&self, at: NodeRef) -> &SchemaNode {
        &self.doc(at.doc).nodes[at.node.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn load_value_builds_root() {
        let mut session = Session::new();
        let doc = session
            .load_value(json!({ "id": "user", "title": "user" }))
            .unwrap();

        let root = session.root(doc).unwrap();
        assert_eq!(root.title(), "user");
        assert_eq!(session.document(doc).unwrap().id(), "user");
        assert_eq!(session.lookup_id("user"), Some(root));
        assert_eq!(session.get_pool(doc, "#"), Some(root));
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn malformed_root_is_not_stored() {
        let mut session = Session::new();
        let result = session.load_value(json!("just a string"));
        assert!(matches!(result, Err(SchemaError::MalformedRoot { .. })));
        assert!(session.is_empty());
    }

    #[test]
    fn get_pool_missing_path() {
        let mut session = Session::new();
        let doc = session.load_value(json!({ "definitions": {} })).unwrap();
        assert!(session.get_pool(doc, "#/definitions/missing").is_none());
        assert!(session.get_pool(DocId(7), "#").is_none());
    }

    #[test]
    fn load_str_yaml() {
        let mut session = Session::new();
        let doc = session
            .load_str("id: user\ntype: object\n", Format::Yaml)
            .unwrap();
        assert_eq!(session.root(doc).unwrap().schema_type(), "object");
    }

    #[test]
    fn to_json_round_trips() {
        let raw = json!({
            "id": "user",
            "properties": { "age": { "type": "integer", "example": 16 } }
        });
        let mut session = Session::new();
        let doc = session.load_value(raw.clone()).unwrap();

        let bytes = session.document(doc).unwrap().to_json().unwrap();
        let parsed: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, raw);
    }

    #[test]
    fn load_dir_reports_skipped_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"{"id": "a"}"#).unwrap();
        fs::write(dir.path().join("b.yml"), "id: b\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        fs::write(dir.path().join("list.json"), "[1, 2]").unwrap();

        let mut session = Session::new();
        let report = session.load_dir(dir.path()).unwrap();

        assert_eq!(report.loaded.len(), 2);
        assert_eq!(report.skipped.len(), 2);
        assert!(report
            .skipped
            .iter()
            .any(|(_, e)| matches!(e, LoadError::UnsupportedFormat { .. })));
        assert!(report
            .skipped
            .iter()
            .any(|(_, e)| matches!(e, LoadError::Schema(SchemaError::MalformedRoot { .. }))));
        assert!(session.lookup_id("a").is_some());
        assert!(session.lookup_id("b").is_some());
    }

    #[test]
    fn load_dir_requires_directory() {
        let mut session = Session::new();
        let result = session.load_dir(Path::new("/nonexistent/schemas"));
        assert!(matches!(result, Err(LoadError::NotADirectory { .. })));
    }
}
