//! Schema Doc
//!
//! Builds a navigable graph from JSON hyper-schema documents, resolves `$ref`
//! pointers within and across documents, and synthesizes example payloads
//! for API documentation.
//!
//! # Example
//!
//! ```
//! use schemadoc::Session;
//! use serde_json::json;
//!
//! let mut session = Session::new();
//! session
//!     .load_value(json!({
//!         "id": "user",
//!         "definitions": { "age": { "type": "integer", "example": 16 } },
//!         "properties": { "age": { "$ref": "#/definitions/age" } }
//!     }))
//!     .unwrap();
//! let article = session
//!     .load_value(json!({
//!         "id": "article",
//!         "properties": { "author": { "$ref": "user.json" } }
//!     }))
//!     .unwrap();
//!
//! let root = session.root(article).unwrap();
//! assert_eq!(root.example_value(), json!({ "author": { "age": 16 } }));
//! ```
//!
//! # Reference Forms
//!
//! | Reference | Target |
//! |-----------|--------|
//! | `#` | root of the owning document |
//! | `#/definitions/age` | node at that path in the owning document |
//! | `user.json` | root of the document whose `id` is `user` |
//! | `user.json#/definitions/age` | node at that path in document `user` |
//!
//! Documents are registered under their `id` as they load, so a cross-document
//! reference resolves once both documents are in the same [`Session`],
//! whatever the load order.

mod builder;
mod config;
mod error;
mod example;
mod extract;
mod loader;
mod pool;
mod render;
mod resolver;
mod schema;
mod session;
mod types;
mod validator;

pub mod scaffold;
pub mod swagger;

pub use config::Meta;
pub use error::{ExampleError, LoadError, SchemaError, ValidateError, Violation};
pub use loader::{collect_files, generate_json, load_tree, parse_str, Format};
pub use pool::{DocumentRegistry, RefPool};
pub use render::{render_text, write_text};
pub use resolver::parse_reference;
pub use schema::{LinkDescription, Schema};
pub use session::{Document, LoadReport, Session};
pub use swagger::{convert, SwaggerDocument, SwaggerOptions};
pub use types::{json_type_name, DocId, Link, Method, NodeId, NodeRef, SchemaNode, ROOT_REF};
pub use validator::{validate_schema, validate_tree, validate_value};
