//! Swagger 2.0 projection of a loaded session.
//!
//! Every document root with an `id` becomes a definition named after the id
//! (first letter upper-cased), and every link becomes an operation under its
//! `href`.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::config::Meta;
use crate::schema::{LinkDescription, Schema};
use crate::session::Session;
use crate::types::Method;

const SWAGGER_VERSION: &str = "2.0";
const JSON_MEDIA_TYPE: &str = "application/json";

/// Settings for the generated document header.
#[derive(Debug, Clone)]
pub struct SwaggerOptions {
    pub title: String,
    pub version: String,
    pub description: String,
    pub base_url: String,
    pub produces: Vec<String>,
}

impl SwaggerOptions {
    pub fn new(title: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: "1.0.0".to_string(),
            description: String::new(),
            base_url: base_url.into(),
            produces: vec![JSON_MEDIA_TYPE.to_string()],
        }
    }

    /// Header settings taken from the run's [`Meta`].
    pub fn from_meta(meta: &Meta) -> Self {
        Self {
            title: meta.title.clone(),
            version: meta.version.clone(),
            description: meta.description.clone(),
            base_url: meta.base_url.clone(),
            produces: vec![meta.content_type.clone()],
        }
    }

    /// Set the API version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Split `base_url` into scheme, host and base path.
    fn endpoint(&self) -> (Vec<String>, String, String) {
        match url::Url::parse(&self.base_url) {
            Ok(url) => {
                let host = match (url.host_str(), url.port()) {
                    (Some(host), Some(port)) => format!("{}:{}", host, port),
                    (Some(host), None) => host.to_string(),
                    (None, _) => String::new(),
                };
                let path = url.path().trim_end_matches('/').to_string();
                (vec![url.scheme().to_string()], host, path)
            }
            Err(e) => {
                warn!(base_url = %self.base_url, error = %e, "cannot parse base URL");
                (Vec::new(), String::new(), String::new())
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SwaggerDocument {
    pub swagger: String,
    pub info: Info,
    pub host: String,
    #[serde(rename = "basePath", skip_serializing_if = "String::is_empty")]
    pub base_path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    pub paths: IndexMap<String, PathItem>,
    pub definitions: IndexMap<String, Definition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
}

impl PathItem {
    fn slot(&mut self, method: Method) -> &mut Option<Operation> {
        match method {
            Method::Get => &mut self.get,
            Method::Put => &mut self.put,
            Method::Post => &mut self.post,
            Method::Delete => &mut self.delete,
            Method::Patch => &mut self.patch,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Operation {
    pub summary: String,
    pub description: String,
    #[serde(rename = "operationId")]
    pub operation_id: String,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub responses: IndexMap<String, Response>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    #[serde(rename = "in")]
    pub location: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub required: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Definition {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: IndexMap<String, PropertyDefinition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyDefinition {
    pub description: String,
    /// Pretty-printed JSON of the synthesized example.
    pub example: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Value>,
}

/// Project every document root of `session` into one Swagger document.
pub fn convert(session: &Session, options: &SwaggerOptions) -> SwaggerDocument {
    let (schemes, host, base_path) = options.endpoint();
    let mut doc = SwaggerDocument {
        swagger: SWAGGER_VERSION.to_string(),
        info: Info {
            title: options.title.clone(),
            version: options.version.clone(),
            description: options.description.clone(),
        },
        host,
        base_path,
        schemes,
        produces: options.produces.clone(),
        paths: IndexMap::new(),
        definitions: IndexMap::new(),
    };

    for root in session.roots() {
        let Some(resource) = resource_name(root.id()) else {
            warn!(
                source = ?root.document().source(),
                "skipping document without id"
            );
            continue;
        };

        doc.definitions.insert(resource.clone(), definition(root));

        for link in root.links() {
            let Some(method) = Method::parse(link.method()) else {
                warn!(
                    method = link.method(),
                    href = link.href(),
                    "skipping link with unsupported method"
                );
                continue;
            };
            let operation = operation(&link, method, &resource);
            let item = doc.paths.entry(link.href().to_string()).or_default();
            *item.slot(method) = Some(operation);
        }
    }

    doc
}

/// Definition name for a document id: the id with its first letter upper-cased.
pub fn resource_name(id: &str) -> Option<String> {
    let mut chars = id.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

fn definition(root: Schema<'_>) -> Definition {
    let properties = root
        .properties()
        .map(|(name, property)| {
            let example = property.example_value();
            let kind = match &example {
                Value::Number(_) => "integer",
                Value::Array(_) => "array",
                _ => "string",
            };
            let items = (kind == "array").then(|| json!({ "type": "string" }));
            (
                name.to_string(),
                PropertyDefinition {
                    description: property.resolve_description().to_string(),
                    example: serde_json::to_string_pretty(&example).unwrap_or_default(),
                    kind: kind.to_string(),
                    items,
                },
            )
        })
        .collect();

    Definition {
        kind: "object".to_string(),
        properties,
    }
}

fn operation(link: &LinkDescription<'_>, method: Method, resource: &str) -> Operation {
    let (status, response_schema) = match method {
        Method::Get => (
            "200",
            Some(json!({ "example": link.target_schema().example_json() })),
        ),
        Method::Post => ("201", None),
        Method::Put | Method::Delete => ("200", None),
        Method::Patch => ("203", None),
    };

    let parameters = if method.has_body() {
        vec![Parameter {
            location: "body".to_string(),
            name: "body".to_string(),
            description: link.description().to_string(),
            required: false,
            param_type: None,
            schema: Some(json!({ "$ref": format!("#/definitions/{}", resource) })),
        }]
    } else {
        link.schema()
            .properties()
            .map(|(name, property)| parameter(link.href(), name, property))
            .collect()
    };

    let mut responses = IndexMap::new();
    responses.insert(
        status.to_string(),
        Response {
            description: link.description().to_string(),
            schema: response_schema,
        },
    );

    Operation {
        summary: link.title().to_string(),
        description: link.description().to_string(),
        operation_id: format!("{}-{}-{}", link.method(), resource, link.title()),
        consumes: vec![JSON_MEDIA_TYPE.to_string()],
        produces: vec![JSON_MEDIA_TYPE.to_string()],
        parameters,
        responses,
    }
}

/// Query parameter for a bodiless method, promoted to a required path
/// parameter when the href has a `{name}` placeholder.
fn parameter(href: &str, name: &str, property: Schema<'_>) -> Parameter {
    let in_path = href.contains(&format!("{{{}}}", name));
    let param_type = if in_path {
        match property.resolve_type() {
            "" => "string",
            t => t,
        }
    } else {
        "string"
    };

    Parameter {
        location: if in_path { "path" } else { "query" }.to_string(),
        name: name.to_string(),
        description: property.resolve_description().to_string(),
        required: in_path,
        param_type: Some(param_type.to_string()),
        schema: None,
    }
}
