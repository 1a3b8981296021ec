//! Example synthesis - derives a representative value from a schema node.
//!
//! Rules, in priority order:
//!
//! 1. a non-blank literal `example` is returned verbatim;
//! 2. a `$ref` is resolved and its target synthesized (`null` if it does not resolve);
//! 3. an `array` yields a one-element list built from its first `items` schema
//!    (`[]` when it has none);
//! 4. anything else is an object built from its `properties`, where a property
//!    carrying a `$ref` contributes the example of the resolved node.
//!
//! Reference chains that loop back onto a node already being synthesized are
//! cut: the lenient entry points put `null` in place of the cyclic branch, the
//! checked one fails with [`ExampleError::CyclicReference`].

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::warn;
use url::form_urlencoded;

use crate::error::ExampleError;
use crate::schema::Schema;
use crate::types::NodeRef;

impl<'s> Schema<'s> {
    /// Synthesized example value. Unresolvable or cyclic branches are `null`.
    pub fn example_value(&self) -> Value {
        Synthesizer::new(false).synthesize(*self).unwrap_or(Value::Null)
    }

    /// Synthesized example value, failing on the first cyclic reference.
    ///
    /// # Errors
    ///
    /// Returns `ExampleError::CyclicReference` naming the node reached twice.
    pub fn try_example_value(&self) -> Result<Value, ExampleError> {
        Synthesizer::new(true).synthesize(*self)
    }

    /// Pretty-printed JSON of [`Schema::example_value`].
    pub fn example_json(&self) -> String {
        serde_json::to_string_pretty(&self.example_value()).unwrap_or_default()
    }

    /// `key=value` pairs of the top-level object example, URL-encoded and
    /// sorted by key. Empty when the example is not an object.
    pub fn example_query_pairs(&self) -> Vec<String> {
        let Value::Object(params) = self.example_value() else {
            return Vec::new();
        };

        let sorted: BTreeMap<String, Value> = params.into_iter().collect();
        sorted
            .iter()
            .map(|(key, value)| {
                form_urlencoded::Serializer::new(String::new())
                    .append_pair(key, &query_value(value))
                    .finish()
            })
            .collect()
    }
}

/// Plain-text form of a value inside a query string.
fn query_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

struct Synthesizer {
    /// Nodes currently being synthesized, outermost first.
    stack: Vec<NodeRef>,
    strict: bool,
}

impl Synthesizer {
    fn new(strict: bool) -> Self {
        Self {
            stack: Vec::new(),
            strict,
        }
    }

    fn synthesize(&mut self, schema: Schema<'_>) -> Result<Value, ExampleError> {
        let at = schema.node_ref();
        if self.stack.contains(&at) {
            let path = schema.location();
            if self.strict {
                return Err(ExampleError::CyclicReference { path });
            }
            warn!(path = %path, "cyclic reference, example cut short");
            return Ok(Value::Null);
        }

        self.stack.push(at);
        let value = self.synthesize_node(schema);
        self.stack.pop();
        value
    }

    fn synthesize_node(&mut self, schema: Schema<'_>) -> Result<Value, ExampleError> {
        let node = schema.node();
        if node.has_example() {
            return Ok(node.example.clone());
        }

        if let Some(reference) = schema.reference() {
            return self.synthesize_reference(schema, reference);
        }

        if node.schema_type == "array" {
            let items = match schema.items().next() {
                Some(item) => vec![self.synthesize(item)?],
                None => Vec::new(),
            };
            return Ok(Value::Array(items));
        }

        let mut object = Map::new();
        for (name, property) in schema.properties() {
            let value = match property.reference() {
                Some(reference) => self.synthesize_reference(property, reference)?,
                None => self.synthesize(property)?,
            };
            object.insert(name.to_string(), value);
        }
        Ok(Value::Object(object))
    }

    fn synthesize_reference(
        &mut self,
        from: Schema<'_>,
        reference: &str,
    ) -> Result<Value, ExampleError> {
        match from.resolve(reference) {
            Some(target) => self.synthesize(target),
            None => {
                warn!(
                    path = %from.location(),
                    reference,
                    "unresolved reference, example left empty"
                );
                Ok(Value::Null)
            }
        }
    }
}
