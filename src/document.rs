//! Document - schemaless JSON-object payload with a designated id field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DabError;

/// A schemaless document: a mapping from field name to JSON value.
///
/// The adapter enforces no schema. The only field it ever interprets is the
/// designated identifier field named by the adapter's options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self { fields: Map::new() }
    }

    /// Wrap an existing field map.
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Get a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Set a field value, returning the previous one if any.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    /// The id stored under `id_field`, if present and a string.
    pub fn id(&self, id_field: &str) -> Option<&str> {
        self.fields.get(id_field).and_then(Value::as_str)
    }

    /// Remove the id field, returning the id if it was a string.
    pub fn take_id(&mut self, id_field: &str) -> Option<String> {
        match self.fields.remove(id_field) {
            Some(Value::String(id)) => Some(id),
            _ => None,
        }
    }

    /// Rename the id field from `from` to `to`. No-op when the names
    /// coincide or the source field is absent.
    pub fn alias_id(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        if let Some(id) = self.fields.remove(from) {
            self.fields.insert(to.to_string(), id);
        }
    }

    /// Merge `other` into this document field by field. Fields present in
    /// `other` overwrite; fields absent from `other` are kept.
    pub fn merge(&mut self, other: Document) {
        for (field, value) in other.fields {
            self.fields.insert(field, value);
        }
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consume into the underlying field map.
    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    /// View the underlying field map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl TryFrom<Value> for Document {
    type Error = DabError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Document { fields }),
            _ => Err(DabError::InvalidInput("Require object")),
        }
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Object(doc.fields)
    }
}

/// Decode a JSON array into documents. Fails fast with `InvalidInput` when
/// the value is not an array or any element is not an object.
pub fn documents_from_value(value: Value) -> Result<Vec<Document>, DabError> {
    match value {
        Value::Array(items) => items.into_iter().map(Document::try_from).collect(),
        _ => Err(DabError::InvalidInput("Require array")),
    }
}
