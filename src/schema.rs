//! Schemas (index patterns) the filters are resolved against.

use crate::predicate::FilterPredicate;
use serde::{Deserialize, Serialize};

/// Declared type of a schema field. Drives value formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    String,
    Number,
    Date,
    Boolean,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
}

/// A named set of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSchema {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl IndexSchema {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            field_type,
        });
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Lookup over the schemas currently in view.
pub trait SchemaLookup {
    /// True when no schema is in view.
    fn is_empty(&self) -> bool;

    /// Whether a schema with this id is in view.
    fn contains_schema(&self, id: &str) -> bool;

    /// Whether any schema in view declares the field.
    fn field_exists_in(&self, key: &str) -> bool;

    /// Declared type of the field in the first schema that has it.
    fn field_type(&self, key: &str) -> Option<FieldType>;

    /// A filter is applicable when no schema is in view, when it names no
    /// field, when the schema it was built against is in view, or when its
    /// field exists in any schema.
    fn is_filter_applicable(&self, predicate: &FilterPredicate) -> bool {
        if self.is_empty() || predicate.key.is_empty() {
            return true;
        }
        if let Some(index) = &predicate.index {
            if self.contains_schema(index) {
                return true;
            }
        }
        self.field_exists_in(&predicate.key)
    }
}

impl SchemaLookup for [IndexSchema] {
    fn is_empty(&self) -> bool {
        <[IndexSchema]>::is_empty(self)
    }

    fn contains_schema(&self, id: &str) -> bool {
        self.iter().any(|s| s.id == id)
    }

    fn field_exists_in(&self, key: &str) -> bool {
        self.iter().any(|s| s.field(key).is_some())
    }

    fn field_type(&self, key: &str) -> Option<FieldType> {
        self.iter().find_map(|s| s.field(key)).map(|f| f.field_type)
    }
}

impl SchemaLookup for Vec<IndexSchema> {
    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    fn contains_schema(&self, id: &str) -> bool {
        self.as_slice().contains_schema(id)
    }

    fn field_exists_in(&self, key: &str) -> bool {
        self.as_slice().field_exists_in(key)
    }

    fn field_type(&self, key: &str) -> Option<FieldType> {
        self.as_slice().field_type(key)
    }
}
