//! Schema-less source documents.
//!
//! A [`Record`] keeps fields in the order the source stored them, which is the
//! order the last-resort scan walks. Lookups by name are linear; records hold a
//! handful of fields.

use serde_json::{Map, Value};

/// A single field value inside a [`Record`].
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Scalar string.
    Text(String),
    /// Ordered list. Only `Text` elements are ever considered as candidates.
    List(Vec<FieldValue>),
    /// Embedded sub-document.
    Nested(Record),
    /// Numbers, booleans and nulls. Never a candidate.
    Opaque,
}

impl FieldValue {
    /// Converts a JSON value, preserving nested object field order.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Array(items) => FieldValue::List(items.iter().map(FieldValue::from_json).collect()),
            Value::Object(map) => FieldValue::Nested(Record::from_json_object(map)),
            _ => FieldValue::Opaque,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            FieldValue::Nested(record) => Some(record),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Record> for FieldValue {
    fn from(value: Record) -> Self {
        FieldValue::Nested(value)
    }
}

/// An opaque document from any data source, with fields in storage order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts a field. An existing field keeps its position and gets the new value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Iterates fields in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Converts a JSON object. Field order follows the object's order.
    pub fn from_json_object(map: &Map<String, Value>) -> Self {
        Self {
            fields: map
                .iter()
                .map(|(name, value)| (name.clone(), FieldValue::from_json(value)))
                .collect(),
        }
    }

    /// Converts a JSON value, returning `None` unless it is an object.
    pub fn from_json(value: &Value) -> Option<Self> {
        value.as_object().map(Self::from_json_object)
    }
}
