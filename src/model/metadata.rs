//! Per-element metadata records, before aggregation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One metadata record per source element, keyed by field name.
///
/// Records keep list values intact so the aggregator can decide whether to
/// flatten them or treat the joined list as a single candidate.
pub type MetadataRecord = BTreeMap<String, MetadataValue>;

/// A single metadata value before aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// A scalar value, stringified
    Scalar(String),
    /// An ordered list of values
    List(Vec<String>),
}

impl MetadataValue {
    /// Create a scalar value.
    pub fn scalar(value: impl Into<String>) -> Self {
        MetadataValue::Scalar(value.into())
    }

    /// Create a list value.
    pub fn list<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        MetadataValue::List(values.into_iter().map(Into::into).collect())
    }

    /// Convert an extractor-supplied JSON value.
    ///
    /// `null` is treated as absent. Non-string scalars and nested objects are
    /// stringified; `null` entries inside arrays are dropped.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Array(items) => Some(MetadataValue::List(
                items.iter().filter_map(json_scalar).collect(),
            )),
            other => json_scalar(other).map(MetadataValue::Scalar),
        }
    }

    /// All values as a flat collection.
    pub fn values(&self) -> &[String] {
        match self {
            MetadataValue::Scalar(s) => std::slice::from_ref(s),
            MetadataValue::List(items) => items,
        }
    }

    /// The value as one comma-joined candidate string.
    pub fn joined(&self) -> String {
        match self {
            MetadataValue::Scalar(s) => s.clone(),
            MetadataValue::List(items) => items.join(","),
        }
    }

    /// Check if the value carries nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            MetadataValue::Scalar(s) => s.is_empty(),
            MetadataValue::List(items) => items.is_empty(),
        }
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Scalar(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Scalar(value.to_string())
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(values: Vec<String>) -> Self {
        MetadataValue::List(values)
    }
}

fn json_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
