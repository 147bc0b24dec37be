//! Reduction of per-element metadata records into one segment record.

use crate::model::{MetadataRecord, SegmentMetadata};
use std::collections::{BTreeMap, BTreeSet};

/// Aggregates metadata records into a flat string mapping.
///
/// Two modes are supported:
///
/// - **Restricted**: only allow-listed fields are computed. Each record
///   contributes one candidate string per field (a list is comma-joined
///   first); the distinct candidates are sorted and comma-joined. Records
///   `["en"]` and `["en", "fr"]` yield `"en,en,fr"`.
/// - **Generalized**: every key present in any record is computed. Lists
///   are flattened, all values per key deduplicated, sorted and
///   comma-joined. The same records yield `"en,fr"`.
///
/// Output is sorted and therefore independent of record order. Fields that
/// appear in no record are omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataAggregator {
    fields: Option<Vec<String>>,
}

impl MetadataAggregator {
    /// Create a restricted aggregator over the given field allow-list.
    pub fn restricted<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            fields: Some(fields.into_iter().map(Into::into).collect()),
        }
    }

    /// Create a generalized aggregator that keeps every key.
    pub fn generalized() -> Self {
        Self { fields: None }
    }

    /// Check if this aggregator keeps every key.
    pub fn is_generalized(&self) -> bool {
        self.fields.is_none()
    }

    /// Aggregate records in source order.
    pub fn aggregate<'a, I>(&self, records: I) -> SegmentMetadata
    where
        I: IntoIterator<Item = &'a MetadataRecord>,
    {
        match self.fields {
            Some(ref fields) => aggregate_restricted(records, fields),
            None => aggregate_generalized(records),
        }
    }
}

fn aggregate_restricted<'a, I>(records: I, fields: &[String]) -> SegmentMetadata
where
    I: IntoIterator<Item = &'a MetadataRecord>,
{
    let mut candidates: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();

    for record in records {
        for field in fields {
            match record.get(field) {
                Some(value) if !value.is_empty() => {
                    candidates
                        .entry(field.as_str())
                        .or_default()
                        .insert(value.joined());
                }
                _ => {}
            }
        }
    }

    candidates
        .into_iter()
        .map(|(field, values)| (field.to_string(), join_sorted(values)))
        .collect()
}

fn aggregate_generalized<'a, I>(records: I) -> SegmentMetadata
where
    I: IntoIterator<Item = &'a MetadataRecord>,
{
    let mut collected: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for record in records {
        for (key, value) in record {
            collected
                .entry(key.as_str())
                .or_default()
                .extend(value.values().iter().map(String::as_str));
        }
    }

    collected
        .into_iter()
        .map(|(key, values)| (key.to_string(), join_sorted(values)))
        .collect()
}

fn join_sorted<S: AsRef<str>>(values: BTreeSet<S>) -> String {
    values
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}
