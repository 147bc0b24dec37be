//! Output segments and windows.

use super::{MetadataRecord, MetadataValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated metadata of a segment or window.
pub type SegmentMetadata = BTreeMap<String, String>;

/// A grouped chunk of one or more source elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment kind
    #[serde(rename = "type")]
    pub kind: SegmentKind,

    /// Rendered content
    pub text: String,

    /// Aggregated metadata
    #[serde(default)]
    pub metadata: SegmentMetadata,
}

/// A token-bounded re-slicing of segments.
///
/// Windows share the segment shape and always carry `source_type = "text"`.
pub type Window = Segment;

impl Segment {
    /// Create a text segment.
    pub fn text(text: impl Into<String>, metadata: SegmentMetadata) -> Self {
        Self {
            kind: SegmentKind::Text,
            text: text.into(),
            metadata,
        }
    }

    /// Create a table segment.
    pub fn table(text: impl Into<String>, metadata: SegmentMetadata) -> Self {
        Self {
            kind: SegmentKind::Table,
            text: text.into(),
            metadata,
        }
    }

    /// Check if this is a table segment.
    pub fn is_table(&self) -> bool {
        self.kind == SegmentKind::Table
    }

    /// Whitespace-delimited tokens of the content.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }

    /// Number of whitespace-delimited tokens.
    pub fn token_count(&self) -> usize {
        self.tokens().count()
    }

    /// The aggregated metadata as a record for further aggregation.
    pub fn metadata_record(&self) -> MetadataRecord {
        self.metadata
            .iter()
            .map(|(k, v)| (k.clone(), MetadataValue::scalar(v.as_str())))
            .collect()
    }
}

/// Segment kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Grouped textual content
    Text,
    /// A standalone table
    Table,
}

impl SegmentKind {
    /// Lowercase name as used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::Text => "text",
            SegmentKind::Table => "table",
        }
    }
}
