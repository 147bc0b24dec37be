//! Vector store and retriever interfaces.
//!
//! Embedding, storage and ranking live outside this crate. These traits
//! describe what the segment pipeline hands to them.

use crate::error::Result;
use crate::model::{Segment, SegmentMetadata};
use serde::{Deserialize, Serialize};

/// Metadata key holding a segment's generated summary.
pub const SUMMARY: &str = "summary";

/// A segment prepared for indexing: its content plus metadata enriched
/// with the generated summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    /// Content to embed
    pub page_content: String,

    /// Segment metadata plus `summary`
    pub metadata: SegmentMetadata,
}

impl IndexDocument {
    /// Build an index document from a segment and its summary.
    pub fn new(segment: &Segment, summary: &str) -> Self {
        let mut metadata = segment.metadata.clone();
        metadata.insert(SUMMARY.into(), summary.to_string());
        Self {
            page_content: segment.text.clone(),
            metadata,
        }
    }
}

/// A document returned by a retriever, best match first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    /// Stored content
    pub text: String,

    /// Stored metadata
    pub metadata: SegmentMetadata,
}

impl From<IndexDocument> for RetrievedDocument {
    fn from(doc: IndexDocument) -> Self {
        Self {
            text: doc.page_content,
            metadata: doc.metadata,
        }
    }
}

/// Builds a queryable store from segments and their summaries.
pub trait VectorStoreBuilder {
    /// Add one segment with its summary.
    fn index(&mut self, segment: &Segment, summary: &str) -> Result<()>;
}

/// Queries a built store.
pub trait Retriever {
    /// Return documents ranked by relevance to `text`.
    fn query(&self, text: &str) -> Result<Vec<RetrievedDocument>>;
}

/// Feed segments and their summaries, paired in order, to a store.
///
/// Pairs stop at the shorter of the two lists. Returns the number of
/// segments indexed.
pub fn index_segments<B: VectorStoreBuilder + ?Sized>(
    builder: &mut B,
    segments: &[Segment],
    summaries: &[String],
) -> Result<usize> {
    if segments.len() != summaries.len() {
        log::warn!(
            "Indexing {} segments with {} summaries; extra entries are ignored",
            segments.len(),
            summaries.len()
        );
    }

    let mut count = 0;
    for (segment, summary) in segments.iter().zip(summaries) {
        builder.index(segment, summary)?;
        count += 1;
    }
    Ok(count)
}

/// In-memory store that collects index documents in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Vec<IndexDocument>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collected documents.
    pub fn documents(&self) -> &[IndexDocument] {
        &self.documents
    }

    /// Number of collected documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Take the collected documents.
    pub fn into_documents(self) -> Vec<IndexDocument> {
        self.documents
    }
}

impl VectorStoreBuilder for MemoryStore {
    fn index(&mut self, segment: &Segment, summary: &str) -> Result<()> {
        self.documents.push(IndexDocument::new(segment, summary));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str) -> Segment {
        let mut metadata = SegmentMetadata::new();
        metadata.insert("languages".into(), "eng".into());
        Segment::text(text, metadata)
    }

    #[test]
    fn test_index_document_adds_summary() {
        let doc = IndexDocument::new(&segment("Revenue grew."), "Growth.");
        assert_eq!(doc.page_content, "Revenue grew.");
        assert_eq!(doc.metadata["languages"], "eng");
        assert_eq!(doc.metadata[SUMMARY], "Growth.");
    }

    #[test]
    fn test_index_segments_pairs_in_order() {
        let segments = vec![segment("a"), segment("b"), segment("c")];
        let summaries = vec!["sa".to_string(), "sb".to_string()];

        let mut store = MemoryStore::new();
        let count = index_segments(&mut store, &segments, &summaries).unwrap();

        assert_eq!(count, 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.documents()[1].page_content, "b");
        assert_eq!(store.documents()[1].metadata[SUMMARY], "sb");
    }

    #[test]
    fn test_retrieved_from_index_document() {
        let retrieved: RetrievedDocument = IndexDocument::new(&segment("x"), "").into();
        assert_eq!(retrieved.text, "x");
        assert_eq!(retrieved.metadata[SUMMARY], "");
    }
}
