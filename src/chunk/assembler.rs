//! Plain-text chunk assembly.

use crate::model::{Element, Segment, SegmentMetadata};

use super::grouping::{group, ElementRenderer};
use super::{ChunkOptions, MetadataAggregator};

/// Group elements into plain-text and table segments.
pub fn assemble(elements: &[Element], options: &ChunkOptions) -> Vec<Segment> {
    ChunkAssembler::new(options.clone()).assemble(elements)
}

/// Plain-text chunk assembler.
///
/// Text segments join element texts with newlines and carry only the
/// fields in [`ChunkOptions::metadata_fields`]. Table segments hold the
/// table's HTML and `type`, `languages` and `source_index`.
#[derive(Debug, Clone)]
pub struct ChunkAssembler {
    options: ChunkOptions,
    aggregator: MetadataAggregator,
}

impl ChunkAssembler {
    /// Create a new assembler.
    pub fn new(options: ChunkOptions) -> Self {
        let aggregator = MetadataAggregator::restricted(options.metadata_fields.iter().cloned());
        Self {
            options,
            aggregator,
        }
    }

    /// Group elements into segments.
    pub fn assemble(&self, elements: &[Element]) -> Vec<Segment> {
        group(elements, self, &self.options)
    }
}

impl Default for ChunkAssembler {
    fn default() -> Self {
        Self::new(ChunkOptions::default())
    }
}

impl ElementRenderer for ChunkAssembler {
    fn aggregator(&self) -> &MetadataAggregator {
        &self.aggregator
    }

    fn heading_start(&self, _element: &Element, text: &str) -> String {
        format!("\n\n{}\n", text)
    }

    fn heading(&self, _element: &Element, text: &str) -> String {
        format!("{}\n", text)
    }

    fn body(&self, _element: &Element, text: &str) -> String {
        format!("{}\n", text)
    }

    fn table(&self, element: &Element, source_index: usize) -> Segment {
        let html = element.metadata.text_as_html().unwrap_or_default();

        let mut metadata = SegmentMetadata::new();
        metadata.insert("type".into(), element.kind.name().to_string());
        if let Some(languages) = element.metadata.languages() {
            metadata.insert("languages".into(), languages.join(","));
        }
        metadata.insert("source_index".into(), source_index.to_string());

        Segment::table(html, metadata)
    }
}
