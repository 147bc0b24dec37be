//! Element grouping state machine shared by the plain and markup passes.

use crate::model::{Element, ElementKind, MetadataRecord, Segment};
use unicode_normalization::UnicodeNormalization;

use super::{ChunkOptions, MetadataAggregator};

/// Rendering hooks for one grouping pass.
pub(crate) trait ElementRenderer {
    /// Aggregator for text segment metadata.
    fn aggregator(&self) -> &MetadataAggregator;

    /// Buffer text for the element opening a heading run.
    fn heading_start(&self, element: &Element, text: &str) -> String;

    /// Buffer text for a heading continuing the current run.
    fn heading(&self, element: &Element, text: &str) -> String;

    /// Buffer text for a narrative, list, image, caption or formula element.
    fn body(&self, element: &Element, text: &str) -> String;

    /// Standalone segment for a table element.
    fn table(&self, element: &Element, source_index: usize) -> Segment;
}

/// Group elements into segments in a single forward pass.
///
/// A heading run starts a new chunk and is never split. Tables flush the
/// pending chunk and become standalone segments. Whitespace-only chunks are
/// discarded.
pub(crate) fn group<R: ElementRenderer>(
    elements: &[Element],
    renderer: &R,
    options: &ChunkOptions,
) -> Vec<Segment> {
    let mut buffer = ChunkBuffer::new(renderer.aggregator());
    let mut i = 0;

    while i < elements.len() {
        let element = &elements[i];
        match element.kind {
            ElementKind::Title | ElementKind::Header => {
                buffer.flush();
                let text = prepare_text(&element.text, options.normalize_unicode);
                buffer.push(
                    renderer.heading_start(element, &text),
                    element.metadata_record(i),
                );
                i += 1;

                while let Some(next) = elements.get(i).filter(|e| e.kind.is_heading()) {
                    let text = prepare_text(&next.text, options.normalize_unicode);
                    buffer.push(renderer.heading(next, &text), next.metadata_record(i));
                    i += 1;
                }
                continue;
            }
            ElementKind::NarrativeText
            | ElementKind::Text
            | ElementKind::ListItem
            | ElementKind::Image
            | ElementKind::FigureCaption
            | ElementKind::Formula => {
                let text = prepare_text(&element.text, options.normalize_unicode);
                buffer.push(renderer.body(element, &text), element.metadata_record(i));
            }
            ElementKind::Table => {
                buffer.flush();
                buffer.emit(renderer.table(element, i));
            }
            ElementKind::Other(ref name) => {
                log::debug!("Skipping element #{} of unrecognised kind {}", i, name);
            }
        }
        i += 1;
    }

    buffer.flush();
    buffer.into_segments()
}

/// Trim element text, optionally normalizing it to NFC first.
pub(crate) fn prepare_text(text: &str, normalize_unicode: bool) -> String {
    if normalize_unicode {
        text.nfc().collect::<String>().trim().to_string()
    } else {
        text.trim().to_string()
    }
}

/// Pending chunk text and the metadata records of its elements.
struct ChunkBuffer<'a> {
    aggregator: &'a MetadataAggregator,
    text: String,
    records: Vec<MetadataRecord>,
    segments: Vec<Segment>,
}

impl<'a> ChunkBuffer<'a> {
    fn new(aggregator: &'a MetadataAggregator) -> Self {
        Self {
            aggregator,
            text: String::new(),
            records: Vec::new(),
            segments: Vec::new(),
        }
    }

    fn push(&mut self, text: String, record: MetadataRecord) {
        self.text.push_str(&text);
        self.records.push(record);
    }

    fn emit(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    fn flush(&mut self) {
        let content = self.text.trim();
        if content.is_empty() {
            if !self.records.is_empty() {
                log::debug!(
                    "Discarding whitespace-only chunk of {} elements",
                    self.records.len()
                );
            }
        } else {
            let metadata = self.aggregator.aggregate(&self.records);
            self.segments.push(Segment::text(content, metadata));
        }
        self.text.clear();
        self.records.clear();
    }

    fn into_segments(self) -> Vec<Segment> {
        self.segments
    }
}
