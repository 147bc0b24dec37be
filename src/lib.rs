//! # docseg
//!
//! Segmentation and chunking of classified document elements.
//!
//! This library takes the ordered element stream produced by a structural
//! extractor (titles, headers, narrative text, list items, images,
//! captions, formulas, tables) and groups it into segments suitable for
//! summarization, embedding and retrieval.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docseg::{chunk, load_elements};
//!
//! fn main() -> docseg::Result<()> {
//!     let elements = load_elements("elements.json")?;
//!
//!     // Plain segments, newline-joined
//!     let segments = chunk::assemble(&elements, &chunk::ChunkOptions::default());
//!
//!     // Token windows of at most 500 tokens with 50 tokens of overlap
//!     let options = chunk::WindowOptions::new().with_capacity(500).with_overlap(50);
//!     let windows = chunk::window(&segments, &options)?;
//!     println!("{} segments, {} windows", segments.len(), windows.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Heading-aware grouping**: runs of titles and headers open a chunk and
//!   are never split
//! - **Standalone tables**: every table becomes its own segment holding its HTML
//! - **Markup rendering**: `<NT>text</NT>[P3]` tags with page annotations
//! - **Token windows**: capacity-bounded re-windowing with overlap
//! - **Parallel batches**: independent documents are processed with Rayon

pub mod chunk;
pub mod error;
pub mod model;
pub mod pipeline;

// Re-export commonly used types
pub use chunk::{
    ChunkAssembler, ChunkOptions, ChunkStats, JsonFormat, MarkupFormatter, MetadataAggregator,
    MetadataOverlap, TokenWindowChunker, WindowOptions,
};
pub use error::{Error, Result};
pub use model::{
    Element, ElementKind, ElementMetadata, MetadataRecord, MetadataValue, Segment, SegmentKind,
    SegmentMetadata, Window,
};
pub use pipeline::{IndexDocument, Summarizer, SummaryOptions, VectorStoreBuilder};

use std::path::Path;

/// Load an extractor's element list from a JSON file.
///
/// # Example
///
/// ```no_run
/// use docseg::load_elements;
///
/// let elements = load_elements("elements.json").unwrap();
/// println!("Elements: {}", elements.len());
/// ```
pub fn load_elements<P: AsRef<Path>>(path: P) -> Result<Vec<Element>> {
    let json = std::fs::read_to_string(path)?;
    chunk::elements_from_json(&json)
}

/// Load a segment list from a JSON file.
pub fn load_segments<P: AsRef<Path>>(path: P) -> Result<Vec<Segment>> {
    let json = std::fs::read_to_string(path)?;
    chunk::segments_from_json(&json)
}

/// Load elements from a JSON file and group them into plain segments.
///
/// # Example
///
/// ```no_run
/// use docseg::chunk_file;
///
/// for segment in chunk_file("elements.json").unwrap() {
///     println!("[{}] {}", segment.kind.as_str(), segment.text);
/// }
/// ```
pub fn chunk_file<P: AsRef<Path>>(path: P) -> Result<Vec<Segment>> {
    let elements = load_elements(path)?;
    Ok(chunk::assemble(&elements, &ChunkOptions::default()))
}

/// Load elements from a JSON file and group them into tagged segments.
pub fn markup_file<P: AsRef<Path>>(path: P) -> Result<Vec<Segment>> {
    let elements = load_elements(path)?;
    Ok(chunk::to_markup(&elements, &ChunkOptions::default()))
}

/// Builder for running the chunking passes over a document.
///
/// # Example
///
/// ```
/// use docseg::{Element, Segmenter};
///
/// let elements = vec![
///     Element::title("Results").with_page(1),
///     Element::narrative("Revenue grew by ten percent.").with_page(1),
/// ];
///
/// let result = Segmenter::new()
///     .markup()
///     .with_window(4, 1)
///     .process(&elements)?;
///
/// assert_eq!(result.segments.len(), 1);
/// assert!(result.windows.len() >= 1);
/// # Ok::<(), docseg::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    chunk_options: ChunkOptions,
    window_options: Option<WindowOptions>,
    markup: bool,
}

impl Segmenter {
    /// Create a new segmenter builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render tagged markup segments instead of plain ones.
    pub fn markup(mut self) -> Self {
        self.markup = true;
        self
    }

    /// Set chunk options.
    pub fn with_chunk_options(mut self, options: ChunkOptions) -> Self {
        self.chunk_options = options;
        self
    }

    /// Keep an extra field on plain text segments.
    pub fn with_metadata_field(mut self, field: impl Into<String>) -> Self {
        self.chunk_options = self.chunk_options.with_metadata_field(field);
        self
    }

    /// NFC-normalize element text.
    pub fn with_unicode_normalization(mut self) -> Self {
        self.chunk_options = self.chunk_options.with_unicode_normalization(true);
        self
    }

    /// Re-window text segments with the given capacity and overlap.
    pub fn with_window(mut self, capacity: usize, overlap: usize) -> Self {
        let options = self
            .window_options
            .take()
            .unwrap_or_default()
            .with_capacity(capacity)
            .with_overlap(overlap);
        self.window_options = Some(options);
        self
    }

    /// Set window options.
    pub fn with_window_options(mut self, options: WindowOptions) -> Self {
        self.window_options = Some(options);
        self
    }

    /// Run the passes over a document.
    ///
    /// Windows are built from text segments only; tables stay standalone.
    pub fn process(&self, elements: &[Element]) -> Result<SegmenterResult> {
        let chunker = self
            .window_options
            .clone()
            .map(TokenWindowChunker::new)
            .transpose()?;

        let segments = if self.markup {
            MarkupFormatter::new(self.chunk_options.clone()).format(elements)
        } else {
            ChunkAssembler::new(self.chunk_options.clone()).assemble(elements)
        };

        let mut stats = ChunkStats::new();
        stats.count_elements(elements);
        stats.count_segments(&segments);

        let windows = match chunker {
            Some(chunker) => {
                let text: Vec<Segment> = segments.iter().filter(|s| !s.is_table()).cloned().collect();
                let windows = chunker.window(&text);
                stats.count_windows(&windows, chunker.options().capacity);
                windows
            }
            None => Vec::new(),
        };

        Ok(SegmenterResult {
            segments,
            windows,
            stats,
        })
    }

    /// Load a JSON element file and run the passes over it.
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> Result<SegmenterResult> {
        let elements = load_elements(path)?;
        self.process(&elements)
    }
}

/// Result of running a [`Segmenter`].
#[derive(Debug, Clone)]
pub struct SegmenterResult {
    /// Segments in source order
    pub segments: Vec<Segment>,

    /// Windows over the text segments (empty unless windowing was enabled)
    pub windows: Vec<Window>,

    /// Counts collected during the run
    stats: ChunkStats,
}

impl SegmenterResult {
    /// Text segments, in order.
    pub fn text_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| !s.is_table())
    }

    /// Table segments, in order.
    pub fn table_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_table())
    }

    /// Counts collected during the run.
    pub fn stats(&self) -> &ChunkStats {
        &self.stats
    }

    /// Segments as JSON.
    pub fn segments_json(&self, format: JsonFormat) -> Result<String> {
        chunk::to_json(&self.segments, format)
    }

    /// Windows as JSON.
    pub fn windows_json(&self, format: JsonFormat) -> Result<String> {
        chunk::to_json(&self.windows, format)
    }
}
