//! Chunking passes over classified elements.
//!
//! Data flows strictly forward:
//!
//! ```text
//! Elements -> assemble | to_markup -> Segments -> window -> Windows
//! ```
//!
//! Every pass is a single deterministic traversal with its own local
//! accumulator, so independent documents can be processed in parallel
//! (see [`assemble_batch`] and [`markup_batch`]).

mod aggregate;
mod assembler;
mod grouping;
mod json;
mod markup;
mod options;
mod stats;
mod window;

pub use aggregate::MetadataAggregator;
pub use assembler::{assemble, ChunkAssembler};
pub use json::{elements_from_json, segments_from_json, to_json, JsonFormat};
pub use markup::{tag_for, to_markup, MarkupFormatter};
pub use options::{ChunkOptions, MetadataOverlap, WindowOptions};
pub use stats::ChunkStats;
pub use window::{window, TokenWindowChunker, SOURCE_TYPE};

use crate::model::{Element, Segment};
use rayon::prelude::*;

/// Split segments into `(text, tables)`, preserving order within each.
pub fn split_by_kind(segments: Vec<Segment>) -> (Vec<Segment>, Vec<Segment>) {
    segments.into_iter().partition(|s| !s.is_table())
}

/// Assemble several documents in parallel.
pub fn assemble_batch(documents: &[Vec<Element>], options: &ChunkOptions) -> Vec<Vec<Segment>> {
    let assembler = ChunkAssembler::new(options.clone());
    documents
        .par_iter()
        .map(|elements| assembler.assemble(elements))
        .collect()
}

/// Format several documents as markup in parallel.
pub fn markup_batch(documents: &[Vec<Element>], options: &ChunkOptions) -> Vec<Vec<Segment>> {
    let formatter = MarkupFormatter::new(options.clone());
    documents
        .par_iter()
        .map(|elements| formatter.format(elements))
        .collect()
}
