//! Data model for element segmentation.
//!
//! Elements come in from an upstream structural extractor; segments and
//! windows go out to summarization and indexing. The model keeps metadata
//! open-ended, since extractors attach heterogeneous keys.

mod element;
mod metadata;
mod segment;

pub use element::{Element, ElementKind, ElementMetadata, LANGUAGES, PAGE_NUMBER, TEXT_AS_HTML};
pub use metadata::{MetadataRecord, MetadataValue};
pub use segment::{Segment, SegmentKind, SegmentMetadata, Window};
