//! Tagged, page-annotated chunk rendering.
//!
//! Each textual element is rendered as `<TAG>text</TAG>[Pn]` and elements
//! are joined by single spaces, e.g.
//! `<T>Annual Report</T>[P1] <NT>Revenue grew.</NT>[P2]`. The tags give a
//! downstream language model a hint of each element's role.

use crate::model::{Element, ElementKind, Segment, SegmentMetadata};

use super::grouping::{group, ElementRenderer};
use super::{ChunkOptions, MetadataAggregator};

/// Tag names by element kind.
const TAGS: &[(&str, &str)] = &[
    ("Header", "H"),
    ("Title", "T"),
    ("NarrativeText", "NT"),
    ("Image", "IM"),
    ("Table", "TB"),
    ("Text", "TX"),
    ("ListItem", "LI"),
    ("FigureCaption", "FC"),
    ("Formula", "F"),
];

/// Fields kept on table segments.
const TABLE_FIELDS: &[&str] = &["type", "source_index", "languages", "page_number"];

/// Look up the markup tag for a kind, falling back to the kind's own name.
pub fn tag_for(kind: &ElementKind) -> &str {
    let name = kind.name();
    for (kind_name, tag) in TAGS {
        if *kind_name == name {
            return tag;
        }
    }
    name
}

/// Group elements into tagged segments.
pub fn to_markup(elements: &[Element], options: &ChunkOptions) -> Vec<Segment> {
    MarkupFormatter::new(options.clone()).format(elements)
}

/// Tagged chunk formatter.
///
/// Groups exactly like [`super::ChunkAssembler`], but text segments keep
/// every metadata key (generalized aggregation) and tables keep `type`,
/// `source_index`, `languages` and `page_number`.
#[derive(Debug, Clone)]
pub struct MarkupFormatter {
    options: ChunkOptions,
    aggregator: MetadataAggregator,
}

impl MarkupFormatter {
    /// Create a new formatter.
    pub fn new(options: ChunkOptions) -> Self {
        Self {
            options,
            aggregator: MetadataAggregator::generalized(),
        }
    }

    /// Group elements into tagged segments.
    pub fn format(&self, elements: &[Element]) -> Vec<Segment> {
        group(elements, self, &self.options)
    }

    fn render(&self, element: &Element, text: &str) -> String {
        let tag = tag_for(&element.kind);
        match element.metadata.page_number().filter(|&page| page > 0) {
            Some(page) => format!("<{tag}>{text}</{tag}>[P{page}] "),
            None => format!("<{tag}>{text}</{tag}> "),
        }
    }
}

impl Default for MarkupFormatter {
    fn default() -> Self {
        Self::new(ChunkOptions::default())
    }
}

impl ElementRenderer for MarkupFormatter {
    fn aggregator(&self) -> &MetadataAggregator {
        &self.aggregator
    }

    fn heading_start(&self, element: &Element, text: &str) -> String {
        self.render(element, text)
    }

    fn heading(&self, element: &Element, text: &str) -> String {
        self.render(element, text)
    }

    fn body(&self, element: &Element, text: &str) -> String {
        self.render(element, text)
    }

    fn table(&self, element: &Element, source_index: usize) -> Segment {
        let html = element.metadata.text_as_html().unwrap_or_default();

        let record = element.metadata_record(source_index);
        let metadata: SegmentMetadata = TABLE_FIELDS
            .iter()
            .filter_map(|&field| {
                record
                    .get(field)
                    .map(|value| (field.to_string(), value.joined()))
            })
            .collect();

        Segment::table(html, metadata)
    }
}
