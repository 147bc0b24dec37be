//! Token-count-bounded re-windowing of segments.

use crate::error::Result;
use crate::model::{MetadataRecord, Segment, Window};

use super::{MetadataAggregator, MetadataOverlap, WindowOptions};

/// Metadata key injected into every window.
pub const SOURCE_TYPE: &str = "source_type";

/// Re-slice segments into token windows.
///
/// Fails with [`crate::Error::InvalidConfig`] when the options are invalid.
pub fn window(segments: &[Segment], options: &WindowOptions) -> Result<Vec<Window>> {
    let chunker = TokenWindowChunker::new(options.clone())?;
    Ok(chunker.window(segments))
}

/// Token window chunker.
///
/// Segments are appended whole. When the next segment would push the
/// running token count past the capacity, the current window is closed and
/// the next one is seeded with the last `overlap` tokens. A segment that is
/// larger than the capacity on its own is never split, so its window
/// exceeds the capacity.
#[derive(Debug, Clone)]
pub struct TokenWindowChunker {
    options: WindowOptions,
    aggregator: MetadataAggregator,
}

impl TokenWindowChunker {
    /// Create a chunker, validating the options.
    pub fn new(options: WindowOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            aggregator: MetadataAggregator::generalized(),
        })
    }

    /// Get the options.
    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    /// Re-slice segments into windows, in order.
    pub fn window(&self, segments: &[Segment]) -> Vec<Window> {
        let mut windows = Vec::new();
        let mut acc = Accumulator::default();

        for (index, segment) in segments.iter().enumerate() {
            let tokens: Vec<&str> = segment.tokens().collect();

            if acc.len() + tokens.len() > self.options.capacity && !acc.is_empty() {
                windows.push(self.close(&acc));
                acc = self.seed(&acc);
            }

            acc.push(index, tokens, segment.metadata_record());
        }

        if !acc.is_empty() {
            windows.push(self.close(&acc));
        }

        windows
    }

    fn close(&self, acc: &Accumulator<'_>) -> Window {
        if acc.len() > self.options.capacity {
            log::debug!(
                "Window of {} tokens exceeds capacity {}",
                acc.len(),
                self.options.capacity
            );
        }

        let mut metadata = self
            .aggregator
            .aggregate(acc.records.iter().map(|(_, record)| record));
        metadata.insert(SOURCE_TYPE.into(), "text".into());

        Segment::text(acc.tokens.join(" "), metadata)
    }

    fn seed<'a>(&self, closed: &Accumulator<'a>) -> Accumulator<'a> {
        let overlap = self.options.overlap;
        if overlap == 0 {
            return Accumulator::default();
        }

        let start = closed.tokens.len().saturating_sub(overlap);
        let tokens = closed.tokens[start..].to_vec();
        let origins = closed.origins[start..].to_vec();

        let records = match self.options.metadata_overlap {
            MetadataOverlap::Records => {
                let start = closed.records.len().saturating_sub(overlap);
                closed.records[start..].to_vec()
            }
            MetadataOverlap::TokenAligned => match origins.first() {
                Some(&first) => closed
                    .records
                    .iter()
                    .filter(|(index, _)| *index >= first)
                    .cloned()
                    .collect(),
                None => Vec::new(),
            },
        };

        Accumulator {
            tokens,
            origins,
            records,
        }
    }
}

/// Tokens of the open window, the segment each token came from, and the
/// metadata records carried by the window.
#[derive(Debug, Default)]
struct Accumulator<'a> {
    tokens: Vec<&'a str>,
    origins: Vec<usize>,
    records: Vec<(usize, MetadataRecord)>,
}

impl<'a> Accumulator<'a> {
    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn push(&mut self, index: usize, tokens: Vec<&'a str>, record: MetadataRecord) {
        self.origins.extend(std::iter::repeat(index).take(tokens.len()));
        self.tokens.extend(tokens);
        self.records.push((index, record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::SegmentMetadata;

    fn segment(text: &str, page: &str) -> Segment {
        let mut metadata = SegmentMetadata::new();
        metadata.insert("page_number".into(), page.into());
        Segment::text(text, metadata)
    }

    fn options(capacity: usize, overlap: usize) -> WindowOptions {
        WindowOptions::new()
            .with_capacity(capacity)
            .with_overlap(overlap)
    }

    #[test]
    fn test_overlap_seeds_next_window() {
        let segments = vec![segment("a b c", "1"), segment("d e f g", "2")];
        let windows = window(&segments, &options(5, 2)).unwrap();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].text, "a b c");
        assert_eq!(windows[1].text, "b c d e f g");
        assert_eq!(windows[1].token_count(), 6);
        assert!(windows.iter().all(|w| w.metadata[SOURCE_TYPE] == "text"));
    }

    #[test]
    fn test_no_overlap() {
        let segments = vec![segment("a b c", "1"), segment("d e f g", "2")];
        let windows = window(&segments, &options(5, 0)).unwrap();

        assert_eq!(windows[0].text, "a b c");
        assert_eq!(windows[1].text, "d e f g");
        assert_eq!(windows[0].metadata["page_number"], "1");
        assert_eq!(windows[1].metadata["page_number"], "2");
    }

    #[test]
    fn test_segments_merge_until_capacity() {
        let segments = vec![
            segment("a b", "1"),
            segment("c d", "2"),
            segment("e", "3"),
            segment("f g", "4"),
        ];
        let windows = window(&segments, &options(5, 0)).unwrap();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].text, "a b c d e");
        assert_eq!(windows[0].metadata["page_number"], "1,2,3");
        assert_eq!(windows[1].text, "f g");
    }

    #[test]
    fn test_oversized_segment_not_split() {
        let segments = vec![segment("a b c d e f g h", "1")];
        let windows = window(&segments, &options(3, 1)).unwrap();

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].token_count(), 8);
    }

    #[test]
    fn test_oversized_segment_after_content() {
        let segments = vec![segment("a", "1"), segment("b c d e f g", "2")];
        let windows = window(&segments, &options(3, 0)).unwrap();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].text, "a");
        assert_eq!(windows[1].text, "b c d e f g");
    }

    #[test]
    fn test_record_overlap_counts_entries() {
        // The overlap of 2 tokens comes from one segment, but two records
        // are carried.
        let segments = vec![
            segment("a", "1"),
            segment("b c", "2"),
            segment("d e f", "3"),
        ];
        let windows = window(&segments, &options(4, 2)).unwrap();

        assert_eq!(windows[1].text, "b c d e f");
        assert_eq!(windows[1].metadata["page_number"], "1,2,3");
    }

    #[test]
    fn test_token_aligned_overlap() {
        let segments = vec![
            segment("a", "1"),
            segment("b c", "2"),
            segment("d e f", "3"),
        ];
        let options = options(4, 2).with_metadata_overlap(MetadataOverlap::TokenAligned);
        let windows = window(&segments, &options).unwrap();

        assert_eq!(windows[1].text, "b c d e f");
        assert_eq!(windows[1].metadata["page_number"], "2,3");
    }

    #[test]
    fn test_source_type_overrides_aggregated_value() {
        let mut metadata = SegmentMetadata::new();
        metadata.insert(SOURCE_TYPE.into(), "table".into());
        let segments = vec![Segment::text("a b", metadata)];

        let windows = window(&segments, &options(5, 0)).unwrap();
        assert_eq!(windows[0].metadata[SOURCE_TYPE], "text");
    }

    #[test]
    fn test_empty_segments() {
        assert!(window(&[], &options(5, 2)).unwrap().is_empty());

        let blank = vec![segment("   ", "1")];
        assert!(window(&blank, &options(5, 2)).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_options_rejected() {
        assert!(matches!(
            TokenWindowChunker::new(options(0, 0)),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            window(&[], &options(3, 3)),
            Err(Error::InvalidConfig(_))
        ));
    }
}
