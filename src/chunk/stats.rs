//! Chunking statistics.

use crate::model::{Element, ElementKind, Segment, SegmentKind, Window};
use serde::{Deserialize, Serialize};

/// Statistics collected over the inputs and outputs of a chunking run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkStats {
    /// Number of input elements
    pub element_count: u64,

    /// Number of heading (Title/Header) elements
    pub heading_count: u64,

    /// Number of elements of unrecognised kind
    pub skipped_count: u64,

    /// Number of text segments produced
    pub text_segment_count: u64,

    /// Number of table segments produced
    pub table_segment_count: u64,

    /// Total tokens across text segments
    pub token_count: u64,

    /// Number of windows produced
    pub window_count: u64,

    /// Windows larger than the configured capacity
    pub oversized_window_count: u64,
}

impl ChunkStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count input elements.
    pub fn count_elements(&mut self, elements: &[Element]) {
        for element in elements {
            self.element_count += 1;
            match element.kind {
                ElementKind::Title | ElementKind::Header => self.heading_count += 1,
                ElementKind::Other(_) => self.skipped_count += 1,
                _ => {}
            }
        }
    }

    /// Count produced segments.
    pub fn count_segments(&mut self, segments: &[Segment]) {
        for segment in segments {
            match segment.kind {
                SegmentKind::Text => {
                    self.text_segment_count += 1;
                    self.token_count += segment.token_count() as u64;
                }
                SegmentKind::Table => self.table_segment_count += 1,
            }
        }
    }

    /// Count produced windows against the capacity they were built with.
    pub fn count_windows(&mut self, windows: &[Window], capacity: usize) {
        self.window_count += windows.len() as u64;
        self.oversized_window_count += windows
            .iter()
            .filter(|w| w.token_count() > capacity)
            .count() as u64;
    }

    /// Total number of segments.
    pub fn segment_count(&self) -> u64 {
        self.text_segment_count + self.table_segment_count
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ChunkStats) {
        self.element_count += other.element_count;
        self.heading_count += other.heading_count;
        self.skipped_count += other.skipped_count;
        self.text_segment_count += other.text_segment_count;
        self.table_segment_count += other.table_segment_count;
        self.token_count += other.token_count;
        self.window_count += other.window_count;
        self.oversized_window_count += other.oversized_window_count;
    }
}
