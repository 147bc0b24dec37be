//! Chunking and windowing options.

use crate::error::{Error, Result};
use crate::model::LANGUAGES;

/// Options for the element grouping passes.
#[derive(Debug, Clone)]
pub struct ChunkOptions {
    /// Fields kept by the restricted aggregator on text segments
    pub metadata_fields: Vec<String>,

    /// NFC-normalize element text before rendering
    pub normalize_unicode: bool,
}

impl ChunkOptions {
    /// Create new chunk options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the restricted aggregator's field allow-list.
    pub fn with_metadata_fields<S: Into<String>>(
        mut self,
        fields: impl IntoIterator<Item = S>,
    ) -> Self {
        self.metadata_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Add a field to the restricted aggregator's allow-list.
    pub fn with_metadata_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.metadata_fields.contains(&field) {
            self.metadata_fields.push(field);
        }
        self
    }

    /// Enable or disable Unicode normalization.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            metadata_fields: vec![LANGUAGES.to_string()],
            normalize_unicode: false,
        }
    }
}

/// How metadata follows the token overlap into the next window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetadataOverlap {
    /// Carry the last `overlap` metadata records, regardless of how many
    /// segments the overlap tokens came from
    #[default]
    Records,
    /// Carry the records of exactly the segments that contributed overlap
    /// tokens
    TokenAligned,
}

/// Options for the token window pass.
#[derive(Debug, Clone)]
pub struct WindowOptions {
    /// Maximum tokens per window (single oversized segments excepted)
    pub capacity: usize,

    /// Tokens repeated from the end of the previous window
    pub overlap: usize,

    /// Metadata overlap policy
    pub metadata_overlap: MetadataOverlap,
}

impl WindowOptions {
    /// Create new window options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window capacity in tokens.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the overlap in tokens.
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap;
        self
    }

    /// Set the metadata overlap policy.
    pub fn with_metadata_overlap(mut self, policy: MetadataOverlap) -> Self {
        self.metadata_overlap = policy;
        self
    }

    /// Check that capacity is positive and overlap is smaller than it.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidConfig(
                "window capacity must be greater than zero".into(),
            ));
        }
        if self.overlap >= self.capacity {
            return Err(Error::InvalidConfig(format!(
                "overlap ({}) must be smaller than capacity ({})",
                self.overlap, self.capacity
            )));
        }
        Ok(())
    }
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            capacity: 1000,
            overlap: 100,
            metadata_overlap: MetadataOverlap::Records,
        }
    }
}
