//! Per-segment summarization driver.

use crate::error::Result;
use crate::model::Segment;
use std::thread;
use std::time::Duration;

/// A summarization backend, typically a language model client.
pub trait Summarizer: Send + Sync {
    /// Summarize one segment's text.
    fn summarize(&self, text: &str) -> Result<String>;
}

impl<F> Summarizer for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn summarize(&self, text: &str) -> Result<String> {
        self(text)
    }
}

/// Options for a summarization batch.
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    /// Pause between consecutive summarizer calls
    pub delay: Duration,

    /// Label used in log lines (e.g. "text", "table")
    pub label: String,
}

impl SummaryOptions {
    /// Create new summary options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pause between calls.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the log label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(5),
            label: "element".to_string(),
        }
    }
}

/// Summarize segments in order, one call each.
///
/// A failed call is logged and replaced with an empty summary; the batch
/// always returns one summary per segment.
pub fn summarize_segments<S: Summarizer + ?Sized>(
    summarizer: &S,
    segments: &[Segment],
    options: &SummaryOptions,
) -> Vec<String> {
    let mut summaries = Vec::with_capacity(segments.len());

    for (i, segment) in segments.iter().enumerate() {
        if i > 0 && !options.delay.is_zero() {
            thread::sleep(options.delay);
        }
        log::info!("Summarizing {} #{}", options.label, i);
        summaries.push(or_empty(
            summarizer.summarize(&segment.text),
            &options.label,
            i,
        ));
    }

    summaries
}

fn or_empty(result: Result<String>, label: &str, index: usize) -> String {
    match result {
        Ok(summary) => summary,
        Err(e) => {
            log::warn!("Error summarizing {} #{}: {}", label, index, e);
            String::new()
        }
    }
}

#[cfg(feature = "async")]
mod non_blocking {
    use super::{or_empty, SummaryOptions};
    use crate::error::Result;
    use crate::model::Segment;
    use std::future::Future;

    /// An asynchronous summarization backend.
    pub trait AsyncSummarizer: Send + Sync {
        /// Summarize one segment's text.
        fn summarize(&self, text: &str) -> impl Future<Output = Result<String>> + Send;
    }

    /// Summarize segments in order without blocking the runtime between
    /// calls.
    pub async fn summarize_segments_async<S: AsyncSummarizer>(
        summarizer: &S,
        segments: &[Segment],
        options: &SummaryOptions,
    ) -> Vec<String> {
        let mut summaries = Vec::with_capacity(segments.len());

        for (i, segment) in segments.iter().enumerate() {
            if i > 0 && !options.delay.is_zero() {
                tokio::time::sleep(options.delay).await;
            }
            log::info!("Summarizing {} #{}", options.label, i);
            let result = summarizer.summarize(&segment.text).await;
            summaries.push(or_empty(result, &options.label, i));
        }

        summaries
    }
}

#[cfg(feature = "async")]
pub use non_blocking::{summarize_segments_async, AsyncSummarizer};
