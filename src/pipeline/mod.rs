//! Downstream collaborators: summarization and indexing.
//!
//! The crate defines only the interfaces and the batch drivers around them;
//! model clients and vector stores are supplied by the caller.

mod index;
mod summarize;

pub use index::{
    index_segments, IndexDocument, MemoryStore, RetrievedDocument, Retriever, VectorStoreBuilder,
    SUMMARY,
};
pub use summarize::{summarize_segments, Summarizer, SummaryOptions};

#[cfg(feature = "async")]
pub use summarize::{summarize_segments_async, AsyncSummarizer};
