//! Integration tests for the summarize-and-index pipeline.

use std::fs;
use std::time::Duration;

use docseg::chunk::{self, ChunkOptions};
use docseg::pipeline::{
    index_segments, summarize_segments, MemoryStore, RetrievedDocument, Retriever, SUMMARY,
};
use docseg::{load_elements, Element, Error, Result, Segment, Segmenter, Summarizer, SummaryOptions};

/// Summarizer that returns the first word of each segment.
struct FirstWord;

impl Summarizer for FirstWord {
    fn summarize(&self, text: &str) -> Result<String> {
        text.split_whitespace()
            .next()
            .map(str::to_string)
            .ok_or_else(|| Error::Summarize("nothing to summarize".into()))
    }
}

/// Retriever ranking documents by how many query words their summary holds.
struct KeywordRetriever {
    documents: Vec<RetrievedDocument>,
}

impl Retriever for KeywordRetriever {
    fn query(&self, text: &str) -> Result<Vec<RetrievedDocument>> {
        let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();

        let mut scored: Vec<(usize, &RetrievedDocument)> = self
            .documents
            .iter()
            .map(|doc| {
                let summary = doc.metadata[SUMMARY].to_lowercase();
                let score = words.iter().filter(|w| summary.contains(w.as_str())).count();
                (score, doc)
            })
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(scored.into_iter().map(|(_, doc)| doc.clone()).collect())
    }
}

fn no_delay(label: &str) -> SummaryOptions {
    SummaryOptions::new()
        .with_delay(Duration::ZERO)
        .with_label(label)
}

fn sample_elements() -> Vec<Element> {
    vec![
        Element::title("Revenue").with_page(1).with_languages(["eng"]),
        Element::narrative("Revenue grew by ten percent.").with_page(1),
        Element::table("Q1 10", "<table><tr><td>Q1</td><td>10</td></tr></table>").with_page(2),
        Element::header("Staffing").with_page(3).with_languages(["eng"]),
        Element::narrative("Headcount stayed flat.").with_page(3),
    ]
}

#[test]
fn test_summarize_and_index_text_and_tables() {
    let segments = chunk::assemble(&sample_elements(), &ChunkOptions::default());
    let (text, tables) = chunk::split_by_kind(segments);

    let text_summaries = summarize_segments(&FirstWord, &text, &no_delay("text"));
    let table_summaries = summarize_segments(&FirstWord, &tables, &no_delay("table"));
    assert_eq!(text_summaries, vec!["Revenue", "Staffing"]);
    assert_eq!(table_summaries.len(), 1);

    let mut store = MemoryStore::new();
    assert_eq!(index_segments(&mut store, &text, &text_summaries).unwrap(), 2);
    assert_eq!(index_segments(&mut store, &tables, &table_summaries).unwrap(), 1);
    assert_eq!(store.len(), 3);

    let doc = &store.documents()[0];
    assert_eq!(doc.page_content, "Revenue\nRevenue grew by ten percent.");
    assert_eq!(doc.metadata["languages"], "eng");
    assert_eq!(doc.metadata[SUMMARY], "Revenue");

    let table_doc = &store.documents()[2];
    assert!(table_doc.page_content.starts_with("<table>"));
    assert_eq!(table_doc.metadata["source_index"], "2");
}

#[test]
fn test_failed_summaries_are_indexed_empty() {
    let segments = vec![
        Segment::text("Useful text.", Default::default()),
        Segment::text("   ", Default::default()),
    ];
    let summaries = summarize_segments(&FirstWord, &segments, &no_delay("text"));
    assert_eq!(summaries, vec!["Useful", ""]);

    let mut store = MemoryStore::new();
    index_segments(&mut store, &segments, &summaries).unwrap();
    assert_eq!(store.documents()[1].metadata[SUMMARY], "");
}

#[test]
fn test_closure_summarizer() {
    let summarizer = |text: &str| -> Result<String> { Ok(text.len().to_string()) };
    let segments = vec![Segment::text("abcd", Default::default())];

    let summaries = summarize_segments(&summarizer, &segments, &no_delay("text"));
    assert_eq!(summaries, vec!["4"]);
}

#[test]
fn test_retriever_over_memory_store() {
    let result = Segmenter::new().process(&sample_elements()).unwrap();
    let text: Vec<Segment> = result.text_segments().cloned().collect();
    let summaries = vec![
        "Revenue increased strongly".to_string(),
        "Staffing numbers unchanged".to_string(),
    ];

    let mut store = MemoryStore::new();
    index_segments(&mut store, &text, &summaries).unwrap();

    let retriever = KeywordRetriever {
        documents: store.into_documents().into_iter().map(Into::into).collect(),
    };
    let hits = retriever.query("revenue growth").unwrap();

    assert_eq!(hits.len(), 1);
    assert!(hits[0].text.starts_with("Revenue"));
}

#[test]
fn test_load_elements_from_extractor_json() {
    let json = r#"[
        {"type": "Title", "element_id": "a1", "text": "Overview",
         "metadata": {"page_number": 1, "languages": ["eng"]}},
        {"type": "NarrativeText", "element_id": "a2", "text": "The plan has three phases.",
         "metadata": {"page_number": 1, "languages": ["eng"], "filename": "plan.pdf"}},
        {"type": "PageBreak", "text": "", "metadata": {}},
        {"type": "Table", "element_id": "a3", "text": "Phase Cost",
         "metadata": {"page_number": 2, "text_as_html": "<table><tr><td>Phase</td></tr></table>"}}
    ]"#;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("elements.json");
    fs::write(&path, json).unwrap();

    let elements = load_elements(&path).unwrap();
    assert_eq!(elements.len(), 4);

    let segments = chunk::to_markup(&elements, &ChunkOptions::default());
    assert_eq!(segments.len(), 2);
    assert_eq!(
        segments[0].text,
        "<T>Overview</T>[P1] <NT>The plan has three phases.</NT>[P1]"
    );
    assert_eq!(segments[0].metadata["filename"], "plan.pdf");
    assert_eq!(segments[0].metadata["element_id"], "a1,a2");
    assert_eq!(segments[1].text, "<table><tr><td>Phase</td></tr></table>");
}

#[test]
fn test_load_elements_rejects_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "[{\"type\": ").unwrap();

    assert!(matches!(load_elements(&path), Err(Error::Json(_))));
}

#[cfg(feature = "async")]
mod non_blocking {
    use super::*;
    use docseg::pipeline::{summarize_segments_async, AsyncSummarizer};
    use std::future::Future;

    struct Upper;

    impl AsyncSummarizer for Upper {
        fn summarize(&self, text: &str) -> impl Future<Output = Result<String>> + Send {
            let text = text.to_string();
            async move {
                if text.is_empty() {
                    Err(Error::Summarize("empty".into()))
                } else {
                    Ok(text.to_uppercase())
                }
            }
        }
    }

    #[tokio::test]
    async fn test_async_summaries_in_order() {
        let segments = vec![
            Segment::text("one", Default::default()),
            Segment::text("", Default::default()),
            Segment::text("three", Default::default()),
        ];
        let options = SummaryOptions::new().with_delay(Duration::from_millis(1));

        let summaries = summarize_segments_async(&Upper, &segments, &options).await;
        assert_eq!(summaries, vec!["ONE", "", "THREE"]);
    }
}
