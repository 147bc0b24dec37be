//! Classified content elements produced by an upstream extractor.

use super::{MetadataRecord, MetadataValue};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Metadata key holding a table's HTML rendering.
pub const TEXT_AS_HTML: &str = "text_as_html";

/// Metadata key holding the 1-indexed source page.
pub const PAGE_NUMBER: &str = "page_number";

/// Metadata key holding the detected languages.
pub const LANGUAGES: &str = "languages";

/// A single classified content unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Element classification
    #[serde(rename = "type")]
    pub kind: ElementKind,

    /// Extractor-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,

    /// Text payload (may be empty)
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,

    /// Open-ended metadata supplied by the extractor
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: ElementMetadata,
}

/// Deserialize a field where `null` means the same as missing.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Element {
    /// Create a new element with no metadata.
    pub fn new(kind: ElementKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            element_id: None,
            text: text.into(),
            metadata: ElementMetadata::default(),
        }
    }

    /// Create a title element.
    pub fn title(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Title, text)
    }

    /// Create a header element.
    pub fn header(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Header, text)
    }

    /// Create a narrative text element.
    pub fn narrative(text: impl Into<String>) -> Self {
        Self::new(ElementKind::NarrativeText, text)
    }

    /// Create a list item element.
    pub fn list_item(text: impl Into<String>) -> Self {
        Self::new(ElementKind::ListItem, text)
    }

    /// Create a table element with its HTML rendering.
    pub fn table(text: impl Into<String>, html: impl Into<String>) -> Self {
        Self::new(ElementKind::Table, text).with_html(html)
    }

    /// Set the element id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.element_id = Some(id.into());
        self
    }

    /// Set the page number.
    pub fn with_page(mut self, page: u32) -> Self {
        self.metadata.insert(PAGE_NUMBER, Value::from(page));
        self
    }

    /// Set the detected languages.
    pub fn with_languages<S: Into<String>>(mut self, languages: impl IntoIterator<Item = S>) -> Self {
        let languages: Vec<Value> = languages
            .into_iter()
            .map(|l| Value::String(l.into()))
            .collect();
        self.metadata.insert(LANGUAGES, Value::Array(languages));
        self
    }

    /// Set the HTML rendering (used by tables).
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.metadata.insert(TEXT_AS_HTML, Value::String(html.into()));
        self
    }

    /// Set an arbitrary metadata field.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key, value.into());
        self
    }

    /// Build this element's metadata record at the given source position.
    ///
    /// The record holds `type`, `element_id` (when present), `source_index`
    /// and every metadata field except the table HTML. A `languages` field
    /// that is not a list is treated as absent.
    pub fn metadata_record(&self, source_index: usize) -> MetadataRecord {
        let mut record = MetadataRecord::new();
        record.insert("type".into(), MetadataValue::scalar(self.kind.name()));
        if let Some(ref id) = self.element_id {
            record.insert("element_id".into(), MetadataValue::scalar(id.as_str()));
        }
        record.insert(
            "source_index".into(),
            MetadataValue::scalar(source_index.to_string()),
        );

        for (key, value) in self.metadata.iter() {
            match key.as_str() {
                TEXT_AS_HTML => {}
                // Only a list counts as a language list.
                LANGUAGES => {
                    if let Some(languages) = self.metadata.languages() {
                        record
                            .entry(key.clone())
                            .or_insert(MetadataValue::List(languages));
                    }
                }
                _ => {
                    if let Some(value) = MetadataValue::from_json(value) {
                        record.entry(key.clone()).or_insert(value);
                    }
                }
            }
        }
        record
    }
}

/// Element classification.
///
/// Kinds outside the recognised set are kept as [`ElementKind::Other`] so
/// extractor output never fails to load; the grouping passes skip them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    /// Document or section title
    Title,
    /// Page or section header
    Header,
    /// Running prose
    NarrativeText,
    /// Unclassified text
    Text,
    /// Bulleted or numbered list item
    ListItem,
    /// Table (rendered from `text_as_html`)
    Table,
    /// Image (text holds OCR or alt text)
    Image,
    /// Caption attached to a figure
    FigureCaption,
    /// Mathematical formula
    Formula,
    /// Any other extractor kind
    Other(String),
}

impl ElementKind {
    /// The extractor's name for this kind.
    pub fn name(&self) -> &str {
        match self {
            ElementKind::Title => "Title",
            ElementKind::Header => "Header",
            ElementKind::NarrativeText => "NarrativeText",
            ElementKind::Text => "Text",
            ElementKind::ListItem => "ListItem",
            ElementKind::Table => "Table",
            ElementKind::Image => "Image",
            ElementKind::FigureCaption => "FigureCaption",
            ElementKind::Formula => "Formula",
            ElementKind::Other(name) => name,
        }
    }

    /// Check if this kind opens or continues a heading run.
    pub fn is_heading(&self) -> bool {
        matches!(self, ElementKind::Title | ElementKind::Header)
    }
}

impl From<&str> for ElementKind {
    fn from(name: &str) -> Self {
        match name {
            "Title" => ElementKind::Title,
            "Header" => ElementKind::Header,
            "NarrativeText" => ElementKind::NarrativeText,
            "Text" => ElementKind::Text,
            "ListItem" => ElementKind::ListItem,
            "Table" => ElementKind::Table,
            "Image" => ElementKind::Image,
            "FigureCaption" => ElementKind::FigureCaption,
            "Formula" => ElementKind::Formula,
            other => ElementKind::Other(other.to_string()),
        }
    }
}

impl From<String> for ElementKind {
    fn from(name: String) -> Self {
        ElementKind::from(name.as_str())
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extractor metadata attached to an element.
///
/// The key set is open. Typed accessors treat malformed values as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementMetadata(BTreeMap<String, Value>);

impl ElementMetadata {
    /// Create empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Get a raw field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterate over all fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Check if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Source page number, if present and integral.
    pub fn page_number(&self) -> Option<u64> {
        self.get(PAGE_NUMBER).and_then(Value::as_u64)
    }

    /// Detected languages, if present as a list.
    pub fn languages(&self) -> Option<Vec<String>> {
        let items = self.get(LANGUAGES)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        )
    }

    /// HTML rendering of a table, if present.
    pub fn text_as_html(&self) -> Option<&str> {
        self.get(TEXT_AS_HTML).and_then(Value::as_str)
    }
}

impl FromIterator<(String, Value)> for ElementMetadata {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_round_trip_names() {
        assert_eq!(ElementKind::from("NarrativeText"), ElementKind::NarrativeText);
        assert_eq!(ElementKind::FigureCaption.name(), "FigureCaption");
        assert_eq!(
            ElementKind::from("PageBreak"),
            ElementKind::Other("PageBreak".into())
        );
        assert_eq!(ElementKind::Other("Footer".into()).to_string(), "Footer");
    }

    #[test]
    fn test_heading_kinds() {
        assert!(ElementKind::Title.is_heading());
        assert!(ElementKind::Header.is_heading());
        assert!(!ElementKind::NarrativeText.is_heading());
        assert!(!ElementKind::Table.is_heading());
    }

    #[test]
    fn test_deserialize_extractor_shape() {
        let element: Element = serde_json::from_value(json!({
            "type": "Table",
            "element_id": "abc123",
            "text": "Revenue 100",
            "metadata": {
                "page_number": 4,
                "languages": ["eng"],
                "text_as_html": "<table><tr><td>Revenue</td></tr></table>"
            }
        }))
        .unwrap();

        assert_eq!(element.kind, ElementKind::Table);
        assert_eq!(element.element_id.as_deref(), Some("abc123"));
        assert_eq!(element.metadata.page_number(), Some(4));
        assert_eq!(element.metadata.languages(), Some(vec!["eng".to_string()]));
        assert!(element.metadata.text_as_html().unwrap().starts_with("<table>"));
    }

    #[test]
    fn test_deserialize_minimal_and_unknown_kind() {
        let element: Element = serde_json::from_value(json!({"type": "UncategorizedText"})).unwrap();
        assert_eq!(element.kind, ElementKind::Other("UncategorizedText".into()));
        assert!(element.text.is_empty());
        assert!(element.metadata.is_empty());
    }

    #[test]
    fn test_malformed_metadata_is_absent() {
        let element = Element::narrative("x")
            .with_metadata("page_number", "four")
            .with_metadata("languages", "eng");

        assert_eq!(element.metadata.page_number(), None);
        assert_eq!(element.metadata.languages(), None);
    }

    #[test]
    fn test_metadata_record() {
        let element = Element::table("t", "<table></table>")
            .with_id("e1")
            .with_page(2)
            .with_languages(["en", "fr"]);

        let record = element.metadata_record(7);
        assert_eq!(record["type"], MetadataValue::scalar("Table"));
        assert_eq!(record["element_id"], MetadataValue::scalar("e1"));
        assert_eq!(record["source_index"], MetadataValue::scalar("7"));
        assert_eq!(record["page_number"], MetadataValue::scalar("2"));
        assert_eq!(record["languages"], MetadataValue::list(["en", "fr"]));
        assert!(!record.contains_key(TEXT_AS_HTML));
    }

    #[test]
    fn test_metadata_record_drops_scalar_languages() {
        let record = Element::narrative("x")
            .with_metadata("languages", "eng")
            .metadata_record(0);
        assert!(!record.contains_key(LANGUAGES));
    }

    #[test]
    fn test_deserialize_null_text_and_metadata() {
        let element: Element = serde_json::from_value(json!({
            "type": "NarrativeText",
            "element_id": null,
            "text": null,
            "metadata": null
        }))
        .unwrap();

        assert_eq!(element.kind, ElementKind::NarrativeText);
        assert!(element.element_id.is_none());
        assert!(element.text.is_empty());
        assert!(element.metadata.is_empty());
    }
}
