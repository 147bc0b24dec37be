//! JSON reading of elements and writing of segments.

use crate::error::Result;
use crate::model::{Element, Segment};
use serde::Serialize;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize segments, windows or statistics to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value)?,
        JsonFormat::Compact => serde_json::to_string(value)?,
    };
    Ok(json)
}

/// Read an extractor's element list.
///
/// Each entry has the shape `{"type", "element_id"?, "text", "metadata"?}`.
pub fn elements_from_json(json: &str) -> Result<Vec<Element>> {
    Ok(serde_json::from_str(json)?)
}

/// Read a previously written segment list.
pub fn segments_from_json(json: &str) -> Result<Vec<Segment>> {
    Ok(serde_json::from_str(json)?)
}
