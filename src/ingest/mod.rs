//! Record model and ingestion for kb-builder
//!
//! Upstream collectors (the news scraper and the OCR pipeline) hand over
//! [`RawRecord`]s. This module loads them, assembles OCR page text into
//! document records and merges everything into a deduplicated, cleaned
//! collection.

pub mod merge;
pub mod sources;

// Re-export main types and functions
pub use merge::{MergeStats, RecordMerger};
pub use sources::{DocumentAssembler, load_document_dir, load_jsonl};

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Where a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    /// Scraped news article
    #[serde(alias = "berita")]
    News,

    /// OCR-extracted PDF document
    #[serde(alias = "pdf")]
    Document,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::News => "news",
            RecordType::Document => "document",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record as produced by an upstream collector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,

    /// Provenance: article URL or document label. Deduplication key.
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub content: String,

    #[serde(rename = "type")]
    pub record_type: RecordType,
}

impl RawRecord {
    pub fn new(
        title: impl Into<String>,
        source: impl Into<String>,
        content: impl Into<String>,
        record_type: RecordType,
    ) -> Self {
        Self {
            title: title.into(),
            source: source.into(),
            content: content.into(),
            record_type,
        }
    }
}

/// A deduplicated record with normalized content
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRecord {
    pub raw: RawRecord,
    pub clean_content: String,
}

impl CleanedRecord {
    pub fn title(&self) -> &str {
        &self.raw.title
    }

    pub fn source(&self) -> &str {
        &self.raw.source
    }

    pub fn record_type(&self) -> RecordType {
        self.raw.record_type
    }
}

/// Scrapers sometimes emit `null` or numbers where text is expected; those read as "".
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(text)) => text,
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_labels() {
        assert_eq!(RecordType::News.to_string(), "news");
        assert_eq!(RecordType::Document.to_string(), "document");

        let legacy: RecordType = serde_json::from_str(r#""berita""#).unwrap();
        assert_eq!(legacy, RecordType::News);
        let legacy: RecordType = serde_json::from_str(r#""pdf""#).unwrap();
        assert_eq!(legacy, RecordType::Document);
    }

    #[test]
    fn test_non_string_content_reads_as_empty() {
        let record: RawRecord = serde_json::from_str(
            r#"{"title": "T", "source": "s", "content": null, "type": "news"}"#,
        )
        .unwrap();
        assert_eq!(record.content, "");

        let record: RawRecord =
            serde_json::from_str(r#"{"title": 42, "source": "s", "type": "document"}"#).unwrap();
        assert_eq!(record.title, "");
        assert_eq!(record.content, "");
    }
}
