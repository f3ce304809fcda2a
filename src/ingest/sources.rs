//! Loading record batches handed over by the collectors

use super::{RawRecord, RecordType};
use crate::error::{KbError, Result};
use crate::text::chunking::char_len;
use crate::utils::{get_file_extension, is_page_text_file};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Label prefix used as provenance for OCR documents
pub const DOCUMENT_SOURCE_PREFIX: &str = "Dokumen PDF";

/// Tesseract separates pages with a form feed
const PAGE_BREAK: char = '\u{c}';

/// Read one [`RawRecord`] per line. Lines without a `type` get `default_type`.
///
/// Lines that are not valid records are skipped with a warning.
pub fn load_jsonl<P: AsRef<Path>>(path: P, default_type: RecordType) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let mut value: serde_json::Value = match serde_json::from_str(&line) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Skipping {}:{}: {}", path.display(), line_no + 1, e);
                continue;
            }
        };

        if let Some(object) = value.as_object_mut() {
            object
                .entry("type")
                .or_insert_with(|| serde_json::Value::from(default_type.as_str()));
        }

        match serde_json::from_value::<RawRecord>(value) {
            Ok(record) => records.push(record),
            Err(e) => log::warn!("Skipping {}:{}: {}", path.display(), line_no + 1, e),
        }
    }

    log::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Turns per-page OCR output into a document record
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    min_content_length: usize,
    whitespace_regex: Regex,
    noise_regex: Regex,
}

impl DocumentAssembler {
    pub fn new(min_content_length: usize) -> Result<Self> {
        let whitespace_regex = Regex::new(r"\s+").map_err(|e| {
            KbError::TextProcessing(format!("Failed to compile whitespace regex: {}", e))
        })?;

        let noise_regex = Regex::new(r"[^a-zA-Z0-9.,/:;()%\- ]").map_err(|e| {
            KbError::TextProcessing(format!("Failed to compile OCR noise regex: {}", e))
        })?;

        Ok(Self {
            min_content_length,
            whitespace_regex,
            noise_regex,
        })
    }

    /// Join `pages` and scrub OCR noise. Returns `None` when too little text survives.
    pub fn assemble<S: AsRef<str>>(&self, file_name: &str, pages: &[S]) -> Option<RawRecord> {
        let joined = pages
            .iter()
            .map(|page| page.as_ref())
            .collect::<Vec<_>>()
            .join(" ");

        let text = self.scrub(&joined);
        if char_len(&text) <= self.min_content_length {
            log::debug!("Dropping {}: only {} characters after OCR cleanup", file_name, char_len(&text));
            return None;
        }

        Some(RawRecord::new(
            document_title(file_name),
            format!("{DOCUMENT_SOURCE_PREFIX} ({file_name})"),
            text,
            RecordType::Document,
        ))
    }

    /// Flatten to a single line and keep only plain ASCII text and punctuation
    pub fn scrub(&self, text: &str) -> String {
        let flat = text.replace('\n', " ");
        let flat = self.whitespace_regex.replace_all(&flat, " ");
        self.noise_regex.replace_all(&flat, "").trim().to_string()
    }
}

fn document_title(file_name: &str) -> String {
    let path = Path::new(file_name);
    match get_file_extension(path).as_deref() {
        Some("txt") | Some("pdf") => path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(file_name)
            .to_string(),
        _ => file_name.to_string(),
    }
}

/// Assemble every `.txt` OCR output in `dir`, in file-name order.
///
/// A missing directory means there are no documents this run.
pub fn load_document_dir<P: AsRef<Path>>(dir: P, assembler: &DocumentAssembler) -> Result<Vec<RawRecord>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        log::warn!("Document directory '{}' not found", dir.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_page_text_file(&path) {
            files.push(path);
        }
    }
    files.sort();

    log::info!("Reading OCR text for {} documents", files.len());

    let mut records = Vec::new();
    for path in files {
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                continue;
            }
        };
        let text = String::from_utf8_lossy(&bytes);
        let pages: Vec<&str> = text.split(PAGE_BREAK).collect();

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let Some(record) = assembler.assemble(&file_name, &pages) {
            records.push(record);
        }
    }

    log::info!("Read {} documents from {}", records.len(), dir.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    const LONG_PAGE: &str = "Keputusan Rektor tentang pedoman akademik program sarjana tahun 2024";

    #[test]
    fn test_load_jsonl_skips_bad_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"title": "A", "source": "https://a", "content": "x", "type": "news"}}"#).unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"title": "B", "source": "https://b", "content": "y"}}"#).unwrap();
        writeln!(file, r#"{{"title": "C", "source": "https://c", "type": "video"}}"#).unwrap();

        let records = load_jsonl(file.path(), RecordType::News).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].source, "https://b");
        assert_eq!(records[1].record_type, RecordType::News);
    }

    #[test]
    fn test_load_jsonl_missing_file() {
        assert!(matches!(
            load_jsonl("/nonexistent/records.jsonl", RecordType::News),
            Err(KbError::Io(_))
        ));
    }

    #[test]
    fn test_assemble_scrubs_ocr_noise() {
        let assembler = DocumentAssembler::new(50).unwrap();
        let record = assembler
            .assemble("sk_rektor.txt", &[format!("{LONG_PAGE}\n\n™ §"), "Pasal 1 @ berlaku.".to_string()])
            .unwrap();

        assert_eq!(record.title, "sk_rektor");
        assert_eq!(record.source, "Dokumen PDF (sk_rektor.txt)");
        assert_eq!(record.record_type, RecordType::Document);
        assert_eq!(record.content, format!("{LONG_PAGE}   Pasal 1  berlaku."));
    }

    #[test]
    fn test_assemble_drops_short_documents() {
        let assembler = DocumentAssembler::new(50).unwrap();
        assert!(assembler.assemble("empty.txt", &["", "  \n "]).is_none());
    }

    #[test]
    fn test_load_document_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), format!("{LONG_PAGE}\u{c}halaman dua")).unwrap();
        std::fs::write(dir.path().join("a.txt"), LONG_PAGE).unwrap();
        std::fs::write(dir.path().join("ignored.png"), "binary").unwrap();

        let assembler = DocumentAssembler::new(50).unwrap();
        let records = load_document_dir(dir.path(), &assembler).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "a");
        assert_eq!(records[1].content, format!("{LONG_PAGE} halaman dua"));
    }

    #[test]
    fn test_missing_document_dir_is_empty() {
        let assembler = DocumentAssembler::new(50).unwrap();
        let records = load_document_dir("/nonexistent/pdf", &assembler).unwrap();
        assert!(records.is_empty());
    }
}
