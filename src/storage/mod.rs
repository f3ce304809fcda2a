//! Storage functionality for kb-builder
//!
//! This module turns cleaned records into chunk records and persists them as
//! JSON Lines.

pub mod export;

// Re-export main types
pub use export::{Chunk, chunk_records, read_jsonl, write_jsonl};

use std::path::PathBuf;

/// Export statistics
#[derive(Debug, Clone, PartialEq)]
pub struct ExportStats {
    /// Number of records that were chunked
    pub records: usize,

    /// Total number of chunks written
    pub total_chunks: usize,

    /// Output file
    pub output_path: PathBuf,

    /// Output file size in bytes
    pub file_size: u64,
}
