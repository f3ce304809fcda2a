//! Chunk records and JSON Lines persistence

use crate::error::Result;
use crate::ingest::CleanedRecord;
use crate::text::RecursiveChunker;
use crate::utils::ensure_parent_directory;
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// One line of the knowledge base
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// `{type}_{record_index}_{chunk_index}`
    pub id: String,

    /// Title of the parent record
    pub title: String,

    /// Provenance of the parent record
    pub source: String,

    /// Chunk text
    pub text: String,
}

impl Chunk {
    pub fn make_id(record: &CleanedRecord, record_index: usize, chunk_index: usize) -> String {
        format!("{}_{}_{}", record.record_type(), record_index, chunk_index)
    }
}

/// Chunk every record; record `i` yields ids `{type}_{i}_0`, `{type}_{i}_1`, ...
pub fn chunk_records(records: &[CleanedRecord], chunker: &RecursiveChunker) -> Vec<Chunk> {
    chunk_records_with_progress(records, chunker, &ProgressBar::hidden())
}

pub fn chunk_records_with_progress(
    records: &[CleanedRecord],
    chunker: &RecursiveChunker,
    progress: &ProgressBar,
) -> Vec<Chunk> {
    progress.set_length(records.len() as u64);

    let per_record: Vec<Vec<Chunk>> = records
        .par_iter()
        .enumerate()
        .map(|(i, record)| {
            let chunks = chunker
                .chunk(&record.clean_content)
                .into_iter()
                .enumerate()
                .map(|(j, text)| Chunk {
                    id: Chunk::make_id(record, i, j),
                    title: record.title().to_string(),
                    source: record.source().to_string(),
                    text,
                })
                .collect::<Vec<_>>();
            log::debug!("{} -> {} chunks", record.source(), chunks.len());
            progress.inc(1);
            chunks
        })
        .collect();

    progress.finish_and_clear();
    per_record.into_iter().flatten().collect()
}

/// Write one compact JSON object per line. Returns the file size in bytes.
pub fn write_jsonl<P: AsRef<Path>>(chunks: &[Chunk], path: P) -> Result<u64> {
    let path = path.as_ref();
    ensure_parent_directory(path)?;

    let mut writer = BufWriter::new(File::create(path)?);
    for chunk in chunks {
        serde_json::to_writer(&mut writer, chunk)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    let size = std::fs::metadata(path)?.len();
    log::info!("Wrote {} chunks to {}", chunks.len(), path.display());
    Ok(size)
}

/// Read a knowledge base written by [`write_jsonl`]
pub fn read_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<Chunk>> {
    let reader = BufReader::new(File::open(path)?);
    let mut chunks = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        chunks.push(serde_json::from_str(&line)?);
    }

    Ok(chunks)
}
