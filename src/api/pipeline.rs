//! KnowledgeBaseBuilder - Main pipeline API
//!
//! This provides the high-level interface that turns collector batches into a
//! JSONL knowledge base: merge and clean, chunk, export.

use crate::config::Config;
use crate::error::Result;
use crate::ingest::{MergeStats, RawRecord, RecordMerger};
use crate::storage::ExportStats;
use crate::storage::export::{chunk_records_with_progress, write_jsonl};
use crate::text::{RecursiveChunker, TextNormalizer};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;

/// How a pipeline run ended
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// Chunks were written
    Completed {
        merge: MergeStats,
        export: ExportStats,
    },

    /// Nothing survived merging; no output file was written
    EmptyDataset { merge: MergeStats },
}

impl PipelineOutcome {
    pub fn merge_stats(&self) -> &MergeStats {
        match self {
            PipelineOutcome::Completed { merge, .. } => merge,
            PipelineOutcome::EmptyDataset { merge } => merge,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PipelineOutcome::EmptyDataset { .. })
    }
}

impl fmt::Display for PipelineOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineOutcome::Completed { export, .. } => {
                write!(f, "completed with {} chunks", export.total_chunks)
            }
            PipelineOutcome::EmptyDataset { .. } => write!(f, "stopped: empty dataset"),
        }
    }
}

/// Runs the cleaning → deduplication → chunking → export pipeline
pub struct KnowledgeBaseBuilder {
    config: Config,
    merger: RecordMerger,
    chunker: RecursiveChunker,
}

impl KnowledgeBaseBuilder {
    /// Create a builder with optional configuration.
    ///
    /// Fails only on an invalid configuration.
    pub fn new(config: Option<Config>) -> Result<Self> {
        let config = config.unwrap_or_default();
        config.validate()?;

        let normalizer = TextNormalizer::new(&config.cleaning)?;
        let merger = RecordMerger::new(normalizer, &config.merge);
        let chunker = RecursiveChunker::new(config.chunking.clone())?;

        Ok(Self {
            config,
            merger,
            chunker,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the knowledge base from the news and document batches
    pub fn build(&self, news: Vec<RawRecord>, documents: Vec<RawRecord>) -> Result<PipelineOutcome> {
        self.build_from_collections(vec![news, documents])
    }

    /// Build from any number of batches, merged in the given order
    pub fn build_from_collections(&self, collections: Vec<Vec<RawRecord>>) -> Result<PipelineOutcome> {
        log::info!("Cleaning and merging records...");
        let progress = self.progress_bar("Cleaning content");
        let (records, merge) = self.merger.merge_with_progress(collections, &progress);

        if records.is_empty() {
            log::warn!("No data to process, stopping before chunking");
            return Ok(PipelineOutcome::EmptyDataset { merge });
        }

        log::info!("Chunking {} records...", records.len());
        let progress = self.progress_bar("Chunking");
        let chunks = chunk_records_with_progress(&records, &self.chunker, &progress);

        let output_path = self.config.output_path.clone();
        let file_size = write_jsonl(&chunks, &output_path)?;

        let export = ExportStats {
            records: records.len(),
            total_chunks: chunks.len(),
            output_path,
            file_size,
        };
        log::info!("Total chunks: {}", export.total_chunks);

        Ok(PipelineOutcome::Completed { merge, export })
    }

    fn progress_bar(&self, message: &'static str) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::with_template("{msg} [{elapsed_precise}] {wide_bar} {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb.set_message(message);
        pb
    }
}
