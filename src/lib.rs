//! # kb-builder
//!
//! Builds a retrieval knowledge base from scraped news articles and OCR-extracted
//! documents: every record is cleaned with a rule-based normalizer, records are
//! deduplicated by provenance, and the cleaned text is cut into bounded,
//! overlapping chunks written as JSON Lines.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kb_builder::{Config, KnowledgeBaseBuilder, RawRecord, RecordType};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let builder = KnowledgeBaseBuilder::new(Some(Config::default()))?;
//!
//!     let news = vec![RawRecord::new(
//!         "Wisuda periode II",
//!         "https://example.ac.id/berita/wisuda",
//!         "Universitas menggelar wisuda periode II tahun ini ...",
//!         RecordType::News,
//!     )];
//!
//!     let outcome = builder.build(news, Vec::new())?;
//!     println!("Pipeline {}", outcome);
//!
//!     Ok(())
//! }
//! ```

// Core modules
pub mod api;
pub mod config;
pub mod error;
pub mod ingest;
pub mod storage;
pub mod text;
pub mod utils;

// Re-export main API types
pub use api::{KnowledgeBaseBuilder, PipelineOutcome};
pub use config::Config;
pub use error::{KbError, Result};

// Re-export commonly used types
pub use ingest::{CleanedRecord, MergeStats, RawRecord, RecordType};
pub use storage::{Chunk, ExportStats};
pub use text::{RecursiveChunker, TextNormalizer};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_imports() {
        // Ensure all major types can be imported
        let _config = Config::default();
        let _chunker = RecursiveChunker::with_default_config().unwrap();
    }
}
