//! Configuration for kb-builder
//!
//! Every threshold and table the pipeline uses lives here and is passed into
//! the components at construction time.

use crate::error::{KbError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default chunk target size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default overlap between neighbouring chunks in characters
pub const DEFAULT_OVERLAP: usize = 200;

/// Default minimum length a cleaned record must exceed to be kept
pub const DEFAULT_MIN_CONTENT_LENGTH: usize = 50;

/// Default output file
pub const DEFAULT_OUTPUT_PATH: &str = "output/knowledge_base.jsonl";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Recursive chunker settings
    pub chunking: ChunkingConfig,

    /// Text normalizer settings
    pub cleaning: CleaningConfig,

    /// Record merger settings
    pub merge: MergeConfig,

    /// Where the JSONL knowledge base is written
    pub output_path: PathBuf,

    /// Draw progress bars on stderr
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunking: ChunkingConfig::default(),
            cleaning: CleaningConfig::default(),
            merge: MergeConfig::default(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            show_progress: true,
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject configurations that cannot produce a meaningful run
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;

        if self.output_path.as_os_str().is_empty() {
            return Err(KbError::Config("output path must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Recursive chunker configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,

    /// Characters carried over from the end of one chunk into the next
    pub overlap: usize,

    /// Split markers, coarsest first. An empty string splits between characters.
    pub separators: Vec<String>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
            separators: ["\n\n", "\n", ". ", " ", ""]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(KbError::Config(
                "chunk size must be greater than zero".to_string(),
            ));
        }

        if self.overlap >= self.chunk_size {
            return Err(KbError::Config(format!(
                "overlap ({}) must be smaller than chunk size ({})",
                self.overlap, self.chunk_size
            )));
        }

        if self.separators.is_empty() {
            return Err(KbError::Config(
                "at least one separator is required".to_string(),
            ));
        }

        Ok(())
    }
}

/// Text normalizer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CleaningConfig {
    /// "Related articles" phrase; removed through the next full stop
    pub related_marker: String,

    /// Parenthesized asides mentioning this name are removed
    pub institution: String,

    /// Byline labels removed through end of line
    pub byline_labels: Vec<String>,

    /// Literal replacements, applied in order
    pub corrections: Vec<(String, String)>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            related_marker: "Baca Juga".to_string(),
            institution: "Unhas".to_string(),
            byline_labels: vec![
                "Editor".to_string(),
                "Penulis".to_string(),
                "Author".to_string(),
            ],
            corrections: default_corrections(),
        }
    }
}

/// Known OCR misreads and heading fixes for the university document corpus.
///
/// Order matters: `SKEPUTUSAN` must be handled before `SKEP`, and `BABI`
/// before `BAB Ill`.
pub fn default_corrections() -> Vec<(String, String)> {
    [
        ("SKEPUTUSAN", "KEPUTUSAN"),
        ("SKEP", "KEP"),
        ("mt ", ""),
        ("ae ", "a. "),
        ("bs ", "b. "),
        ("cs ", "c. "),
        ("Menimbang :", "\nMenimbang :"),
        ("Mengingat :", "\nMengingat :"),
        ("Memutuskan :", "\nMemutuskan :"),
        ("MEMUTUSKAN", "\nMEMUTUSKAN"),
        ("BABI", "BAB I"),
        ("BAB Ill", "BAB III"),
        ("Unhas", "Universitas Hasanuddin"),
    ]
    .iter()
    .map(|(from, to)| (from.to_string(), to.to_string()))
    .collect()
}

/// Record merger configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MergeConfig {
    /// Cleaned content must be strictly longer than this many characters
    pub min_content_length: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            min_content_length: DEFAULT_MIN_CONTENT_LENGTH,
        }
    }
}
