//! kb-builder CLI application
//!
//! Command-line interface for the kb-builder library.

use anyhow::Context;
use clap::{Parser, Subcommand};
use kb_builder::ingest::{DocumentAssembler, load_document_dir, load_jsonl};
use kb_builder::utils::format_file_size;
use kb_builder::{Config, KnowledgeBaseBuilder, PipelineOutcome, RawRecord, RecordType, TextNormalizer};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kb-builder")]
#[command(about = "Clean, deduplicate and chunk news and OCR documents into a JSONL knowledge base")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the knowledge base from collected records
    Build {
        /// News records (JSON Lines)
        #[arg(long)]
        news: Option<PathBuf>,

        /// Document records (JSON Lines)
        #[arg(long)]
        documents: Option<PathBuf>,

        /// Directory of OCR text files, one per document
        #[arg(long)]
        documents_dir: Option<PathBuf>,

        /// Configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Chunk size in characters
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Overlap between chunks
        #[arg(long)]
        overlap: Option<usize>,

        /// Cleaned content must be longer than this
        #[arg(long)]
        min_length: Option<usize>,

        /// Disable progress bars
        #[arg(long)]
        no_progress: bool,
    },

    /// Print the cleaned version of a text file (or stdin)
    Clean {
        /// Input file; reads stdin when omitted
        input: Option<PathBuf>,

        /// Configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            news,
            documents,
            documents_dir,
            config,
            output,
            chunk_size,
            overlap,
            min_length,
            no_progress,
        } => {
            let mut config = load_config(config)?;
            if let Some(output) = output {
                config.output_path = output;
            }
            if let Some(chunk_size) = chunk_size {
                config.chunking.chunk_size = chunk_size;
            }
            if let Some(overlap) = overlap {
                config.chunking.overlap = overlap;
            }
            if let Some(min_length) = min_length {
                config.merge.min_content_length = min_length;
            }
            if no_progress {
                config.show_progress = false;
            }

            build_command(config, news, documents, documents_dir)?;
        }
        Commands::Clean { input, config } => {
            clean_command(load_config(config)?, input)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn build_command(
    config: Config,
    news: Option<PathBuf>,
    documents: Option<PathBuf>,
    documents_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let builder = KnowledgeBaseBuilder::new(Some(config)).context("invalid configuration")?;

    println!("[1/4] Loading news records...");
    let news_records = match news {
        Some(path) => load_jsonl(&path, RecordType::News)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => Vec::new(),
    };
    println!("   {} news records", news_records.len());

    println!("[2/4] Loading document records...");
    let mut document_records: Vec<RawRecord> = match documents {
        Some(path) => load_jsonl(&path, RecordType::Document)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => Vec::new(),
    };
    if let Some(dir) = documents_dir {
        let assembler = DocumentAssembler::new(builder.config().merge.min_content_length)?;
        document_records.extend(load_document_dir(&dir, &assembler)?);
    }
    println!("   {} document records", document_records.len());

    println!("[3/4] Cleaning, merging and chunking...");
    let outcome = builder.build(news_records, document_records)?;

    let merge = outcome.merge_stats();
    println!(
        "   {} records ready ({} duplicates/short removed)",
        merge.retained,
        merge.removed()
    );

    match &outcome {
        PipelineOutcome::Completed { export, .. } => {
            println!("[4/4] Export complete");
            println!("   Output: {}", export.output_path.display());
            println!("   Size: {}", format_file_size(export.file_size));
            println!("   Total chunks: {}", export.total_chunks);
            println!("Pipeline {}", outcome);
        }
        PipelineOutcome::EmptyDataset { .. } => {
            eprintln!("Pipeline {}", outcome);
        }
    }

    Ok(())
}

fn clean_command(config: Config, input: Option<PathBuf>) -> anyhow::Result<()> {
    let normalizer = TextNormalizer::new(&config.cleaning)?;

    let text = match input {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    println!("{}", normalizer.normalize(&text));
    Ok(())
}
