//! API layer for kb-builder
//!
//! This module provides the pipeline entry point that ties normalizing,
//! merging, chunking and export together.

pub mod pipeline;

// Re-export main API types
pub use pipeline::{KnowledgeBaseBuilder, PipelineOutcome};
