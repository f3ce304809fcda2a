//! Text processing for kb-builder
//!
//! This module provides the rule-based normalizer applied to every record and
//! the recursive chunker that cuts cleaned text into bounded segments.

pub mod chunking;
pub mod normalize;

// Re-export main types
pub use chunking::RecursiveChunker;
pub use normalize::TextNormalizer;
