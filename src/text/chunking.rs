//! Recursive, overlap-aware text chunking
//!
//! Text is split on the coarsest separator it contains (paragraphs, then lines,
//! sentences, words and finally single characters). Small pieces are packed
//! greedily into chunks of at most `chunk_size` characters; pieces that are
//! still too large are split again with the remaining, finer separators.
//! Consecutive chunks share up to `overlap` trailing characters.
//!
//! All lengths are counted in `char`s.

use crate::config::ChunkingConfig;
use crate::error::Result;
use std::collections::VecDeque;

/// Splits cleaned text into bounded, overlapping chunks
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    config: ChunkingConfig,
}

impl RecursiveChunker {
    /// Create a chunker, rejecting configurations that cannot terminate sensibly
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a chunker with default configuration (1000 / 200)
    pub fn with_default_config() -> Result<Self> {
        Self::new(ChunkingConfig::default())
    }

    /// Split `text` into chunks in left-to-right order.
    ///
    /// Chunks are whitespace-trimmed. A chunk only exceeds `chunk_size` when
    /// no configured separator can split it further.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        if char_len(text) <= self.config.chunk_size {
            return vec![text.trim().to_string()];
        }

        self.split_recursive(text, &self.config.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let (separator, finer) = select_separator(text, separators);
        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();

        for segment in split_keeping_separator(text, separator) {
            if char_len(segment) < self.config.chunk_size {
                pending.push(segment);
                continue;
            }

            if !pending.is_empty() {
                chunks.extend(self.merge_segments(&pending));
                pending.clear();
            }

            if finer.is_empty() {
                if let Some(chunk) = trimmed(segment) {
                    log::debug!(
                        "No separator left to split a {}-character segment",
                        char_len(segment)
                    );
                    chunks.push(chunk);
                }
            } else {
                chunks.extend(self.split_recursive(segment, finer));
            }
        }

        if !pending.is_empty() {
            chunks.extend(self.merge_segments(&pending));
        }

        chunks
    }

    /// Greedily pack segments into chunks, carrying trailing segments forward
    /// as overlap once a chunk is emitted.
    fn merge_segments(&self, segments: &[&str]) -> Vec<String> {
        let size = self.config.chunk_size;
        let overlap = self.config.overlap;

        let mut chunks = Vec::new();
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for &segment in segments {
            let len = char_len(segment);

            if total + len > size && !window.is_empty() {
                if let Some(chunk) = join_window(&window) {
                    chunks.push(chunk);
                }

                // Keep at most `overlap` characters, and leave room for `segment`.
                while total > overlap || (total > 0 && total + len > size) {
                    let Some((_, front_len)) = window.pop_front() else {
                        break;
                    };
                    total -= front_len;
                }
            }

            window.push_back((segment, len));
            total += len;
        }

        if let Some(chunk) = join_window(&window) {
            chunks.push(chunk);
        }

        chunks
    }
}

/// Pick the first separator present in `text`, returning it together with the
/// finer separators that may still be used on oversized pieces.
fn select_separator<'a>(text: &str, separators: &'a [String]) -> (&'a str, &'a [String]) {
    for (i, separator) in separators.iter().enumerate() {
        if separator.is_empty() {
            return (separator.as_str(), &[]);
        }
        if text.contains(separator.as_str()) {
            return (separator.as_str(), &separators[i + 1..]);
        }
    }

    (separators.last().map(String::as_str).unwrap_or(""), &[])
}

/// Split on every occurrence of `separator`, keeping it at the end of the
/// preceding piece so the pieces concatenate back to `text`.
fn split_keeping_separator<'t>(text: &'t str, separator: &str) -> Vec<&'t str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    text.split_inclusive(separator)
        .filter(|piece| !piece.is_empty())
        .collect()
}

fn join_window(window: &VecDeque<(&str, usize)>) -> Option<String> {
    let joined: String = window.iter().map(|(segment, _)| *segment).collect();
    trimmed(&joined)
}

fn trimmed(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KbError;

    fn chunker(chunk_size: usize, overlap: usize) -> RecursiveChunker {
        RecursiveChunker::new(ChunkingConfig {
            chunk_size,
            overlap,
            ..Default::default()
        })
        .unwrap()
    }

    /// "w0000 w0001 ..." cut to exactly `len` characters
    fn numbered_words(len: usize) -> String {
        (0..len / 5 + 1)
            .map(|i| format!("w{i:04}"))
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .take(len)
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let chunker = RecursiveChunker::with_default_config().unwrap();
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk("   \n\n ").is_empty());
    }

    #[test]
    fn test_small_text() {
        let chunker = RecursiveChunker::with_default_config().unwrap();
        let chunks = chunker.chunk("Short text");
        assert_eq!(chunks, vec!["Short text".to_string()]);
    }

    #[test]
    fn test_overlap_not_smaller_than_size_is_rejected() {
        let result = RecursiveChunker::new(ChunkingConfig {
            chunk_size: 200,
            overlap: 200,
            ..Default::default()
        });
        assert!(matches!(result, Err(KbError::Config(_))));
    }

    #[test]
    fn test_single_paragraph_scenario() {
        let text = numbered_words(2500);
        assert_eq!(text.len(), 2500);

        let chunks = chunker(1000, 200).chunk(&text);
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(char_len(chunk) <= 1000);
        }

        // Chunk 2 opens with the tail of chunk 1.
        let head = &chunks[1][..30];
        let offset = chunks[0].find(head).expect("overlap missing");
        let carried = chunks[0].len() - offset;
        assert!((150..=200).contains(&carried), "carried {carried} characters");

        assert!(chunks[0].starts_with("w0000"));
        assert!(text.ends_with(chunks[2].as_str()));
    }

    #[test]
    fn test_paragraphs_preferred() {
        let first = "a".repeat(600);
        let second = "b".repeat(600);
        let text = format!("{first}\n\n{second}");

        let chunks = chunker(1000, 200).chunk(&text);
        assert_eq!(chunks, vec![first, second]);
    }

    #[test]
    fn test_sentences_preferred_over_words() {
        let sentence = format!("{}.", "kata ".repeat(59).trim_end());
        let text = vec![sentence.as_str(); 5].join(" ");

        let chunks = chunker(700, 100).chunk(&text);
        for chunk in &chunks {
            assert!(char_len(chunk) <= 700);
            assert!(chunk.ends_with('.'), "chunk split mid-sentence: {chunk:?}");
        }
    }

    #[test]
    fn test_oversized_paragraph_is_split_further() {
        let long = numbered_words(1500);
        let text = format!("{long}\n\nClosing paragraph.");

        let chunks = chunker(1000, 200).chunk(&text);
        assert!(chunks.len() >= 3);
        assert!(chunks.iter().all(|c| char_len(c) <= 1000));
        assert_eq!(chunks.last().map(String::as_str), Some("Closing paragraph."));
    }

    #[test]
    fn test_character_fallback() {
        let text = "x".repeat(2500);
        let chunks = chunker(1000, 200).chunk(&text);
        assert_eq!(chunks.len(), 3);
        assert_eq!(char_len(&chunks[0]), 1000);
        assert!(chunks.iter().all(|c| char_len(c) <= 1000));
    }

    #[test]
    fn test_multibyte_text_is_split_on_char_boundaries() {
        let text = "é".repeat(2500);
        let chunks = chunker(1000, 200).chunk(&text);
        assert!(chunks.iter().all(|c| char_len(c) <= 1000));
        assert!(chunks.iter().all(|c| c.chars().all(|ch| ch == 'é')));
    }

    #[test]
    fn test_unsplittable_segment_kept_whole() {
        let chunker = RecursiveChunker::new(ChunkingConfig {
            chunk_size: 100,
            overlap: 10,
            separators: vec!["\n\n".to_string()],
        })
        .unwrap();

        let text = "y".repeat(150);
        let chunks = chunker.chunk(&text);
        assert_eq!(chunks, vec![text]);
    }

    #[test]
    fn test_every_word_is_covered() {
        let text = numbered_words(5000);
        let chunks = chunker(300, 50).chunk(&text);

        for word in text.split(' ') {
            assert!(
                chunks.iter().any(|c| c.split(' ').any(|w| w == word)),
                "{word} lost"
            );
        }
    }

    #[test]
    fn test_order_is_stable() {
        let text = numbered_words(4000);
        let chunks = chunker(500, 100).chunk(&text);

        let firsts: Vec<&str> = chunks
            .iter()
            .map(|c| c.split(' ').next().unwrap_or_default())
            .collect();
        let mut sorted = firsts.clone();
        sorted.sort();
        assert_eq!(firsts, sorted);
    }

    #[test]
    fn test_split_keeping_separator_reconstructs_text() {
        let text = "one. two. three";
        let pieces = split_keeping_separator(text, ". ");
        assert_eq!(pieces, vec!["one. ", "two. ", "three"]);
        assert_eq!(pieces.concat(), text);
    }

    #[test]
    fn test_select_separator_skips_absent_markers() {
        let separators: Vec<String> = ["\n\n", "\n", " ", ""].iter().map(|s| s.to_string()).collect();
        let (separator, finer) = select_separator("a b", &separators);
        assert_eq!(separator, " ");
        assert_eq!(finer, &separators[3..]);
    }
}
