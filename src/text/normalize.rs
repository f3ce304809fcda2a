//! Rule-based cleanup of scraped and OCR-extracted text
//!
//! Rules run in a fixed order and later rules rely on earlier ones: literal
//! corrections may introduce line breaks that bullet repair then sees, and
//! whitespace collapsing tidies what the removals leave behind.

use crate::config::CleaningConfig;
use crate::error::{KbError, Result};
use regex::Regex;

/// Normalizes raw record content into clean text
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    corrections: Vec<(String, String)>,
    related_regex: Option<Regex>,
    aside_regex: Option<Regex>,
    byline_regex: Option<Regex>,
    bullet_regex: Regex,
    horizontal_ws_regex: Regex,
    blank_lines_regex: Regex,
}

impl TextNormalizer {
    /// Compile the cleanup rules for the given configuration
    pub fn new(config: &CleaningConfig) -> Result<Self> {
        // An empty marker or institution disables its rule.
        let related_regex = non_empty(&config.related_marker)
            .map(|marker| compile(&format!(r"(?im){}[^.\n]*(?:\.|$)", regex::escape(marker))))
            .transpose()?;

        let aside_regex = non_empty(&config.institution)
            .map(|institution| compile(&format!(r"(?i)\s*\([^)]*?{}[^)]*\)", regex::escape(institution))))
            .transpose()?;

        let labels: Vec<String> = config
            .byline_labels
            .iter()
            .filter(|label| !label.is_empty())
            .map(|label| regex::escape(label))
            .collect();
        let byline_regex = if labels.is_empty() {
            None
        } else {
            Some(compile(&format!(r"(?im)(?:{})\s*[:|].*$", labels.join("|")))?)
        };

        Ok(Self {
            corrections: config.corrections.clone(),
            related_regex,
            aside_regex,
            byline_regex,
            bullet_regex: compile(r"(?m)^\s*([a-z])\s+")?,
            horizontal_ws_regex: compile(r"[ \t]+")?,
            blank_lines_regex: compile(r"\n\s*\n")?,
        })
    }

    /// Create a normalizer with the default rule set
    pub fn with_default_config() -> Result<Self> {
        Self::new(&CleaningConfig::default())
    }

    /// Clean `text`. Never fails; empty or whitespace-only input yields an empty string.
    pub fn normalize(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let text = self.strip_boilerplate(text);
        let text = self.apply_corrections(text);
        let text = self.repair_bullets(&text);
        let text = self.collapse_whitespace(&text);

        text.trim().to_string()
    }

    fn strip_boilerplate(&self, text: &str) -> String {
        [&self.related_regex, &self.aside_regex, &self.byline_regex]
            .into_iter()
            .flatten()
            .fold(text.to_string(), |text, rule| rule.replace_all(&text, "").into_owned())
    }

    fn apply_corrections(&self, mut text: String) -> String {
        for (from, to) in &self.corrections {
            if !from.is_empty() && text.contains(from.as_str()) {
                text = text.replace(from.as_str(), to);
            }
        }
        text
    }

    /// OCR drops the period after enumerators: "a foo" at a line start becomes "a. foo"
    fn repair_bullets(&self, text: &str) -> String {
        self.bullet_regex.replace_all(text, "${1}. ").into_owned()
    }

    fn collapse_whitespace(&self, text: &str) -> String {
        let text = self.horizontal_ws_regex.replace_all(text, " ");
        self.blank_lines_regex.replace_all(&text, "\n").into_owned()
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        KbError::TextProcessing(format!("Failed to compile pattern {pattern:?}: {e}"))
    })
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}
