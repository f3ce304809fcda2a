//! Union, deduplication and filtering of record batches

use super::{CleanedRecord, RawRecord};
use crate::config::MergeConfig;
use crate::text::TextNormalizer;
use crate::text::chunking::char_len;
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::collections::HashSet;

/// Counts reported by a merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Records received across all batches
    pub ingested: usize,

    /// Records dropped because an earlier record had the same source
    pub duplicates: usize,

    /// Records dropped because their cleaned content was too short
    pub too_short: usize,

    /// Records kept
    pub retained: usize,
}

impl MergeStats {
    pub fn removed(&self) -> usize {
        self.duplicates + self.too_short
    }
}

/// Merges collector batches into one cleaned collection
#[derive(Debug, Clone)]
pub struct RecordMerger {
    normalizer: TextNormalizer,
    min_content_length: usize,
}

impl RecordMerger {
    pub fn new(normalizer: TextNormalizer, config: &MergeConfig) -> Self {
        Self {
            normalizer,
            min_content_length: config.min_content_length,
        }
    }

    /// Merge `collections` in order, keeping the first record per source
    pub fn merge<I>(&self, collections: I) -> (Vec<CleanedRecord>, MergeStats)
    where
        I: IntoIterator<Item = Vec<RawRecord>>,
    {
        self.merge_with_progress(collections, &ProgressBar::hidden())
    }

    /// Same as [`merge`](Self::merge), ticking `progress` once per cleaned record
    pub fn merge_with_progress<I>(
        &self,
        collections: I,
        progress: &ProgressBar,
    ) -> (Vec<CleanedRecord>, MergeStats)
    where
        I: IntoIterator<Item = Vec<RawRecord>>,
    {
        let records: Vec<RawRecord> = collections.into_iter().flatten().collect();
        let mut stats = MergeStats {
            ingested: records.len(),
            ..Default::default()
        };

        if records.is_empty() {
            log::info!("No records to merge");
            return (Vec::new(), stats);
        }

        let mut seen = HashSet::with_capacity(records.len());
        let unique: Vec<RawRecord> = records
            .into_iter()
            .filter(|record| {
                let first = seen.insert(record.source.clone());
                if !first {
                    log::debug!("Duplicate source dropped: {}", record.source);
                }
                first
            })
            .collect();
        stats.duplicates = stats.ingested - unique.len();

        progress.set_length(unique.len() as u64);
        let cleaned: Vec<CleanedRecord> = unique
            .into_par_iter()
            .map(|raw| {
                let clean_content = self.normalizer.normalize(&raw.content);
                progress.inc(1);
                CleanedRecord { raw, clean_content }
            })
            .collect();
        progress.finish_and_clear();

        let before_filter = cleaned.len();
        let retained: Vec<CleanedRecord> = cleaned
            .into_iter()
            .filter(|record| char_len(&record.clean_content) > self.min_content_length)
            .collect();
        stats.too_short = before_filter - retained.len();
        stats.retained = retained.len();

        log::info!(
            "Data ready: {} records ({} duplicates, {} too short, {} ingested)",
            stats.retained,
            stats.duplicates,
            stats.too_short,
            stats.ingested
        );

        (retained, stats)
    }
}
