use std::path::PathBuf;

use crate::discovery::{PathScan, PopulationSource, ProviderError};
use crate::logging;
use crate::model::{is_valid_word, Word};
use crate::prefix_index::PrefixIndex;

/// Per-path outcome of [`CandidateStore::populate`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PopulationReport {
    pub added: usize,
    pub scanned_paths: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, ProviderError)>,
}

/// All known executable names, reachable both through the prefix index and
/// through an insertion-ordered list used for fuzzy scans.
#[derive(Debug, Default, Clone)]
pub struct CandidateStore {
    index: PrefixIndex,
    words: Vec<Word>,
}

impl CandidateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let mut store = Self::new();
        for word in words {
            store.add_word(word);
        }
        store
    }

    /// Returns whether `candidate` is a valid word. Words already present are
    /// accepted without being stored twice.
    pub fn add_word(&mut self, candidate: &str) -> bool {
        let Some(word) = Word::parse(candidate) else {
            return false;
        };

        if !self.index.contains(word.as_str()) {
            self.index.insert(&word);
            self.words.push(word);
        }
        true
    }

    /// Adds the executable entries of every path. A path that cannot be
    /// listed is reported and skipped.
    pub fn populate(
        &mut self,
        source: &dyn PopulationSource,
        paths: &[PathBuf],
    ) -> PopulationReport {
        let mut report = PopulationReport::default();

        for path in paths {
            match source.scan(path) {
                PathScan::Listed { path, entries } => {
                    let before = self.words.len();
                    for entry in entries.iter().filter(|entry| entry.executable) {
                        self.add_word(&entry.name);
                    }
                    report.added += self.words.len() - before;
                    report.scanned_paths.push(path);
                }
                PathScan::Failed { path, error } => {
                    logging::warn(&format!(
                        "population source={} {}",
                        source.source_name(),
                        error
                    ));
                    report.failures.push((path, error));
                }
            }
        }

        logging::info(&format!(
            "population complete added={} total={} scanned_paths={} failed_paths={}",
            report.added,
            self.words.len(),
            report.scanned_paths.len(),
            report.failures.len()
        ));
        report
    }

    pub fn exact_matches(&self, prefix: &str) -> Vec<Word> {
        self.index.matches_with_prefix(prefix)
    }

    /// Words containing `query` as a subsequence, shortest first (ties keep
    /// insertion order), capped at `limit`.
    pub fn fuzzy_matches(&self, query: &str, limit: usize) -> Vec<Word> {
        if query.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<&Word> = self
            .words
            .iter()
            .filter(|word| is_subsequence(query, word.as_str()))
            .collect();

        // sort_by_key is stable, so equal lengths stay in insertion order.
        matches.sort_by_key(|word| word.char_len());
        matches.into_iter().take(limit).cloned().collect()
    }

    pub fn best_matches(&self, query: &str, limit: usize) -> Vec<Word> {
        let mut matches = self.fuzzy_matches(query, limit);
        matches.retain(|word| is_valid_word(word.as_str()));
        matches
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

pub fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut remaining = haystack.chars();
    needle
        .chars()
        .all(|needle_char| remaining.any(|hay_char| hay_char == needle_char))
}
