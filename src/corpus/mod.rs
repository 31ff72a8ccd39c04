//! Candidate corpus and ranked results
//!
//! A [`Corpus`] owns the candidates (one text arena), the result set of the
//! most recent search and the selection cursor into it. Every search rebuilds
//! the result set wholesale and resets the selection.

pub mod arena;
pub mod search;

pub use arena::{Arena, CandidateId};
pub use search::{ScoredResult, SearchOptions, Searcher, DEFAULT_BATCH_SIZE};

use anyhow::{Context, Result};
use std::io::Read;
use std::time::Instant;

pub struct Corpus {
    arena: Arena,
    results: Vec<ScoredResult>,
    selection: usize,
    searcher: Searcher,
}

impl Corpus {
    pub fn new(options: SearchOptions) -> Result<Self> {
        Ok(Self {
            arena: Arena::new(),
            results: Vec::new(),
            selection: 0,
            searcher: Searcher::new(&options)?,
        })
    }

    /// Read `reader` to the end and append every non-empty record.
    pub fn load<R: Read>(&mut self, mut reader: R, delimiter: u8) -> Result<usize> {
        let mut input = Vec::new();
        reader
            .read_to_end(&mut input)
            .context("Failed to read candidates")?;

        let added = self.arena.extend_from_bytes(&input, delimiter);
        self.reset_search();

        tracing::debug!(
            added,
            total = self.arena.len(),
            bytes = self.arena.bytes_used(),
            "loaded candidates"
        );
        Ok(added)
    }

    /// Append a single candidate. The previous result set becomes invalid.
    pub fn add(&mut self, candidate: &str) -> CandidateId {
        self.reset_search();
        self.arena.push(candidate)
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn candidate(&self, id: CandidateId) -> Option<&str> {
        self.arena.get(id)
    }

    pub fn workers(&self) -> usize {
        self.searcher.workers()
    }

    /// Rank the corpus against `query`, replacing the previous results.
    pub fn search(&mut self, query: &str) {
        let _span = tracing::debug_span!(
            "search",
            query_len = query.len(),
            workers = self.searcher.workers(),
            batches = self.arena.len().div_ceil(self.searcher.batch_size())
        )
        .entered();
        let start = Instant::now();

        self.reset_search();
        self.results = self.searcher.run(&self.arena, query);

        tracing::debug!(
            candidates = self.arena.len(),
            results = self.results.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "search complete"
        );
    }

    fn reset_search(&mut self) {
        self.results = Vec::new();
        self.selection = 0;
    }

    /// Number of results of the last search
    pub fn available(&self) -> usize {
        self.results.len()
    }

    /// The `n`th ranked candidate
    pub fn get(&self, n: usize) -> Option<&str> {
        self.results.get(n).and_then(|r| self.arena.get(r.id))
    }

    pub fn get_score(&self, n: usize) -> Option<f64> {
        self.results.get(n).map(|r| r.score)
    }

    /// Ranked results with their scores
    pub fn results(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.results
            .iter()
            .filter_map(|r| self.arena.get(r.id).map(|s| (s, r.score)))
    }

    pub fn selection(&self) -> usize {
        self.selection
    }

    /// The candidate under the cursor
    pub fn selected(&self) -> Option<&str> {
        self.get(self.selection)
    }

    /// Move the cursor, clamped to the result set
    pub fn set_selection(&mut self, n: usize) {
        self.selection = n.min(self.available().saturating_sub(1));
    }

    /// Advance the cursor, wrapping to the top
    pub fn next(&mut self) {
        let available = self.available();
        if available > 0 {
            self.selection = (self.selection + 1) % available;
        }
    }

    /// Retreat the cursor, wrapping to the bottom
    pub fn prev(&mut self) {
        let available = self.available();
        if available > 0 {
            self.selection = (self.selection + available - 1) % available;
        }
    }

    /// Move up by at most `lines` without wrapping
    pub fn page_up(&mut self, lines: usize) {
        self.selection = self.selection.saturating_sub(lines);
    }

    /// Move down by at most `lines` without wrapping
    pub fn page_down(&mut self, lines: usize) {
        let last = self.available().saturating_sub(1);
        self.selection = self.selection.saturating_add(lines).min(last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::SCORE_MAX;

    fn corpus() -> Corpus {
        Corpus::new(SearchOptions::default()).unwrap()
    }

    #[test]
    fn test_empty_corpus() {
        let mut c = corpus();
        assert_eq!(c.len(), 0);
        assert_eq!(c.available(), 0);
        assert_eq!(c.selection(), 0);

        c.prev();
        assert_eq!(c.selection(), 0);
        c.next();
        assert_eq!(c.selection(), 0);

        c.search("anything");
        assert_eq!(c.available(), 0);
        assert_eq!(c.get(0), None);
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn test_single_candidate() {
        let mut c = corpus();
        c.add("tags");

        c.search("");
        assert_eq!(c.available(), 1);
        assert_eq!(c.selection(), 0);

        c.search("t");
        assert_eq!(c.available(), 1);
        assert_eq!(c.selection(), 0);

        c.prev();
        assert_eq!(c.selection(), 0);
        c.next();
        assert_eq!(c.selection(), 0);

        assert_eq!(c.get(0), Some("tags"));
        assert_eq!(c.get(1), None);
    }

    #[test]
    fn test_two_candidates() {
        let mut c = corpus();
        c.add("tags");
        c.add("test");

        // Empty search keeps input order
        c.search("");
        assert_eq!(c.selection(), 0);
        assert_eq!(c.available(), 2);
        assert_eq!(c.get(0), Some("tags"));
        assert_eq!(c.get(1), Some("test"));

        c.next();
        assert_eq!(c.selection(), 1);
        c.next();
        assert_eq!(c.selection(), 0);

        c.prev();
        assert_eq!(c.selection(), 1);
        c.prev();
        assert_eq!(c.selection(), 0);

        // Filtered search
        c.search("te");
        assert_eq!(c.available(), 1);
        assert_eq!(c.selection(), 0);
        assert_eq!(c.get(0), Some("test"));

        c.next();
        assert_eq!(c.selection(), 0);
        c.prev();
        assert_eq!(c.selection(), 0);

        // No results
        c.search("foobar");
        assert_eq!(c.available(), 0);
        assert_eq!(c.selection(), 0);

        // Different order due to scoring
        c.search("ts");
        assert_eq!(c.available(), 2);
        assert_eq!(c.selection(), 0);
        assert_eq!(c.get(0), Some("test"));
        assert_eq!(c.get(1), Some("tags"));
    }

    #[test]
    fn test_search_resets_selection() {
        let mut c = corpus();
        c.add("tags");
        c.add("test");

        c.search("");
        c.next();
        assert_eq!(c.selection(), 1);

        c.search("t");
        assert_eq!(c.selection(), 0);
    }

    #[test]
    fn test_without_search() {
        let mut c = corpus();
        assert_eq!(c.get(0), None);

        c.add("test");
        assert_eq!(c.len(), 1);
        assert_eq!(c.available(), 0);
        assert_eq!(c.get(0), None);
    }

    #[test]
    fn test_add_invalidates_results() {
        let mut c = corpus();
        c.add("test");
        c.search("t");
        assert_eq!(c.available(), 1);

        c.add("tags");
        assert_eq!(c.available(), 0);
    }

    #[test]
    fn test_unicode_candidate() {
        let mut c = corpus();
        c.add("Edmund Husserl - Méditations cartésiennes - Introduction a la phénoménologie.pdf");
        c.search("e");
        assert_eq!(c.available(), 1);
    }

    #[test]
    fn test_load_splits_on_delimiter() {
        let mut c = corpus();
        let added = c.load(&b"tags\n\ntest\n"[..], b'\n').unwrap();
        assert_eq!(added, 2);

        c.search("");
        let all: Vec<&str> = c.results().map(|(s, _)| s).collect();
        assert_eq!(all, vec!["tags", "test"]);
    }

    #[test]
    fn test_load_nul_delimited() {
        let mut c = corpus();
        c.load(&b"a b\0c\nd\0"[..], b'\0').unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.candidate(1), Some("c\nd"));
    }

    #[test]
    fn test_scores_exposed() {
        let mut c = corpus();
        c.add("abc");
        c.add("axbxc");
        c.search("abc");

        assert_eq!(c.get_score(0), Some(SCORE_MAX));
        assert!(c.get_score(1).is_some_and(|s| s.is_finite()));
        assert_eq!(c.get_score(2), None);
    }

    #[test]
    fn test_page_navigation_clamps() {
        let mut c = corpus();
        for i in 0..25 {
            c.add(&format!("line{}", i));
        }
        c.search("");

        c.page_down(10);
        assert_eq!(c.selection(), 10);
        c.page_down(10);
        assert_eq!(c.selection(), 20);
        c.page_down(10);
        assert_eq!(c.selection(), 24);

        c.page_up(10);
        assert_eq!(c.selection(), 14);
        c.page_up(100);
        assert_eq!(c.selection(), 0);

        c.set_selection(99);
        assert_eq!(c.selection(), 24);
    }

    #[test]
    fn test_large_input() {
        let mut c = corpus();
        for i in 0..100_000 {
            c.add(&i.to_string());
        }

        c.search("12");

        // Must match `seq 0 99999 | grep '.*1.*2.*' | wc -l`
        assert_eq!(c.available(), 8146);
        assert_eq!(c.get(0), Some("12"));
    }

    #[test]
    fn test_worker_count_invariance() {
        let input: String = (0..20_000).map(|i| format!("dir{}/file{}.txt\n", i % 97, i)).collect();

        let mut single = Corpus::new(SearchOptions::with_workers(1)).unwrap();
        single.load(input.as_bytes(), b'\n').unwrap();
        single.search("d1f2");

        let mut many = Corpus::new(SearchOptions::with_workers(7)).unwrap();
        many.load(input.as_bytes(), b'\n').unwrap();
        many.search("d1f2");

        assert_eq!(single.available(), many.available());
        assert!(single.results().eq(many.results()));
    }
}
