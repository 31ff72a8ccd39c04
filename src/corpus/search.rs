//! Parallel search coordinator
//!
//! A search splits the corpus into fixed-size batches. Every worker claims
//! the next unclaimed batch from a shared atomic cursor until none remain,
//! keeping matches in a private run. Each run is sorted once, then runs are
//! merged pairwise, level by level (run k with run k + 1), until a single
//! sorted list remains.
//!
//! Ordering is `(score desc, candidate id asc)`. Ids are unique, so the order
//! is total and the merged list is identical for every worker count.

use super::arena::{Arena, CandidateId};
use crate::matcher::{has_match, score, SCORE_MIN};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

/// Candidates claimed per cursor increment
pub const DEFAULT_BATCH_SIZE: usize = 512;

/// Search tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Worker threads per search. 0 means one per available CPU.
    pub workers: usize,
    /// Candidates per batch. 0 means [`DEFAULT_BATCH_SIZE`].
    pub batch_size: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            workers: 0,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl SearchOptions {
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }

    /// Resolve 0 to the CPU count
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            crate::utils::num_cpus()
        } else {
            self.workers
        }
    }

    pub fn effective_batch_size(&self) -> usize {
        if self.batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            self.batch_size
        }
    }
}

/// One ranked candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredResult {
    pub id: CandidateId,
    pub score: f64,
}

/// Ranking order: higher score first, then earlier insertion first
#[inline]
pub fn compare(a: &ScoredResult, b: &ScoredResult) -> Ordering {
    b.score.total_cmp(&a.score).then(a.id.cmp(&b.id))
}

/// Worker pool that ranks a corpus against a query
pub struct Searcher {
    pool: rayon::ThreadPool,
    workers: usize,
    batch_size: usize,
}

impl Searcher {
    pub fn new(options: &SearchOptions) -> Result<Self> {
        let workers = options.effective_workers();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("fzr-worker-{}", i))
            .build()
            .context("Failed to start search workers")?;

        Ok(Self {
            pool,
            workers,
            batch_size: options.effective_batch_size(),
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Rank every candidate of `arena` against `query`.
    ///
    /// The empty query matches everything with no ranking signal, so the
    /// result is the corpus in insertion order and nothing is scored.
    pub fn run(&self, arena: &Arena, query: &str) -> Vec<ScoredResult> {
        if query.is_empty() {
            let mut results = alloc_results(arena.len());
            results.extend(arena.iter().map(|(id, _)| ScoredResult {
                id,
                score: SCORE_MIN,
            }));
            return results;
        }

        let cursor = AtomicUsize::new(0);
        let batch_size = self.batch_size;

        self.pool.install(|| {
            let runs: Vec<Vec<ScoredResult>> = (0..self.workers)
                .into_par_iter()
                .map(|_| scan(arena, query, &cursor, batch_size))
                .collect();

            merge_runs(runs)
        })
    }
}

/// Claim batches until the corpus is exhausted, then sort the private run.
fn scan(arena: &Arena, query: &str, cursor: &AtomicUsize, batch_size: usize) -> Vec<ScoredResult> {
    let total = arena.len();
    let mut run = Vec::new();

    loop {
        let batch = cursor.fetch_add(1, AtomicOrdering::Relaxed);
        let start = batch.saturating_mul(batch_size);
        if start >= total {
            break;
        }
        let end = start.saturating_add(batch_size).min(total);

        for (id, candidate) in arena.batch(start..end) {
            if has_match(query, candidate) {
                run.push(ScoredResult {
                    id,
                    score: score(query, candidate),
                });
            }
        }
    }

    run.sort_unstable_by(compare);
    run
}

/// Fan-in: merge neighbouring runs until one is left.
fn merge_runs(mut runs: Vec<Vec<ScoredResult>>) -> Vec<ScoredResult> {
    while runs.len() > 1 {
        runs = runs
            .into_par_iter()
            .chunks(2)
            .map(|pair| {
                let mut pair = pair.into_iter();
                match (pair.next(), pair.next()) {
                    (Some(left), Some(right)) => merge(left, right),
                    (Some(left), None) => left,
                    _ => Vec::new(),
                }
            })
            .collect();
    }

    runs.pop().unwrap_or_default()
}

/// Two-pointer merge of sorted runs; `left` wins ties.
fn merge(left: Vec<ScoredResult>, right: Vec<ScoredResult>) -> Vec<ScoredResult> {
    if right.is_empty() {
        return left;
    }
    if left.is_empty() {
        return right;
    }

    let mut merged = alloc_results(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if compare(&left[i], &right[j]) != Ordering::Greater {
            merged.push(left[i]);
            i += 1;
        } else {
            merged.push(right[j]);
            j += 1;
        }
    }
    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);
    merged
}

/// Result buffers have no degraded mode: running out of memory aborts.
fn alloc_results(capacity: usize) -> Vec<ScoredResult> {
    let mut buffer = Vec::new();
    if let Err(e) = buffer.try_reserve_exact(capacity) {
        tracing::error!(capacity, error = %e, "result buffer allocation failed");
        eprintln!(
            "Error: Can't allocate memory ({} bytes)",
            capacity.saturating_mul(std::mem::size_of::<ScoredResult>())
        );
        std::process::abort();
    }
    buffer
}
