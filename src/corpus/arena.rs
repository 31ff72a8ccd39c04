//! Candidate storage
//!
//! All candidates live back to back in one text buffer, separated by NUL.
//! A candidate is addressed by its insertion index; the arena keeps a span
//! per candidate so lookups never scan the buffer.

use memchr::memchr_iter;
use std::ops::Range;

/// Insertion index of a candidate. Doubles as the stable tie-breaker when
/// two candidates score the same.
pub type CandidateId = u32;

/// Initial size of the text buffer
const INITIAL_BUFFER_CAPACITY: usize = 4096;

/// Initial size of the span table
const INITIAL_CANDIDATE_CAPACITY: usize = 128;

const SEPARATOR: char = '\0';

/// Id for the candidate at `index`, if the id type can hold it
pub fn candidate_id(index: usize) -> Option<CandidateId> {
    CandidateId::try_from(index).ok()
}

/// The id space is exhausted; like a failed allocation this aborts.
fn too_many_candidates(count: usize) -> ! {
    tracing::error!(count, "candidate count exceeds the id space");
    eprintln!("Error: Too many candidates ({} max)", CandidateId::MAX as u64 + 1);
    std::process::abort();
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    len: usize,
}

/// Append-only text arena holding every candidate
#[derive(Debug)]
pub struct Arena {
    buffer: String,
    spans: Vec<Span>,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena {
    pub fn new() -> Self {
        Self {
            buffer: String::with_capacity(INITIAL_BUFFER_CAPACITY),
            spans: Vec::with_capacity(INITIAL_CANDIDATE_CAPACITY),
        }
    }

    /// Append one candidate and return its id.
    pub fn push(&mut self, candidate: &str) -> CandidateId {
        let id = candidate_id(self.spans.len())
            .unwrap_or_else(|| too_many_candidates(self.spans.len()));
        let start = self.buffer.len();
        self.buffer.push_str(candidate);
        self.buffer.push(SEPARATOR);
        self.spans.push(Span {
            start,
            len: candidate.len(),
        });
        id
    }

    /// Split `input` on `delimiter` and append every non-empty record.
    ///
    /// Invalid UTF-8 is replaced rather than rejected so one bad line never
    /// drops the whole input. Returns the number of candidates added.
    pub fn extend_from_bytes(&mut self, input: &[u8], delimiter: u8) -> usize {
        let before = self.spans.len();
        self.buffer.reserve(input.len() + 1);

        let mut start = 0;
        for end in memchr_iter(delimiter, input).chain(std::iter::once(input.len())) {
            let record = &input[start..end];
            start = end + 1;

            // Skip empty lines
            if record.is_empty() {
                continue;
            }
            self.push(&String::from_utf8_lossy(record));
        }

        self.spans.len() - before
    }

    /// Look up a candidate by id
    #[inline]
    pub fn get(&self, id: CandidateId) -> Option<&str> {
        self.spans
            .get(id as usize)
            .map(|span| &self.buffer[span.start..span.start + span.len])
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Bytes held by the text buffer, separators included
    pub fn bytes_used(&self) -> usize {
        self.buffer.len()
    }

    /// Iterate candidates in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (CandidateId, &str)> + '_ {
        self.batch(0..self.spans.len())
    }

    /// Iterate the candidates whose insertion index lies in `range`.
    ///
    /// `push` refuses indices past `CandidateId::MAX`, so every stored index
    /// converts without loss.
    pub fn batch(&self, range: Range<usize>) -> impl Iterator<Item = (CandidateId, &str)> + '_ {
        let offset = range.start;
        self.spans[range].iter().enumerate().map(move |(i, span)| {
            (
                (offset + i) as CandidateId,
                &self.buffer[span.start..span.start + span.len],
            )
        })
    }
}
