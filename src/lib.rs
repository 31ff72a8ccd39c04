//! # fzr - Fuzzy Finder
//!
//! fzr reads newline-separated candidates and ranks them against a short
//! query, favouring matches at word starts, after path separators and in
//! consecutive runs.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`matcher`] - Subsequence test, scoring and match positions
//! - [`corpus`] - Candidate storage, parallel search and the selection cursor
//! - [`tui`] - Interactive selector (feature `interactive`)
//! - [`output`] - Filter-mode output with match highlighting
//! - [`utils`] - Configuration, progress bars and small helpers
//!
//! ## Quick Start
//!
//! ```ignore
//! use fzr::corpus::{Corpus, SearchOptions};
//!
//! let mut corpus = Corpus::new(SearchOptions::default()).unwrap();
//! corpus.add("app/models/user.rb");
//! corpus.add("app/views/users/index.html");
//!
//! corpus.search("amu");
//! for (candidate, score) in corpus.results() {
//!     println!("{:.3} {}", score, candidate);
//! }
//! ```
//!
//! ## Performance
//!
//! Searching splits the corpus into 512-candidate batches claimed by a
//! worker pool through a shared atomic cursor. Each worker sorts its own
//! results and the sorted runs are merged pairwise, so the final ranking is
//! identical for any number of workers.

pub mod corpus;
pub mod matcher;
pub mod output;
#[cfg(feature = "interactive")]
pub mod tui;
pub mod utils;
