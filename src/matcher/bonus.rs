//! Scoring weights and the positional bonus table.
//!
//! The weights are fixed heuristics; changing any of them changes the ranking
//! order produced for every query.

/// Score of a candidate that does not match (or cannot be ranked).
pub const SCORE_MIN: f64 = f64::NEG_INFINITY;
/// Score of an exact (case-insensitive) match.
pub const SCORE_MAX: f64 = f64::INFINITY;

/// Haystacks longer than this many bytes are never aligned and score `SCORE_MIN`.
pub const MATCH_MAX_LEN: usize = 1024;

pub const SCORE_GAP_LEADING: f64 = -0.005;
pub const SCORE_GAP_TRAILING: f64 = -0.005;
pub const SCORE_GAP_INNER: f64 = -0.01;
pub const SCORE_MATCH_CONSECUTIVE: f64 = 1.0;
pub const SCORE_MATCH_SLASH: f64 = 0.9;
pub const SCORE_MATCH_WORD: f64 = 0.8;
pub const SCORE_MATCH_CAPITAL: f64 = 0.7;
pub const SCORE_MATCH_DOT: f64 = 0.6;

/// Byte treated as preceding the first haystack character.
pub const START_OF_STRING: u8 = b'/';

/// Bonus for matching `ch` when it directly follows `prev`.
///
/// Only alphanumeric characters can start a word, so punctuation never
/// earns a bonus itself.
#[inline]
pub fn compute_bonus(prev: u8, ch: u8) -> f64 {
    if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
        separator_bonus(prev)
    } else if ch.is_ascii_uppercase() {
        if prev.is_ascii_lowercase() {
            SCORE_MATCH_CAPITAL
        } else {
            separator_bonus(prev)
        }
    } else {
        0.0
    }
}

#[inline]
fn separator_bonus(prev: u8) -> f64 {
    match prev {
        b'/' => SCORE_MATCH_SLASH,
        b'-' | b'_' | b' ' => SCORE_MATCH_WORD,
        b'.' => SCORE_MATCH_DOT,
        _ => 0.0,
    }
}

/// Fill `out` with the bonus for every position of `haystack`.
pub fn precompute_bonus(haystack: &[u8], out: &mut [f64]) {
    let mut prev = START_OF_STRING;
    for (slot, &ch) in out.iter_mut().zip(haystack) {
        *slot = compute_bonus(prev, ch);
        prev = ch;
    }
}
