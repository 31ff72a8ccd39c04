//! Fuzzy scorer
//!
//! Decides whether a needle is an ordered, case-insensitive subsequence of a
//! haystack, scores the best alignment and recovers the matched positions.
//!
//! The alignment is a dynamic program over two `n x m` tables:
//! - `D[i][j]`: best score of `needle[..=i]` ending with `needle[i]` matched at `haystack[j]`
//! - `M[i][j]`: best score of `needle[..=i]` using `haystack[..=j]`
//!
//! Scoring only needs the previous row, so [`score`] keeps two rows on the
//! stack. [`match_positions`] keeps both tables for the backtrack.

use super::bonus::{
    precompute_bonus, MATCH_MAX_LEN, SCORE_GAP_INNER, SCORE_GAP_LEADING, SCORE_GAP_TRAILING,
    SCORE_MATCH_CONSECUTIVE, SCORE_MAX, SCORE_MIN,
};

/// Result of [`match_positions`]
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub score: f64,
    /// Byte offsets into the haystack, one per needle byte, strictly increasing.
    /// Empty when the pair could not be aligned.
    pub positions: Vec<usize>,
}

impl Match {
    fn unmatched() -> Self {
        Self {
            score: SCORE_MIN,
            positions: Vec::new(),
        }
    }
}

/// True if every byte of `needle` appears in `haystack`, in order, ignoring
/// ASCII case. The empty needle matches everything.
pub fn has_match(needle: &str, haystack: &str) -> bool {
    let mut rest = haystack.bytes();
    needle.bytes().all(|n| {
        let n = n.to_ascii_lowercase();
        rest.any(|h| h.to_ascii_lowercase() == n)
    })
}

/// Outcome of the cases that never reach the alignment.
enum Shortcut {
    Score(f64),
    Align,
}

fn shortcut(needle: &[u8], haystack: &[u8]) -> Shortcut {
    if needle.is_empty() {
        return Shortcut::Score(SCORE_MIN);
    }
    if needle.eq_ignore_ascii_case(haystack) {
        return Shortcut::Score(SCORE_MAX);
    }
    if haystack.is_empty() || haystack.len() > MATCH_MAX_LEN || needle.len() > haystack.len() {
        return Shortcut::Score(SCORE_MIN);
    }
    Shortcut::Align
}

/// Score `needle` against `haystack`.
///
/// Returns `SCORE_MIN` for the empty needle, for non-matches and for
/// haystacks longer than [`MATCH_MAX_LEN`]; `SCORE_MAX` for exact matches.
pub fn score(needle: &str, haystack: &str) -> f64 {
    let (needle, haystack) = (needle.as_bytes(), haystack.as_bytes());
    if let Shortcut::Score(s) = shortcut(needle, haystack) {
        return s;
    }

    let prepared = Prepared::new(needle, haystack);
    let m = prepared.m;

    let mut d_rows = [[SCORE_MIN; MATCH_MAX_LEN]; 2];
    let mut m_rows = [[SCORE_MIN; MATCH_MAX_LEN]; 2];
    let [d0, d1] = &mut d_rows;
    let [m0, m1] = &mut m_rows;
    let (mut last_d, mut cur_d) = (&mut d0[..m], &mut d1[..m]);
    let (mut last_m, mut cur_m) = (&mut m0[..m], &mut m1[..m]);

    for i in 0..prepared.n {
        prepared.match_row(i, last_d, last_m, cur_d, cur_m);
        std::mem::swap(&mut last_d, &mut cur_d);
        std::mem::swap(&mut last_m, &mut cur_m);
    }

    last_m[m - 1]
}

/// Score `needle` against `haystack` and recover one optimal alignment.
///
/// Ties are broken toward the latest position in the haystack.
pub fn match_positions(needle: &str, haystack: &str) -> Match {
    let (needle, haystack) = (needle.as_bytes(), haystack.as_bytes());
    match shortcut(needle, haystack) {
        Shortcut::Score(s) if s == SCORE_MAX => {
            return Match {
                score: s,
                positions: (0..needle.len()).collect(),
            };
        }
        Shortcut::Score(_) => return Match::unmatched(),
        Shortcut::Align => {}
    }

    let prepared = Prepared::new(needle, haystack);
    let (n, m) = (prepared.n, prepared.m);

    let mut d = vec![SCORE_MIN; n * m];
    let mut mm = vec![SCORE_MIN; n * m];

    for i in 0..n {
        let (d_prev, d_rest) = d.split_at_mut(i * m);
        let (m_prev, m_rest) = mm.split_at_mut(i * m);
        let (last_d, last_m) = if i > 0 {
            (&d_prev[(i - 1) * m..], &m_prev[(i - 1) * m..])
        } else {
            (&[][..], &[][..])
        };
        prepared.match_row(i, last_d, last_m, &mut d_rest[..m], &mut m_rest[..m]);
    }

    let score = mm[n * m - 1];
    if score == SCORE_MIN {
        return Match::unmatched();
    }

    let mut positions = vec![0usize; n];
    let mut match_required = false;
    let mut j = m;
    for i in (0..n).rev() {
        while j > 0 {
            j -= 1;
            let cell_d = d[i * m + j];
            let cell_m = mm[i * m + j];
            if cell_d != SCORE_MIN && (match_required || cell_d == cell_m) {
                // A consecutive run forces the previous needle byte onto j - 1
                match_required = i > 0
                    && j > 0
                    && cell_m == d[(i - 1) * m + j - 1] + SCORE_MATCH_CONSECUTIVE;
                positions[i] = j;
                break;
            }
        }
    }

    Match { score, positions }
}

/// Lowercased inputs plus the bonus table for one alignment.
struct Prepared {
    needle: [u8; MATCH_MAX_LEN],
    haystack: [u8; MATCH_MAX_LEN],
    bonus: [f64; MATCH_MAX_LEN],
    n: usize,
    m: usize,
}

impl Prepared {
    /// Callers guarantee `needle.len() <= haystack.len() <= MATCH_MAX_LEN`.
    fn new(needle: &[u8], haystack: &[u8]) -> Self {
        let mut prepared = Self {
            needle: [0; MATCH_MAX_LEN],
            haystack: [0; MATCH_MAX_LEN],
            bonus: [0.0; MATCH_MAX_LEN],
            n: needle.len(),
            m: haystack.len(),
        };

        for (dst, src) in prepared.needle.iter_mut().zip(needle) {
            *dst = src.to_ascii_lowercase();
        }
        for (dst, src) in prepared.haystack.iter_mut().zip(haystack) {
            *dst = src.to_ascii_lowercase();
        }
        // Bonuses look at the original case (camelCase humps)
        precompute_bonus(haystack, &mut prepared.bonus);

        prepared
    }

    /// Compute row `i` of both tables from row `i - 1`.
    #[inline]
    fn match_row(
        &self,
        i: usize,
        last_d: &[f64],
        last_m: &[f64],
        cur_d: &mut [f64],
        cur_m: &mut [f64],
    ) {
        let gap = if i == self.n - 1 {
            SCORE_GAP_TRAILING
        } else {
            SCORE_GAP_INNER
        };
        let ch = self.needle[i];
        let mut prev_score = SCORE_MIN;

        for j in 0..self.m {
            if ch == self.haystack[j] {
                let score = if i == 0 {
                    j as f64 * SCORE_GAP_LEADING + self.bonus[j]
                } else if j > 0 {
                    // Consecutive matches replace the positional bonus
                    (last_m[j - 1] + self.bonus[j])
                        .max(last_d[j - 1] + SCORE_MATCH_CONSECUTIVE)
                } else {
                    SCORE_MIN
                };
                cur_d[j] = score;
                prev_score = score.max(prev_score + gap);
            } else {
                cur_d[j] = SCORE_MIN;
                prev_score += gap;
            }
            cur_m[j] = prev_score;
        }
    }
}
