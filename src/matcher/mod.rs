pub mod bonus;
pub mod scorer;

pub use bonus::{MATCH_MAX_LEN, SCORE_MAX, SCORE_MIN};
pub use scorer::{has_match, match_positions, score, Match};
