#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    needle: &'a str,
    haystack: &'a str,
}

fuzz_target!(|input: Input| {
    let matched = fzr::matcher::has_match(input.needle, input.haystack);
    let score = fzr::matcher::score(input.needle, input.haystack);
    let m = fzr::matcher::match_positions(input.needle, input.haystack);

    if !matched {
        assert_eq!(score, fzr::matcher::SCORE_MIN);
    }
    assert!(m.positions.is_empty() || m.positions.len() == input.needle.len());
    assert!(m.positions.windows(2).all(|w| w[0] < w[1]));
    assert!(m.positions.iter().all(|&p| p < input.haystack.len()));
});
