#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the delimiter, second the query length
    let Some((&delimiter, rest)) = data.split_first() else {
        return;
    };
    let Some((&query_len, rest)) = rest.split_first() else {
        return;
    };
    let (query, input) = rest.split_at((query_len as usize).min(rest.len()));
    let query = String::from_utf8_lossy(query);

    let options = fzr::corpus::SearchOptions {
        workers: 2,
        batch_size: 4,
    };
    let Ok(mut corpus) = fzr::corpus::Corpus::new(options) else {
        return;
    };
    let _ = corpus.load(input, delimiter);
    corpus.search(&query);

    assert!(corpus.available() <= corpus.len());
    for i in 1..corpus.available() {
        assert!(corpus.get_score(i - 1) >= corpus.get_score(i));
    }
});
