//! Output formatting for non-interactive (filter) mode

use crate::corpus::Corpus;
use crate::matcher::match_positions;
use std::io::{self, Write};
use termcolor::{BufferedStandardStream, Color, ColorChoice, ColorSpec, WriteColor};

/// Print every ranked match of the last search to stdout, one per line
pub fn print_matches(
    corpus: &Corpus,
    query: &str,
    show_scores: bool,
    choice: ColorChoice,
) -> io::Result<()> {
    let mut stdout = BufferedStandardStream::stdout(choice);
    write_matches(&mut stdout, corpus, query, show_scores)?;
    stdout.flush()
}

/// Write ranked matches to `out`. Matched characters are highlighted when
/// `out` supports colour.
pub fn write_matches<W: WriteColor>(
    out: &mut W,
    corpus: &Corpus,
    query: &str,
    show_scores: bool,
) -> io::Result<()> {
    let highlight = out.supports_color() && !query.is_empty();

    for (candidate, score) in corpus.results() {
        if show_scores {
            write!(out, "{:.6}\t", score)?;
        }

        if highlight {
            let m = match_positions(query, candidate);
            for (segment, matched) in highlight_segments(candidate, &m.positions) {
                if matched {
                    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
                    write!(out, "{}", segment)?;
                    out.reset()?;
                } else {
                    write!(out, "{}", segment)?;
                }
            }
            writeln!(out)?;
        } else {
            writeln!(out, "{}", candidate)?;
        }
    }

    Ok(())
}

/// Split `text` into runs of matched / unmatched characters.
///
/// `positions` are sorted byte offsets; a multi-byte character counts as
/// matched when any of its bytes is.
pub fn highlight_segments<'a>(text: &'a str, positions: &[usize]) -> Vec<(&'a str, bool)> {
    let mut segments = Vec::new();
    let mut pending = positions.iter().copied().peekable();
    let mut run_start = 0;
    let mut run_matched = false;

    for (idx, ch) in text.char_indices() {
        let end = idx + ch.len_utf8();
        let mut matched = false;
        while let Some(&p) = pending.peek() {
            if p >= end {
                break;
            }
            if p >= idx {
                matched = true;
            }
            pending.next();
        }

        if idx == 0 {
            run_matched = matched;
        } else if matched != run_matched {
            segments.push((&text[run_start..idx], run_matched));
            run_start = idx;
            run_matched = matched;
        }
    }

    if run_start < text.len() {
        segments.push((&text[run_start..], run_matched));
    }
    segments
}
