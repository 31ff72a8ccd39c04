use crate::matcher::match_positions;
use crate::output::highlight_segments;
use crate::tui::app::App;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    let mut lines = Vec::with_capacity(app.settings.lines + 2);

    lines.push(Line::from(vec![
        Span::raw(app.settings.prompt.as_str()),
        Span::raw(app.query.as_str()),
    ]));
    if app.settings.show_info {
        lines.push(Line::raw(info_line(app.corpus.available(), app.corpus.len())));
    }

    let start = app.scroll_start();
    for row in start..start + app.settings.lines {
        match app.corpus.get(row) {
            Some(candidate) => lines.push(result_line(app, row, candidate, area.width as usize)),
            None => lines.push(Line::default()),
        }
    }

    f.render_widget(Paragraph::new(Text::from(lines)), area);

    let cursor = app.settings.prompt.width() + app.query_before_cursor().width();
    let cursor = cursor.min(area.width.saturating_sub(1) as usize) as u16;
    f.set_cursor_position((area.x + cursor, area.y));
}

fn result_line<'a>(app: &'a App, row: usize, candidate: &'a str, width: usize) -> Line<'a> {
    let match_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let mut spans = Vec::new();
    let mut width = width;

    if app.settings.show_scores {
        let prefix = score_prefix(app.corpus.get_score(row));
        width = width.saturating_sub(prefix.width());
        spans.push(Span::raw(prefix));
    }

    let (shown, truncated) = clip(candidate, width);
    let positions = if app.query.is_empty() {
        Vec::new()
    } else {
        match_positions(&app.query, candidate).positions
    };
    for (segment, matched) in highlight_segments(shown, &positions) {
        if matched {
            spans.push(Span::styled(segment, match_style));
        } else {
            spans.push(Span::raw(segment));
        }
    }
    if truncated {
        spans.push(Span::raw("$"));
    }

    let line = Line::from(spans);
    if row == app.corpus.selection() {
        line.style(Style::default().add_modifier(Modifier::REVERSED))
    } else {
        line
    }
}

/// `[available/total]`
fn info_line(available: usize, total: usize) -> String {
    format!("[{}/{}]", available, total)
}

/// `(score) ` with the score right-aligned in five columns
fn score_prefix(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("({:5.2}) ", s),
        None => "(     ) ".to_string(),
    }
}

/// Longest prefix of `text` that fits in `width` terminal columns, reserving
/// the last column for a `$` marker when the text does not fit.
fn clip(text: &str, width: usize) -> (&str, bool) {
    let keep = width.saturating_sub(1);
    if text.width() <= keep {
        return (text, false);
    }

    let mut used = 0;
    let mut end = 0;
    for (idx, ch) in text.char_indices() {
        used += ch.width().unwrap_or(0);
        if used > keep {
            break;
        }
        end = idx + ch.len_utf8();
    }
    (&text[..end], true)
}
