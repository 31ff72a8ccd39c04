mod app;
mod ui;

pub use app::{Action, App, Outcome, Settings};

use crate::corpus::Corpus;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{self, disable_raw_mode, enable_raw_mode},
};
use ratatui::{backend::CrosstermBackend, Terminal, TerminalOptions, Viewport};
use std::io::{self, Stderr};
use std::time::Duration;

type Term = Terminal<CrosstermBackend<Stderr>>;

/// Run the interactive selector over `corpus`.
///
/// Draws inline on stderr so stdout stays free for the chosen candidate.
pub fn run(corpus: Corpus, mut settings: Settings, initial_query: Option<String>) -> Result<Outcome> {
    let (_, height) = terminal::size()?;
    settings.lines = fit_lines(&settings, corpus.len(), height);
    let viewport_height = (header_rows(&settings) + settings.lines) as u16;

    let mut app = App::new(corpus, settings, initial_query);

    // Setup terminal
    enable_raw_mode()?;
    let backend = CrosstermBackend::new(io::stderr());
    let mut terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(viewport_height),
        },
    )?;

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    terminal.clear()?;
    disable_raw_mode()?;
    terminal.show_cursor()?;

    result
}

/// Rows above the results: the prompt, plus the info line when enabled
fn header_rows(settings: &Settings) -> usize {
    1 + settings.show_info as usize
}

/// Result rows that fit both the candidate count and a terminal `height` rows tall
fn fit_lines(settings: &Settings, candidates: usize, height: u16) -> usize {
    settings
        .lines
        .min(candidates)
        .min((height as usize).saturating_sub(header_rows(settings)))
}

fn run_app(terminal: &mut Term, app: &mut App) -> Result<Outcome> {
    loop {
        // Search and redraw only once pending input is drained
        if !event::poll(Duration::ZERO)? {
            app.refresh();
            terminal.draw(|f| ui::draw(f, app))?;
        }

        // Only handle key press events, not release or repeat
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(action) = key_action(key) {
                if let Some(outcome) = app.apply(action) {
                    tracing::debug!(?outcome, "interactive session finished");
                    return Ok(outcome);
                }
            }
        }
    }
}

/// Map a key press to an action, using readline-style bindings
pub fn key_action(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c' | 'd' | 'g') => Some(Action::Abort),
            KeyCode::Char('h') => Some(Action::DeleteChar),
            KeyCode::Char('w') => Some(Action::DeleteWord),
            KeyCode::Char('u') => Some(Action::DeleteAll),
            KeyCode::Char('n' | 'j') => Some(Action::Next),
            KeyCode::Char('p' | 'k') => Some(Action::Prev),
            KeyCode::Char('i') => Some(Action::Autocomplete),
            KeyCode::Char('m') => Some(Action::Accept),
            KeyCode::Char('a') => Some(Action::CursorStart),
            KeyCode::Char('e') => Some(Action::CursorEnd),
            KeyCode::Char('b') => Some(Action::CursorLeft),
            KeyCode::Char('f') => Some(Action::CursorRight),
            _ => None,
        };
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        return None;
    }

    match key.code {
        KeyCode::Char(c) => Some(Action::Insert(c)),
        KeyCode::Backspace => Some(Action::DeleteChar),
        KeyCode::Enter => Some(Action::Accept),
        KeyCode::Tab => Some(Action::Autocomplete),
        KeyCode::Esc => Some(Action::Abort),
        KeyCode::Down => Some(Action::Next),
        KeyCode::Up => Some(Action::Prev),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::Left => Some(Action::CursorLeft),
        KeyCode::Right => Some(Action::CursorRight),
        KeyCode::Home => Some(Action::CursorStart),
        KeyCode::End => Some(Action::CursorEnd),
        _ => None,
    }
}
