use crate::corpus::Corpus;

/// Longest query accepted from the keyboard, in bytes
const QUERY_SIZE_MAX: usize = 4096;

/// Lines kept visible below the selection while scrolling
const SCROLLOFF: usize = 1;

/// Display settings for interactive mode
#[derive(Debug, Clone)]
pub struct Settings {
    pub prompt: String,
    /// Result rows below the prompt
    pub lines: usize,
    pub show_scores: bool,
    /// Show `[available/total]` under the prompt
    pub show_info: bool,
}

/// Something the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Insert(char),
    DeleteChar,
    DeleteWord,
    DeleteAll,
    CursorLeft,
    CursorRight,
    CursorStart,
    CursorEnd,
    Next,
    Prev,
    PageUp,
    PageDown,
    Autocomplete,
    Accept,
    Abort,
}

/// How an interactive session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The selected candidate, or the raw query when nothing matched
    Accepted(String),
    Aborted,
}

/// Application state
pub struct App {
    pub corpus: Corpus,
    pub query: String,
    /// Byte offset of the text cursor in `query`, always on a char boundary
    cursor: usize,
    pub settings: Settings,
    /// Query changed since the last search
    dirty: bool,
}

impl App {
    pub fn new(corpus: Corpus, settings: Settings, initial_query: Option<String>) -> Self {
        let mut query = initial_query.unwrap_or_default();
        truncate_to_boundary(&mut query, QUERY_SIZE_MAX);

        Self {
            corpus,
            cursor: query.len(),
            query,
            settings,
            dirty: true,
        }
    }

    /// Run the pending search, if the query changed.
    ///
    /// Edits only mark the query dirty so a burst of keystrokes costs one
    /// search once the input queue is drained.
    pub fn refresh(&mut self) {
        if self.dirty {
            self.corpus.search(&self.query);
            self.dirty = false;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Query text left of the cursor
    pub fn query_before_cursor(&self) -> &str {
        &self.query[..self.cursor]
    }

    pub fn apply(&mut self, action: Action) -> Option<Outcome> {
        match action {
            Action::Insert(c) => {
                if self.query.len() + c.len_utf8() <= QUERY_SIZE_MAX {
                    self.query.insert(self.cursor, c);
                    self.cursor += c.len_utf8();
                    self.dirty = true;
                }
            }
            Action::DeleteChar => {
                let start = self.prev_boundary();
                self.delete_before_cursor(start);
            }
            Action::DeleteWord => self.delete_word(),
            Action::DeleteAll => self.delete_before_cursor(0),
            Action::CursorLeft => self.cursor = self.prev_boundary(),
            Action::CursorRight => self.cursor = self.next_boundary(),
            Action::CursorStart => self.cursor = 0,
            Action::CursorEnd => self.cursor = self.query.len(),
            Action::Next => {
                self.refresh();
                self.corpus.next();
            }
            Action::Prev => {
                self.refresh();
                self.corpus.prev();
            }
            Action::PageUp => {
                self.refresh();
                self.corpus.page_up(self.settings.lines);
            }
            Action::PageDown => {
                self.refresh();
                self.corpus.page_down(self.settings.lines);
            }
            Action::Autocomplete => {
                self.refresh();
                if let Some(selected) = self.corpus.selected() {
                    let mut query = selected.to_string();
                    truncate_to_boundary(&mut query, QUERY_SIZE_MAX);
                    self.cursor = query.len();
                    self.query = query;
                    self.dirty = true;
                }
            }
            Action::Accept => {
                self.refresh();
                let chosen = self
                    .corpus
                    .selected()
                    .map(str::to_string)
                    .unwrap_or_else(|| self.query.clone());
                return Some(Outcome::Accepted(chosen));
            }
            Action::Abort => return Some(Outcome::Aborted),
        }
        None
    }

    /// Delete the word left of the cursor and any whitespace after it (Ctrl+W)
    fn delete_word(&mut self) {
        let before = self.query_before_cursor();
        let trimmed = before.trim_end();
        let start = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(idx, c)| idx + c.len_utf8())
            .unwrap_or(0);
        self.delete_before_cursor(start);
    }

    /// Remove `query[start..cursor]` and move the cursor to `start`
    fn delete_before_cursor(&mut self, start: usize) {
        if start < self.cursor {
            self.query.drain(start..self.cursor);
            self.cursor = start;
            self.dirty = true;
        }
    }

    fn prev_boundary(&self) -> usize {
        self.query_before_cursor()
            .char_indices()
            .next_back()
            .map(|(idx, _)| idx)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.query[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.cursor)
    }

    /// First result row to draw so the selection stays visible
    pub fn scroll_start(&self) -> usize {
        let lines = self.settings.lines;
        let selection = self.corpus.selection();
        let available = self.corpus.available();

        if selection + SCROLLOFF < lines {
            return 0;
        }
        let start = selection + SCROLLOFF + 1 - lines;
        if start + lines >= available {
            available.saturating_sub(lines)
        } else {
            start
        }
    }
}

fn truncate_to_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}
