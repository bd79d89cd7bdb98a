use crate::cursor::Position;
use log::{debug, error};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name bound to a buffer started without a file argument.
pub const DEFAULT_BUFFER_NAME: &str = "untitled";
/// Pseudo path of the built-in help page.
pub const HELP_BUFFER_NAME: &str = "help.txt";

const HELP_TEXT: &[&str] = &[
    "pine key bindings",
    "",
    "^X\tExit (press ^X again to discard unsaved changes)",
    "^R\tOpen a file or directory",
    "^O\tSave the current buffer",
    "^W\tClose the current buffer",
    "^F\tSearch (regex), ^N / ^P for next / previous match",
    "^A\tGo to beginning of line",
    "^E\tGo to end of line",
    "^V\tHalf page down",
    "^Z\tHalf page up",
    "^K k\tDelete current line",
    "^K n\tNext buffer (also Alt+Right)",
    "^K p\tPrevious buffer (also Alt+Left)",
    "^/\tThis help page",
    "",
    "Directory buffers",
    "Enter\tOpen entry in place",
    "t\tOpen entry in a new buffer",
    ".\tShow or hide dot-files",
    "q\tClose the listing",
    "",
    "More help at https://github.com/ydzhou/pine",
];

#[derive(Debug, Error)]
pub enum BufferError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("buffer is read-only")]
    ReadOnly,
}

/// Outcome of loading a path into a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenState {
    Success,
    /// The path does not exist yet; the buffer is bound to it as a new file.
    NotFound,
    /// Reading failed for another reason; the buffer is inert.
    HasError,
    /// The path is a directory; the buffer holds a read-only listing.
    IsDir,
}

/// An ordered sequence of rune lines plus the cursor that edits them.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<Vec<char>>,
    cursor: Position,
    pub dirty: bool,
    pub file_path: PathBuf,
    pub read_only: bool,
    pub is_dir: bool,
    pub show_hidden: bool,
    /// Span emphasised by the renderer, end exclusive.
    pub highlight: Option<(Position, Position)>,
    /// Reason an open failed, shown alongside the empty buffer.
    pub note: Option<String>,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::empty(Path::new(DEFAULT_BUFFER_NAME))
    }
}

impl TextBuffer {
    pub fn empty(path: &Path) -> Self {
        Self {
            lines: Vec::new(),
            cursor: Position::origin(),
            dirty: false,
            file_path: path.to_path_buf(),
            read_only: false,
            is_dir: false,
            show_hidden: false,
            highlight: None,
            note: None,
        }
    }

    /// Buffer bound to `path` holding `lines`, not dirty.
    pub fn from_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Self {
        let mut buffer = Self::empty(path);
        buffer.lines = lines.iter().map(|l| l.as_ref().chars().collect()).collect();
        buffer
    }

    /// Load `path` into a new buffer. Failures are reported through the
    /// returned state, never as an error: the buffer always exists.
    pub fn open(path: &Path, show_hidden: bool) -> (Self, OpenState) {
        let mut buffer = Self::empty(path);
        buffer.show_hidden = show_hidden;

        let state = match fs::metadata(path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => OpenState::NotFound,
            Err(err) => buffer.fail(err),
            Ok(meta) if meta.is_dir() => match buffer.list_directory(show_hidden) {
                Ok(()) => OpenState::IsDir,
                Err(err) => buffer.fail(err),
            },
            Ok(_) => match fs::read_to_string(path) {
                Ok(content) => {
                    buffer.lines = split_lines(&content);
                    OpenState::Success
                }
                Err(err) => buffer.fail(err),
            },
        };
        debug!("opened {} as {:?}", path.display(), state);
        (buffer, state)
    }

    /// The built-in key binding reference.
    pub fn help() -> Self {
        let mut buffer = Self::from_lines(Path::new(HELP_BUFFER_NAME), HELP_TEXT);
        buffer.read_only = true;
        buffer
    }

    fn fail(&mut self, err: io::Error) -> OpenState {
        error!("failed to open {}: {}", self.file_path.display(), err);
        self.lines.clear();
        self.is_dir = false;
        self.read_only = true;
        self.note = Some(err.to_string());
        OpenState::HasError
    }

    fn list_directory(&mut self, show_hidden: bool) -> io::Result<()> {
        let mut entries: Vec<String> = fs::read_dir(&self.file_path)?
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                if !show_hidden && name.starts_with('.') {
                    return None;
                }
                if entry.path().is_dir() {
                    Some(format!("{name}/"))
                } else {
                    Some(name)
                }
            })
            .collect();
        entries.sort();

        let mut lines = vec![vec!['.'], vec!['.', '.']];
        lines.extend(entries.iter().map(|e| e.chars().collect::<Vec<_>>()));
        self.lines = lines;
        self.is_dir = true;
        self.read_only = true;
        self.show_hidden = show_hidden;
        self.set_cursor(self.cursor);
        Ok(())
    }

    /// Re-list a directory buffer, e.g. after toggling dot-files.
    pub fn reload_listing(&mut self, show_hidden: bool) -> Result<(), BufferError> {
        if !self.is_dir {
            return Ok(());
        }
        self.list_directory(show_hidden)?;
        Ok(())
    }

    /// Path named by the directory entry under the cursor.
    pub fn dir_entry_path(&self) -> Option<PathBuf> {
        if !self.is_dir {
            return None;
        }
        let entry = self.line(self.cursor.line)?;
        match entry.trim_end_matches('/') {
            "." => Some(self.file_path.clone()),
            ".." => Some(
                self.file_path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.file_path.clone()),
            ),
            name => Some(self.file_path.join(name)),
        }
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Move the cursor, clamping it into the buffer.
    pub fn set_cursor(&mut self, pos: Position) {
        if self.lines.is_empty() {
            self.cursor = Position::origin();
            return;
        }
        let line = pos.line.min(self.lines.len() - 1);
        let col = pos.col.min(self.lines[line].len());
        self.cursor = Position::new(line, col);
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line_chars(&self, line_idx: usize) -> Option<&[char]> {
        self.lines.get(line_idx).map(Vec::as_slice)
    }

    pub fn line(&self, line_idx: usize) -> Option<String> {
        self.lines.get(line_idx).map(|l| l.iter().collect())
    }

    pub fn line_len(&self, line_idx: usize) -> usize {
        self.lines.get(line_idx).map_or(0, Vec::len)
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.iter().collect()).collect()
    }

    /// Full content with every line terminated by `\n`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.extend(line.iter());
            out.push('\n');
        }
        out
    }

    fn assert_cursor(&self, op: &str) {
        let Position { line, col } = self.cursor;
        assert!(
            line < self.lines.len() && col <= self.lines[line].len(),
            "failed to {op} at ({line},{col}): cursor outside buffer of {} lines",
            self.lines.len()
        );
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.highlight = None;
    }

    pub fn insert_rune(&mut self, ch: char) {
        if self.read_only {
            return;
        }
        // A cursor parked one past the last line appends a fresh line.
        if self.cursor.line == self.lines.len() {
            self.lines.push(Vec::new());
        }
        self.assert_cursor("insert");

        let Position { line, col } = self.cursor;
        self.lines[line].insert(col, ch);
        self.cursor.col += 1;
        self.touch();
    }

    pub fn insert_str(&mut self, s: &str) {
        for ch in s.chars() {
            self.insert_rune(ch);
        }
    }

    /// Split the current line at the cursor. The new line starts with the
    /// leading whitespace run of the original line.
    pub fn new_line(&mut self) {
        if self.read_only {
            return;
        }
        if self.lines.is_empty() {
            self.lines.push(Vec::new());
            self.touch();
            return;
        }
        self.assert_cursor("split line");

        let Position { line, col } = self.cursor;
        let current = &self.lines[line];
        let mut next: Vec<char> = current
            .iter()
            .take_while(|c| **c == ' ' || **c == '\t')
            .copied()
            .collect();
        let indent_len = next.len();
        next.extend_from_slice(&current[col..]);

        self.lines[line].truncate(col);
        self.lines.insert(line + 1, next);
        self.cursor = Position::new(line + 1, indent_len);
        self.touch();
    }

    /// Backspace: remove the rune before the cursor, or join with the
    /// previous line when at column 0.
    pub fn delete_backward(&mut self) {
        if self.read_only {
            return;
        }
        let Position { line, col } = self.cursor;
        if line == 0 && col == 0 {
            return;
        }
        self.assert_cursor("delete");

        if col == 0 {
            let current = self.lines.remove(line);
            let prev = &mut self.lines[line - 1];
            let prev_len = prev.len();
            prev.extend(current);
            self.cursor = Position::new(line - 1, prev_len);
        } else {
            self.lines[line].remove(col - 1);
            self.cursor.col -= 1;
        }
        self.touch();
    }

    pub fn delete_line(&mut self) {
        if self.read_only || self.lines.is_empty() {
            return;
        }
        self.assert_cursor("delete line");

        let line = self.cursor.line;
        if self.lines.len() == 1 {
            self.lines[0].clear();
        } else {
            self.lines.remove(line);
        }
        self.cursor = Position::new(line.saturating_sub(1), 0);
        self.touch();
    }

    /// Write every line followed by `\n` to `path` and rebind the buffer to
    /// it. Returns the number of bytes written.
    pub fn save(&mut self, path: &Path) -> Result<usize, BufferError> {
        if self.read_only {
            return Err(BufferError::ReadOnly);
        }
        let content = self.text();
        fs::write(path, content.as_bytes())?;
        self.file_path = path.to_path_buf();
        self.dirty = false;
        self.note = None;
        debug!("saved {} bytes to {}", content.len(), path.display());
        Ok(content.len())
    }
}

fn split_lines(content: &str) -> Vec<Vec<char>> {
    if content.is_empty() {
        return Vec::new();
    }
    let body = content.strip_suffix('\n').unwrap_or(content);
    body.split('\n').map(|l| l.chars().collect()).collect()
}
