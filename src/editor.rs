// src/editor.rs - Mode state machine tying the session, views and input together

use crate::buffer::{DEFAULT_BUFFER_NAME, TextBuffer};
use crate::config::EditorConfig;
use crate::keymap::KeyMapper;
use crate::layout::{Layout, buffer_label};
use crate::mode::Mode;
use crate::operation::Operation;
use crate::search::SearchState;
use crate::session::{CloseOutcome, Session, resolve_path};
use crate::viewport::{ScreenPos, Viewport};
use crossterm::event::Event;
use log::{debug, error};
use std::path::{Path, PathBuf};

pub struct Editor {
    pub session: Session,
    pub mode: Mode,
    /// View of the active buffer.
    pub viewport: Viewport,
    /// One-line input for file names and search queries.
    pub prompt: TextBuffer,
    pub prompt_view: Viewport,
    pub search: SearchState,
    pub status_message: Option<String>,
    pub config: EditorConfig,
    pub keymap: KeyMapper,
    pub layout: Layout,
    /// Buffer the viewport anchor belongs to.
    viewed: Option<PathBuf>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let layout = Layout::new(80, 24);
        let viewport = Viewport::new(layout.buffer_start(), layout.buffer_end(), config.tab_width);
        let prompt_view = Viewport::new(layout.prompt_start(), layout.prompt_end(), config.tab_width);
        Self {
            session: Session::new(),
            mode: Mode::Edit,
            viewport,
            prompt: TextBuffer::empty(Path::new("")),
            prompt_view,
            search: SearchState::new(),
            status_message: None,
            config,
            keymap: KeyMapper::new(),
            layout,
            viewed: None,
        }
    }

    pub fn active_buffer(&self) -> Option<&TextBuffer> {
        self.session.active()
    }

    /// Open the start-up file, or an empty `untitled` buffer.
    pub fn open(&mut self, path: Option<&Path>) {
        let path = path.unwrap_or(Path::new(DEFAULT_BUFFER_NAME));
        self.open_path(path, None);
        self.derive_mode();
        self.sync_views();
    }

    /// Map a raw terminal event and run it. Returns true when the editor
    /// should terminate.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        let op = self.keymap.map(event);
        self.execute(op)
    }

    /// Run one operation in the current mode. Returns true when the editor
    /// should terminate.
    pub fn execute(&mut self, op: Operation) -> bool {
        if let Operation::Resize(cols, rows) = op {
            self.resize(cols, rows);
            return false;
        }
        if self.session.is_empty() {
            return true;
        }

        let quit = match self.mode.clone() {
            Mode::ConfirmExit(_) => self.handle_confirm_exit(op),
            Mode::ConfirmClose(index) => {
                self.handle_confirm_close(index, op);
                false
            }
            Mode::FileOpen | Mode::FileSave => {
                self.handle_file_prompt(op);
                false
            }
            Mode::Search => {
                self.handle_search(op);
                false
            }
            Mode::Dir => self.handle_dir(op),
            Mode::Edit => self.handle_edit(op),
        };
        if quit || self.session.is_empty() {
            return true;
        }

        self.derive_mode();
        self.sync_views();
        false
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.layout = Layout::new(cols, rows);
        self.sync_views();
    }

    /// Hint shown in the title bar while the prompt has focus.
    pub fn prompt_hint(&self) -> Option<&'static str> {
        match self.mode {
            Mode::FileOpen => Some("INPUT A FILE NAME | Enter to open, Esc to cancel"),
            Mode::FileSave => Some("INPUT A FILE NAME | Enter to save, Esc to cancel"),
            Mode::Search => Some("SEARCH (regex) | Enter to search, ^N/^P next/prev, Esc to leave"),
            _ => None,
        }
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!("mode {:?} -> {:?}", self.mode, mode);
            // a chord started in one mode never completes in another
            self.keymap.reset();
        }
        self.mode = mode;
    }

    /// Edit and Dir follow whatever the active buffer is.
    fn derive_mode(&mut self) {
        if !matches!(self.mode, Mode::Edit | Mode::Dir) {
            return;
        }
        let is_dir = self.session.active().is_some_and(|b| b.is_dir);
        self.set_mode(if is_dir { Mode::Dir } else { Mode::Edit });
    }

    fn sync_views(&mut self) {
        let header_rows = match self.session.active() {
            Some(buffer) if buffer.is_dir => 1,
            _ => 0,
        };
        self.viewport
            .set_region(self.layout.buffer_start(), self.layout.buffer_end(), header_rows);
        self.prompt_view
            .set_region(self.layout.prompt_start(), self.layout.prompt_end(), 0);

        if let Some(buffer) = self.session.active() {
            if self.viewed.as_deref() != Some(buffer.file_path.as_path()) {
                self.viewport.reset();
                self.viewed = Some(buffer.file_path.clone());
            }
            self.viewport.sync_cursor_to_view(buffer);
        }
        self.prompt_view.sync_cursor_to_view(&self.prompt);
    }

    fn open_path(&mut self, path: &Path, target: Option<usize>) {
        let outcome = self
            .session
            .open(path, target, self.config.show_hidden);
        self.set_status(outcome.message);
    }

    fn exit(&mut self) -> bool {
        let unsaved = self.session.unsaved();
        if unsaved.is_empty() {
            return true;
        }
        let list: Vec<String> = unsaved.iter().map(|i| i.to_string()).collect();
        self.set_status(format!(
            "Unsaved buffers: {}. Press ^X again to discard changes, any other key to cancel",
            list.join(", ")
        ));
        self.set_mode(Mode::ConfirmExit(unsaved));
        false
    }

    fn close_active(&mut self) {
        let index = self.session.active_index();
        match self.session.close(index) {
            CloseOutcome::NeedsConfirm(index) => {
                self.set_status(format!(
                    "Buffer {} has unsaved changes. Close anyway? (y/N)",
                    index
                ));
                self.set_mode(Mode::ConfirmClose(index));
            }
            CloseOutcome::Closed { remaining } => {
                self.set_status(format!("Closed buffer {}, {} left", index, remaining));
            }
        }
    }

    /// Any key press other than ^X cancels; `Noop` only stands for
    /// non-key events.
    fn handle_confirm_exit(&mut self, op: Operation) -> bool {
        match op {
            Operation::Noop => false,
            Operation::Exit => true,
            _ => {
                self.set_mode(Mode::Edit);
                self.set_status("Exit cancelled");
                false
            }
        }
    }

    fn handle_confirm_close(&mut self, index: usize, op: Operation) {
        match op {
            Operation::Noop => return,
            Operation::InsertChar('y' | 'Y') => {
                self.session.remove(index);
                self.set_status(format!("Closed buffer {} without saving", index));
            }
            _ => self.set_status("Close cancelled"),
        }
        self.set_mode(Mode::Edit);
    }

    fn enter_prompt(&mut self, mode: Mode) {
        let prefill = match mode {
            Mode::Search => self.search.query.clone(),
            _ => self
                .session
                .active()
                .map(|b| b.file_path.display().to_string())
                .unwrap_or_default(),
        };
        self.prompt = TextBuffer::empty(Path::new(""));
        self.prompt.insert_str(&prefill);
        self.prompt.dirty = false;
        self.prompt_view.reset();
        self.status_message = None;
        self.set_mode(mode);
    }

    fn prompt_text(&self) -> String {
        self.prompt.line(0).unwrap_or_default()
    }

    /// Cursor movement and text entry shared by every prompt. Returns false
    /// when `op` is not a prompt edit.
    fn edit_prompt(&mut self, op: Operation) -> bool {
        match op {
            Operation::InsertChar(c) => self.prompt.insert_rune(c),
            Operation::DeleteChar => self.prompt.delete_backward(),
            Operation::MoveCursorLeft => self.prompt_view.move_cursor_left(&mut self.prompt),
            Operation::MoveCursorRight => self.prompt_view.move_cursor_right(&mut self.prompt),
            Operation::MoveLineStart => self.prompt_view.move_cursor_line_start(&mut self.prompt),
            Operation::MoveLineEnd => self.prompt_view.move_cursor_line_end(&mut self.prompt),
            Operation::MouseLeft(pos) => {
                self.prompt_view.move_cursor_by_mouse(&mut self.prompt, pos);
            }
            _ => return false,
        }
        true
    }

    fn handle_file_prompt(&mut self, op: Operation) {
        let opening = self.mode == Mode::FileOpen;
        match op {
            Operation::Cancel | Operation::Exit => {
                self.set_mode(Mode::Edit);
                self.set_status(if opening {
                    "Open file cancelled"
                } else {
                    "Save file cancelled"
                });
            }
            Operation::InsertNewline => {
                let text = self.prompt_text();
                if text.is_empty() {
                    return;
                }
                self.set_mode(Mode::Edit);
                if opening {
                    self.open_path(Path::new(&text), None);
                } else {
                    self.save_active(Path::new(&text));
                }
            }
            other => {
                self.edit_prompt(other);
            }
        }
    }

    fn save_active(&mut self, path: &Path) {
        let path = resolve_path(path);
        let active = self.session.active_index();
        if let Some(other) = self.session.find(&path).filter(|i| *i != active) {
            self.set_status(format!("{} is already open in buffer {}", path.display(), other));
            return;
        }
        let Some(buffer) = self.session.active_mut() else {
            return;
        };
        match buffer.save(&path) {
            Ok(written) => {
                self.set_status(format!("File saved, {} bytes written", written));
            }
            Err(err) => {
                error!("failed to save {}: {}", path.display(), err);
                self.set_status(format!("Unable to save file: {}", err));
            }
        }
    }

    fn handle_search(&mut self, op: Operation) {
        match op {
            Operation::Cancel | Operation::Exit => {
                if let Some(buffer) = self.session.active_mut() {
                    buffer.highlight = None;
                }
                self.set_mode(Mode::Edit);
            }
            Operation::InsertNewline => {
                let query = self.prompt_text();
                let Some(buffer) = self.session.active_mut() else {
                    return;
                };
                match self.search.search(&query, buffer) {
                    Ok(0) => self.set_status(format!("No match for {}", query)),
                    Ok(_) => {
                        self.search.jump_to(0, buffer);
                        self.report_match();
                    }
                    Err(err) => self.set_status(err.to_string()),
                }
            }
            Operation::NextMatch | Operation::MoveCursorDown => {
                if let Some(buffer) = self.session.active_mut() {
                    self.search.next(buffer);
                }
                self.report_match();
            }
            Operation::PrevMatch | Operation::MoveCursorUp => {
                if let Some(buffer) = self.session.active_mut() {
                    self.search.prev(buffer);
                }
                self.report_match();
            }
            other => {
                if self.edit_prompt(other) && other.is_text_edit() {
                    self.search.clear();
                    if let Some(buffer) = self.session.active_mut() {
                        buffer.highlight = None;
                    }
                }
            }
        }
    }

    fn report_match(&mut self) {
        match self.search.current {
            Some(i) => {
                let msg = format!("Match {} of {}", i + 1, self.search.len());
                self.set_status(msg);
            }
            None => self.set_status("No matches"),
        }
    }

    /// ^N / ^P outside the search prompt: rerun the last query against the
    /// buffer as it is now and step from the cursor.
    fn step_match(&mut self, forward: bool) {
        if self.search.query.is_empty() {
            self.set_status("No previous search");
            return;
        }
        let query = self.search.query.clone();
        let Some(buffer) = self.session.active_mut() else {
            return;
        };
        if let Err(err) = self.search.search(&query, buffer) {
            self.set_status(err.to_string());
            return;
        }
        let cursor = buffer.cursor();
        if forward {
            self.search.next_after(cursor, buffer);
        } else {
            self.search.prev_before(cursor, buffer);
        }
        self.report_match();
    }

    fn handle_edit(&mut self, op: Operation) -> bool {
        if op != Operation::Noop {
            self.status_message = None;
        }
        if op.is_text_edit() {
            let Some(buffer) = self.session.active_mut() else {
                return false;
            };
            if buffer.read_only {
                self.set_status("Buffer is read-only");
                return false;
            }
            match op {
                Operation::InsertChar(c) => buffer.insert_rune(c),
                Operation::InsertTab => buffer.insert_rune('\t'),
                Operation::InsertNewline => buffer.new_line(),
                Operation::DeleteChar => buffer.delete_backward(),
                Operation::DeleteLine => buffer.delete_line(),
                _ => {}
            }
            return false;
        }

        match op {
            Operation::SaveFile => self.enter_prompt(Mode::FileSave),
            Operation::Search => self.enter_prompt(Mode::Search),
            Operation::NextMatch => self.step_match(true),
            Operation::PrevMatch => self.step_match(false),
            other => return self.handle_common(other),
        }
        false
    }

    fn handle_dir(&mut self, op: Operation) -> bool {
        if op != Operation::Noop {
            self.status_message = None;
        }
        match op {
            Operation::InsertNewline => self.open_dir_entry(true),
            Operation::InsertChar('t') => self.open_dir_entry(false),
            Operation::InsertChar('.') => self.toggle_hidden(),
            Operation::InsertChar('q') => self.close_active(),
            other if other.is_text_edit() => {}
            other => return self.handle_common(other),
        }
        false
    }

    fn open_dir_entry(&mut self, in_place: bool) {
        let Some(path) = self.session.active().and_then(TextBuffer::dir_entry_path) else {
            return;
        };
        let target = in_place.then(|| self.session.active_index());
        self.open_path(&path, target);
    }

    fn toggle_hidden(&mut self) {
        let Some(buffer) = self.session.active_mut() else {
            return;
        };
        let show = !buffer.show_hidden;
        if let Err(err) = buffer.reload_listing(show) {
            error!("failed to list {}: {}", buffer.file_path.display(), err);
            self.set_status(format!("Unable to list directory: {}", err));
            return;
        }
        self.set_status(if show {
            "Showing hidden files"
        } else {
            "Hiding hidden files"
        });
    }

    /// Operations that behave the same in Edit and Dir mode.
    fn handle_common(&mut self, op: Operation) -> bool {
        match op {
            Operation::Exit => return self.exit(),
            Operation::OpenFile => self.enter_prompt(Mode::FileOpen),
            Operation::CloseFile => self.close_active(),
            Operation::Help => {
                let index = self.session.open_help();
                self.set_status(format!("buffer {}: help", index));
            }
            Operation::Cancel => {
                if let Some(buffer) = self.session.active_mut() {
                    buffer.highlight = None;
                }
            }
            Operation::CommandPrefix => {
                self.set_status("^K: k delete line, n/p next/prev buffer, w close, f search");
            }
            Operation::NextBuffer => {
                let index = self.session.next_buffer();
                self.set_status(format!("Switch to buffer {}", index));
            }
            Operation::PrevBuffer => {
                let index = self.session.prev_buffer();
                self.set_status(format!("Switch to buffer {}", index));
            }
            Operation::MouseLeft(pos)
            | Operation::MouseRight(pos)
            | Operation::WheelUp(pos)
            | Operation::WheelDown(pos) => self.handle_mouse(op, pos),
            other => self.navigate(other),
        }
        false
    }

    fn navigate(&mut self, op: Operation) {
        let Some(buffer) = self.session.active_mut() else {
            return;
        };
        let view = &self.viewport;
        match op {
            Operation::MoveCursorUp => view.move_cursor_up(buffer),
            Operation::MoveCursorDown => view.move_cursor_down(buffer),
            Operation::MoveCursorLeft => view.move_cursor_left(buffer),
            Operation::MoveCursorRight => view.move_cursor_right(buffer),
            Operation::MoveLineStart => view.move_cursor_line_start(buffer),
            Operation::MoveLineEnd => view.move_cursor_line_end(buffer),
            Operation::NextHalfPage => view.move_cursor_half_screen_next(buffer),
            Operation::PrevHalfPage => view.move_cursor_half_screen_prev(buffer),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, op: Operation, pos: ScreenPos) {
        let index = self.session.active_index();
        let on_label = self
            .session
            .active()
            .is_some_and(|b| self.layout.hits_buffer_label(pos, &buffer_label(index, b)));

        if on_label {
            match op {
                Operation::MouseLeft(_) | Operation::WheelDown(_) => {
                    self.handle_common(Operation::NextBuffer);
                }
                Operation::WheelUp(_) => {
                    self.handle_common(Operation::PrevBuffer);
                }
                Operation::MouseRight(_) => self.close_active(),
                _ => {}
            }
            return;
        }

        match op {
            Operation::MouseLeft(_) => {
                if let Some(buffer) = self.session.active_mut() {
                    self.viewport.move_cursor_by_mouse(buffer, pos);
                }
            }
            Operation::WheelUp(_) => self.navigate(Operation::MoveCursorUp),
            Operation::WheelDown(_) => self.navigate(Operation::MoveCursorDown),
            _ => {}
        }
    }
}
