// session.rs - The ordered set of open buffers

use crate::buffer::{HELP_BUFFER_NAME, OpenState, TextBuffer};
use log::{debug, warn};
use std::env;
use std::path::{Component, Path, PathBuf};

/// Result of [`Session::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOutcome {
    pub index: usize,
    pub state: OpenState,
    /// The path was already open and the session only switched to it.
    pub reused: bool,
    pub message: String,
}

/// Result of [`Session::close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The buffer has unsaved changes; nothing was removed.
    NeedsConfirm(usize),
    Closed { remaining: usize },
}

/// Expand `~`, make `path` absolute against the working directory and fold
/// `.` and `..` components without touching the filesystem.
pub fn resolve_path(path: &Path) -> PathBuf {
    let expanded = match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    };

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        match env::current_dir() {
            Ok(cwd) => cwd.join(expanded),
            Err(err) => {
                warn!("failed to read working directory: {}", err);
                expanded
            }
        }
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[derive(Debug, Default)]
pub struct Session {
    buffers: Vec<TextBuffer>,
    active: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn buffers(&self) -> &[TextBuffer] {
        &self.buffers
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> Option<&TextBuffer> {
        self.buffers.get(self.active)
    }

    pub fn active_mut(&mut self) -> Option<&mut TextBuffer> {
        self.buffers.get_mut(self.active)
    }

    pub fn find(&self, path: &Path) -> Option<usize> {
        self.buffers.iter().position(|b| b.file_path == path)
    }

    /// Open `path`, switching to it if it is already open. A valid `target`
    /// index is replaced in place; otherwise the buffer is appended.
    pub fn open(&mut self, path: &Path, target: Option<usize>, show_hidden: bool) -> OpenOutcome {
        let path = resolve_path(path);

        if let Some(index) = self.find(&path) {
            self.active = index;
            let state = if self.buffers[index].is_dir {
                OpenState::IsDir
            } else {
                OpenState::Success
            };
            debug!("buffer {}: {} already open", index, path.display());
            return OpenOutcome {
                index,
                state,
                reused: true,
                message: format!("buffer {}: switched to {}", index, path.display()),
            };
        }

        let (buffer, state) = TextBuffer::open(&path, show_hidden);
        let message = match state {
            OpenState::NotFound => format!("new file {}", path.display()),
            OpenState::HasError => format!(
                "failed to open {}: {}",
                path.display(),
                buffer.note.as_deref().unwrap_or("unknown error")
            ),
            OpenState::Success | OpenState::IsDir => String::new(),
        };

        let index = match target {
            Some(i) if i < self.buffers.len() => {
                self.buffers[i] = buffer;
                i
            }
            _ => {
                self.buffers.push(buffer);
                self.buffers.len() - 1
            }
        };
        self.active = index;

        let message = if message.is_empty() {
            format!("buffer {}: opened {}", index, path.display())
        } else {
            format!("buffer {}: {}", index, message)
        };
        debug!("{}", message);
        OpenOutcome {
            index,
            state,
            reused: false,
            message,
        }
    }

    /// Switch to the help page, creating it on first use.
    pub fn open_help(&mut self) -> usize {
        let index = match self.find(Path::new(HELP_BUFFER_NAME)) {
            Some(i) => i,
            None => {
                self.buffers.push(TextBuffer::help());
                self.buffers.len() - 1
            }
        };
        self.active = index;
        index
    }

    /// Close buffer `index` unless it holds unsaved changes.
    pub fn close(&mut self, index: usize) -> CloseOutcome {
        if let Some(buffer) = self.buffers.get(index) {
            if buffer.dirty && !buffer.read_only {
                return CloseOutcome::NeedsConfirm(index);
            }
        }
        self.remove(index);
        CloseOutcome::Closed {
            remaining: self.buffers.len(),
        }
    }

    /// Drop buffer `index` without asking. The buffer that followed it
    /// becomes active, wrapping to the first.
    pub fn remove(&mut self, index: usize) {
        if index >= self.buffers.len() {
            return;
        }
        let removed = self.buffers.remove(index);
        debug!("buffer {}: closed {}", index, removed.file_path.display());

        if index < self.active {
            self.active -= 1;
        }
        if self.active >= self.buffers.len() {
            self.active = 0;
        }
    }

    pub fn next_buffer(&mut self) -> usize {
        if !self.buffers.is_empty() {
            self.active = (self.active + 1) % self.buffers.len();
        }
        self.active
    }

    pub fn prev_buffer(&mut self) -> usize {
        if !self.buffers.is_empty() {
            let len = self.buffers.len();
            self.active = (self.active + len - 1) % len;
        }
        self.active
    }

    /// Indices of buffers with changes that would be lost on exit.
    pub fn unsaved(&self) -> Vec<usize> {
        self.buffers
            .iter()
            .enumerate()
            .filter(|(_, b)| b.dirty && !b.read_only)
            .map(|(i, _)| i)
            .collect()
    }
}
