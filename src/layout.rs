// layout.rs - Screen regions shared by input handling and drawing

use crate::buffer::TextBuffer;
use crate::viewport::ScreenPos;
use unicode_width::UnicodeWidthStr;

/// Terminal split into a title row, the buffer region, a status row and a
/// message/prompt row, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: usize,
    pub height: usize,
}

impl Layout {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: width as usize,
            height: height as usize,
        }
    }

    pub fn title_row(&self) -> usize {
        0
    }

    pub fn status_row(&self) -> usize {
        self.height.saturating_sub(2)
    }

    pub fn message_row(&self) -> usize {
        self.height.saturating_sub(1)
    }

    pub fn buffer_start(&self) -> ScreenPos {
        ScreenPos::new(1, 0)
    }

    pub fn buffer_end(&self) -> ScreenPos {
        ScreenPos::new(self.status_row().max(1), self.width)
    }

    pub fn prompt_start(&self) -> ScreenPos {
        ScreenPos::new(self.message_row(), 0)
    }

    pub fn prompt_end(&self) -> ScreenPos {
        ScreenPos::new(self.height, self.width)
    }

    /// First column of `label` when drawn flush right in the title row.
    pub fn buffer_label_col(&self, label: &str) -> usize {
        self.width.saturating_sub(label.width())
    }

    pub fn hits_buffer_label(&self, pos: ScreenPos, label: &str) -> bool {
        pos.row == self.title_row() && pos.col >= self.buffer_label_col(label) && pos.col < self.width
    }
}

/// Title bar tag for the active buffer: dirty mark, index and file name.
pub fn buffer_label(index: usize, buffer: &TextBuffer) -> String {
    let mark = if buffer.dirty { '*' } else { ' ' };
    let name = buffer
        .file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| buffer.file_path.display().to_string());
    format!("{}{}: {}", mark, index, name)
}
