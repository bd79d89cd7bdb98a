// ui/widgets/status_bar.rs - Status bar widget

use ratatui::{buffer::Buffer, layout::Rect, text::Line, widgets::Widget};
use unicode_width::UnicodeWidthStr;

use crate::editor::Editor;
use crate::ui::theme::Theme;

const STATUS_TAIL: &str = "^/ Help    ^X Exit";

/// Status bar widget showing cursor position, progress through the file,
/// mode and the key bindings reminder
pub struct StatusBar<'a> {
    pub editor: &'a Editor,
    pub theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(editor: &'a Editor, theme: &'a Theme) -> Self {
        Self { editor, theme }
    }

    fn summary(&self) -> String {
        let Some(buffer) = self.editor.active_buffer() else {
            return format!(" {}", self.editor.mode.label());
        };
        let cursor = buffer.cursor();
        let percent = if buffer.line_count() > 0 {
            (cursor.line + 1) * 100 / buffer.line_count()
        } else {
            0
        };

        let mut status = format!(
            " {:06},{:06} {:>4}%  {}",
            cursor.line + 1,
            cursor.col + 1,
            percent,
            self.editor.mode.label()
        );
        if buffer.read_only {
            status.push_str(" [read-only]");
        }
        if let Some(note) = &buffer.note {
            status.push_str(&format!(" [{}]", note));
        }
        if self.editor.config.debug {
            status.push_str(&format!("  key {}", self.editor.keymap.describe_last()));
        }
        status
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width as usize;
        let status = self.summary();

        // Pad the status text so the tail sits flush right
        let used = status.width() + STATUS_TAIL.width();
        let line = if used < width {
            format!("{}{}{}", status, " ".repeat(width - used), STATUS_TAIL)
        } else if status.width() < width {
            format!("{}{}", status, " ".repeat(width - status.width()))
        } else {
            status
        };

        let line_widget = Line::from(line).style(self.theme.status_bar());
        buf.set_line(area.x, area.y, &line_widget, area.width);
    }
}
